use crate::graph::directed::{default_label, DirectedGraph, Edge, Node};
use ordered_float::OrderedFloat;
use rand::prelude::*;
use rand::rngs::StdRng;

/// Parameters for random graph generation
#[derive(Debug, Clone)]
pub struct RandomGraphConfig {
    /// Number of nodes
    pub node_count: usize,
    /// Probability that any ordered pair of distinct nodes gets an edge
    pub edge_probability: f64,
    /// Smallest integer weight (raised to 1 if lower)
    pub min_weight: u32,
    /// Largest integer weight
    pub max_weight: u32,
    /// Add edges until the graph is weakly connected
    pub connected: bool,
    /// Seed for the random generator
    pub seed: u64,
}

impl Default for RandomGraphConfig {
    fn default() -> Self {
        RandomGraphConfig {
            node_count: 8,
            edge_probability: 0.3,
            min_weight: 1,
            max_weight: 10,
            connected: false,
            seed: 42,
        }
    }
}

impl RandomGraphConfig {
    pub fn new(node_count: usize, edge_probability: f64, seed: u64) -> Self {
        RandomGraphConfig {
            node_count,
            edge_probability,
            seed,
            ..Default::default()
        }
    }

    pub fn with_weight_range(mut self, min_weight: u32, max_weight: u32) -> Self {
        self.min_weight = min_weight;
        self.max_weight = max_weight;
        self
    }

    pub fn with_connected(mut self, connected: bool) -> Self {
        self.connected = connected;
        self
    }

    fn weight(&self, rng: &mut StdRng) -> OrderedFloat<f64> {
        let low = self.min_weight.max(1);
        let high = self.max_weight.max(low);
        OrderedFloat(rng.gen_range(low..=high) as f64)
    }
}

/// Nodes labelled A, B, C, ... scattered over a 800x400 canvas
fn scattered_nodes(count: usize, rng: &mut StdRng) -> Vec<Node> {
    (0..count)
        .map(|i| {
            let x = rng.gen_range(50.0..750.0);
            let y = rng.gen_range(50.0..350.0);
            Node::at(i, default_label(i), x, y)
        })
        .collect()
}

/// The 7-node example graph A..G
///
/// The shortest path from A to D is A -> E -> F -> G -> D with length 7.
pub fn example_graph() -> DirectedGraph<OrderedFloat<f64>> {
    let positions = [
        (100.0, 100.0),
        (250.0, 100.0),
        (400.0, 100.0),
        (550.0, 100.0),
        (175.0, 250.0),
        (325.0, 250.0),
        (475.0, 250.0),
    ];
    let nodes = positions
        .iter()
        .enumerate()
        .map(|(i, &(x, y))| Node::at(i, default_label(i), x, y))
        .collect();

    let edges = [
        (0, 1, 4.0),
        (0, 4, 2.0),
        (1, 2, 3.0),
        (1, 4, 1.0),
        (1, 5, 6.0),
        (2, 3, 2.0),
        (2, 6, 4.0),
        (4, 5, 3.0),
        (5, 6, 1.0),
        (5, 2, 5.0),
        (6, 3, 1.0),
    ]
    .iter()
    .map(|&(s, t, w)| Edge::new(s, t, OrderedFloat(w)))
    .collect();

    DirectedGraph::from_parts_unchecked(nodes, edges)
}

/// Generates a random directed graph without self-loops
pub fn random_graph(config: &RandomGraphConfig) -> DirectedGraph<OrderedFloat<f64>> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let n = config.node_count;
    let nodes = scattered_nodes(n, &mut rng);
    let mut edges = Vec::new();

    for i in 0..n {
        for j in 0..n {
            if i != j && rng.gen::<f64>() < config.edge_probability {
                edges.push(Edge::new(i, j, config.weight(&mut rng)));
            }
        }
    }

    if config.connected && n > 1 {
        connect_weakly(n, &mut edges, config, &mut rng);
    }

    DirectedGraph::from_parts_unchecked(nodes, edges)
}

/// Adds random edges between weakly connected pieces until only one remains
fn connect_weakly(
    n: usize,
    edges: &mut Vec<Edge<OrderedFloat<f64>>>,
    config: &RandomGraphConfig,
    rng: &mut StdRng,
) {
    fn find(parent: &mut [usize], mut v: usize) -> usize {
        while parent[v] != v {
            parent[v] = parent[parent[v]];
            v = parent[v];
        }
        v
    }

    let mut parent: Vec<usize> = (0..n).collect();
    let mut pieces = n;
    for edge in edges.iter() {
        let (a, b) = (find(&mut parent, edge.source), find(&mut parent, edge.target));
        if a != b {
            parent[a] = b;
            pieces -= 1;
        }
    }

    while pieces > 1 {
        let i = rng.gen_range(0..n);
        let j = rng.gen_range(0..n);
        let (a, b) = (find(&mut parent, i), find(&mut parent, j));
        if a != b {
            edges.push(Edge::new(i, j, config.weight(rng)));
            parent[a] = b;
            pieces -= 1;
        }
    }
}

/// Generates a random DAG: edges only run from lower to higher node ids
pub fn random_dag(config: &RandomGraphConfig) -> DirectedGraph<OrderedFloat<f64>> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let n = config.node_count;
    let nodes = scattered_nodes(n, &mut rng);
    let mut edges = Vec::new();

    for i in 0..n {
        for j in (i + 1)..n {
            if rng.gen::<f64>() < config.edge_probability {
                edges.push(Edge::new(i, j, config.weight(&mut rng)));
            }
        }
    }

    DirectedGraph::from_parts_unchecked(nodes, edges)
}

/// Generates `component_count` complete blocks of `component_size` nodes, joined
/// in DAG fashion: block `c1` may get one edge to each later block `c2` with
/// probability `connection_probability`.
pub fn hierarchical_graph(
    component_count: usize,
    component_size: usize,
    connection_probability: f64,
    seed: u64,
) -> DirectedGraph<OrderedFloat<f64>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let config = RandomGraphConfig::default();
    let n = component_count * component_size;
    let nodes = scattered_nodes(n, &mut rng);
    let mut edges = Vec::new();

    for c in 0..component_count {
        let start = c * component_size;
        for i in start..start + component_size {
            for j in start..start + component_size {
                if i != j {
                    edges.push(Edge::new(i, j, config.weight(&mut rng)));
                }
            }
        }
    }

    if component_size > 0 {
        for c1 in 0..component_count {
            for c2 in (c1 + 1)..component_count {
                if rng.gen::<f64>() < connection_probability {
                    let i = c1 * component_size + rng.gen_range(0..component_size);
                    let j = c2 * component_size + rng.gen_range(0..component_size);
                    edges.push(Edge::new(i, j, config.weight(&mut rng)));
                }
            }
        }
    }

    DirectedGraph::from_parts_unchecked(nodes, edges)
}

/// Generates the chain 0 -> 1 -> ... -> n-1 with a constant edge weight
///
/// Non-positive or non-finite weights are replaced by 1.
pub fn chain_graph(n: usize, weight: f64) -> DirectedGraph<OrderedFloat<f64>> {
    let weight = if weight > 0.0 && weight.is_finite() { weight } else { 1.0 };
    let nodes = (0..n)
        .map(|i| Node::at(i, default_label(i), 50.0 + 100.0 * i as f64, 200.0))
        .collect();
    let edges = (1..n)
        .map(|i| Edge::new(i - 1, i, OrderedFloat(weight)))
        .collect();

    DirectedGraph::from_parts_unchecked(nodes, edges)
}
