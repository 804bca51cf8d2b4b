use crate::graph::Graph;
use crate::{Error, Result};
use num_traits::{Float, Zero};
use serde::Serialize;
use std::collections::{HashMap, VecDeque};
use std::fmt::Debug;

/// One condensation node per strongly connected component
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CondensationNode {
    /// Index of the component in the decomposition
    pub component: usize,
    pub label: String,
    /// Number of original nodes in the component
    pub size: usize,
}

/// Edge between two distinct components
///
/// `weight` counts the original edges crossing from `source` to `target`. It is
/// informational only; no algorithm reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CondensationEdge {
    pub source: usize,
    pub target: usize,
    pub weight: usize,
}

/// The DAG obtained by collapsing every component to a single node
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CondensationGraph {
    pub nodes: Vec<CondensationNode>,
    pub edges: Vec<CondensationEdge>,
}

impl CondensationGraph {
    /// Builds the condensation of `graph` for the partition given by `component_of`
    ///
    /// At most one edge is created per ordered pair of distinct components.
    pub fn build<W, G>(graph: &G, component_of: &[usize], component_sizes: &[usize]) -> Self
    where
        W: Float + Zero + Debug + Copy,
        G: Graph<W>,
    {
        let nodes = component_sizes
            .iter()
            .enumerate()
            .map(|(component, &size)| CondensationNode {
                component,
                label: format!("SCC{}", component),
                size,
            })
            .collect();

        let mut edges: Vec<CondensationEdge> = Vec::new();
        let mut edge_of_pair: HashMap<(usize, usize), usize> = HashMap::new();

        for (u, &source) in component_of.iter().enumerate() {
            for (v, _) in graph.outgoing_edges(u) {
                let target = match component_of.get(v) {
                    Some(&target) if target != source => target,
                    _ => continue,
                };

                match edge_of_pair.get(&(source, target)) {
                    Some(&edge) => edges[edge].weight += 1,
                    None => {
                        edge_of_pair.insert((source, target), edges.len());
                        edges.push(CondensationEdge {
                            source,
                            target,
                            weight: 1,
                        });
                    }
                }
            }
        }

        CondensationGraph { nodes, edges }
    }

    /// Number of condensation nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Successor lists per component, in edge order
    pub fn successors(&self) -> Vec<Vec<usize>> {
        let mut successors = vec![Vec::new(); self.nodes.len()];
        for edge in &self.edges {
            successors[edge.source].push(edge.target);
        }
        successors
    }

    /// Topologically sorts the components with Kahn's algorithm
    ///
    /// Indegree-zero components are processed first-in first-out, seeded in
    /// component order. Fails if the order does not cover every component.
    pub fn topological_order(&self) -> Result<Vec<usize>> {
        let total = self.nodes.len();
        let successors = self.successors();

        let mut in_degree = vec![0usize; total];
        for edge in &self.edges {
            in_degree[edge.target] += 1;
        }

        let mut queue: VecDeque<usize> = (0..total).filter(|&c| in_degree[c] == 0).collect();
        let mut order = Vec::with_capacity(total);

        while let Some(component) = queue.pop_front() {
            order.push(component);
            for &next in &successors[component] {
                in_degree[next] -= 1;
                if in_degree[next] == 0 {
                    queue.push_back(next);
                }
            }
        }

        if order.len() != total {
            return Err(Error::CondensationCycle {
                ordered: order.len(),
                total,
            });
        }

        Ok(order)
    }
}
