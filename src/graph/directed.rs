use crate::graph::adjacency::AdjacencyList;
use crate::{Error, Result};
use num_traits::{Float, ToPrimitive, Zero};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fmt::Debug;

/// Identifier of a node, unique within one graph
pub type NodeId = usize;

/// A node of the graph
///
/// The coordinates only matter to whoever draws the graph; no algorithm reads them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    pub id: NodeId,
    pub label: String,
    pub x: f64,
    pub y: f64,
}

impl Node {
    /// Creates a node at the origin
    pub fn new(id: NodeId, label: impl Into<String>) -> Self {
        Node {
            id,
            label: label.into(),
            x: 0.0,
            y: 0.0,
        }
    }

    /// Creates a node with layout coordinates
    pub fn at(id: NodeId, label: impl Into<String>, x: f64, y: f64) -> Self {
        Node {
            id,
            label: label.into(),
            x,
            y,
        }
    }
}

/// A weighted directed edge between two node ids
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Edge<W> {
    pub source: NodeId,
    pub target: NodeId,
    pub weight: W,
}

impl<W> Edge<W> {
    pub fn new(source: NodeId, target: NodeId, weight: W) -> Self {
        Edge {
            source,
            target,
            weight,
        }
    }
}

/// Spreadsheet-style label for the node at `index`: A..Z, AA, AB, ...
pub fn default_label(index: usize) -> String {
    let mut label = Vec::new();
    let mut n = index + 1;
    while n > 0 {
        let rem = (n - 1) % 26;
        label.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    label.reverse();
    String::from_utf8_lossy(&label).into_owned()
}

/// A validated directed graph owning an ordered sequence of nodes and edges
///
/// Once built the graph is read-only. Multi-edges and self-loops are kept as given.
/// Every algorithm addresses vertices by their position in [`nodes`](Self::nodes);
/// [`index_of`](Self::index_of) maps an id to its position.
#[derive(Debug, Clone, Serialize)]
pub struct DirectedGraph<W>
where
    W: Float + Zero + Debug + Copy,
{
    /// Nodes in insertion order
    nodes: Vec<Node>,

    /// Edges in insertion order
    edges: Vec<Edge<W>>,

    /// Node id -> position in `nodes`
    #[serde(skip)]
    index: HashMap<NodeId, usize>,
}

impl<W> DirectedGraph<W>
where
    W: Float + Zero + Debug + Copy,
{
    /// Builds a graph from nodes and edges, rejecting malformed input
    ///
    /// Fails when two nodes share an id, when an edge references a node that is not
    /// in `nodes`, or when a weight is not a finite positive number.
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge<W>>) -> Result<Self> {
        let mut index = HashMap::with_capacity(nodes.len());
        for (position, node) in nodes.iter().enumerate() {
            if index.insert(node.id, position).is_some() {
                return Err(Error::DuplicateNode(node.id));
            }
        }

        for edge in &edges {
            if !index.contains_key(&edge.source) || !index.contains_key(&edge.target) {
                return Err(Error::DanglingEdge {
                    from: edge.source,
                    to: edge.target,
                });
            }
            if !(edge.weight > W::zero()) || !edge.weight.is_finite() {
                return Err(Error::InvalidWeight {
                    from: edge.source,
                    to: edge.target,
                    weight: edge.weight.to_f64().unwrap_or(f64::NAN),
                });
            }
        }

        Ok(DirectedGraph {
            nodes,
            edges,
            index,
        })
    }

    /// Assembles a graph whose validity is guaranteed by construction
    pub(crate) fn from_parts_unchecked(nodes: Vec<Node>, edges: Vec<Edge<W>>) -> Self {
        let index = nodes
            .iter()
            .enumerate()
            .map(|(position, node)| (node.id, position))
            .collect();
        DirectedGraph {
            nodes,
            edges,
            index,
        }
    }

    /// Creates a graph without nodes or edges
    pub fn empty() -> Self {
        DirectedGraph {
            nodes: Vec::new(),
            edges: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Returns the nodes in insertion order
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Returns the edges in insertion order
    pub fn edges(&self) -> &[Edge<W>] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Looks a node up by id
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.index.get(&id).map(|&position| &self.nodes[position])
    }

    /// Returns true if a node with this id exists
    pub fn contains_node(&self, id: NodeId) -> bool {
        self.index.contains_key(&id)
    }

    /// Position of a node id in [`nodes`](Self::nodes)
    pub fn index_of(&self, id: NodeId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    /// Node id stored at a position; callers pass positions of this graph only
    pub(crate) fn node_id(&self, position: usize) -> NodeId {
        self.nodes[position].id
    }

    /// Computes the forward and reverse adjacency view over vertex positions
    pub fn adjacency(&self) -> AdjacencyList<W> {
        AdjacencyList::from_graph(self)
    }

    /// Builds the subgraph containing only the given nodes and the edges between them
    ///
    /// Ids not present in the graph are ignored.
    pub fn subgraph(&self, node_ids: &[NodeId]) -> Self {
        let keep: HashSet<NodeId> = node_ids
            .iter()
            .copied()
            .filter(|id| self.contains_node(*id))
            .collect();

        let nodes: Vec<Node> = self
            .nodes
            .iter()
            .filter(|node| keep.contains(&node.id))
            .cloned()
            .collect();
        let edges: Vec<Edge<W>> = self
            .edges
            .iter()
            .filter(|edge| keep.contains(&edge.source) && keep.contains(&edge.target))
            .copied()
            .collect();

        Self::from_parts_unchecked(nodes, edges)
    }
}

/// Incremental builder for [`DirectedGraph`]; validation happens in [`build`](Self::build)
#[derive(Debug, Clone)]
pub struct GraphBuilder<W> {
    nodes: Vec<Node>,
    edges: Vec<Edge<W>>,
}

impl<W> Default for GraphBuilder<W> {
    fn default() -> Self {
        GraphBuilder {
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }
}

impl<W> GraphBuilder<W>
where
    W: Float + Zero + Debug + Copy,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `count` nodes numbered after the existing ones, labelled A, B, C, ...
    pub fn with_nodes(mut self, count: usize) -> Self {
        let start = self.nodes.len();
        for i in start..start + count {
            self.nodes.push(Node::new(i, default_label(i)));
        }
        self
    }

    /// Adds a node
    pub fn node(mut self, node: Node) -> Self {
        self.nodes.push(node);
        self
    }

    /// Adds a directed edge
    pub fn edge(mut self, source: NodeId, target: NodeId, weight: W) -> Self {
        self.edges.push(Edge::new(source, target, weight));
        self
    }

    /// Validates and builds the graph
    pub fn build(self) -> Result<DirectedGraph<W>> {
        DirectedGraph::new(self.nodes, self.edges)
    }
}
