pub mod traits;
pub mod directed;
pub mod adjacency;
pub mod generators;

pub use traits::Graph;
pub use directed::{default_label, DirectedGraph, Edge, GraphBuilder, Node, NodeId};
pub use adjacency::{AdjacencyList, InducedSubgraph};
