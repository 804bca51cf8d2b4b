//! AC-SSSP - Shortest paths over the acyclic-connected tree
//!
//! This library computes single-source shortest paths on a weighted directed graph
//! two ways: a baseline whole-graph Dijkstra and a recursive Dijkstra that walks
//! the graph's strongly connected components in topological order, as described in
//! "Faster shortest-path algorithms using the acyclic-connected tree" by
//! Stefansson, Biggar and Johansson (2025).
//!
//! Besides distances and predecessors, both algorithms report a step trace and an
//! operation counter, and the decomposition (components, condensation DAG, A-C tree
//! and nesting width) is exposed so callers can explain where the savings come from.

pub mod algorithm;
pub mod data_structures;
pub mod decomposition;
pub mod graph;

pub use algorithm::{
    comparison::{compare_algorithms, PerformanceComparison},
    dijkstra::Dijkstra,
    recursive_dijkstra::RecursiveDijkstra,
    reconstruct_path, Algorithm, OperationCounter, ShortestPathAlgorithm, ShortestPathResult,
    Step, StepOperation,
};
/// Re-export main types for convenient use
pub use decomposition::{
    build_decomposition, build_source_ac_tree, Decomposition, DecompositionMode, SourceAcTree,
};
pub use graph::directed::{DirectedGraph, Edge, GraphBuilder, Node, NodeId};

/// Broad classes of failure, used by callers to decide how to react
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The graph itself is malformed
    Validation,
    /// A caller-supplied argument does not fit the graph
    InvalidArgument,
    /// The decomposition is inconsistent with the graph
    DecompositionDefect,
    /// A looked-up entity does not exist
    NotFound,
}

/// Error types for the library
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Duplicate node ID: {0}")]
    DuplicateNode(NodeId),

    #[error("Invalid edge: from {from} to {to} references a missing node")]
    DanglingEdge { from: NodeId, to: NodeId },

    #[error("Invalid edge weight {weight} on edge from {from} to {to}")]
    InvalidWeight { from: NodeId, to: NodeId, weight: f64 },

    #[error("Invalid source node: {0}")]
    InvalidSource(NodeId),

    #[error("Unknown algorithm: {0}")]
    UnknownAlgorithm(String),

    #[error("Condensation graph contains a cycle: ordered {ordered} of {total} components")]
    CondensationCycle { ordered: usize, total: usize },

    #[error("Decomposition does not match graph: {0}")]
    DecompositionMismatch(String),

    #[error("Source node {0} not found in any component")]
    SourceNotInDecomposition(NodeId),
}

impl Error {
    /// Returns the class this error belongs to
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::DuplicateNode(_) | Error::DanglingEdge { .. } | Error::InvalidWeight { .. } => {
                ErrorKind::Validation
            }
            Error::InvalidSource(_) | Error::UnknownAlgorithm(_) => ErrorKind::InvalidArgument,
            Error::CondensationCycle { .. } | Error::DecompositionMismatch(_) => {
                ErrorKind::DecompositionDefect
            }
            Error::SourceNotInDecomposition(_) => ErrorKind::NotFound,
        }
    }
}

/// Result type for the library
pub type Result<T> = std::result::Result<T, Error>;
