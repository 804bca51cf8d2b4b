pub mod traits;
pub mod dijkstra;
pub mod recursive_dijkstra;
pub mod comparison;

pub use traits::{
    reconstruct_path, DistanceMap, OperationCounter, ShortestPathAlgorithm, ShortestPathResult,
    Step, StepOperation,
};

use std::collections::BTreeMap;
use std::fmt;
use std::fmt::Debug;
use std::str::FromStr;
use num_traits::{Float, Zero};
use serde::Serialize;

use crate::graph::{DirectedGraph, NodeId};
use crate::{Error, Result};

/// Which shortest path algorithm to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Algorithm {
    /// Whole-graph Dijkstra
    Baseline,
    /// Component-by-component Dijkstra over the A-C tree
    Recursive,
}

impl Algorithm {
    /// Runs the selected algorithm with default settings
    pub fn run<W>(self, graph: &DirectedGraph<W>, source: NodeId) -> Result<ShortestPathResult<W>>
    where
        W: Float + Zero + Debug + Copy,
    {
        match self {
            Algorithm::Baseline => dijkstra::Dijkstra::new().compute_shortest_paths(graph, source),
            Algorithm::Recursive => {
                recursive_dijkstra::RecursiveDijkstra::new().compute_shortest_paths(graph, source)
            }
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Algorithm::Baseline => write!(f, "baseline"),
            Algorithm::Recursive => write!(f, "recursive"),
        }
    }
}

impl FromStr for Algorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "baseline" | "dijkstra" | "standard" => Ok(Algorithm::Baseline),
            "recursive" | "ac-tree" | "ac_tree" => Ok(Algorithm::Recursive),
            other => Err(Error::UnknownAlgorithm(other.to_string())),
        }
    }
}

/// Collects step snapshots for a run, translating vertex positions to node ids
pub(crate) struct StepTrace<'g, W>
where
    W: Float + Zero + Debug + Copy,
{
    graph: &'g DirectedGraph<W>,
    enabled: bool,
    steps: Vec<Step<W>>,
}

impl<'g, W> StepTrace<'g, W>
where
    W: Float + Zero + Debug + Copy,
{
    pub(crate) fn new(graph: &'g DirectedGraph<W>, enabled: bool) -> Self {
        StepTrace {
            graph,
            enabled,
            steps: Vec::new(),
        }
    }

    pub(crate) fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub(crate) fn record(
        &mut self,
        operation: StepOperation,
        visited: &[usize],
        queue: &[usize],
        distances: &[Option<W>],
    ) {
        if !self.enabled {
            return;
        }
        let ids = |vertices: &[usize]| -> Vec<NodeId> {
            vertices.iter().map(|&v| self.graph.node_id(v)).collect()
        };
        let step = Step {
            operation,
            visited: ids(visited),
            queue: ids(queue),
            distances: distance_map(self.graph, distances),
        };
        self.steps.push(step);
    }

    pub(crate) fn into_steps(self) -> Vec<Step<W>> {
        self.steps
    }
}

/// Keys a per-vertex distance vector by node id
pub(crate) fn distance_map<W>(graph: &DirectedGraph<W>, distances: &[Option<W>]) -> DistanceMap<W>
where
    W: Float + Zero + Debug + Copy,
{
    distances
        .iter()
        .enumerate()
        .map(|(v, &d)| (graph.node_id(v), d))
        .collect()
}

/// Keys a per-vertex predecessor vector by node id
pub(crate) fn predecessor_map<W>(
    graph: &DirectedGraph<W>,
    predecessors: &[Option<usize>],
) -> BTreeMap<NodeId, Option<NodeId>>
where
    W: Float + Zero + Debug + Copy,
{
    predecessors
        .iter()
        .enumerate()
        .map(|(v, &p)| (graph.node_id(v), p.map(|p| graph.node_id(p))))
        .collect()
}
