use std::collections::{BTreeMap, HashSet};
use std::fmt::Debug;
use num_traits::{Float, Zero};
use serde::Serialize;

use crate::graph::{DirectedGraph, NodeId};
use crate::Result;

/// Distance per node id; `None` means unreachable
pub type DistanceMap<W> = BTreeMap<NodeId, Option<W>>;

/// Work done by one algorithm run
///
/// Both algorithms count one unit per priority queue extraction (stale entries
/// included) and one per edge examined. The recursive algorithm splits the edges
/// into `edges_examined` (inside a component) and `cross_edges` (leaving one) and
/// also counts `components_entered`. [`total`](Self::total) is the figure compared
/// between the two.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OperationCounter {
    pub extractions: usize,
    pub edges_examined: usize,
    pub components_entered: usize,
    pub cross_edges: usize,
}

impl OperationCounter {
    /// Sum of all counted operations
    pub fn total(&self) -> usize {
        self.extractions + self.edges_examined + self.components_entered + self.cross_edges
    }
}

/// What happened at one recorded step
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepOperation {
    /// State before the main loop
    Initialization,
    /// A node was finalized
    VisitNode { node: NodeId },
    /// An edge out of `node` improved the distance of `neighbor`
    RelaxEdge { node: NodeId, neighbor: NodeId },
    /// A component is about to be solved; `recursion_stack` is the chain of
    /// components through which it was reached, ending with itself
    EnterComponent {
        component: usize,
        members: Vec<NodeId>,
        recursion_stack: Vec<usize>,
    },
    /// A component has been solved
    CompleteComponent {
        component: usize,
        members: Vec<NodeId>,
        recursion_stack: Vec<usize>,
    },
}

/// Snapshot of an algorithm's state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Step<W> {
    pub operation: StepOperation,
    /// Finalized nodes (baseline) or nodes of solved components (recursive)
    pub visited: Vec<NodeId>,
    /// Queued nodes (baseline) or nodes of scheduled, unsolved components (recursive)
    pub queue: Vec<NodeId>,
    pub distances: DistanceMap<W>,
}

/// Result of a shortest path algorithm execution
#[derive(Debug, Clone, Serialize)]
pub struct ShortestPathResult<W>
where
    W: Float + Zero + Debug + Copy,
{
    /// Source node id
    pub source: NodeId,

    /// Distances from source to each node
    pub distances: DistanceMap<W>,

    /// Predecessor nodes in the shortest path tree
    pub predecessors: BTreeMap<NodeId, Option<NodeId>>,

    /// Recorded steps, empty when recording is disabled
    pub steps: Vec<Step<W>>,

    pub operations: OperationCounter,
}

impl<W> ShortestPathResult<W>
where
    W: Float + Zero + Debug + Copy,
{
    /// Distance to a node, `None` if unreachable or unknown
    pub fn distance(&self, node: NodeId) -> Option<W> {
        self.distances.get(&node).copied().flatten()
    }

    pub fn predecessor(&self, node: NodeId) -> Option<NodeId> {
        self.predecessors.get(&node).copied().flatten()
    }

    pub fn is_reachable(&self, node: NodeId) -> bool {
        self.distance(node).is_some()
    }

    /// Number of nodes with a finite distance
    pub fn reachable_count(&self) -> usize {
        self.distances.values().filter(|d| d.is_some()).count()
    }

    /// Total operation count, the metric compared between algorithms
    pub fn operation_count(&self) -> usize {
        self.operations.total()
    }
}

/// Walks predecessors back from `target` to `source`
///
/// Returns the node ids from `source` to `target`, or an empty vector when the
/// target is unreachable or the predecessor chain does not lead to `source`.
pub fn reconstruct_path<W>(
    result: &ShortestPathResult<W>,
    source: NodeId,
    target: NodeId,
) -> Vec<NodeId>
where
    W: Float + Zero + Debug + Copy,
{
    if !result.is_reachable(target) || !result.distances.contains_key(&source) {
        return Vec::new();
    }

    let mut path = vec![target];
    let mut seen = HashSet::new();
    let mut current = target;

    while current != source {
        if !seen.insert(current) {
            return Vec::new();
        }
        match result.predecessor(current) {
            Some(pred) => {
                path.push(pred);
                current = pred;
            }
            None => return Vec::new(),
        }
    }

    path.reverse();
    path
}

/// Trait for shortest path algorithms
pub trait ShortestPathAlgorithm<W>
where
    W: Float + Zero + Debug + Copy,
{
    /// Compute shortest paths from a source node to all other nodes
    ///
    /// Fails with [`Error::InvalidSource`](crate::Error::InvalidSource) when `source`
    /// is not a node of `graph`. A graph without nodes has no valid source, so every
    /// run on an empty graph fails this way rather than returning an empty map.
    fn compute_shortest_paths(
        &self,
        graph: &DirectedGraph<W>,
        source: NodeId,
    ) -> Result<ShortestPathResult<W>>;

    /// Get the name of the algorithm
    fn name(&self) -> &'static str;

    /// Get the shortest path from the result's source to target
    fn get_path(&self, result: &ShortestPathResult<W>, target: NodeId) -> Option<Vec<NodeId>> {
        let path = reconstruct_path(result, result.source, target);
        if path.is_empty() {
            None
        } else {
            Some(path)
        }
    }
}
