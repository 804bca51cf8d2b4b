use std::fmt::Debug;
use log::debug;
use num_traits::{Float, Zero};

use crate::algorithm::{
    distance_map, predecessor_map, OperationCounter, ShortestPathAlgorithm, ShortestPathResult,
    StepOperation, StepTrace,
};
use crate::data_structures::MinPriorityQueue;
use crate::graph::{DirectedGraph, NodeId};
use crate::{Error, Result};

/// Classic Dijkstra's algorithm over the whole graph, with lazy deletion
#[derive(Debug, Clone)]
pub struct Dijkstra {
    /// Whether to record a step snapshot per event
    record_steps: bool,
}

impl Default for Dijkstra {
    fn default() -> Self {
        Dijkstra { record_steps: true }
    }
}

impl Dijkstra {
    /// Creates a new Dijkstra algorithm instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable step recording
    pub fn with_step_recording(mut self, enabled: bool) -> Self {
        self.record_steps = enabled;
        self
    }
}

impl<W> ShortestPathAlgorithm<W> for Dijkstra
where
    W: Float + Zero + Debug + Copy,
{
    fn name(&self) -> &'static str {
        "Dijkstra"
    }

    fn compute_shortest_paths(
        &self,
        graph: &DirectedGraph<W>,
        source: NodeId,
    ) -> Result<ShortestPathResult<W>> {
        let source_vertex = graph.index_of(source).ok_or(Error::InvalidSource(source))?;

        let n = graph.node_count();
        let adjacency = graph.adjacency();

        // Initialize distances and predecessors
        let mut distances: Vec<Option<W>> = vec![None; n];
        let mut predecessors: Vec<Option<usize>> = vec![None; n];
        let mut finalized = vec![false; n];
        let mut visited = Vec::new();
        let mut counter = OperationCounter::default();
        let mut trace = StepTrace::new(graph, self.record_steps);

        // Distance to source is 0
        distances[source_vertex] = Some(W::zero());

        let mut queue = MinPriorityQueue::with_capacity(n);
        queue.insert(source_vertex, W::zero());

        trace.record(StepOperation::Initialization, &visited, &queue.elements(), &distances);

        while let Some((u, _)) = queue.extract_min() {
            counter.extractions += 1;

            // Stale entry for a node that is already final
            if finalized[u] {
                continue;
            }
            finalized[u] = true;
            visited.push(u);

            if trace.is_enabled() {
                let operation = StepOperation::VisitNode { node: graph.node_id(u) };
                trace.record(operation, &visited, &queue.elements(), &distances);
            }

            let dist_u = match distances[u] {
                Some(d) => d,
                None => continue,
            };

            // Relax all outgoing edges
            for &(v, weight) in adjacency.successors(u) {
                counter.edges_examined += 1;
                let new_dist = dist_u + weight;

                let should_update = match distances[v] {
                    None => true,
                    Some(current_dist) => new_dist < current_dist,
                };

                if should_update {
                    distances[v] = Some(new_dist);
                    predecessors[v] = Some(u);
                    queue.insert(v, new_dist);

                    if trace.is_enabled() {
                        let operation = StepOperation::RelaxEdge {
                            node: graph.node_id(u),
                            neighbor: graph.node_id(v),
                        };
                        trace.record(operation, &visited, &queue.elements(), &distances);
                    }
                }
            }
        }

        debug!(
            "Dijkstra from {}: {} of {} nodes reachable, {} operations",
            source,
            visited.len(),
            n,
            counter.total()
        );

        Ok(ShortestPathResult {
            source,
            distances: distance_map(graph, &distances),
            predecessors: predecessor_map(graph, &predecessors),
            steps: trace.into_steps(),
            operations: counter,
        })
    }
}
