//! Recursive Dijkstra over the A-C tree
//!
//! Components are solved one at a time, starting from the source's component and
//! following the condensation DAG. Inside a component a Dijkstra confined to the
//! induced subgraph runs from the component's entry points (members that already
//! carry a finite distance). Edges leaving the component are then relaxed exactly
//! once to seed the entry points of the components they reach.
//!
//! The traversal uses an explicit worklist ordered by topological position rather
//! than call-stack recursion, so a component is only solved after every reachable
//! component that precedes it. For a degraded (singleton) decomposition the order
//! carries no dependency information and the worklist is ordered by entry distance
//! instead, which reduces to plain Dijkstra.

use std::collections::HashSet;
use std::fmt::Debug;
use log::debug;
use num_traits::{Float, Zero};

use crate::algorithm::{
    distance_map, predecessor_map, OperationCounter, ShortestPathAlgorithm, ShortestPathResult,
    StepOperation, StepTrace,
};
use crate::data_structures::MinPriorityQueue;
use crate::decomposition::{build_decomposition, Decomposition};
use crate::graph::{AdjacencyList, DirectedGraph, Graph, InducedSubgraph, NodeId};
use crate::{Error, Result};

/// Component-by-component Dijkstra driven by a [`Decomposition`]
#[derive(Debug, Clone)]
pub struct RecursiveDijkstra {
    /// Whether to record enter/complete snapshots per component
    record_steps: bool,
}

impl Default for RecursiveDijkstra {
    fn default() -> Self {
        RecursiveDijkstra { record_steps: true }
    }
}

/// Worklist priority for a pending component
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
enum ScheduleKey<W> {
    /// Topological position (exact decomposition)
    Position(usize),
    /// Smallest entry distance (degraded decomposition)
    Distance(W),
}

/// Components of a decomposition translated to vertex positions of one graph
#[derive(Debug)]
struct ComponentLayout {
    /// Vertex -> component
    component_of: Vec<usize>,
    /// Component -> member vertices
    vertices: Vec<Vec<usize>>,
    /// Component -> topological position
    positions: Vec<usize>,
}

impl ComponentLayout {
    /// Checks that the decomposition partitions the graph's nodes
    fn new<W>(graph: &DirectedGraph<W>, decomposition: &Decomposition) -> Result<Self>
    where
        W: Float + Zero + Debug + Copy,
    {
        let n = graph.node_count();
        let count = decomposition.components.len();
        let mut component_of = vec![usize::MAX; n];
        let mut vertices = Vec::with_capacity(count);
        let mut positions = Vec::with_capacity(count);

        for (component, members) in decomposition.components.iter().enumerate() {
            let mut member_vertices = Vec::with_capacity(members.len());
            for &id in &members.members {
                let v = graph.index_of(id).ok_or_else(|| {
                    Error::DecompositionMismatch(format!("node {} is not in the graph", id))
                })?;
                if component_of[v] != usize::MAX {
                    return Err(Error::DecompositionMismatch(format!(
                        "node {} belongs to more than one component",
                        id
                    )));
                }
                component_of[v] = component;
                member_vertices.push(v);
            }
            vertices.push(member_vertices);

            let position = decomposition.topological_position(component).ok_or_else(|| {
                Error::DecompositionMismatch(format!(
                    "component {} has no topological position",
                    component
                ))
            })?;
            positions.push(position);
        }

        if let Some(v) = component_of.iter().position(|&c| c == usize::MAX) {
            return Err(Error::DecompositionMismatch(format!(
                "node {} belongs to no component",
                graph.node_id(v)
            )));
        }

        Ok(ComponentLayout {
            component_of,
            vertices,
            positions,
        })
    }
}

/// Working state shared by every component of one run
struct SearchContext<'g, W>
where
    W: Float + Zero + Debug + Copy,
{
    graph: &'g DirectedGraph<W>,
    adjacency: AdjacencyList<W>,
    layout: ComponentLayout,
    distances: Vec<Option<W>>,
    predecessors: Vec<Option<usize>>,
    /// Components already solved
    processed: Vec<bool>,
    /// Components pushed onto the worklist at least once
    scheduled: Vec<bool>,
    /// Component whose outgoing edges first reached this one
    discovered_by: Vec<Option<usize>>,
    /// Solved components in solve order
    solved: Vec<usize>,
    counter: OperationCounter,
    trace: StepTrace<'g, W>,
}

impl<'g, W> SearchContext<'g, W>
where
    W: Float + Zero + Debug + Copy,
{
    fn solve_component(&mut self, component: usize) {
        self.counter.components_entered += 1;
        self.record_component(component, true);

        self.relax_within(component);

        self.processed[component] = true;
        self.solved.push(component);
        self.record_component(component, false);
    }

    /// Dijkstra restricted to the subgraph induced by one component
    ///
    /// Seeds the queue with every member that already has a finite distance and
    /// writes improvements straight into the shared distance map.
    fn relax_within(&mut self, component: usize) {
        let members = &self.layout.vertices[component];
        let subgraph = InducedSubgraph::new(
            &self.adjacency,
            &self.layout.component_of,
            component,
            members,
        );

        let mut queue = MinPriorityQueue::with_capacity(members.len());
        for &v in members {
            if let Some(d) = self.distances[v] {
                queue.insert(v, d);
            }
        }

        // No entry point: the component is unreachable from the source
        if queue.is_empty() {
            return;
        }

        let mut settled = HashSet::with_capacity(members.len());
        while let Some((u, _)) = queue.extract_min() {
            self.counter.extractions += 1;

            // Stale entry for a node that is already settled
            if !settled.insert(u) {
                continue;
            }

            let dist_u = match self.distances[u] {
                Some(d) => d,
                None => continue,
            };

            for (v, weight) in subgraph.outgoing_edges(u) {
                self.counter.edges_examined += 1;
                let new_dist = dist_u + weight;

                let should_update = match self.distances[v] {
                    None => true,
                    Some(current_dist) => new_dist < current_dist,
                };

                if should_update {
                    self.distances[v] = Some(new_dist);
                    self.predecessors[v] = Some(u);
                    queue.insert(v, new_dist);
                }
            }
        }
    }

    /// Relaxes every edge leaving `component` into an unsolved component
    ///
    /// Returns the distinct target components in the order they were first reached.
    fn relax_outgoing(&mut self, component: usize) -> Vec<usize> {
        let mut targets = Vec::new();
        let mut seen = HashSet::new();

        for &u in &self.layout.vertices[component] {
            for &(v, weight) in self.adjacency.successors(u) {
                let target = self.layout.component_of[v];
                if target == component {
                    continue;
                }

                self.counter.cross_edges += 1;
                if self.processed[target] {
                    continue;
                }

                let dist_u = match self.distances[u] {
                    Some(d) => d,
                    None => continue,
                };
                let new_dist = dist_u + weight;

                let should_update = match self.distances[v] {
                    None => true,
                    Some(current_dist) => new_dist < current_dist,
                };
                if should_update {
                    self.distances[v] = Some(new_dist);
                    self.predecessors[v] = Some(u);
                }

                if seen.insert(target) {
                    targets.push(target);
                }
            }
        }

        targets
    }

    /// Smallest distance among a component's members
    fn entry_distance(&self, component: usize) -> Option<W> {
        self.layout.vertices[component]
            .iter()
            .filter_map(|&v| self.distances[v])
            .fold(None, |best: Option<W>, d| match best {
                Some(b) if b <= d => Some(b),
                _ => Some(d),
            })
    }

    /// Chain of components from the source's component down to `component`
    fn recursion_stack(&self, component: usize) -> Vec<usize> {
        let mut stack = vec![component];
        let mut current = component;
        while let Some(parent) = self.discovered_by[current] {
            if stack.len() > self.discovered_by.len() {
                break;
            }
            stack.push(parent);
            current = parent;
        }
        stack.reverse();
        stack
    }

    fn record_component(&mut self, component: usize, entering: bool) {
        if !self.trace.is_enabled() {
            return;
        }

        let visited: Vec<usize> = self
            .solved
            .iter()
            .flat_map(|&c| self.layout.vertices[c].iter().copied())
            .collect();
        let queue: Vec<usize> = (0..self.layout.vertices.len())
            .filter(|&c| self.scheduled[c] && !self.processed[c] && c != component)
            .flat_map(|c| self.layout.vertices[c].iter().copied())
            .collect();
        let members: Vec<NodeId> = self.layout.vertices[component]
            .iter()
            .map(|&v| self.graph.node_id(v))
            .collect();
        let recursion_stack = self.recursion_stack(component);

        let operation = if entering {
            StepOperation::EnterComponent {
                component,
                members,
                recursion_stack,
            }
        } else {
            StepOperation::CompleteComponent {
                component,
                members,
                recursion_stack,
            }
        };
        self.trace.record(operation, &visited, &queue, &self.distances);
    }
}

impl RecursiveDijkstra {
    /// Creates a new recursive Dijkstra instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable step recording
    pub fn with_step_recording(mut self, enabled: bool) -> Self {
        self.record_steps = enabled;
        self
    }

    /// Computes shortest paths from `source` using a prepared decomposition
    ///
    /// Fails with [`Error::SourceNotInDecomposition`] if no component owns the
    /// source, and with [`Error::DecompositionMismatch`] if the decomposition does
    /// not partition the graph's nodes.
    pub fn run<W>(
        &self,
        graph: &DirectedGraph<W>,
        source: NodeId,
        decomposition: &Decomposition,
    ) -> Result<ShortestPathResult<W>>
    where
        W: Float + Zero + Debug + Copy,
    {
        let source_component = decomposition
            .component_of(source)
            .ok_or(Error::SourceNotInDecomposition(source))?;
        let source_vertex = graph.index_of(source).ok_or(Error::InvalidSource(source))?;
        let layout = ComponentLayout::new(graph, decomposition)?;

        let n = graph.node_count();
        let count = layout.vertices.len();
        let exact = !decomposition.is_degraded();

        let mut ctx = SearchContext {
            graph,
            adjacency: graph.adjacency(),
            layout,
            distances: vec![None; n],
            predecessors: vec![None; n],
            processed: vec![false; count],
            scheduled: vec![false; count],
            discovered_by: vec![None; count],
            solved: Vec::new(),
            counter: OperationCounter::default(),
            trace: StepTrace::new(graph, self.record_steps),
        };

        ctx.distances[source_vertex] = Some(W::zero());
        ctx.trace
            .record(StepOperation::Initialization, &[], &[source_vertex], &ctx.distances);

        let mut worklist: MinPriorityQueue<usize, ScheduleKey<W>> = MinPriorityQueue::new();
        let source_key = if exact {
            ScheduleKey::Position(ctx.layout.positions[source_component])
        } else {
            ScheduleKey::Distance(W::zero())
        };
        ctx.scheduled[source_component] = true;
        worklist.insert(source_component, source_key);

        while let Some((component, _)) = worklist.extract_min() {
            if ctx.processed[component] {
                continue;
            }

            ctx.solve_component(component);

            for target in ctx.relax_outgoing(component) {
                let key = if exact {
                    if ctx.layout.positions[target] <= ctx.layout.positions[component] {
                        debug!(
                            "Component {} precedes component {} in topological order, not entering",
                            target, component
                        );
                        continue;
                    }
                    if ctx.scheduled[target] {
                        continue;
                    }
                    ScheduleKey::Position(ctx.layout.positions[target])
                } else {
                    match ctx.entry_distance(target) {
                        Some(d) => ScheduleKey::Distance(d),
                        None => continue,
                    }
                };

                if !ctx.scheduled[target] {
                    ctx.scheduled[target] = true;
                    ctx.discovered_by[target] = Some(component);
                }
                worklist.insert(target, key);
            }
        }

        debug!(
            "Recursive Dijkstra from {}: solved {} of {} components, {} operations",
            source,
            ctx.solved.len(),
            count,
            ctx.counter.total()
        );

        Ok(ShortestPathResult {
            source,
            distances: distance_map(graph, &ctx.distances),
            predecessors: predecessor_map(graph, &ctx.predecessors),
            steps: ctx.trace.into_steps(),
            operations: ctx.counter,
        })
    }
}

impl<W> ShortestPathAlgorithm<W> for RecursiveDijkstra
where
    W: Float + Zero + Debug + Copy,
{
    fn name(&self) -> &'static str {
        "Recursive Dijkstra"
    }

    /// Builds the decomposition of `graph` and runs on it
    fn compute_shortest_paths(
        &self,
        graph: &DirectedGraph<W>,
        source: NodeId,
    ) -> Result<ShortestPathResult<W>> {
        if !graph.contains_node(source) {
            return Err(Error::InvalidSource(source));
        }
        let decomposition = build_decomposition(graph);
        self.run(graph, source, &decomposition)
    }
}
