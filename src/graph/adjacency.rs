use crate::graph::directed::DirectedGraph;
use crate::graph::traits::Graph;
use num_traits::{Float, Zero};
use std::fmt::Debug;

/// Forward and reverse adjacency lists derived from a [`DirectedGraph`]
///
/// Vertices are the positions of the nodes in the source graph.
#[derive(Debug, Clone)]
pub struct AdjacencyList<W>
where
    W: Float + Zero + Debug + Copy,
{
    /// Outgoing edges for each vertex: vertex -> [(target_vertex, weight)]
    outgoing: Vec<Vec<(usize, W)>>,

    /// Incoming edges for each vertex: vertex -> [(source_vertex, weight)]
    incoming: Vec<Vec<(usize, W)>>,

    edge_count: usize,
}

impl<W> AdjacencyList<W>
where
    W: Float + Zero + Debug + Copy,
{
    /// Builds both adjacency directions, keeping edge insertion order per vertex
    pub fn from_graph(graph: &DirectedGraph<W>) -> Self {
        let n = graph.node_count();
        let mut outgoing = vec![Vec::new(); n];
        let mut incoming = vec![Vec::new(); n];

        for edge in graph.edges() {
            // Endpoints were checked when the graph was built
            let endpoints = (graph.index_of(edge.source), graph.index_of(edge.target));
            if let (Some(from), Some(to)) = endpoints {
                outgoing[from].push((to, edge.weight));
                incoming[to].push((from, edge.weight));
            }
        }

        AdjacencyList {
            outgoing,
            incoming,
            edge_count: graph.edge_count(),
        }
    }

    /// Outgoing edges of a vertex as a slice
    pub fn successors(&self, vertex: usize) -> &[(usize, W)] {
        self.outgoing.get(vertex).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Incoming edges of a vertex as a slice
    pub fn predecessors(&self, vertex: usize) -> &[(usize, W)] {
        self.incoming.get(vertex).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl<W> Graph<W> for AdjacencyList<W>
where
    W: Float + Zero + Debug + Copy,
{
    fn vertex_count(&self) -> usize {
        self.outgoing.len()
    }

    fn edge_count(&self) -> usize {
        self.edge_count
    }

    fn outgoing_edges(&self, vertex: usize) -> Box<dyn Iterator<Item = (usize, W)> + '_> {
        Box::new(self.successors(vertex).iter().copied())
    }

    fn incoming_edges(&self, vertex: usize) -> Box<dyn Iterator<Item = (usize, W)> + '_> {
        Box::new(self.predecessors(vertex).iter().copied())
    }

    fn has_vertex(&self, vertex: usize) -> bool {
        vertex < self.outgoing.len()
    }
}

/// View of the subgraph induced by one component of a vertex partition
///
/// Vertices keep their positions in the parent graph; only edges with both
/// endpoints inside the component are visible.
#[derive(Debug, Clone, Copy)]
pub struct InducedSubgraph<'a, W>
where
    W: Float + Zero + Debug + Copy,
{
    parent: &'a AdjacencyList<W>,

    /// Component index of every parent vertex
    component_of: &'a [usize],

    component: usize,

    members: &'a [usize],
}

impl<'a, W> InducedSubgraph<'a, W>
where
    W: Float + Zero + Debug + Copy,
{
    pub fn new(
        parent: &'a AdjacencyList<W>,
        component_of: &'a [usize],
        component: usize,
        members: &'a [usize],
    ) -> Self {
        InducedSubgraph {
            parent,
            component_of,
            component,
            members,
        }
    }

    /// Vertices of the component, as parent positions
    pub fn members(&self) -> &'a [usize] {
        self.members
    }

    fn contains(&self, vertex: usize) -> bool {
        self.component_of.get(vertex) == Some(&self.component)
    }
}

impl<W> Graph<W> for InducedSubgraph<'_, W>
where
    W: Float + Zero + Debug + Copy,
{
    fn vertex_count(&self) -> usize {
        self.members.len()
    }

    fn edge_count(&self) -> usize {
        self.members
            .iter()
            .map(|&v| self.outgoing_edges(v).count())
            .sum()
    }

    fn outgoing_edges(&self, vertex: usize) -> Box<dyn Iterator<Item = (usize, W)> + '_> {
        if !self.contains(vertex) {
            return Box::new(std::iter::empty());
        }
        Box::new(
            self.parent
                .successors(vertex)
                .iter()
                .copied()
                .filter(move |(target, _)| self.contains(*target)),
        )
    }

    fn incoming_edges(&self, vertex: usize) -> Box<dyn Iterator<Item = (usize, W)> + '_> {
        if !self.contains(vertex) {
            return Box::new(std::iter::empty());
        }
        Box::new(
            self.parent
                .predecessors(vertex)
                .iter()
                .copied()
                .filter(move |(source, _)| self.contains(*source)),
        )
    }

    fn has_vertex(&self, vertex: usize) -> bool {
        self.contains(vertex)
    }
}
