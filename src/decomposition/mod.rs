//! Strongly connected component decomposition and the A-C tree built on top of it
//!
//! [`build_decomposition`] runs Tarjan's algorithm, condenses the components into a
//! DAG, orders that DAG topologically and levels the components into an [`AcTree`].
//! It never fails: if any stage reports a defect, a degraded decomposition with one
//! singleton component per node is returned instead and flagged as such.
//!
//! [`build_source_ac_tree`] is the source-rooted variant: it builds the dominator
//! tree of the reachable part and orders each node's children by the components
//! of their child graph.

pub mod ac_tree;
pub mod condensation;
pub mod dominator;
pub mod tarjan;

pub use ac_tree::{
    build_source_ac_tree, AcTree, AcTreeEdge, AcTreeNode, DominatorAcNode, SourceAcTree,
};
pub use condensation::{CondensationEdge, CondensationGraph, CondensationNode};
pub use dominator::{compute_dominators, DominatorTree};

use crate::graph::{DirectedGraph, Graph, NodeId};
use crate::{Error, Result};
use log::{info, warn};
use num_traits::{Float, Zero};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt::Debug;

/// A strongly connected component
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Component {
    /// Position of the component in [`Decomposition::components`]
    pub index: usize,
    /// Node ids belonging to the component
    pub members: Vec<NodeId>,
}

impl Component {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// True when the component has a single member
    pub fn is_singleton(&self) -> bool {
        self.members.len() == 1
    }
}

/// How a decomposition was obtained
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum DecompositionMode {
    /// Real SCC decomposition with a valid topological order
    Exact,
    /// Singleton fallback substituted after a construction defect
    Degraded { reason: String },
}

/// Components, condensation DAG, topological order and A-C tree of one graph
#[derive(Debug, Clone, Serialize)]
pub struct Decomposition {
    /// Components in Tarjan emission order
    pub components: Vec<Component>,
    pub condensation: CondensationGraph,
    /// Component indices in topological order
    pub topological_order: Vec<usize>,
    pub ac_tree: AcTree,
    pub nesting_width: usize,
    pub mode: DecompositionMode,

    /// Node id -> component index
    #[serde(skip)]
    component_of: HashMap<NodeId, usize>,

    /// Component index -> position in `topological_order`
    #[serde(skip)]
    positions: Vec<usize>,
}

impl Decomposition {
    fn assemble(
        components: Vec<Component>,
        condensation: CondensationGraph,
        topological_order: Vec<usize>,
        ac_tree: AcTree,
        mode: DecompositionMode,
    ) -> Self {
        let component_of = components
            .iter()
            .flat_map(|c| c.members.iter().map(move |&id| (id, c.index)))
            .collect();

        let mut positions = vec![0; components.len()];
        for (position, &component) in topological_order.iter().enumerate() {
            positions[component] = position;
        }

        let nesting_width = ac_tree.nesting_width();

        Decomposition {
            components,
            condensation,
            topological_order,
            ac_tree,
            nesting_width,
            mode,
            component_of,
            positions,
        }
    }

    /// Singleton decomposition: every node is its own component at level 0
    ///
    /// The topological order is simply node order and carries no dependency
    /// information, so its nesting width equals the node count.
    pub fn fallback<W>(graph: &DirectedGraph<W>, reason: impl Into<String>) -> Self
    where
        W: Float + Zero + Debug + Copy,
    {
        let ids: Vec<NodeId> = graph.nodes().iter().map(|node| node.id).collect();
        let components: Vec<Component> = ids
            .iter()
            .enumerate()
            .map(|(index, &id)| Component {
                index,
                members: vec![id],
            })
            .collect();
        let condensation = CondensationGraph {
            nodes: components
                .iter()
                .map(|c| CondensationNode {
                    component: c.index,
                    label: format!("SCC{}", c.index),
                    size: 1,
                })
                .collect(),
            edges: Vec::new(),
        };
        let topological_order = (0..components.len()).collect();
        let ac_tree = AcTree::singletons(&ids);

        Self::assemble(
            components,
            condensation,
            topological_order,
            ac_tree,
            DecompositionMode::Degraded {
                reason: reason.into(),
            },
        )
    }

    /// Component index owning a node
    pub fn component_of(&self, node: NodeId) -> Option<usize> {
        self.component_of.get(&node).copied()
    }

    /// Position of a component in the topological order
    pub fn topological_position(&self, component: usize) -> Option<usize> {
        self.positions.get(component).copied()
    }

    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// Components with more than one member
    pub fn nontrivial_components(&self) -> impl Iterator<Item = &Component> {
        self.components.iter().filter(|c| c.len() > 1)
    }

    pub fn levels(&self) -> usize {
        self.ac_tree.levels
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self.mode, DecompositionMode::Degraded { .. })
    }
}

/// Decomposes a graph, falling back to singletons on any internal defect
pub fn build_decomposition<W>(graph: &DirectedGraph<W>) -> Decomposition
where
    W: Float + Zero + Debug + Copy,
{
    build_decomposition_with(graph, &graph.adjacency())
}

/// Decomposes `graph` using `view` for its edge structure
///
/// `view` must address vertices by the node positions of `graph`.
pub fn build_decomposition_with<W, G>(graph: &DirectedGraph<W>, view: &G) -> Decomposition
where
    W: Float + Zero + Debug + Copy,
    G: Graph<W>,
{
    match try_decompose(graph, view) {
        Ok(decomposition) => {
            info!(
                "Decomposed {} nodes into {} components ({} non-trivial), nesting width {}",
                graph.node_count(),
                decomposition.component_count(),
                decomposition.nontrivial_components().count(),
                decomposition.nesting_width
            );
            decomposition
        }
        Err(error) => {
            warn!("A-C tree construction failed, using singleton fallback: {}", error);
            Decomposition::fallback(graph, error.to_string())
        }
    }
}

fn try_decompose<W, G>(graph: &DirectedGraph<W>, view: &G) -> Result<Decomposition>
where
    W: Float + Zero + Debug + Copy,
    G: Graph<W>,
{
    let n = graph.node_count();
    if view.vertex_count() != n {
        return Err(Error::DecompositionMismatch(format!(
            "view has {} vertices, graph has {} nodes",
            view.vertex_count(),
            n
        )));
    }

    let vertices = tarjan::strongly_connected_components(view)?;

    let mut component_of = vec![usize::MAX; n];
    for (component, members) in vertices.iter().enumerate() {
        for &v in members {
            if component_of[v] != usize::MAX {
                return Err(Error::DecompositionMismatch(format!(
                    "node {} assigned to two components",
                    graph.node_id(v)
                )));
            }
            component_of[v] = component;
        }
    }
    if let Some(v) = component_of.iter().position(|&c| c == usize::MAX) {
        return Err(Error::DecompositionMismatch(format!(
            "node {} not assigned to any component",
            graph.node_id(v)
        )));
    }

    let members: Vec<Vec<NodeId>> = vertices
        .iter()
        .map(|vs| vs.iter().map(|&v| graph.node_id(v)).collect())
        .collect();
    let sizes: Vec<usize> = vertices.iter().map(|vs| vs.len()).collect();

    let condensation = CondensationGraph::build(view, &component_of, &sizes);
    let topological_order = condensation.topological_order()?;
    let ac_tree = AcTree::build(view, &members, &vertices, &component_of, &topological_order)?;

    let components = members
        .into_iter()
        .enumerate()
        .map(|(index, members)| Component { index, members })
        .collect();

    Ok(Decomposition::assemble(
        components,
        condensation,
        topological_order,
        ac_tree,
        DecompositionMode::Exact,
    ))
}
