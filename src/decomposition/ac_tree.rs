use crate::decomposition::condensation::CondensationGraph;
use crate::decomposition::dominator::{compute_dominators, DominatorTree};
use crate::decomposition::tarjan::strongly_connected_components;
use crate::graph::{DirectedGraph, Edge, Graph, Node, NodeId};
use crate::{Error, Result};
use log::debug;
use num_traits::{Float, One, Zero};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt::Debug;

/// A component placed at its level in the A-C tree
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AcTreeNode {
    /// Index of the component in the decomposition
    pub component: usize,
    pub label: String,
    /// Original nodes of the component
    pub members: Vec<NodeId>,
    /// Position of the component in the topological order
    pub level: usize,
    /// True for single-node components
    pub is_leaf: bool,
}

/// Parent -> child reachability between two components, with the levels it spans
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AcTreeEdge {
    pub parent: usize,
    pub child: usize,
    pub parent_level: usize,
    pub child_level: usize,
}

impl AcTreeEdge {
    /// Number of levels between parent and child
    pub fn span(&self) -> usize {
        self.child_level.saturating_sub(self.parent_level)
    }
}

/// The leveled component structure driving the recursive algorithm
///
/// Nodes are listed in topological order, so `nodes[level].level == level` for an
/// exact decomposition.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AcTree {
    pub nodes: Vec<AcTreeNode>,
    pub edges: Vec<AcTreeEdge>,
    /// Number of distinct levels
    pub levels: usize,
}

impl AcTree {
    /// Builds the tree from components and their topological order
    ///
    /// `members` holds the node ids of each component and `vertices` the same
    /// components as vertex positions of `graph`. Children are found by scanning the
    /// members' outgoing edges; each distinct target component is recorded once.
    pub fn build<W, G>(
        graph: &G,
        members: &[Vec<NodeId>],
        vertices: &[Vec<usize>],
        component_of: &[usize],
        order: &[usize],
    ) -> Result<Self>
    where
        W: Float + Zero + Debug + Copy,
        G: Graph<W>,
    {
        let count = members.len();
        if order.len() != count || vertices.len() != count {
            return Err(Error::DecompositionMismatch(format!(
                "{} components but {} ordered",
                count,
                order.len()
            )));
        }

        let mut level_of = vec![usize::MAX; count];
        for (level, &component) in order.iter().enumerate() {
            if component >= count || level_of[component] != usize::MAX {
                return Err(Error::DecompositionMismatch(format!(
                    "topological order is not a permutation of components (at {})",
                    component
                )));
            }
            level_of[component] = level;
        }

        let nodes = order
            .iter()
            .enumerate()
            .map(|(level, &component)| AcTreeNode {
                component,
                label: format!("SCC{}", component),
                members: members[component].clone(),
                level,
                is_leaf: members[component].len() == 1,
            })
            .collect();

        let mut edges = Vec::new();
        for &parent in order {
            let mut children = HashSet::new();
            for &u in &vertices[parent] {
                for (v, _) in graph.outgoing_edges(u) {
                    let child = match component_of.get(v) {
                        Some(&child) if child != parent => child,
                        _ => continue,
                    };
                    if children.insert(child) {
                        edges.push(AcTreeEdge {
                            parent,
                            child,
                            parent_level: level_of[parent],
                            child_level: level_of[child],
                        });
                    }
                }
            }
        }

        Ok(AcTree {
            nodes,
            edges,
            levels: count,
        })
    }

    /// Tree for the fallback decomposition: every node alone at level 0
    pub fn singletons(node_ids: &[NodeId]) -> Self {
        let nodes = node_ids
            .iter()
            .enumerate()
            .map(|(component, &id)| AcTreeNode {
                component,
                label: format!("SCC{}", component),
                members: vec![id],
                level: 0,
                is_leaf: true,
            })
            .collect();

        AcTree {
            nodes,
            edges: Vec::new(),
            levels: if node_ids.is_empty() { 0 } else { 1 },
        }
    }

    /// Total member count per level
    pub fn level_sizes(&self) -> BTreeMap<usize, usize> {
        let mut sizes = BTreeMap::new();
        for node in &self.nodes {
            *sizes.entry(node.level).or_insert(0) += node.members.len();
        }
        sizes
    }

    /// Largest total member count over all levels, never less than 1
    pub fn nesting_width(&self) -> usize {
        self.level_sizes().values().copied().max().unwrap_or(0).max(1)
    }

    /// Tree node of a component, if present
    pub fn node_for(&self, component: usize) -> Option<&AcTreeNode> {
        self.nodes.iter().find(|node| node.component == component)
    }

    /// Children of a component in discovery order
    pub fn children(&self, component: usize) -> Vec<usize> {
        self.edges
            .iter()
            .filter(|edge| edge.parent == component)
            .map(|edge| edge.child)
            .collect()
    }
}

/// One dominator-tree node of a [`SourceAcTree`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DominatorAcNode {
    pub node: NodeId,
    /// Immediate dominator, `None` for the source
    pub parent: Option<NodeId>,
    /// Nodes immediately dominated by `node`
    pub children: Vec<NodeId>,
    /// The children grouped into strongly connected components of their child
    /// graph, in topological order; empty for a leaf
    pub components: Vec<Vec<NodeId>>,
}

impl DominatorAcNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// A-C tree rooted at a source node
///
/// The skeleton is the dominator tree of the part of the graph reachable from the
/// source. For every tree node `a`, its children form the child graph G_a: there is
/// an edge from child `x` to child `y` when some original edge runs from the
/// region dominated by `x` into the region dominated by `y`. The components of G_a
/// are stored in topological order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceAcTree {
    pub source: NodeId,
    /// Reachable nodes in reverse postorder, source first
    pub nodes: Vec<DominatorAcNode>,
}

impl SourceAcTree {
    /// Tree node for a node id, `None` if it is not reachable from the source
    pub fn node(&self, id: NodeId) -> Option<&DominatorAcNode> {
        self.nodes.iter().find(|node| node.node == id)
    }

    /// Number of reachable nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Largest component over all child graphs, never less than 1
    pub fn width(&self) -> usize {
        self.nodes
            .iter()
            .flat_map(|node| node.components.iter().map(Vec::len))
            .max()
            .unwrap_or(0)
            .max(1)
    }
}

/// Builds the A-C tree of `graph` rooted at `source`
///
/// Fails with [`Error::InvalidSource`] if `source` is not a node of the graph.
pub fn build_source_ac_tree<W>(graph: &DirectedGraph<W>, source: NodeId) -> Result<SourceAcTree>
where
    W: Float + Zero + Debug + Copy,
{
    let root = graph.index_of(source).ok_or(Error::InvalidSource(source))?;
    let adjacency = graph.adjacency();
    let dominators = compute_dominators(&adjacency, root)?;

    // Dominators precede the nodes they dominate in reverse postorder
    let mut depth = vec![0usize; graph.node_count()];
    for &v in dominators.reachable() {
        if let Some(parent) = dominators.immediate_dominator(v) {
            depth[v] = depth[parent] + 1;
        }
    }

    // Child graph edges keyed by their dominator-tree parent
    let mut child_edges: HashMap<usize, HashSet<(usize, usize)>> = HashMap::new();
    for &u in dominators.reachable() {
        for &(v, _) in adjacency.successors(u) {
            if let Some((parent, from, to)) = sibling_pair(&dominators, &depth, u, v) {
                child_edges.entry(parent).or_default().insert((from, to));
            }
        }
    }

    let mut nodes = Vec::with_capacity(dominators.reachable().len());
    for &a in dominators.reachable() {
        let children = dominators.children(a);
        let components = if children.is_empty() {
            Vec::new()
        } else {
            order_children::<W>(children, child_edges.get(&a))?
                .into_iter()
                .map(|group| group.into_iter().map(|v| graph.node_id(v)).collect())
                .collect()
        };

        nodes.push(DominatorAcNode {
            node: graph.node_id(a),
            parent: dominators.immediate_dominator(a).map(|p| graph.node_id(p)),
            children: children.iter().map(|&c| graph.node_id(c)).collect(),
            components,
        });
    }

    let tree = SourceAcTree { source, nodes };
    debug!(
        "Source A-C tree from {}: {} reachable nodes, width {}",
        source,
        tree.len(),
        tree.width()
    );
    Ok(tree)
}

/// For an edge `u -> v`, the siblings under their lowest common dominator whose
/// regions hold `u` and `v`
///
/// Returns `(parent, child holding u, child holding v)`, or `None` when one
/// endpoint dominates the other.
fn sibling_pair(
    tree: &DominatorTree,
    depth: &[usize],
    u: usize,
    v: usize,
) -> Option<(usize, usize, usize)> {
    if !tree.is_reachable(u) || !tree.is_reachable(v) {
        return None;
    }

    let (mut a, mut b) = (u, v);
    while depth[a] > depth[b] {
        a = tree.immediate_dominator(a)?;
    }
    while depth[b] > depth[a] {
        b = tree.immediate_dominator(b)?;
    }
    if a == b {
        return None;
    }

    loop {
        let (parent_a, parent_b) = (tree.immediate_dominator(a)?, tree.immediate_dominator(b)?);
        if parent_a == parent_b {
            return Some((parent_a, a, b));
        }
        a = parent_a;
        b = parent_b;
    }
}

/// Groups sibling vertices into strongly connected components of their child
/// graph and orders the groups topologically
fn order_children<W>(
    children: &[usize],
    edges: Option<&HashSet<(usize, usize)>>,
) -> Result<Vec<Vec<usize>>>
where
    W: Float + Zero + Debug + Copy,
{
    let local: HashMap<usize, usize> = children
        .iter()
        .enumerate()
        .map(|(i, &child)| (child, i))
        .collect();

    let nodes = children
        .iter()
        .enumerate()
        .map(|(i, &child)| Node::new(i, format!("{}", child)))
        .collect();
    let mut local_edges: Vec<Edge<W>> = Vec::new();
    if let Some(edges) = edges {
        for (from, to) in edges {
            if let (Some(&x), Some(&y)) = (local.get(from), local.get(to)) {
                local_edges.push(Edge::new(x, y, W::one()));
            }
        }
        // Hash order must not leak into the component order
        local_edges.sort_by_key(|edge| (edge.source, edge.target));
    }

    let child_graph = DirectedGraph::from_parts_unchecked(nodes, local_edges).adjacency();
    let mut groups = strongly_connected_components(&child_graph)?;
    for group in &mut groups {
        group.sort_unstable();
    }

    let mut component_of = vec![0; children.len()];
    for (component, members) in groups.iter().enumerate() {
        for &i in members {
            component_of[i] = component;
        }
    }
    let sizes: Vec<usize> = groups.iter().map(Vec::len).collect();
    let order = CondensationGraph::build(&child_graph, &component_of, &sizes).topological_order()?;

    Ok(order
        .into_iter()
        .map(|component| groups[component].iter().map(|&i| children[i]).collect())
        .collect())
}
