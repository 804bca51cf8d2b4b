//! Dominator tree of the part of a graph reachable from a root
//!
//! Uses the iterative data-flow formulation of Cooper, Harvey and Kennedy: vertices
//! are visited in reverse postorder and each immediate dominator is refined by
//! intersecting the dominator chains of the already processed predecessors until
//! nothing changes.

use crate::graph::Graph;
use crate::{Error, Result};
use num_traits::{Float, Zero};
use std::fmt::Debug;

/// Immediate dominators of every vertex reachable from `root`
///
/// Vertices are positions in the graph the tree was computed on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DominatorTree {
    root: usize,
    /// Immediate dominator per vertex; the root points at itself, unreachable vertices are `None`
    idom: Vec<Option<usize>>,
    /// Reachable vertices in reverse postorder, root first
    reverse_postorder: Vec<usize>,
    /// Children per vertex, in reverse postorder
    children: Vec<Vec<usize>>,
}

impl DominatorTree {
    pub fn root(&self) -> usize {
        self.root
    }

    /// Immediate dominator of a vertex; `None` for the root and for unreachable vertices
    pub fn immediate_dominator(&self, vertex: usize) -> Option<usize> {
        match self.idom.get(vertex).copied().flatten() {
            Some(parent) if vertex != self.root => Some(parent),
            _ => None,
        }
    }

    pub fn is_reachable(&self, vertex: usize) -> bool {
        matches!(self.idom.get(vertex), Some(Some(_)))
    }

    /// Reachable vertices in reverse postorder
    pub fn reachable(&self) -> &[usize] {
        &self.reverse_postorder
    }

    /// Vertices whose immediate dominator is `vertex`
    pub fn children(&self, vertex: usize) -> &[usize] {
        self.children.get(vertex).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of tree edges between `vertex` and the root, `None` if unreachable
    pub fn depth(&self, vertex: usize) -> Option<usize> {
        if !self.is_reachable(vertex) {
            return None;
        }
        let mut depth = 0;
        let mut current = vertex;
        while let Some(parent) = self.immediate_dominator(current) {
            depth += 1;
            current = parent;
        }
        Some(depth)
    }

    /// True if every path from the root to `b` passes through `a`
    pub fn dominates(&self, a: usize, b: usize) -> bool {
        if !self.is_reachable(a) || !self.is_reachable(b) {
            return false;
        }
        let mut current = b;
        loop {
            if current == a {
                return true;
            }
            match self.immediate_dominator(current) {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }
}

/// Computes the dominator tree of `graph` rooted at `root`
///
/// Fails if `root` is not a vertex of the graph or an edge leaves the vertex range.
pub fn compute_dominators<W, G>(graph: &G, root: usize) -> Result<DominatorTree>
where
    W: Float + Zero + Debug + Copy,
    G: Graph<W>,
{
    let n = graph.vertex_count();
    if root >= n {
        return Err(Error::DecompositionMismatch(format!(
            "dominator root {} outside of a graph with {} vertices",
            root, n
        )));
    }

    let postorder = depth_first_postorder(graph, root)?;

    // Postorder number per reachable vertex; the root gets the largest
    let mut number = vec![usize::MAX; n];
    for (i, &v) in postorder.iter().enumerate() {
        number[v] = i;
    }
    let reverse_postorder: Vec<usize> = postorder.iter().rev().copied().collect();

    let mut idom: Vec<Option<usize>> = vec![None; n];
    idom[root] = Some(root);

    let mut changed = true;
    while changed {
        changed = false;
        for &v in reverse_postorder.iter().skip(1) {
            let mut new_idom: Option<usize> = None;
            for (p, _) in graph.incoming_edges(v) {
                if p >= n || idom[p].is_none() {
                    continue;
                }
                new_idom = Some(match new_idom {
                    None => p,
                    Some(current) => intersect(&idom, &number, p, current),
                });
            }

            if new_idom.is_some() && new_idom != idom[v] {
                idom[v] = new_idom;
                changed = true;
            }
        }
    }

    let mut children = vec![Vec::new(); n];
    for &v in reverse_postorder.iter().skip(1) {
        if let Some(parent) = idom[v] {
            children[parent].push(v);
        }
    }

    Ok(DominatorTree {
        root,
        idom,
        reverse_postorder,
        children,
    })
}

// Walks both fingers up the partial tree until they meet
fn intersect(idom: &[Option<usize>], number: &[usize], a: usize, b: usize) -> usize {
    let (mut a, mut b) = (a, b);
    while a != b {
        while number[a] < number[b] {
            a = idom[a].unwrap_or(a);
        }
        while number[b] < number[a] {
            b = idom[b].unwrap_or(b);
        }
    }
    a
}

fn depth_first_postorder<W, G>(graph: &G, root: usize) -> Result<Vec<usize>>
where
    W: Float + Zero + Debug + Copy,
    G: Graph<W>,
{
    let n = graph.vertex_count();
    let mut visited = vec![false; n];
    let mut postorder = Vec::new();

    visited[root] = true;
    let mut frames = vec![(root, graph.outgoing_edges(root))];

    while let Some(frame) = frames.last_mut() {
        let v = frame.0;
        match frame.1.next() {
            Some((w, _)) => {
                if w >= n {
                    return Err(Error::DecompositionMismatch(format!(
                        "edge from vertex {} to vertex {} outside of the graph",
                        v, w
                    )));
                }
                if !visited[w] {
                    visited[w] = true;
                    frames.push((w, graph.outgoing_edges(w)));
                }
            }
            None => {
                frames.pop();
                postorder.push(v);
            }
        }
    }

    Ok(postorder)
}
