//! Tarjan's strongly connected components
//!
//! Iterative formulation of the classical index / low-link / on-stack algorithm.
//! Components are emitted in the order their roots finish, which is the same
//! order the recursive version produces: if component X can reach component Y,
//! Y is emitted before X.

use crate::graph::Graph;
use crate::{Error, Result};
use num_traits::{Float, Zero};
use std::fmt::Debug;

const UNVISITED: usize = usize::MAX;

/// Finds the strongly connected components of a graph
///
/// Every vertex appears in exactly one component. Members of a component are
/// listed in the order they were popped off the active stack.
///
/// Fails only when the graph reports an edge to a vertex outside its range.
pub fn strongly_connected_components<W, G>(graph: &G) -> Result<Vec<Vec<usize>>>
where
    W: Float + Zero + Debug + Copy,
    G: Graph<W>,
{
    let n = graph.vertex_count();
    let mut index = vec![UNVISITED; n];
    let mut low_link = vec![0; n];
    let mut on_stack = vec![false; n];
    let mut stack = Vec::new();
    let mut next_index = 0;
    let mut components = Vec::new();

    for root in 0..n {
        if index[root] != UNVISITED {
            continue;
        }

        index[root] = next_index;
        low_link[root] = next_index;
        next_index += 1;
        stack.push(root);
        on_stack[root] = true;

        // Explicit DFS frames: (vertex, remaining outgoing edges)
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

                    if index[w] == UNVISITED {
                        index[w] = next_index;
                        low_link[w] = next_index;
                        next_index += 1;
                        stack.push(w);
                        on_stack[w] = true;
                        frames.push((w, graph.outgoing_edges(w)));
                    } else if on_stack[w] {
                        low_link[v] = low_link[v].min(index[w]);
                    }
                }
                None => {
                    frames.pop();
                    if let Some((parent, _)) = frames.last() {
                        let parent = *parent;
                        low_link[parent] = low_link[parent].min(low_link[v]);
                    }

                    if low_link[v] == index[v] {
                        let mut component = Vec::new();
                        while let Some(u) = stack.pop() {
                            on_stack[u] = false;
                            component.push(u);
                            if u == v {
                                break;
                            }
                        }
                        components.push(component);
                    }
                }
            }
        }
    }

    Ok(components)
}
