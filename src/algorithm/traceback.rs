//! Reconstruction of an optimal Steiner tree from the back-pointer table.

use crate::algorithm::emv::TracebackTables;
use crate::graph::SteinerIndex;
use crate::Weight;

fn weight_of(index: &SteinerIndex, u: usize, v: usize) -> Weight {
    index
        .edge_weight(u, v)
        .expect("back-pointer refers to a pair with no graph edge")
}

/// Follows a Dijkstra parent chain from `target` back to its source,
/// emitting one graph edge per hop. Used for the two-terminal shortcut.
pub(crate) fn trace_path(
    index: &SteinerIndex,
    target: usize,
    parent: &[Option<usize>],
) -> Vec<(usize, usize, Weight)> {
    let mut edges = Vec::new();
    let mut v = target;
    while let Some(u) = parent[v] {
        edges.push((v, u, weight_of(index, v, u)));
        v = u;
    }
    edges
}

/// Expands the back-pointer table into the edge list of an optimal tree.
///
/// Work-stack walk over (vertex, mask) entries: a `(u, X)` pointer with
/// `u != v` contributes the edge (v, u) and continues at `u`; a split
/// pointer `(v, X')` forks into the two submask subtrees. A singleton mask
/// is a shortest path from its terminal, expanded hop by hop along the
/// terminal's singleton Dijkstra parents.
pub(crate) fn build_tree(
    index: &SteinerIndex,
    tables: &TracebackTables,
    q: usize,
    c_mask: u32,
) -> Vec<(usize, usize, Weight)> {
    let n = index.num_vertices();
    let mut edges = Vec::new();
    let mut stack = vec![(q, c_mask)];
    while let Some((v, x)) = stack.pop() {
        if x == 0 {
            continue;
        }
        if x.count_ones() == 1 {
            let i = x.trailing_zeros() as usize;
            edges.extend(trace_path(index, v, &tables.singleton_parents[i]));
            continue;
        }
        let Some((u, xd)) = tables.back.get((x as usize) * n + v) else {
            continue;
        };
        if u != v {
            edges.push((v, u, weight_of(index, v, u)));
            stack.push((u, xd));
        } else if xd != x {
            stack.push((v, xd));
            stack.push((v, x & !xd));
        }
    }
    edges
}
