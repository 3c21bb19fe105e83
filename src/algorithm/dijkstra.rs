use crate::data_structures::IndexedHeap;
use crate::graph::Adjacency;
use crate::{Weight, INF};

/// Caller-provided scratch for [`dijkstra`]: one distance, visited and
/// parent entry per vertex of the universe, plus the heap.
///
/// The solver allocates one scratch per worker and reuses it across every
/// Dijkstra call of a solve.
#[derive(Debug)]
pub struct DijkstraScratch {
    /// Shortest known distance from the source, [`INF`] if unreached.
    pub dist: Vec<Weight>,
    /// Whether the vertex was extracted from the heap.
    pub visited: Vec<bool>,
    /// Predecessor on a shortest path, `None` for the source and for
    /// unreachable vertices.
    pub parent: Vec<Option<usize>>,
    heap: IndexedHeap,
}

impl DijkstraScratch {
    /// Creates scratch for a universe of `universe` vertices.
    pub fn new(universe: usize) -> Self {
        DijkstraScratch {
            dist: vec![INF; universe],
            visited: vec![false; universe],
            parent: vec![None; universe],
            heap: IndexedHeap::with_capacity(universe),
        }
    }
}

/// Single-source shortest paths over every vertex of `graph`'s universe.
///
/// Classic eager Dijkstra: all vertices enter the heap up front at key
/// [`INF`] (the source at 0), extraction marks a vertex visited, and each
/// strict improvement through an edge decreases the key and records the
/// parent. Ties never update, so the first settled path wins.
///
/// Infinity is absorbing: a vertex extracted at [`INF`] is unreachable and
/// its edges are not scanned, and edge relaxation saturates, so `INF`-weight
/// virtual edges can never produce a finite distance. Negative weights are
/// rejected upstream and are undefined behaviour here.
pub fn dijkstra<A: Adjacency>(graph: &A, source: usize, scratch: &mut DijkstraScratch) {
    let universe = graph.universe();
    debug_assert_eq!(scratch.dist.len(), universe);
    debug_assert!(source < universe);
    debug_assert!(scratch.heap.is_empty());

    for v in 0..universe {
        scratch.dist[v] = INF;
        scratch.visited[v] = false;
        scratch.parent[v] = None;
    }
    scratch.dist[source] = 0;
    for v in 0..universe {
        scratch.heap.insert(v, scratch.dist[v]);
    }

    while let Some((u, d_u)) = scratch.heap.delete_min() {
        scratch.visited[u] = true;
        if d_u == INF {
            // Everything still on the heap is unreachable.
            continue;
        }
        for pair in graph.pairs(u).chunks_exact(2) {
            let v = pair[0] as usize;
            let d_v = d_u.saturating_add(pair[1]);
            if !scratch.visited[v] && d_v < scratch.dist[v] {
                scratch.dist[v] = d_v;
                scratch.parent[v] = Some(u);
                scratch.heap.decrease_key(v, d_v);
            }
        }
    }
}
