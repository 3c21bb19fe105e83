//! The Erickson-Monma-Veinott dynamic program.
//!
//! `f[X][v]` is the minimum weight of a tree spanning terminal subset `X`
//! plus vertex `v`. Layer by popcount: singletons come from one Dijkstra per
//! terminal; every larger mask is the minimum of a combine step (split the
//! terminal set at `v`) and a relax step (reach `v` by a shortest path from
//! the best split vertex, computed in a single Dijkstra from a virtual
//! source whose edge weights are the current `f[X][·]` vector).

use std::time::Instant;

use log::{debug, info};
use rayon::prelude::*;

use crate::algorithm::dijkstra::{dijkstra, DijkstraScratch};
use crate::algorithm::traceback;
use crate::data_structures::{masks_of_popcount, proper_nonempty_submasks};
use crate::graph::{Adjacency, SteinerIndex, WorkerView};
use crate::{Result, Weight, INF};

/// Solver configuration.
#[derive(Debug, Clone)]
pub struct SolverOptions {
    workers: usize,
    traceback: bool,
}

impl SolverOptions {
    /// Defaults: one worker per available hardware thread, no traceback.
    pub fn new() -> Self {
        let workers = std::thread::available_parallelism()
            .map(|p| p.get())
            .unwrap_or(1);
        SolverOptions {
            workers,
            traceback: false,
        }
    }

    /// Sets the number of workers (and virtual-source slots).
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Requests reconstruction of an optimal tree, not just its cost.
    pub fn with_traceback(mut self, traceback: bool) -> Self {
        self.traceback = traceback;
        self
    }

    /// Returns the configured worker count.
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Returns whether traceback was requested.
    pub fn traceback(&self) -> bool {
        self.traceback
    }
}

impl Default for SolverOptions {
    fn default() -> Self {
        SolverOptions::new()
    }
}

/// Outcome of a solve.
///
/// `cost` is [`INF`] when no connected subgraph spans all terminals. `edges`
/// is empty unless traceback was requested and the instance is feasible;
/// each entry carries the original graph weight of the edge.
#[derive(Debug, Clone)]
pub struct SteinerSolution {
    pub cost: Weight,
    pub edges: Vec<(usize, usize, Weight)>,
}

/// Back-pointer table recording, per (mask, vertex) entry, how an optimal
/// tree witnessing `f[X][v]` is assembled: `(u, X)` with `u != v` means `v`
/// hangs off `u` by a graph edge; `(v, X')` means the tree splits at `v`
/// into the subtrees for `X'` and `X \ X'`.
#[derive(Debug)]
pub(crate) struct BackPointers {
    parent: Vec<i64>,
    split: Vec<u32>,
}

impl BackPointers {
    fn new(len: usize) -> Self {
        BackPointers {
            parent: vec![-1; len],
            split: vec![0; len],
        }
    }

    /// Entry at flat index `X * n + v`, or `None` if unset.
    pub(crate) fn get(&self, idx: usize) -> Option<(usize, u32)> {
        let u = self.parent[idx];
        if u < 0 {
            None
        } else {
            Some((u as usize, self.split[idx]))
        }
    }

    fn set_range(&mut self, base: usize, entries: &[(i64, u32)]) {
        for (i, &(u, x)) in entries.iter().enumerate() {
            self.parent[base + i] = u;
            self.split[base + i] = x;
        }
    }
}

/// Everything the traceback needs beyond the cost: the back-pointer table
/// and, per terminal, the parent vector of its singleton Dijkstra (used to
/// expand singleton subtrees into real edges).
#[derive(Debug)]
pub(crate) struct TracebackTables {
    pub(crate) back: BackPointers,
    pub(crate) singleton_parents: Vec<Vec<Option<usize>>>,
}

impl TracebackTables {
    fn new(entries: usize, k: usize) -> Self {
        TracebackTables {
            back: BackPointers::new(entries),
            singleton_parents: vec![Vec::new(); k],
        }
    }
}

/// Per-worker state for the kernel: the worker's index view (with its own
/// virtual-source slot), its Dijkstra scratch, and the buffer of finished
/// masks awaiting the merge at the layer barrier.
struct WorkerState<'a> {
    view: WorkerView<'a>,
    scratch: DijkstraScratch,
    out: Vec<MaskResult>,
}

/// One finalised mask, produced by a worker, merged into `f` (and the
/// back-pointer table) after the layer's join point.
struct MaskResult {
    mask: u32,
    dist: Vec<Weight>,
    back: Option<Vec<(i64, u32)>>,
    /// Singleton phase only: parent vector of the terminal's Dijkstra.
    parents: Option<Vec<Option<usize>>>,
}

/// Solves the Steiner tree problem on a built index.
///
/// Runs the EMV kernel with the worker count the index was built for.
/// Returns the optimum cost, plus an optimal edge list when
/// [`SolverOptions::with_traceback`] was requested.
pub fn solve(index: &mut SteinerIndex, opts: &SolverOptions) -> Result<SteinerSolution> {
    let n = index.num_vertices();
    let k = index.num_terminals();
    let start = Instant::now();

    // A pair of terminals needs no DP: one Dijkstra gives the shortest
    // path, which is the optimal Steiner tree.
    if k == 2 {
        let t0 = index.terminals()[0];
        let t1 = index.terminals()[1];
        let mut scratch = DijkstraScratch::new(index.universe());
        dijkstra(&*index, t0, &mut scratch);
        let cost = scratch.dist[t1];
        let edges = if opts.traceback && cost < INF {
            traceback::trace_path(index, t1, &scratch.parent)
        } else {
            Vec::new()
        };
        info!("k = 2 shortcut done in {:.2?}, cost = {cost}", start.elapsed());
        return Ok(SteinerSolution { cost, edges });
    }

    let full = 1usize << k;
    let mut f = vec![INF; n * full];
    let mut tables = if opts.traceback {
        Some(TracebackTables::new(n * full, k))
    } else {
        None
    };

    let cost = emv_kernel(index, &mut f, tables.as_mut());
    info!("kernel done in {:.2?}, cost = {cost}", start.elapsed());

    let edges = match &tables {
        Some(tables) if cost < INF => {
            let q = index.root_terminal();
            let c_mask = (1u32 << (k - 1)) - 1;
            let tb_start = Instant::now();
            let edges = traceback::build_tree(index, tables, q, c_mask);
            debug!("traceback done in {:.2?}, {} edges", tb_start.elapsed(), edges.len());
            edges
        }
        _ => Vec::new(),
    };

    Ok(SteinerSolution { cost, edges })
}

/// The DP kernel proper. `f` must hold `n * 2^k` entries initialised to
/// [`INF`]. Returns `f[C][q]` for the root terminal `q` and the full mask
/// `C` over the other `k - 1` terminals.
fn emv_kernel(
    index: &mut SteinerIndex,
    f: &mut [Weight],
    mut tables: Option<&mut TracebackTables>,
) -> Weight {
    let n = index.num_vertices();
    let k = index.num_terminals();
    let workers = index.workers();
    let universe = n + workers;
    let terminals = index.terminals().to_vec();
    let q = terminals[k - 1];
    let c_mask = (1u32 << (k - 1)) - 1;
    let track = tables.is_some();

    let mut states: Vec<WorkerState<'_>> = index
        .worker_views()
        .into_iter()
        .map(|view| WorkerState {
            view,
            scratch: DijkstraScratch::new(universe),
            out: Vec::new(),
        })
        .collect();

    // Singleton layer: one Dijkstra per terminal, terminals partitioned
    // across workers.
    let layer_start = Instant::now();
    let terminal_idxs: Vec<usize> = (0..k).collect();
    let chunk = (k + workers - 1) / workers;
    states
        .par_iter_mut()
        .zip(terminal_idxs.par_chunks(chunk))
        .for_each(|(st, idxs)| {
            for &i in idxs {
                dijkstra(&st.view, terminals[i], &mut st.scratch);
                st.out.push(MaskResult {
                    mask: 1u32 << i,
                    dist: st.scratch.dist[..n].to_vec(),
                    back: track.then(|| vec![(terminals[i] as i64, 1u32 << i); n]),
                    parents: track.then(|| st.scratch.parent[..n].to_vec()),
                });
            }
        });
    merge_layer(&mut states, n, f, &mut tables);
    debug!("singleton layer: {k} masks in {:.2?}", layer_start.elapsed());

    // Larger masks by increasing popcount. The merge after each parallel
    // loop is the hard barrier between layers: every f[X] of popcount m is
    // final before any mask of popcount m + 1 is touched.
    for m in 2..=k {
        let layer_start = Instant::now();
        let masks: Vec<u32> = masks_of_popcount(k as u32, m as u32).collect();
        let chunk = (masks.len() + workers - 1) / workers;
        {
            let f_read: &[Weight] = f;
            states
                .par_iter_mut()
                .zip(masks.par_chunks(chunk))
                .for_each(|(st, ms)| {
                    for &x in ms {
                        process_mask(st, x, &terminals, f_read, track, n);
                    }
                });
        }
        merge_layer(&mut states, n, f, &mut tables);
        debug!(
            "layer m = {m}: {} masks in {:.2?}",
            masks.len(),
            layer_start.elapsed()
        );
    }

    f[(c_mask as usize) * n + q]
}

/// Computes `f[X][·]` for one mask: combine over proper submask splits,
/// then relax by shortest paths from the worker's virtual source.
fn process_mask(
    st: &mut WorkerState<'_>,
    x: u32,
    terminals: &[usize],
    f: &[Weight],
    track: bool,
    n: usize,
) {
    let mut fx = vec![INF; n];
    let mut back = if track {
        Some(vec![(-1i64, 0u32); n])
    } else {
        None
    };

    // Combine: split the terminal set at v. Each unordered split is seen
    // from both sides; both passes are needed since the scan covers all v.
    for xd in proper_nonempty_submasks(x) {
        let x_rest = x & !xd;
        let f_xd = &f[(xd as usize) * n..(xd as usize) * n + n];
        let f_rest = &f[(x_rest as usize) * n..(x_rest as usize) * n + n];
        for v in 0..n {
            let split_cost = f_xd[v].saturating_add(f_rest[v]);
            if split_cost < fx[v] {
                fx[v] = split_cost;
                if let Some(back) = back.as_mut() {
                    back[v] = (v as i64, xd);
                }
            }
        }
    }

    // Relax: the virtual source reaches every vertex at its combined cost,
    // and reaches each terminal of X at the cost of the tree that does not
    // yet include it, so a path may start at that terminal without paying
    // its bit twice.
    for (v, &w) in fx.iter().enumerate() {
        st.view.set_source_weight(v, w);
    }
    for (i, &t) in terminals.iter().enumerate() {
        if x & (1u32 << i) == 0 {
            continue;
        }
        let without = (x & !(1u32 << i)) as usize;
        st.view.set_source_weight(t, f[without * n + t]);
    }
    let s = st.view.slot_vertex();
    dijkstra(&st.view, s, &mut st.scratch);
    for v in 0..n {
        fx[v] = st.scratch.dist[v];
        if let Some(back) = back.as_mut() {
            if let Some(u) = st.scratch.parent[v] {
                if u != s {
                    back[v] = (u as i64, x);
                }
            }
        }
    }

    #[cfg(debug_assertions)]
    {
        // A tree spanning X and v contains a path from every terminal of X
        // to v, and never beats the tree that drops one terminal.
        for (i, &t) in terminals.iter().enumerate() {
            if x & (1u32 << i) != 0 {
                let without = (x & !(1u32 << i)) as usize;
                debug_assert!(fx[t] <= f[without * n + t]);
                for v in 0..n {
                    debug_assert!(fx[v] >= f[(1usize << i) * n + v]);
                }
            }
        }
    }

    st.out.push(MaskResult {
        mask: x,
        dist: fx,
        back,
        parents: None,
    });
}

/// Drains every worker's finished masks into the DP tables. Runs after the
/// layer's join point, so it is the only writer.
fn merge_layer(
    states: &mut [WorkerState<'_>],
    n: usize,
    f: &mut [Weight],
    tables: &mut Option<&mut TracebackTables>,
) {
    for st in states.iter_mut() {
        for r in st.out.drain(..) {
            let base = (r.mask as usize) * n;
            f[base..base + n].copy_from_slice(&r.dist);
            if let Some(tables) = tables.as_mut() {
                if let Some(back) = &r.back {
                    tables.back.set_range(base, back);
                }
                if let Some(parents) = r.parents {
                    tables.singleton_parents[r.mask.trailing_zeros() as usize] = parents;
                }
            }
        }
    }
}
