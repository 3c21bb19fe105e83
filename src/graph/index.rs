use log::debug;

use crate::graph::instance::SteinerInstance;
use crate::{Result, Weight, INF};

/// Read access to a packed vertex universe: real vertices plus any virtual
/// source slots. Implemented by [`SteinerIndex`] and by the per-worker
/// [`WorkerView`], which is what the solver hands to Dijkstra.
pub trait Adjacency {
    /// Total number of vertices, real and virtual.
    fn universe(&self) -> usize;

    /// Packed (neighbour, weight) pairs of `u`: entry `2i` is the neighbour
    /// id, entry `2i + 1` its edge weight.
    fn pairs(&self, u: usize) -> &[i64];
}

/// The immutable adjacency index the solver runs on.
///
/// Layout is CSR-like with a twist: `adj[pos[u]]` holds the degree of `u`,
/// followed by that many (neighbour, weight) pairs. After the `n` real
/// vertices come `workers` virtual-source slots, one per solver worker, each
/// with an edge to every real vertex at weight [`INF`]. The DP kernel
/// rewrites its own slot's weights between Dijkstra calls; everything else
/// is frozen at build time.
#[derive(Debug, Clone)]
pub struct SteinerIndex {
    n: usize,
    m: usize,
    workers: usize,
    terminals: Vec<usize>,
    declared_cost: Option<Weight>,
    pos: Vec<usize>,
    adj: Vec<i64>,
}

impl SteinerIndex {
    /// Freezes an instance into the packed layout, with one virtual-source
    /// slot per worker. Fails if the instance violates the solver
    /// preconditions.
    ///
    /// The build is deterministic: identical input and worker count produce
    /// identical `pos` and `adj` contents. Within each vertex's list, edges
    /// appear in input order.
    pub fn build(instance: &SteinerInstance, workers: usize) -> Result<SteinerIndex> {
        instance.validate()?;
        let workers = workers.max(1);
        let n = instance.num_vertices();
        let m = instance.num_edges();
        let universe = n + workers;

        // Pass 1: count adjacency entries per vertex (two per incidence).
        let mut pos = vec![0usize; universe + 1];
        for &(u, v, _) in instance.edges() {
            pos[u] += 2;
            pos[v] += 2;
        }
        for s in 0..workers {
            pos[n + s] = 2 * n;
        }

        // Exclusive prefix sum, plus one slot per vertex for the degree
        // header.
        let mut run = 0usize;
        for u in 0..universe {
            let count = pos[u];
            pos[u] = run;
            run += count + 1;
        }
        pos[universe] = run;

        // Pass 2: scatter. The degree header doubles as the running cursor
        // and holds the final degree once all edges are placed.
        let mut adj = vec![0i64; run];
        for &(u, v, w) in instance.edges() {
            let pu = pos[u];
            let du = adj[pu] as usize;
            adj[pu + 1 + 2 * du] = v as i64;
            adj[pu + 2 + 2 * du] = w;
            adj[pu] += 1;

            let pv = pos[v];
            let dv = adj[pv] as usize;
            adj[pv + 1 + 2 * dv] = u as i64;
            adj[pv + 2 + 2 * dv] = w;
            adj[pv] += 1;
        }

        // Virtual source slots: an edge to every real vertex, weight
        // infinity until a worker claims the slot.
        for s in 0..workers {
            let p = pos[n + s];
            adj[p] = n as i64;
            for v in 0..n {
                adj[p + 1 + 2 * v] = v as i64;
                adj[p + 2 + 2 * v] = INF;
            }
        }

        debug!(
            "index built: n = {n}, m = {m}, k = {}, workers = {workers}, adj entries = {run}",
            instance.num_terminals()
        );

        Ok(SteinerIndex {
            n,
            m,
            workers,
            terminals: instance.terminals().to_vec(),
            declared_cost: instance.declared_cost(),
            pos,
            adj,
        })
    }

    /// Returns the number of real vertices.
    pub fn num_vertices(&self) -> usize {
        self.n
    }

    /// Returns the number of undirected edges.
    pub fn num_edges(&self) -> usize {
        self.m
    }

    /// Returns the number of terminals.
    pub fn num_terminals(&self) -> usize {
        self.terminals.len()
    }

    /// Returns the terminal list; the last entry is the DP root.
    pub fn terminals(&self) -> &[usize] {
        &self.terminals
    }

    /// Returns the root terminal `q`.
    pub fn root_terminal(&self) -> usize {
        *self.terminals.last().expect("validated instance has terminals")
    }

    /// Returns the number of virtual-source slots.
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Returns the optimum declared by the input, if any.
    pub fn declared_cost(&self) -> Option<Weight> {
        self.declared_cost
    }

    /// Returns the degree of a vertex (real or virtual).
    pub fn degree(&self, u: usize) -> usize {
        self.adj[self.pos[u]] as usize
    }

    /// Looks up the weight of the edge (u, v) among real vertices, scanning
    /// u's list in input order.
    pub fn edge_weight(&self, u: usize, v: usize) -> Option<Weight> {
        self.pairs(u)
            .chunks_exact(2)
            .find(|pair| pair[0] as usize == v)
            .map(|pair| pair[1])
    }

    /// Raw offset array, exposed for layout checks.
    pub fn pos(&self) -> &[usize] {
        &self.pos
    }

    /// Raw packed adjacency, exposed for layout checks.
    pub fn adj(&self) -> &[i64] {
        &self.adj
    }

    /// Splits the index into per-worker views. Each view reads the whole
    /// graph but owns the mutable weights of exactly one virtual-source
    /// slot, so workers can rewrite their slots concurrently without
    /// touching each other.
    pub fn worker_views(&mut self) -> Vec<WorkerView<'_>> {
        let n = self.n;
        let universe = n + self.workers;
        let slot_len = 1 + 2 * n;
        let (real, slots) = self.adj.split_at_mut(self.pos[n]);
        let real: &[i64] = real;
        let pos: &[usize] = &self.pos;
        slots
            .chunks_exact_mut(slot_len)
            .enumerate()
            .map(|(s, slot)| WorkerView {
                n,
                universe,
                pos,
                real,
                slot_vertex: n + s,
                slot,
            })
            .collect()
    }
}

impl Adjacency for SteinerIndex {
    fn universe(&self) -> usize {
        self.n + self.workers
    }

    fn pairs(&self, u: usize) -> &[i64] {
        let p = self.pos[u];
        let d = self.adj[p] as usize;
        &self.adj[p + 1..p + 1 + 2 * d]
    }
}

/// One worker's window onto the index: shared read access to the real
/// vertices, exclusive write access to the weights of its own virtual
/// source slot.
#[derive(Debug)]
pub struct WorkerView<'a> {
    n: usize,
    universe: usize,
    pos: &'a [usize],
    real: &'a [i64],
    slot_vertex: usize,
    slot: &'a mut [i64],
}

impl WorkerView<'_> {
    /// Returns the vertex id of this worker's virtual source.
    pub fn slot_vertex(&self) -> usize {
        self.slot_vertex
    }

    /// Returns the number of real vertices.
    pub fn num_vertices(&self) -> usize {
        self.n
    }

    /// Rewrites the outgoing weight from this worker's virtual source to
    /// real vertex `v`.
    pub fn set_source_weight(&mut self, v: usize, w: Weight) {
        debug_assert!(v < self.n);
        self.slot[2 + 2 * v] = w;
    }
}

impl Adjacency for WorkerView<'_> {
    fn universe(&self) -> usize {
        self.universe
    }

    fn pairs(&self, u: usize) -> &[i64] {
        if u < self.n {
            let p = self.pos[u];
            let d = self.real[p] as usize;
            &self.real[p + 1..p + 1 + 2 * d]
        } else if u == self.slot_vertex {
            let d = self.slot[0] as usize;
            &self.slot[1..1 + 2 * d]
        } else {
            // Another worker's slot. It is never reached at a finite
            // distance, so its edges are irrelevant here.
            &[]
        }
    }
}
