//! Fast Steiner - Erickson-Monma-Veinott Steiner tree solver
//!
//! This library solves the Steiner problem in graphs: given an undirected,
//! positively weighted graph and a set of terminal vertices, it finds a
//! minimum-weight connected subgraph spanning all terminals.
//!
//! The algorithmic core is the Erickson-Monma-Veinott dynamic program, which
//! runs in time polynomial in the number of edges and exponential only in the
//! number of terminals. Each DP step is driven by Dijkstra single-source
//! shortest paths over a packed adjacency index augmented with per-worker
//! virtual source vertices.

pub mod algorithm;
pub mod data_structures;
pub mod graph;
pub mod parser;

pub use algorithm::{
    dijkstra::{dijkstra, DijkstraScratch},
    emv::{solve, SolverOptions, SteinerSolution},
};
/// Re-export main types for convenient use
pub use graph::{index::SteinerIndex, instance::SteinerInstance};

/// Edge weight and path cost type.
pub type Weight = i64;

/// Distance value treated as infinity: no edge, or unreachable.
///
/// Addition must treat this value as absorbing; see
/// [`algorithm::dijkstra::dijkstra`].
pub const INF: Weight = i64::MAX;

/// Largest supported number of terminals (subset masks are 32-bit).
pub const MAX_TERMINALS: usize = 32;

/// Error types for the library
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("parse error at line {line}: {msg}")]
    Parse { line: usize, msg: String },

    #[error("invalid instance: {0}")]
    InvalidInstance(String),

    #[error("declared cost {declared} does not match computed cost {computed}")]
    CostMismatch { declared: Weight, computed: Weight },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type for the library
pub type Result<T> = std::result::Result<T, Error>;
