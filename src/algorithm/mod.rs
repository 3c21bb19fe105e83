pub mod dijkstra;
pub mod emv;
pub mod traceback;

pub use dijkstra::DijkstraScratch;
pub use emv::{solve, SolverOptions, SteinerSolution};
