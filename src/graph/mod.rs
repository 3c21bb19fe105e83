pub mod index;
pub mod instance;

pub use index::{Adjacency, SteinerIndex, WorkerView};
pub use instance::SteinerInstance;
