pub mod indexed_heap;
pub mod subsets;

pub use indexed_heap::IndexedHeap;
pub use subsets::{masks_of_popcount, proper_nonempty_submasks};
