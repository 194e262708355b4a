//! Container types
//!
//! - **`OrderedIndexSet<T>`** - Sorted, duplicate-free set with ascending iteration

mod sorted_index_set;

pub use sorted_index_set::OrderedIndexSet;
