//! Record-set transforms.
//!
//! Both operate on the decoded representation only:
//! - Merge: id-keyed upsert of an update set into a base set
//! - Sort: stable, type-aware ordering by one field

pub mod merge;
pub mod sort;

pub use merge::{merge, next_id, DEFAULT_ID_FIELD};
pub use sort::{sort, SortKey, SortValue};
