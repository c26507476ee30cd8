//! Immutable collections used by query values

pub mod append_only_list;

pub use append_only_list::AppendOnlyList;
