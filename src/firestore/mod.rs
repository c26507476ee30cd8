//! Cloud Firestore queries
//!
//! Module layout:
//! - `model` → paths and document keys
//! - `field_value.rs`, `filter.rs`, `order_by.rs`, `bound.rs` → query clauses
//! - `core` → the immutable query value, listener plumbing, and the traits
//!   the sync client implements
//! - `query.rs` → the public `Query` builder and its listeners
//! - `listener.rs`, `listener_registration.rs`, `snapshot_stream.rs` →
//!   snapshot delivery

pub mod bound;
pub mod core;
pub mod document_snapshot;
pub mod field_value;
pub mod filter;
/// Firestore handle binding a sync client to a user executor
pub mod firestore;
pub(crate) mod listener;
pub mod listener_registration;
/// Metadata change tracking for real-time listeners
pub mod metadata_changes;
pub mod model;
pub mod order_by;
pub mod query;
pub mod query_snapshot;
/// Stream utilities for query snapshots
pub mod snapshot_stream;
pub mod source;

// Re-export main Firestore handle
pub use firestore::Firestore;

// Re-export query clause types
pub use bound::Bound;
pub use field_value::{MapValue, Value};
pub use filter::{FieldFilter, FilterOperator};
pub use order_by::{Direction, OrderBy};

// Re-export paths
pub use model::{DocumentKey, FieldPath, IntoFieldPath, ResourcePath};

// Re-export from query module
pub use query::Query;

// Re-export snapshots
pub use document_snapshot::{DocumentSnapshot, SnapshotMetadata};
pub use query_snapshot::QuerySnapshot;

// Re-export listener types
pub use core::ListenOptions;
pub use listener_registration::ListenerRegistration;
pub use metadata_changes::MetadataChanges;
pub use snapshot_stream::QuerySnapshotStream;
pub use source::Source;
