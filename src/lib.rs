//! Firestore query core
//!
//! Immutable, validated Firestore query values and the listener lifecycle
//! that turns a sync client's view snapshots into user-facing query
//! snapshots. Network I/O, persistence and view computation stay behind the
//! [`FirestoreClient`](firestore::core::FirestoreClient) trait.
//!
//! # Example
//! ```no_run
//! # async fn example(client: std::sync::Arc<dyn firestore_query_core::firestore::core::FirestoreClient>)
//! #     -> Result<(), Box<dyn std::error::Error>> {
//! use firestore_query_core::{Direction, Firestore, Source};
//!
//! let firestore = Firestore::with_current_runtime(client)?;
//! let query = firestore
//!     .collection("rooms")?
//!     .where_greater_than("score", 10)?
//!     .order_by("score", Direction::Descending)?
//!     .limit(5)?;
//!
//! let snapshot = query.get(Source::Server).await?;
//! println!("{} rooms", snapshot.len());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod firestore;
pub mod immutable;

// Re-exports for convenience
pub use error::{FirestoreError, FirestoreResult};
pub use immutable::AppendOnlyList;

// Firestore re-exports
pub use firestore::{
    Direction, DocumentSnapshot, FieldPath, FilterOperator, Firestore, ListenOptions,
    ListenerRegistration, MetadataChanges, Query, QuerySnapshot, QuerySnapshotStream,
    SnapshotMetadata, Source, Value,
};
