//! Snapshot listener streams for Firestore.
//!
//! `Query::listen` exposes a snapshot listener as an async stream. The stream
//! owns the listener registration and removes it when dropped.
//!
//! # Example
//! ```no_run
//! use firestore_query_core::firestore::{Firestore, MetadataChanges};
//! use futures::StreamExt;
//!
//! # async fn example(firestore: Firestore) -> Result<(), Box<dyn std::error::Error>> {
//! let query = firestore.collection("rooms")?.where_greater_than("score", 10)?;
//!
//! let mut stream = query.listen(MetadataChanges::Exclude);
//! while let Some(result) = stream.next().await {
//!     match result {
//!         Ok(snapshot) => println!("{} rooms", snapshot.len()),
//!         Err(e) => eprintln!("Error: {}", e),
//!     }
//! }
//! // Listener removed when the stream is dropped
//! # Ok(())
//! # }
//! ```

use crate::error::FirestoreError;
use crate::firestore::listener_registration::ListenerRegistration;
use crate::firestore::query_snapshot::QuerySnapshot;
use futures::Stream;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc;

/// A stream of query snapshot updates.
///
/// This stream receives real-time updates for a query result set.
/// When dropped, the underlying listener is removed.
pub struct QuerySnapshotStream {
    receiver: mpsc::UnboundedReceiver<Result<QuerySnapshot, FirestoreError>>,
    registration: ListenerRegistration,
}

impl QuerySnapshotStream {
    pub(crate) fn new(
        receiver: mpsc::UnboundedReceiver<Result<QuerySnapshot, FirestoreError>>,
        registration: ListenerRegistration,
    ) -> Self {
        Self {
            receiver,
            registration,
        }
    }

    /// The registration backing this stream
    pub fn registration(&self) -> &ListenerRegistration {
        &self.registration
    }
}

impl Stream for QuerySnapshotStream {
    type Item = Result<QuerySnapshot, FirestoreError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.receiver.poll_recv(cx)
    }
}

impl Drop for QuerySnapshotStream {
    fn drop(&mut self) {
        self.registration.remove();
    }
}
