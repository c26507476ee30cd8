//! Firestore QuerySnapshot type

use std::fmt;

use super::core::{self, ViewSnapshot};
use super::document_snapshot::{DocumentSnapshot, SnapshotMetadata};
use super::firestore::Firestore;
use super::query::Query;

/// The results of a query at one point in time.
#[derive(Clone, PartialEq)]
pub struct QuerySnapshot {
    firestore: Firestore,
    query: core::Query,
    snapshot: ViewSnapshot,
    metadata: SnapshotMetadata,
}

impl QuerySnapshot {
    pub(crate) fn new(
        firestore: Firestore,
        query: core::Query,
        snapshot: ViewSnapshot,
        metadata: SnapshotMetadata,
    ) -> Self {
        Self {
            firestore,
            query,
            snapshot,
            metadata,
        }
    }

    /// The query that produced this snapshot
    pub fn query(&self) -> Query {
        Query::new(self.query.clone(), self.firestore.clone())
    }

    /// Pending-write and cache state of the result set
    pub fn metadata(&self) -> SnapshotMetadata {
        self.metadata
    }

    /// The underlying view snapshot
    pub fn view_snapshot(&self) -> &ViewSnapshot {
        &self.snapshot
    }

    /// Get all documents as DocumentSnapshot instances
    pub fn documents(&self) -> Vec<DocumentSnapshot> {
        self.snapshot
            .documents
            .iter()
            .map(|doc| DocumentSnapshot {
                key: doc.key.clone(),
                data: Some(doc.data.clone()),
                metadata: SnapshotMetadata::new(
                    self.snapshot.mutated_keys.contains(&doc.key),
                    self.metadata.is_from_cache,
                ),
            })
            .collect()
    }

    /// Check if the query result is empty
    pub fn is_empty(&self) -> bool {
        self.snapshot.documents.is_empty()
    }

    /// Get the number of documents in the snapshot
    pub fn len(&self) -> usize {
        self.snapshot.documents.len()
    }
}

impl fmt::Debug for QuerySnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuerySnapshot")
            .field("query", &self.query.canonical_id())
            .field("len", &self.len())
            .field("metadata", &self.metadata)
            .finish()
    }
}
