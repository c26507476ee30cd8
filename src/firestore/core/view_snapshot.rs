//! Snapshot values produced by the sync client's view layer

use std::collections::BTreeSet;

use super::query::Query;
use crate::firestore::field_value::MapValue;
use crate::firestore::model::DocumentKey;

/// A document as seen by a view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Document location
    pub key: DocumentKey,
    /// Field data
    pub data: MapValue,
}

impl Document {
    /// Creates a document
    pub fn new(key: DocumentKey, data: MapValue) -> Self {
        Self { key, data }
    }
}

/// A query's current result set plus sync state, before it is made public.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewSnapshot {
    /// The query this view answers
    pub query: Query,
    /// Documents in query order
    pub documents: Vec<Document>,
    /// Keys of documents with pending local mutations
    pub mutated_keys: BTreeSet<DocumentKey>,
    /// Whether the result set comes from the local cache only
    pub from_cache: bool,
    /// Whether `from_cache` flipped with this snapshot
    pub sync_state_changed: bool,
    /// Whether metadata-only changes were filtered out
    pub excludes_metadata_changes: bool,
}

impl ViewSnapshot {
    /// A server-synced snapshot without pending writes
    pub fn new(query: Query, documents: Vec<Document>) -> Self {
        Self {
            query,
            documents,
            mutated_keys: BTreeSet::new(),
            from_cache: false,
            sync_state_changed: false,
            excludes_metadata_changes: false,
        }
    }

    /// Marks the snapshot as served from cache
    pub fn with_from_cache(mut self, from_cache: bool) -> Self {
        self.from_cache = from_cache;
        self
    }

    /// Sets the keys with pending writes
    pub fn with_mutated_keys(mut self, keys: impl IntoIterator<Item = DocumentKey>) -> Self {
        self.mutated_keys = keys.into_iter().collect();
        self
    }

    /// Whether any document in the view has pending writes
    pub fn has_pending_writes(&self) -> bool {
        !self.mutated_keys.is_empty()
    }
}
