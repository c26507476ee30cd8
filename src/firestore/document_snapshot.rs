//! Firestore DocumentSnapshot and SnapshotMetadata types

use super::field_value::{MapValue, Value};
use super::model::DocumentKey;

/// Firestore document snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSnapshot {
    /// Document location
    pub key: DocumentKey,

    /// Document data (None if document doesn't exist)
    pub data: Option<MapValue>,

    /// Document metadata
    pub metadata: SnapshotMetadata,
}

impl DocumentSnapshot {
    /// Check if document exists
    pub fn exists(&self) -> bool {
        self.data.is_some()
    }

    /// Get a top-level field value
    pub fn get(&self, field: &str) -> Option<&Value> {
        let Some(data) = &self.data else {
            return None;
        };
        data.get(field)
    }

    /// Get document ID
    pub fn id(&self) -> &str {
        self.key.id()
    }
}

/// Metadata about a snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SnapshotMetadata {
    /// Whether the snapshot contains pending writes
    pub has_pending_writes: bool,

    /// Whether the data came from cache
    pub is_from_cache: bool,
}

impl SnapshotMetadata {
    /// Creates metadata from its two flags
    pub fn new(has_pending_writes: bool, is_from_cache: bool) -> Self {
        Self {
            has_pending_writes,
            is_from_cache,
        }
    }

    /// Whether the snapshot contains pending writes
    pub fn has_pending_writes(&self) -> bool {
        self.has_pending_writes
    }

    /// Whether the data came from cache
    pub fn is_from_cache(&self) -> bool {
        self.is_from_cache
    }
}
