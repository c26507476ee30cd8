//! Options passed to the sync client when registering a query listener

use serde::{Deserialize, Serialize};

use crate::firestore::metadata_changes::MetadataChanges;

/// Which events a query listener wants to see.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListenOptions {
    include_query_metadata_changes: bool,
    include_document_metadata_changes: bool,
    wait_for_sync_when_online: bool,
}

impl ListenOptions {
    /// Creates options from explicit flags
    pub fn new(
        include_query_metadata_changes: bool,
        include_document_metadata_changes: bool,
        wait_for_sync_when_online: bool,
    ) -> Self {
        Self {
            include_query_metadata_changes,
            include_document_metadata_changes,
            wait_for_sync_when_online,
        }
    }

    /// No metadata-only events, no waiting for the server
    pub fn default_options() -> Self {
        Self::default()
    }

    /// Options for a user-facing listener
    pub fn from_metadata_changes(metadata_changes: MetadataChanges) -> Self {
        let include = metadata_changes == MetadataChanges::Include;
        Self::new(include, include, false)
    }

    /// Options used by one-shot reads: every metadata change is raised and the
    /// first event waits for the server when online.
    pub fn for_get_documents() -> Self {
        Self::new(true, true, true)
    }

    /// Raise events when only the query's metadata changed
    pub fn include_query_metadata_changes(&self) -> bool {
        self.include_query_metadata_changes
    }

    /// Raise events when only a document's metadata changed
    pub fn include_document_metadata_changes(&self) -> bool {
        self.include_document_metadata_changes
    }

    /// Hold back cached results until the server has answered, when online
    pub fn wait_for_sync_when_online(&self) -> bool {
        self.wait_for_sync_when_online
    }
}
