use serde::{Deserialize, Serialize};

/// Controls whether metadata-only changes trigger snapshot events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetadataChanges {
    /// Listen to changes in metadata as well as data.
    ///
    /// Snapshot events will be triggered on metadata changes in addition to data changes.
    Include,

    /// Do not listen to metadata-only changes.
    ///
    /// Snapshot events will only be triggered when the document data changes.
    /// This is the default behavior.
    #[default]
    Exclude,
}
