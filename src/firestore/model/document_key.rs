use std::fmt::{Display, Formatter};

use crate::error::{FirestoreError, FirestoreResult};
use crate::firestore::model::ResourcePath;

/// The location of a single document: a path with an even number of segments.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentKey {
    path: ResourcePath,
}

impl DocumentKey {
    pub fn is_document_key(path: &ResourcePath) -> bool {
        !path.is_empty() && path.len() % 2 == 0
    }

    pub fn from_path(path: ResourcePath) -> FirestoreResult<Self> {
        if !Self::is_document_key(&path) {
            return Err(FirestoreError::invalid_argument(format!(
                "Invalid document path ({path}). Document paths must have an even number of segments, but it has {}.",
                path.len()
            )));
        }
        Ok(Self { path })
    }

    pub fn from_string(path: &str) -> FirestoreResult<Self> {
        Self::from_path(ResourcePath::from_string(path)?)
    }

    pub fn path(&self) -> &ResourcePath {
        &self.path
    }

    pub fn collection_path(&self) -> ResourcePath {
        self.path.without_last()
    }

    pub fn id(&self) -> &str {
        self.path.last_segment().unwrap_or_default()
    }
}

impl Display for DocumentKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validates_even_segments() {
        assert!(DocumentKey::from_string("rooms").is_err());
        assert!(DocumentKey::from_string("rooms/eros/messages").is_err());
        assert!(DocumentKey::from_string("").is_err());
    }

    #[test]
    fn parses_valid_path() {
        let key = DocumentKey::from_string("rooms/eros").unwrap();
        assert_eq!(key.id(), "eros");
        assert_eq!(key.collection_path().canonical_string(), "rooms");
    }
}
