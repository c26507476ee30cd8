use std::fmt::{Display, Formatter};

use crate::error::{FirestoreError, FirestoreResult};

const DOCUMENT_KEY_NAME: &str = "__name__";

/// A dot-separated path to a field inside a document.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldPath {
    segments: Vec<String>,
}

impl FieldPath {
    pub fn new<S, I>(segments: I) -> FirestoreResult<Self>
    where
        S: Into<String>,
        I: IntoIterator<Item = S>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() {
            return Err(FirestoreError::invalid_argument(
                "Invalid field path. Provided names must not be empty.",
            ));
        }
        if segments.iter().any(String::is_empty) {
            return Err(FirestoreError::invalid_argument(format!(
                "Invalid field path ({}). Paths must not be empty, begin with '.', end with '.', or contain '..'",
                segments.join(".")
            )));
        }
        Ok(Self { segments })
    }

    pub fn from_dot_separated(path: &str) -> FirestoreResult<Self> {
        if path.is_empty() {
            return Err(FirestoreError::invalid_argument(
                "Invalid field path. Provided names must not be empty.",
            ));
        }
        FieldPath::new(path.split('.'))
    }

    /// The reserved path that refers to a document's own key.
    pub fn document_id() -> Self {
        Self {
            segments: vec![DOCUMENT_KEY_NAME.to_string()],
        }
    }

    pub fn is_key_field_path(&self) -> bool {
        self.segments.len() == 1 && self.segments[0] == DOCUMENT_KEY_NAME
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn canonical_string(&self) -> String {
        self.segments.join(".")
    }
}

impl Display for FieldPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.canonical_string())
    }
}

/// Converts common user inputs into a validated [`FieldPath`].
pub trait IntoFieldPath {
    fn into_field_path(self) -> FirestoreResult<FieldPath>;
}

impl IntoFieldPath for FieldPath {
    fn into_field_path(self) -> FirestoreResult<FieldPath> {
        Ok(self)
    }
}

impl IntoFieldPath for &FieldPath {
    fn into_field_path(self) -> FirestoreResult<FieldPath> {
        Ok(self.clone())
    }
}

impl IntoFieldPath for String {
    fn into_field_path(self) -> FirestoreResult<FieldPath> {
        FieldPath::from_dot_separated(&self)
    }
}

impl IntoFieldPath for &str {
    fn into_field_path(self) -> FirestoreResult<FieldPath> {
        FieldPath::from_dot_separated(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_dot_path() {
        let field = FieldPath::from_dot_separated("stats.score").unwrap();
        assert_eq!(field.segments(), &["stats", "score"]);
        assert_eq!(field.to_string(), "stats.score");
    }

    #[test]
    fn rejects_empty() {
        assert!(FieldPath::from_dot_separated("").is_err());
        assert!(FieldPath::from_dot_separated("a..b").is_err());
        assert!(FieldPath::from_dot_separated(".a").is_err());
    }

    #[test]
    fn document_id_is_key_path() {
        assert!(FieldPath::document_id().is_key_field_path());
        assert!("__name__".into_field_path().unwrap().is_key_field_path());
        assert!(!"name".into_field_path().unwrap().is_key_field_path());
    }
}
