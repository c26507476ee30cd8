//! Query ordering

use std::fmt;

use serde::{Deserialize, Serialize};

use super::model::FieldPath;

/// Sort direction for query ordering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Smallest value first
    #[default]
    Ascending,
    /// Largest value first
    Descending,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Ascending => f.write_str("asc"),
            Direction::Descending => f.write_str("desc"),
        }
    }
}

/// One ordering clause of a query
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OrderBy {
    field: FieldPath,
    direction: Direction,
}

impl OrderBy {
    /// Orders by `field` in `direction`
    pub fn new(field: FieldPath, direction: Direction) -> Self {
        Self { field, direction }
    }

    /// The ordered field
    pub fn field(&self) -> &FieldPath {
        &self.field
    }

    /// The direction
    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub(crate) fn canonical_id(&self) -> String {
        format!("{}{}", self.field, self.direction)
    }
}
