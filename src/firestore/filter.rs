//! Field filters attached to a query

use std::fmt;

use serde::{Deserialize, Serialize};

use super::field_value::Value;
use super::model::FieldPath;

/// Comparison operator of a field filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilterOperator {
    /// field < value
    LessThan,
    /// field <= value
    LessThanOrEqual,
    /// field == value
    Equal,
    /// field != value
    NotEqual,
    /// field >= value
    GreaterThanOrEqual,
    /// field > value
    GreaterThan,
    /// array field contains value
    ArrayContains,
    /// array field contains any of the values
    ArrayContainsAny,
    /// field equals any of the values
    In,
    /// field equals none of the values
    NotIn,
}

impl FilterOperator {
    /// Relational operators. At most one field per query may use them.
    pub fn is_inequality(self) -> bool {
        matches!(
            self,
            FilterOperator::LessThan
                | FilterOperator::LessThanOrEqual
                | FilterOperator::GreaterThan
                | FilterOperator::GreaterThanOrEqual
                | FilterOperator::NotEqual
                | FilterOperator::NotIn
        )
    }

    /// Array-membership operators. At most one per query.
    pub fn is_array_operator(self) -> bool {
        matches!(
            self,
            FilterOperator::ArrayContains | FilterOperator::ArrayContainsAny
        )
    }

    /// Operators whose value is a list of alternatives.
    pub fn is_disjunctive(self) -> bool {
        matches!(
            self,
            FilterOperator::In | FilterOperator::NotIn | FilterOperator::ArrayContainsAny
        )
    }

    /// Operators that may not appear in the same query as `self`.
    pub(crate) fn conflicting_operators(self) -> &'static [FilterOperator] {
        use FilterOperator::*;
        match self {
            NotEqual => &[NotEqual, NotIn],
            ArrayContains => &[ArrayContains, ArrayContainsAny, NotIn],
            In => &[ArrayContainsAny, In, NotIn],
            ArrayContainsAny => &[ArrayContains, ArrayContainsAny, In, NotIn],
            NotIn => &[ArrayContains, ArrayContainsAny, In, NotIn, NotEqual],
            _ => &[],
        }
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            FilterOperator::LessThan => "<",
            FilterOperator::LessThanOrEqual => "<=",
            FilterOperator::Equal => "==",
            FilterOperator::NotEqual => "!=",
            FilterOperator::GreaterThanOrEqual => ">=",
            FilterOperator::GreaterThan => ">",
            FilterOperator::ArrayContains => "array-contains",
            FilterOperator::ArrayContainsAny => "array-contains-any",
            FilterOperator::In => "in",
            FilterOperator::NotIn => "not-in",
        };
        f.write_str(symbol)
    }
}

/// A single `field op value` predicate
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldFilter {
    field: FieldPath,
    op: FilterOperator,
    value: Value,
}

impl FieldFilter {
    /// Creates a filter. No validation happens here; see `core::Query::filter`.
    pub fn new(field: FieldPath, op: FilterOperator, value: Value) -> Self {
        Self { field, op, value }
    }

    /// The filtered field
    pub fn field(&self) -> &FieldPath {
        &self.field
    }

    /// The comparison operator
    pub fn op(&self) -> FilterOperator {
        self.op
    }

    /// The operand
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Whether this filter uses a relational operator
    pub fn is_inequality(&self) -> bool {
        self.op.is_inequality()
    }

    pub(crate) fn canonical_id(&self) -> String {
        format!("{}{}{}", self.field, self.op, self.value)
    }
}
