//! Query start and end positions

use super::field_value::Value;

/// A position in a query's result order.
///
/// The values line up with the query's order-by clauses. `inclusive` says
/// whether a document sitting exactly on the position is part of the result.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Bound {
    position: Vec<Value>,
    inclusive: bool,
}

impl Bound {
    /// Creates a bound
    pub fn new(position: Vec<Value>, inclusive: bool) -> Self {
        Self {
            position,
            inclusive,
        }
    }

    /// The position values
    pub fn position(&self) -> &[Value] {
        &self.position
    }

    /// Whether documents at the position are included
    pub fn inclusive(&self) -> bool {
        self.inclusive
    }

    pub(crate) fn canonical_id(&self) -> String {
        let values: Vec<String> = self.position.iter().map(Value::canonical_string).collect();
        format!(
            "{}{}",
            if self.inclusive { "b:" } else { "a:" },
            values.join(",")
        )
    }
}
