//! The query value: an immutable description of what to fetch.
//!
//! Each builder step validates the new clause against the clauses already
//! accumulated and returns a fresh `Query`. A failed step leaves the receiver
//! untouched, so no partially applied clause is ever observable.

use std::fmt;

use crate::error::{FirestoreError, FirestoreResult};
use crate::firestore::bound::Bound;
use crate::firestore::field_value::Value;
use crate::firestore::filter::{FieldFilter, FilterOperator};
use crate::firestore::model::{DocumentKey, FieldPath, ResourcePath};
use crate::firestore::order_by::{Direction, OrderBy};
use crate::immutable::AppendOnlyList;

/// Maximum number of alternatives in an `in`, `not-in` or
/// `array-contains-any` filter.
pub const MAX_DISJUNCTIVE_VALUES: usize = 10;

/// Immutable, structurally comparable query description.
///
/// Equality and hashing cover the path and every clause, so two queries are
/// interchangeable exactly when they compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Query {
    path: ResourcePath,
    collection_group: Option<String>,
    filters: AppendOnlyList<FieldFilter>,
    explicit_order_bys: AppendOnlyList<OrderBy>,
    limit: Option<i32>,
    start_at: Option<Bound>,
    end_at: Option<Bound>,
}

impl Query {
    /// Creates a query over the collection at `path`.
    pub fn new(path: ResourcePath) -> Self {
        Self {
            path,
            collection_group: None,
            filters: AppendOnlyList::new(),
            explicit_order_bys: AppendOnlyList::new(),
            limit: None,
            start_at: None,
            end_at: None,
        }
    }

    /// Creates a query over every collection named `collection_id`, at any depth.
    pub fn collection_group(collection_id: impl Into<String>) -> FirestoreResult<Self> {
        let collection_id = collection_id.into();
        if collection_id.is_empty() || collection_id.contains('/') {
            return Err(FirestoreError::invalid_argument(format!(
                "Invalid collection ID ({collection_id}) passed to function collection_group(). \
                 Collection IDs must be non-empty and must not contain '/'."
            )));
        }
        Ok(Self {
            collection_group: Some(collection_id),
            ..Self::new(ResourcePath::root())
        })
    }

    /// The base path. Empty for a collection group query over the whole database.
    pub fn path(&self) -> &ResourcePath {
        &self.path
    }

    /// The collection id of a collection group query
    pub fn collection_group_id(&self) -> Option<&str> {
        self.collection_group.as_deref()
    }

    /// Whether this query spans every collection with the group's id
    pub fn is_collection_group_query(&self) -> bool {
        self.collection_group.is_some()
    }

    /// Filters in the order they were added
    pub fn filters(&self) -> &AppendOnlyList<FieldFilter> {
        &self.filters
    }

    /// Order-by clauses in the order they were added
    pub fn explicit_order_bys(&self) -> &AppendOnlyList<OrderBy> {
        &self.explicit_order_bys
    }

    /// Maximum number of results, if limited
    pub fn limit_value(&self) -> Option<i32> {
        self.limit
    }

    /// Where results start, if bounded
    pub fn start_bound(&self) -> Option<&Bound> {
        self.start_at.as_ref()
    }

    /// Where results end, if bounded
    pub fn end_bound(&self) -> Option<&Bound> {
        self.end_at.as_ref()
    }

    /// The field every inequality filter of this query is on, if any.
    pub fn inequality_filter_field(&self) -> Option<&FieldPath> {
        self.filters
            .iter()
            .find(|filter| filter.is_inequality())
            .map(FieldFilter::field)
    }

    /// The field of the first explicit order-by
    pub fn first_order_by_field(&self) -> Option<&FieldPath> {
        self.explicit_order_bys.first().map(OrderBy::field)
    }

    /// The first operator of an existing filter that appears in `operators`.
    pub fn find_filter_operator(&self, operators: &[FilterOperator]) -> Option<FilterOperator> {
        self.filters
            .iter()
            .map(FieldFilter::op)
            .find(|op| operators.contains(op))
    }

    /// Returns a new query with `field op value` appended.
    ///
    /// Filters on [`FieldPath::document_id`] take a document id string or a
    /// reference; strings are rewritten to references relative to the query
    /// path.
    pub fn filter(&self, field: FieldPath, op: FilterOperator, value: Value) -> FirestoreResult<Query> {
        if value.is_null() || value.is_nan() {
            if !matches!(op, FilterOperator::Equal | FilterOperator::NotEqual) {
                let kind = if value.is_null() { "Null" } else { "NaN" };
                return Err(FirestoreError::invalid_argument(format!(
                    "Invalid Query. {kind} supports only '==' and '!=' comparisons."
                )));
            }
        }
        if op.is_disjunctive() {
            validate_disjunctive_value(op, &value)?;
        }

        let value = if field.is_key_field_path() {
            self.parse_document_id_value(op, value)?
        } else {
            value
        };

        let filter = FieldFilter::new(field, op, value);
        self.validate_new_filter(&filter)?;

        Ok(Query {
            filters: self.filters.clone().push_back(filter),
            ..self.clone()
        })
    }

    /// Returns a new query with an additional ordering.
    pub fn order_by(&self, field: FieldPath, direction: Direction) -> FirestoreResult<Query> {
        if self.start_at.is_some() {
            return Err(FirestoreError::invalid_argument(
                "Invalid query. You must not specify a starting point before specifying the order by.",
            ));
        }
        if self.end_at.is_some() {
            return Err(FirestoreError::invalid_argument(
                "Invalid query. You must not specify an ending point before specifying the order by.",
            ));
        }
        if self.explicit_order_bys.is_empty() {
            if let Some(inequality) = self.inequality_filter_field() {
                validate_order_by_matches_inequality(&field, inequality)?;
            }
        }

        Ok(Query {
            explicit_order_bys: self
                .explicit_order_bys
                .clone()
                .push_back(OrderBy::new(field, direction)),
            ..self.clone()
        })
    }

    /// Returns a new query returning at most `limit` documents.
    pub fn limit(&self, limit: i32) -> FirestoreResult<Query> {
        if limit <= 0 {
            return Err(FirestoreError::invalid_argument(format!(
                "Invalid Query. Query limit ({limit}) is invalid. Limit must be positive."
            )));
        }
        Ok(Query {
            limit: Some(limit),
            ..self.clone()
        })
    }

    /// Returns a new query starting at `bound`.
    ///
    /// The bound length is not checked against the order-by clauses here;
    /// `order_by` is rejected once a bound exists, so the ordering cannot
    /// change underneath it.
    pub fn start_at(&self, bound: Bound) -> Query {
        Query {
            start_at: Some(bound),
            ..self.clone()
        }
    }

    /// Returns a new query ending at `bound`.
    pub fn end_at(&self, bound: Bound) -> Query {
        Query {
            end_at: Some(bound),
            ..self.clone()
        }
    }

    /// A stable textual key, equal for structurally equal queries.
    pub fn canonical_id(&self) -> String {
        let mut id = self.path.canonical_string();
        if let Some(group) = &self.collection_group {
            id.push_str("|cg:");
            id.push_str(group);
        }
        id.push_str("|f:");
        for filter in &self.filters {
            id.push_str(&filter.canonical_id());
        }
        id.push_str("|ob:");
        for order_by in &self.explicit_order_bys {
            id.push_str(&order_by.canonical_id());
        }
        if let Some(limit) = self.limit {
            id.push_str(&format!("|l:{limit}"));
        }
        if let Some(bound) = &self.start_at {
            id.push_str("|lb:");
            id.push_str(&bound.canonical_id());
        }
        if let Some(bound) = &self.end_at {
            id.push_str("|ub:");
            id.push_str(&bound.canonical_id());
        }
        id
    }

    fn parse_document_id_value(&self, op: FilterOperator, value: Value) -> FirestoreResult<Value> {
        if op.is_array_operator() {
            return Err(FirestoreError::invalid_argument(format!(
                "Invalid query. You can't perform '{op}' queries on FieldPath.documentId() \
                 since document IDs are not arrays."
            )));
        }
        if let Value::Array(values) = value {
            if op.is_disjunctive() {
                let references = values
                    .into_iter()
                    .map(|value| self.parse_expected_reference_value(value))
                    .collect::<FirestoreResult<Vec<_>>>()?;
                return Ok(Value::Array(references));
            }
            return self.parse_expected_reference_value(Value::Array(values));
        }
        self.parse_expected_reference_value(value)
    }

    fn parse_expected_reference_value(&self, value: Value) -> FirestoreResult<Value> {
        let document_id = match value {
            Value::Reference(_) => return Ok(value),
            Value::String(document_id) => document_id,
            other => {
                return Err(FirestoreError::invalid_argument(format!(
                    "Invalid query. When querying by document ID you must provide a valid string \
                     or DocumentReference, but it was of type: {}",
                    other.type_name()
                )));
            }
        };

        if document_id.is_empty() {
            return Err(FirestoreError::invalid_argument(
                "Invalid query. When querying with FieldPath.documentId() you must provide a \
                 valid document ID, but it was an empty string.",
            ));
        }
        if !self.is_collection_group_query() && document_id.contains('/') {
            return Err(FirestoreError::invalid_argument(format!(
                "Invalid query. When querying a collection by FieldPath.documentId() you must \
                 provide a plain document ID, but '{document_id}' contains a '/' character."
            )));
        }

        let path = self.path.append(&ResourcePath::from_string(&document_id)?);
        if !DocumentKey::is_document_key(&path) {
            return Err(FirestoreError::invalid_argument(format!(
                "Invalid query. When querying a collection group by FieldPath.documentId(), the \
                 value provided must result in a valid document path, but '{path}' is not \
                 because it has an odd number of segments."
            )));
        }
        Ok(Value::Reference(DocumentKey::from_path(path)?))
    }

    fn validate_new_filter(&self, filter: &FieldFilter) -> FirestoreResult<()> {
        if filter.is_inequality() {
            if let Some(existing) = self.inequality_filter_field() {
                if existing != filter.field() {
                    return Err(FirestoreError::invalid_argument(format!(
                        "Invalid Query. All where filters with an inequality (notEqual, lessThan, \
                         lessThanOrEqual, greaterThan, or greaterThanOrEqual) must be on the same \
                         field. But you have inequality filters on '{existing}' and '{}'",
                        filter.field()
                    )));
                }
            }
            if let Some(first_order_by) = self.first_order_by_field() {
                validate_order_by_matches_inequality(first_order_by, filter.field())?;
            }
        }

        let op = filter.op();
        if let Some(conflict) = self.find_filter_operator(op.conflicting_operators()) {
            let message = if op.is_array_operator() && conflict.is_array_operator() {
                "Invalid Query. Queries only support a single arrayContains-style filter.".to_string()
            } else if conflict == op {
                format!("Invalid Query. You cannot use more than one '{op}' filter.")
            } else {
                format!("Invalid Query. You cannot use '{op}' filters with '{conflict}' filters.")
            };
            return Err(FirestoreError::invalid_argument(message));
        }
        Ok(())
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Query({})", self.canonical_id())
    }
}

fn validate_disjunctive_value(op: FilterOperator, value: &Value) -> FirestoreResult<()> {
    let Some(values) = value.as_array() else {
        return Err(FirestoreError::invalid_argument(format!(
            "Invalid Query. A non-empty array is required for '{op}' filters."
        )));
    };
    if values.is_empty() {
        return Err(FirestoreError::invalid_argument(format!(
            "Invalid Query. A non-empty array is required for '{op}' filters."
        )));
    }
    if values.len() > MAX_DISJUNCTIVE_VALUES {
        return Err(FirestoreError::invalid_argument(format!(
            "Invalid Query. '{op}' filters support a maximum of {MAX_DISJUNCTIVE_VALUES} \
             elements in the value array."
        )));
    }
    Ok(())
}

fn validate_order_by_matches_inequality(
    order_by_field: &FieldPath,
    inequality_field: &FieldPath,
) -> FirestoreResult<()> {
    if order_by_field != inequality_field {
        return Err(FirestoreError::invalid_argument(format!(
            "Invalid query. You have a where filter with an inequality (notEqual, lessThan, \
             lessThanOrEqual, greaterThan, or greaterThanOrEqual) on field '{inequality_field}' \
             and so you must also use '{inequality_field}' as your first queryOrderedBy field, \
             but your first queryOrderedBy is currently on field '{order_by_field}' instead."
        )));
    }
    Ok(())
}
