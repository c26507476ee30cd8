//! Firestore Query
//!
//! `Query` pairs an immutable [`core::Query`] value with the [`Firestore`]
//! handle that runs it. Every builder method validates the new clause against
//! what is already there and returns a new `Query`; the receiver never
//! changes.
//!
//! Results come back through listeners:
//! - [`Query::add_snapshot_listener`] streams snapshots until removed.
//! - [`Query::get_documents`] delivers exactly one result.
//! - [`Query::get`] and [`Query::listen`] are async wrappers over the two.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use futures::channel::oneshot;
use tokio::sync::{mpsc, oneshot as tokio_oneshot};

use super::bound::Bound;
use super::core::{self, AsyncEventListener, EventListener, FnListener, ListenOptions};
use super::field_value::Value;
use super::filter::FilterOperator;
use super::firestore::Firestore;
use super::listener::{ListenOnce, OnceListener, QuerySnapshotConverter};
use super::listener_registration::ListenerRegistration;
use super::metadata_changes::MetadataChanges;
use super::model::IntoFieldPath;
use super::order_by::Direction;
use super::query_snapshot::QuerySnapshot;
use super::snapshot_stream::QuerySnapshotStream;
use super::source::Source;
use crate::error::{FirestoreError, FirestoreResult};

/// A query against a collection or collection group.
#[derive(Clone)]
pub struct Query {
    firestore: Firestore,
    query: core::Query,
}

impl Query {
    pub(crate) fn new(query: core::Query, firestore: Firestore) -> Self {
        Self { firestore, query }
    }

    fn with_core(&self, query: core::Query) -> Self {
        Self::new(query, self.firestore.clone())
    }

    /// The Firestore instance this query runs against
    pub fn firestore(&self) -> &Firestore {
        &self.firestore
    }

    /// The underlying query value
    pub fn core_query(&self) -> &core::Query {
        &self.query
    }

    /// Adds a filter on `field`.
    ///
    /// Fails with `InvalidArgument` if the filter conflicts with the clauses
    /// already on this query.
    pub fn filter(
        &self,
        field: impl IntoFieldPath,
        op: FilterOperator,
        value: impl Into<Value>,
    ) -> FirestoreResult<Query> {
        let field = field.into_field_path()?;
        let query = self.query.filter(field, op, value.into())?;
        Ok(self.with_core(query))
    }

    /// Filter documents where field equals value
    pub fn where_equal_to(
        &self,
        field: impl IntoFieldPath,
        value: impl Into<Value>,
    ) -> FirestoreResult<Query> {
        self.filter(field, FilterOperator::Equal, value)
    }

    /// Filter documents where field does not equal value
    pub fn where_not_equal_to(
        &self,
        field: impl IntoFieldPath,
        value: impl Into<Value>,
    ) -> FirestoreResult<Query> {
        self.filter(field, FilterOperator::NotEqual, value)
    }

    /// Filter documents where field is less than value
    pub fn where_less_than(
        &self,
        field: impl IntoFieldPath,
        value: impl Into<Value>,
    ) -> FirestoreResult<Query> {
        self.filter(field, FilterOperator::LessThan, value)
    }

    /// Filter documents where field is less than or equal to value
    pub fn where_less_than_or_equal_to(
        &self,
        field: impl IntoFieldPath,
        value: impl Into<Value>,
    ) -> FirestoreResult<Query> {
        self.filter(field, FilterOperator::LessThanOrEqual, value)
    }

    /// Filter documents where field is greater than value
    pub fn where_greater_than(
        &self,
        field: impl IntoFieldPath,
        value: impl Into<Value>,
    ) -> FirestoreResult<Query> {
        self.filter(field, FilterOperator::GreaterThan, value)
    }

    /// Filter documents where field is greater than or equal to value
    pub fn where_greater_than_or_equal_to(
        &self,
        field: impl IntoFieldPath,
        value: impl Into<Value>,
    ) -> FirestoreResult<Query> {
        self.filter(field, FilterOperator::GreaterThanOrEqual, value)
    }

    /// Filter documents where array field contains value
    pub fn where_array_contains(
        &self,
        field: impl IntoFieldPath,
        value: impl Into<Value>,
    ) -> FirestoreResult<Query> {
        self.filter(field, FilterOperator::ArrayContains, value)
    }

    /// Filter documents where array field contains any of the values
    pub fn where_array_contains_any(
        &self,
        field: impl IntoFieldPath,
        values: Vec<Value>,
    ) -> FirestoreResult<Query> {
        self.filter(field, FilterOperator::ArrayContainsAny, Value::Array(values))
    }

    /// Filter documents where field equals any of the values
    pub fn where_in(&self, field: impl IntoFieldPath, values: Vec<Value>) -> FirestoreResult<Query> {
        self.filter(field, FilterOperator::In, Value::Array(values))
    }

    /// Filter documents where field equals none of the values
    pub fn where_not_in(
        &self,
        field: impl IntoFieldPath,
        values: Vec<Value>,
    ) -> FirestoreResult<Query> {
        self.filter(field, FilterOperator::NotIn, Value::Array(values))
    }

    /// Order query results by field
    pub fn order_by(
        &self,
        field: impl IntoFieldPath,
        direction: Direction,
    ) -> FirestoreResult<Query> {
        let field = field.into_field_path()?;
        let query = self.query.order_by(field, direction)?;
        Ok(self.with_core(query))
    }

    /// Limit query results to the first `limit` documents
    pub fn limit(&self, limit: i32) -> FirestoreResult<Query> {
        let query = self.query.limit(limit)?;
        Ok(self.with_core(query))
    }

    /// Start results at the given order-by values, inclusive
    pub fn start_at(&self, values: Vec<Value>) -> Query {
        self.with_core(self.query.start_at(Bound::new(values, true)))
    }

    /// Start results after the given order-by values
    pub fn start_after(&self, values: Vec<Value>) -> Query {
        self.with_core(self.query.start_at(Bound::new(values, false)))
    }

    /// End results at the given order-by values, inclusive
    pub fn end_at(&self, values: Vec<Value>) -> Query {
        self.with_core(self.query.end_at(Bound::new(values, true)))
    }

    /// End results before the given order-by values
    pub fn end_before(&self, values: Vec<Value>) -> Query {
        self.with_core(self.query.end_at(Bound::new(values, false)))
    }

    /// Starts listening to this query.
    ///
    /// `listener` runs on the Firestore's user executor, never on the thread
    /// that produced the event. It receives query snapshots until the
    /// returned registration is removed.
    pub fn add_snapshot_listener_with_options<L>(
        &self,
        options: ListenOptions,
        listener: L,
    ) -> ListenerRegistration
    where
        L: EventListener<QuerySnapshot> + 'static,
    {
        let converter = QuerySnapshotConverter::new(
            self.firestore.clone(),
            self.query.clone(),
            Box::new(listener),
        );
        let async_listener = AsyncEventListener::new(
            Arc::clone(self.firestore.user_executor()),
            Box::new(converter),
        );
        let handle = self.firestore.client().listen_to_query(
            self.query.clone(),
            options,
            async_listener.clone(),
        );

        let query_id = self.query.canonical_id();
        tracing::debug!(query = %query_id, ?options, "added snapshot listener");
        ListenerRegistration::new(query_id, async_listener, handle)
    }

    /// Starts listening to this query with a closure.
    pub fn add_snapshot_listener<F>(
        &self,
        metadata_changes: MetadataChanges,
        callback: F,
    ) -> ListenerRegistration
    where
        F: FnMut(FirestoreResult<QuerySnapshot>) + Send + 'static,
    {
        self.add_snapshot_listener_with_options(
            ListenOptions::from_metadata_changes(metadata_changes),
            FnListener::new(callback),
        )
    }

    /// Reads the query once and hands the result to `callback`.
    ///
    /// - `Source::Cache` reads the local cache without opening a listener.
    /// - `Source::Server` fails with `Unavailable` if the only result
    ///   available comes from the cache.
    /// - `Source::Default` takes whatever result arrives first.
    ///
    /// `callback` runs at most once, on the user executor.
    pub fn get_documents<F>(&self, source: Source, callback: F)
    where
        F: FnOnce(FirestoreResult<QuerySnapshot>) + Send + 'static,
    {
        if source == Source::Cache {
            let converter = QuerySnapshotConverter::new(
                self.firestore.clone(),
                self.query.clone(),
                Box::new(OnceListener::new(callback)),
            );
            let listener = AsyncEventListener::new(
                Arc::clone(self.firestore.user_executor()),
                Box::new(converter),
            );
            self.firestore
                .client()
                .get_documents_from_local_cache(self.query.clone(), listener);
            return;
        }

        let (registration_tx, registration_rx) = oneshot::channel();
        let listener = ListenOnce::new(source, registration_rx, callback);
        let registration =
            self.add_snapshot_listener_with_options(ListenOptions::for_get_documents(), listener);

        // The listener has already completed and dropped its end.
        if let Err(registration) = registration_tx.send(registration) {
            registration.remove();
        }
    }

    /// Reads the query once.
    pub async fn get(&self, source: Source) -> FirestoreResult<QuerySnapshot> {
        let (tx, rx) = tokio_oneshot::channel();
        self.get_documents(source, move |result| {
            let _ = tx.send(result);
        });
        rx.await.map_err(|_| FirestoreError::Cancelled)?
    }

    /// Streams snapshots of this query.
    ///
    /// The listener is removed when the stream is dropped.
    pub fn listen(&self, metadata_changes: MetadataChanges) -> QuerySnapshotStream {
        let (tx, rx) = mpsc::unbounded_channel();
        let registration = self.add_snapshot_listener(metadata_changes, move |result| {
            // Receiver gone means the stream was dropped
            let _ = tx.send(result);
        });
        QuerySnapshotStream::new(rx, registration)
    }
}

impl PartialEq for Query {
    fn eq(&self, other: &Self) -> bool {
        self.firestore == other.firestore && self.query == other.query
    }
}

impl Eq for Query {}

impl Hash for Query {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.query.hash(state);
    }
}

impl fmt::Debug for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Query")
            .field("query", &self.query.canonical_id())
            .finish()
    }
}
