//! The Firestore handle shared by queries and snapshots

use std::fmt;
use std::sync::Arc;

use super::core::{self, Executor, FirestoreClient, SerialExecutor};
use super::model::ResourcePath;
use super::query::Query;
use crate::error::{FirestoreError, FirestoreResult};

/// Firestore database handle
///
/// Cheap to clone. Every clone shares the same sync client and user executor;
/// two handles compare equal when they share them.
#[derive(Clone)]
pub struct Firestore {
    pub(crate) inner: Arc<FirestoreInner>,
}

pub(crate) struct FirestoreInner {
    client: Arc<dyn FirestoreClient>,
    user_executor: Arc<dyn Executor>,
}

impl Firestore {
    /// Create a Firestore handle over `client`, delivering listener callbacks
    /// on `user_executor`
    pub fn new(client: Arc<dyn FirestoreClient>, user_executor: Arc<dyn Executor>) -> Self {
        Self {
            inner: Arc::new(FirestoreInner {
                client,
                user_executor,
            }),
        }
    }

    /// Create a Firestore handle whose callbacks run on a [`SerialExecutor`]
    /// bound to the current tokio runtime
    pub fn with_current_runtime(client: Arc<dyn FirestoreClient>) -> FirestoreResult<Self> {
        let executor = SerialExecutor::current()?;
        Ok(Self::new(client, Arc::new(executor)))
    }

    /// A query over the collection at `collection_path`
    ///
    /// The path must have an odd number of segments, e.g. `rooms` or
    /// `rooms/eros/messages`.
    pub fn collection(&self, collection_path: &str) -> FirestoreResult<Query> {
        let path = ResourcePath::from_string(collection_path)?;
        if path.len() % 2 != 1 {
            return Err(FirestoreError::invalid_argument(format!(
                "Invalid collection reference. Collection references must have an odd number \
                 of segments, but {collection_path} has {}",
                path.len()
            )));
        }
        Ok(Query::new(core::Query::new(path), self.clone()))
    }

    /// A query over every collection named `collection_id`
    pub fn collection_group(&self, collection_id: &str) -> FirestoreResult<Query> {
        let query = core::Query::collection_group(collection_id)?;
        Ok(Query::new(query, self.clone()))
    }

    pub(crate) fn client(&self) -> &Arc<dyn FirestoreClient> {
        &self.inner.client
    }

    pub(crate) fn user_executor(&self) -> &Arc<dyn Executor> {
        &self.inner.user_executor
    }
}

impl PartialEq for Firestore {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Firestore {}

impl fmt::Debug for Firestore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Firestore")
            .field("inner", &Arc::as_ptr(&self.inner))
            .finish()
    }
}
