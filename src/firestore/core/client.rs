//! The sync client contract this crate drives

use std::sync::Arc;

use super::event_listener::EventListener;
use super::listen_options::ListenOptions;
use super::query::Query;
use super::view_snapshot::ViewSnapshot;

/// Handle to a query listener registered with the sync client.
pub trait QueryListenerHandle: Send + Sync {
    /// Stops delivery to the listener. Idempotent; no event reaches the
    /// listener after this returns.
    fn detach(&self);
}

/// The component that performs network I/O, local persistence and view
/// computation.
pub trait FirestoreClient: Send + Sync {
    /// Starts streaming view snapshots for `query` to `listener`.
    ///
    /// Implementations must not deliver to `listener` from inside this call.
    fn listen_to_query(
        &self,
        query: Query,
        options: ListenOptions,
        listener: Arc<dyn EventListener<ViewSnapshot>>,
    ) -> Box<dyn QueryListenerHandle>;

    /// Reads `query` from the local cache only and delivers exactly one event.
    fn get_documents_from_local_cache(
        &self,
        query: Query,
        listener: Arc<dyn EventListener<ViewSnapshot>>,
    );
}
