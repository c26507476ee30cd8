//! Listeners that sit between the sync client and user callbacks
//!
//! - `QuerySnapshotConverter` turns view snapshots into public `QuerySnapshot`s.
//! - `ListenOnce` turns a streaming registration into a single result.
//! - `OnceListener` adapts an `FnOnce` callback for single-delivery reads.

use std::sync::Mutex;

use futures::channel::oneshot;

use super::core::event_listener::lock_unpoisoned;
use super::core::{self, EventListener, ViewSnapshot};
use super::document_snapshot::SnapshotMetadata;
use super::firestore::Firestore;
use super::listener_registration::ListenerRegistration;
use super::query_snapshot::QuerySnapshot;
use super::source::Source;
use crate::error::{FirestoreError, FirestoreResult};

pub(crate) const SERVER_UNAVAILABLE_MESSAGE: &str =
    "Failed to get documents from server. (However, these documents may exist in the local \
     cache. Run again without setting source to Source::Server to retrieve the cached documents.)";

/// Maps view snapshots to query snapshots. Errors pass through untouched.
pub(crate) struct QuerySnapshotConverter {
    firestore: Firestore,
    query: core::Query,
    listener: Box<dyn EventListener<QuerySnapshot>>,
}

impl QuerySnapshotConverter {
    pub(crate) fn new(
        firestore: Firestore,
        query: core::Query,
        listener: Box<dyn EventListener<QuerySnapshot>>,
    ) -> Self {
        Self {
            firestore,
            query,
            listener,
        }
    }
}

impl EventListener<ViewSnapshot> for QuerySnapshotConverter {
    fn on_event(&self, result: FirestoreResult<ViewSnapshot>) {
        let snapshot = match result {
            Ok(snapshot) => snapshot,
            Err(err) => {
                self.listener.on_event(Err(err));
                return;
            }
        };

        let metadata = SnapshotMetadata::new(snapshot.has_pending_writes(), snapshot.from_cache);
        self.listener.on_event(Ok(QuerySnapshot::new(
            self.firestore.clone(),
            self.query.clone(),
            snapshot,
            metadata,
        )));
    }
}

/// Delivers the first event to an `FnOnce` callback and ignores the rest.
pub(crate) struct OnceListener<F> {
    callback: Mutex<Option<F>>,
}

impl<F> OnceListener<F> {
    pub(crate) fn new(callback: F) -> Self {
        Self {
            callback: Mutex::new(Some(callback)),
        }
    }
}

impl<T, F> EventListener<T> for OnceListener<F>
where
    F: FnOnce(FirestoreResult<T>) + Send,
{
    fn on_event(&self, result: FirestoreResult<T>) {
        let callback = lock_unpoisoned(&self.callback).take();
        match callback {
            Some(callback) => callback(result),
            None => tracing::debug!("ignoring event after single delivery"),
        }
    }
}

/// Wraps a one-shot read callback around a streaming registration.
///
/// The registration only exists once `add_snapshot_listener_with_options`
/// returns, but the first event may already be running on the executor by
/// then. The caller sends the registration through `registration`
/// unconditionally right after registering; the first event blocks on the
/// receiving end, removes the registration, and only then runs the callback.
/// Removal mutes the async adapter, so no later event reaches the callback.
pub(crate) struct ListenOnce<F> {
    source: Source,
    registration: Mutex<Option<oneshot::Receiver<ListenerRegistration>>>,
    callback: Mutex<Option<F>>,
}

impl<F> ListenOnce<F> {
    pub(crate) fn new(
        source: Source,
        registration: oneshot::Receiver<ListenerRegistration>,
        callback: F,
    ) -> Self {
        Self {
            source,
            registration: Mutex::new(Some(registration)),
            callback: Mutex::new(Some(callback)),
        }
    }

    fn remove_registration(&self) {
        let Some(receiver) = lock_unpoisoned(&self.registration).take() else {
            return;
        };
        match futures::executor::block_on(receiver) {
            Ok(registration) => registration.remove(),
            Err(oneshot::Canceled) => {
                tracing::warn!("listen-once registration was never published; cannot remove it");
            }
        }
    }
}

impl<F> EventListener<QuerySnapshot> for ListenOnce<F>
where
    F: FnOnce(FirestoreResult<QuerySnapshot>) + Send,
{
    fn on_event(&self, result: FirestoreResult<QuerySnapshot>) {
        let Some(callback) = lock_unpoisoned(&self.callback).take() else {
            tracing::debug!("ignoring event after listen-once completed");
            return;
        };

        // Remove before handing the result over, so that nothing the callback
        // does can observe a second event for this now stale query.
        self.remove_registration();

        let result = match result {
            Ok(snapshot)
                if snapshot.metadata().is_from_cache() && self.source == Source::Server =>
            {
                Err(FirestoreError::unavailable(SERVER_UNAVAILABLE_MESSAGE))
            }
            other => other,
        };
        tracing::debug!(ok = result.is_ok(), source = ?self.source, "listen-once completed");
        callback(result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn once_listener_delivers_first_event_only() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let listener = OnceListener::new(move |result: FirestoreResult<i32>| {
            assert_eq!(result, Ok(7));
            counter.fetch_add(1, Ordering::SeqCst);
        });

        listener.on_event(Ok(7));
        listener.on_event(Ok(8));

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn registration_cell_blocks_until_published() {
        let (sender, receiver) = oneshot::channel::<u32>();
        let waiter = std::thread::spawn(move || futures::executor::block_on(receiver));

        std::thread::sleep(std::time::Duration::from_millis(10));
        sender.send(42).unwrap();

        assert_eq!(waiter.join().unwrap(), Ok(42));
    }

    #[test]
    fn registration_cell_reports_dropped_sender() {
        let (sender, receiver) = oneshot::channel::<u32>();
        drop(sender);
        assert_eq!(futures::executor::block_on(receiver), Err(oneshot::Canceled));
    }
}
