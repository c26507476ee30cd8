//! Handle controlling the lifetime of a snapshot listener

use std::fmt;
use std::sync::{Arc, Mutex};

use super::core::event_listener::lock_unpoisoned;
use super::core::{AsyncEventListener, QueryListenerHandle, ViewSnapshot};

struct Registered {
    async_listener: Arc<AsyncEventListener<ViewSnapshot>>,
    handle: Box<dyn QueryListenerHandle>,
}

/// Returned by `Query::add_snapshot_listener`.
///
/// Call [`remove`](Self::remove) to stop the listener. Dropping the
/// registration does not stop it; the subscription then lives as long as the
/// sync client keeps it.
pub struct ListenerRegistration {
    query_id: String,
    registered: Mutex<Option<Registered>>,
}

impl ListenerRegistration {
    pub(crate) fn new(
        query_id: String,
        async_listener: Arc<AsyncEventListener<ViewSnapshot>>,
        handle: Box<dyn QueryListenerHandle>,
    ) -> Self {
        Self {
            query_id,
            registered: Mutex::new(Some(Registered {
                async_listener,
                handle,
            })),
        }
    }

    /// Stops the listener.
    ///
    /// Idempotent and safe to call from any thread, including from inside the
    /// listener's own callback. Once the first call returns, the listener
    /// receives no further events and no callback is still running, except
    /// the one making the call when it comes from inside the listener.
    pub fn remove(&self) {
        // Released before muting: muting waits for a running callback, which
        // may itself be calling `remove`.
        let registered = lock_unpoisoned(&self.registered).take();
        if let Some(Registered {
            async_listener,
            handle,
        }) = registered
        {
            async_listener.mute();
            handle.detach();
            tracing::debug!(query = %self.query_id, "removed snapshot listener");
        }
    }

    /// Whether [`remove`](Self::remove) has been called
    pub fn is_removed(&self) -> bool {
        lock_unpoisoned(&self.registered).is_none()
    }
}

impl fmt::Debug for ListenerRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerRegistration")
            .field("query", &self.query_id)
            .field("removed", &self.is_removed())
            .finish()
    }
}
