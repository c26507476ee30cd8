//! Listener capabilities and the executor-bound dispatch adapter

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, ThreadId};

use super::executor::Executor;
use crate::error::FirestoreResult;

/// Receives a stream of result-or-error events.
pub trait EventListener<T>: Send + Sync {
    /// Called once per event
    fn on_event(&self, result: FirestoreResult<T>);
}

impl<T, L> EventListener<T> for Arc<L>
where
    L: EventListener<T> + ?Sized,
{
    fn on_event(&self, result: FirestoreResult<T>) {
        (**self).on_event(result);
    }
}

impl<T, L> EventListener<T> for Box<L>
where
    L: EventListener<T> + ?Sized,
{
    fn on_event(&self, result: FirestoreResult<T>) {
        (**self).on_event(result);
    }
}

/// Adapts an `FnMut` closure into an [`EventListener`].
pub struct FnListener<F> {
    callback: Mutex<F>,
}

impl<F> FnListener<F> {
    /// Wraps `callback`
    pub fn new(callback: F) -> Self {
        Self {
            callback: Mutex::new(callback),
        }
    }
}

impl<T, F> EventListener<T> for FnListener<F>
where
    F: FnMut(FirestoreResult<T>) + Send,
{
    fn on_event(&self, result: FirestoreResult<T>) {
        let mut callback = lock_unpoisoned(&self.callback);
        (*callback)(result);
    }
}

struct Delegate<T> {
    muted: AtomicBool,
    // Held for the whole check-and-call of one delivery.
    delivery: Mutex<()>,
    delivering_on: Mutex<Option<ThreadId>>,
    listener: Box<dyn EventListener<T>>,
}

/// Clears the delivering thread, also when the listener panics.
struct DeliveringOn<'a>(&'a Mutex<Option<ThreadId>>);

impl<'a> DeliveringOn<'a> {
    fn enter(slot: &'a Mutex<Option<ThreadId>>) -> Self {
        *lock_unpoisoned(slot) = Some(thread::current().id());
        Self(slot)
    }
}

impl Drop for DeliveringOn<'_> {
    fn drop(&mut self) {
        *lock_unpoisoned(self.0) = None;
    }
}

impl<T> Delegate<T> {
    fn deliver(&self, result: FirestoreResult<T>) {
        let _delivery = lock_unpoisoned(&self.delivery);
        if self.muted.load(Ordering::Acquire) {
            return;
        }
        let _delivering_on = DeliveringOn::enter(&self.delivering_on);
        self.listener.on_event(result);
    }

    fn mute(&self) {
        self.muted.store(true, Ordering::Release);
        if *lock_unpoisoned(&self.delivering_on) == Some(thread::current().id()) {
            // Muted from inside the listener; the current delivery is ours.
            return;
        }
        drop(lock_unpoisoned(&self.delivery));
    }
}

/// Re-dispatches every event onto an executor.
///
/// The wrapped listener never runs on the thread that raised the event. Once
/// [`mute`](Self::mute) returns, events still queued on the executor are
/// dropped instead of delivered, and no delivery is still running.
pub struct AsyncEventListener<T> {
    executor: Arc<dyn Executor>,
    delegate: Arc<Delegate<T>>,
}

impl<T> AsyncEventListener<T> {
    /// Binds `listener` to `executor`
    pub fn new(executor: Arc<dyn Executor>, listener: Box<dyn EventListener<T>>) -> Arc<Self> {
        Arc::new(Self {
            executor,
            delegate: Arc::new(Delegate {
                muted: AtomicBool::new(false),
                delivery: Mutex::new(()),
                delivering_on: Mutex::new(None),
                listener,
            }),
        })
    }

    /// Stops all further deliveries, including ones already queued.
    ///
    /// Blocks until a delivery running on another thread has returned. Called
    /// from inside the listener itself it returns at once, and the current
    /// delivery finishes after it.
    pub fn mute(&self) {
        self.delegate.mute();
    }

    /// Whether [`mute`](Self::mute) has been called
    pub fn is_muted(&self) -> bool {
        self.delegate.muted.load(Ordering::Acquire)
    }
}

impl<T: Send + 'static> EventListener<T> for AsyncEventListener<T> {
    fn on_event(&self, result: FirestoreResult<T>) {
        let delegate = Arc::clone(&self.delegate);
        self.executor
            .execute(Box::new(move || delegate.deliver(result)));
    }
}

pub(crate) fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
