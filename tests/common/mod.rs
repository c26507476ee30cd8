//! In-memory sync client shared by the integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use firestore_query_core::firestore::core::{
    self, Document, EventListener, Executor, FirestoreClient, ListenOptions, QueryListenerHandle,
    SerialExecutor, Task, ViewSnapshot,
};
use firestore_query_core::firestore::{DocumentKey, MapValue, Value};
use firestore_query_core::{Firestore, FirestoreResult};

/// Install a tracing subscriber honoring `RUST_LOG`, once per test binary.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// One `listen_to_query` call recorded by [`FakeClient`].
pub struct Subscription {
    pub query: core::Query,
    pub options: ListenOptions,
    listener: Arc<dyn EventListener<ViewSnapshot>>,
    detached: Arc<AtomicBool>,
}

impl Subscription {
    pub fn is_detached(&self) -> bool {
        self.detached.load(Ordering::SeqCst)
    }
}

struct FakeHandle {
    detached: Arc<AtomicBool>,
    detach_calls: Arc<AtomicUsize>,
}

impl QueryListenerHandle for FakeHandle {
    fn detach(&self) {
        if !self.detached.swap(true, Ordering::SeqCst) {
            self.detach_calls.fetch_add(1, Ordering::SeqCst);
        }
    }
}

/// Records subscriptions and lets tests push events into them.
#[derive(Default)]
pub struct FakeClient {
    subscriptions: Mutex<Vec<Arc<Subscription>>>,
    detach_calls: Arc<AtomicUsize>,
    cache_result: Mutex<Option<FirestoreResult<ViewSnapshot>>>,
    cache_reads: AtomicUsize,
    // Delivered from a separate thread as soon as a listener registers.
    on_listen: Mutex<Option<FirestoreResult<ViewSnapshot>>>,
}

impl FakeClient {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn subscription(&self, index: usize) -> Arc<Subscription> {
        Arc::clone(&self.subscriptions.lock().unwrap()[index])
    }

    pub fn listen_count(&self) -> usize {
        self.subscriptions.lock().unwrap().len()
    }

    pub fn detach_count(&self) -> usize {
        self.detach_calls.load(Ordering::SeqCst)
    }

    pub fn cache_reads(&self) -> usize {
        self.cache_reads.load(Ordering::SeqCst)
    }

    pub fn set_cache_result(&self, result: FirestoreResult<ViewSnapshot>) {
        *self.cache_result.lock().unwrap() = Some(result);
    }

    pub fn deliver_on_listen(&self, result: FirestoreResult<ViewSnapshot>) {
        *self.on_listen.lock().unwrap() = Some(result);
    }

    /// Delivers to subscription `index` unless it was detached.
    pub fn emit(&self, index: usize, result: FirestoreResult<ViewSnapshot>) {
        let subscription = self.subscription(index);
        if !subscription.is_detached() {
            subscription.listener.on_event(result);
        }
    }

    /// Delivers even if detached, like an event already in flight when the
    /// listener was stopped.
    pub fn emit_in_flight(&self, index: usize, result: FirestoreResult<ViewSnapshot>) {
        self.subscription(index).listener.on_event(result);
    }
}

impl FirestoreClient for FakeClient {
    fn listen_to_query(
        &self,
        query: core::Query,
        options: ListenOptions,
        listener: Arc<dyn EventListener<ViewSnapshot>>,
    ) -> Box<dyn QueryListenerHandle> {
        let detached = Arc::new(AtomicBool::new(false));
        self.subscriptions.lock().unwrap().push(Arc::new(Subscription {
            query,
            options,
            listener: Arc::clone(&listener),
            detached: Arc::clone(&detached),
        }));

        if let Some(result) = self.on_listen.lock().unwrap().take() {
            std::thread::spawn(move || listener.on_event(result));
        }

        Box::new(FakeHandle {
            detached,
            detach_calls: Arc::clone(&self.detach_calls),
        })
    }

    fn get_documents_from_local_cache(
        &self,
        _query: core::Query,
        listener: Arc<dyn EventListener<ViewSnapshot>>,
    ) {
        self.cache_reads.fetch_add(1, Ordering::SeqCst);
        let result = self
            .cache_result
            .lock()
            .unwrap()
            .take()
            .expect("cache result not set");
        listener.on_event(result);
    }
}

/// Runs tasks on the calling thread.
pub struct InlineExecutor;

impl Executor for InlineExecutor {
    fn execute(&self, task: Task) {
        task();
    }
}

/// Firestore over a fake client, for tests that never deliver events.
pub fn inline_firestore() -> (Arc<FakeClient>, Firestore) {
    let client = FakeClient::new();
    let firestore = Firestore::new(client.clone(), Arc::new(InlineExecutor));
    (client, firestore)
}

/// Firestore over a fake client with callbacks on a tokio serial executor.
///
/// Must be called from inside a tokio runtime.
pub fn serial_firestore() -> (Arc<FakeClient>, Arc<SerialExecutor>, Firestore) {
    let client = FakeClient::new();
    let executor = Arc::new(SerialExecutor::current().unwrap());
    let firestore = Firestore::new(client.clone(), executor.clone());
    (client, executor, firestore)
}

/// Waits until every task queued on `executor` so far has run.
pub async fn flush(executor: &SerialExecutor) {
    let (tx, rx) = tokio::sync::oneshot::channel();
    executor.execute(Box::new(move || {
        let _ = tx.send(());
    }));
    rx.await.unwrap();
}

pub fn room(id: &str, score: i64) -> Document {
    let mut data = MapValue::new();
    data.insert("score".to_string(), Value::from(score));
    Document::new(DocumentKey::from_string(&format!("rooms/{id}")).unwrap(), data)
}

pub fn rooms_snapshot(query: &core::Query, from_cache: bool) -> ViewSnapshot {
    ViewSnapshot::new(query.clone(), vec![room("eros", 12), room("zeus", 30)])
        .with_from_cache(from_cache)
}
