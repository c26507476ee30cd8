//! Query values and the listener plumbing between the public API and the
//! sync client

pub mod client;
pub mod event_listener;
pub mod executor;
pub mod listen_options;
pub mod query;
pub mod view_snapshot;

pub use client::{FirestoreClient, QueryListenerHandle};
pub use event_listener::{AsyncEventListener, EventListener, FnListener};
pub use executor::{Executor, SerialExecutor, Task};
pub use listen_options::ListenOptions;
pub use query::Query;
pub use view_snapshot::{Document, ViewSnapshot};
