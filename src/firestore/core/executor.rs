//! Executors that run user callbacks

use tokio::runtime::Handle;
use tokio::sync::mpsc;

use crate::error::{FirestoreError, FirestoreResult};

/// A unit of work submitted to an [`Executor`]
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Runs tasks submitted by listeners.
///
/// Tasks submitted through one executor must run in submission order and
/// never concurrently with each other.
pub trait Executor: Send + Sync {
    /// Schedules `task`
    fn execute(&self, task: Task);
}

/// A FIFO executor on a tokio runtime.
///
/// A single worker task drains the queue. Each task runs on tokio's blocking
/// pool and finishes before the next one starts, so callbacks are serialized
/// and are allowed to block.
#[derive(Debug, Clone)]
pub struct SerialExecutor {
    sender: mpsc::UnboundedSender<Task>,
}

impl SerialExecutor {
    /// Starts the worker on `handle`
    pub fn new(handle: &Handle) -> Self {
        let (sender, mut receiver) = mpsc::unbounded_channel::<Task>();
        handle.spawn(async move {
            while let Some(task) = receiver.recv().await {
                if let Err(err) = tokio::task::spawn_blocking(task).await {
                    tracing::error!(error = %err, "listener callback panicked");
                }
            }
            tracing::debug!("serial executor stopped");
        });
        Self { sender }
    }

    /// Starts the worker on the runtime of the calling context
    pub fn current() -> FirestoreResult<Self> {
        let handle = Handle::try_current().map_err(|err| {
            FirestoreError::FailedPrecondition(format!(
                "SerialExecutor requires a tokio runtime: {err}"
            ))
        })?;
        Ok(Self::new(&handle))
    }
}

impl Executor for SerialExecutor {
    fn execute(&self, task: Task) {
        if self.sender.send(task).is_err() {
            tracing::warn!("executor has shut down; dropping listener task");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tokio::sync::oneshot;

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn runs_tasks_in_submission_order() {
        let executor = SerialExecutor::current().unwrap();
        let order = Arc::new(Mutex::new(Vec::new()));
        let (done_tx, done_rx) = oneshot::channel();

        for i in 0..5 {
            let order = order.clone();
            executor.execute(Box::new(move || {
                // Later tasks must still wait for a slow earlier task.
                if i == 0 {
                    std::thread::sleep(Duration::from_millis(20));
                }
                order.lock().unwrap().push(i);
            }));
        }
        executor.execute(Box::new(move || {
            let _ = done_tx.send(());
        }));

        tokio::time::timeout(Duration::from_secs(5), done_rx)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn survives_panicking_task() {
        let executor = SerialExecutor::current().unwrap();
        let (done_tx, done_rx) = oneshot::channel();

        executor.execute(Box::new(|| panic!("boom")));
        executor.execute(Box::new(move || {
            let _ = done_tx.send(());
        }));

        tokio::time::timeout(Duration::from_secs(5), done_rx)
            .await
            .unwrap()
            .unwrap();
    }

    #[test]
    fn current_requires_runtime() {
        assert!(matches!(
            SerialExecutor::current(),
            Err(FirestoreError::FailedPrecondition(_))
        ));
    }
}
