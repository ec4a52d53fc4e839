//! Background jobs with a cancellation token.
//!
//! The dashboard issues exactly one dataset fetch per lifetime, plus one job per
//! sign-in or remote vote write. Each request runs on a worker thread; if its
//! handle is dropped first, the token is set and the worker drops its result
//! instead of delivering it.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread::{self, JoinHandle};

use tracing::debug;

use crate::domain::RawRecord;
use crate::error::AppError;

use super::socrata::SalesClient;

pub type FetchResult = Result<Vec<RawRecord>, AppError>;

/// Handle to the dataset fetch.
pub type FetchHandle = TaskHandle<Vec<RawRecord>>;

/// Shared flag checked by the worker before it publishes a result.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Handle to one outstanding job. Dropping it cancels the job.
pub struct TaskHandle<T> {
    token: CancelToken,
    rx: Receiver<Result<T, AppError>>,
    worker: Option<JoinHandle<()>>,
}

impl FetchHandle {
    /// Start fetching the grouped dataset on a worker thread.
    pub fn spawn(client: SalesClient) -> Self {
        Self::spawn_with(move || client.fetch_aggregates())
    }
}

impl<T: Send + 'static> TaskHandle<T> {
    /// Run `job` on a worker thread.
    pub fn spawn_with<F>(job: F) -> Self
    where
        F: FnOnce() -> Result<T, AppError> + Send + 'static,
    {
        let token = CancelToken::new();
        let (tx, rx) = mpsc::channel();
        let worker_token = token.clone();

        let worker = thread::spawn(move || {
            let result = job();
            if worker_token.is_cancelled() {
                debug!("job finished after cancellation; result discarded");
                return;
            }
            // The receiver may already be gone; nothing to deliver to then.
            let _ = tx.send(result);
        });

        Self {
            token,
            rx,
            worker: Some(worker),
        }
    }

    /// Non-blocking poll; `Some` exactly once when the job completes.
    pub fn try_take(&mut self) -> Option<Result<T, AppError>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Block until the worker finishes, then return its result (if delivered).
    pub fn wait(mut self) -> Option<Result<T, AppError>> {
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
        self.rx.try_recv().ok()
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn token(&self) -> &CancelToken {
        &self.token
    }
}

impl<T> Drop for TaskHandle<T> {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Barrier;

    fn rows() -> Vec<RawRecord> {
        vec![RawRecord {
            year: Some(2020),
            month: Some(1),
            category: "WINE".to_string(),
            retail_sales: 1.0,
            warehouse_sales: 2.0,
        }]
    }

    #[test]
    fn delivers_result_when_not_cancelled() {
        let handle = FetchHandle::spawn_with(|| Ok(rows()));
        let result = handle.wait().expect("result delivered");
        assert_eq!(result.unwrap(), rows());
    }

    #[test]
    fn errors_are_delivered_too() {
        let handle = FetchHandle::spawn_with(|| Err(AppError::http(500, "Data fetch failed (500)")));
        let err = handle.wait().expect("result delivered").unwrap_err();
        assert_eq!(err.status(), Some(500));
    }

    #[test]
    fn non_fetch_jobs_share_the_contract() {
        let mut handle = TaskHandle::spawn_with(|| Ok::<_, AppError>("signed in".to_string()));
        let result = loop {
            if let Some(result) = handle.try_take() {
                break result;
            }
            std::thread::yield_now();
        };
        assert_eq!(result.unwrap(), "signed in");
        assert!(handle.try_take().is_none());
    }

    #[test]
    fn cancelled_fetch_does_not_deliver() {
        let gate = Arc::new(Barrier::new(2));
        let worker_gate = gate.clone();
        let handle = FetchHandle::spawn_with(move || {
            worker_gate.wait();
            Ok(rows())
        });

        handle.cancel();
        gate.wait();
        assert!(handle.wait().is_none());
    }

    #[test]
    fn drop_sets_the_token() {
        let gate = Arc::new(Barrier::new(2));
        let worker_gate = gate.clone();
        let handle = FetchHandle::spawn_with(move || {
            worker_gate.wait();
            Ok(Vec::new())
        });
        let token = handle.token().clone();
        drop(handle);
        assert!(token.is_cancelled());
        gate.wait();
    }
}
