//! # Background Tasks
//!
//! Work that must not hold up a response (conversation indexing) is handed
//! to a [`TaskQueue`]. A single worker runs jobs one at a time; a failing or
//! panicking job is logged and the worker moves on. Nothing a job does is
//! reported back to the request that queued it.

use futures_util::future::BoxFuture;
use log::{debug, error, warn};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::CofounderError;

struct Job {
    name: String,
    task: BoxFuture<'static, Result<(), CofounderError>>,
}

/// Handle for submitting background jobs.
#[derive(Clone)]
pub struct TaskQueue {
    sender: mpsc::UnboundedSender<Job>,
}

impl TaskQueue {
    /// Start the worker. The worker stops once every queue handle is dropped
    /// and the remaining jobs have run.
    pub fn start() -> (Self, JoinHandle<()>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let worker = tokio::spawn(run_worker(receiver));
        (Self { sender }, worker)
    }

    /// Queue a job. Returns false if the worker has already stopped.
    pub fn submit(
        &self,
        name: impl Into<String>,
        task: BoxFuture<'static, Result<(), CofounderError>>,
    ) -> bool {
        let name = name.into();
        match self.sender.send(Job { name, task }) {
            Ok(()) => true,
            Err(rejected) => {
                warn!("task queue closed, dropping job '{}'", rejected.0.name);
                false
            }
        }
    }
}

async fn run_worker(mut receiver: mpsc::UnboundedReceiver<Job>) {
    while let Some(job) = receiver.recv().await {
        debug!("running background job '{}'", job.name);
        match tokio::spawn(job.task).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => error!("background job '{}' failed: {}", job.name, e),
            Err(e) => error!("background job '{}' panicked: {}", job.name, e),
        }
    }
    debug!("task queue drained");
}
