use std::{future::Future, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use shared::domain::{Interview, Task};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::{backend::HrBackend, clock::Clock};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Full contents of both collections as returned by one refresh.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub tasks: Vec<Task>,
    pub interviews: Vec<Interview>,
}

pub struct Poller {
    backend: Arc<dyn HrBackend>,
}

impl Poller {
    pub fn new(backend: Arc<dyn HrBackend>) -> Self {
        Self { backend }
    }

    /// Both reads are issued together; either failing fails the refresh.
    pub async fn refresh(&self) -> Result<Snapshot> {
        let (tasks, interviews) = futures::try_join!(
            async { self.backend.list_tasks().await.context("failed to fetch tasks") },
            async {
                self.backend
                    .list_interviews()
                    .await
                    .context("failed to fetch interviews")
            },
        )?;
        debug!(
            tasks = tasks.len(),
            interviews = interviews.len(),
            "fetched snapshot"
        );
        Ok(Snapshot { tasks, interviews })
    }
}

/// Handle to a running poll schedule. Stopping consumes the handle, so a
/// schedule can only be torn down once; dropping it stops it as well.
pub struct PollHandle {
    task: Option<JoinHandle<()>>,
}

impl PollHandle {
    /// Runs `tick` immediately, then again `interval` after each tick
    /// finishes. A slow tick pushes the next one back; nothing is queued.
    pub fn spawn<F, Fut>(clock: Arc<dyn Clock>, interval: Duration, mut tick: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let task = tokio::spawn(async move {
            loop {
                tick().await;
                clock.sleep(interval).await;
            }
        });
        Self { task: Some(task) }
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Cancels the schedule, including a tick that is mid-flight, and waits
    /// for the task to wind down.
    pub async fn stop(mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            let _ = task.await;
            debug!("poll schedule stopped");
        }
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
#[path = "tests/poller_tests.rs"]
mod tests;
