use std::{sync::Arc, time::Duration};

use shared::domain::{Interview, Role, Task, TaskId, TaskStatus};
use tokio::sync::{broadcast, Mutex};
use tracing::{error, info, warn};

use crate::{
    backend::HrBackend,
    clock::Clock,
    draft::{InterviewDraft, TaskDraft},
    error::{Mutation, SyncError},
    poller::{PollHandle, Poller, Snapshot},
    workflow::{next_action, project_view, RoleView},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    /// The local snapshot was replaced; consumers should re-render.
    SnapshotApplied { tasks: usize, interviews: usize },
    /// A user-initiated write failed and should be shown to the user.
    Alert { mutation: Mutation, message: String },
}

#[derive(Default)]
struct LocalState {
    snapshot: Snapshot,
    task_draft: TaskDraft,
    interview_draft: InterviewDraft,
}

/// Owns the local copy of both collections and the form drafts. All reads
/// and writes of that state go through this type.
pub struct SyncClient {
    backend: Arc<dyn HrBackend>,
    poller: Poller,
    inner: Mutex<LocalState>,
    events: broadcast::Sender<ClientEvent>,
}

impl SyncClient {
    pub fn new(backend: Arc<dyn HrBackend>) -> Arc<Self> {
        let (events, _) = broadcast::channel(256);
        Arc::new(Self {
            poller: Poller::new(Arc::clone(&backend)),
            backend,
            inner: Mutex::new(LocalState::default()),
            events,
        })
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<ClientEvent> {
        self.events.subscribe()
    }

    pub async fn snapshot(&self) -> Snapshot {
        self.inner.lock().await.snapshot.clone()
    }

    pub async fn tasks(&self) -> Vec<Task> {
        self.inner.lock().await.snapshot.tasks.clone()
    }

    pub async fn interviews(&self) -> Vec<Interview> {
        self.inner.lock().await.snapshot.interviews.clone()
    }

    /// Replaces both collections wholesale. No diffing, no merge.
    pub async fn apply_snapshot(&self, tasks: Vec<Task>, interviews: Vec<Interview>) {
        let event = ClientEvent::SnapshotApplied {
            tasks: tasks.len(),
            interviews: interviews.len(),
        };
        {
            let mut guard = self.inner.lock().await;
            guard.snapshot = Snapshot { tasks, interviews };
        }
        let _ = self.events.send(event);
    }

    /// Fetches and applies a fresh snapshot. A failed fetch is logged and the
    /// current snapshot stays as it is. Returns whether anything was applied.
    pub async fn refresh(&self) -> bool {
        match self.poller.refresh().await {
            Ok(Snapshot { tasks, interviews }) => {
                self.apply_snapshot(tasks, interviews).await;
                true
            }
            Err(err) => {
                warn!(error = %format!("{err:#}"), "refresh failed; keeping previous snapshot");
                false
            }
        }
    }

    pub async fn task_draft(&self) -> TaskDraft {
        self.inner.lock().await.task_draft.clone()
    }

    pub async fn set_task_draft(&self, draft: TaskDraft) {
        self.inner.lock().await.task_draft = draft;
    }

    pub async fn interview_draft(&self) -> InterviewDraft {
        self.inner.lock().await.interview_draft.clone()
    }

    pub async fn set_interview_draft(&self, draft: InterviewDraft) {
        self.inner.lock().await.interview_draft = draft;
    }

    /// Sends the task draft. The new task shows up with the refresh that
    /// follows, never by local insertion. The draft is cleared only if it
    /// was not edited while the request was in flight.
    pub async fn submit_task(&self) -> Result<Task, SyncError> {
        let draft = self.task_draft().await;
        let request = draft.to_request()?;

        let task = self
            .backend
            .create_task(&request)
            .await
            .map_err(|err| self.raise_alert(Mutation::CreateTask, err))?;
        info!(task_id = %task.id, "task submitted");

        {
            let mut guard = self.inner.lock().await;
            if guard.task_draft == draft {
                guard.task_draft = TaskDraft::default();
            }
        }
        self.refresh().await;
        Ok(task)
    }

    pub async fn submit_interview(&self) -> Result<Interview, SyncError> {
        let draft = self.interview_draft().await;
        let request = draft.to_request()?;

        let interview = self
            .backend
            .create_interview(&request)
            .await
            .map_err(|err| self.raise_alert(Mutation::ScheduleInterview, err))?;
        info!(interview_id = %interview.id, "interview scheduled");

        {
            let mut guard = self.inner.lock().await;
            if guard.interview_draft == draft {
                guard.interview_draft = InterviewDraft::default();
            }
        }
        self.refresh().await;
        Ok(interview)
    }

    /// Sends a status-only update. Local status is left alone until a
    /// refresh brings back the server's view of the task.
    pub async fn advance_status(
        &self,
        task_id: &TaskId,
        next: TaskStatus,
    ) -> Result<Task, SyncError> {
        let task = self
            .backend
            .update_task_status(task_id, next)
            .await
            .map_err(|err| self.raise_alert(Mutation::UpdateStatus, err))?;
        info!(task_id = %task_id, status = %next, "task status updated");

        self.refresh().await;
        Ok(task)
    }

    /// Advances a task by the one step its current local status allows.
    pub async fn advance_task(&self, task_id: &TaskId) -> Result<Task, SyncError> {
        let status = {
            let guard = self.inner.lock().await;
            guard
                .snapshot
                .tasks
                .iter()
                .find(|task| &task.id == task_id)
                .map(|task| task.status)
        };
        let action = status
            .and_then(next_action)
            .ok_or_else(|| SyncError::NoTransition {
                task_id: task_id.clone(),
            })?;
        self.advance_status(task_id, action.target).await
    }

    pub async fn view(&self, role: Role) -> RoleView {
        let guard = self.inner.lock().await;
        project_view(role, &guard.snapshot.tasks, &guard.snapshot.interviews)
    }

    /// Starts the periodic refresh: one right away, then one per `interval`.
    pub fn start_polling(self: &Arc<Self>, clock: Arc<dyn Clock>, interval: Duration) -> PollHandle {
        let client = Arc::clone(self);
        info!(interval_ms = interval.as_millis() as u64, "starting poll schedule");
        PollHandle::spawn(clock, interval, move || {
            let client = Arc::clone(&client);
            async move {
                client.refresh().await;
            }
        })
    }

    fn raise_alert(&self, mutation: Mutation, err: anyhow::Error) -> SyncError {
        error!(
            mutation = mutation.name(),
            error = %format!("{err:#}"),
            "mutation failed"
        );
        let _ = self.events.send(ClientEvent::Alert {
            mutation,
            message: mutation.alert_message().to_string(),
        });
        SyncError::Mutation {
            kind: mutation,
            source: err,
        }
    }
}

#[cfg(test)]
#[path = "tests/store_tests.rs"]
mod tests;
