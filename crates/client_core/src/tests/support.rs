//! In-process backend used by the engine tests.

use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use shared::{
    domain::{Interview, InterviewId, Task, TaskId, TaskStatus},
    protocol::{InterviewCreateRequest, TaskCreateRequest},
};
use tokio::sync::{Mutex, Notify};

use crate::backend::HrBackend;

#[derive(Default)]
struct FakeState {
    tasks: Vec<Task>,
    interviews: Vec<Interview>,
    next_id: u64,
    failing_task_reads: usize,
    failing_interview_reads: usize,
    fail_writes: bool,
    hold_writes: bool,
    task_reads: usize,
    writes: usize,
    created_requests: Vec<TaskCreateRequest>,
}

#[derive(Clone, Default)]
pub(crate) struct FakeBackend {
    state: Arc<Mutex<FakeState>>,
    release: Arc<Notify>,
}

impl FakeBackend {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) async fn seed_task(&self, id: &str, title: &str, status: TaskStatus) -> Task {
        let task = sample_task(id, title, status);
        self.state.lock().await.tasks.push(task.clone());
        task
    }

    pub(crate) async fn seed_interview(&self, id: &str, meeting_link: Option<&str>) -> Interview {
        let interview = Interview {
            id: InterviewId::new(id),
            candidate_name: "Kewal Parekh".into(),
            position: "Python Developer".into(),
            scheduled_at: Utc.with_ymd_and_hms(2024, 6, 3, 14, 0, 0).unwrap(),
            meeting_link: meeting_link.map(str::to_string),
            created_at: None,
        };
        self.state.lock().await.interviews.push(interview.clone());
        interview
    }

    pub(crate) async fn clear(&self) {
        let mut guard = self.state.lock().await;
        guard.tasks.clear();
        guard.interviews.clear();
    }

    pub(crate) async fn fail_task_reads(&self, count: usize) {
        self.state.lock().await.failing_task_reads = count;
    }

    pub(crate) async fn fail_interview_reads(&self, count: usize) {
        self.state.lock().await.failing_interview_reads = count;
    }

    pub(crate) async fn fail_writes(&self, fail: bool) {
        self.state.lock().await.fail_writes = fail;
    }

    /// Task creation parks after recording its request until
    /// [`FakeBackend::release_write`] is called.
    pub(crate) async fn hold_writes(&self) {
        self.state.lock().await.hold_writes = true;
    }

    pub(crate) fn release_write(&self) {
        self.release.notify_one();
    }

    pub(crate) async fn task_reads(&self) -> usize {
        self.state.lock().await.task_reads
    }

    pub(crate) async fn writes(&self) -> usize {
        self.state.lock().await.writes
    }

    pub(crate) async fn created_requests(&self) -> Vec<TaskCreateRequest> {
        self.state.lock().await.created_requests.clone()
    }
}

pub(crate) fn sample_task(id: &str, title: &str, status: TaskStatus) -> Task {
    Task {
        id: TaskId::new(id),
        title: title.into(),
        description: format!("{title} details"),
        assigned_to: "Virtual HR".into(),
        status,
        created_at: None,
    }
}

#[async_trait]
impl HrBackend for FakeBackend {
    async fn list_tasks(&self) -> Result<Vec<Task>> {
        let mut guard = self.state.lock().await;
        guard.task_reads += 1;
        if guard.failing_task_reads > 0 {
            guard.failing_task_reads -= 1;
            return Err(anyhow!("connection refused"));
        }
        Ok(guard.tasks.clone())
    }

    async fn create_task(&self, request: &TaskCreateRequest) -> Result<Task> {
        let hold = {
            let mut guard = self.state.lock().await;
            guard.created_requests.push(request.clone());
            guard.hold_writes
        };
        if hold {
            self.release.notified().await;
        }
        let mut guard = self.state.lock().await;
        guard.writes += 1;
        if guard.fail_writes {
            return Err(anyhow!("500 Internal Server Error"));
        }
        guard.next_id += 1;
        let task = Task {
            id: TaskId::new(format!("t{}", guard.next_id)),
            title: request.title.clone(),
            description: request.description.clone(),
            assigned_to: request.assigned_to.clone(),
            status: TaskStatus::Pending,
            created_at: None,
        };
        guard.tasks.push(task.clone());
        Ok(task)
    }

    async fn update_task_status(&self, task_id: &TaskId, status: TaskStatus) -> Result<Task> {
        let mut guard = self.state.lock().await;
        guard.writes += 1;
        if guard.fail_writes {
            return Err(anyhow!("500 Internal Server Error"));
        }
        let task = guard
            .tasks
            .iter_mut()
            .find(|task| &task.id == task_id)
            .ok_or_else(|| anyhow!("Task not found"))?;
        task.status = status;
        Ok(task.clone())
    }

    async fn list_interviews(&self) -> Result<Vec<Interview>> {
        let mut guard = self.state.lock().await;
        if guard.failing_interview_reads > 0 {
            guard.failing_interview_reads -= 1;
            return Err(anyhow!("connection reset"));
        }
        Ok(guard.interviews.clone())
    }

    async fn create_interview(&self, request: &InterviewCreateRequest) -> Result<Interview> {
        let mut guard = self.state.lock().await;
        guard.writes += 1;
        if guard.fail_writes {
            return Err(anyhow!("500 Internal Server Error"));
        }
        guard.next_id += 1;
        let id = format!("i{}", guard.next_id);
        let interview = Interview {
            meeting_link: Some(format!("https://meet.example.com/{id}")),
            id: InterviewId::new(id),
            candidate_name: request.candidate_name.clone(),
            position: request.position.clone(),
            scheduled_at: request.scheduled_at,
            created_at: None,
        };
        guard.interviews.push(interview.clone());
        Ok(interview)
    }
}
