//! In-memory task and interview records behind the HTTP routes.

use std::sync::Arc;

use chrono::Utc;
use shared::{
    domain::{Interview, InterviewId, Task, TaskId, TaskStatus},
    error::{ApiError, ErrorCode},
    protocol::{InterviewCreateRequest, TaskCreateRequest, TaskStatusUpdate},
};
use tokio::sync::RwLock;

#[derive(Default)]
struct Records {
    tasks: Vec<Task>,
    interviews: Vec<Interview>,
    next_task_id: i64,
    next_interview_id: i64,
}

#[derive(Clone)]
pub struct ApiContext {
    records: Arc<RwLock<Records>>,
    pub default_meeting_link: String,
}

impl ApiContext {
    pub fn new(default_meeting_link: impl Into<String>) -> Self {
        Self {
            records: Arc::new(RwLock::new(Records::default())),
            default_meeting_link: default_meeting_link.into(),
        }
    }
}

pub async fn list_tasks(ctx: &ApiContext) -> Vec<Task> {
    ctx.records.read().await.tasks.clone()
}

pub async fn create_task(ctx: &ApiContext, request: TaskCreateRequest) -> Result<Task, ApiError> {
    if request.title.trim().is_empty() {
        return Err(ApiError::new(ErrorCode::Validation, "title is required"));
    }

    let mut records = ctx.records.write().await;
    records.next_task_id += 1;
    let task = Task {
        id: TaskId::new(records.next_task_id.to_string()),
        title: request.title,
        description: request.description,
        assigned_to: request.assigned_to,
        status: TaskStatus::Pending,
        created_at: Some(Utc::now()),
    };
    records.tasks.push(task.clone());
    Ok(task)
}

/// An update without a status leaves the task as it was.
pub async fn update_task_status(
    ctx: &ApiContext,
    task_id: &TaskId,
    update: TaskStatusUpdate,
) -> Result<Task, ApiError> {
    let mut records = ctx.records.write().await;
    let task = records
        .tasks
        .iter_mut()
        .find(|task| &task.id == task_id)
        .ok_or_else(|| ApiError::new(ErrorCode::NotFound, "Task not found"))?;
    if let Some(status) = update.status {
        task.status = status;
    }
    Ok(task.clone())
}

pub async fn list_interviews(ctx: &ApiContext) -> Vec<Interview> {
    ctx.records.read().await.interviews.clone()
}

pub async fn create_interview(
    ctx: &ApiContext,
    request: InterviewCreateRequest,
) -> Result<Interview, ApiError> {
    if request.candidate_name.trim().is_empty() {
        return Err(ApiError::new(
            ErrorCode::Validation,
            "candidate_name is required",
        ));
    }

    let mut records = ctx.records.write().await;
    records.next_interview_id += 1;
    let interview = Interview {
        id: InterviewId::new(records.next_interview_id.to_string()),
        candidate_name: request.candidate_name,
        position: request.position,
        scheduled_at: request.scheduled_at,
        meeting_link: Some(ctx.default_meeting_link.clone()),
        created_at: Some(Utc::now()),
    };
    records.interviews.push(interview.clone());
    Ok(interview)
}

#[cfg(test)]
#[path = "tests/mod_tests.rs"]
mod tests;
