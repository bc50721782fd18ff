//! Backend collaborator seam.
//!
//! The engine only ever talks to the backend through [`HrBackend`]; the HTTP
//! implementation is one choice among several (tests inject in-process fakes).

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use shared::{
    domain::{Interview, Task, TaskId, TaskStatus},
    error::ApiException,
    protocol::{
        InterviewCreateRequest, TaskCreateRequest, TaskStatusUpdate, INTERVIEWS_ROUTE, TASKS_ROUTE,
    },
};
use tracing::debug;
use url::Url;

use crate::config::ClientSettings;

#[async_trait]
pub trait HrBackend: Send + Sync {
    async fn list_tasks(&self) -> Result<Vec<Task>>;
    async fn create_task(&self, request: &TaskCreateRequest) -> Result<Task>;
    async fn update_task_status(&self, task_id: &TaskId, status: TaskStatus) -> Result<Task>;
    async fn list_interviews(&self) -> Result<Vec<Interview>>;
    async fn create_interview(&self, request: &InterviewCreateRequest) -> Result<Interview>;
}

pub struct MissingBackend;

#[async_trait]
impl HrBackend for MissingBackend {
    async fn list_tasks(&self) -> Result<Vec<Task>> {
        Err(anyhow!("backend collaborator is unavailable"))
    }

    async fn create_task(&self, _request: &TaskCreateRequest) -> Result<Task> {
        Err(anyhow!("backend collaborator is unavailable"))
    }

    async fn update_task_status(&self, task_id: &TaskId, _status: TaskStatus) -> Result<Task> {
        Err(anyhow!(
            "backend collaborator is unavailable for task {task_id}"
        ))
    }

    async fn list_interviews(&self) -> Result<Vec<Interview>> {
        Err(anyhow!("backend collaborator is unavailable"))
    }

    async fn create_interview(&self, _request: &InterviewCreateRequest) -> Result<Interview> {
        Err(anyhow!("backend collaborator is unavailable"))
    }
}

pub struct HttpBackend {
    http: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_settings(settings: &ClientSettings) -> Self {
        Self::new(settings.api_base_url.clone())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, route: &str) -> String {
        format!("{}{route}", self.base_url)
    }

    /// `/tasks/{id}` with the id percent-encoded as a single path segment.
    fn task_url(&self, task_id: &TaskId) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .with_context(|| format!("invalid api base url '{}'", self.base_url))?;
        url.path_segments_mut()
            .map_err(|_| anyhow!("api base url '{}' cannot take a path", self.base_url))?
            .pop_if_empty()
            .push(TASKS_ROUTE.trim_matches('/'))
            .push(task_id.as_str());
        Ok(url)
    }
}

/// Non-2xx responses become errors; an `ApiError` or `{detail}` body is kept
/// as the error source when the backend sends one.
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    let url = response.url().clone();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        if let Some(api_error) = ApiException::from_body(status.as_u16(), &body) {
            return Err(api_error).with_context(|| format!("{url} responded with {status}"));
        }
        return Err(anyhow!("{url} responded with {status}: {body}"));
    }

    response
        .json::<T>()
        .await
        .with_context(|| format!("failed to decode response from {url}"))
}

#[async_trait]
impl HrBackend for HttpBackend {
    async fn list_tasks(&self) -> Result<Vec<Task>> {
        let response = self.http.get(self.url(TASKS_ROUTE)).send().await?;
        decode(response).await
    }

    async fn create_task(&self, request: &TaskCreateRequest) -> Result<Task> {
        let response = self
            .http
            .post(self.url(TASKS_ROUTE))
            .json(request)
            .send()
            .await?;
        let task: Task = decode(response).await?;
        debug!(task_id = %task.id, "backend created task");
        Ok(task)
    }

    async fn update_task_status(&self, task_id: &TaskId, status: TaskStatus) -> Result<Task> {
        let response = self
            .http
            .patch(self.task_url(task_id)?)
            .json(&TaskStatusUpdate {
                status: Some(status),
            })
            .send()
            .await?;
        decode(response).await
    }

    async fn list_interviews(&self) -> Result<Vec<Interview>> {
        let response = self.http.get(self.url(INTERVIEWS_ROUTE)).send().await?;
        decode(response).await
    }

    async fn create_interview(&self, request: &InterviewCreateRequest) -> Result<Interview> {
        let response = self
            .http
            .post(self.url(INTERVIEWS_ROUTE))
            .json(request)
            .send()
            .await?;
        let interview: Interview = decode(response).await?;
        debug!(interview_id = %interview.id, "backend created interview");
        Ok(interview)
    }
}

#[cfg(test)]
#[path = "tests/backend_tests.rs"]
mod tests;
