use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{domain::TaskStatus, time};

pub const TASKS_ROUTE: &str = "/tasks/";
pub const INTERVIEWS_ROUTE: &str = "/interviews/";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskCreateRequest {
    pub title: String,
    pub description: String,
    pub assigned_to: String,
}

/// Partial update; only the status is ever sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TaskStatusUpdate {
    #[serde(default)]
    pub status: Option<TaskStatus>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewCreateRequest {
    pub candidate_name: String,
    pub position: String,
    /// Sent as local wall-clock time without an offset.
    #[serde(with = "time::local")]
    pub scheduled_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WelcomeResponse {
    pub message: String,
}
