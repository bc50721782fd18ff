//! Form input buffers, held locally until submitted.

use shared::{
    domain::VIRTUAL_HR,
    protocol::{InterviewCreateRequest, TaskCreateRequest},
    time::parse_timestamp,
};

use crate::error::ValidationError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
}

impl TaskDraft {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }

    /// The recipient is always the virtual HR desk, whatever the form held.
    pub fn to_request(&self) -> Result<TaskCreateRequest, ValidationError> {
        require("title", &self.title)?;
        require("description", &self.description)?;
        Ok(TaskCreateRequest {
            title: self.title.clone(),
            description: self.description.clone(),
            assigned_to: VIRTUAL_HR.to_string(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterviewDraft {
    pub candidate_name: String,
    pub position: String,
    /// Raw form value, `YYYY-MM-DDTHH:MM` in local time or RFC 3339.
    pub scheduled_at: String,
}

impl InterviewDraft {
    pub fn new(
        candidate_name: impl Into<String>,
        position: impl Into<String>,
        scheduled_at: impl Into<String>,
    ) -> Self {
        Self {
            candidate_name: candidate_name.into(),
            position: position.into(),
            scheduled_at: scheduled_at.into(),
        }
    }

    pub fn to_request(&self) -> Result<InterviewCreateRequest, ValidationError> {
        require("candidate_name", &self.candidate_name)?;
        require("position", &self.position)?;
        require("scheduled_at", &self.scheduled_at)?;
        let scheduled_at = parse_timestamp(&self.scheduled_at)
            .ok_or_else(|| ValidationError::InvalidSchedule(self.scheduled_at.clone()))?;
        Ok(InterviewCreateRequest {
            candidate_name: self.candidate_name.clone(),
            position: self.position.clone(),
            scheduled_at,
        })
    }
}

fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(())
}
