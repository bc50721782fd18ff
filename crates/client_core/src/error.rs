use shared::domain::TaskId;
use thiserror::Error;

/// User-initiated writes against the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    CreateTask,
    ScheduleInterview,
    UpdateStatus,
}

impl Mutation {
    pub fn name(self) -> &'static str {
        match self {
            Self::CreateTask => "create_task",
            Self::ScheduleInterview => "schedule_interview",
            Self::UpdateStatus => "update_status",
        }
    }

    /// Alert text shown to the user when the write fails.
    pub fn alert_message(self) -> &'static str {
        match self {
            Self::CreateTask => "Error creating task",
            Self::ScheduleInterview => "Error scheduling interview",
            Self::UpdateStatus => "Error updating status",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("scheduled_at is not a valid date and time: {0}")]
    InvalidSchedule(String),
}

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("invalid draft: {0}")]
    Validation(#[from] ValidationError),
    #[error("{}: {source}", .kind.alert_message())]
    Mutation {
        kind: Mutation,
        source: anyhow::Error,
    },
    #[error("task {task_id} has no forward transition")]
    NoTransition { task_id: TaskId },
}

impl SyncError {
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
