//! Pure projection of the local snapshot into what each role sees.

use chrono::{DateTime, Local, Utc};
use shared::domain::{Interview, InterviewId, Role, Task, TaskId, TaskStatus};
use url::Url;

pub const RESOLVED_LABEL: &str = "Resolved ✓";
pub const JOIN_CALL_LABEL: &str = "Join Call";
pub const REQUESTED_BY_LABEL: &str = "Requested by Employee";
const LOCAL_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NextAction {
    pub label: &'static str,
    pub target: TaskStatus,
}

/// The single forward step offered for a status, if any.
pub fn next_action(status: TaskStatus) -> Option<NextAction> {
    let target = status.next()?;
    let label = match status {
        TaskStatus::Pending => "Mark as Seen",
        TaskStatus::InProgress => "Confirm Resolved",
        TaskStatus::Completed => return None,
    };
    Some(NextAction { label, target })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusBadge {
    pub label: &'static str,
    pub style_key: &'static str,
}

impl From<TaskStatus> for StatusBadge {
    fn from(status: TaskStatus) -> Self {
        Self {
            label: status.label(),
            style_key: status.style_key(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskAffordance {
    Advance(NextAction),
    Resolved,
}

impl TaskAffordance {
    pub fn for_status(status: TaskStatus) -> Self {
        next_action(status).map_or(Self::Resolved, Self::Advance)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Advance(action) => action.label,
            Self::Resolved => RESOLVED_LABEL,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormField {
    pub name: &'static str,
    pub label: &'static str,
    pub placeholder: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormSpec {
    pub heading: &'static str,
    pub submit_label: &'static str,
    pub fields: &'static [FormField],
}

pub const TASK_FORM: FormSpec = FormSpec {
    heading: "Assign Task to Virtual HR",
    submit_label: "Send to HR",
    fields: &[
        FormField {
            name: "title",
            label: "Task Title",
            placeholder: "e.g. Please review my leaves",
        },
        FormField {
            name: "description",
            label: "Description / Request",
            placeholder: "Details about your request for HR...",
        },
    ],
};

pub const INTERVIEW_FORM: FormSpec = FormSpec {
    heading: "Schedule New Interview",
    submit_label: "Schedule Now",
    fields: &[
        FormField {
            name: "candidate_name",
            label: "Candidate Name",
            placeholder: "e.g. Kewal Parekh",
        },
        FormField {
            name: "position",
            label: "Position",
            placeholder: "e.g. Python Developer",
        },
        FormField {
            name: "scheduled_at",
            label: "Date & Time",
            placeholder: "YYYY-MM-DDTHH:MM",
        },
    ],
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListSection<T> {
    pub heading: &'static str,
    pub items: Vec<T>,
    pub empty_text: &'static str,
}

impl<T> ListSection<T> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestRow {
    pub task_id: TaskId,
    pub title: String,
    pub badge: StatusBadge,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboxRow {
    pub task_id: TaskId,
    pub title: String,
    pub description: String,
    pub requested_by: &'static str,
    pub badge: StatusBadge,
    pub affordance: TaskAffordance,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinCall {
    pub label: &'static str,
    pub link: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterviewCard {
    pub interview_id: InterviewId,
    pub candidate_name: String,
    pub position: String,
    pub scheduled_at: DateTime<Utc>,
    pub scheduled_local: String,
    pub join: Option<JoinCall>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeView {
    pub form: FormSpec,
    pub requests: ListSection<RequestRow>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HrView {
    pub form: FormSpec,
    pub upcoming: ListSection<InterviewCard>,
    pub inbox: ListSection<InboxRow>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleView {
    Employee(EmployeeView),
    Hr(HrView),
}

impl RoleView {
    pub fn role(&self) -> Role {
        match self {
            Self::Employee(_) => Role::Employee,
            Self::Hr(_) => Role::Hr,
        }
    }
}

pub fn project_view(role: Role, tasks: &[Task], interviews: &[Interview]) -> RoleView {
    match role {
        Role::Employee => RoleView::Employee(EmployeeView {
            form: TASK_FORM,
            requests: ListSection {
                heading: "Recent Requests Status",
                items: tasks.iter().map(request_row).collect(),
                empty_text: "You haven't made any requests yet.",
            },
        }),
        Role::Hr => RoleView::Hr(HrView {
            form: INTERVIEW_FORM,
            upcoming: ListSection {
                heading: "Upcoming Interviews",
                items: interviews.iter().map(interview_card).collect(),
                empty_text: "No interviews scheduled.",
            },
            inbox: ListSection {
                heading: "Task Inbox (Virtual HR View)",
                items: tasks.iter().map(inbox_row).collect(),
                empty_text: "No tasks from employees yet.",
            },
        }),
    }
}

fn request_row(task: &Task) -> RequestRow {
    RequestRow {
        task_id: task.id.clone(),
        title: task.title.clone(),
        badge: task.status.into(),
    }
}

fn inbox_row(task: &Task) -> InboxRow {
    InboxRow {
        task_id: task.id.clone(),
        title: task.title.clone(),
        description: task.description.clone(),
        requested_by: REQUESTED_BY_LABEL,
        badge: task.status.into(),
        affordance: TaskAffordance::for_status(task.status),
    }
}

fn interview_card(interview: &Interview) -> InterviewCard {
    InterviewCard {
        interview_id: interview.id.clone(),
        candidate_name: interview.candidate_name.clone(),
        position: interview.position.clone(),
        scheduled_at: interview.scheduled_at,
        scheduled_local: interview
            .scheduled_at
            .with_timezone(&Local)
            .format(LOCAL_TIME_FORMAT)
            .to_string(),
        join: join_call(interview.meeting_link.as_deref()),
    }
}

/// Only links that parse as URLs are offered; the original string is kept.
fn join_call(meeting_link: Option<&str>) -> Option<JoinCall> {
    let link = meeting_link?.trim();
    Url::parse(link).ok()?;
    Some(JoinCall {
        label: JOIN_CALL_LABEL,
        link: link.to_string(),
    })
}

#[cfg(test)]
#[path = "tests/workflow_tests.rs"]
mod tests;
