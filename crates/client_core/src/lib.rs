//! Client-side synchronization engine for the virtual HR desk.
//!
//! [`SyncClient`] holds the last snapshot of tasks and interviews plus the
//! form drafts, polls the backend on a schedule, and routes user writes.
//! [`workflow`] turns that state into the view each role sees.

pub mod backend;
pub mod clock;
pub mod config;
pub mod draft;
pub mod error;
pub mod poller;
pub mod store;
pub mod workflow;

pub use backend::{HrBackend, HttpBackend, MissingBackend};
pub use clock::{Clock, ManualClock, TokioClock};
pub use config::{load_settings, ClientSettings};
pub use draft::{InterviewDraft, TaskDraft};
pub use error::{Mutation, SyncError, ValidationError};
pub use poller::{PollHandle, Poller, Snapshot, DEFAULT_POLL_INTERVAL};
pub use store::{ClientEvent, SyncClient};
pub use workflow::{next_action, project_view, NextAction, RoleView};

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;
