//! Step navigation and progress for one workflow.
//!
//! A [`WorkflowController`] joins a catalog definition with the persisted
//! progress from a [`crate::store::WorkflowStateStore`] and talks to the UI
//! only through the injected [`Collaborators`].

pub mod collaborators;
pub mod error;
mod messages;
pub mod progress;
pub mod status;
pub mod workflow_controller;

pub use collaborators::{
    Collaborators, LocaleSource, Navigator, Notification, NotificationKind, Notifier,
    RecordingNavigator, RecordingNotifier,
};
pub use error::ControllerError;
pub use progress::progress_percent;
pub use status::{
    CompletionOutcome, NavigationOutcome, NextStep, StepStatus, WorkflowStepWithStatus,
    WorkflowSummary,
};
pub use workflow_controller::{ControllerOptions, WorkflowController};
