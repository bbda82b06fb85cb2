use crate::catalog::{WorkflowKind, WorkflowStep};
use crate::shared::ids::StepId;
use serde::{Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Pending,
    Active,
    Blocked,
    Complete,
}

impl StepStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Blocked => "blocked",
            Self::Complete => "complete",
        }
    }
}

impl std::fmt::Display for StepStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A catalog step joined with the persisted progress, with texts resolved for
/// the current locale. Recomputed on every query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowStepWithStatus {
    pub step: WorkflowStep,
    pub label: String,
    pub description: Option<String>,
    pub is_complete: bool,
    pub is_active: bool,
    pub is_blocked: bool,
}

impl WorkflowStepWithStatus {
    pub fn id(&self) -> &StepId {
        &self.step.id
    }

    pub fn status(&self) -> StepStatus {
        if self.is_complete {
            StepStatus::Complete
        } else if self.is_active {
            StepStatus::Active
        } else if self.is_blocked {
            StepStatus::Blocked
        } else {
            StepStatus::Pending
        }
    }
}

/// Flat JSON shape of [`WorkflowStepWithStatus`].
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StepView<'a> {
    id: &'a StepId,
    path: &'a str,
    label: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    required_steps: &'a [StepId],
    #[serde(skip_serializing_if = "Option::is_none")]
    estimated_time: Option<u32>,
    is_complete: bool,
    is_active: bool,
    is_blocked: bool,
    status: StepStatus,
}

impl Serialize for WorkflowStepWithStatus {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        StepView {
            id: &self.step.id,
            path: &self.step.path,
            label: &self.label,
            description: self.description.as_deref(),
            required_steps: &self.step.required_steps,
            estimated_time: self.step.estimated_time,
            is_complete: self.is_complete,
            is_active: self.is_active,
            is_blocked: self.is_blocked,
            status: self.status(),
        }
        .serialize(serializer)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NextStep {
    pub workflow: WorkflowKind,
    pub step: WorkflowStepWithStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    Navigated { step: StepId, path: String },
    Blocked { step: StepId, missing: Vec<StepId> },
    UnknownStep { step: String },
}

impl NavigationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Navigated { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionOutcome {
    /// The following step was unblocked and became current.
    Advanced { completed: StepId, next: StepId },
    /// Completed, but the following step still waits on other prerequisites.
    NextBlocked {
        completed: StepId,
        next: StepId,
        missing: Vec<StepId>,
    },
    /// Every step of the workflow is complete now.
    WorkflowComplete { completed: StepId },
    /// The last step in catalog order was completed, but earlier steps are
    /// still open.
    OpenStepsRemain { completed: StepId, open: Vec<StepId> },
    /// Prerequisites are missing; nothing was recorded.
    Blocked { step: StepId, missing: Vec<StepId> },
    UnknownStep { step: String },
}

impl CompletionOutcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Blocked { .. } | Self::UnknownStep { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowSummary {
    pub workflow: WorkflowKind,
    pub title: String,
    pub description: Option<String>,
    pub progress: u8,
    pub current_step_id: Option<StepId>,
    pub estimated_minutes_remaining: u32,
    pub steps: Vec<WorkflowStepWithStatus>,
}
