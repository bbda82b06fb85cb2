use super::collaborators::{Collaborators, Notification};
use super::error::ControllerError;
use super::messages;
use super::progress::progress_percent;
use super::status::{
    CompletionOutcome, NavigationOutcome, NextStep, WorkflowStepWithStatus, WorkflowSummary,
};
use crate::catalog::{Locale, WorkflowCatalog, WorkflowDefinition, WorkflowKind, WorkflowStep};
use crate::shared::ids::{DataKey, StepId};
use crate::shared::logging::{EventLog, LEVEL_INFO, LEVEL_WARN};
use crate::store::WorkflowStateStore;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerOptions {
    /// When the current step is the last one, suggest the first step of every
    /// other workflow instead of returning nothing.
    #[serde(default)]
    pub cross_workflow_suggestions: bool,
    /// Count an unfinished active step as half complete in
    /// [`WorkflowController::workflow_progress_at`].
    #[serde(default)]
    pub partial_credit_for_active_step: bool,
}

pub struct WorkflowController {
    catalog: Arc<WorkflowCatalog>,
    definition: WorkflowDefinition,
    store: WorkflowStateStore,
    collaborators: Collaborators,
    options: ControllerOptions,
    log: EventLog,
}

impl WorkflowController {
    pub fn new(
        catalog: Arc<WorkflowCatalog>,
        kind: WorkflowKind,
        store: WorkflowStateStore,
        collaborators: Collaborators,
        options: ControllerOptions,
    ) -> Result<Self, ControllerError> {
        let definition = catalog
            .get(kind)
            .cloned()
            .ok_or(ControllerError::UnknownWorkflow { kind })?;
        Ok(Self {
            catalog,
            definition,
            store,
            collaborators,
            options,
            log: EventLog::disabled(),
        })
    }

    pub fn with_event_log(mut self, log: EventLog) -> Self {
        self.log = log;
        self
    }

    pub fn kind(&self) -> WorkflowKind {
        self.definition.id
    }

    pub fn definition(&self) -> &WorkflowDefinition {
        &self.definition
    }

    pub fn options(&self) -> ControllerOptions {
        self.options
    }

    pub fn store(&self) -> &WorkflowStateStore {
        &self.store
    }

    fn locale(&self) -> Locale {
        self.collaborators.locale.current_locale()
    }

    pub fn title(&self) -> String {
        self.definition.title.resolve(self.locale()).to_string()
    }

    /// Every catalog step, in catalog order, annotated with progress.
    pub fn steps_with_status(&self) -> Vec<WorkflowStepWithStatus> {
        let completed = self.store.completed_steps(self.kind());
        let current = self.resolved_current_step_id(&self.definition);
        self.definition
            .steps
            .iter()
            .map(|step| self.annotate(step, &completed, current.as_ref()))
            .collect()
    }

    /// The persisted current step, or the first unblocked catalog step when
    /// none is persisted or the persisted id no longer exists.
    pub fn current_step(&self) -> Option<WorkflowStepWithStatus> {
        let current = self.resolved_current_step_id(&self.definition)?;
        let step = self.definition.step(current.as_str())?;
        let completed = self.store.completed_steps(self.kind());
        Some(self.annotate(step, &completed, Some(&current)))
    }

    pub fn is_step_blocked(&self, step_id: &str) -> bool {
        !self.missing_prerequisites(step_id).is_empty()
    }

    /// Required steps of `step_id` that are not complete yet, in the order
    /// they are declared. Empty for unknown steps.
    pub fn missing_prerequisites(&self, step_id: &str) -> Vec<StepId> {
        let Some(step) = self.definition.step(step_id) else {
            return Vec::new();
        };
        let completed = self.store.completed_steps(self.kind());
        missing_in(step, &completed)
    }

    pub fn go_to_step(&self, step_id: &str) -> NavigationOutcome {
        let Some(step) = self.definition.step(step_id) else {
            self.log_event(LEVEL_WARN, "step.unknown", step_id);
            return NavigationOutcome::UnknownStep {
                step: step_id.to_string(),
            };
        };

        let missing = self.missing_prerequisites(step_id);
        if !missing.is_empty() {
            self.warn_blocked(step, &missing);
            return NavigationOutcome::Blocked {
                step: step.id.clone(),
                missing,
            };
        }

        self.store.set_current_step(self.kind(), &step.id);
        self.collaborators.navigator.navigate(&step.path);
        self.log_event(LEVEL_INFO, "step.navigated", step_id);
        NavigationOutcome::Navigated {
            step: step.id.clone(),
            path: step.path.clone(),
        }
    }

    pub fn complete_step(&self, step_id: &str) -> CompletionOutcome {
        let Some(step) = self.definition.step(step_id) else {
            self.log_event(LEVEL_WARN, "step.unknown", step_id);
            return CompletionOutcome::UnknownStep {
                step: step_id.to_string(),
            };
        };
        let missing = self.missing_prerequisites(step_id);
        if !missing.is_empty() {
            self.warn_blocked(step, &missing);
            return CompletionOutcome::Blocked {
                step: step.id.clone(),
                missing,
            };
        }
        let locale = self.locale();

        self.store.mark_step_complete(self.kind(), &step.id);
        self.notify(messages::step_completed(locale, step.label.resolve(locale)));
        self.log_event(LEVEL_INFO, "step.completed", step_id);

        let completed = self.store.completed_steps(self.kind());
        let open = self
            .definition
            .steps
            .iter()
            .filter(|candidate| !completed.contains(&candidate.id))
            .map(|candidate| candidate.id.clone())
            .collect::<Vec<_>>();
        if open.is_empty() {
            self.notify(messages::workflow_completed(locale, &self.title()));
            self.log_event(LEVEL_INFO, "workflow.completed", step_id);
            return CompletionOutcome::WorkflowComplete {
                completed: step.id.clone(),
            };
        }

        let Some(next) = self.definition.step_after(step_id) else {
            return CompletionOutcome::OpenStepsRemain {
                completed: step.id.clone(),
                open,
            };
        };

        let missing = self.missing_prerequisites(next.id.as_str());
        if !missing.is_empty() {
            return CompletionOutcome::NextBlocked {
                completed: step.id.clone(),
                next: next.id.clone(),
                missing,
            };
        }
        self.go_to_step(next.id.as_str());
        CompletionOutcome::Advanced {
            completed: step.id.clone(),
            next: next.id.clone(),
        }
    }

    /// Up to `limit` steps after `current_step_id` (or the resolved current
    /// step) in catalog order. Past the last step this is empty unless
    /// cross-workflow suggestions are enabled.
    pub fn next_steps(&self, current_step_id: Option<&str>, limit: usize) -> Vec<NextStep> {
        if limit == 0 {
            return Vec::new();
        }
        let current = match current_step_id {
            Some(raw) => raw.to_string(),
            None => match self.resolved_current_step_id(&self.definition) {
                Some(id) => id.as_str().to_string(),
                None => return Vec::new(),
            },
        };
        let Some(index) = self.definition.step_index(&current) else {
            return Vec::new();
        };

        let following = &self.definition.steps[index + 1..];
        if !following.is_empty() {
            let completed = self.store.completed_steps(self.kind());
            let active = self.resolved_current_step_id(&self.definition);
            return following
                .iter()
                .take(limit)
                .map(|step| NextStep {
                    workflow: self.kind(),
                    step: self.annotate(step, &completed, active.as_ref()),
                })
                .collect();
        }

        if !self.options.cross_workflow_suggestions {
            return Vec::new();
        }
        self.catalog
            .workflows()
            .iter()
            .filter(|workflow| workflow.id != self.kind())
            .filter_map(|workflow| {
                let first = workflow.first_step()?;
                let completed = self.store.completed_steps(workflow.id);
                let active = self.resolved_current_step_id(workflow);
                Some(NextStep {
                    workflow: workflow.id,
                    step: self.annotate(first, &completed, active.as_ref()),
                })
            })
            .take(limit)
            .collect()
    }

    /// Share of catalog steps that are complete, as a rounded percent.
    pub fn workflow_progress(&self) -> u8 {
        let completed = self.store.completed_steps(self.kind());
        progress_percent(
            self.completed_in_catalog(&completed),
            self.definition.steps.len(),
            false,
        )
    }

    /// Like [`Self::workflow_progress`], with half credit for `active_step_id`
    /// when partial credit is enabled and that step is not complete yet.
    pub fn workflow_progress_at(&self, active_step_id: &str) -> u8 {
        let completed = self.store.completed_steps(self.kind());
        let partial = self.options.partial_credit_for_active_step
            && self.definition.step(active_step_id).is_some()
            && !completed.contains(active_step_id);
        progress_percent(
            self.completed_in_catalog(&completed),
            self.definition.steps.len(),
            partial,
        )
    }

    pub fn reset_workflow_progress(&self) {
        self.store.reset_workflow(self.kind());
        self.notify(messages::workflow_reset(self.locale(), &self.title()));
        let first = self
            .definition
            .first_step()
            .map(|step| step.id.as_str().to_string())
            .unwrap_or_default();
        self.log_event(LEVEL_INFO, "workflow.reset", &first);
    }

    pub fn save_workflow_data(&self, key: &DataKey, value: Value) {
        self.store.save_workflow_data(self.kind(), key, value);
    }

    pub fn workflow_data(&self, key: &str) -> Option<Value> {
        self.store.workflow_data(self.kind(), key)
    }

    pub fn summary(&self) -> WorkflowSummary {
        let locale = self.locale();
        let steps = self.steps_with_status();
        let estimated_minutes_remaining = steps
            .iter()
            .filter(|step| !step.is_complete)
            .filter_map(|step| step.step.estimated_time)
            .sum();
        WorkflowSummary {
            workflow: self.kind(),
            title: self.title(),
            description: self
                .definition
                .description
                .as_ref()
                .map(|text| text.resolve(locale).to_string()),
            progress: self.workflow_progress(),
            current_step_id: steps.iter().find(|s| s.is_active).map(|s| s.id().clone()),
            estimated_minutes_remaining,
            steps,
        }
    }

    fn resolved_current_step_id(&self, workflow: &WorkflowDefinition) -> Option<StepId> {
        match self.store.current_step(workflow.id) {
            Some(id) if workflow.step(id.as_str()).is_some() => Some(id),
            Some(id) => {
                self.log.append(
                    LEVEL_WARN,
                    "state.unknown_current_step",
                    &[
                        ("workflow", Value::from(workflow.id.as_str())),
                        ("step", Value::from(id.as_str())),
                    ],
                );
                self.first_open_step(workflow)
            }
            None => self.first_open_step(workflow),
        }
    }

    /// First step whose prerequisites are all complete, falling back to the
    /// first catalog step.
    fn first_open_step(&self, workflow: &WorkflowDefinition) -> Option<StepId> {
        let completed = self.store.completed_steps(workflow.id);
        workflow
            .steps
            .iter()
            .find(|step| missing_in(step, &completed).is_empty())
            .or_else(|| workflow.first_step())
            .map(|step| step.id.clone())
    }

    fn annotate(
        &self,
        step: &WorkflowStep,
        completed: &BTreeSet<StepId>,
        current: Option<&StepId>,
    ) -> WorkflowStepWithStatus {
        let locale = self.locale();
        WorkflowStepWithStatus {
            step: step.clone(),
            label: step.label.resolve(locale).to_string(),
            description: step
                .description
                .as_ref()
                .map(|text| text.resolve(locale).to_string()),
            is_complete: completed.contains(&step.id),
            is_active: current == Some(&step.id),
            is_blocked: !missing_in(step, completed).is_empty(),
        }
    }

    fn completed_in_catalog(&self, completed: &BTreeSet<StepId>) -> usize {
        self.definition
            .steps
            .iter()
            .filter(|step| completed.contains(&step.id))
            .count()
    }

    fn step_label(&self, step_id: &str, locale: Locale) -> String {
        self.definition
            .step(step_id)
            .map(|step| step.label.resolve(locale).to_string())
            .unwrap_or_else(|| step_id.to_string())
    }

    fn warn_blocked(&self, step: &WorkflowStep, missing: &[StepId]) {
        let locale = self.locale();
        let missing_labels = missing
            .iter()
            .map(|id| self.step_label(id.as_str(), locale))
            .collect::<Vec<_>>();
        self.notify(messages::step_blocked(
            locale,
            step.label.resolve(locale),
            &missing_labels,
        ));
        self.log_event(LEVEL_WARN, "step.blocked", step.id.as_str());
    }

    fn notify(&self, notification: Notification) {
        self.collaborators.notifier.notify(notification);
    }

    fn log_event(&self, level: &str, event: &str, step_id: &str) {
        self.log.append(
            level,
            event,
            &[
                ("workflow", Value::from(self.kind().as_str())),
                ("step", Value::from(step_id)),
            ],
        );
    }
}

fn missing_in(step: &WorkflowStep, completed: &BTreeSet<StepId>) -> Vec<StepId> {
    step.required_steps
        .iter()
        .filter(|required| !completed.contains(*required))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::collaborators::{
        NotificationKind, RecordingNavigator, RecordingNotifier,
    };
    use crate::store::MemoryStorage;

    fn controller(
        kind: WorkflowKind,
        options: ControllerOptions,
    ) -> (WorkflowController, RecordingNavigator, RecordingNotifier) {
        let navigator = RecordingNavigator::default();
        let notifier = RecordingNotifier::default();
        let controller = WorkflowController::new(
            Arc::new(WorkflowCatalog::builtin()),
            kind,
            WorkflowStateStore::new(MemoryStorage::new()),
            Collaborators::new(navigator.clone(), notifier.clone(), Locale::En),
            options,
        )
        .expect("builtin workflow");
        (controller, navigator, notifier)
    }

    #[test]
    fn fresh_workflow_starts_at_first_step() {
        let (controller, _, _) = controller(WorkflowKind::Financing, ControllerOptions::default());
        let current = controller.current_step().expect("current");
        assert_eq!(current.id().as_str(), "calculator");
        assert!(current.is_active);
        assert_eq!(controller.workflow_progress(), 0);
    }

    #[test]
    fn blocked_navigation_warns_and_keeps_current_step() {
        let (controller, navigator, notifier) =
            controller(WorkflowKind::Financing, ControllerOptions::default());
        let outcome = controller.go_to_step("offers");
        assert!(matches!(outcome, NavigationOutcome::Blocked { .. }));
        assert!(navigator.paths().is_empty());
        let notes = notifier.notifications();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].kind, NotificationKind::Warning);
        assert!(notes[0].description.contains("Mortgage calculator"));
        assert_eq!(
            controller.current_step().expect("current").id().as_str(),
            "calculator"
        );
    }

    #[test]
    fn unknown_step_has_no_side_effects() {
        let (controller, navigator, notifier) =
            controller(WorkflowKind::Financing, ControllerOptions::default());
        assert_eq!(
            controller.complete_step("nope"),
            CompletionOutcome::UnknownStep {
                step: "nope".to_string()
            }
        );
        assert!(!controller.go_to_step("nope").is_success());
        assert!(navigator.paths().is_empty());
        assert!(notifier.notifications().is_empty());
        assert!(!controller.is_step_blocked("nope"));
    }

    #[test]
    fn summary_counts_remaining_minutes() {
        let (controller, _, _) =
            controller(WorkflowKind::TaxOptimization, ControllerOptions::default());
        let before = controller.summary();
        assert_eq!(before.estimated_minutes_remaining, 35);
        controller.complete_step("property-data");
        let after = controller.summary();
        assert_eq!(after.estimated_minutes_remaining, 25);
        assert_eq!(after.progress, 25);
        assert_eq!(after.current_step_id.expect("current").as_str(), "depreciation");
    }

    #[test]
    fn partial_credit_only_when_enabled() {
        let (plain, _, _) = controller(WorkflowKind::Financing, ControllerOptions::default());
        assert_eq!(plain.workflow_progress_at("calculator"), 0);

        let (credited, _, _) = controller(
            WorkflowKind::Financing,
            ControllerOptions {
                partial_credit_for_active_step: true,
                ..ControllerOptions::default()
            },
        );
        assert_eq!(credited.workflow_progress_at("calculator"), 17);
        credited.complete_step("calculator");
        assert_eq!(credited.workflow_progress_at("calculator"), 33);
        assert_eq!(credited.workflow_progress_at("offers"), 50);
    }
}
