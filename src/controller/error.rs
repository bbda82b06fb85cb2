use crate::catalog::WorkflowKind;

#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    #[error("workflow `{kind}` is not defined in the catalog")]
    UnknownWorkflow { kind: WorkflowKind },
}
