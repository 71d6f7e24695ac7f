use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HierarchyError {
    /// Nothing survived validation, so there is no root to lay out from.
    #[error("chart has no valid nodes")]
    Empty,
    #[error("support edges form a cycle through node `{node}`")]
    CycleDetected { node: String },
}
