use thiserror::Error;

/// Failures specific to the `Workspace` facade itself, as opposed to the
/// Compiler/Decoder errors that `compile`/`decode` pass through untouched.
#[derive(Error, Debug)]
pub enum WorkspaceError {
    #[error("invalid catalog JSON: {0}")]
    Json(#[from] serde_json::Error),
}
