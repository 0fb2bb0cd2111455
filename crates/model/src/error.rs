use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    /// A qualified name was constructed from an empty string
    #[error("qualified name cannot be empty")]
    EmptyQName,
}
