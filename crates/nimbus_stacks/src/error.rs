//! Error types for the stacks module.

use thiserror::Error;

/// Result type alias for stack composition operations.
pub type StacksResult<T> = Result<T, StacksError>;

/// Errors that can occur while composing the application stacks.
#[derive(Error, Debug)]
pub enum StacksError {
    #[error("Invalid environment config: {0}")]
    InvalidConfig(String),

    #[error("Hosting stack requires repository coordinates")]
    MissingRepository,

    #[error("Composition error: {0}")]
    Core(#[from] nimbus_core::CoreError),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
