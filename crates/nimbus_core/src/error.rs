//! Error types for the composition core.

use thiserror::Error;

/// Result type alias for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur while building or synthesizing a composition graph.
#[derive(Error, Debug)]
pub enum CoreError {
    /// A unit was declared with an id that is already registered.
    #[error("Duplicate unit id: {0}")]
    DuplicateUnit(String),

    /// A reference names a unit that is not part of the graph.
    #[error("Unknown unit: {0}")]
    UnknownUnit(String),

    /// A reference names an output the unit never promises to produce.
    #[error("Unit '{unit}' does not declare output '{output}'")]
    UndeclaredOutput { unit: String, output: String },

    /// The derived edge set contains a cycle. Holds the offending unit sequence.
    #[error("Cyclic dependency: {}", .0.join(" -> "))]
    CyclicDependency(Vec<String>),

    /// A declared output was missing after the owning unit materialized.
    ///
    /// This is an internal-consistency fault (declare/produce mismatch),
    /// fatal and never retried.
    #[error("Output '{output}' of unit '{unit}' was never populated")]
    UnresolvedOutput { unit: String, output: String },

    /// The provisioning collaborator reported an error for a unit.
    #[error("Provisioning failed for unit '{unit}': {message}")]
    Provisioning { unit: String, message: String },

    /// The provisioning call for a unit exceeded the per-unit timeout.
    #[error("Provisioning timed out for unit '{unit}'")]
    Timeout { unit: String },

    /// The synthesis run was cancelled.
    #[error("Synthesis cancelled")]
    Cancelled,
}
