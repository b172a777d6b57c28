/// Convenience result type used across searchreel.
pub type ReelResult<T> = Result<T, ReelError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Every variant is fatal for the running animation: state transitions are deterministic, so an
/// error always points at a configuration or logic defect, never at a transient condition.
#[derive(thiserror::Error, Debug)]
pub enum ReelError {
    /// Invalid user-provided configuration or dataset.
    #[error("validation error: {0}")]
    Validation(String),

    /// A phase tag that is not part of the transition table.
    #[error("unknown animation phase '{0}'")]
    UnknownPhase(String),

    /// Broken engine invariant (search bounds, clock, convergence targets).
    #[error("invariant violated: {0}")]
    Invariant(String),

    /// Errors while producing or rasterizing frames.
    #[error("render error: {0}")]
    Render(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ReelError {
    /// Build a [`ReelError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ReelError::UnknownPhase`] value.
    pub fn unknown_phase(tag: impl Into<String>) -> Self {
        Self::UnknownPhase(tag.into())
    }

    /// Build a [`ReelError::Invariant`] value.
    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::Invariant(msg.into())
    }

    /// Build a [`ReelError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`ReelError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
