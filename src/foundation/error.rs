/// Convenience result type used across Strobe.
pub type StrobeResult<T> = Result<T, StrobeError>;

/// Top-level error taxonomy used by engine APIs.
///
/// The first three variants are playback precondition failures. They are reported through the
/// player's `on_error` hook rather than returned. [`StrobeError::NeverPlayed`] is the one playback
/// failure that surfaces at the call site.
#[derive(thiserror::Error, Debug)]
pub enum StrobeError {
    /// `play` was called without a surface to paint on.
    #[error("playback error: no surface to paint on")]
    MissingSurface,

    /// The scheduler cannot suspend between frames (for example, no timer runtime is active).
    #[error("playback error: scheduler is unavailable")]
    SchedulerUnavailable,

    /// `play` was called after every frame had already been shown.
    #[error("playback error: sequence was already played to the end")]
    AlreadyFinished,

    /// `resume` was called on a player that was never bound to a surface.
    #[error("playback error: cannot resume, sequence was never played")]
    NeverPlayed,

    /// Invalid user-provided frame or clip data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors when serializing or deserializing clip data.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StrobeError {
    /// Build a [`StrobeError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`StrobeError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Whether this error is a playback precondition failure (routed through `on_error`).
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::MissingSurface | Self::SchedulerUnavailable | Self::AlreadyFinished
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
