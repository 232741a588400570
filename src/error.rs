use thiserror::Error;

/// Why a motion controller became inert during initialization (or later,
/// when a borrowed collaborator went away). Never returned from a tick.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InitError {
    #[error("character body not assigned")]
    MissingBody,

    #[error("input action asset not assigned")]
    MissingActions,

    #[error("'{0}' action map not found")]
    MissingActionMap(String),

    #[error("camera orientation source not found, assign one manually")]
    MissingOrientation,

    #[error("character body was dropped while the controller was active")]
    BodyDropped,

    #[error("orientation source was dropped while the controller was active")]
    OrientationDropped,
}

/// Errors from loading or validating a `MotionConfig`
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} must be positive and finite, got {value}")]
    NotPositive { field: &'static str, value: f32 },

    #[error("{field} must be finite and non-negative, got {value}")]
    Negative { field: &'static str, value: f32 },

    #[error("action name for {0} is empty")]
    EmptyActionName(&'static str),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
}
