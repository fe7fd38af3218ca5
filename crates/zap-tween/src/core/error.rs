use thiserror::Error;

/// Fatal configuration errors, reported when a component or plugin is built.
///
/// Runtime conditions such as a vanished target are not errors: the affected
/// tween kills itself and reports completion instead.
#[derive(Debug, Error)]
pub enum TweenError {
    #[error("invalid duration {0}: must be finite and not negative")]
    InvalidDuration(f32),

    #[error("invalid speed {0}: speed-based tweens need a finite positive speed")]
    InvalidSpeed(f32),

    #[error("path for `{property}` needs at least 2 waypoints, got {count}")]
    PathTooShort { property: String, count: usize },

    #[error("end value for `{property}` is not finite")]
    NonFiniteValue { property: String },

    #[error("invalid config: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TweenError>;
