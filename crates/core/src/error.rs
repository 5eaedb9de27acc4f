use thiserror::Error;

/// Construction-time configuration failures.
///
/// These are programming errors on the caller's side and are never retried.
/// Narrow viewports and late callbacks are not errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid breakpoint {0}: must be a positive whole number of pixels")]
    InvalidBreakpoint(String),
    #[error("invalid design width {0}: must be positive")]
    InvalidDesignWidth(u32),
    #[error("invalid minimum scale {0}: must be within (0, 1]")]
    InvalidMinScale(f64),
    #[error("config: {0}")]
    Parse(#[from] serde_json::Error),
}
