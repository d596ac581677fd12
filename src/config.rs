//! Layout configuration parsed from environment variables.

use crate::consts::{DEFAULT_CANVAS_HEIGHT, DEFAULT_CANVAS_WIDTH, DEFAULT_MAX_PLACEMENT_ATTEMPTS};
use crate::error::ErrorCode;

pub const CANVAS_WIDTH_VAR: &str = "FLOORPLAN_CANVAS_WIDTH";
pub const CANVAS_HEIGHT_VAR: &str = "FLOORPLAN_CANVAS_HEIGHT";
pub const MAX_ATTEMPTS_VAR: &str = "FLOORPLAN_MAX_PLACEMENT_ATTEMPTS";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?}")]
    InvalidValue { var: &'static str, value: String },
    #[error("{var} must be positive, got {value}")]
    NotPositive { var: &'static str, value: i64 },
}

impl ErrorCode for ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidValue { .. } => "E_CONFIG_INVALID",
            Self::NotPositive { .. } => "E_CONFIG_NOT_POSITIVE",
        }
    }
}

/// Canvas extent and placement search limits for a [`crate::layout::Layout`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutConfig {
    pub canvas_width: i32,
    pub canvas_height: i32,
    /// Cap on candidate positions tried by default placement.
    pub max_attempts: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            canvas_width: DEFAULT_CANVAS_WIDTH,
            canvas_height: DEFAULT_CANVAS_HEIGHT,
            max_attempts: DEFAULT_MAX_PLACEMENT_ATTEMPTS,
        }
    }
}

impl LayoutConfig {
    /// Build config from environment variables.
    ///
    /// Optional:
    /// - `FLOORPLAN_CANVAS_WIDTH`: default 800
    /// - `FLOORPLAN_CANVAS_HEIGHT`: default 600
    /// - `FLOORPLAN_MAX_PLACEMENT_ATTEMPTS`: default 1000
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a variable is set but unparsable or not positive.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    /// Build config from an arbitrary key lookup. Missing keys take defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a present value is unparsable or not positive.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let canvas_width = parse_positive(CANVAS_WIDTH_VAR, lookup(CANVAS_WIDTH_VAR), defaults.canvas_width)?;
        let canvas_height = parse_positive(CANVAS_HEIGHT_VAR, lookup(CANVAS_HEIGHT_VAR), defaults.canvas_height)?;
        let max_attempts = parse_positive(MAX_ATTEMPTS_VAR, lookup(MAX_ATTEMPTS_VAR), defaults.max_attempts)?;
        Ok(Self { canvas_width, canvas_height, max_attempts })
    }

    /// Replace the canvas size, keeping other settings.
    #[must_use]
    pub fn with_canvas(self, canvas_width: i32, canvas_height: i32) -> Self {
        Self { canvas_width, canvas_height, ..self }
    }
}

/// Unset reads as `None`. Non-unicode values are passed through lossily so
/// they fail parsing instead of silently taking the default.
fn env_lookup(key: &str) -> Option<String> {
    match std::env::var(key) {
        Ok(value) => Some(value),
        Err(std::env::VarError::NotPresent) => None,
        Err(std::env::VarError::NotUnicode(raw)) => Some(raw.to_string_lossy().into_owned()),
    }
}

fn parse_positive<T>(var: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: TryFrom<i64>,
{
    let Some(raw) = raw else {
        return Ok(default);
    };
    let Ok(value) = raw.trim().parse::<i64>() else {
        return Err(ConfigError::InvalidValue { var, value: raw });
    };
    if value <= 0 {
        return Err(ConfigError::NotPositive { var, value });
    }
    T::try_from(value).map_err(|_| ConfigError::InvalidValue { var, value: raw })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
