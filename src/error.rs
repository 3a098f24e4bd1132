//! Crate-level error types.

use std::fmt;

/// Errors produced by the damped crate.
#[derive(Debug)]
pub enum AnimationError {
    /// A construction parameter is out of range or not finite.
    InvalidParameter {
        /// Parameter name as it appears in the options.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },
    /// The parameters produce a zero or non-finite `k2` coefficient.
    DegenerateCoefficients,
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
}

impl fmt::Display for AnimationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidParameter { name, value } => {
                write!(f, "invalid parameter {name}: {value}")
            }
            Self::DegenerateCoefficients => {
                write!(f, "parameters produce a degenerate k2 coefficient")
            }
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
        }
    }
}

impl std::error::Error for AnimationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for AnimationError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

/// `Ok` when `valid`, otherwise an [`AnimationError::InvalidParameter`].
pub(crate) fn ensure(
    name: &'static str,
    value: f64,
    valid: bool,
) -> Result<(), AnimationError> {
    if valid {
        Ok(())
    } else {
        Err(AnimationError::InvalidParameter { name, value })
    }
}
