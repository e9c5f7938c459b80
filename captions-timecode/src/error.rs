//! Timecode failures.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Shorthand for results carrying a [`TimecodeError`].
pub type Result<T> = std::result::Result<T, TimecodeError>;

/// Why a timestamp could not be read or moved.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum TimecodeError {
    /// The text is not shaped like a timestamp.
    #[error("malformed timestamp: {message}")]
    InvalidFormat {
        /// What was wrong with it.
        message: String,
    },

    /// A field is outside its range, e.g. minute 61.
    #[error("{component} {value} is out of range, at most {max} allowed")]
    InvalidComponent {
        /// `hours`, `minutes`, `seconds`, `frames` or `milliseconds`.
        component: String,
        /// Value found.
        value: u32,
        /// Largest accepted value.
        max: u32,
    },

    /// Zero in a rate, or drop-frame at a rate that never drops.
    #[error("unusable frame rate {numerator}/{denominator}")]
    InvalidFrameRate {
        /// Frames.
        numerator: u32,
        /// Seconds.
        denominator: u32,
    },

    /// A multiplier other than two non-zero integers.
    #[error("unusable frame multiplier '{value}'")]
    InvalidMultiplier {
        /// Text as given.
        value: String,
    },

    /// Arithmetic went before `00:00:00:00`.
    #[error("timestamp moved before zero")]
    Underflow,
}

impl TimecodeError {
    /// [`TimecodeError::InvalidFormat`] with a message.
    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::InvalidFormat {
            message: message.into(),
        }
    }

    /// [`TimecodeError::InvalidComponent`] for a named field.
    pub fn invalid_component(component: impl Into<String>, value: u32, max: u32) -> Self {
        Self::InvalidComponent {
            component: component.into(),
            value,
            max,
        }
    }

    /// [`TimecodeError::InvalidFrameRate`].
    pub fn invalid_frame_rate(numerator: u32, denominator: u32) -> Self {
        Self::InvalidFrameRate {
            numerator,
            denominator,
        }
    }

    /// [`TimecodeError::InvalidMultiplier`].
    pub fn invalid_multiplier(value: impl Into<String>) -> Self {
        Self::InvalidMultiplier {
            value: value.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_messages() {
        assert_eq!(
            TimecodeError::invalid_format("'1:2' does not have four fields").to_string(),
            "malformed timestamp: '1:2' does not have four fields"
        );
        assert_eq!(
            TimecodeError::invalid_component("frames", 30, 29).to_string(),
            "frames 30 is out of range, at most 29 allowed"
        );
        assert_eq!(
            TimecodeError::invalid_multiplier("1 0").to_string(),
            "unusable frame multiplier '1 0'"
        );
        assert_eq!(
            TimecodeError::Underflow.to_string(),
            "timestamp moved before zero"
        );
    }

    #[test]
    fn test_error_json_shape() {
        let json = serde_json::to_value(TimecodeError::invalid_frame_rate(25, 0)).unwrap();
        assert_eq!(json["InvalidFrameRate"]["denominator"], 0);
        let back: TimecodeError = serde_json::from_value(json).unwrap();
        assert_eq!(back, TimecodeError::invalid_frame_rate(25, 0));
    }
}
