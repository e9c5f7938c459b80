//! Caption errors

use captions_timecode::TimecodeError;
use thiserror::Error;

/// Result type for caption operations.
pub type Result<T> = std::result::Result<T, CaptionError>;

/// Errors from reading, writing and converting captions
#[derive(Error, Debug)]
pub enum CaptionError {
    /// Timecode could not be parsed or converted
    #[error("timecode error: {0}")]
    Timecode(#[from] TimecodeError),

    /// Timestamp that could not be parsed
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// Malformed input at a specific line
    #[error("parse error at line {line}: {message}")]
    Parse {
        /// 1-based line number in the input.
        line: usize,
        /// What was wrong with the line.
        message: String,
    },

    /// Input parsed but carried no captions
    #[error("empty caption file ({format})")]
    EmptyCaptionFile {
        /// Name of the format that was read.
        format: String,
    },

    /// Format name or content not recognised
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Caption text does not fit the output layout
    #[error("layout error: {0}")]
    Layout(String),

    /// Caption timing violates ordering
    #[error("invalid timing: {0}")]
    InvalidTiming(String),

    /// Markup pattern failed to compile
    #[error("pattern error: {0}")]
    Pattern(#[from] regex::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CaptionError {
    /// Create a parse error for a 1-based line number.
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }

    /// Create an empty caption file error.
    pub fn empty(format: impl Into<String>) -> Self {
        Self::EmptyCaptionFile {
            format: format.into(),
        }
    }

    /// Whether this error reports an input without captions.
    pub fn is_empty_file(&self) -> bool {
        matches!(self, Self::EmptyCaptionFile { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_error_display() {
        let err = CaptionError::parse(3, "bad timecode");
        assert_eq!(err.to_string(), "parse error at line 3: bad timecode");

        let err = CaptionError::empty("SCC");
        assert_eq!(err.to_string(), "empty caption file (SCC)");
        assert!(err.is_empty_file());
    }

    #[test]
    fn test_timecode_error_converts() {
        let err: CaptionError = TimecodeError::invalid_format("oops").into();
        assert!(matches!(err, CaptionError::Timecode(_)));
        assert!(!err.is_empty_file());
    }
}
