//! Reader and writer capabilities plus the set of supported formats.

use crate::error::{CaptionError, Result};
use crate::model::CaptionSet;
use crate::scc::{SccReader, SccWriter};
use crate::srt::{SrtReader, SrtWriter};
use crate::vtt::{VttReader, VttWriter};
use std::fmt;
use std::str::FromStr;

/// Something that turns caption text into a [`CaptionSet`].
pub trait CaptionReader {
    /// Returns true if the content looks like this reader's format.
    fn detect(&self, content: &str) -> bool;

    /// Parses the content.
    ///
    /// Fails with [`CaptionError::EmptyCaptionFile`] when no caption survives.
    fn read(&self, content: &str) -> Result<CaptionSet>;
}

/// Something that serializes a [`CaptionSet`].
pub trait CaptionWriter {
    /// Serializes the set.
    fn write(&self, captions: &CaptionSet) -> Result<String>;
}

/// Caption formats with a reader and a writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// Scenarist closed captions (.scc), line-21 control codes.
    Scc,
    /// SubRip format (.srt).
    Srt,
    /// WebVTT format (.vtt).
    WebVtt,
}

impl Format {
    /// All supported formats, in detection order.
    pub const ALL: [Format; 3] = [Format::Scc, Format::WebVtt, Format::Srt];

    /// Returns the typical file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Format::Scc => "scc",
            Format::Srt => "srt",
            Format::WebVtt => "vtt",
        }
    }

    /// Returns the MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Format::Scc => "text/x-scc",
            Format::Srt => "application/x-subrip",
            Format::WebVtt => "text/vtt",
        }
    }

    /// Attempts to detect the format from a file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "scc" => Some(Format::Scc),
            "srt" => Some(Format::Srt),
            "vtt" | "webvtt" => Some(Format::WebVtt),
            _ => None,
        }
    }

    /// A reader with default options.
    pub fn reader(&self) -> Box<dyn CaptionReader> {
        match self {
            Format::Scc => Box::new(SccReader::default()),
            Format::Srt => Box::new(SrtReader::default()),
            Format::WebVtt => Box::new(VttReader::default()),
        }
    }

    /// A writer with default options.
    pub fn writer(&self) -> Box<dyn CaptionWriter> {
        match self {
            Format::Scc => Box::new(SccWriter::default()),
            Format::Srt => Box::new(SrtWriter::default()),
            Format::WebVtt => Box::new(VttWriter::default()),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Scc => write!(f, "SCC"),
            Format::Srt => write!(f, "SRT"),
            Format::WebVtt => write!(f, "WebVTT"),
        }
    }
}

impl FromStr for Format {
    type Err = CaptionError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_extension(s.trim_start_matches('.'))
            .ok_or_else(|| CaptionError::UnsupportedFormat(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_format_names() {
        assert_eq!(Format::from_extension("SCC"), Some(Format::Scc));
        assert_eq!(Format::from_extension("webvtt"), Some(Format::WebVtt));
        assert_eq!(Format::from_extension("dfxp"), None);
        assert_eq!(".srt".parse::<Format>().unwrap(), Format::Srt);
        assert!("sami".parse::<Format>().is_err());
        assert_eq!(Format::WebVtt.to_string(), "WebVTT");
        assert_eq!(Format::Scc.extension(), "scc");
    }

    #[test]
    fn test_readers_detect_their_format() {
        assert!(Format::Scc.reader().detect("Scenarist_SCC V1.0\n"));
        assert!(Format::WebVtt.reader().detect("WEBVTT\n\n"));
        assert!(Format::Srt
            .reader()
            .detect("1\n00:00:01,000 --> 00:00:02,000\nHi\n"));
        assert!(!Format::Srt.reader().detect("WEBVTT\n\n"));
    }
}
