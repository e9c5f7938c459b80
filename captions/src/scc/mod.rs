//! Scenarist closed captions (SCC).
//!
//! SCC files carry raw line-21 byte pairs as hex words, one timecoded line
//! per transmission burst:
//!
//! ```text
//! Scenarist_SCC V1.0
//!
//! 00:00:09:05	94ae 94ae 9420 9420 9470 9470 c8e9 942c 942c 942f 942f
//!
//! 00:00:12:08	942c 942c
//! ```
//!
//! Each word takes one frame to transmit. Control words are sent twice and
//! the decoder ignores the repeat.

mod buffer;
mod decoder;
mod encoder;
mod tables;

pub use decoder::{SccDecoder, SccReaderConfig};
pub use encoder::{encode, SccWriterConfig, ROW_WIDTH};

use crate::error::{CaptionError, Result};
use crate::format::{CaptionReader, CaptionWriter};
use crate::model::{CaptionSet, DEFAULT_LANGUAGE};

/// First line of every SCC file.
pub const HEADER: &str = "Scenarist_SCC V1.0";

/// Lines starting with this are headers, whatever the version.
pub(crate) const HEADER_PREFIX: &str = "Scenarist_SCC";

/// Transmission time of one byte at two bytes per 29.97 fps frame.
pub const MICROSECONDS_PER_CODEWORD: f64 = 1_000_000.0 / (2.0 * 29.97);

/// Reads SCC into a single-language caption set.
#[derive(Debug, Clone, Default)]
pub struct SccReader {
    config: SccReaderConfig,
}

impl SccReader {
    /// Creates a reader with options.
    pub fn new(config: SccReaderConfig) -> Self {
        Self { config }
    }

    /// The reader options.
    pub fn config(&self) -> &SccReaderConfig {
        &self.config
    }
}

impl CaptionReader for SccReader {
    fn detect(&self, content: &str) -> bool {
        content
            .trim_start_matches([' ', '\u{feff}'])
            .starts_with(HEADER)
    }

    fn read(&self, content: &str) -> Result<CaptionSet> {
        let captions = SccDecoder::new(self.config.clone()).decode(content)?;
        let set = CaptionSet::with_captions(DEFAULT_LANGUAGE, captions);
        if set.is_empty() {
            return Err(CaptionError::empty("SCC"));
        }
        Ok(set)
    }
}

/// Writes one language of a caption set as SCC.
#[derive(Debug, Clone, Default)]
pub struct SccWriter {
    config: SccWriterConfig,
}

impl SccWriter {
    /// Creates a writer with options.
    pub fn new(config: SccWriterConfig) -> Self {
        Self { config }
    }
}

impl CaptionWriter for SccWriter {
    fn write(&self, captions: &CaptionSet) -> Result<String> {
        encode(captions, &self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Caption;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_detect() {
        let reader = SccReader::default();
        assert!(reader.detect("Scenarist_SCC V1.0\n\n00:00:01:00\t942c 942c\n"));
        assert!(reader.detect("\u{feff}Scenarist_SCC V1.0\n"));
        assert!(reader.detect("  Scenarist_SCC V1.0\n"));
        assert!(!reader.detect("\nScenarist_SCC V1.0\n"));
        assert!(!reader.detect("00:00:01:00\t942c 942c\n"));
    }

    #[test]
    fn test_empty_input_is_error() {
        let reader = SccReader::default();
        assert!(reader.read("Scenarist_SCC V1.0\n").unwrap_err().is_empty_file());
        assert!(reader.read("").unwrap_err().is_empty_file());
    }

    #[test]
    fn test_codeword_time() {
        // Two codewords make one 29.97 fps frame
        let frame = 2.0 * MICROSECONDS_PER_CODEWORD;
        assert!((frame - 33_366.7).abs() < 0.1);
    }

    #[test]
    fn test_write_then_read() {
        let set = CaptionSet::with_captions(
            DEFAULT_LANGUAGE,
            vec![Caption::from_text(10_000_000, 12_000_000, "Hello\nworld")],
        );
        let scc = SccWriter::default().write(&set).unwrap();
        let decoded = SccReader::default().read(&scc).unwrap();
        let captions = decoded.captions(DEFAULT_LANGUAGE);

        assert_eq!(captions.len(), 1);
        assert_eq!(captions[0].text(), "Hello\nworld");
        let frame = 33_367;
        assert!(captions[0].start <= 10_000_000);
        assert!(10_000_000 - captions[0].start < frame);
        let end = captions[0].end.unwrap();
        assert!(end <= 12_000_000 && 12_000_000 - end < frame);
    }

    #[test]
    fn test_rewriting_is_a_fixed_point() {
        let set = CaptionSet::with_captions(
            DEFAULT_LANGUAGE,
            vec![
                Caption::from_text(3_250_000, 4_100_000, "One"),
                Caption::from_text(4_200_000, 6_000_000, "Two"),
                Caption::from_text(9_000_000, 9_900_000, "Three"),
            ],
        );
        let first = SccWriter::default().write(&set).unwrap();
        let decoded = SccReader::default().read(&first).unwrap();
        let second = SccWriter::default().write(&decoded).unwrap();
        assert_eq!(first, second);

        let again = SccReader::default().read(&second).unwrap();
        assert_eq!(again, decoded);
    }
}
