//! Format detection and conversion between caption formats.
//!
//! Every conversion goes through a [`CaptionSet`], so anything one format
//! cannot express is lost on the way (positions, colors, extra languages for
//! single-language targets).

use crate::error::{CaptionError, Result};
use crate::format::{CaptionReader, Format};
use crate::model::CaptionSet;
use crate::scc::{SccReader, SccReaderConfig};
use crate::vtt::{VttReader, VttReaderConfig};
use tracing::{debug, info};

/// Detects the format of caption content.
///
/// Formats are tried in [`Format::ALL`] order and the first reader that
/// recognizes the content wins.
pub fn detect_format(content: &str) -> Option<Format> {
    Format::ALL
        .into_iter()
        .find(|format| format.reader().detect(content))
}

/// Parses content in the given format with default options.
pub fn read(content: &str, format: Format) -> Result<CaptionSet> {
    format.reader().read(content)
}

/// Parses content, detecting its format.
pub fn read_auto(content: &str) -> Result<(CaptionSet, Format)> {
    let format = detect_format(content)
        .ok_or_else(|| CaptionError::UnsupportedFormat("unrecognized caption content".into()))?;
    Ok((read(content, format)?, format))
}

/// Serializes a caption set in the given format with default options.
pub fn write(captions: &CaptionSet, format: Format) -> Result<String> {
    format.writer().write(captions)
}

/// Converts caption content from one format to another.
pub fn convert(content: &str, from: Format, to: Format) -> Result<String> {
    let captions = read(content, from)?;
    write(&captions, to)
}

/// A builder for performing caption conversions with options.
#[derive(Debug, Clone)]
pub struct ConversionBuilder<'a> {
    content: &'a str,
    source_format: Option<Format>,
    scc_config: SccReaderConfig,
    vtt_config: VttReaderConfig,
    merge_matching: bool,
    strip_styling: bool,
}

impl<'a> ConversionBuilder<'a> {
    /// Creates a new conversion builder from source content.
    pub fn new(content: &'a str) -> Self {
        Self {
            content,
            source_format: None,
            scc_config: SccReaderConfig::default(),
            vtt_config: VttReaderConfig::default(),
            merge_matching: false,
            strip_styling: false,
        }
    }

    /// Sets the source format (otherwise auto-detected).
    pub fn from_format(mut self, format: Format) -> Self {
        self.source_format = Some(format);
        self
    }

    /// Options used when the source is SCC.
    pub fn scc_config(mut self, config: SccReaderConfig) -> Self {
        self.scc_config = config;
        self
    }

    /// Options used when the source is WebVTT.
    pub fn vtt_config(mut self, config: VttReaderConfig) -> Self {
        self.vtt_config = config;
        self
    }

    /// Merges adjacent captions with identical timing.
    pub fn merge_matching(mut self) -> Self {
        self.merge_matching = true;
        self
    }

    /// Strips all styling information during conversion.
    pub fn strip_styling(mut self) -> Self {
        self.strip_styling = true;
        self
    }

    /// Reads the source and applies the requested transforms.
    pub fn read(&self) -> Result<CaptionSet> {
        let format = match self.source_format {
            Some(format) => format,
            None => detect_format(self.content).ok_or_else(|| {
                CaptionError::UnsupportedFormat("unrecognized caption content".into())
            })?,
        };
        debug!(%format, "Reading captions");

        let mut captions = match format {
            Format::Scc => SccReader::new(self.scc_config.clone()).read(self.content)?,
            Format::WebVtt => VttReader::new(self.vtt_config.clone()).read(self.content)?,
            other => read(self.content, other)?,
        };

        if self.merge_matching {
            captions.merge_matching();
        }
        if self.strip_styling {
            captions.strip_styles();
        }
        Ok(captions)
    }

    /// Converts to the specified format.
    pub fn to_format(self, format: Format) -> Result<String> {
        let captions = self.read()?;
        let output = write(&captions, format)?;
        info!(
            captions = captions.caption_count(),
            target = %format,
            "Converted captions"
        );
        Ok(output)
    }
}
