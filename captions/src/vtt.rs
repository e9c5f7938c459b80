//! WebVTT (Web Video Text Tracks) reading and writing.
//!
//! Only cue timing and inline `<b>`, `<i>` and `<u>` spans are kept. Cue
//! settings, regions, style sheets and notes are read past and dropped.

use crate::error::{CaptionError, Result};
use crate::format::{CaptionReader, CaptionWriter};
use crate::markup::{self, BlankLines, Markup};
use crate::model::{Caption, CaptionSet, DEFAULT_LANGUAGE};
use captions_timecode::{format_clock, parse_clock};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// WebVTT file header.
const WEBVTT_HEADER: &str = "WEBVTT";

/// Marks a cue line that is intentionally blank.
const BLANK_LINE: &str = "&nbsp;";

/// Options for reading WebVTT.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VttReaderConfig {
    /// Language the captions are filed under.
    pub language: String,
    /// Accept cues that end before they start or start before the
    /// previous cue.
    pub ignore_timing_errors: bool,
}

impl Default for VttReaderConfig {
    fn default() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
            ignore_timing_errors: false,
        }
    }
}

impl VttReaderConfig {
    /// Sets the language.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Enables or disables cue order checks.
    pub fn with_ignore_timing_errors(mut self, ignore: bool) -> Self {
        self.ignore_timing_errors = ignore;
        self
    }
}

/// Reads WebVTT.
#[derive(Debug, Clone, Default)]
pub struct VttReader {
    config: VttReaderConfig,
}

impl VttReader {
    /// Creates a reader with options.
    pub fn new(config: VttReaderConfig) -> Self {
        Self { config }
    }
}

impl CaptionReader for VttReader {
    fn detect(&self, content: &str) -> bool {
        content
            .trim_start_matches('\u{feff}')
            .starts_with(WEBVTT_HEADER)
    }

    fn read(&self, content: &str) -> Result<CaptionSet> {
        let captions = parse_with(content, &self.config)?;
        if captions.is_empty() {
            return Err(CaptionError::empty("WebVTT"));
        }
        debug!(captions = captions.len(), "Read WebVTT");
        Ok(CaptionSet::with_captions(
            self.config.language.clone(),
            captions,
        ))
    }
}

/// Parses WebVTT cues into captions, rejecting out-of-order cues.
///
/// Cues with an unreadable timing line are skipped with a warning.
pub fn parse(content: &str) -> Result<Vec<Caption>> {
    parse_with(content, &VttReaderConfig::default())
}

/// Parses WebVTT cues with reader options.
///
/// Unless `ignore_timing_errors` is set, a cue ending before it starts or
/// starting before the previous cue fails with
/// [`CaptionError::InvalidTiming`].
pub fn parse_with(content: &str, config: &VttReaderConfig) -> Result<Vec<Caption>> {
    let content = content.trim_start_matches('\u{feff}');
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }

    let markup = Markup::new()?;
    let mut captions = Vec::new();
    let mut lines = content.lines().enumerate().peekable();

    // Check for WEBVTT header
    let first_line = lines.next().map_or("", |(_, line)| line);
    if !first_line.trim().starts_with(WEBVTT_HEADER) {
        return Err(CaptionError::parse(1, "WebVTT file must start with 'WEBVTT'"));
    }

    // Header metadata runs to the first blank line
    while lines.next_if(|(_, l)| !l.trim().is_empty()).is_some() {}

    while lines.peek().is_some() {
        // Skip blank lines and NOTE, STYLE and REGION blocks
        while let Some((_, line)) = lines.peek() {
            let line = line.trim();
            if line.is_empty() {
                lines.next();
            } else if line.starts_with("NOTE")
                || line.starts_with("STYLE")
                || line.starts_with("REGION")
            {
                while lines.next_if(|(_, l)| !l.trim().is_empty()).is_some() {}
            } else {
                break;
            }
        }

        let Some((number, first_cue_line)) = lines.next() else {
            break;
        };

        // A line without an arrow is a cue identifier
        let (number, timing_line) = if first_cue_line.contains("-->") {
            (number, first_cue_line)
        } else {
            match lines.next_if(|(_, l)| !l.trim().is_empty()) {
                Some(next) => next,
                None => continue,
            }
        };

        let mut text_lines = Vec::new();
        while let Some((_, line)) = lines.next_if(|(_, l)| !l.trim().is_empty()) {
            text_lines.push(if line.trim() == BLANK_LINE { "" } else { line });
        }

        let (start, end) = match parse_timing_line(timing_line.trim()) {
            Ok(timing) => timing,
            Err(e) => {
                warn!(line = number + 1, error = %e, "Skipping WebVTT cue");
                continue;
            }
        };

        if !config.ignore_timing_errors {
            let previous_start = captions.last().map_or(0, |c: &Caption| c.start);
            validate_timing(number + 1, start, end, previous_start)?;
        }

        let nodes = markup.parse(&text_lines, unescape);
        if nodes.iter().any(|node| node.is_text()) {
            captions.push(Caption::new(start, Some(end)).with_nodes(nodes));
        }
    }

    Ok(captions)
}

/// Parses a timing line; cue settings after the end time are ignored.
fn parse_timing_line(line: &str) -> Result<(u64, u64)> {
    let Some((start, rest)) = line.split_once("-->") else {
        return Err(CaptionError::InvalidTimestamp(format!(
            "invalid timing line: {line}"
        )));
    };
    let end = rest.split_whitespace().next().unwrap_or_default();

    let start = parse_clock(start.trim()).map_err(|e| CaptionError::InvalidTimestamp(e.to_string()))?;
    let end = parse_clock(end).map_err(|e| CaptionError::InvalidTimestamp(e.to_string()))?;
    Ok((start, end))
}

fn validate_timing(line: usize, start: u64, end: u64, previous_start: u64) -> Result<()> {
    if end < start {
        return Err(CaptionError::InvalidTiming(format!(
            "line {line}: cue ends at {} before it starts at {}",
            format_clock(end, '.'),
            format_clock(start, '.')
        )));
    }
    if start < previous_start {
        return Err(CaptionError::InvalidTiming(format!(
            "line {line}: cue starts at {} before the previous cue at {}",
            format_clock(start, '.'),
            format_clock(previous_start, '.')
        )));
    }
    Ok(())
}

fn unescape(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Writes the first language of a caption set as WebVTT.
#[derive(Debug, Clone, Default)]
pub struct VttWriter;

impl CaptionWriter for VttWriter {
    fn write(&self, captions: &CaptionSet) -> Result<String> {
        let language = captions.first_language().unwrap_or(DEFAULT_LANGUAGE);
        Ok(write(captions.captions(language)))
    }
}

/// Formats captions as a WebVTT document.
pub fn write(captions: &[Caption]) -> String {
    let mut output = format!("{WEBVTT_HEADER}\n\n");

    for caption in captions {
        if !caption.nodes.iter().any(|node| node.is_text()) {
            continue;
        }
        let text = markup::render(&caption.nodes, BlankLines::Pad, escape);
        output.push_str(&format!(
            "{} --> {}\n{}\n\n",
            caption.format_start('.'),
            caption.format_end('.'),
            text
        ));
    }

    output
}
