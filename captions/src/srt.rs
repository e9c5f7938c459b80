//! SRT (SubRip) reading and writing.
//!
//! SRT is a sequence of blocks separated by blank lines:
//! - A numeric index
//! - Timing in `HH:MM:SS,mmm --> HH:MM:SS,mmm` format
//! - Caption text, optionally with `<b>`, `<i>`, `<u>` and `<font>` tags

use crate::error::{CaptionError, Result};
use crate::format::{CaptionReader, CaptionWriter};
use crate::markup::{self, BlankLines, Markup};
use crate::model::{Caption, CaptionSet, DEFAULT_LANGUAGE};
use captions_timecode::parse_clock;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Options for reading SRT.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SrtReaderConfig {
    /// Language the captions are filed under.
    pub language: String,
}

impl Default for SrtReaderConfig {
    fn default() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }
}

impl SrtReaderConfig {
    /// Sets the language.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }
}

/// Reads SRT.
#[derive(Debug, Clone, Default)]
pub struct SrtReader {
    config: SrtReaderConfig,
}

impl SrtReader {
    /// Creates a reader with options.
    pub fn new(config: SrtReaderConfig) -> Self {
        Self { config }
    }
}

impl CaptionReader for SrtReader {
    fn detect(&self, content: &str) -> bool {
        let mut lines = content
            .trim_start_matches('\u{feff}')
            .lines()
            .skip_while(|line| line.trim().is_empty());
        let index = lines.next().map(str::trim).unwrap_or_default();
        let timing = lines.next().unwrap_or_default();
        !index.is_empty() && index.bytes().all(|b| b.is_ascii_digit()) && timing.contains("-->")
    }

    fn read(&self, content: &str) -> Result<CaptionSet> {
        let captions = parse(content)?;
        if captions.is_empty() {
            return Err(CaptionError::empty("SRT"));
        }
        debug!(captions = captions.len(), "Read SRT");
        Ok(CaptionSet::with_captions(
            self.config.language.clone(),
            captions,
        ))
    }
}

/// Parses SRT blocks into captions.
pub fn parse(content: &str) -> Result<Vec<Caption>> {
    let markup = Markup::new()?;
    let mut captions = Vec::new();
    let mut lines = content
        .trim_start_matches('\u{feff}')
        .lines()
        .enumerate()
        .peekable();

    while lines.peek().is_some() {
        // Skip empty lines
        while lines.peek().is_some_and(|(_, l)| l.trim().is_empty()) {
            lines.next();
        }

        // Index line; not required to be numeric
        if lines.next().is_none() {
            break;
        }

        let Some((number, timing_line)) = lines.next() else {
            break;
        };
        let (start, end) = parse_timing_line(number + 1, timing_line.trim())?;

        // Collect text lines until empty line
        let mut text_lines = Vec::new();
        while let Some((_, line)) = lines.next_if(|(_, l)| !l.trim().is_empty()) {
            text_lines.push(line);
        }

        let nodes = markup.parse(&text_lines, str::to_string);
        if nodes.iter().any(|node| node.is_text()) {
            captions.push(Caption::new(start, Some(end)).with_nodes(nodes));
        }
    }

    Ok(captions)
}

/// Parses a timing line, ignoring position info after the end time.
fn parse_timing_line(line_number: usize, line: &str) -> Result<(u64, u64)> {
    let Some((start, rest)) = line.split_once("-->") else {
        return Err(CaptionError::parse(
            line_number,
            format!("invalid timing line: {line}"),
        ));
    };
    let end = rest.split_whitespace().next().unwrap_or_default();

    let start = parse_clock(start.trim()).map_err(|e| CaptionError::InvalidTimestamp(e.to_string()))?;
    let end = parse_clock(end).map_err(|e| CaptionError::InvalidTimestamp(e.to_string()))?;
    Ok((start, end))
}

/// Writes the first language of a caption set as SRT.
#[derive(Debug, Clone, Default)]
pub struct SrtWriter;

impl CaptionWriter for SrtWriter {
    fn write(&self, captions: &CaptionSet) -> Result<String> {
        let language = captions.first_language().unwrap_or(DEFAULT_LANGUAGE);
        Ok(write(captions.captions(language)))
    }
}

/// Formats captions as SRT blocks numbered from 1.
pub fn write(captions: &[Caption]) -> String {
    let mut output = String::new();
    let mut index = 0;

    for caption in captions {
        let text = markup::render(&caption.nodes, BlankLines::Skip, str::to_string);
        if text.trim().is_empty() {
            continue;
        }
        index += 1;
        output.push_str(&format!(
            "{}\n{} --> {}\n{}\n\n",
            index,
            caption.format_start(','),
            caption.format_end(','),
            text
        ));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CaptionNode, StyleProps};
    use pretty_assertions::assert_eq;

    const SAMPLE_SRT: &str = r#"1
00:00:01,000 --> 00:00:04,000
Hello, world!

2
00:00:05,000 --> 00:00:08,500
This is a <b>bold</b> test.

3
00:00:10,000 --> 00:00:15,000
Multiple lines
of <i>text</i> here.

"#;

    #[test]
    fn test_parse_simple_srt() {
        let captions = parse(SAMPLE_SRT).unwrap();
        assert_eq!(captions.len(), 3);

        assert_eq!(captions[0].start, 1_000_000);
        assert_eq!(captions[0].end, Some(4_000_000));
        assert_eq!(captions[0].text(), "Hello, world!");

        assert_eq!(captions[1].start, 5_000_000);
        assert_eq!(captions[1].end, Some(8_500_000));

        assert_eq!(captions[2].text(), "Multiple lines\nof text here.");
    }

    #[test]
    fn test_parse_italics() {
        let captions = parse(SAMPLE_SRT).unwrap();
        assert_eq!(
            captions[2].nodes,
            vec![
                CaptionNode::text("Multiple lines"),
                CaptionNode::LineBreak,
                CaptionNode::text("of "),
                CaptionNode::open(StyleProps::italic()),
                CaptionNode::text("text"),
                CaptionNode::close(StyleProps::italic()),
                CaptionNode::text(" here."),
            ]
        );
    }

    #[test]
    fn test_parse_timing_with_position() {
        let srt = "1\n00:00:01,000 --> 00:00:04,000 X1:100 X2:200 Y1:50 Y2:100\nHello, world!\n";
        let captions = parse(srt).unwrap();
        assert_eq!(captions.len(), 1);
        assert_eq!(captions[0].end, Some(4_000_000));
    }

    #[test]
    fn test_bad_timing_line() {
        let err = parse("1\nnot a timing line\nHello\n").unwrap_err();
        assert!(matches!(err, CaptionError::Parse { line: 2, .. }));

        let err = parse("1\n00:00:xx,000 --> 00:00:04,000\nHello\n").unwrap_err();
        assert!(matches!(err, CaptionError::InvalidTimestamp(_)));
    }

    #[test]
    fn test_detect() {
        let reader = SrtReader::default();
        assert!(reader.detect(SAMPLE_SRT));
        assert!(reader.detect("\n\n1\n00:00:01,000 --> 00:00:02,000\nHi\n"));
        assert!(!reader.detect("WEBVTT\n\n00:01.000 --> 00:02.000\nHi\n"));
        assert!(!reader.detect("Scenarist_SCC V1.0\n"));
    }

    #[test]
    fn test_read_language_and_empty() {
        let reader = SrtReader::new(SrtReaderConfig::default().with_language("fr-FR"));
        let set = reader.read(SAMPLE_SRT).unwrap();
        assert_eq!(set.languages(), vec!["fr-FR"]);

        assert!(reader.read("").unwrap_err().is_empty_file());
    }

    #[test]
    fn test_write_srt() {
        let captions = vec![
            Caption::from_text(1_000_000, 4_000_000, "Hello, world!"),
            Caption::new(4_500_000, None),
            Caption::new(5_000_000, None).with_nodes(vec![CaptionNode::text("Open")]),
        ];
        assert_eq!(
            write(&captions),
            "1\n00:00:01,000 --> 00:00:04,000\nHello, world!\n\n\
             2\n00:00:05,000 --> 00:00:05,000\nOpen\n\n"
        );
    }

    #[test]
    fn test_roundtrip() {
        let captions = parse(SAMPLE_SRT).unwrap();
        let output = write(&captions);
        let reparsed = parse(&output).unwrap();
        assert_eq!(captions, reparsed);
    }
}
