//! SCC encoding: pop-on captions laid out on the bottom rows of the grid.

use super::tables::{self, CharCode};
use super::{HEADER, MICROSECONDS_PER_CODEWORD};
use crate::error::{CaptionError, Result};
use crate::model::{Caption, CaptionNode, CaptionSet};
use captions_timecode::{FrameRate, Timecode};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Characters per caption row.
pub const ROW_WIDTH: usize = 32;

/// Words sent before the caption's own code: `94ae 94ae 9420 9420`.
const PREFIX_WORDS: usize = 4;

/// Words from the end of the code through the first end-of-caption:
/// `942c 942c 942f`.
const SUFFIX_WORDS: usize = 3;

/// Unknown characters are sent as a pound sign.
const UNKNOWN_CHARACTER: (u8, u8) = (0x11, 0x36);

/// Options for writing SCC.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SccWriterConfig {
    /// Language to write; the first language in the set when unset.
    pub language: Option<String>,
}

impl SccWriterConfig {
    /// Selects the language to write.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }
}

/// A caption ready to be written.
struct Block<'a> {
    caption: &'a Caption,
    code: String,
    /// When transmission must begin so the end-of-caption word lands on the
    /// caption's start frame.
    transmit: Timecode,
}

impl Block<'_> {
    fn transmit_at(&self) -> u64 {
        self.transmit.to_microseconds()
    }
}

/// Encodes one language of a caption set as SCC.
pub fn encode(captions: &CaptionSet, config: &SccWriterConfig) -> Result<String> {
    let mut output = format!("{HEADER}\n\n");
    let Some(language) = config
        .language
        .as_deref()
        .or_else(|| captions.first_language())
    else {
        return Ok(output);
    };

    let mut blocks = Vec::new();
    for caption in captions.captions(language) {
        if let Some(end) = caption.end {
            if end < caption.start {
                return Err(CaptionError::InvalidTiming(format!(
                    "caption ends at {} before it starts at {}",
                    caption.format_end('.'),
                    caption.format_start('.')
                )));
            }
        }
        let lines = layout_lines(caption)?;
        if lines.is_empty() {
            continue;
        }
        let code = text_to_code(&lines);
        // One word is one frame, two codewords
        let words = (PREFIX_WORDS + code.len() / 5 + SUFFIX_WORDS) as u64;
        let start = frame_at(caption.start).to_frame_number();
        blocks.push(Block {
            caption,
            code,
            transmit: timecode_for_frame(start.saturating_sub(words)),
        });
    }

    let clear_window = (3.0 * MICROSECONDS_PER_CODEWORD).round() as u64;
    for (index, block) in blocks.iter().enumerate() {
        output.push_str(&format!(
            "{}\t94ae 94ae 9420 9420 {}942c 942c 942f 942f\n\n",
            block.transmit, block.code
        ));

        let Some(end) = block.caption.end else {
            continue;
        };
        // The next caption's own erase closes this one when it is sent
        // soon enough.
        let superseded = blocks
            .get(index + 1)
            .is_some_and(|next| end + clear_window >= next.transmit_at());
        if !superseded {
            // The erase takes effect one word after the line's timecode
            let clear = frame_at(end).to_frame_number().saturating_sub(1);
            output.push_str(&format!("{}\t942c 942c\n\n", timecode_for_frame(clear)));
        }
    }

    debug!(language, captions = blocks.len(), "Encoded SCC");
    Ok(output)
}

/// Non-drop frame showing at a wall-clock position.
fn frame_at(microseconds: u64) -> Timecode {
    Timecode::from_microseconds(microseconds, FrameRate::Fps29_97)
}

fn timecode_for_frame(frame: u64) -> Timecode {
    Timecode::from_frame_number(frame, FrameRate::Fps29_97, false)
}

/// Splits displayed text into rows of at most [`ROW_WIDTH`] characters.
fn layout_lines(caption: &Caption) -> Result<Vec<String>> {
    let text: String = caption
        .nodes
        .iter()
        .filter(|node| !node.is_style())
        .map(CaptionNode::content)
        .collect();

    let mut lines = Vec::new();
    for line in text.split('\n') {
        let chars: Vec<char> = line.trim().chars().collect();
        for chunk in chars.chunks(ROW_WIDTH) {
            lines.push(chunk.iter().collect::<String>());
        }
    }

    if lines.len() > tables::ROW_COUNT {
        return Err(CaptionError::Layout(format!(
            "caption at {} needs {} rows, at most {} fit",
            caption.format_start('.'),
            lines.len(),
            tables::ROW_COUNT
        )));
    }
    Ok(lines)
}

/// Hex words for the rows, each row preceded by its address code sent twice.
fn text_to_code(lines: &[String]) -> String {
    let mut code = String::new();
    for (index, line) in lines.iter().enumerate() {
        let row = tables::ROW_COUNT + 1 - lines.len() + index;
        if let Some((high, low)) = tables::preamble_for_row(row) {
            code.push_str(&format!("{high:02x}{low:02x} {high:02x}{low:02x} "));
        }
        for c in line.chars() {
            write_character(&mut code, c);
            maybe_space(&mut code);
        }
        maybe_align(&mut code);
    }
    code
}

fn write_character(code: &mut String, c: char) {
    match tables::encode_character(c) {
        Some(CharCode::Single(byte)) => write_byte(code, byte),
        Some(CharCode::Special(b1, b2)) => write_word(code, b1, b2),
        Some(CharCode::Extended(b1, b2)) => {
            write_byte(code, tables::extended_fallback(c));
            maybe_space(code);
            write_word(code, b1, b2);
        }
        None => {
            warn!(character = %c, "No line-21 code for character, sending a pound sign");
            write_word(code, UNKNOWN_CHARACTER.0, UNKNOWN_CHARACTER.1);
        }
    }
}

fn write_byte(code: &mut String, byte: u8) {
    code.push_str(&format!("{:02x}", tables::with_parity(byte)));
}

/// Two-byte codes start on a word boundary and are sent twice.
fn write_word(code: &mut String, b1: u8, b2: u8) {
    maybe_align(code);
    let word = format!("{:02x}{:02x}", tables::with_parity(b1), tables::with_parity(b2));
    code.push_str(&format!("{word} {word}"));
}

fn maybe_space(code: &mut String) {
    if code.len() % 5 == 4 {
        code.push(' ');
    }
}

/// Finishes a half word with a null byte.
fn maybe_align(code: &mut String) {
    if code.len() % 5 == 2 {
        code.push_str("80 ");
    }
}
