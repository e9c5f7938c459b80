//! SCC decoding: a line-21 state machine that rebuilds timed cues.

use super::buffer::{CueBuffer, Segment};
use super::tables::{self, Code, Command};
use super::HEADER_PREFIX;
use crate::error::{CaptionError, Result};
use crate::model::{Caption, CaptionNode, StyleProps};
use captions_timecode::{parse_timecode, FrameRate, Timecode};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::mem;
use tracing::{debug, trace};

/// Options for reading SCC.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SccReaderConfig {
    /// Microseconds subtracted from every decoded time.
    pub offset: u64,
    /// Keep earlier roll-up rows on screen when a new row arrives.
    pub simulate_roll_up: bool,
}

impl SccReaderConfig {
    /// Sets the time offset in microseconds.
    pub fn with_offset(mut self, offset: u64) -> Self {
        self.offset = offset;
        self
    }

    /// Sets roll-up simulation.
    pub fn with_simulate_roll_up(mut self, simulate: bool) -> Self {
        self.simulate_roll_up = simulate;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    PopOn,
    PaintOn,
}

/// Decoder state for one SCC document.
#[derive(Debug)]
pub struct SccDecoder {
    config: SccReaderConfig,
    captions: Vec<Caption>,
    /// Non-displayed memory.
    pop: CueBuffer,
    /// Displayed memory for paint-on and roll-up.
    paint: CueBuffer,
    last_command: Option<(u8, u8)>,
    roll_rows: VecDeque<CueBuffer>,
    roll_rows_expected: usize,
    mode: Mode,
    paint_time: u64,
    pop_time: u64,
    timecode: Option<Timecode>,
    frame_count: u32,
    dropped_words: usize,
}

impl SccDecoder {
    /// Creates a decoder.
    pub fn new(config: SccReaderConfig) -> Self {
        Self {
            config,
            captions: Vec::new(),
            pop: CueBuffer::new(),
            paint: CueBuffer::new(),
            last_command: None,
            roll_rows: VecDeque::new(),
            roll_rows_expected: 1,
            mode: Mode::PopOn,
            paint_time: 0,
            pop_time: 0,
            timecode: None,
            frame_count: 0,
            dropped_words: 0,
        }
    }

    /// Decodes a whole document into captions in emission order.
    pub fn decode(mut self, content: &str) -> Result<Vec<Caption>> {
        for (index, line) in content.lines().enumerate() {
            self.decode_line(index + 1, line)?;
        }
        if !self.paint.is_empty() {
            let now = self.current_time()?;
            self.roll_up(now);
        }
        if self.dropped_words > 0 {
            debug!(
                dropped = self.dropped_words,
                "Skipped unrecognised SCC words"
            );
        }
        debug!(captions = self.captions.len(), "Decoded SCC");
        Ok(self.captions)
    }

    fn decode_line(&mut self, line_number: usize, line: &str) -> Result<()> {
        let line = line.trim_start_matches('\u{feff}').trim();
        if line.is_empty() || line.starts_with(HEADER_PREFIX) {
            return Ok(());
        }

        let mut tokens = line.split_whitespace();
        let Some(stamp) = tokens.next() else {
            return Ok(());
        };
        let timecode = parse_timecode(stamp, FrameRate::Fps29_97)
            .map_err(|e| CaptionError::parse(line_number, e.to_string()))?;
        trace!(line = line_number, timecode = %timecode, "SCC line");

        self.timecode = Some(timecode);
        self.frame_count = 0;
        for word in tokens {
            self.frame_count += 1;
            self.decode_word(word)?;
        }
        Ok(())
    }

    fn decode_word(&mut self, word: &str) -> Result<()> {
        let Some((bytes, code)) = tables::parse_word(word)
            .and_then(|(b1, b2)| tables::classify(b1, b2).map(|code| ((b1, b2), code)))
        else {
            trace!(word, "Dropping unrecognised word");
            self.dropped_words += 1;
            return Ok(());
        };

        if let Code::Characters(text) = code {
            self.active_mut().push_text(&text);
            return Ok(());
        }

        // Control codes arrive twice; the repeat is a no-op.
        if self.last_command == Some(bytes) {
            self.last_command = None;
            return Ok(());
        }
        self.last_command = Some(bytes);

        match code {
            Code::Special(c) => self.active_mut().push_text(c.encode_utf8(&mut [0; 4])),
            Code::Extended(c) => {
                let buffer = self.active_mut();
                buffer.pop_char();
                buffer.push_text(c.encode_utf8(&mut [0; 4]));
            }
            Code::Command(command) => self.apply(command)?,
            Code::Characters(_) => {}
        }
        Ok(())
    }

    fn apply(&mut self, command: Command) -> Result<()> {
        match command {
            Command::PopOn => {
                if self.mode != Mode::PopOn {
                    debug!("Entering pop-on mode");
                }
                self.mode = Mode::PopOn;
            }
            Command::PaintOn { rows } => {
                debug!(rows, "Entering paint-on mode");
                self.mode = Mode::PaintOn;
                self.roll_rows_expected = rows;
                if !self.paint.is_empty() {
                    let segments = mem::take(&mut self.paint).into_segments();
                    self.convert_to_caption(segments, self.paint_time);
                }
                self.roll_rows.clear();
                self.paint_time = self.current_time()?;
            }
            Command::EraseNonDisplayed => self.pop.clear(),
            Command::EndOfCaption => {
                if !self.pop.is_empty() {
                    self.pop_time = self.current_time()?;
                    let segments = mem::take(&mut self.pop).into_segments();
                    self.convert_to_caption(segments, self.pop_time);
                }
            }
            Command::CarriageReturn => {
                if !self.paint.is_empty() {
                    let now = self.current_time()?;
                    self.roll_up(now);
                }
            }
            Command::EraseDisplayed => {
                let now = self.current_time()?;
                self.roll_rows.clear();
                if !self.paint.is_empty() {
                    self.roll_up(now);
                }
                if let Some(last) = self.captions.last_mut() {
                    if last.end.is_none() {
                        last.end = Some(now);
                    }
                }
            }
            Command::Preamble { italic } => {
                let buffer = self.active_mut();
                buffer.push(Segment::Break);
                if italic {
                    buffer.push(Segment::Italic);
                }
            }
            Command::MidRow { italic } => {
                let buffer = self.active_mut();
                buffer.push_text(" ");
                buffer.push(if italic {
                    Segment::Italic
                } else {
                    Segment::EndItalic
                });
            }
            Command::Other => {}
        }
        Ok(())
    }

    fn active_mut(&mut self) -> &mut CueBuffer {
        match self.mode {
            Mode::PopOn => &mut self.pop,
            Mode::PaintOn => &mut self.paint,
        }
    }

    /// Time of the word being decoded: the line's timecode advanced by the
    /// words consumed so far, less the configured offset.
    fn current_time(&self) -> Result<u64> {
        let Some(timecode) = self.timecode else {
            return Ok(0);
        };
        let advanced = timecode.add_frames(i64::from(self.frame_count))?;
        Ok(advanced
            .to_microseconds()
            .saturating_sub(self.config.offset))
    }

    fn roll_up(&mut self, now: u64) {
        if !self.config.simulate_roll_up {
            self.roll_rows.clear();
        }
        while self.roll_rows.len() >= self.roll_rows_expected.max(1) {
            self.roll_rows.pop_front();
        }
        self.roll_rows.push_back(mem::take(&mut self.paint));

        debug!(rows = self.roll_rows.len(), "Rolling up");
        let joined = CueBuffer::join(&self.roll_rows, " ");
        self.convert_to_caption(joined.into_segments(), self.paint_time);

        self.paint_time = now;
        if let Some(last) = self.captions.last_mut() {
            last.end = Some(self.paint_time);
        }
    }

    fn convert_to_caption(&mut self, segments: Vec<Segment>, start: u64) {
        if let Some(last) = self.captions.last_mut() {
            if last.end.is_none() {
                last.end = Some(last.start);
            }
        }

        let nodes = build_nodes(segments);
        if nodes.iter().any(CaptionNode::is_text) {
            trace!(start, nodes = nodes.len(), "Emitting caption");
            self.captions.push(Caption::new(start, None).with_nodes(nodes));
        }
    }
}

fn italic_marker(opening: bool) -> CaptionNode {
    if opening {
        CaptionNode::open(StyleProps::italic())
    } else {
        CaptionNode::close(StyleProps::italic())
    }
}

/// Turns buffered segments into balanced caption nodes.
fn build_nodes(segments: Vec<Segment>) -> Vec<CaptionNode> {
    let mut nodes: Vec<CaptionNode> = Vec::new();
    let mut open_italic = false;

    for segment in segments {
        match segment {
            Segment::Text(text) if text.trim().is_empty() => {
                if nodes.last().is_some_and(|node| !node.is_line_break()) {
                    nodes.push(CaptionNode::text(" "));
                }
            }
            Segment::Text(text) => nodes.push(CaptionNode::Text(text)),
            Segment::Break => {
                if nodes.last().map_or(true, CaptionNode::is_line_break) {
                    continue;
                }
                if open_italic {
                    nodes.push(italic_marker(false));
                    open_italic = false;
                }
                nodes.push(CaptionNode::LineBreak);
            }
            Segment::Italic => {
                if !open_italic {
                    nodes.push(italic_marker(true));
                    open_italic = true;
                }
            }
            Segment::EndItalic => {
                if open_italic {
                    nodes.push(italic_marker(false));
                    open_italic = false;
                }
            }
        }
    }
    if open_italic {
        nodes.push(italic_marker(false));
    }

    remove_extra_italics(&mut nodes);
    tidy(&mut nodes);
    nodes
}

/// Italics closed at a row end and reopened on the next row never really
/// stopped: `[close, break, open]` becomes `[break]`.
fn remove_extra_italics(nodes: &mut Vec<CaptionNode>) {
    let mut i = 0;
    while i + 2 < nodes.len() {
        if nodes[i].is_italic_marker(false)
            && nodes[i + 1].is_line_break()
            && nodes[i + 2].is_italic_marker(true)
        {
            nodes.remove(i + 2);
            nodes.remove(i);
        } else {
            i += 1;
        }
    }
}

fn tidy(nodes: &mut Vec<CaptionNode>) {
    loop {
        let before = nodes.len();
        remove_empty_styles(nodes);
        normalize_text(nodes);
        nodes.retain(|node| !matches!(node, CaptionNode::Text(text) if text.is_empty()));
        remove_stray_breaks(nodes);
        if nodes.len() == before {
            break;
        }
    }
}

/// Drops an opening marker immediately followed by its closing marker.
fn remove_empty_styles(nodes: &mut Vec<CaptionNode>) {
    let mut i = 0;
    while i + 1 < nodes.len() {
        if nodes[i].is_italic_marker(true) && nodes[i + 1].is_italic_marker(false) {
            nodes.drain(i..i + 2);
            i = i.saturating_sub(1);
        } else {
            i += 1;
        }
    }
}

fn collapse_whitespace(text: &str) -> String {
    let mut collapsed = String::with_capacity(text.len());
    let mut in_space = false;
    for c in text.chars() {
        if c.is_whitespace() {
            if !in_space {
                collapsed.push(' ');
            }
            in_space = true;
        } else {
            collapsed.push(c);
            in_space = false;
        }
    }
    collapsed
}

/// Collapses whitespace runs and trims text at row edges.
fn normalize_text(nodes: &mut [CaptionNode]) {
    let mut after_space = true;
    for i in 0..nodes.len() {
        let text = match &nodes[i] {
            CaptionNode::LineBreak => {
                after_space = true;
                continue;
            }
            CaptionNode::Style { .. } => continue,
            CaptionNode::Text(text) => text,
        };

        let at_line_end = nodes[i + 1..]
            .iter()
            .find(|node| !node.is_style())
            .map_or(true, CaptionNode::is_line_break);

        let mut normalized = collapse_whitespace(text);
        if after_space {
            normalized = normalized.trim_start().to_string();
        }
        if at_line_end {
            normalized = normalized.trim_end().to_string();
        }
        if !normalized.is_empty() {
            after_space = normalized.ends_with(' ');
        }
        nodes[i] = CaptionNode::Text(normalized);
    }
}

/// Drops line breaks that do not separate two pieces of text.
fn remove_stray_breaks(nodes: &mut Vec<CaptionNode>) {
    let last_text = nodes.iter().rposition(CaptionNode::is_text);
    let mut seen_text = false;
    let mut previous_break = false;
    let mut index = 0;
    nodes.retain(|node| {
        let position = index;
        index += 1;
        match node {
            CaptionNode::Text(_) => {
                seen_text = true;
                previous_break = false;
                true
            }
            CaptionNode::LineBreak => {
                let trailing = last_text.map_or(true, |last| position > last);
                if !seen_text || previous_break || trailing {
                    return false;
                }
                previous_break = true;
                true
            }
            CaptionNode::Style { .. } => true,
        }
    });
}
