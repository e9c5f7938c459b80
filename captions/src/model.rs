//! Caption document model shared by every format.
//!
//! A [`CaptionSet`] maps language tags to ordered [`Caption`] cues. Each cue
//! holds a sequence of [`CaptionNode`]s: literal text, explicit line breaks,
//! and paired style markers that open and close styled runs.

use captions_timecode::format_clock;
use std::collections::BTreeMap;

/// Language tag used when a format carries no language marker.
pub const DEFAULT_LANGUAGE: &str = "en-US";

/// Style attributes attached to a caption or a styled run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct StyleProps {
    /// Style identifier.
    pub id: Option<String>,
    /// Style class name.
    pub class: Option<String>,
    /// Text alignment (`left`, `center`, ...).
    pub text_align: Option<String>,
    /// Font family name.
    pub font_family: Option<String>,
    /// Font size, in the unit the source format used (`1c`, `80%`).
    pub font_size: Option<String>,
    /// Text color.
    pub color: Option<String>,
    /// Italic text.
    pub italics: bool,
    /// Bold text.
    pub bold: bool,
    /// Underlined text.
    pub underline: bool,
    /// Language override for the styled content.
    pub language: Option<String>,
}

impl StyleProps {
    /// Creates empty style properties.
    pub fn new() -> Self {
        Self::default()
    }

    /// White monospace text at one cell height, the line-21 look.
    pub fn caption_default() -> Self {
        Self {
            color: Some("white".to_string()),
            font_family: Some("monospace".to_string()),
            font_size: Some("1c".to_string()),
            ..Self::default()
        }
    }

    /// Default caption style with italics turned on.
    pub fn italic() -> Self {
        Self::caption_default().with_italics(true)
    }

    /// Sets the style identifier.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Sets the class name.
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    /// Sets the text alignment.
    pub fn with_text_align(mut self, align: impl Into<String>) -> Self {
        self.text_align = Some(align.into());
        self
    }

    /// Sets the font family.
    pub fn with_font_family(mut self, family: impl Into<String>) -> Self {
        self.font_family = Some(family.into());
        self
    }

    /// Sets the font size.
    pub fn with_font_size(mut self, size: impl Into<String>) -> Self {
        self.font_size = Some(size.into());
        self
    }

    /// Sets the text color.
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Sets italics.
    pub fn with_italics(mut self, italics: bool) -> Self {
        self.italics = italics;
        self
    }

    /// Sets bold.
    pub fn with_bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    /// Sets underline.
    pub fn with_underline(mut self, underline: bool) -> Self {
        self.underline = underline;
        self
    }

    /// Sets the language override.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Returns true if any text decoration is set.
    pub fn has_styling(&self) -> bool {
        self.italics || self.bold || self.underline
    }
}

/// One piece of a caption's content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptionNode {
    /// Displayed text, whitespace already collapsed.
    Text(String),
    /// Start or end of a styled run.
    Style {
        /// The style applied to the run.
        props: StyleProps,
        /// True for the marker that opens the run.
        opening: bool,
    },
    /// Explicit visual line break.
    LineBreak,
}

impl CaptionNode {
    /// Creates a text node.
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text(content.into())
    }

    /// Creates a marker opening a styled run.
    pub fn open(props: StyleProps) -> Self {
        Self::Style {
            props,
            opening: true,
        }
    }

    /// Creates a marker closing a styled run.
    pub fn close(props: StyleProps) -> Self {
        Self::Style {
            props,
            opening: false,
        }
    }

    /// Returns true for text nodes.
    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text(_))
    }

    /// Returns true for line breaks.
    pub fn is_line_break(&self) -> bool {
        matches!(self, Self::LineBreak)
    }

    /// Returns true for style markers.
    pub fn is_style(&self) -> bool {
        matches!(self, Self::Style { .. })
    }

    /// Returns true for an italic marker with the given direction.
    pub fn is_italic_marker(&self, is_opening: bool) -> bool {
        matches!(self, Self::Style { props, opening } if props.italics && *opening == is_opening)
    }

    /// Displayed content: the text, `"\n"` for a break, nothing for a marker.
    pub fn content(&self) -> &str {
        match self {
            Self::Text(text) => text,
            Self::LineBreak => "\n",
            Self::Style { .. } => "",
        }
    }
}

/// One timed cue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caption {
    /// Start time in microseconds.
    pub start: u64,
    /// End time in microseconds, `None` while not yet known.
    pub end: Option<u64>,
    /// Ordered content.
    pub nodes: Vec<CaptionNode>,
    /// Style applied to the whole cue.
    pub style: StyleProps,
}

impl Caption {
    /// Creates a caption without content using the default caption style.
    pub fn new(start: u64, end: Option<u64>) -> Self {
        Self {
            start,
            end,
            nodes: Vec::new(),
            style: StyleProps::caption_default(),
        }
    }

    /// Creates a caption from plain text, turning `\n` into line breaks.
    pub fn from_text(start: u64, end: u64, text: &str) -> Self {
        let mut nodes = Vec::new();
        for (i, line) in text.split('\n').enumerate() {
            if i > 0 {
                nodes.push(CaptionNode::LineBreak);
            }
            if !line.is_empty() {
                nodes.push(CaptionNode::text(line));
            }
        }
        Self::new(start, Some(end)).with_nodes(nodes)
    }

    /// Replaces the content.
    pub fn with_nodes(mut self, nodes: Vec<CaptionNode>) -> Self {
        self.nodes = nodes;
        self
    }

    /// Replaces the cue style.
    pub fn with_style(mut self, style: StyleProps) -> Self {
        self.style = style;
        self
    }

    /// Appends a node.
    pub fn push(&mut self, node: CaptionNode) {
        self.nodes.push(node);
    }

    /// A caption without nodes is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Displayed text with `\n` for line breaks and style markers dropped.
    pub fn text(&self) -> String {
        self.nodes.iter().map(CaptionNode::content).collect()
    }

    /// End time, or the start when the end is unknown.
    pub fn end_or_start(&self) -> u64 {
        self.end.unwrap_or(self.start)
    }

    /// Duration in microseconds (zero when the end is unknown).
    pub fn duration(&self) -> u64 {
        self.end_or_start().saturating_sub(self.start)
    }

    /// Start time as `HH:MM:SS.mmm`, using `separator` for the decimal point.
    pub fn format_start(&self, separator: char) -> String {
        format_clock(self.start, separator)
    }

    /// End time as `HH:MM:SS.mmm`, using `separator` for the decimal point.
    pub fn format_end(&self, separator: char) -> String {
        format_clock(self.end_or_start(), separator)
    }

    /// True when every opening style marker is matched by a later closing one.
    pub fn styles_balanced(&self) -> bool {
        let mut depth: i64 = 0;
        for node in &self.nodes {
            if let CaptionNode::Style { opening, .. } = node {
                depth += if *opening { 1 } else { -1 };
                if depth < 0 {
                    return false;
                }
            }
        }
        depth == 0
    }
}

/// Captions per language plus named styles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaptionSet {
    captions: BTreeMap<String, Vec<Caption>>,
    styles: BTreeMap<String, StyleProps>,
}

impl CaptionSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a set holding one language.
    pub fn with_captions(language: impl Into<String>, captions: Vec<Caption>) -> Self {
        let mut set = Self::new();
        set.set_captions(language, captions);
        set
    }

    /// Replaces the captions of a language.
    pub fn set_captions(&mut self, language: impl Into<String>, captions: Vec<Caption>) {
        self.captions.insert(language.into(), captions);
    }

    /// Captions for a language, empty if the language is absent.
    pub fn captions(&self, language: &str) -> &[Caption] {
        self.captions
            .get(language)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Mutable captions for a language.
    pub fn captions_mut(&mut self, language: &str) -> Option<&mut Vec<Caption>> {
        self.captions.get_mut(language)
    }

    /// Language tags in sorted order.
    pub fn languages(&self) -> Vec<&str> {
        self.captions.keys().map(String::as_str).collect()
    }

    /// The first language in sorted order.
    pub fn first_language(&self) -> Option<&str> {
        self.captions.keys().next().map(String::as_str)
    }

    /// True when no language holds a caption.
    pub fn is_empty(&self) -> bool {
        self.captions.values().all(Vec::is_empty)
    }

    /// Total number of captions across languages.
    pub fn caption_count(&self) -> usize {
        self.captions.values().map(Vec::len).sum()
    }

    /// Registers a named style under its id (empty id if none).
    pub fn add_style(&mut self, style: StyleProps) {
        let id = style.id.clone().unwrap_or_default();
        self.styles.insert(id, style);
    }

    /// Looks up a style, falling back to [`StyleProps::caption_default`].
    pub fn style(&self, id: &str) -> StyleProps {
        self.styles
            .get(id)
            .cloned()
            .unwrap_or_else(StyleProps::caption_default)
    }

    /// All registered styles.
    pub fn styles(&self) -> impl Iterator<Item = &StyleProps> {
        self.styles.values()
    }

    /// Merges adjacent captions with identical timing into one cue, joining
    /// their content with a line break.
    pub fn merge_matching(&mut self) {
        for captions in self.captions.values_mut() {
            let mut merged: Vec<Caption> = Vec::with_capacity(captions.len());
            for caption in captions.drain(..) {
                match merged.last_mut() {
                    Some(last) if last.start == caption.start && last.end == caption.end => {
                        last.nodes.push(CaptionNode::LineBreak);
                        last.nodes.extend(caption.nodes);
                    }
                    _ => merged.push(caption),
                }
            }
            *captions = merged;
        }
    }

    /// Removes every style marker, leaving text and line breaks.
    pub fn strip_styles(&mut self) {
        for caption in self.captions.values_mut().flatten() {
            caption.nodes.retain(|node| !node.is_style());
        }
    }
}
