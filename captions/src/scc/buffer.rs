//! Pending cue content built up between control codes.

/// One piece of pending cue content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Decoded characters.
    Text(String),
    /// Row change.
    Break,
    /// Italics on.
    Italic,
    /// Italics off.
    EndItalic,
}

/// Content of one display memory, in transmission order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CueBuffer {
    segments: Vec<Segment>,
}

impl CueBuffer {
    /// Creates an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends characters, extending a trailing text segment.
    pub fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(Segment::Text(last)) = self.segments.last_mut() {
            last.push_str(text);
        } else {
            self.segments.push(Segment::Text(text.to_string()));
        }
    }

    /// Appends a segment.
    pub fn push(&mut self, segment: Segment) {
        match segment {
            Segment::Text(text) => self.push_text(&text),
            other => self.segments.push(other),
        }
    }

    /// Removes the last character if the buffer ends in text.
    pub fn pop_char(&mut self) -> Option<char> {
        let Some(Segment::Text(last)) = self.segments.last_mut() else {
            return None;
        };
        let popped = last.pop();
        if last.is_empty() {
            self.segments.pop();
        }
        popped
    }

    /// True when nothing has been buffered.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Discards the content.
    pub fn clear(&mut self) {
        self.segments.clear();
    }

    /// Concatenates rows, putting `separator` between them.
    pub fn join<'a>(rows: impl IntoIterator<Item = &'a CueBuffer>, separator: &str) -> CueBuffer {
        let mut joined = CueBuffer::new();
        for (i, row) in rows.into_iter().enumerate() {
            if i > 0 {
                joined.push_text(separator);
            }
            for segment in &row.segments {
                joined.push(segment.clone());
            }
        }
        joined
    }

    /// Takes the segments out of the buffer.
    pub fn into_segments(self) -> Vec<Segment> {
        self.segments
    }
}
