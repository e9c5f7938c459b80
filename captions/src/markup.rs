//! Inline `<b>`, `<i>` and `<u>` markup shared by the SRT and WebVTT formats.

use crate::error::Result;
use crate::model::{CaptionNode, StyleProps};
use regex::Regex;

/// Any tag, including WebVTT timestamps and voice spans.
const TAG_PATTERN: &str = r"<(/?)([A-Za-z]*)[^>]*>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Decoration {
    Italic,
    Bold,
    Underline,
}

impl Decoration {
    fn from_tag(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "i" => Some(Self::Italic),
            "b" => Some(Self::Bold),
            "u" => Some(Self::Underline),
            _ => None,
        }
    }

    fn of(props: &StyleProps) -> Option<Self> {
        if props.italics {
            Some(Self::Italic)
        } else if props.bold {
            Some(Self::Bold)
        } else if props.underline {
            Some(Self::Underline)
        } else {
            None
        }
    }

    fn props(self) -> StyleProps {
        let props = StyleProps::caption_default();
        match self {
            Self::Italic => props.with_italics(true),
            Self::Bold => props.with_bold(true),
            Self::Underline => props.with_underline(true),
        }
    }

    fn tag(self) -> &'static str {
        match self {
            Self::Italic => "i",
            Self::Bold => "b",
            Self::Underline => "u",
        }
    }
}

/// How a writer treats a line break that would leave a line empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BlankLines {
    /// Write `&nbsp;` on the empty line.
    Pad,
    /// Drop the break.
    Skip,
}

/// Compiled tag matcher.
#[derive(Debug)]
pub(crate) struct Markup {
    tag: Regex,
}

impl Markup {
    pub(crate) fn new() -> Result<Self> {
        Ok(Self {
            tag: Regex::new(TAG_PATTERN)?,
        })
    }

    /// Turns cue text lines into nodes.
    ///
    /// Decoration tags become balanced style markers, every other tag is
    /// dropped. `unescape` is applied to the text between tags.
    pub(crate) fn parse(&self, lines: &[&str], unescape: impl Fn(&str) -> String) -> Vec<CaptionNode> {
        let mut nodes = Vec::new();
        let mut open: Vec<Decoration> = Vec::new();

        for (index, line) in lines.iter().enumerate() {
            if index > 0 {
                nodes.push(CaptionNode::LineBreak);
            }
            let mut last = 0;
            for captures in self.tag.captures_iter(line) {
                let Some(whole) = captures.get(0) else {
                    continue;
                };
                push_text(&mut nodes, &unescape(&line[last..whole.start()]));
                last = whole.end();

                let closing = captures.get(1).is_some_and(|m| m.as_str() == "/");
                let name = captures.get(2).map_or("", |m| m.as_str());
                let Some(decoration) = Decoration::from_tag(name) else {
                    continue;
                };
                if !closing {
                    nodes.push(CaptionNode::open(decoration.props()));
                    open.push(decoration);
                } else if let Some(position) = open.iter().rposition(|d| *d == decoration) {
                    // Close overlapping runs and reopen the inner ones.
                    let closed: Vec<Decoration> = open.drain(position..).collect();
                    for d in closed.iter().rev() {
                        nodes.push(CaptionNode::close(d.props()));
                    }
                    for d in closed.iter().skip(1) {
                        nodes.push(CaptionNode::open(d.props()));
                        open.push(*d);
                    }
                }
            }
            push_text(&mut nodes, &unescape(&line[last..]));
        }

        for d in open.iter().rev() {
            nodes.push(CaptionNode::close(d.props()));
        }
        nodes
    }
}

fn push_text(nodes: &mut Vec<CaptionNode>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(CaptionNode::Text(last)) = nodes.last_mut() {
        last.push_str(text);
    } else {
        nodes.push(CaptionNode::text(text));
    }
}

/// Renders nodes back to tagged text, one output line per row.
pub(crate) fn render(
    nodes: &[CaptionNode],
    blank_lines: BlankLines,
    escape: impl Fn(&str) -> String,
) -> String {
    let mut output = String::new();
    let mut line_empty = true;
    for node in nodes {
        match node {
            CaptionNode::Text(text) => {
                output.push_str(&escape(text));
                line_empty &= text.trim().is_empty();
            }
            CaptionNode::LineBreak => {
                if line_empty {
                    match blank_lines {
                        BlankLines::Pad => output.push_str("&nbsp;"),
                        BlankLines::Skip => continue,
                    }
                }
                output.push('\n');
                line_empty = true;
            }
            CaptionNode::Style { props, opening } => {
                if let Some(decoration) = Decoration::of(props) {
                    let slash = if *opening { "" } else { "/" };
                    output.push_str(&format!("<{slash}{}>", decoration.tag()));
                }
            }
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(lines: &[&str]) -> Vec<CaptionNode> {
        Markup::new().unwrap().parse(lines, str::to_string)
    }

    #[test]
    fn test_parse_decorations() {
        let nodes = parse(&["<b>Bold</b> and <i>italic</i>"]);
        assert_eq!(
            nodes,
            vec![
                CaptionNode::open(Decoration::Bold.props()),
                CaptionNode::text("Bold"),
                CaptionNode::close(Decoration::Bold.props()),
                CaptionNode::text(" and "),
                CaptionNode::open(StyleProps::italic()),
                CaptionNode::text("italic"),
                CaptionNode::close(StyleProps::italic()),
            ]
        );
    }

    #[test]
    fn test_other_tags_stripped() {
        let nodes = parse(&["<font color=\"#FF0000\">Red</font> <v Bob>text</v>"]);
        assert_eq!(nodes, vec![CaptionNode::text("Red text")]);
    }

    #[test]
    fn test_unclosed_tags_are_closed() {
        let nodes = parse(&["<i>one", "two"]);
        assert_eq!(
            nodes,
            vec![
                CaptionNode::open(StyleProps::italic()),
                CaptionNode::text("one"),
                CaptionNode::LineBreak,
                CaptionNode::text("two"),
                CaptionNode::close(StyleProps::italic()),
            ]
        );
    }

    #[test]
    fn test_overlapping_tags_stay_balanced() {
        let nodes = parse(&["<i>a<b>b</i>c</b>"]);
        let depth = nodes.iter().fold(0i32, |depth, node| match node {
            CaptionNode::Style { opening: true, .. } => depth + 1,
            CaptionNode::Style { opening: false, .. } => depth - 1,
            _ => depth,
        });
        assert_eq!(depth, 0);
    }

    #[test]
    fn test_render() {
        let nodes = parse(&["<i>Hello</i>", "world"]);
        assert_eq!(
            render(&nodes, BlankLines::Skip, str::to_string),
            "<i>Hello</i>\nworld"
        );
    }

    #[test]
    fn test_render_blank_lines() {
        let nodes = vec![
            CaptionNode::LineBreak,
            CaptionNode::text("a"),
            CaptionNode::LineBreak,
            CaptionNode::LineBreak,
            CaptionNode::text("b"),
        ];
        assert_eq!(
            render(&nodes, BlankLines::Pad, str::to_string),
            "&nbsp;\na\n&nbsp;\nb"
        );
        assert_eq!(render(&nodes, BlankLines::Skip, str::to_string), "a\nb");
    }
}
