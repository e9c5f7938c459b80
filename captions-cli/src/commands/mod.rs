//! CLI subcommand implementations.

pub mod convert;
pub mod info;

pub use convert::CmdConvert;
pub use info::CmdInfo;

use anyhow::Context;
use captions::{detect_format, Format};
use std::path::Path;

/// Reads a caption file as text.
fn read_input(path: &Path) -> anyhow::Result<String> {
    if !path.exists() {
        anyhow::bail!("File not found: {}", path.display());
    }
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Picks the source format: explicit, detected from content, then from the
/// file extension.
fn source_format(path: &Path, content: &str, explicit: Option<Format>) -> anyhow::Result<Format> {
    explicit
        .or_else(|| detect_format(content))
        .or_else(|| format_from_path(path))
        .with_context(|| format!("Cannot tell the caption format of {}", path.display()))
}

fn format_from_path(path: &Path) -> Option<Format> {
    path.extension()
        .and_then(|e| e.to_str())
        .and_then(Format::from_extension)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_source_format_order() {
        let path = PathBuf::from("captions.srt");
        assert_eq!(
            source_format(&path, "WEBVTT\n", Some(Format::Scc)).unwrap(),
            Format::Scc
        );
        assert_eq!(source_format(&path, "WEBVTT\n", None).unwrap(), Format::WebVtt);
        assert_eq!(source_format(&path, "", None).unwrap(), Format::Srt);
        assert!(source_format(Path::new("captions.txt"), "", None).is_err());
    }
}
