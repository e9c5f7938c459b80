//! Caption file inspection command.

use super::{read_input, source_format};
use captions::{CaptionSet, ConversionBuilder, Format};
use captions_timecode::format_clock;
use clap::Args;
use console::style;
use serde::Serialize;
use std::path::PathBuf;

/// Captions of one language.
#[derive(Debug, Clone, Serialize)]
pub struct LanguageInfo {
    /// Language tag.
    pub language: String,
    /// Number of captions.
    pub captions: usize,
    /// Start of the first caption.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_start: Option<String>,
    /// End of the last caption.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_end: Option<String>,
}

/// Caption file information.
#[derive(Debug, Clone, Serialize)]
pub struct CaptionInfo {
    /// File path.
    pub file: String,
    /// Caption format.
    pub format: String,
    /// Per-language summary.
    pub languages: Vec<LanguageInfo>,
}

impl CaptionInfo {
    fn new(file: String, format: Format, set: &CaptionSet) -> Self {
        let languages = set
            .languages()
            .into_iter()
            .map(|language| {
                let captions = set.captions(language);
                LanguageInfo {
                    language: language.to_string(),
                    captions: captions.len(),
                    first_start: captions.iter().map(|c| c.start).min().map(clock),
                    last_end: captions.iter().map(|c| c.end_or_start()).max().map(clock),
                }
            })
            .collect();
        Self {
            file,
            format: format.to_string(),
            languages,
        }
    }
}

fn clock(microseconds: u64) -> String {
    format_clock(microseconds, '.')
}

/// Inspect a caption file.
#[derive(Args, Debug)]
pub struct CmdInfo {
    /// Path to the caption file.
    pub file: PathBuf,

    /// Source format (scc, srt, vtt); detected when omitted.
    #[arg(long)]
    pub from: Option<Format>,

    /// Output in JSON format.
    #[arg(long)]
    pub json: bool,
}

impl CmdInfo {
    /// Execute the info command.
    pub fn run(&self) -> anyhow::Result<()> {
        let content = read_input(&self.file)?;
        let format = source_format(&self.file, &content, self.from)?;
        let set = ConversionBuilder::new(&content).from_format(format).read()?;
        let info = CaptionInfo::new(self.file.display().to_string(), format, &set);

        if self.json {
            println!("{}", serde_json::to_string_pretty(&info)?);
        } else {
            print_caption_info(&info);
        }

        Ok(())
    }
}

fn print_caption_info(info: &CaptionInfo) {
    println!();
    println!("{}", style("Caption Information").cyan().bold());
    println!();

    println!("  {:<16} {}", style("File:").white(), info.file);
    println!("  {:<16} {}", style("Format:").white(), info.format);

    for language in &info.languages {
        println!();
        println!("  {}", style(&language.language).yellow().bold());
        println!("    {:<14} {}", style("Captions:").white(), language.captions);
        if let Some(start) = &language.first_start {
            println!("    {:<14} {}", style("First start:").white(), start);
        }
        if let Some(end) = &language.last_end {
            println!("    {:<14} {}", style("Last end:").white(), end);
        }
    }
    println!();
}
