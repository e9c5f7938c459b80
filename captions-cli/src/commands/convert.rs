//! Caption conversion command.

use super::{format_from_path, read_input, source_format};
use anyhow::Context;
use captions::{ConversionBuilder, Format, SccReaderConfig, VttReaderConfig};
use clap::Args;
use console::style;
use std::path::PathBuf;
use tracing::debug;

/// Convert a caption file to another format.
#[derive(Args, Debug)]
pub struct CmdConvert {
    /// Path to the caption file.
    pub input: PathBuf,

    /// Output file path (stdout when omitted).
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Source format (scc, srt, vtt); detected when omitted.
    #[arg(long)]
    pub from: Option<Format>,

    /// Target format (scc, srt, vtt); taken from the output extension when omitted.
    #[arg(long)]
    pub to: Option<Format>,

    /// Milliseconds subtracted from every SCC timestamp.
    #[arg(long, default_value = "0")]
    pub offset: u64,

    /// Keep earlier SCC roll-up rows in each caption.
    #[arg(long)]
    pub simulate_roll_up: bool,

    /// Accept out-of-order WebVTT cues.
    #[arg(long)]
    pub ignore_timing_errors: bool,

    /// Merge captions with identical timing.
    #[arg(long)]
    pub merge: bool,

    /// Drop italic, bold and underline markup.
    #[arg(long)]
    pub strip_styling: bool,
}

impl CmdConvert {
    /// Execute the convert command.
    pub fn run(&self) -> anyhow::Result<()> {
        let content = read_input(&self.input)?;
        let from = source_format(&self.input, &content, self.from)?;
        let to = self.target_format()?;
        debug!(%from, %to, "Converting {}", self.input.display());

        let scc_config = SccReaderConfig::default()
            .with_offset(self.offset.saturating_mul(1000))
            .with_simulate_roll_up(self.simulate_roll_up);

        let vtt_config =
            VttReaderConfig::default().with_ignore_timing_errors(self.ignore_timing_errors);

        let mut builder = ConversionBuilder::new(&content)
            .from_format(from)
            .scc_config(scc_config)
            .vtt_config(vtt_config);
        if self.merge {
            builder = builder.merge_matching();
        }
        if self.strip_styling {
            builder = builder.strip_styling();
        }

        let converted = builder
            .to_format(to)
            .with_context(|| format!("Failed to convert {}", self.input.display()))?;

        match &self.output {
            Some(path) => {
                std::fs::write(path, converted)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                eprintln!(
                    "{} {} ({}) -> {} ({})",
                    style("Converted").green().bold(),
                    self.input.display(),
                    from,
                    path.display(),
                    to
                );
            }
            None => print!("{converted}"),
        }

        Ok(())
    }

    fn target_format(&self) -> anyhow::Result<Format> {
        self.to
            .or_else(|| self.output.as_deref().and_then(format_from_path))
            .context("No target format: pass --to or an output file with a known extension")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(output: Option<&str>, to: Option<Format>) -> CmdConvert {
        CmdConvert {
            input: PathBuf::from("in.scc"),
            output: output.map(PathBuf::from),
            from: None,
            to,
            offset: 0,
            simulate_roll_up: false,
            ignore_timing_errors: false,
            merge: false,
            strip_styling: false,
        }
    }

    #[test]
    fn test_target_format() {
        assert_eq!(
            command(Some("out.vtt"), None).target_format().unwrap(),
            Format::WebVtt
        );
        assert_eq!(
            command(Some("out.vtt"), Some(Format::Srt)).target_format().unwrap(),
            Format::Srt
        );
        assert!(command(None, None).target_format().is_err());
        assert!(command(Some("out.txt"), None).target_format().is_err());
    }

    #[test]
    fn test_missing_input() {
        let mut cmd = command(None, Some(Format::Srt));
        cmd.input = PathBuf::from("/nonexistent/captions.scc");
        assert!(cmd.run().is_err());
    }
}
