//! Captions CLI - Command-line interface for caption conversion.

mod commands;

use clap::{Parser, Subcommand};
use commands::{CmdConvert, CmdInfo};

/// Command-line arguments for the captions tool.
#[derive(Parser, Debug)]
#[command(name = "captions")]
#[command(version)]
#[command(about = "Convert and inspect SCC, SRT and WebVTT caption files")]
#[command(long_about = "Captions reads and writes broadcast and web caption formats.\n\n\
    EXAMPLES:\n    \
    captions convert input.scc -o output.vtt\n    \
    captions convert input.scc --to srt --offset 3600000\n    \
    captions convert input.srt -o output.scc --strip-styling\n    \
    captions info input.scc --json")]
struct Cli {
    /// Verbose output (debug logging)
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Quiet mode (no logging)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert a caption file to another format
    Convert(CmdConvert),
    /// Show what a caption file contains
    Info(CmdInfo),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so converted output can be piped
    if !cli.quiet {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(if cli.verbose {
                tracing::Level::DEBUG
            } else {
                tracing::Level::INFO
            })
            .with_target(false)
            .with_writer(std::io::stderr)
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    }

    match &cli.command {
        Command::Convert(cmd) => cmd.run(),
        Command::Info(cmd) => cmd.run(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_convert() {
        let cli = Cli::parse_from([
            "captions",
            "convert",
            "in.scc",
            "--to",
            "vtt",
            "--offset",
            "1500",
            "-v",
        ]);
        assert!(cli.verbose);
        let Command::Convert(cmd) = cli.command else {
            panic!("expected convert");
        };
        assert_eq!(cmd.to, Some(captions::Format::WebVtt));
        assert_eq!(cmd.offset, 1500);
    }

    #[test]
    fn test_unknown_format_rejected() {
        let result = Cli::try_parse_from(["captions", "convert", "in.scc", "--to", "dfxp"]);
        assert!(result.is_err());
    }
}
