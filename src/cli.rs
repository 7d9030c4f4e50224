//! Command-line interface definition for log-heatmap
//!
//! Provides argument parsing for the keyword heatmap tool. Besides the usual
//! `--flag` syntax, Go-style single-dash long flags (`-file app.log`,
//! `-top=10`) are accepted; see [`normalize_flags`].

use crate::aggregate::MergeStrategy;
use crate::dispatcher::DEFAULT_CHUNK_SIZE;
use crate::report::{DEFAULT_BAR_WIDTH, DEFAULT_TOP, MAX_BAR_WIDTH};
use clap::builder::{OsStringValueParser, TypedValueParser};
use clap::Parser;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Printed to stdout when no input file is given
pub const USAGE: &str = "Usage: log-heatmap -file=your.log [-top=20]";

/// Long flags that may also be written with a single dash
const LONG_FLAGS: &[&str] = &[
    "file",
    "top",
    "chunk-size",
    "workers",
    "merge-strategy",
    "shards",
    "width",
    "progress",
    "stats",
    "quiet",
    "verbose",
    "help",
    "version",
];

/// Keyword frequency heatmap for log files
///
/// Tokenizes a log file into lowercase words, counts them in parallel and
/// prints the most frequent ones as an ASCII bar chart.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "log-heatmap",
    author = "m0h1nd4",
    version,
    about = "Keyword frequency heatmap for log files",
    long_about = r#"
Tokenize a log file into lowercase keywords (runs of at least three ASCII
letters or underscores), count them in parallel chunks and print the most
frequent ones as an ASCII bar chart.

EXAMPLES:
    # Top 20 keywords
    log-heatmap -file=/var/log/syslog

    # Top 5, four workers, sharded merge
    log-heatmap -file app.log -top 5 --workers 4 --merge-strategy sharded

    # Wider bars and a run summary on stderr
    log-heatmap --file app.log --width 60 --stats
"#
)]
pub struct Args {
    /// Log file to analyze
    // An empty value is accepted here and reported as a missing file.
    #[arg(
        short,
        long,
        value_name = "PATH",
        value_parser = OsStringValueParser::new().map(PathBuf::from)
    )]
    pub file: Option<PathBuf>,

    /// Number of keywords to show
    #[arg(short = 'n', long, value_name = "N", default_value_t = DEFAULT_TOP)]
    pub top: usize,

    /// Lines per chunk handed to a worker
    #[arg(long, value_name = "LINES", default_value_t = DEFAULT_CHUNK_SIZE)]
    pub chunk_size: usize,

    /// Number of worker threads (default: auto-detect)
    #[arg(short = 't', long, value_name = "NUM")]
    pub workers: Option<usize>,

    /// How chunk counts are merged into the global map
    #[arg(long, value_enum, default_value_t = MergeStrategy::Locked)]
    pub merge_strategy: MergeStrategy,

    /// Partitions for the sharded merge (default: 4 per worker)
    #[arg(long, value_name = "NUM")]
    pub shards: Option<usize>,

    /// Maximum bar length in glyphs
    #[arg(long, value_name = "GLYPHS", default_value_t = DEFAULT_BAR_WIDTH, value_parser = parse_width)]
    pub width: usize,

    /// Show a progress bar on stderr
    #[arg(long, default_value_t = false)]
    pub progress: bool,

    /// Print run statistics on stderr
    #[arg(long, default_value_t = false)]
    pub stats: bool,

    /// Quiet mode - errors only
    #[arg(short, long, default_value_t = false)]
    pub quiet: bool,

    /// Verbose mode - detailed logging
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl Args {
    /// Parse process arguments, accepting single-dash long flags
    pub fn parse_normalized() -> Self {
        Self::parse_from(normalize_flags(std::env::args_os()))
    }

    /// Input path, or `None` when `-file` is absent or empty
    pub fn input_path(&self) -> Option<&Path> {
        self.file.as_deref().filter(|p| !p.as_os_str().is_empty())
    }
}

fn parse_width(value: &str) -> Result<usize, String> {
    let width: usize = value.parse().map_err(|e| format!("{}", e))?;
    if width > MAX_BAR_WIDTH {
        return Err(format!("must be at most {}", MAX_BAR_WIDTH));
    }
    Ok(width)
}

/// Rewrite `-name` / `-name=value` to `--name` / `--name=value`
///
/// Only names in the known long-flag list are rewritten, so short flags and
/// clusters like `-qv` pass through untouched. Nothing after a bare `--` is
/// changed.
pub fn normalize_flags<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut passthrough = false;

    args.into_iter()
        .map(Into::into)
        .map(|arg| {
            if passthrough {
                return arg;
            }
            let Some(text) = arg.to_str() else {
                return arg;
            };
            if text == "--" {
                passthrough = true;
                return arg;
            }

            match text.strip_prefix('-') {
                Some(rest) if !rest.starts_with('-') => {
                    let name = rest.split('=').next().unwrap_or(rest);
                    if LONG_FLAGS.contains(&name) {
                        OsString::from(format!("-{}", text))
                    } else {
                        arg
                    }
                }
                _ => arg,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(normalize_flags(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let args = parse(&["log-heatmap", "--file", "app.log"]);

        assert_eq!(args.file, Some(PathBuf::from("app.log")));
        assert_eq!(args.top, 20);
        assert_eq!(args.chunk_size, 1000);
        assert_eq!(args.width, 40);
        assert_eq!(args.workers, None);
        assert_eq!(args.merge_strategy, MergeStrategy::Locked);
        assert!(!args.stats);
    }

    #[test]
    fn test_empty_file_value_means_no_input() {
        for argv in [
            &["log-heatmap", "-file="][..],
            &["log-heatmap", "--file", ""][..],
            &["log-heatmap", "-top", "5"][..],
        ] {
            let args = parse(argv);
            assert_eq!(args.input_path(), None, "{:?}", argv);
        }

        let args = parse(&["log-heatmap", "-file=app.log"]);
        assert_eq!(args.input_path(), Some(Path::new("app.log")));
    }

    #[test]
    fn test_width_is_bounded() {
        let args = parse(&["log-heatmap", "--width", "1000"]);
        assert_eq!(args.width, MAX_BAR_WIDTH);

        for width in ["1001", "18446744073709551615", "-1"] {
            let argv = normalize_flags(["log-heatmap", "--width", width]);
            assert!(Args::try_parse_from(argv).is_err(), "width {}", width);
        }
    }

    #[test]
    fn test_go_style_flags() {
        let args = parse(&["log-heatmap", "-file", "app.log", "-top", "5"]);
        assert_eq!(args.file, Some(PathBuf::from("app.log")));
        assert_eq!(args.top, 5);

        let args = parse(&["log-heatmap", "-file=/var/log/syslog", "-top=3"]);
        assert_eq!(args.file, Some(PathBuf::from("/var/log/syslog")));
        assert_eq!(args.top, 3);
    }

    #[test]
    fn test_missing_file_is_not_a_parse_error() {
        let args = parse(&["log-heatmap", "-top", "5"]);
        assert_eq!(args.file, None);
    }

    #[test]
    fn test_normalize_leaves_other_args() {
        let normalized = normalize_flags(["log-heatmap", "-qv", "-t", "4", "--", "-file"]);
        let normalized: Vec<&str> = normalized.iter().map(|s| s.to_str().unwrap()).collect();

        assert_eq!(normalized, vec!["log-heatmap", "-qv", "-t", "4", "--", "-file"]);
    }

    #[test]
    fn test_normalize_rewrites_known_flags() {
        let normalized = normalize_flags(["log-heatmap", "-file=a.log", "-chunk-size", "10", "-stats"]);
        let normalized: Vec<&str> = normalized.iter().map(|s| s.to_str().unwrap()).collect();

        assert_eq!(
            normalized,
            vec!["log-heatmap", "--file=a.log", "--chunk-size", "10", "--stats"]
        );
    }

    #[test]
    fn test_negative_top_rejected() {
        let result = Args::try_parse_from(normalize_flags(["log-heatmap", "-file", "a.log", "-top", "-1"]));
        assert!(result.is_err());
    }
}
