//! Run statistics and terminal messages
//!
//! Everything here writes to stderr so stdout carries only the report.

use bytesize::ByteSize;
use colored::*;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Print an info message
pub fn print_info(text: &str) {
    eprintln!("  {} {}", "ℹ".cyan(), text);
}

/// Print a warning message
pub fn print_warning(text: &str) {
    eprintln!("  {} {}", "⚠".yellow(), text.yellow());
}

/// Print an error message
pub fn print_error(text: &str) {
    eprintln!("  {} {}", "✖".red(), text.red());
}

/// Create a bytes-based progress bar on stderr
pub fn create_bytes_progress_bar(total_bytes: u64, msg: &str) -> ProgressBar {
    let pb = ProgressBar::with_draw_target(Some(total_bytes), ProgressDrawTarget::stderr());

    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.green/dim}] {bytes}/{total_bytes} ({bytes_per_sec}) {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▓░");
    pb.set_style(style);

    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));

    pb
}

/// Counters collected while a run is in progress
#[derive(Debug)]
pub struct RunStats {
    pub lines: AtomicU64,
    pub bytes: AtomicU64,
    pub chunks: AtomicU64,
    pub tokens: AtomicU64,
    pub distinct: AtomicU64,
    pub start_time: Instant,
}

impl RunStats {
    pub fn new() -> Self {
        Self {
            lines: AtomicU64::new(0),
            bytes: AtomicU64::new(0),
            chunks: AtomicU64::new(0),
            tokens: AtomicU64::new(0),
            distinct: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn add_line(&self, bytes: u64) {
        self.lines.fetch_add(1, Ordering::Relaxed);
        self.bytes.fetch_add(bytes, Ordering::Relaxed);
    }

    pub fn add_chunk(&self) {
        self.chunks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_tokens(&self, count: u64) {
        self.tokens.fetch_add(count, Ordering::Relaxed);
    }

    pub fn set_distinct(&self, count: u64) {
        self.distinct.store(count, Ordering::Relaxed);
    }

    pub fn get_lines(&self) -> u64 {
        self.lines.load(Ordering::Relaxed)
    }

    pub fn get_bytes(&self) -> u64 {
        self.bytes.load(Ordering::Relaxed)
    }

    pub fn get_chunks(&self) -> u64 {
        self.chunks.load(Ordering::Relaxed)
    }

    pub fn get_tokens(&self) -> u64 {
        self.tokens.load(Ordering::Relaxed)
    }

    pub fn get_distinct(&self) -> u64 {
        self.distinct.load(Ordering::Relaxed)
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn lines_per_second(&self) -> f64 {
        let elapsed = self.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.get_lines() as f64 / elapsed
        } else {
            0.0
        }
    }

    /// Print final statistics
    pub fn print_summary(&self) {
        let elapsed = self.elapsed();

        eprintln!();
        eprintln!("{}", "═".repeat(60).green());
        eprintln!("{}", "                      RUN SUMMARY".green().bold());
        eprintln!("{}", "═".repeat(60).green());
        eprintln!();

        eprintln!("  {} {}", "Lines read:     ".green(), format_number(self.get_lines()));
        eprintln!("  {} {}", "Data read:      ".green(), ByteSize(self.get_bytes()));
        eprintln!("  {} {}", "Chunks:         ".green(), format_number(self.get_chunks()));
        eprintln!("  {} {}", "Tokens counted: ".green(), format_number(self.get_tokens()));
        eprintln!(
            "  {} {}",
            "Distinct words: ".green().bold(),
            format_number(self.get_distinct()).green().bold()
        );

        eprintln!();
        eprintln!("  {} {}", "Duration:       ".green(), format_duration(elapsed));
        eprintln!("  {} {:.2} lines/sec", "Throughput:     ".green(), self.lines_per_second());
        eprintln!("{}", "═".repeat(60).green());
    }
}

impl Default for RunStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Format a number with thousand separators
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);

    for (i, c) in s.chars().enumerate() {
        if i > 0 && (s.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }

    result
}

/// Format duration as human-readable string
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();

    if secs < 60 {
        format!("{:.1}s", duration.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(123), "123");
        assert_eq!(format_number(1234), "1,234");
        assert_eq!(format_number(1234567), "1,234,567");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_secs(30)), "30.0s");
        assert_eq!(format_duration(Duration::from_secs(90)), "1m 30s");
        assert_eq!(format_duration(Duration::from_secs(3661)), "1h 1m");
    }

    #[test]
    fn test_stats() {
        let stats = RunStats::new();

        stats.add_line(10);
        stats.add_line(5);
        stats.add_chunk();
        stats.add_tokens(7);
        stats.set_distinct(3);

        assert_eq!(stats.get_lines(), 2);
        assert_eq!(stats.get_bytes(), 15);
        assert_eq!(stats.get_chunks(), 1);
        assert_eq!(stats.get_tokens(), 7);
        assert_eq!(stats.get_distinct(), 3);
    }
}
