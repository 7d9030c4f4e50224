//! Heatmap report rendering
//!
//! The report is built in memory and written in a single pass:
//!
//! ```text
//!
//! Top 3 keywords in app.log:
//!
//! error           | 12    ❤︎ ❤︎ ❤︎ ...
//! timeout         | 6     ❤︎ ❤︎ ...
//! ```

use crate::ranking::RankedEntry;
use std::fmt::Write as _;
use std::io::{self, Write};

/// Glyph repeated once per bar unit
pub const BAR_GLYPH: &str = "❤︎ ";

/// Maximum bar length, in glyphs
pub const DEFAULT_BAR_WIDTH: usize = 40;

/// Upper bound for the bar length, in glyphs
pub const MAX_BAR_WIDTH: usize = 1000;

/// Default number of entries shown
pub const DEFAULT_TOP: usize = 20;

/// Minimum width of the word column
pub const WORD_COLUMN: usize = 15;

/// Minimum width of the count column
pub const COUNT_COLUMN: usize = 5;

/// Top-N keyword report
#[derive(Debug, Clone)]
pub struct Report {
    source: String,
    top: usize,
    entries: Vec<RankedEntry>,
    bar_width: usize,
}

impl Report {
    /// Build a report from ranked entries (already sorted by count)
    pub fn new(source: impl Into<String>, top: usize, entries: Vec<RankedEntry>) -> Self {
        Self {
            source: source.into(),
            top,
            entries,
            bar_width: DEFAULT_BAR_WIDTH,
        }
    }

    /// Set the maximum bar length, clamped to [`MAX_BAR_WIDTH`]
    pub fn with_bar_width(mut self, bar_width: usize) -> Self {
        self.bar_width = bar_width.min(MAX_BAR_WIDTH);
        self
    }

    /// Entries that will be printed
    pub fn entries(&self) -> &[RankedEntry] {
        &self.entries[..self.top.min(self.entries.len())]
    }

    /// Normalization denominator for bar lengths (1 when empty)
    pub fn max_count(&self) -> u64 {
        self.entries.first().map_or(1, |e| e.count.max(1))
    }

    /// Number of glyphs drawn for `count`
    pub fn bar_len(&self, count: u64) -> usize {
        let scaled = u128::from(count) * self.bar_width as u128 / u128::from(self.max_count());
        scaled as usize
    }

    /// Render the whole report
    pub fn render(&self) -> String {
        let mut out = String::new();

        // Writing into a String cannot fail.
        let _ = writeln!(out);
        let _ = writeln!(out, "Top {} keywords in {}:", self.top, self.source);
        let _ = writeln!(out);

        for entry in self.entries() {
            let _ = writeln!(
                out,
                "{:<word_w$} | {:<count_w$} {}",
                entry.word,
                entry.count,
                BAR_GLYPH.repeat(self.bar_len(entry.count)),
                word_w = WORD_COLUMN,
                count_w = COUNT_COLUMN,
            );
        }

        out
    }

    /// Write the rendered report in one call
    pub fn write_to<W: Write>(&self, mut writer: W) -> io::Result<()> {
        writer.write_all(self.render().as_bytes())?;
        writer.flush()
    }
}
