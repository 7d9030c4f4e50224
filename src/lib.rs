//! # Log Heatmap
//!
//! Parallel keyword frequency heatmap for log files.
//!
//! ## Pipeline
//!
//! - **Tokenize**: lowercase runs of at least three ASCII letters/underscores
//! - **Count**: fixed-size line chunks counted by a bounded worker pool
//! - **Merge**: per-chunk maps folded into one global map under a lock
//!   (single or hash-sharded)
//! - **Rank**: count descending, ties broken alphabetically
//! - **Render**: top-N words with proportional ASCII bars
//!
//! ## Usage
//!
//! ```bash
//! # Top 20 keywords
//! log-heatmap -file=/var/log/syslog
//!
//! # Top 5 with eight workers
//! log-heatmap -file app.log -top 5 --workers 8
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use log_heatmap::dispatcher::{Dispatcher, DispatcherConfig};
//! use log_heatmap::ranking::rank;
//! use log_heatmap::report::Report;
//! use std::path::Path;
//!
//! let dispatcher = Dispatcher::new(DispatcherConfig::default());
//! let counts = dispatcher.run(Path::new("app.log")).unwrap();
//!
//! let report = Report::new("app.log", 10, rank(counts));
//! print!("{}", report.render());
//! ```

pub mod aggregate;
pub mod cli;
pub mod counter;
pub mod dispatcher;
pub mod error;
pub mod ranking;
pub mod report;
pub mod source;
pub mod stats;
pub mod tokenizer;

pub use cli::Args;
pub use dispatcher::{Dispatcher, DispatcherConfig};
pub use error::HeatmapError;
