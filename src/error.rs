//! Error types for the counting pipeline

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a heatmap run
///
/// Every variant is fatal: the run stops and no report is printed.
#[derive(Debug, Error)]
pub enum HeatmapError {
    /// The input could not be opened
    #[error("failed to open {}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The input failed while being read
    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A counting worker panicked before the merge barrier
    #[error("a counting worker panicked")]
    WorkerPanicked,

    /// All workers exited while chunks were still being dispatched
    #[error("chunk queue closed before the input was consumed")]
    QueueClosed,
}

pub type Result<T> = std::result::Result<T, HeatmapError>;
