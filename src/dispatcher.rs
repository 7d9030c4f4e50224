//! Chunked parallel counting
//!
//! The calling thread reads the input line by line and cuts it into chunks of
//! `chunk_size` lines. Chunks go through a bounded queue to a fixed pool of
//! worker threads; each worker counts a chunk locally and merges the result
//! into the shared aggregator. All workers are joined before the merged
//! counts are handed back.

use crate::aggregate::{create_aggregator, Aggregator, MergeStrategy};
use crate::cli::Args;
use crate::counter::{count_chunk, count_tokens, FrequencyMap};
use crate::error::{HeatmapError, Result};
use crate::source::LineSource;
use crate::stats::{create_bytes_progress_bar, RunStats};

use crossbeam_channel::{Receiver, Sender};
use indicatif::ProgressBar;
use log::{debug, info, trace};
use std::io::BufRead;
use std::path::Path;
use std::sync::Arc;
use std::thread;

/// Default number of lines per chunk
pub const DEFAULT_CHUNK_SIZE: usize = 1000;

/// Upper bound on lines preallocated per chunk buffer
const MAX_PREALLOC_LINES: usize = 64 * 1024;

/// Upper bound on worker threads
pub const MAX_WORKERS: usize = 1024;

/// Upper bound on partitions of the sharded merge
pub const MAX_SHARDS: usize = 64 * 1024;

/// A batch of consecutive input lines
#[derive(Debug, Clone)]
pub struct Chunk {
    /// Position of the chunk in the input, starting at 0
    pub index: usize,
    pub lines: Vec<String>,
}

/// Dispatcher configuration
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    pub chunk_size: usize,
    pub workers: usize,
    pub queue_depth: usize,
    pub merge_strategy: MergeStrategy,
    pub shards: usize,
    pub progress: bool,
}

impl DispatcherConfig {
    pub fn from_args(args: &Args) -> anyhow::Result<Self> {
        if args.chunk_size == 0 {
            anyhow::bail!("Chunk size must be at least 1 line");
        }

        let workers = args.workers.unwrap_or_else(num_cpus::get);
        if workers == 0 {
            anyhow::bail!("Worker count must be at least 1");
        }
        if workers > MAX_WORKERS {
            anyhow::bail!("Worker count must be at most {}", MAX_WORKERS);
        }

        let shards = args.shards.unwrap_or(workers.saturating_mul(4));
        if shards == 0 {
            anyhow::bail!("Shard count must be at least 1");
        }
        if shards > MAX_SHARDS {
            anyhow::bail!("Shard count must be at most {}", MAX_SHARDS);
        }

        Ok(Self {
            chunk_size: args.chunk_size,
            workers,
            queue_depth: workers.saturating_mul(2),
            merge_strategy: args.merge_strategy,
            shards,
            progress: args.progress && !args.quiet,
        })
    }
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        let workers = num_cpus::get().clamp(1, MAX_WORKERS);
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            workers,
            queue_depth: workers.saturating_mul(2),
            merge_strategy: MergeStrategy::default(),
            shards: workers.saturating_mul(4),
            progress: false,
        }
    }
}

/// Drives read → chunk → count → merge for one input
pub struct Dispatcher {
    config: DispatcherConfig,
    stats: Arc<RunStats>,
}

impl Dispatcher {
    pub fn new(config: DispatcherConfig) -> Self {
        Self {
            config,
            stats: Arc::new(RunStats::new()),
        }
    }

    /// Count keywords of a log file
    ///
    /// Fails before any counting if the file cannot be opened.
    pub fn run(&self, path: &Path) -> Result<FrequencyMap> {
        let source = LineSource::open(path)?;
        self.count(source)
    }

    /// Count keywords of any line source
    pub fn count<R: BufRead>(&self, mut source: LineSource<R>) -> Result<FrequencyMap> {
        let config = &self.config;

        info!(
            "Counting keywords in {} ({} workers, {} lines per chunk, {:?} merge)",
            source.label().display(),
            config.workers,
            config.chunk_size,
            config.merge_strategy,
        );
        let aggregator = create_aggregator(config.merge_strategy, config.shards);

        let pb = match source.len_hint() {
            Some(total) if config.progress => create_bytes_progress_bar(total, "Counting..."),
            _ => ProgressBar::hidden(),
        };

        let (sender, receiver) = crossbeam_channel::bounded::<Chunk>(config.queue_depth.max(1));

        let fed = thread::scope(|scope| {
            let workers: Vec<_> = (0..config.workers.max(1))
                .map(|id| {
                    let receiver = receiver.clone();
                    let aggregator = aggregator.as_ref();
                    let stats = self.stats.as_ref();
                    scope.spawn(move || run_worker(id, receiver, aggregator, stats))
                })
                .collect();
            drop(receiver);

            let fed = self.feed(&mut source, &sender, &pb);

            // Closing the queue lets workers drain and exit; joining them all
            // is the merge barrier.
            drop(sender);
            let mut panicked = false;
            for handle in workers {
                panicked |= handle.join().is_err();
            }

            if panicked {
                return Err(HeatmapError::WorkerPanicked);
            }
            fed
        });

        pb.finish_and_clear();
        fed?;

        debug!("{} merges completed", aggregator.merges());

        let counts = aggregator.into_counts();
        self.stats.set_distinct(counts.len() as u64);

        info!(
            "Counted {} tokens ({} distinct) in {} lines",
            self.stats.get_tokens(),
            counts.len(),
            self.stats.get_lines(),
        );

        Ok(counts)
    }

    /// Read every line and send it downstream in chunks
    fn feed<R: BufRead>(
        &self,
        source: &mut LineSource<R>,
        sender: &Sender<Chunk>,
        pb: &ProgressBar,
    ) -> Result<()> {
        let chunk_size = self.config.chunk_size.max(1);
        let capacity = chunk_size.min(MAX_PREALLOC_LINES);

        let mut index = 0;
        let mut lines = Vec::with_capacity(capacity);
        let mut consumed = 0;

        while let Some(line) = source.next() {
            let line = line?;

            let read = source.bytes_read();
            self.stats.add_line(read - consumed);
            consumed = read;
            pb.set_position(read);

            lines.push(line);
            if lines.len() == chunk_size {
                let full = std::mem::replace(&mut lines, Vec::with_capacity(capacity));
                self.dispatch(sender, Chunk { index, lines: full })?;
                index += 1;
            }
        }

        // The trailing partial chunk is dispatched too.
        if !lines.is_empty() {
            self.dispatch(sender, Chunk { index, lines })?;
        }

        Ok(())
    }

    fn dispatch(&self, sender: &Sender<Chunk>, chunk: Chunk) -> Result<()> {
        trace!("Dispatching chunk {} ({} lines)", chunk.index, chunk.lines.len());
        self.stats.add_chunk();
        sender.send(chunk).map_err(|_| HeatmapError::QueueClosed)
    }

    /// Configuration this dispatcher runs with
    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    /// Get run statistics
    pub fn stats(&self) -> Arc<RunStats> {
        Arc::clone(&self.stats)
    }
}

fn run_worker(id: usize, chunks: Receiver<Chunk>, aggregator: &dyn Aggregator, stats: &RunStats) {
    debug!("Worker {} started", id);
    let mut processed = 0u64;

    for chunk in chunks.iter() {
        let local = count_chunk(&chunk.lines);
        stats.add_tokens(count_tokens(&local));

        trace!("Worker {} merging chunk {} ({} distinct)", id, chunk.index, local.len());
        aggregator.merge(local);
        processed += 1;
    }

    debug!("Worker {} finished after {} chunks", id, processed);
}
