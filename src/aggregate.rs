//! Merge strategies for the global frequency map
//!
//! Workers count each chunk into a private map and then fold it into a shared
//! aggregator. Two approaches are provided:
//! - Locked: a single map behind one mutex
//! - Sharded: the map is partitioned by word hash, one mutex per partition

use crate::counter::{new_frequency_map, FrequencyMap};
use ahash::RandomState;
use clap::ValueEnum;
use std::hash::BuildHasher;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// How chunk results are folded into the global map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum MergeStrategy {
    /// One map behind a single lock
    #[default]
    Locked,
    /// Hash-partitioned map with one lock per partition
    Sharded,
}

/// Trait for global frequency map implementations
pub trait Aggregator: Send + Sync {
    /// Add every count of `local` to the global map
    ///
    /// Concurrent merges never lose an increment.
    fn merge(&self, local: FrequencyMap);

    /// Number of distinct words merged so far
    fn distinct(&self) -> usize;

    /// Number of merge calls completed
    fn merges(&self) -> u64;

    /// Consume the aggregator and return the global map
    fn into_counts(self: Box<Self>) -> FrequencyMap;
}

// A poisoned map is still consistent: merges only add to entries, and a
// panicking worker is reported by the dispatcher on join.
fn lock(map: &Mutex<FrequencyMap>) -> MutexGuard<'_, FrequencyMap> {
    map.lock().unwrap_or_else(PoisonError::into_inner)
}

fn add_all(global: &mut FrequencyMap, local: impl IntoIterator<Item = (String, u64)>) {
    for (word, count) in local {
        *global.entry(word).or_insert(0) += count;
    }
}

/// Single-lock aggregator
///
/// The lock is held for the whole merge, so each merge is atomic with
/// respect to the others.
pub struct LockedAggregator {
    counts: Mutex<FrequencyMap>,
    merges: AtomicU64,
}

impl LockedAggregator {
    pub fn new() -> Self {
        Self {
            counts: Mutex::new(new_frequency_map()),
            merges: AtomicU64::new(0),
        }
    }
}

impl Default for LockedAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl Aggregator for LockedAggregator {
    fn merge(&self, local: FrequencyMap) {
        let mut counts = lock(&self.counts);
        add_all(&mut counts, local);
        drop(counts);

        self.merges.fetch_add(1, Ordering::Relaxed);
    }

    fn distinct(&self) -> usize {
        lock(&self.counts).len()
    }

    fn merges(&self) -> u64 {
        self.merges.load(Ordering::Relaxed)
    }

    fn into_counts(self: Box<Self>) -> FrequencyMap {
        let this = *self;
        this.counts.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Sharded aggregator for lower lock contention
///
/// A word always hashes to the same shard, so shards hold disjoint keys.
pub struct ShardedAggregator {
    shards: Vec<Mutex<FrequencyMap>>,
    hasher: RandomState,
    merges: AtomicU64,
}

impl ShardedAggregator {
    pub fn new(num_shards: usize) -> Self {
        let shards = (0..num_shards.max(1))
            .map(|_| Mutex::new(new_frequency_map()))
            .collect();

        Self {
            shards,
            hasher: RandomState::new(),
            merges: AtomicU64::new(0),
        }
    }

    pub fn num_shards(&self) -> usize {
        self.shards.len()
    }

    fn shard_index(&self, word: &str) -> usize {
        self.hasher.hash_one(word) as usize % self.shards.len()
    }
}

impl Aggregator for ShardedAggregator {
    fn merge(&self, local: FrequencyMap) {
        // Bucket first so every touched shard is locked exactly once.
        let mut buckets: Vec<Vec<(String, u64)>> = vec![Vec::new(); self.shards.len()];
        for (word, count) in local {
            let idx = self.shard_index(&word);
            buckets[idx].push((word, count));
        }

        for (shard, bucket) in self.shards.iter().zip(buckets) {
            if bucket.is_empty() {
                continue;
            }
            add_all(&mut lock(shard), bucket);
        }

        self.merges.fetch_add(1, Ordering::Relaxed);
    }

    fn distinct(&self) -> usize {
        self.shards.iter().map(|s| lock(s).len()).sum()
    }

    fn merges(&self) -> u64 {
        self.merges.load(Ordering::Relaxed)
    }

    fn into_counts(self: Box<Self>) -> FrequencyMap {
        let this = *self;
        let mut shards = this
            .shards
            .into_iter()
            .map(|s| s.into_inner().unwrap_or_else(PoisonError::into_inner));

        let mut counts = shards.next().unwrap_or_else(new_frequency_map);
        for shard in shards {
            counts.extend(shard);
        }
        counts
    }
}

/// Factory for creating aggregators based on configuration
pub fn create_aggregator(strategy: MergeStrategy, num_shards: usize) -> Box<dyn Aggregator> {
    match strategy {
        MergeStrategy::Locked => Box::new(LockedAggregator::new()),
        MergeStrategy::Sharded => Box::new(ShardedAggregator::new(num_shards)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counter::count_chunk;
    use std::thread;

    fn local(pairs: &[(&str, u64)]) -> FrequencyMap {
        let mut map = new_frequency_map();
        for (word, count) in pairs {
            map.insert(word.to_string(), *count);
        }
        map
    }

    #[test]
    fn test_locked_aggregator() {
        let agg = LockedAggregator::new();

        agg.merge(local(&[("error", 3), ("disk", 1)]));
        agg.merge(local(&[("error", 2), ("timeout", 4)]));

        assert_eq!(agg.distinct(), 3);
        assert_eq!(agg.merges(), 2);

        let counts = Box::new(agg).into_counts();
        assert_eq!(counts["error"], 5);
        assert_eq!(counts["disk"], 1);
        assert_eq!(counts["timeout"], 4);
    }

    #[test]
    fn test_sharded_aggregator() {
        let agg = ShardedAggregator::new(4);

        agg.merge(local(&[("error", 3), ("disk", 1), ("warn", 7)]));
        agg.merge(local(&[("error", 2), ("timeout", 4)]));

        assert_eq!(agg.num_shards(), 4);
        assert_eq!(agg.distinct(), 4);

        let counts = Box::new(agg).into_counts();
        assert_eq!(counts.len(), 4);
        assert_eq!(counts["error"], 5);
        assert_eq!(counts["warn"], 7);
    }

    #[test]
    fn test_zero_shards_clamped() {
        let agg = ShardedAggregator::new(0);
        agg.merge(local(&[("error", 1)]));

        assert_eq!(agg.num_shards(), 1);
        assert_eq!(Box::new(agg).into_counts()["error"], 1);
    }

    #[test]
    fn test_empty_aggregators() {
        for strategy in [MergeStrategy::Locked, MergeStrategy::Sharded] {
            let agg = create_aggregator(strategy, 8);
            assert_eq!(agg.distinct(), 0);
            assert!(agg.into_counts().is_empty());
        }
    }

    #[test]
    fn test_concurrent_merges_lose_nothing() {
        let chunk: Vec<String> = (0..50).map(|i| format!("error request_{} done", i % 5)).collect();

        for strategy in [MergeStrategy::Locked, MergeStrategy::Sharded] {
            let agg = create_aggregator(strategy, 16);

            thread::scope(|scope| {
                for _ in 0..8 {
                    let agg = &agg;
                    let chunk = &chunk;
                    scope.spawn(move || {
                        for _ in 0..25 {
                            agg.merge(count_chunk(chunk));
                        }
                    });
                }
            });

            assert_eq!(agg.merges(), 200);

            let counts = agg.into_counts();
            assert_eq!(counts["error"], 50 * 200);
            assert_eq!(counts["done"], 50 * 200);
            assert_eq!(counts["request_"], 50 * 200);
            assert_eq!(counts.len(), 3);
        }
    }
}
