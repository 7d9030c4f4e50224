//! Ranking of merged keyword counts

use crate::counter::FrequencyMap;
use rayon::prelude::*;
use std::cmp::Ordering;

/// Maps at least this large are sorted on the rayon pool
pub const PARALLEL_SORT_THRESHOLD: usize = 64 * 1024;

/// One keyword and its total count
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedEntry {
    pub word: String,
    pub count: u64,
}

impl RankedEntry {
    pub fn new(word: impl Into<String>, count: u64) -> Self {
        Self {
            word: word.into(),
            count,
        }
    }
}

/// Count descending, then word ascending
#[inline]
fn by_rank(a: &RankedEntry, b: &RankedEntry) -> Ordering {
    b.count.cmp(&a.count).then_with(|| a.word.cmp(&b.word))
}

/// Sort merged counts into report order
///
/// Ties on count are broken by the word itself, so the result does not
/// depend on hash iteration order.
pub fn rank(counts: FrequencyMap) -> Vec<RankedEntry> {
    let mut entries: Vec<RankedEntry> = counts
        .into_iter()
        .map(|(word, count)| RankedEntry { word, count })
        .collect();

    // Keys are unique, so an unstable sort still yields one total order.
    if entries.len() >= PARALLEL_SORT_THRESHOLD {
        entries.par_sort_unstable_by(by_rank);
    } else {
        entries.sort_unstable_by(by_rank);
    }

    entries
}

/// Sum of all counts
pub fn total_count(entries: &[RankedEntry]) -> u64 {
    entries.iter().map(|e| e.count).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counter::new_frequency_map;

    fn map(pairs: &[(&str, u64)]) -> FrequencyMap {
        let mut map = new_frequency_map();
        for (word, count) in pairs {
            map.insert(word.to_string(), *count);
        }
        map
    }

    #[test]
    fn test_rank_by_count() {
        let ranked = rank(map(&[("info", 3), ("error", 10), ("warn", 5)]));

        assert_eq!(
            ranked,
            vec![
                RankedEntry::new("error", 10),
                RankedEntry::new("warn", 5),
                RankedEntry::new("info", 3),
            ]
        );
    }

    #[test]
    fn test_ties_are_lexicographic() {
        let ranked = rank(map(&[("zeta", 2), ("alpha", 2), ("mid", 9), ("beta", 2)]));
        let words: Vec<&str> = ranked.iter().map(|e| e.word.as_str()).collect();

        assert_eq!(words, vec!["mid", "alpha", "beta", "zeta"]);
    }

    #[test]
    fn test_rank_empty() {
        assert!(rank(new_frequency_map()).is_empty());
        assert_eq!(total_count(&[]), 0);
    }

    #[test]
    fn test_parallel_sort_matches_sequential() {
        let mut counts = new_frequency_map();
        for i in 0..(PARALLEL_SORT_THRESHOLD as u64 + 100) {
            counts.insert(format!("word_{}", i), i % 37);
        }
        let expected_total: u64 = counts.values().sum();

        let ranked = rank(counts);

        assert_eq!(total_count(&ranked), expected_total);
        assert!(ranked.windows(2).all(|w| by_rank(&w[0], &w[1]) == Ordering::Less));
    }
}
