//! Per-chunk keyword counting

use crate::tokenizer::tokenize;
use ahash::RandomState;
use hashbrown::HashMap;

/// Keyword to occurrence count
pub type FrequencyMap = HashMap<String, u64, RandomState>;

/// Create an empty frequency map
pub fn new_frequency_map() -> FrequencyMap {
    HashMap::with_hasher(RandomState::new())
}

/// Count every keyword of a chunk into a fresh local map
///
/// Touches no shared state; the result covers exactly the given lines.
pub fn count_chunk(lines: &[String]) -> FrequencyMap {
    let mut local = new_frequency_map();

    for line in lines {
        for token in tokenize(line) {
            *local.entry(token).or_insert(0) += 1;
        }
    }

    local
}

/// Total number of tokens represented by a map
pub fn count_tokens(map: &FrequencyMap) -> u64 {
    map.values().sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(input: &[&str]) -> Vec<String> {
        input.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_count_single_line() {
        let counts = count_chunk(&lines(&["The Cat sat on the CATapult"]));

        assert_eq!(counts.len(), 4);
        assert_eq!(counts["the"], 2);
        assert_eq!(counts["cat"], 1);
        assert_eq!(counts["sat"], 1);
        assert_eq!(counts["catapult"], 1);
        assert!(!counts.contains_key("on"));
    }

    #[test]
    fn test_count_across_lines() {
        let counts = count_chunk(&lines(&[
            "ERROR disk full",
            "INFO retry",
            "error disk full again",
        ]));

        assert_eq!(counts["error"], 2);
        assert_eq!(counts["disk"], 2);
        assert_eq!(counts["full"], 2);
        assert_eq!(counts["info"], 1);
        assert_eq!(count_tokens(&counts), 9);
    }

    #[test]
    fn test_lines_without_tokens() {
        let counts = count_chunk(&lines(&["", "12:00", "a b c"]));
        assert!(counts.is_empty());
        assert_eq!(count_tokens(&counts), 0);
    }
}
