//! Tree builder for key sequences, key text and random key sets.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use regex::Regex;
use tracing::{debug, instrument};

use crate::domain::arena::{BstArena, Key};
use crate::domain::error::{DomainError, DomainResult};

/// Constructs search trees; insertion order is preserved and shapes the tree.
pub struct TreeBuilder {
    separator_regex: Regex,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self {
            separator_regex: Regex::new(r"[,;\s]+").expect("static separator pattern"),
        }
    }

    /// Build a tree by inserting `keys` in the given order.
    #[instrument(level = "debug", skip(self, keys))]
    pub fn build_from_keys(&self, keys: &[Key]) -> BstArena {
        debug!("build_from_keys: {} keys", keys.len());
        keys.iter().copied().collect()
    }

    /// Parse keys separated by commas, semicolons or whitespace.
    ///
    /// Lines starting with `#` are comments.
    #[instrument(level = "debug", skip(self, text))]
    pub fn parse_keys(&self, text: &str) -> DomainResult<Vec<Key>> {
        let mut keys = Vec::new();
        for line in text.lines() {
            let line = line.trim();
            if line.starts_with('#') {
                continue;
            }
            for token in self.separator_regex.split(line).filter(|t| !t.is_empty()) {
                let key = token.parse::<Key>().map_err(|_| DomainError::InvalidKey {
                    token: token.to_string(),
                })?;
                keys.push(key);
            }
        }
        debug!("parse_keys: {} keys", keys.len());
        Ok(keys)
    }

    /// Build a tree from key text, see [`TreeBuilder::parse_keys`].
    pub fn build_from_str(&self, text: &str) -> DomainResult<BstArena> {
        let keys = self.parse_keys(text)?;
        Ok(self.build_from_keys(&keys))
    }

    /// `size` distinct keys drawn from `0..=size` in shuffled order.
    ///
    /// A fixed `seed` yields the same sequence on every call.
    #[instrument(level = "debug", skip(self))]
    pub fn random_keys(&self, size: usize, seed: Option<u64>) -> Vec<Key> {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut pool: Vec<Key> = (0..=size as Key).collect();
        pool.shuffle(&mut rng);
        pool.truncate(size);
        pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn given_mixed_separators_when_parsing_then_returns_keys_in_order() {
        let builder = TreeBuilder::new();
        let keys = builder.parse_keys("60, 45;70\n46   75").unwrap();
        assert_eq!(keys, vec![60, 45, 70, 46, 75]);
    }

    #[test]
    fn given_comments_and_negatives_when_parsing_then_skips_comments() {
        let builder = TreeBuilder::new();
        let keys = builder.parse_keys("# demo tree\n-3 0 3\n").unwrap();
        assert_eq!(keys, vec![-3, 0, 3]);
    }

    #[test]
    fn given_garbage_token_when_parsing_then_invalid_key() {
        let builder = TreeBuilder::new();
        let err = builder.parse_keys("60, abc").unwrap_err();
        assert_eq!(
            err,
            DomainError::InvalidKey {
                token: "abc".to_string()
            }
        );
    }

    #[test]
    fn given_empty_text_when_building_then_tree_is_empty() {
        let builder = TreeBuilder::new();
        assert!(builder.build_from_str("  \n").unwrap().is_empty());
    }

    #[test]
    fn given_size_when_generating_random_keys_then_unique_and_in_range() {
        let builder = TreeBuilder::new();
        let keys = builder.random_keys(20, None);
        let unique: HashSet<Key> = keys.iter().copied().collect();

        assert_eq!(keys.len(), 20);
        assert_eq!(unique.len(), 20);
        assert!(keys.iter().all(|k| (0..=20).contains(k)));
    }

    #[test]
    fn given_seed_when_generating_random_keys_then_deterministic() {
        let builder = TreeBuilder::new();
        assert_eq!(
            builder.random_keys(15, Some(7)),
            builder.random_keys(15, Some(7))
        );
    }
}
