//! # Hash Index Module
//!
//! ## Purpose
//! Secondary token lookup structure mapping each indexed token to its trie
//! terminal node, giving exact and frequency queries O(1) average time
//! without a character-by-character trie descent.
//!
//! ## Input/Output Specification
//! - **Input**: Normalized tokens and their terminal node ids
//! - **Output**: Terminal node id for a token, if indexed
//! - **Hash**: DJB2 over the token bytes; fixed and documented so bucket
//!   placement is reproducible across runs and in tests
//!
//! ## Key Features
//! - Open chaining by token equality within each bucket
//! - Doubling rehash once the load factor crosses the configured threshold
//!   (the table never silently saturates)
//! - Non-owning: terminal nodes belong to the trie arena

use crate::trie::NodeId;

/// DJB2 string hash: `h = h * 33 + byte`, seeded with 5381
pub fn djb2(token: &str) -> u64 {
    token
        .bytes()
        .fold(5381u64, |h, b| h.wrapping_mul(33).wrapping_add(b as u64))
}

#[derive(Debug, Clone)]
struct HashEntry {
    token: String,
    node: NodeId,
}

/// Open-chained hash table over the indexed token universe
#[derive(Debug, Clone)]
pub struct HashIndex {
    buckets: Vec<Vec<HashEntry>>,
    len: usize,
    max_load_factor: f64,
}

impl HashIndex {
    pub fn new(initial_buckets: usize, max_load_factor: f64) -> Self {
        Self {
            buckets: vec![Vec::new(); initial_buckets.max(1)],
            len: 0,
            max_load_factor,
        }
    }

    /// Number of registered tokens
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Register a token with its terminal node. Called exactly once per newly
    /// created trie terminal, immediately after that terminal is created.
    pub fn register(&mut self, token: &str, node: NodeId) {
        debug_assert!(
            self.lookup(token).is_none(),
            "token registered twice: {}",
            token
        );

        if (self.len + 1) as f64 > self.buckets.len() as f64 * self.max_load_factor {
            self.grow();
        }

        let bucket = self.bucket_of(token);
        self.buckets[bucket].push(HashEntry {
            token: token.to_string(),
            node,
        });
        self.len += 1;
    }

    /// O(1) average exact lookup
    pub fn lookup(&self, token: &str) -> Option<NodeId> {
        let bucket = self.bucket_of(token);
        self.buckets[bucket]
            .iter()
            .find(|entry| entry.token == token)
            .map(|entry| entry.node)
    }

    fn bucket_of(&self, token: &str) -> usize {
        (djb2(token) % self.buckets.len() as u64) as usize
    }

    fn grow(&mut self) {
        let new_count = self.buckets.len() * 2;
        let old_buckets = std::mem::replace(&mut self.buckets, vec![Vec::new(); new_count]);

        for entry in old_buckets.into_iter().flatten() {
            let bucket = (djb2(&entry.token) % new_count as u64) as usize;
            self.buckets[bucket].push(entry);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trie::Trie;

    #[test]
    fn djb2_matches_reference_values() {
        // h("") is the seed; h("a") = 5381 * 33 + 'a'
        assert_eq!(djb2(""), 5381);
        assert_eq!(djb2("a"), 5381 * 33 + 97);
        assert_eq!(djb2("ab"), (5381 * 33 + 97) * 33 + 98);
    }

    #[test]
    fn register_then_lookup() {
        let mut trie = Trie::new();
        let fox = trie.insert("fox");
        let dog = trie.insert("dog");

        let mut index = HashIndex::new(16, 0.75);
        index.register("fox", fox.node);
        index.register("dog", dog.node);

        assert_eq!(index.lookup("fox"), Some(fox.node));
        assert_eq!(index.lookup("dog"), Some(dog.node));
        assert_eq!(index.lookup("cat"), None);
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn chains_resolve_collisions_by_token_equality() {
        let mut trie = Trie::new();
        let a = trie.insert("alpha");
        let b = trie.insert("beta");
        let c = trie.insert("gamma");

        // A single bucket forces every token into one chain
        let mut index = HashIndex::new(1, 1000.0);
        index.register("alpha", a.node);
        index.register("beta", b.node);
        index.register("gamma", c.node);

        assert_eq!(index.lookup("alpha"), Some(a.node));
        assert_eq!(index.lookup("beta"), Some(b.node));
        assert_eq!(index.lookup("gamma"), Some(c.node));
        assert_eq!(index.bucket_count(), 1);
    }

    #[test]
    fn rehash_grows_table_and_preserves_entries() {
        let mut trie = Trie::new();
        let mut index = HashIndex::new(2, 0.75);

        let mut expected = Vec::new();
        for i in 0..64 {
            let token = format!("word{}", i);
            let outcome = trie.insert(&token);
            index.register(&token, outcome.node);
            expected.push((token, outcome.node));
        }

        assert!(index.bucket_count() > 2);
        for (token, node) in &expected {
            assert_eq!(index.lookup(token), Some(*node));
        }
        assert_eq!(index.len(), 64);
    }
}
