//! # Trie Index Module
//!
//! ## Purpose
//! Implements the character-path prefix tree at the core of the search engine.
//! Each distinct indexed word terminates at a node owning a `Word` payload
//! with its occurrence list and aggregate frequency.
//!
//! ## Input/Output Specification
//! - **Input**: Normalized word tokens
//! - **Output**: Terminal word references, ordered prefix enumerations
//! - **Performance**: O(m) insert/lookup where m = token length
//!
//! ## Key Features
//! - Arena-backed node store addressed by integer ids: the arena owns every
//!   node, traversal and teardown are iteration over a contiguous store, and
//!   no recursion happens at any depth
//! - Deterministic depth-first prefix enumeration in lexicographic child order
//! - Replace-driven reindexing never removes nodes; a word zeroed out by a
//!   reindex stays as a zero-frequency terminal

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Arena index of a trie node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(u32);

/// Arena index of a word payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WordId(u32);

/// Per-document frequency of one word
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccurrenceEntry {
    pub document_id: u64,
    pub frequency: u64,
}

/// Payload of a terminal node: one distinct indexed token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Word {
    /// Normalized token, unique across the index
    pub token: String,
    /// Sum of the occurrence entries' frequencies
    pub aggregate_frequency: u64,
    /// Per-document frequencies in first-seen-document order
    pub occurrences: Vec<OccurrenceEntry>,
}

/// Trie node: children keyed by character, optional terminal payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct TrieNode {
    children: HashMap<char, NodeId>,
    word: Option<WordId>,
}

/// Arena-backed trie owning all nodes and word payloads
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trie {
    nodes: Vec<TrieNode>,
    words: Vec<Word>,
}

/// Result of a trie insertion
#[derive(Debug, Clone, Copy)]
pub struct InsertOutcome {
    pub node: NodeId,
    pub word: WordId,
    /// Whether this insert created the terminal (first time the token is seen)
    pub created: bool,
}

const ROOT: NodeId = NodeId(0);

impl Trie {
    pub fn new() -> Self {
        Self {
            nodes: vec![TrieNode::default()],
            words: Vec::new(),
        }
    }

    /// Number of distinct words (terminals) in the trie
    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    /// Number of allocated nodes, root included
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn word(&self, id: WordId) -> &Word {
        &self.words[id.0 as usize]
    }

    pub fn word_mut(&mut self, id: WordId) -> &mut Word {
        &mut self.words[id.0 as usize]
    }

    /// Iterate every word id ever created
    pub fn word_ids(&self) -> impl Iterator<Item = WordId> {
        (0..self.words.len() as u32).map(WordId)
    }

    /// Descend or create one node per character and mark the final node
    /// terminal. Idempotent: repeated inserts of the same token return the
    /// existing word.
    pub fn insert(&mut self, token: &str) -> InsertOutcome {
        let mut current = ROOT;

        for ch in token.chars() {
            let existing = self.nodes[current.0 as usize].children.get(&ch).copied();
            current = match existing {
                Some(child) => child,
                None => {
                    let child = NodeId(self.nodes.len() as u32);
                    self.nodes.push(TrieNode::default());
                    self.nodes[current.0 as usize].children.insert(ch, child);
                    child
                }
            };
        }

        match self.nodes[current.0 as usize].word {
            Some(word) => InsertOutcome {
                node: current,
                word,
                created: false,
            },
            None => {
                let word = WordId(self.words.len() as u32);
                self.words.push(Word {
                    token: token.to_string(),
                    aggregate_frequency: 0,
                    occurrences: Vec::new(),
                });
                self.nodes[current.0 as usize].word = Some(word);
                InsertOutcome {
                    node: current,
                    word,
                    created: true,
                }
            }
        }
    }

    /// Pure descent without mutation. Verification path; exact queries go
    /// through the hash index instead.
    pub fn find_exact(&self, token: &str) -> Option<WordId> {
        self.descend(token)
            .and_then(|node| self.nodes[node.0 as usize].word)
    }

    /// Word payload of a terminal node, if the node is terminal
    pub fn node_word(&self, node: NodeId) -> Option<WordId> {
        self.nodes[node.0 as usize].word
    }

    /// Collect every terminal under `prefix` as (token, aggregate_frequency),
    /// in lexicographic token order. A prefix with no matching path yields an
    /// empty sequence; the empty prefix enumerates the entire vocabulary.
    pub fn prefix_collect(&self, prefix: &str) -> Vec<(String, u64)> {
        let mut results = Vec::new();
        let Some(start) = self.descend(prefix) else {
            return results;
        };

        // Preorder DFS with an explicit stack; children pushed in reverse
        // lexicographic order so the smallest pops first.
        let mut stack = vec![start];
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id.0 as usize];

            if let Some(word_id) = node.word {
                let word = &self.words[word_id.0 as usize];
                results.push((word.token.clone(), word.aggregate_frequency));
            }

            let mut children: Vec<(char, NodeId)> =
                node.children.iter().map(|(c, n)| (*c, *n)).collect();
            children.sort_by(|a, b| b.0.cmp(&a.0));
            stack.extend(children.into_iter().map(|(_, n)| n));
        }

        results
    }

    /// Enumerate the whole vocabulary; equivalent to `prefix_collect("")`
    pub fn full_collect(&self) -> Vec<(String, u64)> {
        self.prefix_collect("")
    }

    fn descend(&self, path: &str) -> Option<NodeId> {
        let mut current = ROOT;
        for ch in path.chars() {
            current = *self.nodes[current.0 as usize].children.get(&ch)?;
        }
        Some(current)
    }
}

impl Default for Trie {
    fn default() -> Self {
        Self::new()
    }
}
