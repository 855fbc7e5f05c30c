//! # Document Index Module
//!
//! ## Purpose
//! Owns the trie and hash indices, the document registry and the occurrence
//! lists, and is the only component allowed to mutate them. Funnelling every
//! insert and lookup through one facade makes trie/hash synchronization a
//! structural property instead of a calling convention.
//!
//! ## Input/Output Specification
//! - **Input**: Normalized tokens, document registrations, occurrence updates
//! - **Output**: Word references, occurrence snapshots, registry metadata
//!
//! ## Invariants (checked by the test suite)
//! - A token has a terminal trie node iff the hash index maps it to that node
//! - A word's aggregate frequency equals the sum of its occurrence entries
//! - At most one occurrence entry exists per (word, document) pair
//! - Document ids come from a monotonic counter and are never reused

use crate::config::EngineConfig;
use crate::DocumentId;
use crate::errors::{EngineError, Result};
use crate::hash_index::HashIndex;
use crate::trie::{OccurrenceEntry, Trie, Word, WordId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Registry metadata for one ingested document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentMeta {
    pub id: DocumentId,
    pub filename: String,
    pub word_count: u64,
}

/// Dual trie/hash index with document registry and occurrence tracking
pub struct DocumentIndex {
    trie: Trie,
    hash: HashIndex,
    documents: Vec<DocumentMeta>,
    max_documents: usize,
    max_vocabulary: usize,
}

impl DocumentIndex {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            trie: Trie::new(),
            hash: HashIndex::new(config.hash_initial_buckets, config.hash_max_load_factor),
            documents: Vec::new(),
            max_documents: config.max_documents,
            max_vocabulary: config.max_vocabulary,
        }
    }

    // ---- document registry ----

    /// Allocate the next document id and record the document's metadata
    pub fn register_document(&mut self, filename: &str, word_count: u64) -> Result<DocumentId> {
        if self.documents.len() >= self.max_documents {
            return Err(EngineError::CapacityExceeded {
                resource: "documents".to_string(),
                limit: self.max_documents,
            });
        }

        // Ids are positions in the registry; nothing is ever removed, so the
        // counter is monotonic and ids are never reused.
        let id = self.documents.len() as u64;
        self.documents.push(DocumentMeta {
            id,
            filename: filename.to_string(),
            word_count,
        });

        tracing::debug!(document_id = id, filename, "registered document");
        Ok(id)
    }

    /// Id the next registered document will receive
    pub fn next_document_id(&self) -> DocumentId {
        self.documents.len() as u64
    }

    pub fn document(&self, id: DocumentId) -> Option<&DocumentMeta> {
        self.documents.get(id as usize)
    }

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    pub fn distinct_word_count(&self) -> usize {
        self.trie.word_count()
    }

    // ---- token index (the single write path over trie + hash) ----

    /// Insert a token, creating the trie terminal and its hash entry together
    /// when the token is new. Idempotent on repeats.
    pub fn insert_token(&mut self, token: &str) -> Result<WordId> {
        if let Some(node) = self.hash.lookup(token) {
            return self
                .trie
                .node_word(node)
                .ok_or_else(|| crate::internal_error!("hash entry points at non-terminal node"));
        }

        if self.trie.word_count() >= self.max_vocabulary {
            return Err(EngineError::CapacityExceeded {
                resource: "vocabulary".to_string(),
                limit: self.max_vocabulary,
            });
        }

        let outcome = self.trie.insert(token);
        debug_assert!(outcome.created, "hash miss for an existing terminal");
        self.hash.register(token, outcome.node);

        Ok(outcome.word)
    }

    /// O(1) average exact lookup through the hash index
    pub fn lookup(&self, token: &str) -> Option<WordId> {
        self.hash
            .lookup(token)
            .and_then(|node| self.trie.node_word(node))
    }

    /// Trie-descent lookup; verification path for the synchronization
    /// invariant, not the primary query path
    pub fn find_exact(&self, token: &str) -> Option<WordId> {
        self.trie.find_exact(token)
    }

    pub fn word(&self, id: WordId) -> &Word {
        self.trie.word(id)
    }

    /// Read-only snapshot of a word's occurrence list
    pub fn occurrences_of(&self, id: WordId) -> &[OccurrenceEntry] {
        &self.trie.word(id).occurrences
    }

    pub fn prefix_collect(&self, prefix: &str) -> Vec<(String, u64)> {
        self.trie.prefix_collect(prefix)
    }

    pub fn full_collect(&self) -> Vec<(String, u64)> {
        self.trie.full_collect()
    }

    // ---- occurrence tracking ----

    /// Count one occurrence of a word in a document: increment the existing
    /// entry or append a new one with frequency 1, preserving first-seen
    /// order.
    pub fn record_occurrence(&mut self, word: WordId, document_id: DocumentId) {
        let word = self.trie.word_mut(word);
        word.aggregate_frequency += 1;

        match word
            .occurrences
            .iter_mut()
            .find(|entry| entry.document_id == document_id)
        {
            Some(entry) => entry.frequency += 1,
            None => word.occurrences.push(OccurrenceEntry {
                document_id,
                frequency: 1,
            }),
        }
    }

    /// Overwrite a word's frequency for one document, adjusting the aggregate
    /// by the difference. Setting 0 on an existing entry leaves it in place as
    /// a zero-frequency placeholder; setting 0 where no entry exists is a
    /// no-op.
    pub fn set_occurrence(&mut self, word: WordId, document_id: DocumentId, frequency: u64) {
        let word = self.trie.word_mut(word);

        match word
            .occurrences
            .iter_mut()
            .find(|entry| entry.document_id == document_id)
        {
            Some(entry) => {
                word.aggregate_frequency = word.aggregate_frequency - entry.frequency + frequency;
                entry.frequency = frequency;
            }
            None if frequency > 0 => {
                word.aggregate_frequency += frequency;
                word.occurrences.push(OccurrenceEntry {
                    document_id,
                    frequency,
                });
            }
            None => {}
        }
    }

    // ---- reindexing ----

    /// Recompute one document's contribution from scratch. Every word that
    /// previously had an occurrence entry for this document but is absent
    /// from `counts` is zeroed (the entry stays as a placeholder); every
    /// token in `counts` gets its entry overwritten with the fresh count.
    /// The aggregate frequencies stay consistent by construction.
    pub fn reindex_document(&mut self, document_id: DocumentId, counts: &[(String, u64)]) -> Result<()> {
        if self.document(document_id).is_none() {
            return Err(EngineError::DocumentNotFound { document_id });
        }

        let fresh_tokens: HashSet<&str> = counts.iter().map(|(t, _)| t.as_str()).collect();

        // Zero out stale contributions. No reverse document->words map is
        // kept, so this scans the vocabulary; bounded and deterministic.
        let stale: Vec<WordId> = self
            .trie
            .word_ids()
            .filter(|&id| {
                let word = self.trie.word(id);
                !fresh_tokens.contains(word.token.as_str())
                    && word
                        .occurrences
                        .iter()
                        .any(|entry| entry.document_id == document_id && entry.frequency > 0)
            })
            .collect();
        for id in stale {
            self.set_occurrence(id, document_id, 0);
        }

        let word_count: u64 = counts.iter().map(|(_, c)| c).sum();
        for (token, count) in counts {
            let id = self.insert_token(token)?;
            self.set_occurrence(id, document_id, *count);
        }

        self.documents[document_id as usize].word_count = word_count;

        tracing::debug!(document_id, word_count, "reindexed document");
        Ok(())
    }

    /// Distinct tokens in `counts` that are not yet in the vocabulary.
    /// Used for all-or-nothing capacity checks before any mutation.
    pub fn count_new_tokens(&self, counts: &[(String, u64)]) -> usize {
        counts
            .iter()
            .filter(|(token, _)| self.lookup(token).is_none())
            .count()
    }

    /// Whether adding `new_tokens` distinct words would exceed the vocabulary
    /// bound
    pub fn check_vocabulary_capacity(&self, new_tokens: usize) -> Result<()> {
        if self.trie.word_count() + new_tokens > self.max_vocabulary {
            return Err(EngineError::CapacityExceeded {
                resource: "vocabulary".to_string(),
                limit: self.max_vocabulary,
            });
        }
        Ok(())
    }
}
