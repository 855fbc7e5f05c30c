//! # Search Engine Module
//!
//! ## Purpose
//! Composes the tokenizer, document index and storage manager into the query
//! engine: ingestion, frequency/keyword/prefix/multi-keyword/top-K queries,
//! and replace-and-reindex.
//!
//! ## Input/Output Specification
//! - **Input**: Document content, query words and prefixes, replace commands
//! - **Output**: Deterministically ranked results joined with registry
//!   metadata
//! - **Ranking**: Frequency sums only; ties broken by document id or token
//!   order so results are reproducible
//!
//! ## Concurrency
//! The index lives behind a single `RwLock`: ingestion and replace/reindex
//! take the write lock (single writer), queries share the read lock. Failed
//! validation or persistence leaves the in-memory index untouched.

use crate::config::Config;
use crate::errors::{EngineError, Result};
use crate::index::DocumentIndex;
use crate::storage::{DocumentRecord, StorageManager};
use crate::text_processing::{replace_standalone, Tokenizer};
use crate::DocumentId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Main search engine
pub struct SearchEngine {
    config: Arc<Config>,
    tokenizer: Tokenizer,
    index: RwLock<DocumentIndex>,
    storage: Arc<StorageManager>,
}

/// Outcome of document ingestion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexedDocument {
    pub document_id: DocumentId,
    pub word_count: u64,
}

/// Per-document frequency row joined with the registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentFrequency {
    pub document_id: DocumentId,
    pub filename: String,
    pub frequency: u64,
}

/// Aggregate and per-document frequencies of one word
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordFrequency {
    pub word: String,
    pub total_frequency: u64,
    pub documents: Vec<DocumentFrequency>,
}

/// One (token, aggregate frequency) row from prefix or top-K enumeration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedWord {
    pub word: String,
    pub frequency: u64,
}

/// Scored document from conjunctive multi-keyword search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentScore {
    pub document_id: DocumentId,
    pub filename: String,
    pub score: u64,
}

/// Top-K extraction result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopWords {
    pub total_unique_words: usize,
    pub words: Vec<RankedWord>,
}

/// Outcome of a replace command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplaceOutcome {
    pub modified_text: String,
    pub occurrences_replaced: usize,
    pub file_saved: bool,
}

/// Engine statistics for the dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineStats {
    pub document_count: usize,
    pub distinct_word_count: usize,
}

impl SearchEngine {
    /// Create the engine and rebuild the in-memory index from persisted
    /// documents.
    pub async fn new(config: Arc<Config>, storage: Arc<StorageManager>) -> Result<Self> {
        let tokenizer = Tokenizer::new(&config.text_processing);
        let index = RwLock::new(DocumentIndex::new(&config.engine));

        let engine = Self {
            config,
            tokenizer,
            index,
            storage,
        };

        engine.replay_persisted_documents().await?;
        Ok(engine)
    }

    /// Replay the persisted corpus in id order so document ids survive a
    /// restart.
    async fn replay_persisted_documents(&self) -> Result<()> {
        let documents = self.storage.load_all().await?;
        if documents.is_empty() {
            return Ok(());
        }

        let mut index = self.index.write().await;
        for (record, text) in documents {
            if index.next_document_id() != record.id {
                return Err(crate::internal_error!(
                    "persisted document ids are not contiguous at {}",
                    record.id
                ));
            }

            let tokens = self.tokenizer.tokenize(&text);
            let document_id = index.register_document(&record.filename, tokens.len() as u64)?;
            for token in &tokens {
                let word = index.insert_token(token)?;
                index.record_occurrence(word, document_id);
            }
        }

        tracing::info!(
            documents = index.document_count(),
            words = index.distinct_word_count(),
            "rebuilt index from storage"
        );
        Ok(())
    }

    /// Ingest one document: tokenize, enforce capacity bounds, persist, then
    /// update the index. All-or-nothing: a failed check or a failed write
    /// leaves the index unchanged.
    pub async fn index_document(&self, filename: &str, content: &str) -> Result<IndexedDocument> {
        if filename.trim().is_empty() {
            return Err(crate::invalid_input!("filename", "must not be empty"));
        }

        let limits = &self.config.engine;
        if content.len() > limits.max_document_bytes {
            return Err(EngineError::CapacityExceeded {
                resource: "document size".to_string(),
                limit: limits.max_document_bytes,
            });
        }
        if self.tokenizer.longest_token_len(content) > limits.max_token_length {
            return Err(EngineError::CapacityExceeded {
                resource: "token length".to_string(),
                limit: limits.max_token_length,
            });
        }

        let counts = self.tokenizer.token_counts(content);
        let word_count: u64 = counts.iter().map(|(_, c)| c).sum();

        let mut index = self.index.write().await;
        index.check_vocabulary_capacity(index.count_new_tokens(&counts))?;
        if index.document_count() >= limits.max_documents {
            return Err(EngineError::CapacityExceeded {
                resource: "documents".to_string(),
                limit: limits.max_documents,
            });
        }

        // Persist before touching the index so a storage failure cannot leave
        // the index referencing an unsaved document.
        let document_id = index.next_document_id();
        let record = DocumentRecord {
            id: document_id,
            filename: filename.to_string(),
            word_count,
            ingested_at: chrono::Utc::now(),
        };
        self.storage.store_document(&record, content).await?;

        let registered = index.register_document(filename, word_count)?;
        debug_assert_eq!(registered, document_id);
        for (token, count) in &counts {
            let word = index.insert_token(token)?;
            for _ in 0..*count {
                index.record_occurrence(word, document_id);
            }
        }

        tracing::info!(document_id, filename, word_count, "indexed document");
        Ok(IndexedDocument {
            document_id,
            word_count,
        })
    }

    /// Aggregate and per-document frequency of one word. `None` means the
    /// word was never indexed; a normal outcome, not an error.
    pub async fn word_frequency(&self, word: &str) -> Result<Option<WordFrequency>> {
        let token = self.normalized_query_word(word)?;
        let Some(token) = token else {
            return Ok(None);
        };

        let index = self.index.read().await;
        let Some(word_id) = index.lookup(&token) else {
            return Ok(None);
        };

        let word = index.word(word_id);
        let documents = join_occurrences(&index, word_id);

        Ok(Some(WordFrequency {
            word: word.token.clone(),
            total_frequency: word.aggregate_frequency,
            documents,
        }))
    }

    /// Same data as `word_frequency`, ranked by per-document frequency
    /// descending with document-id ascending tie-break.
    pub async fn keyword_search(&self, keyword: &str) -> Result<Option<WordFrequency>> {
        let mut result = self.word_frequency(keyword).await?;
        if let Some(freq) = result.as_mut() {
            freq.documents.sort_by(|a, b| {
                b.frequency
                    .cmp(&a.frequency)
                    .then_with(|| a.document_id.cmp(&b.document_id))
            });
        }
        Ok(result)
    }

    /// Every indexed word starting with `prefix`, in lexicographic order.
    /// An empty result is a normal outcome; an empty prefix enumerates the
    /// whole vocabulary.
    pub async fn prefix_search(&self, prefix: &str) -> Result<Vec<RankedWord>> {
        let normalized = self.tokenizer.normalize(prefix).to_ascii_lowercase();

        let index = self.index.read().await;
        Ok(index
            .prefix_collect(normalized.trim())
            .into_iter()
            .map(|(word, frequency)| RankedWord { word, frequency })
            .collect())
    }

    /// Conjunctive search: documents containing every query word, scored by
    /// the sum of per-word frequencies, ranked score descending with
    /// document-id ascending tie-break. Any absent word yields an empty
    /// result (vacuously empty intersection), not an error.
    pub async fn multi_keyword_search(&self, words: &[String]) -> Result<Vec<DocumentScore>> {
        if words.is_empty() {
            return Err(crate::invalid_input!(
                "words",
                "at least one keyword is required"
            ));
        }

        let index = self.index.read().await;

        let mut scores: Option<HashMap<u64, u64>> = None;
        for word in words {
            let Some(token) = self.tokenizer.normalize_query_word(word) else {
                return Ok(Vec::new());
            };
            let Some(word_id) = index.lookup(&token) else {
                return Ok(Vec::new());
            };

            // Zero-frequency placeholders do not count as containment
            let frequencies: HashMap<u64, u64> = index
                .occurrences_of(word_id)
                .iter()
                .filter(|entry| entry.frequency > 0)
                .map(|entry| (entry.document_id, entry.frequency))
                .collect();

            scores = Some(match scores {
                None => frequencies,
                Some(mut acc) => {
                    acc.retain(|document_id, _| frequencies.contains_key(document_id));
                    for (document_id, score) in acc.iter_mut() {
                        *score += frequencies[document_id];
                    }
                    acc
                }
            });
        }

        let mut results: Vec<DocumentScore> = scores
            .unwrap_or_default()
            .into_iter()
            .filter_map(|(document_id, score)| {
                index.document(document_id).map(|meta| DocumentScore {
                    document_id,
                    filename: meta.filename.clone(),
                    score,
                })
            })
            .collect();

        results.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then_with(|| a.document_id.cmp(&b.document_id))
        });
        Ok(results)
    }

    /// The K most frequent words, frequency descending with lexicographic
    /// ascending tie-break. Returning fewer than K is not an error.
    pub async fn top_k(&self, k: usize) -> Result<TopWords> {
        if k == 0 {
            return Err(crate::invalid_input!("k", "must be greater than zero"));
        }

        let index = self.index.read().await;
        let mut words: Vec<RankedWord> = index
            .full_collect()
            .into_iter()
            .map(|(word, frequency)| RankedWord { word, frequency })
            .collect();

        let total_unique_words = words.len();
        words.sort_by(|a, b| {
            b.frequency
                .cmp(&a.frequency)
                .then_with(|| a.word.cmp(&b.word))
        });
        words.truncate(k);

        Ok(TopWords {
            total_unique_words,
            words,
        })
    }

    /// Replace every standalone occurrence of `find` with `replace` in
    /// `content`. With a document id, the modified text is persisted and that
    /// document reindexed under the same capacity bounds as ingestion;
    /// otherwise the substitution is a pure text operation. Zero replacements
    /// is a valid outcome.
    pub async fn replace_word(
        &self,
        find: &str,
        replace: &str,
        content: &str,
        document_id: Option<DocumentId>,
    ) -> Result<ReplaceOutcome> {
        if find.trim().is_empty() {
            return Err(crate::invalid_input!("find", "must not be empty"));
        }

        let (modified_text, occurrences_replaced) = replace_standalone(content, find, replace);

        let Some(document_id) = document_id else {
            return Ok(ReplaceOutcome {
                modified_text,
                occurrences_replaced,
                file_saved: false,
            });
        };

        // The modified text goes through the same bounds as ingestion; a
        // replacement must not smuggle in what the index command rejects.
        let limits = &self.config.engine;
        if modified_text.len() > limits.max_document_bytes {
            return Err(EngineError::CapacityExceeded {
                resource: "document size".to_string(),
                limit: limits.max_document_bytes,
            });
        }
        if self.tokenizer.longest_token_len(&modified_text) > limits.max_token_length {
            return Err(EngineError::CapacityExceeded {
                resource: "token length".to_string(),
                limit: limits.max_token_length,
            });
        }

        let counts = self.tokenizer.token_counts(&modified_text);
        let word_count: u64 = counts.iter().map(|(_, c)| c).sum();

        let mut index = self.index.write().await;
        let record = match index.document(document_id) {
            Some(meta) => DocumentRecord {
                id: document_id,
                filename: meta.filename.clone(),
                word_count,
                ingested_at: chrono::Utc::now(),
            },
            None => return Err(EngineError::DocumentNotFound { document_id }),
        };
        index.check_vocabulary_capacity(index.count_new_tokens(&counts))?;

        // Persist first; a failed write leaves the index describing the old
        // text, which is still the text in storage.
        self.storage.store_document(&record, &modified_text).await?;
        index.reindex_document(document_id, &counts)?;

        tracing::info!(
            document_id,
            occurrences_replaced,
            "replaced word and reindexed"
        );
        Ok(ReplaceOutcome {
            modified_text,
            occurrences_replaced,
            file_saved: true,
        })
    }

    /// Dashboard statistics
    pub async fn stats(&self) -> EngineStats {
        let index = self.index.read().await;
        EngineStats {
            document_count: index.document_count(),
            distinct_word_count: index.distinct_word_count(),
        }
    }

    /// Health check: storage round trip plus an index read
    pub async fn health_check(&self) -> Result<()> {
        self.storage.health_check().await?;
        let _ = self.index.read().await;
        Ok(())
    }

    fn normalized_query_word(&self, word: &str) -> Result<Option<String>> {
        if word.trim().is_empty() {
            return Err(crate::invalid_input!("word", "must not be empty"));
        }
        Ok(self.tokenizer.normalize_query_word(word))
    }
}

/// Join a word's non-zero occurrence entries with the document registry,
/// preserving first-seen-document order.
fn join_occurrences(index: &DocumentIndex, word_id: crate::trie::WordId) -> Vec<DocumentFrequency> {
    index
        .occurrences_of(word_id)
        .iter()
        .filter(|entry| entry.frequency > 0)
        .filter_map(|entry| {
            index.document(entry.document_id).map(|meta| DocumentFrequency {
                document_id: entry.document_id,
                filename: meta.filename.clone(),
                frequency: entry.frequency,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use std::path::PathBuf;

    async fn test_engine(dir: &tempfile::TempDir) -> SearchEngine {
        test_engine_with(dir, Config::default()).await
    }

    async fn test_engine_with(dir: &tempfile::TempDir, mut config: Config) -> SearchEngine {
        config.storage.db_path = PathBuf::from(dir.path()).join("db");
        let config = Arc::new(config);
        let storage = Arc::new(StorageManager::new(config.storage.clone()).await.unwrap());
        SearchEngine::new(config, storage).await.unwrap()
    }

    #[tokio::test]
    async fn frequency_totals_match_token_multiset() {
        let dir = tempfile::tempdir().unwrap();
        let engine = test_engine(&dir).await;

        engine
            .index_document("a.txt", "the quick fox jumps over the lazy fox")
            .await
            .unwrap();
        engine.index_document("b.txt", "a fox in a den").await.unwrap();

        let fox = engine.word_frequency("fox").await.unwrap().unwrap();
        assert_eq!(fox.total_frequency, 3);
        assert_eq!(fox.documents.len(), 2);
        assert_eq!(fox.documents[0].frequency, 2);
        assert_eq!(fox.documents[1].frequency, 1);

        let the = engine.word_frequency("the").await.unwrap().unwrap();
        assert_eq!(the.total_frequency, 2);

        assert!(engine.word_frequency("wolf").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn quick_fox_scenario() {
        let dir = tempfile::tempdir().unwrap();
        let engine = test_engine(&dir).await;
        engine
            .index_document("fox.txt", "the quick fox jumps over the lazy fox")
            .await
            .unwrap();

        let fox = engine.word_frequency("fox").await.unwrap().unwrap();
        assert_eq!(fox.total_frequency, 2);

        let qu = engine.prefix_search("qu").await.unwrap();
        assert_eq!(
            qu,
            vec![RankedWord {
                word: "quick".to_string(),
                frequency: 1
            }]
        );

        // "fox" and "the" both occur twice; lexicographic tie-break picks "fox"
        let top = engine.top_k(1).await.unwrap();
        assert_eq!(
            top.words,
            vec![RankedWord {
                word: "fox".to_string(),
                frequency: 2
            }]
        );
        assert_eq!(top.total_unique_words, 6);
    }

    #[tokio::test]
    async fn keyword_search_ranks_documents_by_frequency() {
        let dir = tempfile::tempdir().unwrap();
        let engine = test_engine(&dir).await;

        engine.index_document("a.txt", "fox").await.unwrap();
        engine.index_document("b.txt", "fox fox fox").await.unwrap();
        engine.index_document("c.txt", "fox").await.unwrap();

        let result = engine.keyword_search("fox").await.unwrap().unwrap();
        let ranked: Vec<(u64, u64)> = result
            .documents
            .iter()
            .map(|d| (d.document_id, d.frequency))
            .collect();
        // Highest frequency first, ties by ascending document id
        assert_eq!(ranked, vec![(1, 3), (0, 1), (2, 1)]);
    }

    #[tokio::test]
    async fn prefix_search_subset_of_full_vocabulary() {
        let dir = tempfile::tempdir().unwrap();
        let engine = test_engine(&dir).await;
        engine
            .index_document("a.txt", "quick quartz zebra quest")
            .await
            .unwrap();

        let all = engine.prefix_search("").await.unwrap();
        assert_eq!(all.len(), 4);

        let qu = engine.prefix_search("qu").await.unwrap();
        assert_eq!(qu.len(), 3);
        assert!(qu.iter().all(|w| w.word.starts_with("qu")));

        assert!(engine.prefix_search("xyz").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn multi_keyword_scores_are_frequency_sums() {
        let dir = tempfile::tempdir().unwrap();
        let engine = test_engine(&dir).await;

        engine
            .index_document("a.txt", "fox den fox den fox")
            .await
            .unwrap();
        engine.index_document("b.txt", "fox den").await.unwrap();
        engine.index_document("c.txt", "fox only").await.unwrap();

        let results = engine
            .multi_keyword_search(&["fox".to_string(), "den".to_string()])
            .await
            .unwrap();

        // c.txt lacks "den" and is excluded; scores are per-word sums
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].document_id, 0);
        assert_eq!(results[0].score, 5);
        assert_eq!(results[1].document_id, 1);
        assert_eq!(results[1].score, 2);
    }

    #[tokio::test]
    async fn multi_keyword_with_missing_word_is_empty_not_error() {
        let dir = tempfile::tempdir().unwrap();
        let engine = test_engine(&dir).await;
        engine.index_document("a.txt", "fox den").await.unwrap();

        let results = engine
            .multi_keyword_search(&["nonexistentword".to_string(), "fox".to_string()])
            .await
            .unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn multi_keyword_empty_list_is_input_error() {
        let dir = tempfile::tempdir().unwrap();
        let engine = test_engine(&dir).await;

        let err = engine.multi_keyword_search(&[]).await.unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput { .. }));
    }

    #[tokio::test]
    async fn top_k_never_exceeds_k_and_is_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let engine = test_engine(&dir).await;
        engine
            .index_document("a.txt", "a a a b b c d e f g")
            .await
            .unwrap();

        let top = engine.top_k(5).await.unwrap();
        assert!(top.words.len() <= 5);
        assert!(top
            .words
            .windows(2)
            .all(|pair| pair[0].frequency >= pair[1].frequency));
        assert_eq!(top.words[0].word, "a");

        // A strictly more frequent new word is promoted
        engine
            .index_document("b.txt", "zz zz zz zz zz")
            .await
            .unwrap();
        let top = engine.top_k(5).await.unwrap();
        assert_eq!(top.words[0].word, "zz");
        assert_eq!(top.words[0].frequency, 5);
    }

    #[tokio::test]
    async fn top_k_zero_is_input_error() {
        let dir = tempfile::tempdir().unwrap();
        let engine = test_engine(&dir).await;

        let err = engine.top_k(0).await.unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput { .. }));
    }

    #[tokio::test]
    async fn replace_without_document_is_pure_text() {
        let dir = tempfile::tempdir().unwrap();
        let engine = test_engine(&dir).await;

        let outcome = engine
            .replace_word("fox", "wolf", "the fox saw a fox", None)
            .await
            .unwrap();
        assert_eq!(outcome.occurrences_replaced, 2);
        assert_eq!(outcome.modified_text, "the wolf saw a wolf");
        assert!(!outcome.file_saved);
    }

    #[tokio::test]
    async fn replace_and_reindex_moves_frequencies() {
        let dir = tempfile::tempdir().unwrap();
        let engine = test_engine(&dir).await;

        let content = "the quick fox jumps over the lazy fox";
        let doc = engine.index_document("fox.txt", content).await.unwrap();

        let outcome = engine
            .replace_word("fox", "wolf", content, Some(doc.document_id))
            .await
            .unwrap();
        assert_eq!(outcome.occurrences_replaced, 2);
        assert!(outcome.file_saved);
        assert!(!outcome.modified_text.contains("fox"));

        let fox = engine.word_frequency("fox").await.unwrap().unwrap();
        assert_eq!(fox.total_frequency, 0);
        assert!(fox.documents.is_empty());

        let wolf = engine.word_frequency("wolf").await.unwrap().unwrap();
        assert_eq!(wolf.total_frequency, 2);

        // The persisted text reflects the replacement
        let stored = engine
            .storage
            .get_text(doc.document_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored, outcome.modified_text);
    }

    #[tokio::test]
    async fn replace_empty_find_is_input_error() {
        let dir = tempfile::tempdir().unwrap();
        let engine = test_engine(&dir).await;

        let err = engine
            .replace_word("", "wolf", "text", None)
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput { .. }));
    }

    #[tokio::test]
    async fn replace_unknown_document_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let engine = test_engine(&dir).await;

        let err = engine
            .replace_word("fox", "wolf", "fox", Some(7))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::DocumentNotFound { .. }));
    }

    #[tokio::test]
    async fn vocabulary_capacity_rejects_whole_document() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.engine.max_vocabulary = 3;
        let engine = test_engine_with(&dir, config).await;

        engine.index_document("a.txt", "one two three").await.unwrap();

        let err = engine
            .index_document("b.txt", "four five")
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::CapacityExceeded { .. }));

        // All-or-nothing: the rejected document left no trace
        let stats = engine.stats().await;
        assert_eq!(stats.document_count, 1);
        assert_eq!(stats.distinct_word_count, 3);
        assert!(engine.word_frequency("four").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn over_long_token_is_a_capacity_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.engine.max_token_length = 8;
        let engine = test_engine_with(&dir, config).await;

        let err = engine
            .index_document("a.txt", "short reallyquitelongtoken")
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::CapacityExceeded { .. }));
    }

    #[tokio::test]
    async fn replace_enforces_ingestion_bounds() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.engine.max_token_length = 8;
        let engine = test_engine_with(&dir, config).await;

        let doc = engine.index_document("a.txt", "the fox").await.unwrap();

        let err = engine
            .replace_word(
                "fox",
                "abcdefghijklmnopqrstuvwxyz",
                "the fox",
                Some(doc.document_id),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::CapacityExceeded { .. }));

        // The rejected replace left index and storage untouched
        let fox = engine.word_frequency("fox").await.unwrap().unwrap();
        assert_eq!(fox.total_frequency, 1);
        assert!(engine
            .word_frequency("abcdefghijklmnopqrstuvwxyz")
            .await
            .unwrap()
            .is_none());
        let stored = engine
            .storage
            .get_text(doc.document_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored, "the fox");
    }

    #[tokio::test]
    async fn restart_replays_persisted_corpus() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.storage.db_path = PathBuf::from(dir.path()).join("db");
        let config = Arc::new(config);

        {
            let storage = Arc::new(StorageManager::new(config.storage.clone()).await.unwrap());
            let engine = SearchEngine::new(config.clone(), storage).await.unwrap();
            engine
                .index_document("a.txt", "the quick fox")
                .await
                .unwrap();
            engine.index_document("b.txt", "fox den").await.unwrap();
        }

        let storage = Arc::new(StorageManager::new(config.storage.clone()).await.unwrap());
        let engine = SearchEngine::new(config, storage).await.unwrap();

        let stats = engine.stats().await;
        assert_eq!(stats.document_count, 2);

        let fox = engine.word_frequency("fox").await.unwrap().unwrap();
        assert_eq!(fox.total_frequency, 2);
        assert_eq!(fox.documents[0].document_id, 0);
        assert_eq!(fox.documents[1].document_id, 1);
    }

    #[tokio::test]
    async fn queries_fold_case_like_ingestion() {
        let dir = tempfile::tempdir().unwrap();
        let engine = test_engine(&dir).await;
        engine.index_document("a.txt", "The Fox").await.unwrap();

        let fox = engine.word_frequency("FOX").await.unwrap().unwrap();
        assert_eq!(fox.total_frequency, 1);

        let results = engine
            .multi_keyword_search(&["The".to_string(), "Fox".to_string()])
            .await
            .unwrap();
        assert_eq!(results.len(), 1);
    }
}
