//! # Trie-Structured Document Search Engine
//!
//! ## Overview
//! This library indexes a corpus of text documents to answer keyword, prefix
//! and multi-keyword queries with frequency-based ranking, and supports point
//! edits (word replacement) with reindexing.
//!
//! ## Architecture
//! The system is composed of several key modules:
//! - `text_processing`: tokenization and word-level text manipulation
//! - `trie`: arena-backed prefix tree owning the word payloads
//! - `hash_index`: DJB2 hash table mapping tokens to trie terminals
//! - `index`: dual-index facade with document registry and occurrence lists
//! - `engine`: query engine, ingestion and replace-and-reindex
//! - `storage`: persistent document store for restart replay
//! - `api`: HTTP command surface
//! - `config`: configuration management and settings
//! - `errors`: centralized error handling and types
//!
//! ## Input/Output Specification
//! - **Input**: Plain-text documents, query words/prefixes/keyword lists
//! - **Output**: Deterministically ranked frequency results as JSON
//! - **Performance**: O(1) average exact lookup, O(subtree) prefix queries
//!
//! ## Usage
//! ```rust,no_run
//! use std::sync::Arc;
//! use trie_doc_search::{Config, SearchEngine};
//! use trie_doc_search::storage::StorageManager;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Arc::new(Config::from_file("config.toml")?);
//!     let storage = Arc::new(StorageManager::new(config.storage.clone()).await?);
//!     let engine = SearchEngine::new(config, storage).await?;
//!     engine.index_document("fox.txt", "the quick fox").await?;
//!     let top = engine.top_k(10).await?;
//!     println!("{} distinct words", top.total_unique_words);
//!     Ok(())
//! }
//! ```

// Core modules
pub mod api;
pub mod config;
pub mod engine;
pub mod errors;
pub mod hash_index;
pub mod index;
pub mod storage;
pub mod text_processing;
pub mod trie;

// Re-exports for convenience
pub use config::Config;
pub use engine::SearchEngine;
pub use errors::{EngineError, Result};

use std::sync::Arc;

/// Unique identifier for indexed documents; a monotonic counter, never reused
pub type DocumentId = u64;

/// Application state shared across components
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<config::Config>,
    pub engine: Arc<engine::SearchEngine>,
    pub storage: Arc<storage::StorageManager>,
}
