//! # Storage Management Module
//!
//! ## Purpose
//! Persistent storage of document records and full text using an embedded
//! database, so a restarted server can rebuild its in-memory index instead of
//! losing the corpus.
//!
//! ## Input/Output Specification
//! - **Input**: Document records (id, filename, word count), full text
//! - **Output**: Ordered replay of the persisted corpus, point retrievals
//! - **Storage**: Sled embedded database; one tree for records, one for text
//!
//! ## Key Features
//! - Big-endian id keys so iteration yields documents in ingestion order
//! - Optional gzip compression of stored text
//! - Failed writes leave previously persisted state intact

use crate::config::StorageConfig;
use crate::errors::{EngineError, Result};
use crate::DocumentId;
use serde::{Deserialize, Serialize};

/// Persisted metadata for one document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub id: DocumentId,
    pub filename: String,
    pub word_count: u64,
    pub ingested_at: chrono::DateTime<chrono::Utc>,
}

/// Storage statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageStats {
    pub document_count: usize,
    pub database_size_bytes: u64,
}

/// Main storage manager
pub struct StorageManager {
    config: StorageConfig,
    db: sled::Db,
    records_tree: sled::Tree,
    text_tree: sled::Tree,
}

impl StorageManager {
    /// Open (or create) the database under the configured path
    pub async fn new(config: StorageConfig) -> Result<Self> {
        if let Some(parent) = config.db_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let db = sled::open(&config.db_path)?;
        let records_tree = db.open_tree("document_records")?;
        let text_tree = db.open_tree("document_text")?;

        let storage = Self {
            config,
            db,
            records_tree,
            text_tree,
        };

        tracing::info!(
            documents = storage.records_tree.len(),
            "storage manager initialized"
        );

        Ok(storage)
    }

    /// Persist a document's record and full text together
    pub async fn store_document(&self, record: &DocumentRecord, text: &str) -> Result<()> {
        self.store_record(record).await?;
        self.store_text(record.id, text).await?;
        self.db.flush_async().await?;
        Ok(())
    }

    /// Persist (or overwrite) a document record
    pub async fn store_record(&self, record: &DocumentRecord) -> Result<()> {
        let value = bincode::serialize(record)?;
        self.records_tree.insert(record.id.to_be_bytes(), value)?;
        tracing::debug!(document_id = record.id, filename = %record.filename, "stored record");
        Ok(())
    }

    /// Persist (or overwrite) a document's full text
    pub async fn store_text(&self, id: DocumentId, text: &str) -> Result<()> {
        let data = if self.config.enable_compression {
            compress_text(text)?
        } else {
            text.as_bytes().to_vec()
        };

        self.text_tree.insert(id.to_be_bytes(), data)?;
        tracing::debug!(document_id = id, bytes = text.len(), "stored text");
        Ok(())
    }

    pub async fn get_record(&self, id: DocumentId) -> Result<Option<DocumentRecord>> {
        match self.records_tree.get(id.to_be_bytes())? {
            Some(value) => Ok(Some(bincode::deserialize(&value)?)),
            None => Ok(None),
        }
    }

    pub async fn get_text(&self, id: DocumentId) -> Result<Option<String>> {
        match self.text_tree.get(id.to_be_bytes())? {
            Some(data) => {
                let text = if self.config.enable_compression {
                    decompress_text(&data)?
                } else {
                    String::from_utf8(data.to_vec())
                        .map_err(|e| crate::internal_error!("stored text is not UTF-8: {}", e))?
                };
                Ok(Some(text))
            }
            None => Ok(None),
        }
    }

    /// Load every persisted document in id order for startup replay
    pub async fn load_all(&self) -> Result<Vec<(DocumentRecord, String)>> {
        let mut documents = Vec::new();

        for entry in self.records_tree.iter() {
            let (_, value) = entry?;
            let record: DocumentRecord = bincode::deserialize(&value)?;

            let text = self.get_text(record.id).await?.ok_or_else(|| {
                crate::internal_error!("record {} has no stored text", record.id)
            })?;

            documents.push((record, text));
        }

        Ok(documents)
    }

    pub fn document_count(&self) -> usize {
        self.records_tree.len()
    }

    /// Flush pending writes to disk
    pub async fn flush(&self) -> Result<()> {
        self.db.flush_async().await?;
        Ok(())
    }

    /// Health check: probe a write-read-remove round trip.
    ///
    /// The probe lives in the default tree, never in `records_tree`: a key
    /// left behind by a crash mid-check must not be read back as a document
    /// record during startup replay.
    pub async fn health_check(&self) -> Result<()> {
        let test_key = b"health_check";

        self.db.insert(test_key, b"ok".as_slice())?;
        let value = self.db.get(test_key)?;
        if value.is_none() {
            return Err(EngineError::Internal {
                message: "health check value not found after write".to_string(),
            });
        }
        self.db.remove(test_key)?;

        Ok(())
    }

    pub async fn get_stats(&self) -> Result<StorageStats> {
        Ok(StorageStats {
            document_count: self.records_tree.len(),
            database_size_bytes: self.db.size_on_disk()?,
        })
    }
}

fn compress_text(text: &str) -> Result<Vec<u8>> {
    use std::io::Write;

    let mut encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(text.as_bytes())?;
    Ok(encoder.finish()?)
}

fn decompress_text(data: &[u8]) -> Result<String> {
    use std::io::Read;

    let mut decoder = flate2::read::GzDecoder::new(data);
    let mut decompressed = String::new();
    decoder.read_to_string(&mut decompressed)?;
    Ok(decompressed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn test_config(dir: &tempfile::TempDir) -> StorageConfig {
        StorageConfig {
            db_path: PathBuf::from(dir.path()).join("db"),
            enable_compression: true,
        }
    }

    fn record(id: u64, filename: &str, word_count: u64) -> DocumentRecord {
        DocumentRecord {
            id,
            filename: filename.to_string(),
            word_count,
            ingested_at: chrono::Utc::now(),
        }
    }

    #[tokio::test]
    async fn store_and_retrieve_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = StorageManager::new(test_config(&dir)).await.unwrap();

        storage
            .store_document(&record(0, "a.txt", 8), "the quick fox")
            .await
            .unwrap();

        let loaded = storage.get_record(0).await.unwrap().unwrap();
        assert_eq!(loaded.filename, "a.txt");
        assert_eq!(loaded.word_count, 8);

        let text = storage.get_text(0).await.unwrap().unwrap();
        assert_eq!(text, "the quick fox");
    }

    #[tokio::test]
    async fn missing_document_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let storage = StorageManager::new(test_config(&dir)).await.unwrap();

        assert!(storage.get_record(99).await.unwrap().is_none());
        assert!(storage.get_text(99).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn load_all_replays_in_id_order() {
        let dir = tempfile::tempdir().unwrap();
        let storage = StorageManager::new(test_config(&dir)).await.unwrap();

        storage
            .store_document(&record(1, "b.txt", 1), "beta")
            .await
            .unwrap();
        storage
            .store_document(&record(0, "a.txt", 1), "alpha")
            .await
            .unwrap();
        storage
            .store_document(&record(2, "c.txt", 1), "gamma")
            .await
            .unwrap();

        let all = storage.load_all().await.unwrap();
        let ids: Vec<u64> = all.iter().map(|(r, _)| r.id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
        assert_eq!(all[0].1, "alpha");
    }

    #[tokio::test]
    async fn persisted_state_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(&dir);

        {
            let storage = StorageManager::new(config.clone()).await.unwrap();
            storage
                .store_document(&record(0, "a.txt", 2), "hello world")
                .await
                .unwrap();
            storage.flush().await.unwrap();
        }

        let storage = StorageManager::new(config).await.unwrap();
        assert_eq!(storage.document_count(), 1);
        assert_eq!(
            storage.get_text(0).await.unwrap().unwrap(),
            "hello world"
        );
    }

    #[tokio::test]
    async fn uncompressed_mode_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = test_config(&dir);
        config.enable_compression = false;

        let storage = StorageManager::new(config).await.unwrap();
        storage.store_text(0, "plain text").await.unwrap();
        assert_eq!(storage.get_text(0).await.unwrap().unwrap(), "plain text");
    }

    #[tokio::test]
    async fn health_check_passes_on_fresh_database() {
        let dir = tempfile::tempdir().unwrap();
        let storage = StorageManager::new(test_config(&dir)).await.unwrap();
        storage.health_check().await.unwrap();
    }

    #[tokio::test]
    async fn interrupted_health_probe_does_not_poison_replay() {
        let dir = tempfile::tempdir().unwrap();
        let storage = StorageManager::new(test_config(&dir)).await.unwrap();

        storage
            .store_document(&record(0, "a.txt", 1), "alpha")
            .await
            .unwrap();

        // Simulate a crash between the probe's insert and remove
        storage.db.insert(b"health_check", b"ok".as_slice()).unwrap();

        let all = storage.load_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].0.filename, "a.txt");
        assert_eq!(storage.document_count(), 1);
    }
}
