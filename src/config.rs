//! # Configuration Management Module
//!
//! ## Purpose
//! Centralized configuration for the document search engine, supporting TOML
//! files, environment variable overrides and validation with type-safe access
//! to all system settings.
//!
//! ## Configuration Sources (in order of precedence)
//! 1. Command line arguments (highest priority)
//! 2. Environment variables (`DOC_SEARCH_*`)
//! 3. Configuration file (TOML)
//! 4. Default values (lowest priority)
//!
//! ## Usage
//! ```rust,ignore
//! use trie_doc_search::config::Config;
//!
//! let config = Config::from_file("config.toml")?;
//! println!("Server port: {}", config.server.port);
//! ```

use crate::errors::{EngineError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure containing all system settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server and API configuration
    pub server: ServerConfig,
    /// Engine capacity bounds and hash table tuning
    pub engine: EngineConfig,
    /// Tokenization settings
    pub text_processing: TextProcessingConfig,
    /// Storage and database settings
    pub storage: StorageConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Server and API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server bind address
    pub host: String,
    /// Server port
    pub port: u16,
    /// Maximum request payload size in MB
    pub max_payload_size_mb: u32,
    /// Enable CORS for web frontends
    pub enable_cors: bool,
    /// Number of worker threads for the HTTP server
    pub workers: usize,
}

/// Engine capacity bounds.
///
/// Every bound is checked before mutation and surfaces as a
/// `CapacityExceeded` error, never as silent truncation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Maximum number of indexed documents
    pub max_documents: usize,
    /// Maximum number of distinct words across the index
    pub max_vocabulary: usize,
    /// Maximum length in characters of a single token
    pub max_token_length: usize,
    /// Maximum size in bytes of a single document's content
    pub max_document_bytes: usize,
    /// Initial bucket count for the token hash table
    pub hash_initial_buckets: usize,
    /// Load factor threshold that triggers a rehash
    pub hash_max_load_factor: f64,
}

/// Tokenization settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextProcessingConfig {
    /// Apply Unicode NFC normalization before tokenizing
    pub enable_unicode_normalization: bool,
}

/// Storage and database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Database directory path
    pub db_path: PathBuf,
    /// Compress stored document text
    pub enable_compression: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Enable structured JSON logging
    pub json_format: bool,
}

impl Config {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        Self::from_file("config.toml")
    }

    /// Load configuration from a specific file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            tracing::warn!("Configuration file not found: {:?}, using defaults", path);
            let mut config = Self::default();
            config.apply_env_overrides()?;
            config.validate()?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(path).map_err(|e| EngineError::Config {
            message: format!("Failed to read config file {:?}: {}", path, e),
        })?;

        let mut config: Config = toml::from_str(&content).map_err(|e| EngineError::Config {
            message: format!("Failed to parse config file {:?}: {}", path, e),
        })?;

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(host) = std::env::var("DOC_SEARCH_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("DOC_SEARCH_PORT") {
            self.server.port = port.parse().map_err(|_| EngineError::Config {
                message: "Invalid port number in DOC_SEARCH_PORT".to_string(),
            })?;
        }
        if let Ok(db_path) = std::env::var("DOC_SEARCH_DB_PATH") {
            self.storage.db_path = PathBuf::from(db_path);
        }
        if let Ok(level) = std::env::var("DOC_SEARCH_LOG_LEVEL") {
            self.logging.level = level;
        }

        Ok(())
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(EngineError::Config {
                message: "server.port cannot be zero".to_string(),
            });
        }

        if self.engine.max_documents == 0 || self.engine.max_vocabulary == 0 {
            return Err(EngineError::Config {
                message: "engine capacity bounds must be greater than zero".to_string(),
            });
        }

        if self.engine.max_token_length == 0 {
            return Err(EngineError::Config {
                message: "engine.max_token_length must be greater than zero".to_string(),
            });
        }

        if self.engine.hash_initial_buckets == 0 {
            return Err(EngineError::Config {
                message: "engine.hash_initial_buckets must be greater than zero".to_string(),
            });
        }

        if !(self.engine.hash_max_load_factor > 0.0) {
            return Err(EngineError::Config {
                message: "engine.hash_max_load_factor must be positive".to_string(),
            });
        }

        Ok(())
    }

    /// Get configuration as TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| EngineError::Config {
            message: format!("Failed to serialize config to TOML: {}", e),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
                max_payload_size_mb: 10,
                enable_cors: true,
                workers: num_cpus::get(),
            },
            engine: EngineConfig {
                max_documents: 10_000,
                max_vocabulary: 1_000_000,
                max_token_length: 128,
                max_document_bytes: 10 * 1024 * 1024,
                hash_initial_buckets: 1024,
                hash_max_load_factor: 0.75,
            },
            text_processing: TextProcessingConfig {
                enable_unicode_normalization: true,
            },
            storage: StorageConfig {
                db_path: PathBuf::from("./data/doc_search.db"),
                enable_compression: true,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                json_format: false,
            },
        }
    }
}
