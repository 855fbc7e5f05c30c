//! # API Server Module
//!
//! ## Purpose
//! HTTP command surface for the search engine. Each route maps one engine
//! command to its JSON result shape; the field names are a compatibility
//! contract consumed by the bridge/UI layer.
//!
//! ## Input/Output Specification
//! - **Input**: HTTP requests carrying document content and query arguments
//! - **Output**: JSON result documents; `{success:false, error}` on failure
//! - **Framing**: Absent words/prefixes/empty intersections are 200 responses
//!   with `found:false`; invalid arguments are 400; storage failures are 500

use crate::errors::{EngineError, Result};
use actix_cors::Cors;
use actix_web::{web, App, HttpResponse, HttpServer};
use serde::{Deserialize, Serialize};

/// HTTP server wrapping the engine
pub struct ApiServer {
    app_state: crate::AppState,
}

#[derive(Debug, Deserialize)]
pub struct IndexRequest {
    pub filename: String,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct IndexResponse {
    pub indexed: bool,
    pub document_id: u64,
    pub word_count: u64,
}

#[derive(Debug, Deserialize)]
pub struct WordParams {
    pub word: String,
}

#[derive(Debug, Serialize)]
pub struct DocumentFrequencyItem {
    pub filename: String,
    pub frequency: u64,
}

#[derive(Debug, Serialize)]
pub struct FreqResponse {
    pub found: bool,
    pub word: String,
    pub total_freq: u64,
    pub documents: Vec<DocumentFrequencyItem>,
}

#[derive(Debug, Deserialize)]
pub struct KeywordParams {
    pub keyword: String,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub found: bool,
    pub keyword: String,
    pub total_freq: u64,
    pub results: Vec<DocumentFrequencyItem>,
}

#[derive(Debug, Deserialize)]
pub struct PrefixParams {
    pub prefix: String,
}

#[derive(Debug, Serialize)]
pub struct WordFrequencyItem {
    pub word: String,
    pub frequency: u64,
}

#[derive(Debug, Serialize)]
pub struct PrefixResponse {
    pub found: bool,
    pub prefix: String,
    pub words: Vec<WordFrequencyItem>,
}

#[derive(Debug, Deserialize)]
pub struct MultiParams {
    /// Whitespace- or comma-separated keyword list
    pub words: String,
}

#[derive(Debug, Serialize)]
pub struct DocumentScoreItem {
    pub filename: String,
    pub score: u64,
}

#[derive(Debug, Serialize)]
pub struct MultiResponse {
    pub found: bool,
    pub documents: Vec<DocumentScoreItem>,
}

#[derive(Debug, Deserialize)]
pub struct TopkParams {
    pub k: i64,
}

#[derive(Debug, Serialize)]
pub struct TopkResponse {
    pub k: usize,
    pub total_unique_words: usize,
    pub top_words: Vec<WordFrequencyItem>,
}

#[derive(Debug, Deserialize)]
pub struct ReplaceRequest {
    pub find: String,
    pub replace: String,
    pub content: String,
    /// When present, the modified text is persisted and the document reindexed
    pub document_id: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct ReplaceResponse {
    pub original_word: String,
    pub replacement_word: String,
    pub occurrences_replaced: usize,
    pub modified_text: String,
    pub file_saved: bool,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub document_count: usize,
    pub distinct_word_count: usize,
}

impl ApiServer {
    pub async fn new(app_state: crate::AppState) -> Result<Self> {
        Ok(Self { app_state })
    }

    /// Run the API server until shutdown
    pub async fn run(self) -> Result<()> {
        let server_config = self.app_state.config.server.clone();
        let bind_addr = format!("{}:{}", server_config.host, server_config.port);
        let payload_limit = server_config.max_payload_size_mb as usize * 1024 * 1024;
        let app_state = self.app_state;

        tracing::info!("Starting API server on {}", bind_addr);

        // Bind and build the Server handle eagerly; only the handle is held
        // across the await, so the returned future can be spawned onto the
        // runtime.
        let server = HttpServer::new(move || {
            let cors = if app_state.config.server.enable_cors {
                Cors::permissive()
            } else {
                Cors::default()
            };

            App::new()
                .wrap(cors)
                .app_data(web::Data::new(app_state.clone()))
                .app_data(web::JsonConfig::default().limit(payload_limit))
                .configure(configure_routes)
        })
        .workers(server_config.workers)
        .bind(&bind_addr)
        .map_err(|e| EngineError::Internal {
            message: format!("Failed to bind server to {}: {}", bind_addr, e),
        })?
        .run();

        server.await.map_err(|e| EngineError::Internal {
            message: format!("Server error: {}", e),
        })?;

        Ok(())
    }
}

/// Route table shared by the server and the tests
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/index", web::post().to(index_handler))
        .route("/api/freq", web::get().to(freq_handler))
        .route("/api/search", web::get().to(search_handler))
        .route("/api/prefix", web::get().to(prefix_handler))
        .route("/api/multi", web::get().to(multi_handler))
        .route("/api/topk", web::get().to(topk_handler))
        .route("/api/replace", web::post().to(replace_handler))
        .route("/api/stats", web::get().to(stats_handler));
}

fn error_response(err: EngineError) -> HttpResponse {
    tracing::error!(category = err.category(), "command failed: {}", err);
    let body = serde_json::json!({
        "success": false,
        "error": err.to_string(),
    });
    if err.is_client_error() {
        HttpResponse::BadRequest().json(body)
    } else {
        HttpResponse::InternalServerError().json(body)
    }
}

async fn index_handler(
    app_state: web::Data<crate::AppState>,
    request: web::Json<IndexRequest>,
) -> HttpResponse {
    match app_state
        .engine
        .index_document(&request.filename, &request.content)
        .await
    {
        Ok(indexed) => HttpResponse::Ok().json(IndexResponse {
            indexed: true,
            document_id: indexed.document_id,
            word_count: indexed.word_count,
        }),
        Err(e) => error_response(e),
    }
}

async fn freq_handler(
    app_state: web::Data<crate::AppState>,
    params: web::Query<WordParams>,
) -> HttpResponse {
    match app_state.engine.word_frequency(&params.word).await {
        Ok(Some(freq)) => HttpResponse::Ok().json(FreqResponse {
            found: true,
            word: freq.word,
            total_freq: freq.total_frequency,
            documents: freq
                .documents
                .into_iter()
                .map(|d| DocumentFrequencyItem {
                    filename: d.filename,
                    frequency: d.frequency,
                })
                .collect(),
        }),
        Ok(None) => HttpResponse::Ok().json(FreqResponse {
            found: false,
            word: params.into_inner().word,
            total_freq: 0,
            documents: Vec::new(),
        }),
        Err(e) => error_response(e),
    }
}

async fn search_handler(
    app_state: web::Data<crate::AppState>,
    params: web::Query<KeywordParams>,
) -> HttpResponse {
    match app_state.engine.keyword_search(&params.keyword).await {
        Ok(Some(freq)) => HttpResponse::Ok().json(SearchResponse {
            found: true,
            keyword: freq.word,
            total_freq: freq.total_frequency,
            results: freq
                .documents
                .into_iter()
                .map(|d| DocumentFrequencyItem {
                    filename: d.filename,
                    frequency: d.frequency,
                })
                .collect(),
        }),
        Ok(None) => HttpResponse::Ok().json(SearchResponse {
            found: false,
            keyword: params.into_inner().keyword,
            total_freq: 0,
            results: Vec::new(),
        }),
        Err(e) => error_response(e),
    }
}

async fn prefix_handler(
    app_state: web::Data<crate::AppState>,
    params: web::Query<PrefixParams>,
) -> HttpResponse {
    match app_state.engine.prefix_search(&params.prefix).await {
        Ok(words) => HttpResponse::Ok().json(PrefixResponse {
            found: !words.is_empty(),
            prefix: params.into_inner().prefix,
            words: words
                .into_iter()
                .map(|w| WordFrequencyItem {
                    word: w.word,
                    frequency: w.frequency,
                })
                .collect(),
        }),
        Err(e) => error_response(e),
    }
}

async fn multi_handler(
    app_state: web::Data<crate::AppState>,
    params: web::Query<MultiParams>,
) -> HttpResponse {
    let words: Vec<String> = params
        .words
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect();

    match app_state.engine.multi_keyword_search(&words).await {
        Ok(documents) => HttpResponse::Ok().json(MultiResponse {
            found: !documents.is_empty(),
            documents: documents
                .into_iter()
                .map(|d| DocumentScoreItem {
                    filename: d.filename,
                    score: d.score,
                })
                .collect(),
        }),
        Err(e) => error_response(e),
    }
}

async fn topk_handler(
    app_state: web::Data<crate::AppState>,
    params: web::Query<TopkParams>,
) -> HttpResponse {
    if params.k <= 0 {
        return error_response(crate::invalid_input!("k", "must be greater than zero"));
    }

    match app_state.engine.top_k(params.k as usize).await {
        Ok(top) => HttpResponse::Ok().json(TopkResponse {
            k: params.k as usize,
            total_unique_words: top.total_unique_words,
            top_words: top
                .words
                .into_iter()
                .map(|w| WordFrequencyItem {
                    word: w.word,
                    frequency: w.frequency,
                })
                .collect(),
        }),
        Err(e) => error_response(e),
    }
}

async fn replace_handler(
    app_state: web::Data<crate::AppState>,
    request: web::Json<ReplaceRequest>,
) -> HttpResponse {
    match app_state
        .engine
        .replace_word(
            &request.find,
            &request.replace,
            &request.content,
            request.document_id,
        )
        .await
    {
        Ok(outcome) => {
            let request = request.into_inner();
            HttpResponse::Ok().json(ReplaceResponse {
                original_word: request.find,
                replacement_word: request.replace,
                occurrences_replaced: outcome.occurrences_replaced,
                modified_text: outcome.modified_text,
                file_saved: outcome.file_saved,
            })
        }
        Err(e) => error_response(e),
    }
}

async fn stats_handler(app_state: web::Data<crate::AppState>) -> HttpResponse {
    let stats = app_state.engine.stats().await;
    HttpResponse::Ok().json(StatsResponse {
        document_count: stats.document_count,
        distinct_word_count: stats.distinct_word_count,
    })
}
