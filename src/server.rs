//! The local site server.
//!
//! Serves the generated site as static files plus one JSON endpoint,
//! `POST /api/save-verse`, which edits a verse in its book file in place.
//! The book file is rewritten wholesale (atomically) on every save, and
//! every edit is recorded under `backup_original/data/` for hand recovery.
//! CORS is wide open: the site is served to a single local user and the
//! pages fetch from `file://` during editing sessions.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;
use axum::{
    Json, Router,
    extract::State,
    http::{Method, StatusCode, header},
    routing::post,
};
use chrono::Local;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
};

use crate::store::{BookData, StoreError, VerseRecord};
use crate::utils;

#[derive(Debug)]
pub struct SiteState {
    pub root: PathBuf,
}

#[derive(Debug, Deserialize)]
pub struct SaveVerseRequest {
    /// Book file slug, e.g. `romans`
    pub book: String,
    pub chapter: u32,
    pub verse: u32,
    pub text: String,
    #[serde(default)]
    pub old_text: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SaveVerseResponse {
    pub success: bool,
    pub message: String,
}

#[derive(thiserror::Error, Debug)]
enum SaveError {
    #[error("{0:?} is not a book file slug")]
    BadBookId(String),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("could not persist edit: {0}")]
    Io(#[from] std::io::Error),
}

impl SaveError {
    fn status(&self) -> StatusCode {
        match self {
            SaveError::BadBookId(_) => StatusCode::BAD_REQUEST,
            SaveError::Store(StoreError::BookNotFound { .. }) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

fn apply_edit(root: &Path, req: &SaveVerseRequest) -> Result<(), SaveError> {
    // the slug names a file under data/; reject anything path-like
    if req.book.is_empty() || !req.book.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(SaveError::BadBookId(req.book.clone()));
    }
    let path = root.join("data").join(format!("{}.json", req.book));
    let mut data = BookData::load(&path)?;

    match data
        .verses
        .iter_mut()
        .find(|v| v.chapter == req.chapter && v.verse == req.verse)
    {
        Some(record) => {
            record.zh = req.text.clone();
            record.text = Some(req.text.clone());
        }
        // an edit of a verse the extraction missed becomes a new record
        None => data.verses.push(VerseRecord {
            chapter: req.chapter,
            verse: req.verse,
            zh: req.text.clone(),
            en: None,
            text: Some(req.text.clone()),
            extra: Default::default(),
        }),
    }
    utils::write_json_atomic(&path, &data)?;

    let edit_log = root
        .join("backup_original")
        .join("data")
        .join(format!("{}_{}_{}_edited.json", req.book, req.chapter, req.verse));
    let record = serde_json::json!({
        "book": req.book,
        "chapter": req.chapter,
        "verse": req.verse,
        "old_text": req.old_text.clone().unwrap_or_default(),
        "new_text": req.text,
        "timestamp": Local::now().to_rfc3339(),
    });
    utils::write_json_atomic(&edit_log, &record)?;
    Ok(())
}

async fn save_verse(
    State(state): State<Arc<SiteState>>,
    Json(req): Json<SaveVerseRequest>,
) -> (StatusCode, Json<SaveVerseResponse>) {
    match apply_edit(&state.root, &req) {
        Ok(()) => {
            info!("Saved verse {} {}:{}", req.book, req.chapter, req.verse);
            (
                StatusCode::OK,
                Json(SaveVerseResponse {
                    success: true,
                    message: format!("经文 {} {}:{} 保存成功", req.book, req.chapter, req.verse),
                }),
            )
        }
        Err(e) => {
            warn!("Save failed for {} {}:{}: {e}", req.book, req.chapter, req.verse);
            (
                e.status(),
                Json(SaveVerseResponse {
                    success: false,
                    message: e.to_string(),
                }),
            )
        }
    }
}

/// Builds the site router: the save endpoint, then static files for
/// everything else, all behind permissive CORS.
pub fn app(root: PathBuf) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);
    let static_files = ServeDir::new(&root);
    Router::new()
        .route("/api/save-verse", post(save_verse))
        .fallback_service(static_files)
        .layer(cors)
        .with_state(Arc::new(SiteState { root }))
}

pub async fn serve(root: PathBuf, port: u16) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Serving {} on http://localhost:{port}", root.display());
    info!("Verse editing endpoint: POST /api/save-verse");
    axum::Server::bind(&addr)
        .serve(app(root).into_make_service())
        .await
        .context("site server failed")?;
    Ok(())
}
