//! API handlers.
//!
//! # Responsibilities
//! - Translate HTTP requests into registry/file/history operations
//! - Enforce the read-check-backup-write order on saves
//! - Map every failure onto the shared error taxonomy
//!
//! Handlers stay thin; anything worth unit-testing lives in the modules
//! they call into.

use std::io;

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::config::{ConfigEntry, ConfigFormat};
use crate::error::ApiError;
use crate::files::FileSnapshot;
use crate::history::{is_valid_commit_hash, HistoryEntry, DEFAULT_HISTORY_LIMIT};
use crate::http::server::AppState;
use crate::validate::{brewfile, toml, Verdict};

/// Registry id the brew endpoints read packages from.
const BREWFILE_ID: &str = "brewfile";

fn config_not_found(id: &str) -> ApiError {
    ApiError::not_found(format!("Config '{id}' not found"))
}

/// `GET /api/health`
pub(crate) async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// `GET /api/configs`
pub(crate) async fn list_configs(State(state): State<AppState>) -> Json<Vec<ConfigEntry>> {
    Json(state.registry.entries().to_vec())
}

/// `GET /api/configs/{id}`
pub(crate) async fn get_config(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<FileSnapshot>, ApiError> {
    let entry = state.registry.get(&id).ok_or_else(|| config_not_found(&id))?;
    let path = state.resolver.resolve(entry);

    let snapshot = FileSnapshot::load(entry, &path).await.map_err(|error| {
        if error.kind() == io::ErrorKind::NotFound {
            ApiError::not_found(format!("File not found: {}", path.display()))
        } else {
            error.into()
        }
    })?;

    Ok(Json(snapshot))
}

#[derive(Debug, Deserialize)]
pub(crate) struct WritePayload {
    #[serde(default)]
    content: String,
}

/// `PUT /api/configs/{id}`
///
/// Validation happens before any mutation: a rejected write leaves both
/// the live file and the backup archive untouched.
pub(crate) async fn put_config(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let entry = state.registry.get(&id).ok_or_else(|| config_not_found(&id))?;

    let path = state.resolver.resolve(entry);
    if !state.resolver.is_contained(&path) {
        return Err(ApiError::forbidden("Invalid path"));
    }

    let payload: WritePayload =
        serde_json::from_slice(&body).map_err(|_| ApiError::malformed("Invalid JSON"))?;

    if entry.format == ConfigFormat::Toml {
        if let Verdict::Rejected(rejection) = toml::check_structure(&payload.content) {
            return Err(ApiError::validation(format!(
                "TOML validation failed: {rejection}"
            )));
        }
    }

    let backup = state.backups.snapshot(&entry.id, &path).await?;
    tokio::fs::write(&path, payload.content.as_bytes()).await?;

    info!(
        config = %entry.id,
        bytes = payload.content.len(),
        backed_up = backup.is_some(),
        "Saved config"
    );

    Ok(Json(json!({
        "success": true,
        "backup": backup.map(|p| p.display().to_string()),
        "message": format!("Saved {id}"),
    })))
}

/// `GET /api/brew/{category}`
///
/// A missing Brewfile is an empty package list, not an error; an unknown
/// category is a 404 before any filesystem access.
pub(crate) async fn brew_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<Vec<brewfile::PackageName>>, ApiError> {
    if !matches!(category.as_str(), "taps" | "formulae" | "casks") {
        return Err(ApiError::not_found(format!(
            "Unknown brew category '{category}'"
        )));
    }

    let Some(entry) = state.registry.get(BREWFILE_ID) else {
        return Ok(Json(Vec::new()));
    };

    let path = state.resolver.resolve(entry);
    let content = match tokio::fs::read_to_string(&path).await {
        Ok(content) => content,
        Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(Json(Vec::new())),
        Err(error) => return Err(error.into()),
    };

    let packages = brewfile::parse(&content);
    let bucket = packages.category(&category).unwrap_or_default();
    Ok(Json(bucket.to_vec()))
}

#[derive(Debug, Deserialize)]
pub(crate) struct HistoryQuery {
    limit: Option<usize>,
}

/// `GET /api/history/{id}`
pub(crate) async fn get_history(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<HistoryEntry>>, ApiError> {
    let entry = state.registry.get(&id).ok_or_else(|| config_not_found(&id))?;
    let limit = query.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);

    Ok(Json(state.history.list(&entry.source_path, limit).await))
}

/// `GET /api/history/{id}/{commit}`
pub(crate) async fn get_diff(
    State(state): State<AppState>,
    Path((id, commit)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    let entry = state.registry.get(&id).ok_or_else(|| config_not_found(&id))?;

    if !is_valid_commit_hash(&commit) {
        return Err(ApiError::malformed("Invalid commit hash"));
    }

    let diff = state.history.commit_diff(&entry.source_path, &commit).await;
    Ok(Json(json!({ "diff": diff })))
}
