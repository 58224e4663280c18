use crate::error::{ServerError, ServerResult};
use crate::state::ServerState;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct SaveQuery {
    pub filename: String,
}

/// `POST /api/save?filename=<name>` writes the body to `<output_dir>/<name>.json`.
pub async fn save_results(
    State(state): State<Arc<ServerState>>,
    query: Result<Query<SaveQuery>, QueryRejection>,
    body: Result<Json<Value>, JsonRejection>,
) -> ServerResult<Json<bool>> {
    let Query(query) = query.map_err(|e| ServerError::BadRequest(e.body_text()))?;
    let Json(results) = body.map_err(|e| ServerError::BadRequest(e.body_text()))?;
    validate_filename(&query.filename)?;

    tokio::fs::create_dir_all(&state.output_dir).await?;
    let path = state.output_dir.join(format!("{}.json", query.filename));
    let mut pretty = serde_json::to_vec_pretty(&results)?;
    pretty.push(b'\n');
    tokio::fs::write(&path, &pretty).await?;

    tracing::info!(path = %path.display(), bytes = pretty.len(), "server.save");
    Ok(Json(true))
}

/// A bare file stem: no separators, no parent references, nothing empty.
fn validate_filename(name: &str) -> ServerResult<()> {
    let reject = |why: &str| -> ServerResult<()> {
        Err(ServerError::BadRequest(format!(
            "invalid filename {name:?}: {why}"
        )))
    };
    if name.trim().is_empty() {
        return reject("empty");
    }
    if name.contains(['/', '\\']) {
        return reject("path separators are not allowed");
    }
    if name.contains("..") {
        return reject("`..` is not allowed");
    }
    if name.chars().any(char::is_control) {
        return reject("control characters are not allowed");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_names() {
        assert!(validate_filename("results").is_ok());
        assert!(validate_filename("glaciers-2024_v2").is_ok());
        assert!(validate_filename("résumé").is_ok());
    }

    #[test]
    fn rejects_paths() {
        for bad in ["", "  ", "../etc", "a/b", "a\\b", "..", "x..y", "nul\0"] {
            assert!(validate_filename(bad).is_err(), "{bad:?}");
        }
    }
}
