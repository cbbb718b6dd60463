//! Axum route handler for artifact downloads.

use std::path::{Component, Path as FsPath, PathBuf};

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, HeaderValue};
use tracing::debug;

use crate::errors::AppError;
use crate::state::AppState;

/// GET /api/download/{path}
///
/// Streams a previously exported artifact as an attachment. Anything that
/// does not resolve to a plain file strictly inside the artifacts root is
/// reported as not found, including traversal attempts.
pub async fn handle_download(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Result<(HeaderMap, Body), AppError> {
    let full_path = resolve_artifact_path(&state.config.artifacts_dir, &path)
        .ok_or_else(|| AppError::NotFound("File not found".to_string()))?;

    let is_file = tokio::fs::metadata(&full_path)
        .await
        .map(|m| m.is_file())
        .unwrap_or(false);
    if !is_file {
        return Err(AppError::NotFound("File not found".to_string()));
    }

    let contents = tokio::fs::read(&full_path).await.map_err(|e| {
        AppError::Internal(anyhow::anyhow!(
            "failed to read artifact {}: {e}",
            full_path.display()
        ))
    })?;

    let filename = full_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "artifact.pdf".to_string());

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/pdf"),
    );
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_str(&format!("attachment; filename=\"{filename}\""))
            .map_err(|e| AppError::Internal(anyhow::anyhow!("invalid artifact filename: {e}")))?,
    );

    debug!("serving artifact {}", full_path.display());
    Ok((headers, Body::from(contents)))
}

/// Joins `relative` onto `root`, rejecting any component that could step
/// outside it (`..`, absolute prefixes, the root itself).
fn resolve_artifact_path(root: &FsPath, relative: &str) -> Option<PathBuf> {
    let mut resolved = root.to_path_buf();
    for component in FsPath::new(relative).components() {
        match component {
            Component::Normal(part) => resolved.push(part),
            _ => return None,
        }
    }
    if resolved == root {
        return None;
    }
    Some(resolved)
}
