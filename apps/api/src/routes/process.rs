//! Axum route handler for the resume-processing workflow.

use std::path::Path;

use anyhow::Context;
use axum::extract::multipart::Field as MultipartField;
use axum::extract::{Multipart, State};
use axum::Json;
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::pipeline::{Field, WorkflowState};
use crate::render::export_pdf;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ProcessResponse {
    pub message: &'static str,
    pub outputs: ArtifactPaths,
    pub analysis: Analysis,
}

/// Download paths for the three exported documents, relative to the
/// artifacts root and accepted verbatim by `GET /api/download/{path}`.
#[derive(Debug, Serialize)]
pub struct ArtifactPaths {
    pub cover_letter: String,
    pub pitch: String,
    pub resume_edits: String,
}

/// The two analysis texts returned inline rather than as documents.
#[derive(Debug, Serialize)]
pub struct Analysis {
    pub resume_summary: String,
    pub job_match: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handler
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/process_resume
///
/// Accepts multipart parts `resume_file` and `job_desc_file` (UTF-8 text
/// files) plus `job_title` (plain field), runs the workflow, exports the
/// three document artifacts into a fresh run directory, and returns their
/// download paths together with the two analysis texts.
///
/// A missing part is not rejected here; the engine reports it as a missing
/// required input, which surfaces as 500 with that message.
pub async fn handle_process_resume(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ProcessResponse>, AppError> {
    let mut workflow_state = WorkflowState::new();

    while let Some(part) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Upload(format!("failed to read multipart body: {e}")))?
    {
        let Some(name) = part.name().map(str::to_string) else {
            continue;
        };
        match name.as_str() {
            "resume_file" => {
                let text = text_part(&name, part).await?;
                workflow_state.set(Field::Resume, text)?;
            }
            "job_desc_file" => {
                let text = text_part(&name, part).await?;
                workflow_state.set(Field::JobDescription, text)?;
            }
            "job_title" => {
                let text = part
                    .text()
                    .await
                    .map_err(|e| AppError::Upload(format!("failed to read part '{name}': {e}")))?;
                workflow_state.set(Field::JobTitle, text)?;
            }
            // unknown parts are ignored, matching lenient form handling
            _ => {}
        }
    }

    let final_state = state.pipeline.run(workflow_state).await?;

    let run_dir = tempfile::Builder::new()
        .prefix("run-")
        .tempdir_in(&state.config.artifacts_dir)
        .context("failed to create run directory")?
        .keep();
    info!("workflow complete; exporting artifacts to {}", run_dir.display());

    let root = &state.config.artifacts_dir;
    let outputs = ArtifactPaths {
        cover_letter: export_artifact(&final_state, Field::CoverLetter, &run_dir, root)?,
        pitch: export_artifact(&final_state, Field::Pitch, &run_dir, root)?,
        resume_edits: export_artifact(&final_state, Field::ResumeEdits, &run_dir, root)?,
    };

    Ok(Json(ProcessResponse {
        message: "Processing complete",
        outputs,
        analysis: Analysis {
            resume_summary: artifact_text(&final_state, Field::ResumeSummary)?.to_string(),
            job_match: artifact_text(&final_state, Field::JobMatch)?.to_string(),
        },
    }))
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

/// Reads one uploaded file part and decodes it as UTF-8.
async fn text_part(name: &str, part: MultipartField<'_>) -> Result<String, AppError> {
    let bytes: bytes::Bytes = part
        .bytes()
        .await
        .map_err(|e| AppError::Upload(format!("failed to read part '{name}': {e}")))?;
    String::from_utf8(bytes.to_vec())
        .map_err(|_| AppError::Upload(format!("part '{name}' is not valid UTF-8")))
}

fn artifact_text(state: &WorkflowState, field: Field) -> Result<&str, AppError> {
    state.get(field).ok_or_else(|| {
        AppError::Internal(anyhow::anyhow!("run completed without field '{field}'"))
    })
}

/// Exports one state field as a PDF named `{field}.pdf` inside the run
/// directory and returns its root-relative download path.
fn export_artifact(
    state: &WorkflowState,
    field: Field,
    run_dir: &Path,
    artifacts_root: &Path,
) -> Result<String, AppError> {
    let text = artifact_text(state, field)?;
    let path = export_pdf(text, &run_dir.join(format!("{field}.pdf")))?;

    let relative = path.strip_prefix(artifacts_root).map_err(|_| {
        AppError::Internal(anyhow::anyhow!(
            "exported artifact {} is outside the artifacts root",
            path.display()
        ))
    })?;
    Ok(relative.to_string_lossy().into_owned())
}
