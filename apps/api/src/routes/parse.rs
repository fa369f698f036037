use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;
use tracing::info;

use crate::document::{self, DecodeError, DocumentKind};
use crate::errors::AppError;
use crate::models::Resume;
use crate::state::AppState;

/// Multipart form field carrying the résumé file.
const FILE_FIELD: &str = "file";

struct Upload {
    filename: String,
    data: Bytes,
}

async fn read_upload(multipart: &mut Multipart) -> Result<Upload, AppError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let data = field.bytes().await?;
        return Ok(Upload { filename, data });
    }
    Err(AppError::Validation(format!(
        "File upload error: missing '{FILE_FIELD}' field"
    )))
}

/// POST /parse
///
/// Accepts a `.pdf` or `.docx` upload and returns the extracted `Resume`.
/// Decoding and parsing run on the blocking pool.
pub async fn handle_parse(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Resume>, AppError> {
    let Upload { filename, data } = read_upload(&mut multipart).await?;
    let kind = DocumentKind::from_filename(&filename)
        .ok_or_else(|| AppError::UnsupportedFileType(filename.clone()))?;
    let size = data.len();

    let parser = Arc::clone(&state.parser);
    let resume = tokio::task::spawn_blocking(move || {
        let text = document::decode(kind, &data)?;
        Ok::<_, DecodeError>(parser.parse(&text))
    })
    .await
    .map_err(|e| {
        if e.is_panic() {
            AppError::Decode(DecodeError::Aborted(format!("{kind} decoder panicked")))
        } else {
            AppError::Internal(anyhow::Error::new(e))
        }
    })??;

    info!(
        filename = %filename,
        kind = %kind,
        bytes = size,
        skills = resume.skills.len(),
        education = resume.education.len(),
        experience = resume.experience.len(),
        "Parsed uploaded resume"
    );

    Ok(Json(resume))
}
