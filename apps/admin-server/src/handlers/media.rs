//! Image upload handler.

use actix_multipart::{Field, Multipart};
use actix_web::{HttpResponse, web};
use futures::StreamExt;

use press_core::domain::Upload;
use press_shared::ApiResponse;

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

const FILE_FIELD: &str = "file";

/// POST /api/media/upload (multipart, field `file`)
pub async fn upload_media(
    state: web::Data<AppState>,
    mut payload: Multipart,
) -> AppResult<HttpResponse> {
    let mut upload = None;

    while let Some(field) = payload.next().await {
        let field = field.map_err(|e| AppError::BadRequest(e.to_string()))?;
        if field.name() == Some(FILE_FIELD) {
            upload = Some(read_upload(field, state.max_upload_bytes).await?);
            break;
        }
    }

    let upload = upload.ok_or_else(|| AppError::BadRequest("No file provided".to_string()))?;
    let media = state.media.store(upload).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(
        media,
        "File uploaded successfully!",
    )))
}

/// Buffer a file field. Reading stops one byte past `max_bytes`; the store
/// then rejects the upload as too large.
async fn read_upload(mut field: Field, max_bytes: u64) -> AppResult<Upload> {
    let content_type = field
        .content_type()
        .map(|mime| mime.essence_str().to_string())
        .unwrap_or_default();
    let file_name = field
        .content_disposition()
        .and_then(|cd| cd.get_filename())
        .map(String::from);

    let limit = usize::try_from(max_bytes).unwrap_or(usize::MAX).saturating_add(1);
    let mut bytes = Vec::new();
    while let Some(chunk) = field.next().await {
        let chunk = chunk.map_err(|e| AppError::BadRequest(e.to_string()))?;
        let room = limit - bytes.len();
        bytes.extend_from_slice(&chunk[..chunk.len().min(room)]);
        if bytes.len() >= limit {
            break;
        }
    }

    Ok(Upload::new(file_name, content_type, bytes))
}
