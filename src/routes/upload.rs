use axum::body::Body;
use axum::extract::multipart::MultipartError;
use axum::extract::{DefaultBodyLimit, Multipart, Path, State};
use axum::http::{StatusCode, header};
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;

use crate::AppState;
use crate::error::AppError;

/// Headroom over the per-file limit for multipart boundaries and headers.
const BODY_SLACK: usize = 1024 * 1024;

/// `max_upload_bytes` is the configured per-file limit; the whole-body
/// ceiling is derived from it. The precise per-file check happens in the
/// storage layer.
pub fn routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route(
            "/upload",
            post(upload_file).layer(DefaultBodyLimit::max(max_upload_bytes + BODY_SLACK)),
        )
        .route("/uploads/{filename}", get(download_file))
}

/// Body-limit failures keep their 413 status; everything else about a
/// malformed multipart body is the client's fault.
fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge("request body too large".into())
    } else {
        AppError::BadRequest(format!("multipart error: {e}"))
    }
}

/// Image upload (multipart, field name `file`).
async fn upload_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<serde_json::Value>, AppError> {
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or("").to_string();
        let data = field.bytes().await.map_err(multipart_error)?;
        upload = Some((filename, data.to_vec()));
    }

    let (filename, data) = upload.ok_or_else(|| AppError::BadRequest("no file provided".into()))?;
    if filename.is_empty() {
        return Err(AppError::BadRequest("no file selected".into()));
    }

    let stored = state.storage.save_image(&filename, &data).await?;

    Ok(Json(json!({
        "message": "file uploaded successfully",
        "filename": stored,
        "url": format!("/api/uploads/{stored}"),
    })))
}

fn content_type_for(filename: &str) -> &'static str {
    match filename.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase()) {
        Some(ext) if ext == "png" => "image/png",
        Some(ext) if ext == "jpg" || ext == "jpeg" => "image/jpeg",
        Some(ext) if ext == "gif" => "image/gif",
        _ => "application/octet-stream",
    }
}

async fn download_file(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, AppError> {
    let data = state.storage.load(&filename).await?;

    Ok(Response::builder()
        .header(header::CONTENT_TYPE, content_type_for(&filename))
        .body(Body::from(data))
        .unwrap())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_for() {
        assert_eq!(content_type_for("a_photo.png"), "image/png");
        assert_eq!(content_type_for("a_photo.JPG"), "image/jpeg");
        assert_eq!(content_type_for("anim.gif"), "image/gif");
        assert_eq!(content_type_for("mystery"), "application/octet-stream");
    }
}
