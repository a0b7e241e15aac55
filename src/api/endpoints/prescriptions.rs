//! Prescription endpoints: list and image upload.
//!
//! `POST /api/prescriptions/upload` takes a base64 image (data URL or raw),
//! runs OCR and interaction checks through the AI assistant, stores the
//! prescription and raises one DrugInteraction alert per warning.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use base64::Engine;
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::extract::ApiJson;
use crate::api::types::ApiContext;
use crate::models::Prescription;

/// Maximum decoded image size (10 MiB).
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

#[derive(Deserialize)]
pub struct UploadRequest {
    /// Original file name, used to infer the type of raw base64 uploads.
    pub file_name: Option<String>,
    /// Base64 data URL (e.g., `data:image/jpeg;base64,/9j/...`) or raw base64.
    pub data: String,
}

/// `GET /api/prescriptions`: newest first.
pub async fn list(State(ctx): State<ApiContext>) -> Result<Json<Vec<Prescription>>, ApiError> {
    Ok(Json(ctx.store.prescriptions()?))
}

/// `POST /api/prescriptions/upload`
pub async fn upload(
    State(ctx): State<ApiContext>,
    ApiJson(req): ApiJson<UploadRequest>,
) -> Result<(StatusCode, Json<Prescription>), ApiError> {
    if req.data.trim().is_empty() {
        return Err(ApiError::BadRequest("No image provided".into()));
    }

    let bytes = decode_data_url(&req.data).map_err(ApiError::BadRequest)?;
    if bytes.is_empty() {
        return Err(ApiError::BadRequest("Image is empty".into()));
    }
    if bytes.len() > MAX_IMAGE_BYTES {
        return Err(ApiError::BadRequest(format!(
            "Image too large: {} bytes (max {MAX_IMAGE_BYTES})",
            bytes.len()
        )));
    }

    let mime_type = resolve_mime(&req.data, req.file_name.as_deref(), &bytes);
    tracing::info!(mime_type, size = bytes.len(), "Prescription upload received");

    let assistant = ctx.assistant.clone();
    let store = ctx.store.clone();
    let prescription = tokio::task::spawn_blocking(move || {
        assistant.process_prescription(&store, &mime_type, &bytes)
    })
    .await??;

    Ok((StatusCode::CREATED, Json(prescription)))
}

/// Decode a base64 data URL (`data:image/jpeg;base64,...`) or raw base64.
fn decode_data_url(data_url: &str) -> Result<Vec<u8>, String> {
    let base64_data = match data_url.find(',') {
        Some(idx) => &data_url[idx + 1..],
        None => data_url,
    };

    base64::engine::general_purpose::STANDARD
        .decode(base64_data.trim())
        .map_err(|e| format!("Base64 decode failed: {e}"))
}

/// MIME type declared in a data URL header, if any.
fn data_url_mime(data_url: &str) -> Option<&str> {
    let header = data_url.strip_prefix("data:")?;
    let end = header.find([';', ','])?;
    let mime = &header[..end];
    (!mime.is_empty()).then_some(mime)
}

/// Data URL header first, then the file name, then magic bytes.
fn resolve_mime(data_url: &str, file_name: Option<&str>, bytes: &[u8]) -> String {
    if let Some(mime) = data_url_mime(data_url) {
        return mime.to_ascii_lowercase();
    }
    if let Some(mime) = file_name.and_then(|name| mime_guess::from_path(name).first()) {
        return mime.essence_str().to_string();
    }
    detect_mime(bytes).to_string()
}

/// Detect the image type from magic bytes.
fn detect_mime(bytes: &[u8]) -> &'static str {
    if bytes.len() >= 3 && bytes[0..3] == [0xFF, 0xD8, 0xFF] {
        "image/jpeg"
    } else if bytes.len() >= 8 && bytes[0..8] == [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]
    {
        "image/png"
    } else if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        "image/webp"
    } else if bytes.len() >= 5 && &bytes[0..5] == b"%PDF-" {
        "application/pdf"
    } else {
        "application/octet-stream"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_data_url_jpeg() {
        let bytes = decode_data_url("data:image/jpeg;base64,/9j/4AAQ").unwrap();
        assert_eq!(bytes[0], 0xFF); // JPEG magic byte
    }

    #[test]
    fn decode_data_url_raw_base64() {
        let raw = base64::engine::general_purpose::STANDARD.encode(b"hello");
        assert_eq!(decode_data_url(&raw).unwrap(), b"hello");
    }

    #[test]
    fn decode_data_url_invalid_base64() {
        assert!(decode_data_url("not-valid-base64!!!").is_err());
    }

    #[test]
    fn mime_from_data_url_header() {
        assert_eq!(data_url_mime("data:image/png;base64,AAAA"), Some("image/png"));
        assert_eq!(data_url_mime("data:;base64,AAAA"), None);
        assert_eq!(data_url_mime("AAAA"), None);
    }

    #[test]
    fn mime_falls_back_to_file_name_then_magic_bytes() {
        assert_eq!(resolve_mime("AAAA", Some("scan.PNG"), b""), "image/png");
        assert_eq!(
            resolve_mime("AAAA", Some("scan"), &[0xFF, 0xD8, 0xFF, 0xE0]),
            "image/jpeg"
        );
        assert_eq!(resolve_mime("AAAA", None, b"%PDF-1.4"), "application/pdf");
        assert_eq!(resolve_mime("AAAA", None, &[0, 1, 2]), "application/octet-stream");
    }

    #[test]
    fn data_url_header_wins_over_file_name() {
        assert_eq!(
            resolve_mime("data:image/webp;base64,AAAA", Some("a.jpg"), b""),
            "image/webp"
        );
    }
}
