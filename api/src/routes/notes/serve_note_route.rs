//! GET /pdf/{*filename} and GET /download/{*filename}.
//!
//! Only filenames present in the index are served; everything else is 404,
//! which also keeps requests inside the notes folder.

use std::{io, sync::Arc};

use axum::{
    body::Body,
    extract::{Path, State},
    http::{
        HeaderMap, HeaderValue,
        header::{CONTENT_DISPOSITION, CONTENT_LENGTH, CONTENT_TYPE},
    },
    response::{IntoResponse, Response},
};
use futures::{Stream, stream};
use tokio::{fs::File, io::AsyncReadExt};
use tracing::{debug, warn};

use crate::{
    app::app_state::AppState,
    error_handler::{AppError, AppResult},
    middleware_layer::request_id::request_id,
};

const CHUNK_SIZE: usize = 64 * 1024;

/// Handler: GET /pdf/{*filename}, inline.
pub async fn view_note_route(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(filename): Path<String>,
) -> AppResult<Response> {
    serve_note(&state, &headers, &filename, false).await
}

/// Handler: GET /download/{*filename}, as an attachment.
pub async fn download_note_route(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(filename): Path<String>,
) -> AppResult<Response> {
    serve_note(&state, &headers, &filename, true).await
}

async fn serve_note(
    state: &AppState,
    headers: &HeaderMap,
    filename: &str,
    attachment: bool,
) -> AppResult<Response> {
    let request_id = request_id(headers);

    if !state.search.contains_file(filename) {
        debug!(request_id = %request_id, filename, "serve_note: not indexed");
        return Err(AppError::NotFound);
    }

    let path = state.notes_folder.join(filename);
    let file = File::open(&path).await.map_err(|e| {
        warn!(
            request_id = %request_id,
            path = %path.display(),
            error = %e,
            "serve_note: open failed"
        );
        AppError::from(e)
    })?;
    let len = file.metadata().await?.len();

    let mut res = Body::from_stream(chunks(file)).into_response();
    let out = res.headers_mut();
    out.insert(CONTENT_TYPE, HeaderValue::from_static(content_type(filename)));
    out.insert(CONTENT_LENGTH, HeaderValue::from(len));
    if attachment {
        out.insert(CONTENT_DISPOSITION, attachment_header(filename));
    }

    debug!(
        request_id = %request_id,
        filename,
        bytes = len,
        attachment,
        "serve_note: ok"
    );
    Ok(res)
}

/// Reads `file` in fixed-size chunks so a note is never held in memory whole.
fn chunks(file: File) -> impl Stream<Item = io::Result<Vec<u8>>> + Send + 'static {
    stream::try_unfold(file, |mut file| async move {
        let mut buf = vec![0u8; CHUNK_SIZE];
        let n = file.read(&mut buf).await?;
        if n == 0 {
            return Ok(None);
        }
        buf.truncate(n);
        Ok(Some((buf, file)))
    })
}

fn content_type(filename: &str) -> &'static str {
    let lower = filename.to_ascii_lowercase();
    if lower.ends_with(".pdf") {
        "application/pdf"
    } else {
        "application/octet-stream"
    }
}

/// `attachment; filename="<ascii fallback>"; filename*=UTF-8''<percent-encoded>`.
fn attachment_header(filename: &str) -> HeaderValue {
    let fallback: String = filename
        .chars()
        .map(|c| {
            if (c.is_ascii_graphic() && c != '"' && c != '\\') || c == ' ' {
                c
            } else {
                '_'
            }
        })
        .collect();

    let encoded = urlencoding::encode(filename);
    let value = format!("attachment; filename=\"{fallback}\"; filename*=UTF-8''{encoded}");
    HeaderValue::from_str(&value).unwrap_or(HeaderValue::from_static("attachment"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attachment_header_plain_name() {
        let v = attachment_header("Linear_Algebra_Notes.pdf");
        assert_eq!(
            v.to_str().unwrap(),
            "attachment; filename=\"Linear_Algebra_Notes.pdf\"; filename*=UTF-8''Linear_Algebra_Notes.pdf"
        );
    }

    #[test]
    fn attachment_header_escapes_unicode_and_quotes() {
        let v = attachment_header("Café \"x\".pdf");
        assert_eq!(
            v.to_str().unwrap(),
            "attachment; filename=\"Caf_ _x_.pdf\"; filename*=UTF-8''Caf%C3%A9%20%22x%22.pdf"
        );
    }

    #[test]
    fn content_types() {
        assert_eq!(content_type("a.PDF"), "application/pdf");
        assert_eq!(content_type("a.txt"), "application/octet-stream");
    }
}
