//! Request dispatch: `/` lists the results directory, anything else is a
//! file name inside it.

use bytes::Bytes;
use http_body_util::Full;
use hyper::header::{CONTENT_TYPE, HeaderValue};
use hyper::{Response, StatusCode};
use stencil_infrastructure::ResultsDirectory;

use crate::index::render_index;

const HTML: &str = "text/html";
const PLAIN_TEXT: &str = "text/plain; charset=utf-8";

/// Plain-text body for missing or rejected files.
pub const FILE_NOT_FOUND: &str = "File not found";

/// Everything a request handler needs; cheap to share behind an `Arc`.
#[derive(Debug, Clone)]
pub struct ServerState {
    pub results: ResultsDirectory,
    /// `https://<host>:<port>`, used for index links.
    pub base_url: String,
}

impl ServerState {
    pub fn new(results: ResultsDirectory, base_url: impl Into<String>) -> Self {
        Self {
            results,
            base_url: base_url.into(),
        }
    }
}

/// Builds the response for a request path (the URI path, query excluded).
pub async fn respond(state: &ServerState, path: &str) -> Response<Full<Bytes>> {
    let response = if path == "/" {
        index(state).await
    } else {
        file(state, path).await
    };
    tracing::debug!(path, status = response.status().as_u16(), "Request served");
    response
}

async fn index(state: &ServerState) -> Response<Full<Bytes>> {
    match state.results.list().await {
        Ok(names) => html(render_index(&state.base_url, &names).into_bytes()),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to list results directory");
            not_found(format!("Could not read results directory: {}", e))
        }
    }
}

async fn file(state: &ServerState, path: &str) -> Response<Full<Bytes>> {
    let raw = path.strip_prefix('/').unwrap_or(path);
    let name = match urlencoding::decode(raw) {
        Ok(name) => name,
        Err(_) => return not_found(FILE_NOT_FOUND),
    };

    match state.results.read(&name).await {
        Ok(bytes) => html(bytes),
        Err(e) if e.is_invalid_path() => {
            tracing::warn!(path, error = %e, "Rejected request path");
            not_found(FILE_NOT_FOUND)
        }
        Err(e) => {
            tracing::debug!(path, error = %e, "Requested file unavailable");
            not_found(FILE_NOT_FOUND)
        }
    }
}

fn html(body: Vec<u8>) -> Response<Full<Bytes>> {
    with_body(StatusCode::OK, HTML, Bytes::from(body))
}

fn not_found(message: impl Into<String>) -> Response<Full<Bytes>> {
    with_body(StatusCode::NOT_FOUND, PLAIN_TEXT, Bytes::from(message.into()))
}

fn with_body(status: StatusCode, content_type: &'static str, body: Bytes) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(body));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    response
}
