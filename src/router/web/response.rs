//! HTTP response handlers.

use crate::utils::mime::{self, types::PLAIN};
use anyhow::Result;
use std::{borrow::Cow, fs, path::PathBuf};
use tiny_http::{Header, Request, Response, StatusCode};

/// What a [`Service`](super::Service) wants sent back for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// In-memory body. An empty `content_type` sends no header.
    Body {
        status: u16,
        content_type: String,
        body: Vec<u8>,
    },
    /// Stream a file from disk with status 200.
    File {
        path: PathBuf,
        content_type: &'static str,
    },
}

impl Reply {
    pub fn body(status: u16, content_type: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        Self::Body {
            status,
            content_type: content_type.into(),
            body: body.into(),
        }
    }

    /// Plain text error body.
    pub fn error(status: u16, message: impl Into<String>) -> Self {
        Self::body(status, PLAIN, message.into())
    }

    /// Serve `path`, content type resolved from its extension.
    pub fn file(path: PathBuf) -> Self {
        let content_type = mime::from_path(&path);
        Self::File { path, content_type }
    }

    pub fn status(&self) -> u16 {
        match self {
            Self::Body { status, .. } => *status,
            Self::File { .. } => 200,
        }
    }

    pub fn content_type(&self) -> &str {
        match self {
            Self::Body { content_type, .. } => content_type,
            Self::File { content_type, .. } => content_type,
        }
    }

    /// Body as text; empty for file replies.
    pub fn text(&self) -> Cow<'_, str> {
        match self {
            Self::Body { body, .. } => String::from_utf8_lossy(body),
            Self::File { .. } => Cow::Borrowed(""),
        }
    }
}

/// Send `reply` over `request`.
pub fn respond(request: Request, reply: Reply) -> Result<()> {
    match reply {
        Reply::Body {
            status,
            content_type,
            body,
        } => {
            let mut response = Response::from_data(body).with_status_code(StatusCode(status));
            if let Some(header) = make_header("Content-Type", &content_type) {
                response = response.with_header(header);
            }
            request.respond(response)?;
        }
        Reply::File { path, content_type } => {
            // The file may vanish between resolution and open
            let Ok(file) = fs::File::open(&path) else {
                return send_plain(request, 404, "404 Not Found");
            };
            let mut response = Response::from_file(file);
            if let Some(header) = make_header("Content-Type", content_type) {
                response = response.with_header(header);
            }
            request.respond(response)?;
        }
    }
    Ok(())
}

/// Respond with 503 Service Unavailable (server shutting down).
pub fn respond_unavailable(request: Request) -> Result<()> {
    send_plain(request, 503, "503 Service Unavailable")
}

fn send_plain(request: Request, status: u16, body: &str) -> Result<()> {
    respond(request, Reply::body(status, PLAIN, body))
}

fn make_header(key: &str, value: &str) -> Option<Header> {
    if value.is_empty() {
        return None;
    }
    Header::from_bytes(key.as_bytes(), value.as_bytes()).ok()
}
