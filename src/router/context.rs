//! Per-dispatch request/response state.

use super::Response;
use crate::logger::Log;

/// The Context object provided for every route.
///
/// One is created per dispatch and handed by `&mut` through every
/// around-handler to the route handler, so changes made on the way in
/// (log fields, content type) are seen by everything further down and by
/// the same around-handler once the inner call returns.
#[derive(Debug)]
pub struct Context {
    url: String,
    content_type: String,
    log: Log,
    response: Option<Vec<u8>>,
}

impl Context {
    pub(crate) fn new(url: &str, content_type: &str, log: Log) -> Self {
        Self {
            url: url.to_string(),
            content_type: content_type.to_string(),
            log,
            response: None,
        }
    }

    /// The URL of the request
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn log(&self) -> &Log {
        &self.log
    }

    /// Replace the log, typically with an enriched copy of [`Context::log`].
    pub fn set_log(&mut self, log: Log) {
        self.log = log;
    }

    /// Only sent as a header when hosting; generated files carry no
    /// content type.
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn set_content_type(&mut self, content_type: impl Into<String>) {
        self.content_type = content_type.into();
    }

    /// Set the response body. Calling again replaces it.
    pub fn respond(&mut self, body: impl Into<Vec<u8>>) {
        self.response = Some(body.into());
    }

    pub fn response(&self) -> Option<&[u8]> {
        self.response.as_deref()
    }

    pub(crate) fn into_response(self) -> Response {
        Response::new(self.response.unwrap_or_default(), self.content_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_respond_replaces() {
        let mut ctx = Context::new("/", "text/html", Log::null());
        assert_eq!(ctx.response(), None);

        ctx.respond("first");
        ctx.respond(b"second".to_vec());
        assert_eq!(ctx.response(), Some(&b"second"[..]));
    }

    #[test]
    fn test_into_response_defaults_to_empty_body() {
        let mut ctx = Context::new("/robots.txt", "", Log::null());
        ctx.set_content_type("text/plain");

        let response = ctx.into_response();
        assert!(response.body.is_empty());
        assert_eq!(response.mime_type, "text/plain");
    }
}
