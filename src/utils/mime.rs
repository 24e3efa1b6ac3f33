//! Content types by file extension.
//!
//! Route content types and served-file content types both resolve here.

use std::path::Path;

/// Content types the routers and the file server hand out.
pub mod types {
    pub const HTML: &str = "text/html; charset=utf-8";
    pub const PLAIN: &str = "text/plain; charset=utf-8";
    pub const CSS: &str = "text/css; charset=utf-8";
    pub const JAVASCRIPT: &str = "text/javascript; charset=utf-8";
    pub const JSON: &str = "application/json";
    pub const XML: &str = "application/xml";
    pub const RSS: &str = "application/rss+xml";
    pub const ATOM: &str = "application/atom+xml";
    pub const OCTET_STREAM: &str = "application/octet-stream";
}

/// Extension table, matched case-insensitively.
const EXTENSIONS: &[(&[&str], &str)] = &[
    (&["html", "htm"], types::HTML),
    (&["txt"], types::PLAIN),
    (&["css"], types::CSS),
    (&["js", "mjs"], types::JAVASCRIPT),
    (&["json", "map"], types::JSON),
    (&["xml"], types::XML),
    (&["rss"], types::RSS),
    (&["atom"], types::ATOM),
    (&["svg"], "image/svg+xml"),
    (&["png"], "image/png"),
    (&["jpg", "jpeg"], "image/jpeg"),
    (&["gif"], "image/gif"),
    (&["webp"], "image/webp"),
    (&["ico"], "image/x-icon"),
    (&["woff"], "font/woff"),
    (&["woff2"], "font/woff2"),
    (&["pdf"], "application/pdf"),
    (&["wasm"], "application/wasm"),
];

/// Look up the MIME type for an extension, `None` when unknown.
pub fn lookup(ext: &str) -> Option<&'static str> {
    EXTENSIONS
        .iter()
        .find(|(exts, _)| exts.iter().any(|e| e.eq_ignore_ascii_case(ext)))
        .map(|&(_, mime)| mime)
}

/// Content type a route pattern implies by its extension.
///
/// Empty when the pattern has no extension or the extension is unknown;
/// handlers are expected to set one themselves in that case.
pub fn for_pattern(pattern: &str) -> &'static str {
    Path::new(pattern)
        .extension()
        .and_then(|e| e.to_str())
        .and_then(lookup)
        .unwrap_or("")
}

/// Guess MIME type of a file on disk, falling back to octet-stream.
pub fn from_path(path: &Path) -> &'static str {
    path.extension()
        .and_then(|e| e.to_str())
        .and_then(lookup)
        .unwrap_or(types::OCTET_STREAM)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_from_path() {
        assert_eq!(from_path(&PathBuf::from("index.html")), types::HTML);
        assert_eq!(from_path(&PathBuf::from("style.css")), types::CSS);
        assert_eq!(from_path(&PathBuf::from("app.js")), types::JAVASCRIPT);
        assert_eq!(from_path(&PathBuf::from("logo.PNG")), "image/png");
        assert_eq!(from_path(&PathBuf::from("unknown.xyz")), types::OCTET_STREAM);
        assert_eq!(from_path(&PathBuf::from("noext")), types::OCTET_STREAM);
    }

    #[test]
    fn test_for_pattern() {
        assert_eq!(for_pattern("/robots.txt"), types::PLAIN);
        assert_eq!(for_pattern("/feed.atom"), types::ATOM);
        assert_eq!(for_pattern("/files/deep.txt"), types::PLAIN);
        assert_eq!(for_pattern("/about"), "");
        assert_eq!(for_pattern("/something.fakeext"), "");
    }
}
