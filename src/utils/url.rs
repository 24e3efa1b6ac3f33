//! URL path helpers shared by the routers, tracker and generator.
//!
//! Only the path part of a URL is handled here; routes are flat strings
//! such as `/`, `/about` or `/files/feed.atom`.

use std::borrow::Cow;

/// The root URL, generated as `index.html`.
pub const ROOT_URL: &str = "/";

/// Ensure a URL starts with `/`. An empty string becomes the root.
///
/// # Examples
/// ```
/// use rstatic::utils::url::normalize;
/// assert_eq!(normalize("about"), "/about");
/// assert_eq!(normalize("/about"), "/about");
/// assert_eq!(normalize(""), "/");
/// ```
pub fn normalize(url: &str) -> Cow<'_, str> {
    if url.starts_with('/') {
        Cow::Borrowed(url)
    } else {
        Cow::Owned(format!("/{url}"))
    }
}

/// Every folder a URL implies on disk, nearest first, excluding the root.
///
/// # Examples
/// ```
/// use rstatic::utils::url::parent_dirs;
/// assert_eq!(parent_dirs("/a/b/c.txt"), vec!["/a/b", "/a"]);
/// assert!(parent_dirs("/a").is_empty());
/// ```
pub fn parent_dirs(url: &str) -> Vec<&str> {
    let mut dirs = Vec::new();
    let mut current = url.trim_end_matches('/');
    while let Some(pos) = current.rfind('/') {
        current = &current[..pos];
        if current.is_empty() {
            break;
        }
        dirs.push(current);
    }
    dirs
}

/// Strip query string and fragment, then percent-decode.
pub fn request_path(raw: &str) -> String {
    use percent_encoding::percent_decode_str;

    let path = raw.split(['?', '#']).next().unwrap_or(raw);
    percent_decode_str(path)
        .decode_utf8()
        .map(Cow::into_owned)
        .unwrap_or_else(|_| path.to_string())
}

/// Whether any segment of a path is a parent-directory reference.
pub fn has_parent_segment(path: &str) -> bool {
    path.split(['/', '\\']).any(|segment| segment == "..")
}
