//! Registration-time validation shared by both routers.
//!
//! Every pattern is treated as a path on disk: `/a/b` implies a folder `/a`,
//! so `/a` can not also be a route (a file) on the same router.

use crate::utils::url::parent_dirs;
use parking_lot::RwLock;
use rustc_hash::FxHashSet;
use std::sync::Arc;
use thiserror::Error;

/// Router configuration and lookup errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RouteError {
    #[error("{0} is a duplicate route")]
    Duplicate(String),

    #[error("{url} can not be both a file and the folder of {other}")]
    FolderCollision { url: String, other: String },

    #[error("url not found: {0}")]
    NotFound(String),
}

#[derive(Default)]
struct Inner {
    routes: FxHashSet<String>,
    folders: FxHashSet<String>,
}

/// Registered patterns and the folders they imply.
///
/// Cloning shares the same underlying table, which lets a tracker read the
/// final URL set after all routes are in.
#[derive(Clone, Default)]
pub struct Registry {
    inner: Arc<RwLock<Inner>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and record a normalized pattern.
    pub fn register(&self, url: &str) -> Result<(), RouteError> {
        let mut inner = self.inner.write();

        if inner.routes.contains(url) {
            return Err(RouteError::Duplicate(url.to_string()));
        }
        // a leaf where a folder already is
        if inner.folders.contains(url) {
            let other = inner
                .routes
                .iter()
                .find(|route| parent_dirs(route).contains(&url))
                .cloned()
                .unwrap_or_default();
            return Err(RouteError::FolderCollision {
                url: url.to_string(),
                other,
            });
        }
        // a folder where a leaf already is
        let dirs = parent_dirs(url);
        if let Some(dir) = dirs.iter().find(|dir| inner.routes.contains(**dir)) {
            return Err(RouteError::FolderCollision {
                url: (*dir).to_string(),
                other: url.to_string(),
            });
        }

        inner.folders.extend(dirs.into_iter().map(str::to_string));
        inner.routes.insert(url.to_string());
        Ok(())
    }

    pub fn urls(&self) -> Vec<String> {
        self.inner.read().routes.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register_all(urls: &[&str]) -> Result<(), RouteError> {
        let registry = Registry::new();
        registry.register("/")?;
        for url in urls {
            registry.register(url)?;
        }
        Ok(())
    }

    #[test]
    fn test_duplicate() {
        let registry = Registry::new();
        registry.register("/about").unwrap();
        assert_eq!(
            registry.register("/about"),
            Err(RouteError::Duplicate("/about".to_string()))
        );
    }

    #[test]
    fn test_folder_collisions() {
        let cases: &[(&[&str], bool)] = &[
            (&["/blah"], true),
            (&["/blah", "/haha.atom"], true),
            (&["/blah", "/blah/haha.atom"], false),
            (&["/blah/haha.atom", "/blah"], false),
            (&["/blah", "/blah/haha"], false),
            (&["/blah/haha", "/blah"], false),
            (&["/blah/he", "/blah/haha.atom"], true),
            (&["/blah/he", "/blah/haha.atom", "/blah/wa.txt"], true),
            (&["/blah/he", "/blah/he/ni.atom"], false),
            (&["/blah/he/ni.atom", "/blah/he"], false),
            (&["/blah/he", "/blah/he/ni"], false),
            (&["/blah/he/ni", "/blah/he"], false),
            (&["/a", "/a/b/c"], false),
            (&["/a/b/c", "/a"], false),
        ];

        for (index, (urls, ok)) in cases.iter().enumerate() {
            let result = register_all(urls);
            assert_eq!(result.is_ok(), *ok, "case {index}: {urls:?} -> {result:?}");
            if let Err(err) = result {
                assert!(matches!(err, RouteError::FolderCollision { .. }));
            }
        }
    }

    #[test]
    fn test_collision_message_names_both_paths() {
        let registry = Registry::new();
        registry.register("/blah/he/ni").unwrap();
        let err = registry.register("/blah/he").unwrap_err();
        assert_eq!(
            err.to_string(),
            "/blah/he can not be both a file and the folder of /blah/he/ni"
        );
    }

    #[test]
    fn test_failed_registration_leaves_table_untouched() {
        let registry = Registry::new();
        registry.register("/a").unwrap();
        assert!(registry.register("/a/b").is_err());

        assert_eq!(registry.urls(), vec!["/a".to_string()]);
        assert!(registry.register("/c").is_ok());
        assert_eq!(registry.urls().len(), 2);
    }

    #[test]
    fn test_clones_share_table() {
        let registry = Registry::new();
        let view = registry.clone();
        registry.register("/late").unwrap();
        assert_eq!(view.urls(), ["/late"]);
    }
}
