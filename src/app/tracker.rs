//! Two-phase partition of the registered URLs.

use crate::utils::url::normalize;
use rustc_hash::FxHashSet;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TrackerError {
    #[error("dependent urls are not registered routes: {}", .0.join(", "))]
    UnknownDependents(Vec<String>),
}

type UrlSource = Box<dyn Fn() -> Vec<String> + Send + Sync>;

/// Tracks which routes have to be generated after all the others.
///
/// Generation runs in two stages: every independent URL first, then the
/// dependent ones, e.g. an index page reading files other pages wrote.
pub struct Tracker {
    all_urls: UrlSource,
    dependent_urls: FxHashSet<String>,
}

impl Tracker {
    /// `all_urls` is read lazily, so routes registered after the tracker
    /// was created are still seen.
    pub fn new(all_urls: impl Fn() -> Vec<String> + Send + Sync + 'static) -> Self {
        Self {
            all_urls: Box::new(all_urls),
            dependent_urls: FxHashSet::default(),
        }
    }

    /// Move a URL into the second stage.
    pub fn add_dependent_url(&mut self, url: &str) {
        self.dependent_urls.insert(normalize(url).into_owned());
    }

    /// All URLs minus the dependent ones.
    ///
    /// Fails without a partial result if a dependent URL was never
    /// registered.
    pub fn independent_urls(&self) -> Result<Vec<String>, TrackerError> {
        let all_urls = (self.all_urls)();

        let registered: FxHashSet<&str> = all_urls.iter().map(String::as_str).collect();
        let mut unknown: Vec<String> = self
            .dependent_urls
            .iter()
            .filter(|url| !registered.contains(url.as_str()))
            .cloned()
            .collect();
        if !unknown.is_empty() {
            unknown.sort();
            return Err(TrackerError::UnknownDependents(unknown));
        }

        Ok(all_urls
            .into_iter()
            .filter(|url| !self.dependent_urls.contains(url))
            .collect())
    }

    /// URLs given to [`Tracker::add_dependent_url`], sorted.
    pub fn dependent_urls(&self) -> Vec<String> {
        let mut urls: Vec<String> = self.dependent_urls.iter().cloned().collect();
        urls.sort();
        urls
    }
}

impl std::fmt::Debug for Tracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tracker")
            .field("dependent_urls", &self.dependent_urls)
            .finish_non_exhaustive()
    }
}
