//! Turns a URL batch into file-writing tasks run on a [`Pool`].

use crate::logger::Log;
use crate::pool::{Pool, Task};
use crate::router::{ROOT_URL, Requester};
use anyhow::{Context, Result};
use parking_lot::RwLock;
use rustc_hash::FxHashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Outcome of one generated batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub total: usize,
    pub failed: usize,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.total - self.failed
    }
}

/// Writes the response of every URL under `output`.
pub struct Generator<'r, R: ?Sized> {
    output: PathBuf,
    requester: &'r R,
    concurrency: usize,
    log: Log,
    /// Directories known to exist
    dirs: RwLock<FxHashSet<PathBuf>>,
}

impl<'r, R: Requester + ?Sized> Generator<'r, R> {
    pub fn new(output: impl Into<PathBuf>, requester: &'r R, concurrency: usize, log: Log) -> Self {
        Self {
            output: output.into(),
            requester,
            concurrency,
            log,
            dirs: RwLock::new(FxHashSet::default()),
        }
    }

    /// File a URL is written to. The root URL becomes `index.html`.
    pub fn output_path(&self, url: &str) -> PathBuf {
        if url == ROOT_URL {
            return self.output.join("index.html");
        }
        self.output.join(url.trim_start_matches('/'))
    }

    /// Run one task per URL and log every failure. Never aborts early.
    pub fn generate(&self, urls: &[String]) -> BatchReport {
        let tasks = urls.iter().map(|url| self.url_task(url)).collect();
        let mut pool = Pool::new(tasks, self.concurrency);
        self.log.debug(format_args!(
            "Generating {} url(s) with {} worker(s)",
            urls.len(),
            pool.concurrency()
        ));
        pool.run();

        let mut failed = 0;
        for task in pool.each_error() {
            failed += 1;
            if let Some(err) = task.error() {
                task.log().error(format_args!("Error for task - {err:#}"));
            }
        }
        BatchReport {
            total: urls.len(),
            failed,
        }
    }

    fn url_task<'a>(&'a self, url: &'a str) -> Task<'a> {
        let log = self.log.with_field("type", "task").with_field("url", url);
        let task_log = log.clone();

        Task::new(log, move || {
            let response = self.requester.get(url)?;
            let path = self.output_path(url);
            if let Some(dir) = path.parent() {
                self.ensure_dir(dir)?;
            }

            task_log.info(format_args!("Writing response into {}", path.display()));
            fs::write(&path, &response.body)
                .with_context(|| format!("failed to write {}", path.display()))
        })
    }

    fn ensure_dir(&self, dir: &Path) -> Result<()> {
        if self.dirs.read().contains(dir) {
            return Ok(());
        }
        // Two workers may race here; create_dir_all succeeds if it exists
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create directory {}", dir.display()))?;
        self.dirs.write().insert(dir.to_path_buf());
        Ok(())
    }
}
