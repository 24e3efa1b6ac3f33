//! Bounded-concurrency executor for a batch of fallible jobs.
//!
//! A [`Pool`] starts a fixed number of workers that pull [`Task`]s from one
//! shared queue until it is drained, then waits for all of them. A failing
//! (or panicking) job only marks its own task; nothing is retried and no
//! sibling is cancelled.

use crate::logger::Log;
use anyhow::{Result, anyhow};
use crossbeam::channel;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::thread;

type Job<'a> = Box<dyn FnOnce() -> Result<()> + Send + 'a>;

/// One unit of work and, once run, its outcome.
pub struct Task<'a> {
    log: Log,
    job: Option<Job<'a>>,
    error: Option<anyhow::Error>,
}

impl<'a> Task<'a> {
    pub fn new<F>(log: Log, job: F) -> Self
    where
        F: FnOnce() -> Result<()> + Send + 'a,
    {
        Self {
            log,
            job: Some(Box::new(job)),
            error: None,
        }
    }

    pub fn log(&self) -> &Log {
        &self.log
    }

    /// Error recorded by the job, if it failed.
    pub fn error(&self) -> Option<&anyhow::Error> {
        self.error.as_ref()
    }

    /// Whether the job has been executed.
    pub fn is_done(&self) -> bool {
        self.job.is_none()
    }

    fn execute(&mut self) {
        let Some(job) = self.job.take() else {
            return;
        };
        let outcome = panic::catch_unwind(AssertUnwindSafe(job))
            .unwrap_or_else(|payload| Err(anyhow!("task panicked: {}", panic_message(&*payload))));
        self.error = outcome.err();
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "unknown panic"
    }
}

/// A batch of tasks and the number of workers to run them with.
pub struct Pool<'a> {
    tasks: Vec<Task<'a>>,
    concurrency: usize,
}

impl<'a> Pool<'a> {
    /// Concurrency 0 runs with a single worker.
    pub fn new(tasks: Vec<Task<'a>>, concurrency: usize) -> Self {
        Self {
            tasks,
            concurrency: concurrency.max(1),
        }
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Run every task, blocking until all of them have finished.
    pub fn run(&mut self) {
        let workers = self.concurrency;
        let (tx, rx) = channel::unbounded::<&mut Task<'a>>();
        for task in &mut self.tasks {
            // receiver is alive, unbounded send can not fail
            let _ = tx.send(task);
        }
        drop(tx);

        thread::scope(|scope| {
            for _ in 0..workers {
                let rx = rx.clone();
                scope.spawn(move || {
                    for task in rx {
                        task.execute();
                    }
                });
            }
        });
    }

    pub fn tasks(&self) -> &[Task<'a>] {
        &self.tasks
    }

    /// Tasks whose job returned an error.
    pub fn each_error(&self) -> impl Iterator<Item = &Task<'a>> {
        self.tasks.iter().filter(|task| task.error.is_some())
    }
}
