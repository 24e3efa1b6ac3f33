//! Logging utilities with colored output.
//!
//! This module provides:
//! - `log!` macro for formatted terminal output with colored prefixes
//! - `debug!` macro, only printed with `--verbose`
//! - [`Log`], a cloneable structured handle carried by route contexts and tasks
//!
//! # Example
//!
//! ```ignore
//! // Simple logging
//! log!("build"; "writing {} files", count);
//!
//! // Structured handle
//! let log = Log::new("task").with_field("url", "/about");
//! log.error("write failed");
//! ```

use crossterm::{
    execute,
    terminal::{Clear, ClearType},
};
use owo_colors::{OwoColorize, Stream, Style};
use parking_lot::Mutex;
use std::{
    borrow::Cow,
    fmt,
    io::{Write, stdout},
    sync::Arc,
    sync::atomic::{AtomicBool, Ordering},
};

/// Global verbose flag (set by --verbose CLI argument)
static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Set verbose mode globally
pub fn set_verbose(v: bool) {
    VERBOSE.store(v, Ordering::SeqCst);
}

/// Check if verbose mode is enabled
pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::SeqCst)
}

// ============================================================================
// Log Macro
// ============================================================================

/// Log a message with a colored module prefix
///
/// # Usage
/// ```ignore
/// log!("module"; "message with {} formatting", args);
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Log a debug message (only shown when --verbose is enabled)
///
/// # Usage
/// ```ignore
/// debug!("module"; "debug info: {}", value);
/// ```
#[macro_export]
macro_rules! debug {
    ($module:expr; $($arg:tt)*) => {{
        if $crate::logger::is_verbose() {
            $crate::logger::log($module, &format!($($arg)*))
        }
    }};
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Log a message with a colored module prefix
#[inline]
pub fn log(module: &str, message: &str) {
    let module_lower = module.to_ascii_lowercase();
    let prefix = colorize_prefix(module, &module_lower);
    write_line(&prefix, message);
}

fn write_line(prefix: &str, message: &str) {
    let mut stdout = stdout().lock();
    execute!(stdout, Clear(ClearType::UntilNewLine)).ok();
    writeln!(stdout, "{prefix} {message}").ok();
    stdout.flush().ok();
}

/// Apply color to a module prefix based on module type
#[inline]
fn colorize_prefix(module: &str, module_lower: &str) -> String {
    let style = match module_lower {
        "serve" | "files" => Style::new().bright_blue().bold(),
        "build" | "generate" => Style::new().bright_green().bold(),
        "error" => Style::new().bright_red().bold(),
        _ => Style::new().bright_yellow().bold(),
    };
    paint(&format!("[{module}]"), style)
}

/// Style `text` for stdout, honouring `--color` and TTY detection.
fn paint(text: &str, style: Style) -> String {
    text.if_supports_color(Stream::Stdout, |t| t.style(style))
        .to_string()
}

// ============================================================================
// Structured Log Handle
// ============================================================================

/// Severity of a [`Log`] record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

/// A single record captured by [`LogCapture`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub level: Level,
    pub module: String,
    pub message: String,
    pub fields: Vec<(&'static str, String)>,
}

impl Record {
    /// Value of the first field named `key`.
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Clone)]
enum Sink {
    Terminal,
    Null,
    Capture(Arc<Mutex<Vec<Record>>>),
}

/// Cloneable structured log handle.
///
/// Fields are kept in insertion order; a field added later with the same key
/// shadows the earlier one on output but both are retained.
#[derive(Clone)]
pub struct Log {
    module: Cow<'static, str>,
    fields: Vec<(&'static str, String)>,
    sink: Sink,
}

impl Log {
    /// Handle printing to the terminal under `[module]`.
    pub fn new(module: impl Into<Cow<'static, str>>) -> Self {
        Self {
            module: module.into(),
            fields: Vec::new(),
            sink: Sink::Terminal,
        }
    }

    /// Handle that drops every record.
    pub fn null() -> Self {
        Self {
            module: Cow::Borrowed("null"),
            fields: Vec::new(),
            sink: Sink::Null,
        }
    }

    /// Handle recording into memory, for assertions in tests.
    pub fn capture(module: impl Into<Cow<'static, str>>) -> (Self, LogCapture) {
        let records = Arc::new(Mutex::new(Vec::new()));
        let log = Self {
            module: module.into(),
            fields: Vec::new(),
            sink: Sink::Capture(Arc::clone(&records)),
        };
        (log, LogCapture(records))
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn fields(&self) -> &[(&'static str, String)] {
        &self.fields
    }

    /// Copy of this handle with one more field.
    pub fn with_field(&self, key: &'static str, value: impl fmt::Display) -> Self {
        let mut log = self.clone();
        log.fields.push((key, value.to_string()));
        log
    }

    pub fn debug(&self, message: impl fmt::Display) {
        self.emit(Level::Debug, message.to_string());
    }

    pub fn info(&self, message: impl fmt::Display) {
        self.emit(Level::Info, message.to_string());
    }

    pub fn warn(&self, message: impl fmt::Display) {
        self.emit(Level::Warn, message.to_string());
    }

    pub fn error(&self, message: impl fmt::Display) {
        self.emit(Level::Error, message.to_string());
    }

    fn emit(&self, level: Level, message: String) {
        match &self.sink {
            Sink::Null => {}
            Sink::Capture(records) => records.lock().push(Record {
                level,
                module: self.module.to_string(),
                message,
                fields: self.fields.clone(),
            }),
            Sink::Terminal => {
                if level == Level::Debug && !is_verbose() {
                    return;
                }
                let prefix = match level {
                    Level::Error => paint(&format!("[{}]", self.module), Style::new().bright_red().bold()),
                    Level::Warn => paint(&format!("[{}]", self.module), Style::new().yellow().bold()),
                    _ => colorize_prefix(&self.module, &self.module.to_ascii_lowercase()),
                };
                write_line(&prefix, &self.render(&message));
            }
        }
    }

    fn render(&self, message: &str) -> String {
        if self.fields.is_empty() {
            return message.to_string();
        }
        let fields = self
            .fields
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join(" ");
        format!("{message} {}", paint(&fields, Style::new().dimmed()))
    }
}

impl fmt::Debug for Log {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Log")
            .field("module", &self.module)
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}

/// Records collected by a [`Log::capture`] handle and all its clones.
#[derive(Clone)]
pub struct LogCapture(Arc<Mutex<Vec<Record>>>);

impl LogCapture {
    pub fn records(&self) -> Vec<Record> {
        self.0.lock().clone()
    }

    /// Records at `level` or above.
    pub fn at_least(&self, level: Level) -> Vec<Record> {
        self.0
            .lock()
            .iter()
            .filter(|r| r.level >= level)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_field_does_not_touch_original() {
        let (log, _) = Log::capture("test");
        let enriched = log.with_field("url", "/about");

        assert!(log.fields().is_empty());
        assert_eq!(enriched.fields(), &[("url", "/about".to_string())]);
    }

    #[test]
    fn test_capture_shared_across_clones() {
        let (log, capture) = Log::capture("test");
        log.info("first");
        log.with_field("k", 1).error("second");

        let records = capture.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].level, Level::Info);
        assert_eq!(records[1].field("k"), Some("1"));
        assert_eq!(capture.at_least(Level::Error).len(), 1);
    }

    #[test]
    fn test_null_drops_records() {
        let log = Log::null();
        log.error("nothing");
        assert_eq!(log.module(), "null");
    }

    #[test]
    fn test_render_fields() {
        owo_colors::set_override(false);
        let log = Log::new("task").with_field("url", "/").with_field("type", "task");
        assert_eq!(log.render("done"), "done url=/ type=task");
    }

    #[test]
    fn test_color_never_strips_styles() {
        owo_colors::set_override(false);
        assert_eq!(colorize_prefix("build", "build"), "[build]");
        assert_eq!(colorize_prefix("Serve", "serve"), "[Serve]");
        assert_eq!(paint("url=/", Style::new().dimmed()), "url=/");
    }
}
