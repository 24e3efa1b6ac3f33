//! Dual-mode routing.
//!
//! Routes are registered once on a [`Router`] and dispatched either in
//! process ([`GenerateRouter`], used to write the static site) or over HTTP
//! ([`WebRouter`], used to preview it live). Both run the same handlers,
//! the same content-type resolution and the same around-handler chain.
//!
//! ```text
//! Router::around(..)       ─┐
//! Router::get_html(..)      ├─ registration (validated by Registry)
//! Router::get(..)          ─┘
//!
//! Requester::get(url) ─→ Context ─→ around₁ ─→ around₂ ─→ handler
//!                                 ←─────────←─────────←─ Response
//! ```
//!
//! Only flat patterns are matched: no parameters or wildcards.

mod around;
mod context;
mod generate;
mod registry;
pub mod web;


pub use around::Next;
pub use context::Context;
pub use generate::{GenerateRequester, GenerateRouter};
pub use registry::{Registry, RouteError};
pub use web::{WebRequester, WebRouter};

pub use crate::utils::url::ROOT_URL;

use crate::utils::mime::{self, types};
use crate::utils::url::normalize;
use anyhow::Result;
use std::sync::Arc;

/// Handler producing the response of one route.
pub type ContextHandler = Arc<dyn Fn(&mut Context) -> Result<()> + Send + Sync>;

/// Middleware wrapping every dispatch. Call [`Next::run`] to continue inward.
pub type AroundHandler = Arc<dyn Fn(&mut Context, Next<'_>) -> Result<()> + Send + Sync>;

/// A registered (pattern, content type, handler) triple.
#[derive(Clone)]
pub struct Route {
    pattern: String,
    content_type: String,
    handler: ContextHandler,
}

impl Route {
    pub fn new<H>(pattern: &str, content_type: &str, handler: H) -> Self
    where
        H: Fn(&mut Context) -> Result<()> + Send + Sync + 'static,
    {
        Self {
            pattern: normalize(pattern).into_owned(),
            content_type: content_type.to_string(),
            handler: Arc::new(handler),
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub(crate) fn handler(&self) -> &ContextHandler {
        &self.handler
    }
}

impl std::fmt::Debug for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Route")
            .field("pattern", &self.pattern)
            .field("content_type", &self.content_type)
            .finish_non_exhaustive()
    }
}

/// Response given by all routers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub body: Vec<u8>,
    pub mime_type: String,
}

impl Response {
    pub fn new(body: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            body,
            mime_type: mime_type.into(),
        }
    }
}

/// Turns "give me the response for URL X" into a router-specific call.
///
/// URLs are normalized to start with `/` before lookup.
pub trait Requester: Send + Sync {
    fn get(&self, url: &str) -> Result<Response>;
}

/// Interface for all routers.
///
/// Implementors supply storage and dispatch; the registration helpers are
/// shared so content-type resolution cannot drift between the two modes.
pub trait Router {
    type Requester<'a>: Requester
    where
        Self: 'a;

    /// Append an around-handler. The first one added is the outermost.
    fn add_around(&mut self, around: AroundHandler);

    /// Store a route after validating it against the registry.
    fn add_route(&mut self, route: Route) -> Result<(), RouteError>;

    /// Patterns and implied folders registered so far.
    fn registry(&self) -> &Registry;

    /// Requester making requests against this router.
    fn requester(&self) -> Self::Requester<'_>;

    /// A callback/handler that is called around all routes
    fn around<F>(&mut self, around: F)
    where
        F: Fn(&mut Context, Next<'_>) -> Result<()> + Send + Sync + 'static,
    {
        self.add_around(Arc::new(around));
    }

    /// Define a HTML handler for the root URL `/`
    fn get_root_html<H>(&mut self, handler: H) -> Result<(), RouteError>
    where
        H: Fn(&mut Context) -> Result<()> + Send + Sync + 'static,
    {
        self.add_route(Route::new(ROOT_URL, types::HTML, handler))
    }

    /// Define a HTML handler given a pattern
    fn get_html<H>(&mut self, pattern: &str, handler: H) -> Result<(), RouteError>
    where
        H: Fn(&mut Context) -> Result<()> + Send + Sync + 'static,
    {
        self.add_route(Route::new(pattern, types::HTML, handler))
    }

    /// Define a handler for any file type given a pattern.
    ///
    /// The content type comes from the pattern's extension and is empty
    /// when it cannot be resolved.
    fn get<H>(&mut self, pattern: &str, handler: H) -> Result<(), RouteError>
    where
        H: Fn(&mut Context) -> Result<()> + Send + Sync + 'static,
    {
        let content_type = mime::for_pattern(pattern);
        self.add_route(Route::new(pattern, content_type, handler))
    }

    /// Every registered pattern, in no particular order.
    fn urls(&self) -> Vec<String> {
        self.registry().urls()
    }
}
