//! In-process router used to generate static files.

use super::around::call_arounds;
use super::{AroundHandler, Context, Registry, Requester, Response, Route, RouteError, Router};
use crate::logger::Log;
use crate::utils::url::normalize;
use anyhow::Result;
use rustc_hash::FxHashMap;

/// GenerateRouter generates static files.
///
/// Content type is respected by the [`Response`], by default resolved from
/// the route pattern's extension or set via [`Context`]. Generated files do
/// NOT carry it; that is an HTTP concern left to whatever uploads them.
pub struct GenerateRouter {
    log: Log,
    registry: Registry,
    routes: FxHashMap<String, Route>,
    arounds: Vec<AroundHandler>,
}

impl GenerateRouter {
    pub fn new(log: Log) -> Self {
        Self {
            log,
            registry: Registry::new(),
            routes: FxHashMap::default(),
            arounds: Vec::new(),
        }
    }

    fn dispatch(&self, url: &str) -> Result<Response> {
        let route = self
            .routes
            .get(url)
            .ok_or_else(|| RouteError::NotFound(url.to_string()))?;

        let mut ctx = Context::new(url, route.content_type(), self.log.clone());
        call_arounds(&self.arounds, route.handler(), &mut ctx)?;
        Ok(ctx.into_response())
    }
}

impl Router for GenerateRouter {
    type Requester<'a> = GenerateRequester<'a>;

    fn add_around(&mut self, around: AroundHandler) {
        self.arounds.push(around);
    }

    fn add_route(&mut self, route: Route) -> Result<(), RouteError> {
        self.registry.register(route.pattern())?;
        self.routes.insert(route.pattern().to_string(), route);
        Ok(())
    }

    fn registry(&self) -> &Registry {
        &self.registry
    }

    fn requester(&self) -> GenerateRequester<'_> {
        GenerateRequester { router: self }
    }
}

/// Makes requests on the [`GenerateRouter`] by calling handlers directly.
#[derive(Clone, Copy)]
pub struct GenerateRequester<'a> {
    router: &'a GenerateRouter,
}

impl Requester for GenerateRequester<'_> {
    fn get(&self, url: &str) -> Result<Response> {
        self.router.dispatch(&normalize(url))
    }
}
