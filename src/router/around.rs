//! Around-handler composition.
//!
//! The chain is a slice walked from the front: each around-handler gets a
//! [`Next`] over the rest of the slice plus the route handler. The first
//! registered handler is therefore the outermost layer.

use super::{AroundHandler, Context, ContextHandler};
use anyhow::Result;

/// Everything inside the current around-handler.
pub struct Next<'a> {
    arounds: &'a [AroundHandler],
    handler: &'a ContextHandler,
}

impl<'a> Next<'a> {
    pub(crate) fn new(arounds: &'a [AroundHandler], handler: &'a ContextHandler) -> Self {
        Self { arounds, handler }
    }

    /// Run the remaining chain against `ctx`.
    pub fn run(self, ctx: &mut Context) -> Result<()> {
        match self.arounds.split_first() {
            Some((around, rest)) => (**around)(ctx, Next::new(rest, self.handler)),
            None => (**self.handler)(ctx),
        }
    }
}

/// Dispatch `handler` through `arounds`; no arounds means a direct call.
pub(crate) fn call_arounds(
    arounds: &[AroundHandler],
    handler: &ContextHandler,
    ctx: &mut Context,
) -> Result<()> {
    Next::new(arounds, handler).run(ctx)
}
