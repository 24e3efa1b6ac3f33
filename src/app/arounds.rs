//! Around-handlers installed on every router by [`App`](super::App).

use crate::router::{Context, Next, Router};
use anyhow::Result;
use std::time::Instant;

/// Value of the `type` field set on route logs.
pub const LOG_ROUTE_TYPE: &str = "routes";

/// Install the default around-handler: tags the context log with the route
/// and times the inner call.
pub fn set_default_arounds<R: Router>(router: &mut R) {
    router.around(log_route);
}

fn log_route(ctx: &mut Context, next: Next<'_>) -> Result<()> {
    let log = ctx.log().with_field("type", LOG_ROUTE_TYPE).with_field("url", ctx.url());
    ctx.set_log(log);
    ctx.log().debug("Running route");

    let start = Instant::now();
    let result = next.run(ctx);

    let log = ctx.log().with_field("duration", format!("{:?}", start.elapsed()));
    match &result {
        Ok(()) => log.info("Success for route"),
        Err(err) => log.error(format_args!("Error for route - {err:#}")),
    }
    result
}
