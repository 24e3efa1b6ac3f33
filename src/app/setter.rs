//! The seam between [`App`](super::App) and the site's own code.

use super::Tracker;
use crate::router::Router;
use anyhow::Result;
use std::path::Path;

/// Sets the routes of a site and tells the host where its assets live.
pub trait Setter {
    /// Read the site's own settings, the `[content]` table of the config.
    ///
    /// Called once by [`App::new`](super::App::new), before any routes are
    /// set. Sites without settings keep the default.
    fn configure(&mut self, content: &toml::Table) -> Result<()> {
        let _ = content;
        Ok(())
    }

    /// Register every route on `router`.
    ///
    /// Called once per run against whichever router the mode needs. URLs
    /// that read files written by other routes go on `tracker` as dependent.
    fn set_routes<R: Router>(&self, router: &mut R, tracker: &mut Tracker) -> Result<()>;

    /// URL prefix of all assets, served from [`Setter::generated_assets_path`]
    /// in host mode.
    fn assets_url(&self) -> &str;

    /// Local directory of the generated assets.
    fn generated_assets_path(&self) -> &Path;
}
