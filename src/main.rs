//! Demo site built on rstatic.
//!
//! `rstatic build` writes it to `./generated`, `rstatic serve` hosts it
//! live and `rstatic files` serves the generated output. The assets
//! directory can be moved with `assets = "..."` under `[content]`.

use anyhow::{Context, Result};
use rstatic::{Router, Setter, Tracker};
use std::path::{Path, PathBuf};

struct DemoSite {
    assets: PathBuf,
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html><head><title>{title}</title>\
         <link rel=\"stylesheet\" href=\"/assets/site.css\"></head>\
         <body><h1>{title}</h1>{body}</body></html>\n"
    )
}

impl Setter for DemoSite {
    fn configure(&mut self, content: &toml::Table) -> Result<()> {
        if let Some(assets) = content.get("assets") {
            let assets = assets.as_str().context("content.assets must be a path")?;
            self.assets = PathBuf::from(assets);
        }
        Ok(())
    }

    fn set_routes<R: Router>(&self, router: &mut R, tracker: &mut Tracker) -> Result<()> {
        router.get_root_html(|ctx| {
            ctx.respond(page("Home", "<p><a href=\"/about\">About</a></p>"));
            Ok(())
        })?;
        router.get_html("/about", |ctx| {
            ctx.log().debug("rendering about page");
            ctx.respond(page("About", "<p>Generated and hosted by the same handlers.</p>"));
            Ok(())
        })?;
        router.get("/robots.txt", |ctx| {
            ctx.respond("User-agent: *\nAllow: /\n");
            Ok(())
        })?;

        // Lists every registered url, so it runs after the rest
        let registry = router.registry().clone();
        router.get("/sitemap.xml", move |ctx| {
            let mut urls = registry.urls();
            urls.sort();
            let entries: String = urls
                .iter()
                .map(|url| format!("  <url><loc>{url}</loc></url>\n"))
                .collect();
            ctx.respond(format!(
                "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
                 <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n{entries}</urlset>\n"
            ));
            Ok(())
        })?;
        tracker.add_dependent_url("/sitemap.xml");

        Ok(())
    }

    fn assets_url(&self) -> &str {
        "/assets"
    }

    fn generated_assets_path(&self) -> &Path {
        &self.assets
    }
}

fn main() -> Result<()> {
    rstatic::cli::run(DemoSite {
        assets: PathBuf::from("./generated/assets"),
    })
}
