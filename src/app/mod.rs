//! Glues a site's routes together to generate files concurrently or host
//! them in a server.
//!
//! Generation runs in two stages: [`Tracker::independent_urls`] first, then
//! [`Tracker::dependent_urls`]. The second stage starts only after every
//! task of the first has finished.

mod arounds;
mod generator;
mod setter;
mod tracker;

pub use arounds::{LOG_ROUTE_TYPE, set_default_arounds};
pub use generator::{BatchReport, Generator};
pub use setter::Setter;
pub use tracker::{Tracker, TrackerError};

use crate::config::SiteConfig;
use crate::logger::Log;
use crate::router::web::{BoundServer, serve_dir};
use crate::router::{GenerateRouter, Router, WebRouter};
use anyhow::{Context, Result, bail};
use std::fs;
use std::time::Instant;

/// Outcome of a full generation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerateReport {
    pub independent: BatchReport,
    pub dependent: BatchReport,
}

impl GenerateReport {
    pub fn failed(&self) -> usize {
        self.independent.failed + self.dependent.failed
    }
}

/// Runs a [`Setter`]'s routes in one of three modes: generate, host, or
/// serve the generated files.
pub struct App<S> {
    setter: S,
    config: SiteConfig,
    log: Log,
}

impl<S: Setter> App<S> {
    /// Hand the config's `[content]` table to the setter and build the app.
    pub fn new(mut setter: S, config: SiteConfig, log: Log) -> Result<Self> {
        setter
            .configure(&config.content)
            .context("failed to configure site from [content]")?;
        Ok(Self {
            setter,
            config,
            log,
        })
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    /// Generate the static web pages concurrently.
    ///
    /// Per-url failures are logged and counted, not returned. The run only
    /// errors when the routes themselves are inconsistent, or when
    /// `build.fail_fast` is set and the independent stage had failures.
    pub fn generate(&self) -> Result<GenerateReport> {
        let start = Instant::now();
        let build = &self.config.build;

        fs::create_dir_all(&build.output)
            .with_context(|| format!("failed to create {}", build.output.display()))?;

        let mut router = GenerateRouter::new(self.log.clone());
        let tracker = self.set_routes(&mut router)?;
        let independent_urls = tracker.independent_urls()?;
        let dependent_urls = tracker.dependent_urls();

        let requester = router.requester();
        let generator = Generator::new(&build.output, &requester, build.concurrency, self.log.clone());

        let independent = generator.generate(&independent_urls);
        self.log_batch("independent", independent);
        if independent.failed > 0 && build.fail_fast {
            bail!(
                "{} independent url(s) failed, skipping {} dependent url(s)",
                independent.failed,
                dependent_urls.len()
            );
        }

        let dependent = generator.generate(&dependent_urls);
        self.log_batch("dependent", dependent);

        self.log
            .info(format_args!("Build generated in {:?}", start.elapsed()));
        Ok(GenerateReport {
            independent,
            dependent,
        })
    }

    /// Run a web application server that computes the route responses in
    /// real time. Blocks until Ctrl+C.
    pub fn host(&self) -> Result<()> {
        self.bind_host()?.run()
    }

    /// Build the host mode router and bind its socket.
    pub fn bind_host(&self) -> Result<BoundServer<WebRouter>> {
        let serve = &self.config.serve;
        let mut router = WebRouter::new(serve.interface, serve.port, self.log.clone());
        router.file_serve(self.setter.assets_url(), self.setter.generated_assets_path());
        self.set_routes(&mut router)?;
        router.bind()
    }

    /// Run the server hosting the generated files. Blocks until Ctrl+C.
    pub fn run_file_server(&self) -> Result<()> {
        let serve = &self.config.serve;
        serve_dir(
            &self.config.build.output,
            serve.interface,
            serve.file_server_port,
            self.log.clone(),
        )
    }

    fn set_routes<R: Router>(&self, router: &mut R) -> Result<Tracker> {
        set_default_arounds(router);

        let registry = router.registry().clone();
        let mut tracker = Tracker::new(move || registry.urls());
        self.setter
            .set_routes(router, &mut tracker)
            .context("failed to set routes")?;
        Ok(tracker)
    }

    fn log_batch(&self, stage: &str, report: BatchReport) {
        let log = self.log.with_field("stage", stage);
        let message = format!("{} of {} url(s) generated", report.succeeded(), report.total);
        if report.failed > 0 {
            log.warn(message);
        } else {
            log.info(message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::{Context as RouteContext, Requester, RouteError};
    use parking_lot::Mutex;
    use std::path::{Path, PathBuf};
    use std::sync::Arc;
    use tempfile::TempDir;

    #[derive(Default)]
    struct TestSite {
        pages: Vec<&'static str>,
        dependents: Vec<&'static str>,
        broken: Vec<&'static str>,
        events: Arc<Mutex<Vec<String>>>,
        assets: PathBuf,
    }

    impl TestSite {
        fn events(&self) -> Vec<String> {
            self.events.lock().clone()
        }
    }

    impl Setter for TestSite {
        fn configure(&mut self, content: &toml::Table) -> Result<()> {
            if let Some(pages) = content.get("pages") {
                let pages = pages.as_array().context("pages must be an array")?;
                for page in pages {
                    let page = page.as_str().context("pages must hold strings")?;
                    self.pages.push(Box::leak(page.to_string().into_boxed_str()));
                }
            }
            Ok(())
        }

        fn set_routes<R: Router>(&self, router: &mut R, tracker: &mut Tracker) -> Result<()> {
            let handler = |events: Arc<Mutex<Vec<String>>>, fail: bool| {
                move |ctx: &mut RouteContext| -> Result<()> {
                    events.lock().push(format!("start {}", ctx.url()));
                    if fail {
                        bail!("{} is broken", ctx.url());
                    }
                    let body = if ctx.url() == "/" { "root".to_string() } else { ctx.url().to_string() };
                    ctx.respond(body);
                    events.lock().push(format!("end {}", ctx.url()));
                    Ok(())
                }
            };

            router.get_root_html(handler(Arc::clone(&self.events), false))?;
            for page in &self.pages {
                router.get_html(page, handler(Arc::clone(&self.events), false))?;
            }
            for page in &self.broken {
                router.get_html(page, handler(Arc::clone(&self.events), true))?;
            }
            for url in &self.dependents {
                tracker.add_dependent_url(url);
            }
            Ok(())
        }

        fn assets_url(&self) -> &str {
            "/assets"
        }

        fn generated_assets_path(&self) -> &Path {
            &self.assets
        }
    }

    fn app(site: TestSite, output: &Path) -> App<TestSite> {
        let mut config = SiteConfig::default();
        config.build.output = output.to_path_buf();
        config.build.concurrency = 4;
        config.serve.port = 0;
        App::new(site, config, Log::null()).unwrap()
    }

    fn position(events: &[String], event: &str) -> usize {
        events
            .iter()
            .position(|e| e == event)
            .unwrap_or_else(|| panic!("{event} missing from {events:?}"))
    }

    #[test]
    fn test_generate_end_to_end() {
        let out = TempDir::new().unwrap();
        let site = TestSite {
            pages: vec!["/about"],
            dependents: vec!["/about"],
            ..Default::default()
        };
        let app = app(site, out.path());

        let report = app.generate().unwrap();

        assert_eq!(fs::read_to_string(out.path().join("index.html")).unwrap(), "root");
        assert_eq!(fs::read_to_string(out.path().join("about")).unwrap(), "/about");
        assert_eq!(report.independent, BatchReport { total: 1, failed: 0 });
        assert_eq!(report.dependent, BatchReport { total: 1, failed: 0 });

        let events = app.setter.events();
        assert!(position(&events, "end /") < position(&events, "start /about"));
    }

    #[test]
    fn test_generate_dependent_urls_run_last() {
        let cases: &[&[bool]] = &[
            &[true],
            &[false],
            &[true, false, true, false, false],
            &[false, true, false, true, true],
            &[false, true, true, false],
        ];

        for is_second in cases {
            let out = TempDir::new().unwrap();
            let mut site = TestSite::default();
            for (i, second) in is_second.iter().enumerate() {
                let url: &'static str = if *second {
                    Box::leak(format!("/second-{i}").into_boxed_str())
                } else {
                    Box::leak(format!("/first-{i}").into_boxed_str())
                };
                site.pages.push(url);
                if *second {
                    site.dependents.push(url);
                }
            }
            let app = app(site, out.path());
            app.generate().unwrap();

            let starts: Vec<_> = app
                .setter
                .events()
                .into_iter()
                .filter_map(|e| e.strip_prefix("start ").map(str::to_string))
                .collect();
            assert_eq!(starts.len(), is_second.len() + 1);

            let first_second = starts.iter().position(|u| u.starts_with("/second"));
            if let Some(index) = first_second {
                assert!(
                    starts[index..].iter().all(|u| u.starts_with("/second")),
                    "{is_second:?}: {starts:?}"
                );
            }
        }
    }

    #[test]
    fn test_generate_nested_folders() {
        let out = TempDir::new().unwrap();
        let site = TestSite {
            pages: vec![
                "/fold/me",
                "/fold/me_again",
                "/fold/go.json",
                "/fold/deeper/in.txt",
                "/fold/deeper/out",
            ],
            ..Default::default()
        };
        let app = app(site, out.path());
        app.generate().unwrap();

        for page in ["fold/me", "fold/me_again", "fold/go.json", "fold/deeper/in.txt", "fold/deeper/out"] {
            let body = fs::read_to_string(out.path().join(page)).unwrap();
            assert_eq!(body, format!("/{page}"));
        }
    }

    #[test]
    fn test_generate_continues_after_failures() {
        let out = TempDir::new().unwrap();
        let site = TestSite {
            pages: vec!["/ok", "/index"],
            broken: vec!["/broken"],
            dependents: vec!["/index"],
            ..Default::default()
        };
        let app = app(site, out.path());

        let report = app.generate().unwrap();
        assert_eq!(report.independent, BatchReport { total: 3, failed: 1 });
        assert_eq!(report.failed(), 1);
        assert!(out.path().join("ok").is_file());
        assert!(out.path().join("index").is_file());
        assert!(!out.path().join("broken").exists());
    }

    #[test]
    fn test_generate_fail_fast() {
        let out = TempDir::new().unwrap();
        let site = TestSite {
            pages: vec!["/index"],
            broken: vec!["/broken"],
            dependents: vec!["/index"],
            ..Default::default()
        };
        let mut app = app(site, out.path());
        app.config.build.fail_fast = true;

        let err = app.generate().unwrap_err();
        assert!(err.to_string().contains("skipping 1 dependent url(s)"));
        assert!(!out.path().join("index").exists());
        assert!(out.path().join("index.html").is_file());
    }

    #[test]
    fn test_generate_unknown_dependent_aborts() {
        let out = TempDir::new().unwrap();
        let site = TestSite {
            dependents: vec!["/nobody"],
            ..Default::default()
        };
        let app = app(site, out.path());

        let err = app.generate().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<TrackerError>(),
            Some(TrackerError::UnknownDependents(urls)) if urls == &["/nobody"]
        ));
        assert!(app.setter.events().is_empty());
        assert!(!out.path().join("index.html").exists());
    }

    #[test]
    fn test_duplicate_route_fails_setup() {
        let out = TempDir::new().unwrap();
        let site = TestSite {
            pages: vec!["/twice", "/twice"],
            ..Default::default()
        };
        let app = app(site, out.path());

        let err = app.generate().unwrap_err();
        assert_eq!(
            err.root_cause().downcast_ref::<RouteError>(),
            Some(&RouteError::Duplicate("/twice".to_string()))
        );
    }

    #[test]
    fn test_content_configures_site() {
        let out = TempDir::new().unwrap();
        let mut config = crate::config::test_parse_config("[content]\npages = [\"/from-config\"]");
        config.build.output = out.path().to_path_buf();

        let app = App::new(TestSite::default(), config, Log::null()).unwrap();
        app.generate().unwrap();
        assert_eq!(
            fs::read_to_string(out.path().join("from-config")).unwrap(),
            "/from-config"
        );
    }

    #[test]
    fn test_bad_content_fails_construction() {
        let config = crate::config::test_parse_config("[content]\npages = 3");
        let err = App::new(TestSite::default(), config, Log::null()).err().unwrap();
        assert!(format!("{err:#}").contains("pages must be an array"));
    }

    #[test]
    fn test_host_serves_routes_and_assets() {
        let out = TempDir::new().unwrap();
        let assets = TempDir::new().unwrap();
        fs::write(assets.path().join("app.css"), "body{}").unwrap();
        let site = TestSite {
            pages: vec!["/about"],
            assets: assets.path().to_path_buf(),
            ..Default::default()
        };
        let app = app(site, out.path());

        let server = app.bind_host().unwrap().spawn().unwrap();
        let requester = server.requester();

        let response = requester.get("/").unwrap();
        assert_eq!(response.body, b"root");
        assert_eq!(response.mime_type, crate::utils::mime::types::HTML);
        assert_eq!(requester.get("about").unwrap().body, b"/about");
        assert_eq!(requester.get("/assets/app.css").unwrap().body, b"body{}");
        assert!(requester.get("/missing").is_err());

        server.shutdown().unwrap();
    }
}
