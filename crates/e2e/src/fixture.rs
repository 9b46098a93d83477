//! Fixtures and the per-test context
//!
//! A test body receives a [`TestContext`] and pulls what it needs from it:
//! the browser page, the HTTP request client or any page object implementing
//! [`Fixture`]. Everything is created on first use and cached for the rest of
//! the attempt, so asking for `InventoryPage` twice yields the same instance.
//!
//! The context owns the browser context behind the page. The runner tears it
//! down after the attempt, capturing screenshots and traces as configured.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::Serialize;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

use saucedemo_common::{ScreenshotMode, TraceMode};

use crate::browser::{ContextOptions, PageFactory};
use crate::error::{E2eError, E2eResult};
use crate::page::Page;
use crate::request::ApiRequest;

/// A value built from the test's page, at most once per test attempt
#[async_trait]
pub trait Fixture: Clone + Send + Sync + 'static {
    async fn setup(page: &Page) -> E2eResult<Self>;
}

#[async_trait]
impl Fixture for Page {
    async fn setup(page: &Page) -> E2eResult<Self> {
        Ok(page.clone())
    }
}

/// Identity of the running test attempt
#[derive(Debug, Clone, Serialize)]
pub struct TestInfo {
    pub project: String,
    pub suite: String,
    pub title: String,
    pub tags: Vec<String>,

    /// 0 for the first attempt
    pub retry: u32,

    /// Per-attempt artifact directory
    pub output_dir: PathBuf,
}

impl TestInfo {
    pub fn full_title(&self) -> String {
        if self.suite.is_empty() {
            self.title.clone()
        } else {
            format!("{} › {}", self.suite, self.title)
        }
    }

    /// File-system friendly name: lowercase words joined by dashes
    pub fn slug(&self) -> String {
        slugify(&format!("{} {}", self.suite, self.title))
    }
}

pub(crate) fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug.truncate(80);
    slug
}

/// A file produced while running a test
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attachment {
    pub name: String,
    pub path: PathBuf,
    pub content_type: String,
}

type FixtureSlot = Arc<OnceCell<Box<dyn Any + Send + Sync>>>;
type FixtureCache = HashMap<TypeId, FixtureSlot>;

/// Resources of one test attempt
pub struct TestContext {
    info: TestInfo,
    factory: Option<Arc<dyn PageFactory>>,
    options: ContextOptions,
    page: OnceCell<Page>,
    fixtures: Mutex<FixtureCache>,
    request: ApiRequest,
    attachments: Mutex<Vec<Attachment>>,
}

impl TestContext {
    /// `factory` is `None` for projects that run without a browser
    pub fn new(
        info: TestInfo,
        factory: Option<Arc<dyn PageFactory>>,
        options: ContextOptions,
        request: ApiRequest,
    ) -> Self {
        Self {
            info,
            factory,
            options,
            page: OnceCell::new(),
            fixtures: Mutex::new(HashMap::new()),
            request,
            attachments: Mutex::new(Vec::new()),
        }
    }

    pub fn info(&self) -> &TestInfo {
        &self.info
    }

    /// HTTP client bound to the target's base URL
    pub fn request(&self) -> &ApiRequest {
        &self.request
    }

    /// The test's page, opening a fresh browser context on first use
    pub async fn page(&self) -> E2eResult<Page> {
        let page = self
            .page
            .get_or_try_init(|| async {
                let factory = self.factory.as_ref().ok_or_else(|| {
                    E2eError::Fixture(format!(
                        "project '{}' runs without a browser; no page available",
                        self.info.project
                    ))
                })?;
                factory.new_page(&self.options).await
            })
            .await?;
        Ok(page.clone())
    }

    /// Get the test's instance of `T`, creating it on first request.
    ///
    /// Concurrent requests for the same type wait for a single `setup`.
    pub async fn fixture<T: Fixture>(&self) -> E2eResult<T> {
        let slot = self
            .fixtures
            .lock()
            .entry(TypeId::of::<T>())
            .or_default()
            .clone();

        let value = slot
            .get_or_try_init(|| async {
                let page = self.page().await?;
                let created = T::setup(&page).await?;
                debug!("Fixture {} ready", std::any::type_name::<T>());
                Ok::<Box<dyn Any + Send + Sync>, E2eError>(Box::new(created))
            })
            .await?;

        value.downcast_ref::<T>().cloned().ok_or_else(|| {
            E2eError::Fixture(format!(
                "cached fixture has the wrong type: {}",
                std::any::type_name::<T>()
            ))
        })
    }

    /// Record a file to ship with the test result
    pub fn attach(&self, name: &str, path: &Path, content_type: &str) {
        self.attachments.lock().push(Attachment {
            name: name.to_string(),
            path: path.to_path_buf(),
            content_type: content_type.to_string(),
        });
    }

    /// Capture artifacts and close the browser context.
    ///
    /// Errors are logged, never returned: a teardown problem must not hide
    /// the test's own outcome.
    pub async fn teardown(
        self,
        failed: bool,
        screenshot: ScreenshotMode,
        trace: TraceMode,
    ) -> Vec<Attachment> {
        let TestContext {
            info,
            page,
            fixtures,
            attachments,
            options,
            ..
        } = self;

        drop(fixtures);
        let mut attachments = attachments.into_inner();

        let page = match page.into_inner() {
            Some(page) => page,
            None => return attachments,
        };

        let needs_dir = screenshot.captures(failed)
            || (options.trace && trace.keeps(info.retry, failed));
        if needs_dir {
            if let Err(e) = std::fs::create_dir_all(&info.output_dir) {
                warn!("Cannot create {}: {}", info.output_dir.display(), e);
            }
        }

        if screenshot.captures(failed) {
            let name = if failed { "test-failed-1.png" } else { "test-finished-1.png" };
            let path = info.output_dir.join(name);
            match page.screenshot(&path, false).await {
                Ok(path) => attachments.push(Attachment {
                    name: "screenshot".to_string(),
                    path,
                    content_type: "image/png".to_string(),
                }),
                Err(e) => warn!("Screenshot for '{}' failed: {}", info.title, e),
            }
        }

        let trace_path = if options.trace && trace.keeps(info.retry, failed) {
            Some(info.output_dir.join("trace.zip"))
        } else {
            None
        };

        match page.close(trace_path.as_deref()).await {
            Ok(()) => {
                if let Some(path) = trace_path {
                    attachments.push(Attachment {
                        name: "trace".to_string(),
                        path,
                        content_type: "application/zip".to_string(),
                    });
                }
            }
            Err(e) => warn!("Closing context for '{}' failed: {}", info.title, e),
        }

        attachments
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{RecordingFactory, RecordingTransport};
    use saucedemo_common::SuiteConfig;
    use std::time::Duration;

    #[derive(Clone)]
    struct Counted {
        page_id: u64,
    }

    #[async_trait]
    impl Fixture for Counted {
        async fn setup(page: &Page) -> E2eResult<Self> {
            page.add_init_script("window.counted = true").await?;
            Ok(Self { page_id: page.id() })
        }
    }

    fn info(dir: &Path, retry: u32) -> TestInfo {
        TestInfo {
            project: "e2e".to_string(),
            suite: "Shopping Cart".to_string(),
            title: "Add single item to cart @smoke".to_string(),
            tags: vec!["@smoke".to_string()],
            retry,
            output_dir: dir.to_path_buf(),
        }
    }

    fn context(
        transport: &Arc<RecordingTransport>,
        dir: &Path,
        retry: u32,
        trace: bool,
    ) -> TestContext {
        let factory: Arc<dyn PageFactory> = RecordingFactory::new(transport.clone());
        let mut options = ContextOptions::from_suite(&SuiteConfig::default());
        options.trace = trace;
        let request = ApiRequest::new("http://127.0.0.1:9", Duration::from_secs(1)).unwrap();
        TestContext::new(info(dir, retry), Some(factory), options, request)
    }

    #[tokio::test]
    async fn test_fixture_is_created_once_per_test() {
        let transport = RecordingTransport::new();
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(&transport, dir.path(), 0, false);

        let a = ctx.fixture::<Counted>().await.unwrap();
        let b = ctx.fixture::<Counted>().await.unwrap();
        assert_eq!(a.page_id, b.page_id);

        // one browser context, one setup
        assert_eq!(transport.calls_to("newContext").len(), 1);
        assert_eq!(transport.calls_to("addInitScript").len(), 1);
    }

    /// Yields mid-setup so concurrent requests overlap
    #[derive(Clone)]
    struct Yielding;

    #[async_trait]
    impl Fixture for Yielding {
        async fn setup(page: &Page) -> E2eResult<Self> {
            page.add_init_script("window.yielding = true").await?;
            tokio::task::yield_now().await;
            Ok(Self)
        }
    }

    #[tokio::test]
    async fn test_concurrent_requests_share_one_setup() {
        let transport = RecordingTransport::new();
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(&transport, dir.path(), 0, false);

        let (a, b) = tokio::join!(ctx.fixture::<Yielding>(), ctx.fixture::<Yielding>());
        a.unwrap();
        b.unwrap();

        assert_eq!(transport.calls_to("addInitScript").len(), 1);
        assert_eq!(transport.calls_to("newContext").len(), 1);
    }

    #[tokio::test]
    async fn test_failed_setup_is_retried_on_next_request() {
        let transport = RecordingTransport::new();
        transport.fail("addInitScript", E2eError::Driver("page crashed".to_string()));
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(&transport, dir.path(), 0, false);

        assert!(ctx.fixture::<Counted>().await.is_err());
        assert!(ctx.fixture::<Counted>().await.is_ok());
        assert_eq!(transport.calls_to("addInitScript").len(), 2);
    }

    #[tokio::test]
    async fn test_page_is_shared_between_fixtures() {
        let transport = RecordingTransport::new();
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(&transport, dir.path(), 0, false);

        let page = ctx.page().await.unwrap();
        let counted = ctx.fixture::<Counted>().await.unwrap();
        let same = ctx.fixture::<Page>().await.unwrap();
        assert_eq!(counted.page_id, page.id());
        assert_eq!(same.id(), page.id());
    }

    #[tokio::test]
    async fn test_no_browser_project_has_no_page() {
        let dir = tempfile::tempdir().unwrap();
        let request = ApiRequest::new("http://127.0.0.1:9", Duration::from_secs(1)).unwrap();
        let ctx = TestContext::new(
            info(dir.path(), 0),
            None,
            ContextOptions::from_suite(&SuiteConfig::default()),
            request,
        );

        let err = ctx.page().await.unwrap_err();
        assert!(matches!(err, E2eError::Fixture(_)));
        assert!(ctx
            .teardown(true, ScreenshotMode::OnlyOnFailure, TraceMode::On)
            .await
            .is_empty());
    }

    #[tokio::test]
    async fn test_teardown_screenshots_failures_only() {
        let transport = RecordingTransport::new();
        let dir = tempfile::tempdir().unwrap();

        let ctx = context(&transport, dir.path(), 0, false);
        ctx.page().await.unwrap();
        let passed = ctx
            .teardown(false, ScreenshotMode::OnlyOnFailure, TraceMode::Off)
            .await;
        assert!(passed.is_empty());

        let ctx = context(&transport, dir.path(), 0, false);
        ctx.page().await.unwrap();
        let failed = ctx
            .teardown(true, ScreenshotMode::OnlyOnFailure, TraceMode::Off)
            .await;
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].path, dir.path().join("test-failed-1.png"));
        assert_eq!(transport.calls_to("screenshot").len(), 1);
        assert_eq!(transport.calls_to("closeContext").len(), 2);
    }

    #[tokio::test]
    async fn test_trace_kept_on_first_retry() {
        let transport = RecordingTransport::new();
        let dir = tempfile::tempdir().unwrap();

        let ctx = context(&transport, dir.path(), 1, true);
        ctx.page().await.unwrap();
        let attachments = ctx
            .teardown(true, ScreenshotMode::Off, TraceMode::OnFirstRetry)
            .await;

        assert_eq!(attachments.len(), 1);
        assert_eq!(attachments[0].name, "trace");
        let close = &transport.calls_to("closeContext")[0];
        assert_eq!(
            close["tracePath"],
            dir.path().join("trace.zip").to_str().unwrap()
        );
    }

    #[tokio::test]
    async fn test_teardown_survives_close_errors() {
        let transport = RecordingTransport::new();
        transport.fail("closeContext", E2eError::Driver("gone".to_string()));
        let dir = tempfile::tempdir().unwrap();

        let ctx = context(&transport, dir.path(), 0, false);
        ctx.attach("log", &dir.path().join("log.txt"), "text/plain");
        ctx.page().await.unwrap();
        let attachments = ctx
            .teardown(false, ScreenshotMode::Off, TraceMode::Off)
            .await;
        assert_eq!(attachments.len(), 1);
    }

    #[test]
    fn test_slug_and_full_title() {
        let dir = PathBuf::from("out");
        let info = info(&dir, 0);
        assert_eq!(info.full_title(), "Shopping Cart › Add single item to cart @smoke");
        assert_eq!(info.slug(), "shopping-cart-add-single-item-to-cart-smoke");
        assert_eq!(slugify("  Checkout validation - missing zip code "), "checkout-validation-missing-zip-code");
    }
}
