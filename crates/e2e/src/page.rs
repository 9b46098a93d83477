//! Page handle

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};
use tracing::debug;

use saucedemo_common::urls;

use crate::driver::Transport;
use crate::error::{E2eError, E2eResult};
use crate::locator::{AriaRole, Locator, LocatorStep};

/// A single tab inside its own browser context.
///
/// Cloning is cheap; every clone drives the same tab.
#[derive(Clone)]
pub struct Page {
    inner: Arc<PageInner>,
}

struct PageInner {
    id: u64,
    transport: Arc<dyn Transport>,
    base_url: String,
    expect_timeout: Duration,
}

impl Page {
    pub fn new(
        id: u64,
        transport: Arc<dyn Transport>,
        base_url: String,
        expect_timeout: Duration,
    ) -> Self {
        Self {
            inner: Arc::new(PageInner {
                id,
                transport,
                base_url,
                expect_timeout,
            }),
        }
    }

    pub fn id(&self) -> u64 {
        self.inner.id
    }

    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Default timeout for web-first assertions
    pub fn expect_timeout(&self) -> Duration {
        self.inner.expect_timeout
    }

    /// Absolute URL for a route path on the target site
    pub fn resolve(&self, path: &str) -> String {
        urls::absolute(&self.inner.base_url, path)
    }

    /// Send a page-scoped request to the driver
    pub(crate) async fn call(&self, method: &str, mut params: Value) -> E2eResult<Value> {
        if let Value::Object(map) = &mut params {
            map.insert("page".to_string(), json!(self.inner.id));
        }
        self.inner.transport.call(method, params).await
    }

    /// Navigate to a route path or absolute URL
    pub async fn goto(&self, path: &str) -> E2eResult<()> {
        let url = self.resolve(path);
        debug!("page #{} goto {}", self.inner.id, url);
        self.call("goto", json!({ "url": url })).await?;
        Ok(())
    }

    /// Current URL
    pub async fn url(&self) -> E2eResult<String> {
        let value = self.call("url", json!({})).await?;
        value
            .as_str()
            .map(String::from)
            .ok_or_else(|| E2eError::Driver(format!("url returned {}", value)))
    }

    /// Wait until the page has navigated to a route path or absolute URL
    pub async fn wait_for_url(&self, path: &str) -> E2eResult<()> {
        self.call("waitForURL", json!({ "url": self.resolve(path) }))
            .await?;
        Ok(())
    }

    /// Run a script in every document before its own scripts
    pub async fn add_init_script(&self, script: &str) -> E2eResult<()> {
        self.call("addInitScript", json!({ "script": script })).await?;
        Ok(())
    }

    /// Write the context's cookies and local storage to `path`
    pub async fn storage_state(&self, path: &Path) -> E2eResult<()> {
        self.call("storageState", json!({ "path": path })).await?;
        Ok(())
    }

    pub async fn screenshot(&self, path: &Path, full_page: bool) -> E2eResult<PathBuf> {
        self.call(
            "screenshot",
            json!({ "path": path, "fullPage": full_page }),
        )
        .await?;
        Ok(path.to_path_buf())
    }

    /// Close the browser context, saving its trace if one is recording
    pub async fn close(&self, trace_path: Option<&Path>) -> E2eResult<()> {
        self.call("closeContext", json!({ "tracePath": trace_path }))
            .await?;
        Ok(())
    }

    pub fn locator(&self, selector: &str) -> Locator {
        Locator::new(
            self.clone(),
            LocatorStep::Css {
                selector: selector.to_string(),
            },
        )
    }

    pub fn get_by_role(&self, role: AriaRole, name: &str) -> Locator {
        Locator::new(self.clone(), LocatorStep::role(role, name))
    }

    pub fn get_by_text(&self, text: &str) -> Locator {
        Locator::new(self.clone(), LocatorStep::text(text))
    }
}

impl fmt::Debug for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Page")
            .field("id", &self.inner.id)
            .field("base_url", &self.inner.base_url)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::testing::RecordingTransport;
    use std::path::Path;

    #[tokio::test]
    async fn test_goto_resolves_against_base_url() {
        let transport = RecordingTransport::new();
        let page = transport.page();

        page.goto("/inventory.html").await.unwrap();
        page.goto("https://saucelabs.com/").await.unwrap();

        let calls = transport.calls_to("goto");
        assert_eq!(calls[0]["url"], "https://www.saucedemo.com/inventory.html");
        assert_eq!(calls[1]["url"], "https://saucelabs.com/");
        assert_eq!(calls[0]["page"], page.id());
    }

    #[tokio::test]
    async fn test_url_reads_string() {
        let transport = RecordingTransport::new();
        transport.reply("url", serde_json::json!("https://www.saucedemo.com/cart.html"));
        let page = transport.page();

        assert_eq!(
            page.url().await.unwrap(),
            "https://www.saucedemo.com/cart.html"
        );
    }

    #[tokio::test]
    async fn test_close_passes_trace_path() {
        let transport = RecordingTransport::new();
        let page = transport.page();

        page.close(Some(Path::new("test-results/trace.zip")))
            .await
            .unwrap();
        page.close(None).await.unwrap();

        let calls = transport.calls_to("closeContext");
        assert_eq!(calls[0]["tracePath"], "test-results/trace.zip");
        assert!(calls[1]["tracePath"].is_null());
    }
}
