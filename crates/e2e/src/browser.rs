//! Browser sessions and per-test contexts

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use saucedemo_common::{SuiteConfig, Viewport};

use crate::driver::{DriverConfig, PlaywrightDriver, Transport};
use crate::error::{E2eError, E2eResult};
use crate::page::Page;

/// Options for a fresh browser context (one per test attempt)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextOptions {
    pub base_url: String,
    pub viewport: Viewport,

    /// Saved session to start from
    pub storage_state: Option<PathBuf>,

    /// Record a Playwright trace
    pub trace: bool,

    pub navigation_timeout_ms: u64,

    #[serde(skip)]
    pub expect_timeout: Duration,
}

impl ContextOptions {
    pub fn from_suite(config: &SuiteConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            viewport: config.viewport,
            storage_state: None,
            trace: false,
            navigation_timeout_ms: config.timeouts.navigation_ms,
            expect_timeout: config.timeouts.expect(),
        }
    }
}

/// Creates isolated pages on a running browser
#[async_trait]
pub trait PageFactory: Send + Sync {
    async fn new_page(&self, options: &ContextOptions) -> E2eResult<Page>;

    async fn close(&self) -> E2eResult<()>;
}

/// Starts browsers; the runner launches one per worker
#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    async fn launch(&self) -> E2eResult<Arc<dyn PageFactory>>;
}

/// A browser living inside a Playwright driver process
pub struct PlaywrightBrowser {
    driver: Arc<PlaywrightDriver>,
}

#[async_trait]
impl PageFactory for PlaywrightBrowser {
    async fn new_page(&self, options: &ContextOptions) -> E2eResult<Page> {
        let created = self
            .driver
            .call("newContext", serde_json::to_value(options)?)
            .await?;
        let id = created["page"]
            .as_u64()
            .ok_or_else(|| E2eError::Driver(format!("newContext returned no page id: {}", created)))?;

        debug!("Opened page #{} (storage state: {:?})", id, options.storage_state);

        let transport: Arc<dyn Transport> = self.driver.clone();
        Ok(Page::new(
            id,
            transport,
            options.base_url.clone(),
            options.expect_timeout,
        ))
    }

    async fn close(&self) -> E2eResult<()> {
        self.driver.shutdown().await
    }
}

/// Launches Playwright browsers through the node driver
pub struct PlaywrightLauncher {
    config: DriverConfig,
}

impl PlaywrightLauncher {
    pub fn new(config: DriverConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl BrowserLauncher for PlaywrightLauncher {
    async fn launch(&self) -> E2eResult<Arc<dyn PageFactory>> {
        let driver = PlaywrightDriver::spawn(&self.config).await?;
        driver.launch(&self.config).await?;
        Ok(Arc::new(PlaywrightBrowser {
            driver: Arc::new(driver),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_options_wire_format() {
        let mut options = ContextOptions::from_suite(&SuiteConfig::default());
        options.storage_state = Some(PathBuf::from(".auth/user.json"));

        let value = serde_json::to_value(&options).unwrap();
        assert_eq!(value["baseUrl"], "https://www.saucedemo.com");
        assert_eq!(value["viewport"]["width"], 1280);
        assert_eq!(value["storageState"], ".auth/user.json");
        assert_eq!(value["navigationTimeoutMs"], 30_000);
        assert_eq!(value["trace"], false);
        assert!(value.get("expectTimeout").is_none());
    }
}
