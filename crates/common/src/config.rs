//! Suite configuration
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! environment variables. The binary applies its CLI flags last.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::constants::urls;
use crate::error::{Error, Result};

/// Suite configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SuiteConfig {
    /// Origin of the storefront under test
    pub base_url: String,

    /// Browser engine
    pub browser: BrowserKind,

    /// Run without a visible window
    pub headless: bool,

    /// Browser viewport
    pub viewport: Viewport,

    /// Parallel workers (None = half the available cores)
    pub workers: Option<usize>,

    /// Retries for a failing test
    pub retries: u32,

    /// Fail the run if any test is focused with `only`
    pub forbid_only: bool,

    /// Timeouts
    pub timeouts: Timeouts,

    /// When to record a Playwright trace
    pub trace: TraceMode,

    /// When to capture a screenshot
    pub screenshot: ScreenshotMode,

    /// Where the authentication bootstrap persists the session
    pub auth_file: PathBuf,

    /// Directory for screenshots, traces and the JSON summary
    pub output_dir: PathBuf,

    /// Directory for Allure result files
    pub allure_dir: PathBuf,

    /// `node_modules` directory that provides Playwright
    pub node_modules: PathBuf,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            base_url: urls::BASE.to_string(),
            browser: BrowserKind::Chromium,
            headless: true,
            viewport: Viewport::default(),
            workers: None,
            retries: 0,
            forbid_only: false,
            timeouts: Timeouts::default(),
            trace: TraceMode::OnFirstRetry,
            screenshot: ScreenshotMode::OnlyOnFailure,
            auth_file: PathBuf::from(".auth/user.json"),
            output_dir: PathBuf::from("test-results"),
            allure_dir: PathBuf::from("allure-results"),
            node_modules: PathBuf::from("node_modules"),
        }
    }
}

/// Browser viewport dimensions (Desktop Chrome profile)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

/// Timeouts in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timeouts {
    pub test_ms: u64,
    pub expect_ms: u64,
    pub navigation_ms: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            test_ms: 30_000,
            expect_ms: 5_000,
            navigation_ms: 30_000,
        }
    }
}

impl Timeouts {
    pub fn test(&self) -> Duration {
        Duration::from_millis(self.test_ms)
    }

    pub fn expect(&self) -> Duration {
        Duration::from_millis(self.expect_ms)
    }

    pub fn navigation(&self) -> Duration {
        Duration::from_millis(self.navigation_ms)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserKind {
    #[default]
    Chromium,
    Firefox,
    Webkit,
}

impl BrowserKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BrowserKind::Chromium => "chromium",
            BrowserKind::Firefox => "firefox",
            BrowserKind::Webkit => "webkit",
        }
    }
}

impl std::str::FromStr for BrowserKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "chromium" | "chrome" => Ok(BrowserKind::Chromium),
            "firefox" => Ok(BrowserKind::Firefox),
            "webkit" | "safari" => Ok(BrowserKind::Webkit),
            other => Err(Error::InvalidConfig(format!("unknown browser: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TraceMode {
    Off,
    On,
    #[default]
    OnFirstRetry,
    RetainOnFailure,
}

impl TraceMode {
    /// Whether tracing must be recording for the given attempt (0 = first run).
    pub fn records(&self, retry: u32) -> bool {
        match self {
            TraceMode::Off => false,
            TraceMode::On | TraceMode::RetainOnFailure => true,
            TraceMode::OnFirstRetry => retry == 1,
        }
    }

    /// Whether a recorded trace is kept once the attempt finished.
    pub fn keeps(&self, retry: u32, failed: bool) -> bool {
        match self {
            TraceMode::Off => false,
            TraceMode::On => true,
            TraceMode::OnFirstRetry => retry == 1,
            TraceMode::RetainOnFailure => failed,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScreenshotMode {
    Off,
    On,
    #[default]
    OnlyOnFailure,
}

impl ScreenshotMode {
    pub fn captures(&self, failed: bool) -> bool {
        match self {
            ScreenshotMode::Off => false,
            ScreenshotMode::On => true,
            ScreenshotMode::OnlyOnFailure => failed,
        }
    }
}

impl SuiteConfig {
    /// Load configuration from file, falling back to defaults when absent
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Self = toml::from_str(&content)?;
            debug!("Loaded configuration from {}", path.display());
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Apply overrides from the process environment
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup.
    ///
    /// A non-empty `CI` switches to retries=2, a single worker and
    /// `forbid_only`, matching what CI runs expect.
    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let set = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if set("CI").is_some() {
            self.retries = 2;
            self.workers = Some(1);
            self.forbid_only = true;
        }

        if let Some(url) = set("SAUCEDEMO_BASE_URL") {
            self.base_url = url;
        }
        if let Some(browser) = set("SAUCEDEMO_BROWSER") {
            self.browser = browser.parse()?;
        }
        if set("HEADED").is_some() {
            self.headless = false;
        }
        if let Some(workers) = set("SAUCEDEMO_WORKERS") {
            let n = workers.parse::<usize>().map_err(|_| {
                Error::InvalidConfig(format!("SAUCEDEMO_WORKERS is not a number: {}", workers))
            })?;
            self.workers = Some(n);
        }

        Ok(())
    }

    /// Check invariants the runner relies on
    pub fn validate(&self) -> Result<()> {
        if self.base_url.is_empty() {
            return Err(Error::InvalidConfig("base_url is empty".to_string()));
        }
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(Error::InvalidConfig(format!(
                "base_url must be http(s): {}",
                self.base_url
            )));
        }
        if self.workers == Some(0) {
            return Err(Error::InvalidConfig("workers must be at least 1".to_string()));
        }
        let t = &self.timeouts;
        if t.test_ms == 0 || t.expect_ms == 0 || t.navigation_ms == 0 {
            return Err(Error::InvalidConfig("timeouts must be non-zero".to_string()));
        }
        Ok(())
    }

    /// Worker count after resolving the automatic default
    pub fn effective_workers(&self) -> usize {
        self.workers.unwrap_or_else(|| {
            let cores = std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(2);
            (cores / 2).max(1)
        })
    }

    /// Absolute URL for a route path
    pub fn url(&self, path: &str) -> String {
        urls::absolute(&self.base_url, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = SuiteConfig::default();
        assert_eq!(config.base_url, "https://www.saucedemo.com");
        assert_eq!(config.retries, 0);
        assert!(!config.forbid_only);
        assert_eq!(config.trace, TraceMode::OnFirstRetry);
        assert_eq!(config.screenshot, ScreenshotMode::OnlyOnFailure);
        assert_eq!(config.auth_file, PathBuf::from(".auth/user.json"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_ci_profile() {
        let mut config = SuiteConfig::default();
        config.apply_env_from(env(&[("CI", "true")])).unwrap();
        assert_eq!(config.retries, 2);
        assert_eq!(config.workers, Some(1));
        assert!(config.forbid_only);
        assert_eq!(config.effective_workers(), 1);
    }

    #[test]
    fn test_empty_ci_is_ignored() {
        let mut config = SuiteConfig::default();
        config.apply_env_from(env(&[("CI", "")])).unwrap();
        assert_eq!(config.retries, 0);
        assert!(config.workers.is_none());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = SuiteConfig::default();
        config
            .apply_env_from(env(&[
                ("SAUCEDEMO_BASE_URL", "http://localhost:3000"),
                ("SAUCEDEMO_BROWSER", "firefox"),
                ("HEADED", "1"),
                ("SAUCEDEMO_WORKERS", "3"),
            ]))
            .unwrap();
        assert_eq!(config.base_url, "http://localhost:3000");
        assert_eq!(config.browser, BrowserKind::Firefox);
        assert!(!config.headless);
        assert_eq!(config.effective_workers(), 3);
    }

    #[test]
    fn test_bad_workers_env() {
        let mut config = SuiteConfig::default();
        let err = config
            .apply_env_from(env(&[("SAUCEDEMO_WORKERS", "many")]))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = SuiteConfig::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.base_url, urls::BASE);
    }

    #[test]
    fn test_load_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("saucedemo.toml");
        std::fs::write(
            &path,
            r#"
base_url = "http://127.0.0.1:8080"
retries = 1
trace = "retain-on-failure"

[viewport]
width = 1920
height = 1080

[timeouts]
expect_ms = 10000
"#,
        )
        .unwrap();

        let config = SuiteConfig::load(&path).unwrap();
        assert_eq!(config.base_url, "http://127.0.0.1:8080");
        assert_eq!(config.retries, 1);
        assert_eq!(config.trace, TraceMode::RetainOnFailure);
        assert_eq!(config.viewport.width, 1920);
        assert_eq!(config.timeouts.expect_ms, 10_000);
        assert_eq!(config.timeouts.test_ms, 30_000);
        assert_eq!(config.browser, BrowserKind::Chromium);
    }

    #[test]
    fn test_validate_rejects() {
        let mut config = SuiteConfig::default();
        config.workers = Some(0);
        assert!(config.validate().is_err());

        let mut config = SuiteConfig::default();
        config.base_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());

        let mut config = SuiteConfig::default();
        config.timeouts.expect_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_trace_modes() {
        assert!(!TraceMode::OnFirstRetry.records(0));
        assert!(TraceMode::OnFirstRetry.records(1));
        assert!(!TraceMode::OnFirstRetry.records(2));
        assert!(TraceMode::RetainOnFailure.records(0));
        assert!(!TraceMode::RetainOnFailure.keeps(0, false));
        assert!(TraceMode::RetainOnFailure.keeps(0, true));
        assert!(!TraceMode::Off.records(1));
    }

    #[test]
    fn test_screenshot_modes() {
        assert!(ScreenshotMode::OnlyOnFailure.captures(true));
        assert!(!ScreenshotMode::OnlyOnFailure.captures(false));
        assert!(ScreenshotMode::On.captures(false));
        assert!(!ScreenshotMode::Off.captures(true));
    }

    #[test]
    fn test_browser_parse() {
        assert_eq!("Chrome".parse::<BrowserKind>().unwrap(), BrowserKind::Chromium);
        assert_eq!("webkit".parse::<BrowserKind>().unwrap(), BrowserKind::Webkit);
        assert!("opera".parse::<BrowserKind>().is_err());
    }
}
