//! SauceDemo E2E Framework
//!
//! Rust-controlled browser testing on top of Playwright:
//! - Drives a persistent Node.js Playwright process over line-delimited JSON
//! - Exposes pages, lazily resolved locators and web-first assertions
//! - Injects page objects into tests through typed, per-test fixtures
//! - Persists an authenticated session once and reuses it across workers
//! - Runs projects with dependencies, parallel workers and retries
//! - Reports to the log, a JSON summary and Allure result files
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    TestRunner (Rust)                        │
//! │    ├── plan(projects) -> ordered, filtered tests            │
//! │    ├── worker N: BrowserLauncher::launch() (once, lazily)   │
//! │    └── per attempt: TestContext -> hooks -> body -> teardown│
//! ├─────────────────────────────────────────────────────────────┤
//! │  TestContext                                                │
//! │    ├── page()        -> PageFactory::new_page(options)      │
//! │    ├── fixture::<T>  -> T::setup(&page), cached per test    │
//! │    └── request()     -> ApiRequest (reqwest)                │
//! ├─────────────────────────────────────────────────────────────┤
//! │  PlaywrightDriver (node driver.js)                          │
//! │    {"id", "method", "params"} -> {"id", "result"|"error"}   │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod auth;
pub mod browser;
pub mod driver;
pub mod error;
pub mod expect;
pub mod fixture;
pub mod locator;
pub mod page;
pub mod report;
pub mod request;
pub mod runner;
pub mod target;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use auth::StorageState;
pub use browser::{BrowserLauncher, ContextOptions, PageFactory, PlaywrightLauncher};
pub use driver::{DriverConfig, PlaywrightDriver, Transport};
pub use error::{E2eError, E2eResult};
pub use expect::{expect, expect_page, UrlMatcher};
pub use fixture::{Attachment, Fixture, TestContext, TestInfo};
pub use locator::{AriaRole, Locator};
pub use page::Page;
pub use report::{AllureReporter, JsonReporter, ListReporter, Reporter};
pub use request::{ApiRequest, ApiResponse};
pub use runner::{
    BoxFuture, Expectation, Project, RunOptions, RunReport, Suite, TestCase, TestResult,
    TestRunner, TestStatus,
};
