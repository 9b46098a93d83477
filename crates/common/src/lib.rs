//! SauceDemo Common Library
//!
//! Fixture inputs shared by every crate in the suite: target URLs, user
//! credentials, the product catalog, expected error messages, checkout test
//! data, and the layered suite configuration.

pub mod config;
pub mod constants;
pub mod error;

pub use config::{BrowserKind, ScreenshotMode, SuiteConfig, TraceMode, Viewport};
pub use constants::{messages, products, test_data, urls, users};
pub use constants::products::Product;
pub use constants::users::Credentials;
pub use error::{Error, Result};

/// Suite version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
