//! Error types for E2E testing

use thiserror::Error;

#[derive(Error, Debug)]
pub enum E2eError {
    #[error("Driver failed to start: {0}")]
    DriverStartup(String),

    #[error("Playwright not found. Install with: npm install && npx playwright install")]
    PlaywrightNotFound,

    #[error("Playwright error: {0}")]
    Driver(String),

    #[error("Assertion failed: {0}")]
    AssertionFailed(String),

    #[error("Timeout waiting for: {0}")]
    Timeout(String),

    #[error("Target {url} unreachable after {attempts} attempts")]
    TargetUnreachable { url: String, attempts: usize },

    #[error("Storage state error: {0}")]
    StorageState(String),

    #[error("Fixture error: {0}")]
    Fixture(String),

    #[error("Runner error: {0}")]
    Runner(String),

    #[error("Invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] saucedemo_common::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl E2eError {
    /// Shorthand for a failed expectation raised from Rust code
    pub fn assertion(message: impl Into<String>) -> Self {
        E2eError::AssertionFailed(message.into())
    }
}

pub type E2eResult<T> = Result<T, E2eError>;

/// Fail the current test unless `cond` holds.
///
/// Plain-value counterpart to the browser assertions in [`crate::expect`].
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($arg:tt)+) => {
        if !$cond {
            return Err($crate::E2eError::assertion(format!($($arg)+)));
        }
    };
}

/// Fail the current test unless both values are equal.
#[macro_export]
macro_rules! ensure_eq {
    ($left:expr, $right:expr $(,)?) => {{
        let (left, right) = (&$left, &$right);
        if left != right {
            return Err($crate::E2eError::assertion(format!(
                "expected `{:?}` to equal `{:?}`",
                left, right
            )));
        }
    }};
}
