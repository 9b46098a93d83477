//! Web-first assertions
//!
//! Assertions are evaluated by Playwright inside the driver and retried until
//! they hold or the timeout expires.

use std::fmt;
use std::time::Duration;

use regex::Regex;
use serde::Serialize;
use serde_json::json;

use crate::error::{E2eError, E2eResult};
use crate::locator::Locator;
use crate::page::Page;

/// What to check about a locator
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Assertion {
    Visible,
    Hidden,
    Text { expected: String },
    ContainsText { expected: String },
    Value { expected: String },
    Count { expected: usize },
    Attribute { name: String, expected: String },
}

impl fmt::Display for Assertion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Assertion::Visible => write!(f, "toBeVisible()"),
            Assertion::Hidden => write!(f, "toBeHidden()"),
            Assertion::Text { expected } => write!(f, "toHaveText('{}')", expected),
            Assertion::ContainsText { expected } => write!(f, "toContainText('{}')", expected),
            Assertion::Value { expected } => write!(f, "toHaveValue('{}')", expected),
            Assertion::Count { expected } => write!(f, "toHaveCount({})", expected),
            Assertion::Attribute { name, expected } => {
                write!(f, "toHaveAttribute('{}', '{}')", name, expected)
            }
        }
    }
}

pub fn expect(locator: &Locator) -> LocatorAssertions {
    LocatorAssertions {
        timeout: locator.page().expect_timeout(),
        locator: locator.clone(),
        negate: false,
    }
}

pub struct LocatorAssertions {
    locator: Locator,
    negate: bool,
    timeout: Duration,
}

impl LocatorAssertions {
    pub fn not(mut self) -> Self {
        self.negate = !self.negate;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn check(&self, assertion: Assertion) -> E2eResult<()> {
        let params = json!({
            "locator": self.locator.steps(),
            "assertion": assertion,
            "not": self.negate,
            "timeout": self.timeout.as_millis() as u64,
        });

        let describe = |detail: String| {
            format!(
                "expect({}){}.{}: {}",
                self.locator,
                if self.negate { ".not" } else { "" },
                assertion,
                detail
            )
        };

        match self.locator.page().call("expect", params).await {
            Ok(_) => Ok(()),
            Err(E2eError::AssertionFailed(m)) => Err(E2eError::AssertionFailed(describe(m))),
            Err(E2eError::Timeout(m)) => Err(E2eError::AssertionFailed(describe(m))),
            Err(other) => Err(other),
        }
    }

    pub async fn to_be_visible(&self) -> E2eResult<()> {
        self.check(Assertion::Visible).await
    }

    pub async fn to_be_hidden(&self) -> E2eResult<()> {
        self.check(Assertion::Hidden).await
    }

    pub async fn to_have_text(&self, expected: &str) -> E2eResult<()> {
        self.check(Assertion::Text {
            expected: expected.to_string(),
        })
        .await
    }

    pub async fn to_contain_text(&self, expected: &str) -> E2eResult<()> {
        self.check(Assertion::ContainsText {
            expected: expected.to_string(),
        })
        .await
    }

    pub async fn to_have_value(&self, expected: &str) -> E2eResult<()> {
        self.check(Assertion::Value {
            expected: expected.to_string(),
        })
        .await
    }

    pub async fn to_have_count(&self, expected: usize) -> E2eResult<()> {
        self.check(Assertion::Count { expected }).await
    }

    pub async fn to_have_attribute(&self, name: &str, expected: &str) -> E2eResult<()> {
        self.check(Assertion::Attribute {
            name: name.to_string(),
            expected: expected.to_string(),
        })
        .await
    }
}

/// Expected page URL
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UrlMatcher {
    Exact { value: String },
    Pattern { source: String },
}

impl UrlMatcher {
    pub fn exact(url: impl Into<String>) -> Self {
        UrlMatcher::Exact { value: url.into() }
    }

    /// A regular expression searched anywhere in the URL
    pub fn pattern(source: &str) -> E2eResult<Self> {
        Regex::new(source)?;
        Ok(UrlMatcher::Pattern {
            source: source.to_string(),
        })
    }
}

impl fmt::Display for UrlMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UrlMatcher::Exact { value } => write!(f, "'{}'", value),
            UrlMatcher::Pattern { source } => write!(f, "/{}/", source),
        }
    }
}

pub fn expect_page(page: &Page) -> PageAssertions {
    PageAssertions {
        page: page.clone(),
        negate: false,
        timeout: page.expect_timeout(),
    }
}

pub struct PageAssertions {
    page: Page,
    negate: bool,
    timeout: Duration,
}

impl PageAssertions {
    pub fn not(mut self) -> Self {
        self.negate = !self.negate;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub async fn to_have_url(&self, matcher: UrlMatcher) -> E2eResult<()> {
        let params = json!({
            "url": matcher,
            "not": self.negate,
            "timeout": self.timeout.as_millis() as u64,
        });
        match self.page.call("expectPage", params).await {
            Ok(_) => Ok(()),
            Err(E2eError::AssertionFailed(m)) | Err(E2eError::Timeout(m)) => {
                Err(E2eError::AssertionFailed(format!(
                    "expect(page){}.toHaveURL({}): {}",
                    if self.negate { ".not" } else { "" },
                    matcher,
                    m
                )))
            }
            Err(other) => Err(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingTransport;

    #[tokio::test]
    async fn test_not_visible_wire_format() {
        let transport = RecordingTransport::new();
        let page = transport.page();

        expect(&page.locator("[data-test=\"error\"]"))
            .not()
            .to_be_visible()
            .await
            .unwrap();

        let calls = transport.calls_to("expect");
        assert_eq!(calls[0]["assertion"], json!({ "type": "visible" }));
        assert_eq!(calls[0]["not"], true);
        assert_eq!(calls[0]["timeout"], 5000);
    }

    #[tokio::test]
    async fn test_count_and_text_payloads() {
        let transport = RecordingTransport::new();
        let page = transport.page();
        let items = page.locator(".cart_item");

        expect(&items).to_have_count(3).await.unwrap();
        expect(&items.first())
            .with_timeout(Duration::from_secs(10))
            .to_have_text("Sauce Labs Backpack")
            .await
            .unwrap();

        let calls = transport.calls_to("expect");
        assert_eq!(calls[0]["assertion"], json!({ "type": "count", "expected": 3 }));
        assert_eq!(
            calls[1]["assertion"],
            json!({ "type": "text", "expected": "Sauce Labs Backpack" })
        );
        assert_eq!(calls[1]["timeout"], 10_000);
    }

    #[tokio::test]
    async fn test_failure_message_names_locator_and_matcher() {
        let transport = RecordingTransport::new();
        transport.fail("expect", E2eError::AssertionFailed("received 2".to_string()));
        let page = transport.page();

        let err = expect(&page.locator(".badge"))
            .to_have_text("1")
            .await
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("expect(locator('.badge')).toHaveText('1')"));
        assert!(message.contains("received 2"));
    }

    #[tokio::test]
    async fn test_timeouts_become_assertion_failures() {
        let transport = RecordingTransport::new();
        transport.fail("expect", E2eError::Timeout("5000ms".to_string()));
        let page = transport.page();

        let err = expect(&page.locator(".x")).to_be_visible().await.unwrap_err();
        assert!(matches!(err, E2eError::AssertionFailed(_)));
    }

    #[tokio::test]
    async fn test_driver_errors_pass_through() {
        let transport = RecordingTransport::new();
        transport.fail("expect", E2eError::Driver("unknown page: 4".to_string()));
        let page = transport.page();

        let err = expect(&page.locator(".x")).to_be_visible().await.unwrap_err();
        assert!(matches!(err, E2eError::Driver(_)));
    }

    #[tokio::test]
    async fn test_page_url_pattern() {
        let transport = RecordingTransport::new();
        let page = transport.page();

        expect_page(&page)
            .to_have_url(UrlMatcher::pattern(r"saucelabs\.com").unwrap())
            .await
            .unwrap();

        let calls = transport.calls_to("expectPage");
        assert_eq!(
            calls[0]["url"],
            json!({ "type": "pattern", "source": "saucelabs\\.com" })
        );
    }

    #[test]
    fn test_url_matcher_validates_patterns() {
        let exact = UrlMatcher::exact("https://www.saucedemo.com/cart.html");
        assert_eq!(exact.to_string(), "'https://www.saucedemo.com/cart.html'");

        let pattern = UrlMatcher::pattern(r"saucelabs\.com").unwrap();
        assert_eq!(pattern.to_string(), r"/saucelabs\.com/");

        let err = UrlMatcher::pattern("(unclosed").unwrap_err();
        assert!(matches!(err, E2eError::InvalidPattern(_)));
    }
}
