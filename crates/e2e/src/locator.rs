//! Locators
//!
//! A locator is a recipe, not an element handle: the chain of steps is
//! resolved again by the browser on every action or assertion, so it stays
//! valid across re-renders.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{E2eError, E2eResult};
use crate::page::Page;

/// ARIA roles used by the page objects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AriaRole {
    Button,
    Link,
    Textbox,
    Heading,
    Img,
    Combobox,
}

impl AriaRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            AriaRole::Button => "button",
            AriaRole::Link => "link",
            AriaRole::Textbox => "textbox",
            AriaRole::Heading => "heading",
            AriaRole::Img => "img",
            AriaRole::Combobox => "combobox",
        }
    }
}

/// One refinement in a locator chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LocatorStep {
    /// CSS selector; `..` selects the parent
    Css { selector: String },

    /// Accessible role and name
    Role {
        role: AriaRole,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        #[serde(default)]
        exact: bool,
    },

    /// Element containing the given text
    Text {
        text: String,
        #[serde(default)]
        exact: bool,
    },

    /// Keep matches that contain the text somewhere inside
    Filter { has_text: String },

    First,
    Last,
    Nth { index: usize },
}

impl LocatorStep {
    pub fn role(role: AriaRole, name: &str) -> Self {
        LocatorStep::Role {
            role,
            name: Some(name.to_string()),
            exact: false,
        }
    }

    pub fn text(text: &str) -> Self {
        LocatorStep::Text {
            text: text.to_string(),
            exact: false,
        }
    }
}

impl fmt::Display for LocatorStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocatorStep::Css { selector } => write!(f, "locator('{}')", selector),
            LocatorStep::Role { role, name, .. } => match name {
                Some(name) => write!(f, "getByRole('{}', {{ name: '{}' }})", role.as_str(), name),
                None => write!(f, "getByRole('{}')", role.as_str()),
            },
            LocatorStep::Text { text, .. } => write!(f, "getByText('{}')", text),
            LocatorStep::Filter { has_text } => write!(f, "filter({{ hasText: '{}' }})", has_text),
            LocatorStep::First => write!(f, "first()"),
            LocatorStep::Last => write!(f, "last()"),
            LocatorStep::Nth { index } => write!(f, "nth({})", index),
        }
    }
}

/// Lazily resolved element query bound to a page
#[derive(Clone)]
pub struct Locator {
    page: Page,
    steps: Vec<LocatorStep>,
}

impl Locator {
    pub(crate) fn new(page: Page, step: LocatorStep) -> Self {
        Self {
            page,
            steps: vec![step],
        }
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn steps(&self) -> &[LocatorStep] {
        &self.steps
    }

    fn chain(&self, step: LocatorStep) -> Self {
        let mut steps = self.steps.clone();
        steps.push(step);
        Self {
            page: self.page.clone(),
            steps,
        }
    }

    pub fn locator(&self, selector: &str) -> Self {
        self.chain(LocatorStep::Css {
            selector: selector.to_string(),
        })
    }

    pub fn get_by_role(&self, role: AriaRole, name: &str) -> Self {
        self.chain(LocatorStep::role(role, name))
    }

    pub fn get_by_text(&self, text: &str) -> Self {
        self.chain(LocatorStep::text(text))
    }

    pub fn filter_has_text(&self, text: &str) -> Self {
        self.chain(LocatorStep::Filter {
            has_text: text.to_string(),
        })
    }

    pub fn first(&self) -> Self {
        self.chain(LocatorStep::First)
    }

    pub fn last(&self) -> Self {
        self.chain(LocatorStep::Last)
    }

    pub fn nth(&self, index: usize) -> Self {
        self.chain(LocatorStep::Nth { index })
    }

    async fn act(&self, action: &str, extra: Value) -> E2eResult<Value> {
        let mut params = json!({
            "locator": self.steps,
            "action": action,
        });
        if let (Value::Object(params), Value::Object(extra)) = (&mut params, extra) {
            params.extend(extra);
        }
        self.page.call("action", params).await.map_err(|e| match e {
            E2eError::Timeout(m) => E2eError::Timeout(format!("{} on {}: {}", action, self, m)),
            E2eError::Driver(m) => E2eError::Driver(format!("{} on {}: {}", action, self, m)),
            other => other,
        })
    }

    pub async fn click(&self) -> E2eResult<()> {
        self.act("click", json!({})).await?;
        Ok(())
    }

    pub async fn fill(&self, value: &str) -> E2eResult<()> {
        self.act("fill", json!({ "value": value })).await?;
        Ok(())
    }

    /// Pick a `<select>` option by its visible label
    pub async fn select_option_by_label(&self, label: &str) -> E2eResult<()> {
        self.act("select_option", json!({ "value": label })).await?;
        Ok(())
    }

    pub async fn text_content(&self) -> E2eResult<Option<String>> {
        let value = self.act("text_content", json!({})).await?;
        Ok(serde_json::from_value(value)?)
    }

    pub async fn all_text_contents(&self) -> E2eResult<Vec<String>> {
        let value = self.act("all_text_contents", json!({})).await?;
        Ok(serde_json::from_value(value)?)
    }

    pub async fn get_attribute(&self, name: &str) -> E2eResult<Option<String>> {
        let value = self.act("get_attribute", json!({ "name": name })).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// The attribute of every matching element, in document order
    pub async fn all_attributes(&self, name: &str) -> E2eResult<Vec<Option<String>>> {
        let value = self.act("all_attributes", json!({ "name": name })).await?;
        Ok(serde_json::from_value(value)?)
    }

    pub async fn input_value(&self) -> E2eResult<String> {
        let value = self.act("input_value", json!({})).await?;
        Ok(serde_json::from_value(value)?)
    }

    pub async fn count(&self) -> E2eResult<usize> {
        let value = self.act("count", json!({})).await?;
        Ok(serde_json::from_value(value)?)
    }

    pub async fn is_visible(&self) -> E2eResult<bool> {
        let value = self.act("is_visible", json!({})).await?;
        Ok(serde_json::from_value(value)?)
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            write!(f, "{}", step)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Locator")
            .field("page", &self.page.id())
            .field("steps", &self.steps)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingTransport;

    #[test]
    fn test_chain_serializes_in_order() {
        let transport = RecordingTransport::new();
        let page = transport.page();

        let button = page
            .locator("[data-test=\"inventory-item\"]")
            .filter_has_text("Sauce Labs Backpack")
            .get_by_role(AriaRole::Button, "Add to cart");

        let value = serde_json::to_value(button.steps()).unwrap();
        assert_eq!(
            value,
            json!([
                { "kind": "css", "selector": "[data-test=\"inventory-item\"]" },
                { "kind": "filter", "has_text": "Sauce Labs Backpack" },
                { "kind": "role", "role": "button", "name": "Add to cart", "exact": false }
            ])
        );
    }

    #[test]
    fn test_chaining_does_not_mutate_parent() {
        let transport = RecordingTransport::new();
        let items = transport.page().locator(".inventory_item");
        let first = items.first();

        assert_eq!(items.steps().len(), 1);
        assert_eq!(first.steps().len(), 2);
    }

    #[test]
    fn test_display() {
        let transport = RecordingTransport::new();
        let page = transport.page();
        let icon = page
            .locator("[data-test=\"username\"]")
            .locator("..")
            .locator(".error_icon");
        assert_eq!(
            icon.to_string(),
            "locator('[data-test=\"username\"]').locator('..').locator('.error_icon')"
        );

        let link = page.get_by_role(AriaRole::Link, "About").nth(0);
        assert_eq!(link.to_string(), "getByRole('link', { name: 'About' }).nth(0)");
    }

    #[tokio::test]
    async fn test_fill_sends_value() {
        let transport = RecordingTransport::new();
        let page = transport.page();

        page.locator("#user").fill("standard_user").await.unwrap();

        let calls = transport.calls_to("action");
        assert_eq!(calls[0]["action"], "fill");
        assert_eq!(calls[0]["value"], "standard_user");
        assert_eq!(calls[0]["locator"][0]["selector"], "#user");
    }

    #[tokio::test]
    async fn test_all_text_contents_decodes() {
        let transport = RecordingTransport::new();
        transport.reply("action", json!(["Sauce Labs Backpack", "Sauce Labs Onesie"]));
        let page = transport.page();

        let names = page.locator(".name").all_text_contents().await.unwrap();
        assert_eq!(names, vec!["Sauce Labs Backpack", "Sauce Labs Onesie"]);
    }

    #[tokio::test]
    async fn test_all_attributes_keeps_missing_values() {
        let transport = RecordingTransport::new();
        transport.reply("action", json!(["/a.jpg", null]));
        let page = transport.page();

        let srcs = page.locator("img").all_attributes("src").await.unwrap();
        assert_eq!(srcs, vec![Some("/a.jpg".to_string()), None]);
    }

    #[tokio::test]
    async fn test_action_errors_name_the_locator() {
        let transport = RecordingTransport::new();
        transport.fail("action", E2eError::Timeout("30000ms exceeded".to_string()));
        let page = transport.page();

        let err = page.locator("#missing").click().await.unwrap_err();
        assert!(err.to_string().contains("click on locator('#missing')"));
    }
}
