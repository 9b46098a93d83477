//! Login page

use saucedemo_common::urls;
use saucedemo_e2e::{expect, AriaRole, E2eResult, Locator, Page};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct LoginPage {
    page: Page,
}

impl LoginPage {
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn username_input(&self) -> Locator {
        self.page.locator(r#"[data-test="username"]"#)
    }

    pub fn password_input(&self) -> Locator {
        self.page.locator(r#"[data-test="password"]"#)
    }

    pub fn login_button(&self) -> Locator {
        self.page.locator(r#"[data-test="login-button"]"#)
    }

    pub fn error_message(&self) -> Locator {
        self.page.locator(r#"[data-test="error"]"#)
    }

    pub fn error_close_button(&self) -> Locator {
        self.page.locator(r#"[data-test="error-button"]"#)
    }

    /// Red cross drawn next to the username input after a failed login
    pub fn username_error_icon(&self) -> Locator {
        self.username_input().locator("..").locator(".error_icon")
    }

    pub fn password_error_icon(&self) -> Locator {
        self.password_input().locator("..").locator(".error_icon")
    }

    pub fn username_textbox(&self) -> Locator {
        self.page.get_by_role(AriaRole::Textbox, "Username")
    }

    pub fn password_textbox(&self) -> Locator {
        self.page.get_by_role(AriaRole::Textbox, "Password")
    }

    pub fn login_button_by_role(&self) -> Locator {
        self.page.get_by_role(AriaRole::Button, "Login")
    }

    pub fn accepted_usernames_text(&self) -> Locator {
        self.page.get_by_text("Accepted usernames are:")
    }

    pub fn password_hint_text(&self) -> Locator {
        self.page.get_by_text("secret_sauce")
    }

    pub async fn goto(&self) -> E2eResult<()> {
        self.page.goto(urls::LOGIN).await
    }

    /// Fill both fields and submit
    pub async fn login(&self, username: &str, password: &str) -> E2eResult<()> {
        debug!("Logging in as '{}'", username);
        self.username_input().fill(username).await?;
        self.password_input().fill(password).await?;
        self.login_button().click().await
    }

    pub async fn fill_username(&self, username: &str) -> E2eResult<()> {
        self.username_input().fill(username).await
    }

    pub async fn fill_password(&self, password: &str) -> E2eResult<()> {
        self.password_input().fill(password).await
    }

    pub async fn click_login(&self) -> E2eResult<()> {
        self.login_button().click().await
    }

    pub async fn dismiss_error(&self) -> E2eResult<()> {
        self.error_close_button().click().await
    }

    pub async fn expect_to_be_visible(&self) -> E2eResult<()> {
        expect(&self.username_textbox()).to_be_visible().await?;
        expect(&self.password_textbox()).to_be_visible().await?;
        expect(&self.login_button_by_role()).to_be_visible().await
    }

    pub async fn expect_error_message(&self, message: &str) -> E2eResult<()> {
        expect(&self.page.get_by_text(message)).to_be_visible().await
    }

    pub async fn expect_error_icons_visible(&self) -> E2eResult<()> {
        expect(&self.username_error_icon()).to_be_visible().await?;
        expect(&self.password_error_icon()).to_be_visible().await
    }

    pub async fn expect_error_icons_not_visible(&self) -> E2eResult<()> {
        expect(&self.username_error_icon()).not().to_be_visible().await?;
        expect(&self.password_error_icon()).not().to_be_visible().await
    }

    pub async fn expect_error_not_visible(&self) -> E2eResult<()> {
        expect(&self.error_message()).not().to_be_visible().await
    }

    pub async fn expect_username_value(&self, value: &str) -> E2eResult<()> {
        expect(&self.username_input()).to_have_value(value).await
    }

    pub async fn expect_password_value(&self, value: &str) -> E2eResult<()> {
        expect(&self.password_input()).to_have_value(value).await
    }

    pub async fn expect_hints_visible(&self) -> E2eResult<()> {
        expect(&self.accepted_usernames_text()).to_be_visible().await?;
        expect(&self.password_hint_text()).to_be_visible().await
    }
}
