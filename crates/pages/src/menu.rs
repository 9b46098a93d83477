//! Hamburger side menu

use saucedemo_e2e::{expect, AriaRole, E2eResult, Locator, Page};

#[derive(Debug, Clone)]
pub struct MenuComponent {
    page: Page,
}

impl MenuComponent {
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    pub fn all_items_link(&self) -> Locator {
        self.page.get_by_role(AriaRole::Link, "All Items")
    }

    pub fn about_link(&self) -> Locator {
        self.page.get_by_role(AriaRole::Link, "About")
    }

    pub fn logout_link(&self) -> Locator {
        self.page.get_by_role(AriaRole::Link, "Logout")
    }

    pub fn logout_link_by_data_test(&self) -> Locator {
        self.page.locator(r#"[data-test="logout-sidebar-link"]"#)
    }

    pub fn reset_app_state_link(&self) -> Locator {
        self.page.get_by_role(AriaRole::Link, "Reset App State")
    }

    pub fn close_button(&self) -> Locator {
        self.page.locator("#react-burger-cross-btn")
    }

    fn links(&self) -> [Locator; 4] {
        [
            self.all_items_link(),
            self.about_link(),
            self.logout_link(),
            self.reset_app_state_link(),
        ]
    }

    pub async fn click_logout(&self) -> E2eResult<()> {
        self.logout_link_by_data_test().click().await
    }

    pub async fn click_all_items(&self) -> E2eResult<()> {
        self.all_items_link().click().await
    }

    pub async fn click_about(&self) -> E2eResult<()> {
        self.about_link().click().await
    }

    pub async fn click_reset_app_state(&self) -> E2eResult<()> {
        self.reset_app_state_link().click().await
    }

    pub async fn close_menu(&self) -> E2eResult<()> {
        self.close_button().click().await
    }

    pub async fn expect_menu_visible(&self) -> E2eResult<()> {
        for link in self.links() {
            expect(&link).to_be_visible().await?;
        }
        Ok(())
    }

    /// The menu slides out of view but stays in the DOM
    pub async fn expect_menu_hidden(&self) -> E2eResult<()> {
        for link in self.links() {
            expect(&link).not().to_be_visible().await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use saucedemo_e2e::testing::RecordingTransport;
    use saucedemo_e2e::E2eError;

    #[tokio::test]
    async fn test_menu_visible_checks_every_link() {
        let transport = RecordingTransport::new();
        MenuComponent::new(transport.page())
            .expect_menu_visible()
            .await
            .unwrap();

        let names: Vec<_> = transport
            .calls_to("expect")
            .iter()
            .map(|c| c["locator"][0]["name"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(names, ["All Items", "About", "Logout", "Reset App State"]);
    }

    #[tokio::test]
    async fn test_menu_hidden_stops_at_first_visible_link() {
        let transport = RecordingTransport::new();
        transport.reply("expect", serde_json::Value::Null);
        transport.fail("expect", E2eError::Timeout("5000ms".to_string()));

        let err = MenuComponent::new(transport.page())
            .expect_menu_hidden()
            .await
            .unwrap_err();

        assert!(matches!(err, E2eError::AssertionFailed(_)));
        assert!(err.to_string().contains("'About'"));
        assert_eq!(transport.calls_to("expect").len(), 2);
    }

    #[tokio::test]
    async fn test_logout_uses_data_test_link() {
        let transport = RecordingTransport::new();
        let menu = MenuComponent::new(transport.page());
        menu.click_logout().await.unwrap();
        menu.close_menu().await.unwrap();

        let actions = transport.calls_to("action");
        assert_eq!(
            actions[0]["locator"][0]["selector"],
            r#"[data-test="logout-sidebar-link"]"#
        );
        assert_eq!(actions[1]["locator"][0]["selector"], "#react-burger-cross-btn");
    }
}
