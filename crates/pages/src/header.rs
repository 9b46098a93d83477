//! Site header shared by every signed-in page: cart link, cart badge and the
//! hamburger button.

use saucedemo_e2e::{expect, AriaRole, E2eResult, Locator, Page};

#[derive(Debug, Clone)]
pub struct HeaderComponent {
    page: Page,
}

impl HeaderComponent {
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    pub fn cart_icon(&self) -> Locator {
        self.page.locator(r#"[data-test="shopping-cart-link"]"#)
    }

    /// Item count bubble; absent while the cart is empty
    pub fn cart_badge(&self) -> Locator {
        self.page.locator(r#"[data-test="shopping-cart-badge"]"#)
    }

    pub fn hamburger_menu(&self) -> Locator {
        self.page.get_by_role(AriaRole::Button, "Open Menu")
    }

    pub async fn go_to_cart(&self) -> E2eResult<()> {
        self.cart_icon().click().await
    }

    pub async fn open_menu(&self) -> E2eResult<()> {
        self.hamburger_menu().click().await
    }

    pub async fn expect_badge_count(&self, count: usize) -> E2eResult<()> {
        expect(&self.cart_badge())
            .to_have_text(&count.to_string())
            .await
    }

    pub async fn expect_badge_not_visible(&self) -> E2eResult<()> {
        expect(&self.cart_badge()).not().to_be_visible().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use saucedemo_e2e::testing::RecordingTransport;

    #[tokio::test]
    async fn test_badge_count_is_text() {
        let transport = RecordingTransport::new();
        HeaderComponent::new(transport.page())
            .expect_badge_count(3)
            .await
            .unwrap();

        let check = &transport.calls_to("expect")[0];
        assert_eq!(check["assertion"]["type"], "text");
        assert_eq!(check["assertion"]["expected"], "3");
        assert_eq!(check["timeout"], 5000);
    }

    #[tokio::test]
    async fn test_open_menu_uses_button_role() {
        let transport = RecordingTransport::new();
        HeaderComponent::new(transport.page())
            .open_menu()
            .await
            .unwrap();

        let locator = &transport.calls_to("action")[0]["locator"][0];
        assert_eq!(locator["kind"], "role");
        assert_eq!(locator["role"], "button");
        assert_eq!(locator["name"], "Open Menu");
    }
}
