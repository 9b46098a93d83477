//! Cart page

use saucedemo_common::urls;
use saucedemo_e2e::{expect, expect_page, AriaRole, E2eResult, Locator, Page, UrlMatcher};

#[derive(Debug, Clone)]
pub struct CartPage {
    page: Page,
}

impl CartPage {
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    pub fn page_title(&self) -> Locator {
        self.page.locator(r#"[data-test="title"]"#)
    }

    pub fn cart_items(&self) -> Locator {
        self.page.locator(r#"[data-test="inventory-item"]"#)
    }

    pub fn cart_badge(&self) -> Locator {
        self.page.locator(r#"[data-test="shopping-cart-badge"]"#)
    }

    pub fn continue_shopping_button(&self) -> Locator {
        self.page.locator(r#"[data-test="continue-shopping"]"#)
    }

    pub fn checkout_button(&self) -> Locator {
        self.page.locator(r#"[data-test="checkout"]"#)
    }

    pub fn cart_icon(&self) -> Locator {
        self.page.locator(r#"[data-test="shopping-cart-link"]"#)
    }

    pub fn item(&self, item_name: &str) -> Locator {
        self.cart_items().filter_has_text(item_name)
    }

    pub async fn goto(&self) -> E2eResult<()> {
        self.page.goto(urls::CART).await
    }

    pub async fn click_cart_icon(&self) -> E2eResult<()> {
        self.cart_icon().click().await
    }

    pub async fn click_continue_shopping(&self) -> E2eResult<()> {
        self.continue_shopping_button().click().await
    }

    pub async fn click_checkout(&self) -> E2eResult<()> {
        self.checkout_button().click().await
    }

    pub async fn remove_item(&self, item_name: &str) -> E2eResult<()> {
        self.item(item_name)
            .get_by_role(AriaRole::Button, "Remove")
            .click()
            .await
    }

    pub async fn expect_to_be_visible(&self) -> E2eResult<()> {
        expect(&self.page_title()).to_have_text("Your Cart").await?;
        expect(&self.continue_shopping_button()).to_be_visible().await?;
        expect(&self.checkout_button()).to_be_visible().await
    }

    pub async fn expect_item_count(&self, count: usize) -> E2eResult<()> {
        expect(&self.cart_items()).to_have_count(count).await
    }

    pub async fn expect_badge_count(&self, count: usize) -> E2eResult<()> {
        expect(&self.cart_badge())
            .to_have_text(&count.to_string())
            .await
    }

    pub async fn expect_badge_not_visible(&self) -> E2eResult<()> {
        expect(&self.cart_badge()).not().to_be_visible().await
    }

    pub async fn expect_item_visible(&self, item_name: &str) -> E2eResult<()> {
        expect(&self.item(item_name)).to_be_visible().await
    }

    pub async fn expect_item_not_visible(&self, item_name: &str) -> E2eResult<()> {
        expect(&self.item(item_name)).not().to_be_visible().await
    }

    pub async fn expect_url(&self) -> E2eResult<()> {
        expect_page(&self.page)
            .to_have_url(UrlMatcher::exact(self.page.resolve(urls::CART)))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use saucedemo_common::products;
    use saucedemo_e2e::testing::RecordingTransport;

    #[tokio::test]
    async fn test_visible_checks_title_text() {
        let transport = RecordingTransport::new();
        CartPage::new(transport.page())
            .expect_to_be_visible()
            .await
            .unwrap();

        let checks = transport.calls_to("expect");
        assert_eq!(checks.len(), 3);
        assert_eq!(checks[0]["assertion"]["type"], "text");
        assert_eq!(checks[0]["assertion"]["expected"], "Your Cart");
    }

    #[tokio::test]
    async fn test_item_not_visible_is_filtered_and_negated() {
        let transport = RecordingTransport::new();
        CartPage::new(transport.page())
            .expect_item_not_visible(products::BIKE_LIGHT.name)
            .await
            .unwrap();

        let check = &transport.calls_to("expect")[0];
        assert_eq!(check["not"], true);
        assert_eq!(check["locator"][1]["has_text"], "Sauce Labs Bike Light");
    }

    #[tokio::test]
    async fn test_goto_and_url() {
        let transport = RecordingTransport::new();
        let cart = CartPage::new(transport.page());
        cart.goto().await.unwrap();
        cart.expect_url().await.unwrap();

        assert_eq!(
            transport.calls_to("goto")[0]["url"],
            "https://www.saucedemo.com/cart.html"
        );
        assert_eq!(
            transport.calls_to("expectPage")[0]["url"]["value"],
            "https://www.saucedemo.com/cart.html"
        );
    }
}
