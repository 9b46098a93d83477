//! Products page
//!
//! The inventory is the landing page after login. It carries the site
//! header, so cart and menu actions are reachable from here directly.

use std::fmt;

use async_trait::async_trait;
use saucedemo_common::urls;
use saucedemo_e2e::{expect, expect_page, AriaRole, E2eResult, Fixture, Locator, Page, UrlMatcher};
use tracing::debug;

use crate::header::HeaderComponent;

/// Clears the cart kept in local storage before each document loads
pub const CLEAR_STORAGE_SCRIPT: &str = "window.localStorage.clear()";

/// Entries of the sort dropdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOption {
    NameAscending,
    NameDescending,
    PriceAscending,
    PriceDescending,
}

impl SortOption {
    pub fn label(&self) -> &'static str {
        match self {
            SortOption::NameAscending => "Name (A to Z)",
            SortOption::NameDescending => "Name (Z to A)",
            SortOption::PriceAscending => "Price (low to high)",
            SortOption::PriceDescending => "Price (high to low)",
        }
    }
}

impl fmt::Display for SortOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone)]
pub struct InventoryPage {
    page: Page,
    header: HeaderComponent,
}

impl InventoryPage {
    pub fn new(page: Page) -> Self {
        let header = HeaderComponent::new(page.clone());
        Self { page, header }
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn header(&self) -> &HeaderComponent {
        &self.header
    }

    pub fn page_title(&self) -> Locator {
        self.page.get_by_text("Products")
    }

    pub fn inventory_items(&self) -> Locator {
        self.page.locator(r#"[data-test="inventory-item"]"#)
    }

    pub fn first_inventory_item(&self) -> Locator {
        self.inventory_items().first()
    }

    pub fn sort_dropdown(&self) -> Locator {
        self.page.locator(r#"[data-test="product-sort-container"]"#)
    }

    pub fn inventory_item_names(&self) -> Locator {
        self.page.locator(r#"[data-test="inventory-item-name"]"#)
    }

    pub fn inventory_item_prices(&self) -> Locator {
        self.page.locator(r#"[data-test="inventory-item-price"]"#)
    }

    pub fn footer_text(&self) -> Locator {
        self.page.locator(r#"[data-test="footer-copy"]"#)
    }

    pub fn twitter_link(&self) -> Locator {
        self.page.locator(r#"[data-test="social-twitter"]"#)
    }

    pub fn facebook_link(&self) -> Locator {
        self.page.locator(r#"[data-test="social-facebook"]"#)
    }

    pub fn linkedin_link(&self) -> Locator {
        self.page.locator(r#"[data-test="social-linkedin"]"#)
    }

    /// The inventory card whose text mentions `product_name`
    pub fn item(&self, product_name: &str) -> Locator {
        self.inventory_items().filter_has_text(product_name)
    }

    pub async fn goto(&self) -> E2eResult<()> {
        self.page.goto(urls::INVENTORY).await
    }

    pub async fn add_to_cart(&self, product_name: &str) -> E2eResult<()> {
        debug!("Adding '{}' to cart", product_name);
        self.item(product_name)
            .get_by_role(AriaRole::Button, "Add to cart")
            .click()
            .await
    }

    pub async fn remove_from_cart(&self, product_name: &str) -> E2eResult<()> {
        self.item(product_name)
            .get_by_role(AriaRole::Button, "Remove")
            .click()
            .await
    }

    /// Open the detail page through the product's name link
    pub async fn click_product(&self, product_name: &str) -> E2eResult<()> {
        self.inventory_item_names()
            .filter_has_text(product_name)
            .click()
            .await
    }

    pub async fn sort_by(&self, option: SortOption) -> E2eResult<()> {
        self.sort_dropdown()
            .select_option_by_label(option.label())
            .await
    }

    /// Product names in display order
    pub async fn product_names(&self) -> E2eResult<Vec<String>> {
        self.inventory_item_names().all_text_contents().await
    }

    /// Displayed prices (`$29.99`) in display order
    pub async fn product_prices(&self) -> E2eResult<Vec<String>> {
        self.inventory_item_prices().all_text_contents().await
    }

    pub async fn go_to_cart(&self) -> E2eResult<()> {
        self.header.go_to_cart().await
    }

    pub async fn open_menu(&self) -> E2eResult<()> {
        self.header.open_menu().await
    }

    pub async fn expect_badge_count(&self, count: usize) -> E2eResult<()> {
        self.header.expect_badge_count(count).await
    }

    pub async fn expect_badge_not_visible(&self) -> E2eResult<()> {
        self.header.expect_badge_not_visible().await
    }

    pub async fn expect_to_be_visible(&self) -> E2eResult<()> {
        expect(&self.page_title()).to_be_visible().await?;
        expect(&self.header.cart_icon()).to_be_visible().await?;
        expect(&self.header.hamburger_menu()).to_be_visible().await
    }

    pub async fn expect_product_count(&self, count: usize) -> E2eResult<()> {
        expect(&self.inventory_items()).to_have_count(count).await
    }

    pub async fn expect_remove_button_visible(&self, product_name: &str) -> E2eResult<()> {
        expect(&self.item(product_name).get_by_role(AriaRole::Button, "Remove"))
            .to_be_visible()
            .await
    }

    pub async fn expect_add_to_cart_button_visible(&self, product_name: &str) -> E2eResult<()> {
        expect(&self.item(product_name).get_by_role(AriaRole::Button, "Add to cart"))
            .to_be_visible()
            .await
    }

    pub async fn expect_url(&self) -> E2eResult<()> {
        expect_page(&self.page)
            .to_have_url(UrlMatcher::exact(self.page.resolve(urls::INVENTORY)))
            .await
    }
}

#[async_trait]
impl Fixture for InventoryPage {
    /// Registers the storage-clearing init script so every navigation starts
    /// with an empty cart.
    async fn setup(page: &Page) -> E2eResult<Self> {
        page.add_init_script(CLEAR_STORAGE_SCRIPT).await?;
        Ok(Self::new(page.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use saucedemo_common::products;
    use saucedemo_e2e::testing::RecordingTransport;
    use serde_json::json;
    use test_case::test_case;

    #[test_case(SortOption::NameAscending => "Name (A to Z)")]
    #[test_case(SortOption::NameDescending => "Name (Z to A)")]
    #[test_case(SortOption::PriceAscending => "Price (low to high)")]
    #[test_case(SortOption::PriceDescending => "Price (high to low)")]
    fn test_sort_labels(option: SortOption) -> &'static str {
        option.label()
    }

    #[tokio::test]
    async fn test_fixture_clears_storage_on_navigation() {
        let transport = RecordingTransport::new();
        InventoryPage::setup(&transport.page()).await.unwrap();

        assert_eq!(transport.methods(), ["addInitScript"]);
        assert_eq!(
            transport.calls_to("addInitScript")[0]["script"],
            "window.localStorage.clear()"
        );
    }

    #[tokio::test]
    async fn test_add_to_cart_scopes_button_to_item() {
        let transport = RecordingTransport::new();
        InventoryPage::new(transport.page())
            .add_to_cart(products::BACKPACK.name)
            .await
            .unwrap();

        let action = &transport.calls_to("action")[0];
        assert_eq!(action["action"], "click");
        assert_eq!(
            action["locator"],
            json!([
                { "kind": "css", "selector": "[data-test=\"inventory-item\"]" },
                { "kind": "filter", "has_text": "Sauce Labs Backpack" },
                { "kind": "role", "role": "button", "name": "Add to cart", "exact": false }
            ])
        );
    }

    #[tokio::test]
    async fn test_sort_selects_by_label() {
        let transport = RecordingTransport::new();
        InventoryPage::new(transport.page())
            .sort_by(SortOption::PriceDescending)
            .await
            .unwrap();

        let action = &transport.calls_to("action")[0];
        assert_eq!(action["action"], "select_option");
        assert_eq!(action["value"], "Price (high to low)");
    }

    #[tokio::test]
    async fn test_product_names_in_order() {
        let transport = RecordingTransport::new();
        transport.reply(
            "action",
            json!(["Sauce Labs Backpack", "Test.allTheThings() T-Shirt (Red)"]),
        );

        let names = InventoryPage::new(transport.page())
            .product_names()
            .await
            .unwrap();
        assert_eq!(names.first().map(String::as_str), Some(products::BACKPACK.name));
        assert_eq!(names.last().map(String::as_str), Some(products::RED_TSHIRT.name));
    }

    #[tokio::test]
    async fn test_header_delegation() {
        let transport = RecordingTransport::new();
        let inventory = InventoryPage::new(transport.page());
        inventory.go_to_cart().await.unwrap();
        inventory.expect_badge_not_visible().await.unwrap();

        assert_eq!(
            transport.calls_to("action")[0]["locator"][0]["selector"],
            r#"[data-test="shopping-cart-link"]"#
        );
        let check = &transport.calls_to("expect")[0];
        assert_eq!(check["not"], true);
        assert_eq!(
            check["locator"][0]["selector"],
            r#"[data-test="shopping-cart-badge"]"#
        );
    }

    #[tokio::test]
    async fn test_expect_url_is_absolute() {
        let transport = RecordingTransport::new();
        InventoryPage::new(transport.page()).expect_url().await.unwrap();

        assert_eq!(
            transport.calls_to("expectPage")[0]["url"],
            json!({ "type": "exact", "value": "https://www.saucedemo.com/inventory.html" })
        );
    }
}
