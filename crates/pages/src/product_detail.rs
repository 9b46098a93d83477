//! Single product page (`/inventory-item.html?id=N`)

use saucedemo_e2e::{expect, E2eResult, Locator, Page};

#[derive(Debug, Clone)]
pub struct ProductDetailPage {
    page: Page,
}

impl ProductDetailPage {
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    pub fn product_name(&self) -> Locator {
        self.page.locator(r#"[data-test="inventory-item-name"]"#)
    }

    pub fn product_description(&self) -> Locator {
        self.page.locator(r#"[data-test="inventory-item-desc"]"#)
    }

    pub fn product_price(&self) -> Locator {
        self.page.locator(r#"[data-test="inventory-item-price"]"#)
    }

    pub fn product_image(&self) -> Locator {
        self.page.locator("img.inventory_details_img")
    }

    /// The button id embeds the product slug, so match on the prefix
    pub fn add_to_cart_button(&self) -> Locator {
        self.page.locator(r#"[data-test^="add-to-cart"]"#)
    }

    pub fn remove_button(&self) -> Locator {
        self.page.locator(r#"[data-test^="remove"]"#)
    }

    pub fn back_button(&self) -> Locator {
        self.page.locator(r#"[data-test="back-to-products"]"#)
    }

    pub async fn add_to_cart(&self) -> E2eResult<()> {
        self.add_to_cart_button().click().await
    }

    pub async fn remove_from_cart(&self) -> E2eResult<()> {
        self.remove_button().click().await
    }

    pub async fn go_back_to_products(&self) -> E2eResult<()> {
        self.back_button().click().await
    }

    pub async fn expect_to_be_visible(&self) -> E2eResult<()> {
        for locator in [
            self.product_name(),
            self.product_description(),
            self.product_price(),
            self.product_image(),
            self.back_button(),
        ] {
            expect(&locator).to_be_visible().await?;
        }
        Ok(())
    }

    pub async fn expect_product_name(&self, name: &str) -> E2eResult<()> {
        expect(&self.product_name()).to_have_text(name).await
    }

    pub async fn expect_product_price(&self, price: &str) -> E2eResult<()> {
        expect(&self.product_price()).to_have_text(price).await
    }

    pub async fn expect_add_to_cart_visible(&self) -> E2eResult<()> {
        expect(&self.add_to_cart_button()).to_be_visible().await
    }

    pub async fn expect_remove_visible(&self) -> E2eResult<()> {
        expect(&self.remove_button()).to_be_visible().await
    }
}
