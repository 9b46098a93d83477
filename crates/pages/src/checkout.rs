//! Checkout flow: customer information, overview, confirmation

use saucedemo_common::urls;
use saucedemo_e2e::{expect, expect_page, E2eResult, Locator, Page, UrlMatcher};
use tracing::debug;

async fn expect_route(page: &Page, path: &str) -> E2eResult<()> {
    expect_page(page)
        .to_have_url(UrlMatcher::exact(page.resolve(path)))
        .await
}

/// Step one: first name, last name and postal code
#[derive(Debug, Clone)]
pub struct CheckoutStepOnePage {
    page: Page,
}

impl CheckoutStepOnePage {
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    pub fn page_title(&self) -> Locator {
        self.page.locator(r#"[data-test="title"]"#)
    }

    pub fn first_name_input(&self) -> Locator {
        self.page.locator(r#"[data-test="firstName"]"#)
    }

    pub fn last_name_input(&self) -> Locator {
        self.page.locator(r#"[data-test="lastName"]"#)
    }

    pub fn postal_code_input(&self) -> Locator {
        self.page.locator(r#"[data-test="postalCode"]"#)
    }

    pub fn continue_button(&self) -> Locator {
        self.page.locator(r#"[data-test="continue"]"#)
    }

    pub fn cancel_button(&self) -> Locator {
        self.page.locator(r#"[data-test="cancel"]"#)
    }

    pub fn error_message(&self) -> Locator {
        self.page.locator(r#"[data-test="error"]"#)
    }

    pub async fn goto(&self) -> E2eResult<()> {
        self.page.goto(urls::CHECKOUT_STEP_ONE).await
    }

    /// Fill all three fields; empty strings leave a field blank
    pub async fn fill_info(
        &self,
        first_name: &str,
        last_name: &str,
        postal_code: &str,
    ) -> E2eResult<()> {
        debug!(
            "Checkout info: '{}' '{}' '{}'",
            first_name, last_name, postal_code
        );
        self.first_name_input().fill(first_name).await?;
        self.last_name_input().fill(last_name).await?;
        self.postal_code_input().fill(postal_code).await
    }

    pub async fn click_continue(&self) -> E2eResult<()> {
        self.continue_button().click().await
    }

    pub async fn click_cancel(&self) -> E2eResult<()> {
        self.cancel_button().click().await
    }

    pub async fn expect_to_be_visible(&self) -> E2eResult<()> {
        expect(&self.page_title())
            .to_have_text("Checkout: Your Information")
            .await?;
        for locator in [
            self.first_name_input(),
            self.last_name_input(),
            self.postal_code_input(),
            self.continue_button(),
            self.cancel_button(),
        ] {
            expect(&locator).to_be_visible().await?;
        }
        Ok(())
    }

    pub async fn expect_error_message(&self, message: &str) -> E2eResult<()> {
        expect(&self.page.get_by_text(message)).to_be_visible().await
    }

    pub async fn expect_url(&self) -> E2eResult<()> {
        expect_route(&self.page, urls::CHECKOUT_STEP_ONE).await
    }
}

/// Step two: order overview with totals
#[derive(Debug, Clone)]
pub struct CheckoutStepTwoPage {
    page: Page,
}

impl CheckoutStepTwoPage {
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    pub fn page_title(&self) -> Locator {
        self.page.locator(r#"[data-test="title"]"#)
    }

    pub fn cart_items(&self) -> Locator {
        self.page.locator(r#"[data-test="inventory-item"]"#)
    }

    pub fn payment_info(&self) -> Locator {
        self.page.locator(r#"[data-test="payment-info-value"]"#)
    }

    pub fn shipping_info(&self) -> Locator {
        self.page.locator(r#"[data-test="shipping-info-value"]"#)
    }

    pub fn subtotal_label(&self) -> Locator {
        self.page.locator(r#"[data-test="subtotal-label"]"#)
    }

    pub fn tax_label(&self) -> Locator {
        self.page.locator(r#"[data-test="tax-label"]"#)
    }

    pub fn total_label(&self) -> Locator {
        self.page.locator(r#"[data-test="total-label"]"#)
    }

    pub fn finish_button(&self) -> Locator {
        self.page.locator(r#"[data-test="finish"]"#)
    }

    pub fn cancel_button(&self) -> Locator {
        self.page.locator(r#"[data-test="cancel"]"#)
    }

    pub async fn click_finish(&self) -> E2eResult<()> {
        self.finish_button().click().await
    }

    pub async fn click_cancel(&self) -> E2eResult<()> {
        self.cancel_button().click().await
    }

    pub async fn expect_to_be_visible(&self) -> E2eResult<()> {
        expect(&self.page_title())
            .to_have_text("Checkout: Overview")
            .await?;
        expect(&self.finish_button()).to_be_visible().await?;
        expect(&self.cancel_button()).to_be_visible().await
    }

    pub async fn expect_payment_info(&self, info: &str) -> E2eResult<()> {
        expect(&self.payment_info()).to_have_text(info).await
    }

    pub async fn expect_shipping_info(&self, info: &str) -> E2eResult<()> {
        expect(&self.shipping_info()).to_have_text(info).await
    }

    /// The label reads `Item total: $x.yy`, so only the amount is matched
    pub async fn expect_subtotal(&self, amount: &str) -> E2eResult<()> {
        expect(&self.subtotal_label()).to_contain_text(amount).await
    }

    pub async fn expect_item_count(&self, count: usize) -> E2eResult<()> {
        expect(&self.cart_items()).to_have_count(count).await
    }

    pub async fn expect_url(&self) -> E2eResult<()> {
        expect_route(&self.page, urls::CHECKOUT_STEP_TWO).await
    }
}

/// Order confirmation
#[derive(Debug, Clone)]
pub struct CheckoutCompletePage {
    page: Page,
}

impl CheckoutCompletePage {
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    pub fn page_title(&self) -> Locator {
        self.page.locator(r#"[data-test="title"]"#)
    }

    pub fn complete_header(&self) -> Locator {
        self.page.locator(r#"[data-test="complete-header"]"#)
    }

    pub fn complete_text(&self) -> Locator {
        self.page.locator(r#"[data-test="complete-text"]"#)
    }

    pub fn pony_express_image(&self) -> Locator {
        self.page.locator(r#"[data-test="pony-express"]"#)
    }

    pub fn back_home_button(&self) -> Locator {
        self.page.locator(r#"[data-test="back-to-products"]"#)
    }

    pub async fn click_back_home(&self) -> E2eResult<()> {
        self.back_home_button().click().await
    }

    pub async fn expect_to_be_visible(&self) -> E2eResult<()> {
        expect(&self.page_title())
            .to_have_text("Checkout: Complete!")
            .await?;
        expect(&self.complete_header())
            .to_have_text("Thank you for your order!")
            .await?;
        expect(&self.pony_express_image()).to_be_visible().await?;
        expect(&self.back_home_button()).to_be_visible().await
    }

    pub async fn expect_url(&self) -> E2eResult<()> {
        expect_route(&self.page, urls::CHECKOUT_COMPLETE).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use saucedemo_common::test_data;
    use saucedemo_e2e::testing::RecordingTransport;
    use saucedemo_e2e::E2eError;
    use test_case::test_case;

    #[tokio::test]
    async fn test_fill_info_in_field_order() {
        let transport = RecordingTransport::new();
        CheckoutStepOnePage::new(transport.page())
            .fill_info(test_data::FIRST_NAME, "", test_data::ZIP_CODE)
            .await
            .unwrap();

        let fills: Vec<_> = transport
            .calls_to("action")
            .iter()
            .map(|c| {
                (
                    c["locator"][0]["selector"].as_str().unwrap().to_string(),
                    c["value"].as_str().unwrap().to_string(),
                )
            })
            .collect();
        assert_eq!(
            fills,
            [
                (r#"[data-test="firstName"]"#.to_string(), "John".to_string()),
                (r#"[data-test="lastName"]"#.to_string(), String::new()),
                (r#"[data-test="postalCode"]"#.to_string(), "12345".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_step_one_visible_stops_on_title() {
        let transport = RecordingTransport::new();
        transport.fail(
            "expect",
            E2eError::AssertionFailed("received 'Your Cart'".to_string()),
        );

        let err = CheckoutStepOnePage::new(transport.page())
            .expect_to_be_visible()
            .await
            .unwrap_err();
        assert!(err.to_string().contains("toHaveText"));
        assert_eq!(transport.calls_to("expect").len(), 1);
    }

    #[tokio::test]
    async fn test_subtotal_uses_contains() {
        let transport = RecordingTransport::new();
        CheckoutStepTwoPage::new(transport.page())
            .expect_subtotal("$39.98")
            .await
            .unwrap();

        let check = &transport.calls_to("expect")[0];
        assert_eq!(check["assertion"]["type"], "contains_text");
        assert_eq!(check["assertion"]["expected"], "$39.98");
    }

    #[test_case(0 => "https://www.saucedemo.com/checkout-step-one.html")]
    #[test_case(1 => "https://www.saucedemo.com/checkout-step-two.html")]
    #[test_case(2 => "https://www.saucedemo.com/checkout-complete.html")]
    fn test_step_urls(step: usize) -> String {
        tokio::runtime::Runtime::new().unwrap().block_on(async {
            let transport = RecordingTransport::new();
            let page = transport.page();
            match step {
                0 => CheckoutStepOnePage::new(page).expect_url().await,
                1 => CheckoutStepTwoPage::new(page).expect_url().await,
                _ => CheckoutCompletePage::new(page).expect_url().await,
            }
            .unwrap();
            transport.calls_to("expectPage")[0]["url"]["value"]
                .as_str()
                .unwrap()
                .to_string()
        })
    }

    #[tokio::test]
    async fn test_complete_visible_checks_header_text() {
        let transport = RecordingTransport::new();
        CheckoutCompletePage::new(transport.page())
            .expect_to_be_visible()
            .await
            .unwrap();

        let checks = transport.calls_to("expect");
        assert_eq!(checks.len(), 4);
        assert_eq!(checks[1]["assertion"]["expected"], "Thank you for your order!");
    }
}
