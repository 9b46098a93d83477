//! SauceDemo page objects
//!
//! One type per page or page region. Each wraps the test's [`Page`] and
//! exposes three kinds of members:
//! - locator getters, rebuilt on every call
//! - one-line actions (`goto`, `login`, `add_to_cart`, ...)
//! - `expect_*` assertions built on web-first `expect`
//!
//! Every type implements [`Fixture`](saucedemo_e2e::Fixture), so a test asks
//! its context for `ctx.fixture::<CartPage>()` and receives the instance
//! shared by the whole attempt.
//!
//! [`Page`]: saucedemo_e2e::Page

pub mod cart;
pub mod checkout;
pub mod header;
pub mod inventory;
pub mod login;
pub mod menu;
pub mod product_detail;

pub use cart::CartPage;
pub use checkout::{CheckoutCompletePage, CheckoutStepOnePage, CheckoutStepTwoPage};
pub use header::HeaderComponent;
pub use inventory::{InventoryPage, SortOption};
pub use login::LoginPage;
pub use menu::MenuComponent;
pub use product_detail::ProductDetailPage;

/// Implement `Fixture` for page objects built straight from the page
macro_rules! page_fixture {
    ($($ty:ty),+ $(,)?) => {
        $(
            #[async_trait::async_trait]
            impl saucedemo_e2e::Fixture for $ty {
                async fn setup(page: &saucedemo_e2e::Page) -> saucedemo_e2e::E2eResult<Self> {
                    Ok(Self::new(page.clone()))
                }
            }
        )+
    };
}

page_fixture!(
    CartPage,
    CheckoutCompletePage,
    CheckoutStepOnePage,
    CheckoutStepTwoPage,
    HeaderComponent,
    LoginPage,
    MenuComponent,
    ProductDetailPage,
);

#[cfg(test)]
mod tests {
    use super::*;
    use saucedemo_e2e::testing::RecordingTransport;
    use saucedemo_e2e::Fixture;

    #[tokio::test]
    async fn test_plain_fixtures_share_the_page() {
        let transport = RecordingTransport::new();
        let page = transport.page();

        let login = LoginPage::setup(&page).await.unwrap();
        CartPage::setup(&page).await.unwrap();
        MenuComponent::setup(&page).await.unwrap();
        assert_eq!(login.page().id(), page.id());

        // only the inventory fixture touches the browser during setup
        assert!(transport.calls().is_empty());
    }
}
