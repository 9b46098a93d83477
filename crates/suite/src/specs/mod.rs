//! Test specifications, one module per feature area

pub mod api;
pub mod authentication;
pub mod checkout;
pub mod navigation;
pub mod problem_user;
pub mod product_catalog;
pub mod setup;
pub mod shopping_cart;

use saucedemo_e2e::{E2eResult, TestContext};
use saucedemo_pages::InventoryPage;

/// Before-each hook for signed-in suites: land on the product list with an
/// empty cart
pub(crate) async fn open_inventory(ctx: &TestContext) -> E2eResult<()> {
    ctx.fixture::<InventoryPage>().await?.goto().await
}
