//! Product listing, detail pages and sorting

use saucedemo_common::products;
use saucedemo_e2e::{ensure, ensure_eq, E2eResult, Suite, TestCase, TestContext};
use saucedemo_pages::{InventoryPage, ProductDetailPage, SortOption};

use super::open_inventory;

pub fn suite() -> Suite {
    Suite::new("Product Catalog")
        .before_each(|ctx| Box::pin(open_inventory(ctx)))
        .tests([
            TestCase::new("View product inventory", |ctx| {
                Box::pin(view_inventory(ctx))
            }),
            TestCase::new("View product details", |ctx| {
                Box::pin(view_details(ctx))
            }),
            TestCase::new("Sort products by name A to Z", |ctx| {
                Box::pin(sort_name_ascending(ctx))
            }),
            TestCase::new("Sort products by name Z to A", |ctx| {
                Box::pin(sort_name_descending(ctx))
            }),
            TestCase::new("Sort products by price low to high", |ctx| {
                Box::pin(sort_price_ascending(ctx))
            }),
            TestCase::new("Sort products by price high to low", |ctx| {
                Box::pin(sort_price_descending(ctx))
            }),
            TestCase::new("Add to cart from product detail page", |ctx| {
                Box::pin(add_from_detail(ctx))
            }),
        ])
}

/// Check the first and last entry of a listing
fn ensure_ends(listing: &[String], first: &str, last: &str) -> E2eResult<()> {
    ensure!(!listing.is_empty(), "product listing is empty");
    ensure_eq!(listing[0], first);
    ensure_eq!(listing[listing.len() - 1], last);
    Ok(())
}

async fn view_inventory(ctx: &TestContext) -> E2eResult<()> {
    let inventory = ctx.fixture::<InventoryPage>().await?;

    inventory.expect_to_be_visible().await?;
    inventory.expect_product_count(6).await?;

    let names = inventory.product_names().await?;
    for product in &products::CATALOG {
        ensure!(
            names.iter().any(|n| n == product.name),
            "'{}' missing from {:?}",
            product.name,
            names
        );
    }
    Ok(())
}

async fn view_details(ctx: &TestContext) -> E2eResult<()> {
    let inventory = ctx.fixture::<InventoryPage>().await?;
    let detail = ctx.fixture::<ProductDetailPage>().await?;

    inventory.click_product(products::BACKPACK.name).await?;
    detail.expect_to_be_visible().await?;
    detail.expect_product_name(products::BACKPACK.name).await?;
    detail.expect_product_price(products::BACKPACK.price).await?;

    detail.go_back_to_products().await?;
    inventory.expect_to_be_visible().await
}

async fn sort_name_ascending(ctx: &TestContext) -> E2eResult<()> {
    // default order, no selection needed
    let inventory = ctx.fixture::<InventoryPage>().await?;
    let names = inventory.product_names().await?;
    ensure_ends(&names, products::BACKPACK.name, products::RED_TSHIRT.name)
}

async fn sort_name_descending(ctx: &TestContext) -> E2eResult<()> {
    let inventory = ctx.fixture::<InventoryPage>().await?;
    inventory.sort_by(SortOption::NameDescending).await?;

    let names = inventory.product_names().await?;
    ensure_ends(&names, products::RED_TSHIRT.name, products::BACKPACK.name)
}

async fn sort_price_ascending(ctx: &TestContext) -> E2eResult<()> {
    let inventory = ctx.fixture::<InventoryPage>().await?;
    inventory.sort_by(SortOption::PriceAscending).await?;

    let prices = inventory.product_prices().await?;
    ensure_ends(&prices, products::ONESIE.price, products::FLEECE_JACKET.price)
}

async fn sort_price_descending(ctx: &TestContext) -> E2eResult<()> {
    let inventory = ctx.fixture::<InventoryPage>().await?;
    inventory.sort_by(SortOption::PriceDescending).await?;

    let prices = inventory.product_prices().await?;
    ensure_ends(&prices, products::FLEECE_JACKET.price, products::ONESIE.price)
}

async fn add_from_detail(ctx: &TestContext) -> E2eResult<()> {
    let inventory = ctx.fixture::<InventoryPage>().await?;
    let detail = ctx.fixture::<ProductDetailPage>().await?;

    inventory.click_product(products::BACKPACK.name).await?;
    detail.add_to_cart().await?;
    detail.expect_remove_visible().await?;

    detail.go_back_to_products().await?;
    inventory
        .expect_remove_button_visible(products::BACKPACK.name)
        .await
}
