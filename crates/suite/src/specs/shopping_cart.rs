//! Adding, removing and reviewing cart items

use saucedemo_common::products::{self, Product};
use saucedemo_e2e::{E2eResult, Suite, TestCase, TestContext};
use saucedemo_pages::{CartPage, HeaderComponent, InventoryPage, ProductDetailPage};

use super::open_inventory;

pub fn suite() -> Suite {
    Suite::new("Shopping Cart")
        .before_each(|ctx| Box::pin(open_inventory(ctx)))
        .tests([
            TestCase::new("Add single item to cart @smoke", |ctx| {
                Box::pin(add_single_item(ctx))
            }),
            TestCase::new("Add multiple items to cart", |ctx| {
                Box::pin(add_multiple_items(ctx))
            }),
            TestCase::new("Remove item from inventory page", |ctx| {
                Box::pin(remove_from_inventory(ctx))
            }),
            TestCase::new("View cart with items @smoke", |ctx| {
                Box::pin(view_cart_with_items(ctx))
            }),
            TestCase::new("View empty cart", |ctx| Box::pin(view_empty_cart(ctx))),
            TestCase::new("Remove item from cart page", |ctx| {
                Box::pin(remove_from_cart_page(ctx))
            }),
            TestCase::new("Continue shopping from cart", |ctx| {
                Box::pin(continue_shopping(ctx))
            }),
            TestCase::new("Cart badge persists across pages", |ctx| {
                Box::pin(badge_persists(ctx))
            }),
            TestCase::new("Add all products to cart", |ctx| {
                Box::pin(add_all_products(ctx))
            }),
        ])
}

async fn add_single_item(ctx: &TestContext) -> E2eResult<()> {
    let inventory = ctx.fixture::<InventoryPage>().await?;
    let header = ctx.fixture::<HeaderComponent>().await?;

    inventory.add_to_cart(products::BACKPACK.name).await?;
    header.expect_badge_count(1).await?;
    inventory
        .expect_remove_button_visible(products::BACKPACK.name)
        .await
}

async fn add_multiple_items(ctx: &TestContext) -> E2eResult<()> {
    let inventory = ctx.fixture::<InventoryPage>().await?;
    let header = ctx.fixture::<HeaderComponent>().await?;

    let items = [products::BACKPACK, products::BIKE_LIGHT, products::BOLT_TSHIRT];
    for (added, product) in items.iter().enumerate() {
        inventory.add_to_cart(product.name).await?;
        header.expect_badge_count(added + 1).await?;
    }
    Ok(())
}

async fn remove_from_inventory(ctx: &TestContext) -> E2eResult<()> {
    let inventory = ctx.fixture::<InventoryPage>().await?;
    let header = ctx.fixture::<HeaderComponent>().await?;

    inventory.add_to_cart(products::BACKPACK.name).await?;
    header.expect_badge_count(1).await?;

    inventory.remove_from_cart(products::BACKPACK.name).await?;
    header.expect_badge_not_visible().await?;
    inventory
        .expect_add_to_cart_button_visible(products::BACKPACK.name)
        .await
}

async fn view_cart_with_items(ctx: &TestContext) -> E2eResult<()> {
    let inventory = ctx.fixture::<InventoryPage>().await?;
    let header = ctx.fixture::<HeaderComponent>().await?;
    let cart = ctx.fixture::<CartPage>().await?;

    let items = [products::BACKPACK, products::BIKE_LIGHT, products::BOLT_TSHIRT];
    add_all(&inventory, &items).await?;

    header.go_to_cart().await?;
    cart.expect_to_be_visible().await?;
    cart.expect_item_count(3).await?;
    for product in &items {
        cart.expect_item_visible(product.name).await?;
    }
    Ok(())
}

async fn view_empty_cart(ctx: &TestContext) -> E2eResult<()> {
    let header = ctx.fixture::<HeaderComponent>().await?;
    let cart = ctx.fixture::<CartPage>().await?;

    header.go_to_cart().await?;
    cart.expect_to_be_visible().await?;
    cart.expect_item_count(0).await
}

async fn remove_from_cart_page(ctx: &TestContext) -> E2eResult<()> {
    let inventory = ctx.fixture::<InventoryPage>().await?;
    let header = ctx.fixture::<HeaderComponent>().await?;
    let cart = ctx.fixture::<CartPage>().await?;

    add_all(&inventory, &[products::BACKPACK, products::BIKE_LIGHT]).await?;
    header.go_to_cart().await?;

    cart.remove_item(products::BACKPACK.name).await?;
    cart.expect_item_not_visible(products::BACKPACK.name).await?;
    cart.expect_item_visible(products::BIKE_LIGHT.name).await?;
    header.expect_badge_count(1).await
}

async fn continue_shopping(ctx: &TestContext) -> E2eResult<()> {
    let inventory = ctx.fixture::<InventoryPage>().await?;
    let header = ctx.fixture::<HeaderComponent>().await?;
    let cart = ctx.fixture::<CartPage>().await?;

    inventory.add_to_cart(products::BACKPACK.name).await?;
    header.go_to_cart().await?;
    cart.click_continue_shopping().await?;

    inventory.expect_to_be_visible().await?;
    header.expect_badge_count(1).await
}

async fn badge_persists(ctx: &TestContext) -> E2eResult<()> {
    let inventory = ctx.fixture::<InventoryPage>().await?;
    let header = ctx.fixture::<HeaderComponent>().await?;
    let detail = ctx.fixture::<ProductDetailPage>().await?;

    add_all(&inventory, &[products::BACKPACK, products::BIKE_LIGHT]).await?;
    header.expect_badge_count(2).await?;

    inventory.click_product(products::BACKPACK.name).await?;
    header.expect_badge_count(2).await?;

    detail.go_back_to_products().await?;
    header.expect_badge_count(2).await
}

async fn add_all_products(ctx: &TestContext) -> E2eResult<()> {
    let inventory = ctx.fixture::<InventoryPage>().await?;
    let header = ctx.fixture::<HeaderComponent>().await?;
    let cart = ctx.fixture::<CartPage>().await?;

    add_all(&inventory, &products::CATALOG).await?;
    header.expect_badge_count(6).await?;

    header.go_to_cart().await?;
    cart.expect_item_count(6).await
}

async fn add_all(inventory: &InventoryPage, items: &[Product]) -> E2eResult<()> {
    for product in items {
        inventory.add_to_cart(product.name).await?;
    }
    Ok(())
}
