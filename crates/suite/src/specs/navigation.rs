//! Menu, header and footer navigation

use saucedemo_common::products;
use saucedemo_e2e::{expect, expect_page, E2eResult, Suite, TestCase, TestContext, UrlMatcher};
use saucedemo_pages::{CartPage, InventoryPage, MenuComponent, ProductDetailPage};

use super::open_inventory;

pub fn suite() -> Suite {
    Suite::new("Navigation")
        .before_each(|ctx| Box::pin(open_inventory(ctx)))
        .tests([
            TestCase::new("Menu - All Items link navigates back to inventory", |ctx| {
                Box::pin(all_items_link(ctx))
            }),
            TestCase::new("Menu - About link navigates to Sauce Labs", |ctx| {
                Box::pin(about_link(ctx))
            }),
            TestCase::new("Menu - Reset App State clears cart badge", |ctx| {
                Box::pin(reset_app_state(ctx))
            }),
            TestCase::new("Close menu hides menu items", |ctx| {
                Box::pin(close_menu(ctx))
            }),
            TestCase::new("Shopping cart icon navigates to cart page", |ctx| {
                Box::pin(cart_icon(ctx))
            }),
            TestCase::new("Back button in product detail returns to inventory", |ctx| {
                Box::pin(detail_back_button(ctx))
            }),
            TestCase::new("Footer social media links are visible", |ctx| {
                Box::pin(footer_links(ctx))
            }),
        ])
}

async fn all_items_link(ctx: &TestContext) -> E2eResult<()> {
    let inventory = ctx.fixture::<InventoryPage>().await?;
    let menu = ctx.fixture::<MenuComponent>().await?;
    let cart = ctx.fixture::<CartPage>().await?;

    inventory.go_to_cart().await?;
    cart.expect_to_be_visible().await?;

    inventory.open_menu().await?;
    menu.expect_menu_visible().await?;
    menu.click_all_items().await?;

    inventory.expect_to_be_visible().await?;
    inventory.expect_url().await
}

async fn about_link(ctx: &TestContext) -> E2eResult<()> {
    let inventory = ctx.fixture::<InventoryPage>().await?;
    let menu = ctx.fixture::<MenuComponent>().await?;

    inventory.open_menu().await?;
    menu.click_about().await?;

    expect_page(&ctx.page().await?)
        .to_have_url(UrlMatcher::pattern(r"saucelabs\.com")?)
        .await
}

async fn reset_app_state(ctx: &TestContext) -> E2eResult<()> {
    let inventory = ctx.fixture::<InventoryPage>().await?;
    let menu = ctx.fixture::<MenuComponent>().await?;

    inventory.add_to_cart(products::BACKPACK.name).await?;
    inventory.add_to_cart(products::BIKE_LIGHT.name).await?;
    inventory.expect_badge_count(2).await?;

    inventory.open_menu().await?;
    menu.click_reset_app_state().await?;

    inventory.expect_badge_not_visible().await
}

async fn close_menu(ctx: &TestContext) -> E2eResult<()> {
    let inventory = ctx.fixture::<InventoryPage>().await?;
    let menu = ctx.fixture::<MenuComponent>().await?;

    inventory.open_menu().await?;
    menu.expect_menu_visible().await?;

    menu.close_menu().await?;
    menu.expect_menu_hidden().await
}

async fn cart_icon(ctx: &TestContext) -> E2eResult<()> {
    let inventory = ctx.fixture::<InventoryPage>().await?;
    let cart = ctx.fixture::<CartPage>().await?;

    inventory.go_to_cart().await?;
    cart.expect_url().await
}

async fn detail_back_button(ctx: &TestContext) -> E2eResult<()> {
    let inventory = ctx.fixture::<InventoryPage>().await?;
    let detail = ctx.fixture::<ProductDetailPage>().await?;

    inventory.click_product(products::BACKPACK.name).await?;
    detail.expect_to_be_visible().await?;

    detail.go_back_to_products().await?;
    inventory.expect_to_be_visible().await
}

async fn footer_links(ctx: &TestContext) -> E2eResult<()> {
    let inventory = ctx.fixture::<InventoryPage>().await?;

    expect(&inventory.twitter_link()).to_be_visible().await?;
    expect(&inventory.facebook_link()).to_be_visible().await?;
    expect(&inventory.linkedin_link()).to_be_visible().await?;

    expect(&inventory.footer_text())
        .to_contain_text("Sauce Labs")
        .await
}
