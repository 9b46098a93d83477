//! Known defects of the `problem_user` account
//!
//! Two of these are expected to fail until the store fixes them; a pass is
//! reported as a failure so a fix does not go unnoticed.

use saucedemo_common::{products, test_data, users};
use saucedemo_e2e::{ensure, expect, E2eResult, Suite, TestCase, TestContext};
use saucedemo_pages::{CartPage, CheckoutStepOnePage, HeaderComponent, InventoryPage, LoginPage};

pub fn suite() -> Suite {
    Suite::new("Problem User - Known Issues")
        .before_each(|ctx| Box::pin(login_as_problem_user(ctx)))
        .tests([
            TestCase::new("Problem user - product images are incorrect", |ctx| {
                Box::pin(images_are_identical(ctx))
            }),
            TestCase::new("Problem user - add to cart inconsistency", |ctx| {
                Box::pin(add_to_cart_inconsistency(ctx))
            })
            .expect_failure(),
            TestCase::new("Problem user - checkout form field issues", |ctx| {
                Box::pin(checkout_form_fields(ctx))
            })
            .expect_failure(),
            TestCase::new("Problem user - can still complete login", |ctx| {
                Box::pin(can_complete_login(ctx))
            }),
        ])
}

async fn login_as_problem_user(ctx: &TestContext) -> E2eResult<()> {
    let login = ctx.fixture::<LoginPage>().await?;
    login.goto().await?;
    login
        .login(users::PROBLEM.username, users::PROBLEM.password)
        .await
}

async fn images_are_identical(ctx: &TestContext) -> E2eResult<()> {
    let inventory = ctx.fixture::<InventoryPage>().await?;
    inventory.expect_to_be_visible().await?;

    let images = inventory.inventory_items().locator("img");
    let first = images.first().get_attribute("src").await?;
    let all = images.all_attributes("src").await?;

    // every card shows the same picture for this user
    for (index, src) in all.iter().enumerate() {
        ensure!(
            *src == first,
            "image {} has src {:?}, expected {:?}",
            index,
            src,
            first
        );
    }
    Ok(())
}

async fn add_to_cart_inconsistency(ctx: &TestContext) -> E2eResult<()> {
    let inventory = ctx.fixture::<InventoryPage>().await?;
    let header = ctx.fixture::<HeaderComponent>().await?;

    inventory.expect_to_be_visible().await?;
    inventory.add_to_cart(products::BACKPACK.name).await?;
    header.expect_badge_count(1).await?;
    inventory.add_to_cart(products::BIKE_LIGHT.name).await?;
    header.expect_badge_count(2).await?;

    // the Remove button does not update the cart for this user
    inventory.remove_from_cart(products::BACKPACK.name).await?;
    header.expect_badge_count(1).await
}

async fn checkout_form_fields(ctx: &TestContext) -> E2eResult<()> {
    let inventory = ctx.fixture::<InventoryPage>().await?;
    let header = ctx.fixture::<HeaderComponent>().await?;
    let cart = ctx.fixture::<CartPage>().await?;
    let step_one = ctx.fixture::<CheckoutStepOnePage>().await?;

    inventory.expect_to_be_visible().await?;
    inventory.add_to_cart(products::BACKPACK.name).await?;
    header.expect_badge_count(1).await?;

    header.go_to_cart().await?;
    cart.expect_to_be_visible().await?;
    cart.click_checkout().await?;

    step_one.expect_to_be_visible().await?;
    step_one
        .fill_info(
            test_data::FIRST_NAME,
            test_data::LAST_NAME,
            test_data::ZIP_CODE,
        )
        .await?;

    // typing into last name overwrites first name for this user
    expect(&step_one.last_name_input())
        .to_have_value(test_data::LAST_NAME)
        .await
}

async fn can_complete_login(ctx: &TestContext) -> E2eResult<()> {
    let inventory = ctx.fixture::<InventoryPage>().await?;
    inventory.expect_to_be_visible().await?;
    inventory.expect_product_count(6).await
}
