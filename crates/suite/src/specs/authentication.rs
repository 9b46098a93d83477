//! Login, logout and login-form validation
//!
//! These run in a clean context: every test starts signed out.

use saucedemo_common::{messages, users, Credentials};
use saucedemo_e2e::{E2eResult, Suite, TestCase, TestContext};
use saucedemo_pages::{InventoryPage, LoginPage, MenuComponent};

pub fn login() -> Suite {
    Suite::new("Authentication - Login").tests([
        TestCase::new("Successful login with standard user @smoke", |ctx| {
            Box::pin(successful_login(ctx))
        }),
        TestCase::new("Login with invalid credentials", |ctx| {
            Box::pin(invalid_credentials(ctx))
        }),
        TestCase::new("Login attempt with locked out user", |ctx| {
            Box::pin(locked_out_user(ctx))
        }),
        TestCase::new("Login with problem user", |ctx| {
            Box::pin(problem_user(ctx))
        }),
    ])
}

pub fn logout() -> Suite {
    Suite::new("Authentication - Logout").test(TestCase::new("Successful logout", |ctx| {
        Box::pin(successful_logout(ctx))
    }))
}

pub fn validation() -> Suite {
    Suite::new("Authentication - Login Validation").tests([
        TestCase::new("Login with empty username", |ctx| {
            Box::pin(empty_username(ctx))
        }),
        TestCase::new("Login with empty password", |ctx| {
            Box::pin(empty_password(ctx))
        }),
        TestCase::new("Login with empty credentials", |ctx| {
            Box::pin(empty_credentials(ctx))
        }),
    ])
}

/// Open the login form and type both fields, checking each value landed
async fn fill_credentials(login: &LoginPage, user: Credentials) -> E2eResult<()> {
    login.goto().await?;
    login.expect_to_be_visible().await?;

    login.fill_username(user.username).await?;
    login.expect_username_value(user.username).await?;
    login.fill_password(user.password).await?;
    login.expect_password_value(user.password).await
}

async fn successful_login(ctx: &TestContext) -> E2eResult<()> {
    let login = ctx.fixture::<LoginPage>().await?;
    let inventory = ctx.fixture::<InventoryPage>().await?;

    login.goto().await?;
    login.expect_to_be_visible().await?;
    login.expect_hints_visible().await?;

    login.fill_username(users::STANDARD.username).await?;
    login.expect_username_value(users::STANDARD.username).await?;
    login.fill_password(users::STANDARD.password).await?;
    login.expect_password_value(users::STANDARD.password).await?;
    login.click_login().await?;

    inventory.expect_url().await?;
    inventory.expect_product_count(6).await?;
    inventory.expect_to_be_visible().await
}

async fn invalid_credentials(ctx: &TestContext) -> E2eResult<()> {
    let login = ctx.fixture::<LoginPage>().await?;
    let invalid = Credentials {
        username: "invalid_user",
        password: "wrong_password",
    };

    fill_credentials(&login, invalid).await?;
    login.click_login().await?;

    login
        .expect_error_message(messages::INVALID_CREDENTIALS)
        .await?;
    login.expect_to_be_visible().await?;
    login.expect_error_icons_visible().await
}

async fn locked_out_user(ctx: &TestContext) -> E2eResult<()> {
    let login = ctx.fixture::<LoginPage>().await?;

    fill_credentials(&login, users::LOCKED_OUT).await?;
    login.click_login().await?;

    login.expect_error_message(messages::LOCKED_OUT).await?;
    login.expect_to_be_visible().await?;
    login.expect_error_icons_visible().await?;

    login.dismiss_error().await?;
    login.expect_error_not_visible().await?;
    login.expect_error_icons_not_visible().await?;
    login.expect_to_be_visible().await
}

async fn problem_user(ctx: &TestContext) -> E2eResult<()> {
    let login = ctx.fixture::<LoginPage>().await?;
    let inventory = ctx.fixture::<InventoryPage>().await?;

    fill_credentials(&login, users::PROBLEM).await?;
    login.click_login().await?;

    // the inventory renders even though some of it is broken for this user
    inventory.expect_to_be_visible().await
}

async fn successful_logout(ctx: &TestContext) -> E2eResult<()> {
    let login = ctx.fixture::<LoginPage>().await?;
    let inventory = ctx.fixture::<InventoryPage>().await?;
    let menu = ctx.fixture::<MenuComponent>().await?;

    login.goto().await?;
    login
        .login(users::STANDARD.username, users::STANDARD.password)
        .await?;
    inventory.expect_to_be_visible().await?;

    inventory.open_menu().await?;
    menu.expect_menu_visible().await?;
    menu.click_logout().await?;

    login.expect_to_be_visible().await
}

async fn empty_username(ctx: &TestContext) -> E2eResult<()> {
    let login = ctx.fixture::<LoginPage>().await?;

    login.goto().await?;
    login.expect_to_be_visible().await?;
    login.expect_username_value("").await?;

    login.fill_password(users::STANDARD.password).await?;
    login.expect_password_value(users::STANDARD.password).await?;
    login.click_login().await?;

    login.expect_error_message(messages::USERNAME_REQUIRED).await?;
    login.expect_to_be_visible().await?;
    login.expect_error_icons_visible().await
}

async fn empty_password(ctx: &TestContext) -> E2eResult<()> {
    let login = ctx.fixture::<LoginPage>().await?;

    login.goto().await?;
    login.expect_to_be_visible().await?;

    login.fill_username(users::STANDARD.username).await?;
    login.expect_username_value(users::STANDARD.username).await?;
    login.expect_password_value("").await?;
    login.click_login().await?;

    login.expect_error_message(messages::PASSWORD_REQUIRED).await?;
    login.expect_to_be_visible().await?;
    login.expect_error_icons_visible().await
}

async fn empty_credentials(ctx: &TestContext) -> E2eResult<()> {
    let login = ctx.fixture::<LoginPage>().await?;

    login.goto().await?;
    login.expect_to_be_visible().await?;
    login.expect_username_value("").await?;
    login.expect_password_value("").await?;
    login.click_login().await?;

    // username is validated first
    login.expect_error_message(messages::USERNAME_REQUIRED).await?;
    login.expect_to_be_visible().await
}
