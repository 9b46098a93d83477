//! Authentication bootstrap
//!
//! Signs in once as the standard user and saves the session for the `e2e`
//! project, whose contexts start already logged in.

use std::path::{Path, PathBuf};

use saucedemo_common::{urls, users};
use saucedemo_e2e::{auth, E2eResult, Suite, TestCase, TestContext};
use saucedemo_pages::LoginPage;

pub fn suite(auth_file: PathBuf) -> Suite {
    Suite::new("").test(TestCase::new(
        "authenticate as standard user",
        move |ctx| {
            let auth_file = auth_file.clone();
            Box::pin(async move { authenticate(ctx, &auth_file).await })
        },
    ))
}

async fn authenticate(ctx: &TestContext, auth_file: &Path) -> E2eResult<()> {
    let login = ctx.fixture::<LoginPage>().await?;
    login.goto().await?;
    login
        .login(users::STANDARD.username, users::STANDARD.password)
        .await?;

    login.page().wait_for_url(urls::INVENTORY).await?;
    auth::persist(login.page(), auth_file).await?;
    Ok(())
}
