//! HTTP-level checks against the storefront, no browser involved

use std::collections::HashMap;
use std::time::Duration;

use reqwest::Method;
use saucedemo_common::urls;
use saucedemo_e2e::{ensure, ensure_eq, ApiResponse, E2eResult, Suite, TestCase, TestContext};

/// Upper bound for the login page round trip
pub const RESPONSE_BUDGET: Duration = Duration::from_secs(3);

const CONCURRENT_REQUESTS: usize = 5;

pub fn suites() -> Vec<Suite> {
    vec![
        page_responses(),
        response_headers(),
        static_assets(),
        http_methods(),
        performance(),
    ]
}

fn page_responses() -> Suite {
    Suite::new("API Tests - Page Responses").tests([
        TestCase::new("Login page returns 200", |ctx| {
            Box::pin(login_page_ok(ctx))
        }),
        TestCase::new("SPA routes return 404 without client-side rendering", |ctx| {
            Box::pin(spa_routes_not_found(ctx))
        }),
        TestCase::new("Non-existent page returns 404", |ctx| {
            Box::pin(missing_page_not_found(ctx))
        }),
    ])
}

fn response_headers() -> Suite {
    Suite::new("API Tests - Response Headers").tests([
        TestCase::new("Login page has correct content type", |ctx| {
            Box::pin(login_content_type(ctx))
        }),
        TestCase::new("Response includes standard headers", |ctx| {
            Box::pin(standard_headers(ctx))
        }),
        TestCase::new("Response body is non-empty HTML", |ctx| {
            Box::pin(html_body(ctx))
        }),
    ])
}

fn static_assets() -> Suite {
    Suite::new("API Tests - Static Assets").tests([
        TestCase::new("Favicon is accessible", |ctx| Box::pin(favicon(ctx))),
        TestCase::new("Manifest file is accessible", |ctx| {
            Box::pin(manifest(ctx))
        }),
    ])
}

fn http_methods() -> Suite {
    Suite::new("API Tests - HTTP Methods").tests([
        TestCase::new("HEAD request returns headers without body", |ctx| {
            Box::pin(head_request(ctx))
        }),
        TestCase::new("OPTIONS request is handled", |ctx| {
            Box::pin(options_request(ctx))
        }),
        TestCase::new("POST to root is rejected or returns non-200", |ctx| {
            Box::pin(post_rejected(ctx))
        }),
    ])
}

fn performance() -> Suite {
    Suite::new("API Tests - Performance").tests([
        TestCase::new("Login page responds within 3 seconds", |ctx| {
            Box::pin(login_response_time(ctx))
        }),
        TestCase::new("Multiple concurrent requests succeed", |ctx| {
            Box::pin(concurrent_requests(ctx))
        }),
    ])
}

fn ensure_header_contains(response: &ApiResponse, name: &str, expected: &str) -> E2eResult<()> {
    let value = response.header(name).unwrap_or_default();
    ensure!(
        value.contains(expected),
        "header {} is '{}', expected it to contain '{}'",
        name,
        value,
        expected
    );
    Ok(())
}

async fn login_page_ok(ctx: &TestContext) -> E2eResult<()> {
    let response = ctx.request().get(urls::LOGIN).await?;
    ensure_eq!(response.status, 200);
    ensure_header_contains(&response, "content-type", "text/html")
}

async fn spa_routes_not_found(ctx: &TestContext) -> E2eResult<()> {
    // client-side routes have no file behind them on the server
    for route in urls::SPA_ROUTES {
        let response = ctx.request().get(route).await?;
        ensure!(
            response.status == 404,
            "{} returned {}, expected 404",
            route,
            response.status
        );
    }
    Ok(())
}

async fn missing_page_not_found(ctx: &TestContext) -> E2eResult<()> {
    let response = ctx.request().get("/does-not-exist.html").await?;
    ensure_eq!(response.status, 404);
    Ok(())
}

async fn login_content_type(ctx: &TestContext) -> E2eResult<()> {
    let response = ctx.request().get(urls::LOGIN).await?;
    ensure_header_contains(&response, "content-type", "text/html")
}

async fn standard_headers(ctx: &TestContext) -> E2eResult<()> {
    let response = ctx.request().get(urls::LOGIN).await?;
    for name in ["content-type", "content-length"] {
        ensure!(
            response.header(name).is_some(),
            "missing header {} in {:?}",
            name,
            response.headers.keys().collect::<Vec<_>>()
        );
    }
    Ok(())
}

async fn html_body(ctx: &TestContext) -> E2eResult<()> {
    let response = ctx.request().get(urls::LOGIN).await?;
    let body = response.text();
    ensure!(!body.is_empty(), "empty body");
    ensure!(body.contains("<!doctype html>"), "body has no doctype");
    ensure!(body.contains(r#"<div id="root">"#), "body has no root element");
    Ok(())
}

async fn favicon(ctx: &TestContext) -> E2eResult<()> {
    let response = ctx.request().get("/favicon.ico").await?;
    ensure_eq!(response.status, 200);
    Ok(())
}

async fn manifest(ctx: &TestContext) -> E2eResult<()> {
    let response = ctx.request().get("/manifest.json").await?;
    ensure_eq!(response.status, 200);
    ensure_header_contains(&response, "content-type", "application/json")
}

async fn head_request(ctx: &TestContext) -> E2eResult<()> {
    let response = ctx.request().head(urls::LOGIN).await?;
    ensure_eq!(response.status, 200);
    ensure_header_contains(&response, "content-type", "text/html")
}

async fn options_request(ctx: &TestContext) -> E2eResult<()> {
    let response = ctx.request().fetch(Method::OPTIONS, urls::LOGIN).await?;
    ensure!(
        [200, 204, 405].contains(&response.status),
        "OPTIONS returned {}",
        response.status
    );
    Ok(())
}

async fn post_rejected(ctx: &TestContext) -> E2eResult<()> {
    let data: HashMap<_, _> = [("username", "test"), ("password", "test")]
        .into_iter()
        .collect();
    let response = ctx.request().post_json(urls::LOGIN, &data).await?;

    // a static host has nothing to accept the form
    ensure!(response.status != 200, "POST / was accepted");
    Ok(())
}

async fn login_response_time(ctx: &TestContext) -> E2eResult<()> {
    let response = ctx.request().get(urls::LOGIN).await?;
    ensure_eq!(response.status, 200);
    ensure!(
        response.elapsed < RESPONSE_BUDGET,
        "login page took {} ms",
        response.elapsed.as_millis()
    );
    Ok(())
}

async fn concurrent_requests(ctx: &TestContext) -> E2eResult<()> {
    let requests = (0..CONCURRENT_REQUESTS).map(|_| ctx.request().get(urls::LOGIN));
    let responses = futures::future::join_all(requests).await;

    for (index, response) in responses.into_iter().enumerate() {
        let response = response?;
        ensure!(
            response.status == 200,
            "request {} returned {}",
            index,
            response.status
        );
    }
    Ok(())
}
