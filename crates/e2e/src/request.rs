//! HTTP request fixture for API-level tests

use std::collections::HashMap;
use std::time::{Duration, Instant};

use reqwest::Method;
use serde::Serialize;
use tracing::debug;

use saucedemo_common::urls;

use crate::error::E2eResult;

/// HTTP client bound to the target's base URL
#[derive(Debug, Clone)]
pub struct ApiRequest {
    client: reqwest::Client,
    base_url: String,
}

/// A fully read HTTP response
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,

    /// Header names are lower-cased
    pub headers: HashMap<String, String>,

    pub body: String,

    /// Time from sending the request until the body was read
    pub elapsed: Duration,
}

impl ApiResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn text(&self) -> &str {
        &self.body
    }

    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

impl ApiRequest {
    pub fn new(base_url: &str, timeout: Duration) -> E2eResult<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn get(&self, path: &str) -> E2eResult<ApiResponse> {
        self.fetch(Method::GET, path).await
    }

    pub async fn head(&self, path: &str) -> E2eResult<ApiResponse> {
        self.fetch(Method::HEAD, path).await
    }

    pub async fn post_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        data: &T,
    ) -> E2eResult<ApiResponse> {
        let request = self.client.post(self.url(path)).json(data);
        Self::send(request).await
    }

    /// Send a request with an arbitrary method and no body
    pub async fn fetch(&self, method: Method, path: &str) -> E2eResult<ApiResponse> {
        let request = self.client.request(method, self.url(path));
        Self::send(request).await
    }

    fn url(&self, path: &str) -> String {
        urls::absolute(&self.base_url, path)
    }

    async fn send(request: reqwest::RequestBuilder) -> E2eResult<ApiResponse> {
        let start = Instant::now();
        let response = request.send().await?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_ascii_lowercase(), v.to_string()))
            })
            .collect();
        let url = response.url().to_string();
        let body = response.text().await?;
        let elapsed = start.elapsed();

        debug!("{} -> {} ({} ms)", url, status, elapsed.as_millis());

        Ok(ApiResponse {
            status,
            headers,
            body,
            elapsed,
        })
    }
}
