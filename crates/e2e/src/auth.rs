//! Authenticated session persistence
//!
//! The setup project signs in once and snapshots the browser context
//! (cookies and local storage) to disk. Projects that declare the snapshot
//! start every context from it and skip the login form.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{E2eError, E2eResult};
use crate::page::Page;

/// Browser context snapshot written by Playwright's `storageState`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageState {
    #[serde(default)]
    pub cookies: Vec<Cookie>,
    #[serde(default)]
    pub origins: Vec<OriginState>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cookie {
    pub name: String,
    pub value: String,
    pub domain: String,
    pub path: String,

    /// Unix seconds; -1 for session cookies
    #[serde(default = "session_expiry")]
    pub expires: f64,

    #[serde(default)]
    pub http_only: bool,
    #[serde(default)]
    pub secure: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub same_site: Option<String>,
}

fn session_expiry() -> f64 {
    -1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OriginState {
    pub origin: String,
    #[serde(default)]
    pub local_storage: Vec<StorageEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageEntry {
    pub name: String,
    pub value: String,
}

impl StorageState {
    pub fn load(path: &Path) -> E2eResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            E2eError::StorageState(format!("cannot read {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&content).map_err(|e| {
            E2eError::StorageState(format!("{} is not a storage state: {}", path.display(), e))
        })
    }

    pub fn cookie(&self, name: &str) -> Option<&Cookie> {
        self.cookies.iter().find(|c| c.name == name)
    }

    pub fn local_storage(&self, origin: &str, key: &str) -> Option<&str> {
        let origin = origin.trim_end_matches('/');
        self.origins
            .iter()
            .find(|o| o.origin.trim_end_matches('/') == origin)?
            .local_storage
            .iter()
            .find(|e| e.name == key)
            .map(|e| e.value.as_str())
    }
}

/// Snapshot the page's context to `path` and read it back
pub async fn persist(page: &Page, path: &Path) -> E2eResult<StorageState> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    page.storage_state(path).await?;

    let state = StorageState::load(path)?;
    info!(
        "Saved session to {} ({} cookie(s), {} origin(s))",
        path.display(),
        state.cookies.len(),
        state.origins.len()
    );
    Ok(state)
}

/// Check that a saved session exists before a project relies on it
pub fn require(path: &Path, producer: &str) -> E2eResult<StorageState> {
    if !path.exists() {
        return Err(E2eError::StorageState(format!(
            "{} not found; run the '{}' project first",
            path.display(),
            producer
        )));
    }
    StorageState::load(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingTransport;

    const SNAPSHOT: &str = r#"{
        "cookies": [{
            "name": "session-username",
            "value": "standard_user",
            "domain": "www.saucedemo.com",
            "path": "/",
            "expires": 1767225600.5,
            "httpOnly": false,
            "secure": false,
            "sameSite": "Lax"
        }],
        "origins": [{
            "origin": "https://www.saucedemo.com",
            "localStorage": [{ "name": "cart-contents", "value": "[4]" }]
        }]
    }"#;

    #[test]
    fn test_load_and_query() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("user.json");
        std::fs::write(&path, SNAPSHOT).unwrap();

        let state = StorageState::load(&path).unwrap();
        let cookie = state.cookie("session-username").unwrap();
        assert_eq!(cookie.value, "standard_user");
        assert_eq!(cookie.same_site.as_deref(), Some("Lax"));
        assert!(state.cookie("missing").is_none());

        assert_eq!(
            state.local_storage("https://www.saucedemo.com/", "cart-contents"),
            Some("[4]")
        );
        assert_eq!(state.local_storage("https://example.com", "cart-contents"), None);
    }

    #[test]
    fn test_missing_fields_default() {
        let state: StorageState = serde_json::from_str("{}").unwrap();
        assert_eq!(state, StorageState::default());

        let cookie: Cookie = serde_json::from_str(
            r#"{"name": "a", "value": "b", "domain": "d", "path": "/"}"#,
        )
        .unwrap();
        assert_eq!(cookie.expires, -1.0);
    }

    #[test]
    fn test_require_names_producer() {
        let dir = tempfile::tempdir().unwrap();
        let err = require(&dir.path().join("user.json"), "setup").unwrap_err();
        assert!(err.to_string().contains("run the 'setup' project first"));
    }

    #[test]
    fn test_require_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("user.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(
            require(&path, "setup").unwrap_err(),
            E2eError::StorageState(_)
        ));
    }

    #[tokio::test]
    async fn test_persist_reads_back_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".auth").join("user.json");
        let transport = RecordingTransport::new();
        let page = transport.page();

        // the recording transport does not write files; stand in for the browser
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, SNAPSHOT).unwrap();

        let state = persist(&page, &path).await.unwrap();
        assert_eq!(state.cookies.len(), 1);
        assert_eq!(
            transport.calls_to("storageState")[0]["path"],
            path.to_str().unwrap()
        );
    }

    #[tokio::test]
    async fn test_persist_fails_when_nothing_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".auth").join("user.json");
        let transport = RecordingTransport::new();

        let err = persist(&transport.page(), &path).await.unwrap_err();
        assert!(matches!(err, E2eError::StorageState(_)));
        assert!(path.parent().unwrap().is_dir());
    }
}
