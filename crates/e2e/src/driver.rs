//! Playwright driver bridge
//!
//! Playwright runs inside a long-lived `node` child process executing the
//! embedded `driver.js`. Requests and responses are single JSON lines tagged
//! with a request id, so several pages can share one process.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, Command as TokioCommand};
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use saucedemo_common::{BrowserKind, SuiteConfig};

use crate::error::{E2eError, E2eResult};

const DRIVER_SCRIPT: &str = include_str!("../driver/driver.js");

/// Carries requests to a browser implementation.
///
/// Page handles only ever talk to this trait; the node driver is one
/// implementation, [`crate::testing::RecordingTransport`] another.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn call(&self, method: &str, params: Value) -> E2eResult<Value>;
}

/// Configuration for the node driver process
#[derive(Debug, Clone)]
pub struct DriverConfig {
    /// `node` executable
    pub node_binary: PathBuf,

    /// Directory that resolves `playwright` and `@playwright/test`
    pub node_modules: PathBuf,

    pub browser: BrowserKind,
    pub headless: bool,

    /// How long `launch` may take
    pub startup_timeout: Duration,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            node_binary: PathBuf::from("node"),
            node_modules: PathBuf::from("node_modules"),
            browser: BrowserKind::Chromium,
            headless: true,
            startup_timeout: Duration::from_secs(60),
        }
    }
}

impl DriverConfig {
    pub fn from_suite(config: &SuiteConfig) -> Self {
        Self {
            node_modules: config.node_modules.clone(),
            browser: config.browser,
            headless: config.headless,
            ..Default::default()
        }
    }
}

#[derive(Debug, Deserialize)]
struct Response {
    id: u64,
    #[serde(default)]
    result: Value,
    #[serde(default)]
    error: Option<Fault>,
}

#[derive(Debug, Deserialize)]
struct Fault {
    kind: FaultKind,
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum FaultKind {
    Assertion,
    Timeout,
    #[serde(other)]
    Driver,
}

impl From<Fault> for E2eError {
    fn from(fault: Fault) -> Self {
        match fault.kind {
            FaultKind::Assertion => E2eError::AssertionFailed(fault.message),
            FaultKind::Timeout => E2eError::Timeout(fault.message),
            FaultKind::Driver => E2eError::Driver(fault.message),
        }
    }
}

/// Serialize one request line (newline included)
pub(crate) fn encode_request(id: u64, method: &str, params: &Value) -> E2eResult<String> {
    let mut line = serde_json::to_string(&json!({
        "id": id,
        "method": method,
        "params": params,
    }))?;
    line.push('\n');
    Ok(line)
}

/// Parse one response line into its request id and outcome
pub(crate) fn decode_response(line: &str) -> E2eResult<(u64, E2eResult<Value>)> {
    let response: Response = serde_json::from_str(line)?;
    let outcome = match response.error {
        Some(fault) => Err(fault.into()),
        None => Ok(response.result),
    };
    Ok((response.id, outcome))
}

type Pending = Arc<Mutex<HashMap<u64, oneshot::Sender<E2eResult<Value>>>>>;

/// Handle to a running node driver process
pub struct PlaywrightDriver {
    child: tokio::sync::Mutex<Child>,
    stdin: tokio::sync::Mutex<ChildStdin>,
    pending: Pending,
    alive: Arc<AtomicBool>,
    next_id: AtomicU64,
    pid: Option<u32>,

    // Keeps driver.js on disk for the lifetime of the process
    _script_dir: tempfile::TempDir,
}

impl PlaywrightDriver {
    /// Spawn the driver process and start routing its responses
    pub async fn spawn(config: &DriverConfig) -> E2eResult<Self> {
        let node_path = absolute(&config.node_modules)?;
        Self::check_playwright_installed(&config.node_binary, &node_path).await?;

        let script_dir = tempfile::tempdir()?;
        let script_path = script_dir.path().join("driver.js");
        std::fs::write(&script_path, DRIVER_SCRIPT)?;

        debug!("Spawning Playwright driver: {}", script_path.display());

        let mut child = TokioCommand::new(&config.node_binary)
            .arg(&script_path)
            .env("NODE_PATH", &node_path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                E2eError::DriverStartup(format!(
                    "Failed to spawn {}: {}",
                    config.node_binary.display(),
                    e
                ))
            })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| E2eError::DriverStartup("driver stdin unavailable".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| E2eError::DriverStartup("driver stdout unavailable".to_string()))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| E2eError::DriverStartup("driver stderr unavailable".to_string()))?;

        let pending: Pending = Arc::new(Mutex::new(HashMap::new()));
        let alive = Arc::new(AtomicBool::new(true));

        {
            let pending = pending.clone();
            let alive = alive.clone();
            tokio::spawn(async move {
                let mut lines = BufReader::new(stdout).lines();
                loop {
                    match lines.next_line().await {
                        Ok(Some(line)) => route_response(&pending, &line),
                        Ok(None) => break,
                        Err(e) => {
                            warn!("Driver stdout error: {}", e);
                            break;
                        }
                    }
                }
                alive.store(false, Ordering::SeqCst);
                let waiting: Vec<_> = pending.lock().drain().collect();
                for (_, tx) in waiting {
                    let _ = tx.send(Err(E2eError::Driver("driver process exited".to_string())));
                }
                debug!("Driver stdout closed");
            });
        }

        tokio::spawn(async move {
            let mut lines = BufReader::new(stderr).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                debug!(target: "playwright", "{}", line);
            }
        });

        let pid = child.id();
        info!("Playwright driver started (pid: {:?})", pid);

        Ok(Self {
            child: tokio::sync::Mutex::new(child),
            stdin: tokio::sync::Mutex::new(stdin),
            pending,
            alive,
            next_id: AtomicU64::new(1),
            pid,
            _script_dir: script_dir,
        })
    }

    /// Check that node can resolve the Playwright package
    async fn check_playwright_installed(node: &Path, node_path: &Path) -> E2eResult<()> {
        let status = TokioCommand::new(node)
            .args(["-e", "require.resolve('playwright')"])
            .env("NODE_PATH", node_path)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await;

        match status {
            Ok(status) if status.success() => Ok(()),
            _ => Err(E2eError::PlaywrightNotFound),
        }
    }

    /// Launch the browser engine inside the driver
    pub async fn launch(&self, config: &DriverConfig) -> E2eResult<()> {
        let launched = tokio::time::timeout(
            config.startup_timeout,
            self.call(
                "launch",
                json!({ "browser": config.browser.as_str(), "headless": config.headless }),
            ),
        )
        .await
        .map_err(|_| E2eError::DriverStartup("browser launch timed out".to_string()))??;

        info!(
            "Launched {} {}",
            config.browser.as_str(),
            launched["version"].as_str().unwrap_or("(unknown version)")
        );
        Ok(())
    }

    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    /// Close the browser and stop the process
    pub async fn shutdown(&self) -> E2eResult<()> {
        if self.is_alive() {
            let closing = self.call("close", json!({}));
            if tokio::time::timeout(Duration::from_secs(5), closing).await.is_err() {
                warn!("Driver did not acknowledge close");
            }
        }

        self.terminate();

        let mut child = self.child.lock().await;
        let _ = tokio::time::timeout(Duration::from_secs(2), child.wait()).await;
        let _ = child.start_kill();
        Ok(())
    }

    /// Ask the process to exit, SIGTERM first
    fn terminate(&self) {
        #[cfg(unix)]
        if let Some(pid) = self.pid {
            use nix::sys::signal::{kill, Signal};
            use nix::unistd::Pid;

            let _ = kill(Pid::from_raw(pid as i32), Signal::SIGTERM);
        }
    }
}

fn route_response(pending: &Pending, line: &str) {
    match decode_response(line) {
        Ok((id, outcome)) => {
            let waiter = pending.lock().remove(&id);
            match waiter {
                Some(tx) => {
                    let _ = tx.send(outcome);
                }
                None => warn!("Driver response for unknown request {}", id),
            }
        }
        Err(e) => warn!("Unparseable driver output ({}): {}", e, line),
    }
}

fn absolute(path: &Path) -> E2eResult<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

#[async_trait]
impl Transport for PlaywrightDriver {
    async fn call(&self, method: &str, params: Value) -> E2eResult<Value> {
        if !self.is_alive() {
            return Err(E2eError::Driver("driver process has exited".to_string()));
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let line = encode_request(id, method, &params)?;
        let (tx, rx) = oneshot::channel();
        self.pending.lock().insert(id, tx);

        // The reader may have drained `pending` between the check and the insert
        if !self.is_alive() {
            self.pending.lock().remove(&id);
            return Err(E2eError::Driver("driver process has exited".to_string()));
        }

        debug!("-> {} #{}", method, id);
        let written = {
            let mut stdin = self.stdin.lock().await;
            match stdin.write_all(line.as_bytes()).await {
                Ok(()) => stdin.flush().await,
                Err(e) => Err(e),
            }
        };
        if let Err(e) = written {
            self.pending.lock().remove(&id);
            return Err(E2eError::Driver(format!("failed to write request: {}", e)));
        }

        rx.await
            .map_err(|_| E2eError::Driver("driver dropped the request".to_string()))?
    }
}

impl Drop for PlaywrightDriver {
    fn drop(&mut self) {
        self.terminate();
        if let Ok(mut child) = self.child.try_lock() {
            let _ = child.start_kill();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_request_is_one_line() {
        let line = encode_request(7, "goto", &json!({ "page": 1, "url": "/" })).unwrap();
        assert!(line.ends_with('\n'));
        assert_eq!(line.matches('\n').count(), 1);

        let value: Value = serde_json::from_str(line.trim_end()).unwrap();
        assert_eq!(value["id"], 7);
        assert_eq!(value["method"], "goto");
        assert_eq!(value["params"]["url"], "/");
    }

    #[test]
    fn test_decode_result() {
        let (id, outcome) = decode_response(r#"{"id":3,"result":{"page":1}}"#).unwrap();
        assert_eq!(id, 3);
        assert_eq!(outcome.unwrap()["page"], 1);
    }

    #[test]
    fn test_decode_null_result() {
        let (_, outcome) = decode_response(r#"{"id":4,"result":null}"#).unwrap();
        assert!(outcome.unwrap().is_null());
    }

    #[test]
    fn test_decode_faults() {
        let (_, outcome) =
            decode_response(r#"{"id":1,"error":{"kind":"assertion","message":"not visible"}}"#)
                .unwrap();
        assert!(matches!(outcome, Err(E2eError::AssertionFailed(m)) if m == "not visible"));

        let (_, outcome) =
            decode_response(r#"{"id":2,"error":{"kind":"timeout","message":"30000ms"}}"#).unwrap();
        assert!(matches!(outcome, Err(E2eError::Timeout(_))));

        let (_, outcome) =
            decode_response(r#"{"id":3,"error":{"kind":"weird","message":"boom"}}"#).unwrap();
        assert!(matches!(outcome, Err(E2eError::Driver(m)) if m == "boom"));
    }

    #[test]
    fn test_decode_garbage() {
        assert!(decode_response("Debugger listening on ws://").is_err());
    }

    #[test]
    fn test_route_response_delivers_to_waiter() {
        let pending: Pending = Arc::new(Mutex::new(HashMap::new()));
        let (tx, mut rx) = oneshot::channel();
        pending.lock().insert(9, tx);

        route_response(&pending, r#"{"id":9,"result":"https://www.saucedemo.com/"}"#);

        let outcome = rx.try_recv().unwrap().unwrap();
        assert_eq!(outcome, json!("https://www.saucedemo.com/"));
        assert!(pending.lock().is_empty());
    }

    #[test]
    fn test_driver_script_handles_every_method() {
        for method in [
            "launch",
            "newContext",
            "closeContext",
            "goto",
            "url",
            "waitForURL",
            "addInitScript",
            "storageState",
            "screenshot",
            "action",
            "expect",
            "expectPage",
            "close",
        ] {
            assert!(
                DRIVER_SCRIPT.contains(&format!("async {}(", method)),
                "driver.js lacks handler for {}",
                method
            );
        }
    }
}
