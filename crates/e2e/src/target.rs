//! Target preflight - waiting for the storefront to answer before any browser work

use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{info, warn};

use crate::error::{E2eError, E2eResult};

const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Poll `GET url` until it returns a success status or `timeout` elapses
pub async fn wait_until_reachable(url: &str, timeout: Duration) -> E2eResult<()> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()?;

    let start = Instant::now();
    let mut attempts = 0;

    loop {
        attempts += 1;

        match client.get(url).send().await {
            Ok(resp) if resp.status().is_success() => {
                info!("Target {} reachable after {} attempt(s)", url, attempts);
                return Ok(());
            }
            Ok(resp) => {
                warn!("Preflight returned {}", resp.status());
            }
            Err(e) => {
                if attempts == 1 {
                    info!("Waiting for {} ...", url);
                }
                if !e.is_connect() {
                    warn!("Preflight error: {}", e);
                }
            }
        }

        if start.elapsed() + POLL_INTERVAL > timeout {
            break;
        }
        sleep(POLL_INTERVAL).await;
    }

    Err(E2eError::TargetUnreachable {
        url: url.to_string(),
        attempts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    async fn serve(status_line: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let mut buf = [0u8; 1024];
                let _ = socket.read(&mut buf).await;
                let response = format!(
                    "{}\r\ncontent-length: 2\r\nconnection: close\r\n\r\nok",
                    status_line
                );
                let _ = socket.write_all(response.as_bytes()).await;
            }
        });
        format!("http://{}/", addr)
    }

    #[tokio::test]
    async fn test_reachable_target() {
        let url = serve("HTTP/1.1 200 OK").await;
        wait_until_reachable(&url, Duration::from_secs(5))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_error_status_counts_attempts() {
        let url = serve("HTTP/1.1 503 Service Unavailable").await;
        let err = wait_until_reachable(&url, Duration::from_millis(600))
            .await
            .unwrap_err();
        match err {
            E2eError::TargetUnreachable { attempts, .. } => assert!(attempts >= 2),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[tokio::test]
    async fn test_closed_port() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let url = format!("http://127.0.0.1:{}/", port);
        let err = wait_until_reachable(&url, Duration::from_millis(300))
            .await
            .unwrap_err();
        assert!(matches!(err, E2eError::TargetUnreachable { .. }));
    }
}
