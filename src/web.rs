//! Minimal HTTP status endpoint.
//!
//! Answers every request on the configured port with a small JSON payload:
//! operational status, bot identity, and the server time in RFC 3339 UTC.
//! Intended for platform health checks, so there is no routing and no
//! request parsing beyond draining the request head; every connection gets
//! the same `200`.

use anyhow::{Context, Result};
use chrono::Utc;
use log::{debug, info};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Bind the status endpoint. Kept separate from [`serve`] so startup can
/// fail fast on a taken port and tests can bind port 0.
pub async fn bind(port: u16) -> Result<TcpListener> {
    let listener = TcpListener::bind(("0.0.0.0", port))
        .await
        .with_context(|| format!("failed to bind status endpoint on port {port}"))?;
    info!(
        "🌐 status endpoint listening on port {}",
        listener.local_addr().map(|a| a.port()).unwrap_or(port)
    );
    Ok(listener)
}

/// Serve status responses until the task is aborted.
pub async fn serve(listener: TcpListener, bot_name: String) -> Result<()> {
    loop {
        let (mut socket, peer) = listener.accept().await?;
        debug!("status request from {peer}");
        let body = serde_json::json!({
            "status": "ok",
            "bot": bot_name,
            "time": Utc::now().to_rfc3339(),
        })
        .to_string();
        let response = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            body.len(),
            body
        );
        // Drain whatever request head arrived, then answer and close.
        let mut buf = [0u8; 1024];
        let _ = socket.read(&mut buf).await;
        if let Err(e) = socket.write_all(response.as_bytes()).await {
            debug!("status reply failed: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    #[tokio::test]
    async fn responds_with_json_status() {
        let listener = bind(0).await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(serve(listener, "forgebot".to_string()));

        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream.write_all(b"GET / HTTP/1.1\r\n\r\n").await.unwrap();
        stream.shutdown().await.unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();

        assert!(response.starts_with("HTTP/1.1 200 OK"));
        let body = response.split("\r\n\r\n").nth(1).unwrap();
        let payload: serde_json::Value = serde_json::from_str(body).unwrap();
        assert_eq!(payload["status"], "ok");
        assert_eq!(payload["bot"], "forgebot");
        assert!(payload["time"].is_string());

        server.abort();
    }
}
