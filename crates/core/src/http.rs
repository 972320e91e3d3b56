//! Shared outbound HTTP plumbing.

use crate::{CoreError, CoreResult};
use std::time::Duration;

/// Builds the `reqwest` client used for every outbound call.
pub fn build_http_client(timeout: Duration) -> CoreResult<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("cdx/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| CoreError::Internal(format!("failed to build HTTP client: {e}")))
}

/// Minimal single-response HTTP servers for exercising the outbound clients.
#[cfg(test)]
pub(crate) mod test_support {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    /// What the server saw.
    #[derive(Debug)]
    pub struct CapturedRequest {
        pub head: String,
        pub body: String,
    }

    /// Serves one request with `status` and `body`, returning the base URL and a receiver
    /// for the captured request.
    pub async fn serve_once(
        status: u16,
        body: &'static str,
    ) -> (String, oneshot::Receiver<CapturedRequest>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind test listener");
        let addr = listener.local_addr().expect("local addr");
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.expect("accept");
            let mut buf = Vec::new();
            let mut chunk = [0u8; 4096];
            loop {
                let n = socket.read(&mut chunk).await.expect("read");
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
                let text = String::from_utf8_lossy(&buf);
                if let Some(split) = text.find("\r\n\r\n") {
                    let head = text[..split].to_string();
                    let length = head
                        .lines()
                        .find_map(|l| {
                            let (name, value) = l.split_once(':')?;
                            name.eq_ignore_ascii_case("content-length")
                                .then(|| value.trim().parse::<usize>().ok())
                                .flatten()
                        })
                        .unwrap_or(0);
                    if buf.len() >= split + 4 + length {
                        let body = String::from_utf8_lossy(&buf[split + 4..split + 4 + length])
                            .to_string();
                        let _ = tx.send(CapturedRequest { head, body });
                        break;
                    }
                }
            }

            let response = format!(
                "HTTP/1.1 {status} Test\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.expect("write");
            let _ = socket.shutdown().await;
        });

        (format!("http://{addr}"), rx)
    }
}
