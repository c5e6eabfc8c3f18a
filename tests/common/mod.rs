//! Shared test utilities: a minimal HTTP stub for the order book endpoint.

#![allow(dead_code)]

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

/// Order book path served by the stub.
pub const ORDER_BOOK_PATH: &str = "/v3/order_book/";

pub const ORDER_BOOK_JSON: &str = include_str!("../fixtures/order_book.json");
pub const ORDER_BOOK_ERROR_JSON: &str = include_str!("../fixtures/order_book_error.json");

/// Handle to a running stub server.
pub struct StubServer {
    /// Endpoint URL to hand to the extractor.
    pub url: String,
    /// Request lines (`GET /path?query HTTP/1.1`) in arrival order.
    pub requests: mpsc::UnboundedReceiver<String>,
}

/// Serves `body` with `status` to every request, closing each connection.
pub async fn serve(status: u16, body: &'static str) -> StubServer {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind stub server");
    let addr = listener.local_addr().expect("stub server has no address");
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let head = read_head(&mut socket).await;
            let request_line = head.lines().next().unwrap_or_default().to_string();
            let _ = tx.send(request_line);

            let response = format!(
                "HTTP/1.1 {status} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                reason(status),
                body.len()
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });

    StubServer {
        url: format!("http://{addr}{ORDER_BOOK_PATH}"),
        requests: rx,
    }
}

/// Extractor for `url` that ignores proxy settings from the environment.
pub fn extractor(url: &str) -> spread_etl::extract::HttpExtractor {
    let client = reqwest::Client::builder()
        .no_proxy()
        .build()
        .expect("failed to build HTTP client");
    spread_etl::extract::HttpExtractor::with_client(client, url)
}

/// Returns a URL nothing is listening on.
pub async fn closed_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind");
    let addr = listener.local_addr().expect("no address");
    drop(listener);
    format!("http://{addr}{ORDER_BOOK_PATH}")
}

async fn read_head(socket: &mut tokio::net::TcpStream) -> String {
    let mut head = Vec::new();
    let mut buf = [0u8; 1024];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        match socket.read(&mut buf).await {
            Ok(0) | Err(_) => break,
            Ok(n) => head.extend_from_slice(&buf[..n]),
        }
    }
    String::from_utf8_lossy(&head).into_owned()
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}
