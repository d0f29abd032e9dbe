//! Shared test utilities for integration tests.
//!
//! A loopback HTTP server that answers each incoming connection with the
//! next canned response and records the raw requests it received.

#![allow(dead_code)]

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use url::Url;

use recipe_calculator::ApiClient;

/// Build an HTTP/1.1 response that closes the connection after the body
pub fn response(status: &str, body: &str) -> String {
    format!(
        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    )
}

pub fn ok_json(body: &str) -> String {
    response("200 OK", body)
}

/// Serve `responses` in order, one per connection
///
/// Returns the base URL and a handle yielding the raw requests once every
/// response has been sent.
pub async fn serve(responses: Vec<String>) -> (Url, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let mut requests = Vec::new();
        for response in responses {
            let (mut stream, _) = listener.accept().await.unwrap();
            requests.push(read_request(&mut stream).await);
            stream.write_all(response.as_bytes()).await.unwrap();
            let _ = stream.shutdown().await;
        }
        requests
    });

    let base = Url::parse(&format!("http://{}", addr)).unwrap();
    (base, handle)
}

pub async fn client_for(responses: Vec<String>) -> (ApiClient, JoinHandle<Vec<String>>) {
    let (base, handle) = serve(responses).await;
    (ApiClient::new(base, None).unwrap(), handle)
}

/// First line of a raw request, e.g. `GET /items?type=base HTTP/1.1`
pub fn request_line(request: &str) -> &str {
    request.lines().next().unwrap_or_default()
}

pub fn request_body(request: &str) -> &str {
    request.split_once("\r\n\r\n").map(|(_, body)| body).unwrap_or_default()
}

async fn read_request(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];

    loop {
        let n = stream.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&buf[..end]).to_ascii_lowercase();
            let content_length = head
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|value| value.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= end + 4 + content_length {
                break;
            }
        }
    }

    String::from_utf8_lossy(&buf).into_owned()
}
