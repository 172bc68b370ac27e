//! Authenticated JSON-over-HTTP transport shared by both exchange adapters

#[cfg(any(test, feature = "test-util"))]
use std::collections::HashMap;
#[cfg(any(test, feature = "test-util"))]
use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::config::ExportConfig;
use crate::domain::errors::{ConfigError, TransportError};

pub const ACCEPT_VALUE: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
pub const USER_AGENT_VALUE: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_6) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/14.0.1 Safari/605.1.15";
/// `X-MBX-APIKEY`, lowercased as header names are stored
pub const API_KEY_HEADER: &str = "x-mbx-apikey";

/// One GET, one JSON body
#[async_trait]
pub trait HttpFetch: Send + Sync {
    async fn fetch_json(&self, url: &str) -> Result<Value, TransportError>;
}

/// reqwest-backed transport sending the fixed header set on every request
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new(config: &ExportConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut api_key = HeaderValue::from_str(config.api_key.as_str())
            .map_err(|_| ConfigError::InvalidApiKey)?;
        api_key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_VALUE));
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        headers.insert(HeaderName::from_static(API_KEY_HEADER), api_key);

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl HttpFetch for HttpClient {
    async fn fetch_json(&self, url: &str) -> Result<Value, TransportError> {
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| TransportError::Request {
                url: url.to_string(),
                source,
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Status {
                url: url.to_string(),
                status,
                body,
            });
        }

        let body = response.text().await.map_err(|source| TransportError::Request {
            url: url.to_string(),
            source,
        })?;

        serde_json::from_str(&body).map_err(|e| TransportError::Decode {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }
}

#[cfg(any(test, feature = "test-util"))]
/// Canned response served by [`MockHttpFetcher`]
#[derive(Debug, Clone)]
pub enum MockResponse {
    Json(Value),
    Status(u16),
}

/// In-memory transport for exercising adapters and the pipeline offline.
///
/// Unknown URLs answer 404. Every requested URL is recorded in call order.
/// Integration tests reach it through the `test-util` feature.
#[cfg(any(test, feature = "test-util"))]
#[derive(Default)]
pub struct MockHttpFetcher {
    responses: HashMap<String, MockResponse>,
    calls: Mutex<Vec<String>>,
}

#[cfg(any(test, feature = "test-util"))]
impl MockHttpFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_json(mut self, url: impl Into<String>, body: Value) -> Self {
        self.responses.insert(url.into(), MockResponse::Json(body));
        self
    }

    pub fn with_status(mut self, url: impl Into<String>, status: u16) -> Self {
        self.responses.insert(url.into(), MockResponse::Status(status));
        self
    }

    /// URLs requested so far, oldest first
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[cfg(any(test, feature = "test-util"))]
#[async_trait]
impl HttpFetch for MockHttpFetcher {
    async fn fetch_json(&self, url: &str) -> Result<Value, TransportError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(url.to_string());
        }

        match self.responses.get(url) {
            Some(MockResponse::Json(body)) => Ok(body.clone()),
            Some(MockResponse::Status(status)) => Err(TransportError::Status {
                url: url.to_string(),
                status: *status,
                body: String::new(),
            }),
            None => Err(TransportError::Status {
                url: url.to_string(),
                status: 404,
                body: "no canned response".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_client_rejects_empty_key() {
        let config = ExportConfig::new("", "out.xlsx");
        assert!(matches!(
            HttpClient::new(&config),
            Err(ConfigError::MissingApiKey(_))
        ));
    }

    #[test]
    fn test_client_rejects_key_with_newline() {
        let config = ExportConfig::new("abc\ndef", "out.xlsx");
        assert!(matches!(
            HttpClient::new(&config),
            Err(ConfigError::InvalidApiKey)
        ));
    }

    #[test]
    fn test_client_builds_with_valid_key() {
        let config = ExportConfig::new("abcdef", "out.xlsx");
        assert!(HttpClient::new(&config).is_ok());
    }

    /// Serve one canned 500 and hand back the raw request it received
    async fn serve_one_500() -> (String, tokio::task::JoinHandle<String>) {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/api/v3/exchangeInfo", listener.local_addr().unwrap());

        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            socket
                .write_all(
                    b"HTTP/1.1 500 Internal Server Error\r\n\
                      Content-Length: 4\r\n\
                      Connection: close\r\n\r\noops",
                )
                .await
                .unwrap();
            socket.shutdown().await.ok();
            String::from_utf8_lossy(&request).to_lowercase()
        });

        (url, server)
    }

    #[tokio::test]
    async fn test_server_error_maps_to_status() {
        let (url, server) = serve_one_500().await;
        let client = HttpClient::new(&ExportConfig::new("k123", "out.xlsx")).unwrap();

        let err = client.fetch_json(&url).await.unwrap_err();

        assert_eq!(err.status(), Some(500));
        match err {
            TransportError::Status { body, .. } => assert_eq!(body, "oops"),
            other => panic!("unexpected error: {other}"),
        }
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_requests_carry_fixed_headers() {
        let (url, server) = serve_one_500().await;
        let client = HttpClient::new(&ExportConfig::new("k123", "out.xlsx")).unwrap();

        let _ = client.fetch_json(&url).await;
        let request = server.await.unwrap();

        assert!(request.contains(&format!("accept: {}", ACCEPT_VALUE.to_lowercase())));
        assert!(request.contains(&format!("user-agent: {}", USER_AGENT_VALUE.to_lowercase())));
        assert!(request.contains("x-mbx-apikey: k123"));
    }

    #[tokio::test]
    async fn test_mock_serves_json_and_records_calls() {
        let fetcher = MockHttpFetcher::new().with_json("http://a", json!({"ok": true}));

        let body = fetcher.fetch_json("http://a").await.unwrap();

        assert_eq!(body, json!({"ok": true}));
        assert_eq!(fetcher.calls(), vec!["http://a".to_string()]);
    }

    #[tokio::test]
    async fn test_mock_status_is_transport_error() {
        let fetcher = MockHttpFetcher::new().with_status("http://a", 500);

        let err = fetcher.fetch_json("http://a").await.unwrap_err();

        assert_eq!(err.status(), Some(500));
    }

    #[tokio::test]
    async fn test_mock_unknown_url_is_404() {
        let fetcher = MockHttpFetcher::new();
        let err = fetcher.fetch_json("http://missing").await.unwrap_err();
        assert_eq!(err.status(), Some(404));
    }
}
