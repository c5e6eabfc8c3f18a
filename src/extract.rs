//! Order book extraction over the public REST endpoint.
//!
//! A snapshot is only returned when the transport succeeds, the HTTP
//! status is a success, the body parses, and the envelope's `success`
//! flag is set. Every other outcome is a connectivity error carrying the
//! URL, status, book and raw body.

use std::future::Future;

use tracing::debug;

use crate::Result;
use crate::error::EtlError;
use crate::models::{OrderBookPayload, OrderBookResponse};

/// Source of order book snapshots.
pub trait Extractor {
    /// Fetches the current snapshot for `book`.
    fn fetch(&self, book: &str) -> impl Future<Output = Result<OrderBookPayload>> + Send;
}

/// Extractor backed by an HTTP order book endpoint.
#[derive(Debug, Clone)]
pub struct HttpExtractor {
    client: reqwest::Client,
    url: String,
}

impl HttpExtractor {
    /// Creates an extractor querying `url` with a `book` parameter.
    ///
    /// # Errors
    ///
    /// Returns [`EtlError::Config`] if the HTTP client cannot be built.
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("spread-etl/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| EtlError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    /// Creates an extractor using a preconfigured client.
    pub fn with_client(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Extractor for HttpExtractor {
    async fn fetch(&self, book: &str) -> Result<OrderBookPayload> {
        let response = self
            .client
            .get(&self.url)
            .query(&[("book", book)])
            .send()
            .await
            .map_err(|e| EtlError::Connectivity {
                url: self.url.clone(),
                status: e.status().map(|s| s.as_u16()),
                book: book.to_string(),
                body: e.to_string(),
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| EtlError::Connectivity {
            url: self.url.clone(),
            status: Some(status.as_u16()),
            book: book.to_string(),
            body: e.to_string(),
        })?;
        debug!(book, status = status.as_u16(), "Received order book response");

        parse_response(&self.url, book, status, &body)
    }
}

/// Interprets a raw order book response.
///
/// # Errors
///
/// Returns [`EtlError::Connectivity`] unless `status` is a success, `body`
/// parses as an order book envelope, and the envelope reports success.
pub fn parse_response(
    url: &str,
    book: &str,
    status: reqwest::StatusCode,
    body: &str,
) -> Result<OrderBookPayload> {
    if status.is_success()
        && let Ok(envelope) = serde_json::from_str::<OrderBookResponse>(body)
        && envelope.success
        && let Some(payload) = envelope.payload
    {
        return Ok(payload);
    }

    Err(EtlError::Connectivity {
        url: url.to_string(),
        status: Some(status.as_u16()),
        book: book.to_string(),
        body: body.to_string(),
    })
}
