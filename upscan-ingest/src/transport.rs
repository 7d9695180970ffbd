//! HTTP seam. The engine only ever issues GETs through [`Transport`], so tests
//! can script responses without a network.

use std::fmt;
use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use upscan_core::RetrievalError;

/// Opaque API secret. `Debug` never prints it.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(***)")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub token: BearerToken,
    /// Empty for continuation requests; the next link carries its own state
    pub query: Vec<(String, String)>,
}

impl HttpRequest {
    pub fn headers(&self) -> Vec<(&'static str, String)> {
        vec![
            (AUTHORIZATION.as_str(), format!("Bearer {}", self.token.expose())),
            (CONTENT_TYPE.as_str(), "application/json".to_string()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Synchronous GET. Exactly one attempt per call.
pub trait Transport {
    fn get(&self, request: &HttpRequest) -> Result<HttpResponse, RetrievalError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn get(&self, request: &HttpRequest) -> Result<HttpResponse, RetrievalError> {
        (**self).get(request)
    }
}

/// Blocking reqwest client
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self, RetrievalError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RetrievalError::Connection(e.to_string()))?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn get(&self, request: &HttpRequest) -> Result<HttpResponse, RetrievalError> {
        let mut builder = self.client.get(&request.url);
        for (name, value) in request.headers() {
            builder = builder.header(name, value);
        }
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }

        let resp = builder
            .send()
            .map_err(|e| RetrievalError::Connection(e.without_url().to_string()))?;
        let status = resp.status().as_u16();
        let body = resp
            .text()
            .map_err(|e| RetrievalError::Connection(e.without_url().to_string()))?;

        Ok(HttpResponse { status, body })
    }
}
