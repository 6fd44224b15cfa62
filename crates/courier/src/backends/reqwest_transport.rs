//! reqwest-based Transport implementation

use crate::error::TransportError;
use crate::http::{Headers, Method};
use crate::transport::{Transport, TransportResponse};
use crate::wire::WireRequest;

/// Transport sending requests with `reqwest`
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    inner: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a new transport with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transport from a configured reqwest::Client
    pub fn from_reqwest(client: reqwest::Client) -> Self {
        Self { inner: client }
    }

    fn prepare_request(&self, request: &WireRequest) -> reqwest::RequestBuilder {
        let method = match request.method() {
            Method::Get => reqwest::Method::GET,
            Method::Head => reqwest::Method::HEAD,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
            Method::Patch => reqwest::Method::PATCH,
        };

        let mut builder = self.inner.request(method, request.target().as_str());

        for (key, value) in request.headers().iter() {
            builder = builder.header(key.as_str(), value.as_str());
        }

        if let Some(body) = request.body() {
            builder = builder.body(body.to_vec());
        }

        builder
    }
}

#[async_trait::async_trait]
impl Transport for ReqwestTransport {
    async fn transmit(&self, request: WireRequest) -> Result<TransportResponse, TransportError> {
        let response = self.prepare_request(&request).send().await?;
        let status = response.status().as_u16();

        let headers: Headers = response
            .headers()
            .iter()
            .filter_map(|(key, value)| Some((key.as_str(), value.to_str().ok()?)))
            .collect();

        let body = response.bytes().await?;

        Ok(TransportResponse::http(status, headers, Some(body.to_vec())))
    }
}
