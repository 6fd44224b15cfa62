//! bitreq-based Transport implementation

use bitreq::{Client, Request, RequestExt};

use crate::error::TransportError;
use crate::http::{Headers, Method};
use crate::transport::{Transport, TransportResponse};
use crate::wire::WireRequest;

/// Transport sending requests with `bitreq`
#[derive(Clone)]
pub struct BitreqTransport {
    client: Client,
    timeout: Option<u64>,
}

impl std::fmt::Debug for BitreqTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BitreqTransport")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl Default for BitreqTransport {
    fn default() -> Self {
        if rustls::crypto::CryptoProvider::get_default().is_none() {
            let _ = rustls::crypto::ring::default_provider().install_default();
        }

        Self {
            client: Client::new(10),
            timeout: None,
        }
    }
}

impl BitreqTransport {
    /// Create a new transport
    pub fn new() -> Self {
        Self::default()
    }

    /// Abort requests taking longer than `seconds`
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = Some(seconds);
        self
    }

    fn prepare_request(&self, request: &WireRequest) -> Request {
        let url = request.target();
        let mut req = match request.method() {
            Method::Get => bitreq::get(url),
            Method::Head => bitreq::head(url),
            Method::Post => bitreq::post(url),
            Method::Put => bitreq::put(url),
            Method::Delete => bitreq::delete(url),
            Method::Patch => bitreq::patch(url),
        };

        for (key, value) in request.headers().iter() {
            req = req.with_header(key.as_str(), value.as_str());
        }

        if let Some(body) = request.body() {
            req = req.with_body(body.to_vec());
        }

        if let Some(timeout) = self.timeout {
            req = req.with_timeout(timeout);
        }

        req
    }
}

#[async_trait::async_trait]
impl Transport for BitreqTransport {
    async fn transmit(&self, request: WireRequest) -> Result<TransportResponse, TransportError> {
        let response = self
            .prepare_request(&request)
            .send_async_with_client(&self.client)
            .await
            .map_err(TransportError::from)?;

        let status = u16::try_from(response.status_code).map_err(|_| {
            TransportError::Other(format!("Invalid status code {}", response.status_code))
        })?;

        let headers: Headers = response
            .headers
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
            .collect();

        Ok(TransportResponse::http(
            status,
            headers,
            Some(response.into_bytes()),
        ))
    }
}
