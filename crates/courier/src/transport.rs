//! Transport trait, the boundary towards the network

use std::fmt::Debug;
use std::sync::Arc;

use futures::stream::{self, BoxStream};
use futures::StreamExt;

use crate::error::TransportError;
use crate::http::Headers;
use crate::task;
use crate::wire::WireRequest;

/// Callback receiving the outcome of [`Transport::transmit_with`]
pub type TransmitCallback =
    Box<dyn FnOnce(Result<TransportResponse, TransportError>) + Send + 'static>;

/// Metadata a transport attaches to every response
///
/// HTTP transports always fill in a status code. A transport that reaches
/// something other than an HTTP server reports [`ResponseMetadata::opaque`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseMetadata {
    status: Option<u16>,
    headers: Headers,
}

impl ResponseMetadata {
    /// Metadata of an HTTP response
    pub fn http(status: u16, headers: Headers) -> Self {
        Self {
            status: Some(status),
            headers,
        }
    }

    /// Metadata of a response with no HTTP status
    pub fn opaque() -> Self {
        Self::default()
    }

    /// HTTP status code
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    /// Response headers
    pub fn headers(&self) -> &Headers {
        &self.headers
    }
}

/// Raw outcome of one exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// Status and headers
    pub metadata: ResponseMetadata,
    /// Body bytes, if any were received
    pub body: Option<Vec<u8>>,
}

impl TransportResponse {
    /// Response with an HTTP status
    pub fn http(status: u16, headers: Headers, body: Option<Vec<u8>>) -> Self {
        Self {
            metadata: ResponseMetadata::http(status, headers),
            body,
        }
    }
}

/// Performs a single HTTP exchange
///
/// Implementations must tolerate concurrent calls. Only [`Transport::transmit`]
/// is required, the callback and stream primitives default to driving it.
#[async_trait::async_trait]
pub trait Transport: Send + Sync + Debug {
    /// Send `request` and wait for the response
    async fn transmit(&self, request: WireRequest) -> Result<TransportResponse, TransportError>;

    /// Send `request` and hand the outcome to `callback`
    ///
    /// The exchange runs on the caller's Tokio runtime. Without one,
    /// `callback` receives [`TransportError::Other`] right away.
    fn transmit_with(self: Arc<Self>, request: WireRequest, callback: TransmitCallback)
    where
        Self: 'static,
    {
        let runtime = match task::current() {
            Ok(runtime) => runtime,
            Err(err) => {
                tracing::warn!("Cannot transmit outside a Tokio runtime: {}", err);
                callback(Err(TransportError::Other(format!(
                    "No Tokio runtime to transmit on: {}",
                    err
                ))));
                return;
            }
        };

        task::spawn_on(&runtime, async move {
            let result = self.transmit(request).await;
            callback(result);
        });
    }

    /// Send `request` and expose the outcome as a stream
    fn transmit_stream(
        &self,
        request: WireRequest,
    ) -> BoxStream<'_, Result<TransportResponse, TransportError>> {
        stream::once(self.transmit(request)).boxed()
    }
}
