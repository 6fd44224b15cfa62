//! Scripted transport shared by the integration tests

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use courier::{
    Environment, Headers, ResponseMetadata, Scheme, Secret, Transport, TransportError,
    TransportResponse, WireRequest,
};
use futures::stream::{self, BoxStream};
use futures::StreamExt;
use serde::Deserialize;

type Reply = dyn Fn() -> Result<TransportResponse, TransportError> + Send + Sync;

/// Target shape used across the pipeline tests
#[derive(Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    pub name: String,
    pub age: i32,
    pub is_done: bool,
}

pub const GORDON: &[u8] = br#"{"name":"Gordon","age":10,"isDone":true}"#;

/// Transport answering every request with the same scripted reply
#[derive(Clone)]
pub struct MockTransport {
    reply: Arc<Reply>,
    stream_items: usize,
    transmissions: Arc<AtomicUsize>,
    last_request: Arc<Mutex<Option<WireRequest>>>,
}

impl std::fmt::Debug for MockTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockTransport")
            .field("transmissions", &self.transmissions())
            .finish_non_exhaustive()
    }
}

impl MockTransport {
    fn new(reply: impl Fn() -> Result<TransportResponse, TransportError> + Send + Sync + 'static) -> Self {
        Self {
            reply: Arc::new(reply),
            stream_items: 1,
            transmissions: Arc::new(AtomicUsize::new(0)),
            last_request: Arc::new(Mutex::new(None)),
        }
    }

    /// HTTP response with `status` and `body`
    pub fn status(status: u16, body: Option<&[u8]>) -> Self {
        let body = body.map(<[u8]>::to_vec);
        Self::new(move || Ok(TransportResponse::http(status, Headers::new(), body.clone())))
    }

    /// Response without an HTTP status
    pub fn opaque() -> Self {
        Self::new(|| {
            Ok(TransportResponse {
                metadata: ResponseMetadata::opaque(),
                body: Some(GORDON.to_vec()),
            })
        })
    }

    /// Network failure before any response
    pub fn failing() -> Self {
        Self::new(|| Err(TransportError::Connection("Errored".to_string())))
    }

    /// Emit `items` responses from the stream primitive instead of one
    pub fn with_stream_items(mut self, items: usize) -> Self {
        self.stream_items = items;
        self
    }

    /// Number of requests that reached the transport
    pub fn transmissions(&self) -> usize {
        self.transmissions.load(Ordering::SeqCst)
    }

    /// Last request that reached the transport
    pub fn last_request(&self) -> Option<WireRequest> {
        self.last_request.lock().expect("Lock").clone()
    }

    fn record(&self, request: WireRequest) {
        self.transmissions.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().expect("Lock") = Some(request);
    }
}

#[async_trait::async_trait]
impl Transport for MockTransport {
    async fn transmit(&self, request: WireRequest) -> Result<TransportResponse, TransportError> {
        self.record(request);
        tokio::task::yield_now().await;
        (self.reply)()
    }

    fn transmit_stream(
        &self,
        request: WireRequest,
    ) -> BoxStream<'_, Result<TransportResponse, TransportError>> {
        self.record(request);
        let items: Vec<_> = (0..self.stream_items).map(|_| (self.reply)()).collect();
        stream::iter(items).boxed()
    }
}

/// Environment of the shared scenarios
pub fn mock_environment() -> Environment {
    Environment::builder(Scheme::Secure, "api.mock.org")
        .port(443)
        .header("Connection", "Close")
        .secret(Secret::header("X-API-KEY", "c6fb701caa6b1fbe4290a16e77b564b8"))
        .build()
}
