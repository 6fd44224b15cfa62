//! Dispatch pipeline
//!
//! Every call runs Build, Transmit, Classify and Decode in that order. The
//! calling conventions only differ in how the transport is driven and how
//! the outcome reaches the caller.

use std::fmt;
use std::sync::Arc;

use futures::future;
use futures::stream::{self, BoxStream};
use futures::StreamExt;
use tracing::instrument;

use crate::environment::Environment;
use crate::error::{RequestError, TransportError};
use crate::http::Headers;
use crate::requestable::Requestable;
use crate::resource::Resource;
use crate::transport::{Transport, TransportResponse};
use crate::wire::WireRequest;

/// HTTP-shaped response, before any status branching
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// Status code
    pub status: u16,
    /// Response headers
    pub headers: Headers,
    /// Body bytes, if any were received
    pub body: Option<Vec<u8>>,
}

impl HttpResponse {
    /// Check if the response status is a success (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Executes resources against one environment over one transport
///
/// Cloning is cheap; clones share the environment and the transport.
#[derive(Debug)]
pub struct Client<T: Transport> {
    environment: Arc<Environment>,
    transport: Arc<T>,
}

impl<T: Transport> Clone for Client<T> {
    fn clone(&self) -> Self {
        Self {
            environment: Arc::clone(&self.environment),
            transport: Arc::clone(&self.transport),
        }
    }
}

impl<T: Transport> Client<T> {
    /// Create a new client
    pub fn new(environment: Environment, transport: T) -> Self {
        Self::from_shared(Arc::new(environment), Arc::new(transport))
    }

    /// Create a client from an already shared environment and transport
    pub fn from_shared(environment: Arc<Environment>, transport: Arc<T>) -> Self {
        Self {
            environment,
            transport,
        }
    }

    /// Environment requests are resolved against
    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// Underlying transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn build(&self, request: &Requestable) -> Result<WireRequest, RequestError> {
        let wire = WireRequest::build(request, &self.environment)?;
        tracing::debug!("Transmitting {:?}", wire);
        Ok(wire)
    }

    /// Dispatch `resource` and wait for the decoded value
    #[instrument(skip_all, fields(method = %resource.request().method(), path = %resource.request().path()))]
    pub async fn fetch<R>(&self, resource: &Resource<R>) -> Result<R, RequestError> {
        let wire = self.build(resource.request())?;
        let result = self.transport.transmit(wire).await;
        complete(resource, result)
    }

    /// Same as [`Client::fetch`] with the failure raised as an
    /// [`anyhow::Error`]
    ///
    /// The carried error is always a [`RequestError`].
    pub async fn try_fetch<R>(&self, resource: &Resource<R>) -> anyhow::Result<R> {
        Ok(self.fetch(resource).await?)
    }

    /// Dispatch `resource` and deliver the outcome to `callback`
    ///
    /// The request is built immediately. If that fails `callback` receives
    /// [`RequestError::InvalidRequest`] right away and `None` is returned.
    /// Otherwise nothing is sent until [`DispatchTask::resume`] is called.
    #[instrument(skip_all, fields(method = %resource.request().method(), path = %resource.request().path()))]
    pub fn submit<R, F>(&self, resource: &Resource<R>, callback: F) -> Option<DispatchTask>
    where
        T: 'static,
        R: 'static,
        F: FnOnce(Result<R, RequestError>) + Send + 'static,
    {
        let wire = match self.build(resource.request()) {
            Ok(wire) => wire,
            Err(err) => {
                callback(Err(err));
                return None;
            }
        };

        let transport = Arc::clone(&self.transport);
        let resource = resource.clone();

        Some(DispatchTask::new(move || {
            transport.transmit_with(
                wire,
                Box::new(move |result| callback(complete(&resource, result))),
            );
        }))
    }

    /// Dispatch `resource` when the returned stream is polled
    ///
    /// The stream yields exactly one item, then ends.
    pub fn stream<'a, R>(&'a self, resource: &'a Resource<R>) -> BoxStream<'a, Result<R, RequestError>>
    where
        R: Send + 'a,
    {
        let wire = match self.build(resource.request()) {
            Ok(wire) => wire,
            Err(err) => return stream::once(future::ready(Err(err))).boxed(),
        };

        let transport = &self.transport;

        stream::once(async move {
            let (first, _) = transport.transmit_stream(wire).into_future().await;
            let result = first.unwrap_or_else(|| {
                Err(TransportError::Other(
                    "Transport stream ended without a response".to_string(),
                ))
            });
            complete(resource, result)
        })
        .boxed()
    }

    /// Send `request` and return the HTTP response without status branching
    /// or decoding
    #[instrument(skip_all, fields(method = %request.method(), path = %request.path()))]
    pub async fn fetch_raw(&self, request: &Requestable) -> Result<HttpResponse, RequestError> {
        let wire = self.build(request)?;
        classify(self.transport.transmit(wire).await)
    }
}

/// Handle of a dispatch created by [`Client::submit`]
///
/// Nothing is sent before [`DispatchTask::resume`]. Dropping the task
/// un-resumed is the same as [`DispatchTask::cancel`].
#[must_use = "nothing is sent until the task is resumed"]
pub struct DispatchTask {
    start: Box<dyn FnOnce() + Send>,
}

impl DispatchTask {
    fn new(start: impl FnOnce() + Send + 'static) -> Self {
        Self {
            start: Box::new(start),
        }
    }

    /// Start transmission
    ///
    /// Outside a Tokio runtime nothing is sent and the callback receives
    /// [`RequestError::Response`] instead.
    pub fn resume(self) {
        (self.start)()
    }

    /// Discard the task; no request is sent and the callback never fires
    pub fn cancel(self) {
        tracing::debug!("Dispatch cancelled before resume");
    }
}

impl fmt::Debug for DispatchTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchTask").finish_non_exhaustive()
    }
}

/// Steps 3 to 5, shared by every calling convention
fn complete<R>(
    resource: &Resource<R>,
    result: Result<TransportResponse, TransportError>,
) -> Result<R, RequestError> {
    let response = classify(result)?;
    decode_body(resource, response)
}

fn classify(
    result: Result<TransportResponse, TransportError>,
) -> Result<HttpResponse, RequestError> {
    let TransportResponse { metadata, body } = result.map_err(|err| {
        tracing::debug!("Transport error: {}", err);
        RequestError::Response(err)
    })?;

    let status = metadata.status().ok_or_else(|| {
        tracing::debug!("Response carries no HTTP status");
        RequestError::InvalidResponse
    })?;

    tracing::debug!("Response status {}", status);

    Ok(HttpResponse {
        status,
        headers: metadata.headers().clone(),
        body,
    })
}

fn decode_body<R>(resource: &Resource<R>, response: HttpResponse) -> Result<R, RequestError> {
    if !response.is_success() {
        return Err(RequestError::UnhandledStatusCode(response.status));
    }

    let body = match response.body {
        Some(body) if !body.is_empty() => body,
        _ => return Err(RequestError::InvalidData),
    };

    resource.decode(&body).map_err(|err| {
        tracing::warn!("Http Response error: {}", err);
        RequestError::Decode(err)
    })
}
