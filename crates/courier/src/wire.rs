//! Resolution of a [`Requestable`] against an [`Environment`]

use std::fmt;

use url::{Host, Position, Url};

use crate::environment::{Environment, Secret};
use crate::error::RequestError;
use crate::http::{Headers, Method, QueryItem};
use crate::requestable::Requestable;

/// Fully resolved, transport-ready request
///
/// Only obtainable through [`WireRequest::build`] and never modified
/// afterwards.
#[derive(Clone, PartialEq, Eq)]
pub struct WireRequest {
    method: Method,
    url: Url,
    port: Option<u16>,
    headers: Headers,
    body: Option<Vec<u8>>,
}

impl WireRequest {
    /// Combine `request` and `environment` into a wire request
    ///
    /// Query parameters keep their order and a query secret is always
    /// appended last. Headers are written request first, then environment
    /// defaults, then a header secret, so the secret wins on key collision.
    pub fn build(request: &Requestable, environment: &Environment) -> Result<Self, RequestError> {
        let url = resolve_url(request, environment)?;
        let headers = merge_headers(request, environment);

        Ok(Self {
            method: request.method(),
            url,
            port: environment.port(),
            headers,
            body: request.body().map(<[u8]>::to_vec),
        })
    }

    /// Method
    pub fn method(&self) -> Method {
        self.method
    }

    /// Resolved URL
    ///
    /// [`Url`] normalises a port equal to the scheme default away, use
    /// [`WireRequest::target`] for the form sent over the network.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Port taken from the environment, if one was set
    pub fn port(&self) -> Option<u16> {
        self.port
    }

    /// URL as sent by transports, keeping an explicit port even when it is
    /// the scheme default
    pub fn target(&self) -> String {
        match self.port {
            Some(port) => format!(
                "{}:{}{}",
                &self.url[..Position::AfterHost],
                port,
                &self.url[Position::AfterPort..]
            ),
            None => self.url.to_string(),
        }
    }

    /// Merged headers
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Body bytes, copied verbatim from the request
    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }
}

// Query values and header values may carry the secret.
impl fmt::Debug for WireRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let query: Vec<_> = self.url.query_pairs().map(|(name, _)| name).collect();
        let headers: Vec<_> = self.headers.iter().map(|(key, _)| key.as_str()).collect();

        f.debug_struct("WireRequest")
            .field("method", &self.method)
            .field("scheme", &self.url.scheme())
            .field("host", &self.url.host_str())
            .field("port", &self.port)
            .field("path", &self.url.path())
            .field("query", &query)
            .field("headers", &headers)
            .field("body_len", &self.body.as_ref().map(Vec::len))
            .finish()
    }
}

fn resolve_url(request: &Requestable, environment: &Environment) -> Result<Url, RequestError> {
    let path = request.path();
    if !path.is_empty() && !path.starts_with('/') {
        tracing::debug!("Path {} is not absolute", path);
        return Err(RequestError::InvalidRequest);
    }

    let host = Host::parse(environment.endpoint()).map_err(|err| {
        tracing::debug!("Invalid host for {:?}: {}", environment, err);
        RequestError::InvalidRequest
    })?;

    let mut url = Url::parse(&format!("{}://{}", environment.scheme(), host)).map_err(|err| {
        tracing::debug!("Could not form URL for {:?}: {}", environment, err);
        RequestError::InvalidRequest
    })?;

    url.set_port(environment.port())
        .map_err(|_| RequestError::InvalidRequest)?;

    match environment.base_path() {
        Some(base_path) => {
            let base_path = base_path.trim_matches('/');
            url.set_path(&format!("/{}{}", base_path, path));
        }
        None => url.set_path(path),
    }

    let secret = match environment.secret() {
        Some(Secret::QueryItem(item)) => Some(item),
        Some(Secret::Header(..)) | None => None,
    };

    let mut items = request.parameters().iter().chain(secret).peekable();
    if items.peek().is_some() {
        let mut pairs = url.query_pairs_mut();
        for QueryItem { name, value } in items {
            match value {
                Some(value) => pairs.append_pair(name, value),
                None => pairs.append_key_only(name),
            };
        }
    }

    Ok(url)
}

fn merge_headers(request: &Requestable, environment: &Environment) -> Headers {
    let mut headers = Headers::new();

    for (key, value) in request.headers().iter() {
        headers.insert(key.clone(), value.clone());
    }

    for (key, value) in environment.additional_headers().iter() {
        headers.insert(key.clone(), value.clone());
    }

    match environment.secret() {
        Some(Secret::Header(key, value)) => headers.insert(key.clone(), value.clone()),
        Some(Secret::QueryItem(_)) | None => {}
    }

    headers
}
