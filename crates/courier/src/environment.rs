//! Deployment targets requests are resolved against

use std::fmt;

use crate::http::{HeaderKey, HeaderValue, Headers, QueryItem, Scheme};

/// Credential injected into every request built for an [`Environment`]
#[derive(Clone, PartialEq, Eq)]
pub enum Secret {
    /// Appended as the last query item of the URL
    QueryItem(QueryItem),
    /// Set as a header, overriding request and environment headers
    Header(HeaderKey, HeaderValue),
}

impl Secret {
    /// Secret sent as a `name=value` query item
    pub fn query_item(name: impl Into<String>, value: impl Into<String>) -> Self {
        Secret::QueryItem(QueryItem::new(name, value))
    }

    /// Secret sent as a header
    pub fn header(key: impl Into<HeaderKey>, value: impl Into<HeaderValue>) -> Self {
        Secret::Header(key.into(), value.into())
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Secret::QueryItem(item) => f
                .debug_tuple("QueryItem")
                .field(&item.name)
                .field(&"<redacted>")
                .finish(),
            Secret::Header(key, _) => f
                .debug_tuple("Header")
                .field(&key.as_str())
                .field(&"<redacted>")
                .finish(),
        }
    }
}

/// Static description of a deployment target
///
/// Immutable once built and safe to share between any number of concurrent
/// requests.
#[derive(Clone, PartialEq, Eq)]
pub struct Environment {
    scheme: Scheme,
    endpoint: String,
    additional_headers: Headers,
    port: Option<u16>,
    base_path: Option<String>,
    secret: Option<Secret>,
}

impl Environment {
    /// Start building an environment for `endpoint`
    pub fn builder(scheme: Scheme, endpoint: impl Into<String>) -> EnvironmentBuilder {
        EnvironmentBuilder {
            scheme,
            endpoint: endpoint.into(),
            additional_headers: Headers::new(),
            port: None,
            base_path: None,
            secret: None,
        }
    }

    /// Environment with no headers, port, base path or secret
    pub fn new(scheme: Scheme, endpoint: impl Into<String>) -> Self {
        Self::builder(scheme, endpoint).build()
    }

    /// Scheme
    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    /// Host name
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Headers sent with every request
    pub fn additional_headers(&self) -> &Headers {
        &self.additional_headers
    }

    /// Explicit port
    pub fn port(&self) -> Option<u16> {
        self.port
    }

    /// Path prefix for every request
    pub fn base_path(&self) -> Option<&str> {
        self.base_path.as_deref()
    }

    /// Secret, if any
    pub fn secret(&self) -> Option<&Secret> {
        self.secret.as_ref()
    }
}

// Never prints headers or the secret.
impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.scheme, self.endpoint)?;
        if let Some(port) = self.port {
            write!(f, ":{}", port)?;
        }
        if let Some(base_path) = &self.base_path {
            write!(f, "/{}", base_path.trim_matches('/'))?;
        }
        Ok(())
    }
}

/// Builder for [`Environment`]
#[derive(Debug)]
pub struct EnvironmentBuilder {
    scheme: Scheme,
    endpoint: String,
    additional_headers: Headers,
    port: Option<u16>,
    base_path: Option<String>,
    secret: Option<Secret>,
}

impl EnvironmentBuilder {
    /// Add a default header, replacing any case variant of `key`
    pub fn header(mut self, key: impl Into<HeaderKey>, value: impl Into<HeaderValue>) -> Self {
        self.additional_headers.insert(key.into(), value.into());
        self
    }

    /// Replace all default headers
    pub fn headers<K, V>(mut self, headers: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<HeaderKey>,
        V: Into<HeaderValue>,
    {
        self.additional_headers = headers.into_iter().collect();
        self
    }

    /// Set an explicit port
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Set a path prefix
    pub fn base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = Some(base_path.into());
        self
    }

    /// Set the secret, replacing any previous one
    pub fn secret(mut self, secret: Secret) -> Self {
        self.secret = Some(secret);
        self
    }

    /// Build the environment
    pub fn build(self) -> Environment {
        Environment {
            scheme: self.scheme,
            endpoint: self.endpoint,
            additional_headers: self.additional_headers,
            port: self.port,
            base_path: self.base_path,
            secret: self.secret,
        }
    }
}
