//! Declarative description of one logical request

use std::fmt;

use crate::http::{HeaderKey, HeaderValue, Headers, Method, QueryItem};

/// One logical HTTP request, independent of where it is sent
///
/// Omitted fields take their defaults: `GET`, no query parameters, no
/// headers and no body.
#[derive(Clone, PartialEq, Eq)]
pub struct Requestable {
    method: Method,
    path: String,
    parameters: Vec<QueryItem>,
    headers: Headers,
    body: Option<Vec<u8>>,
}

impl Requestable {
    /// `GET` request for `path` with every other field defaulted
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            method: Method::default(),
            path: path.into(),
            parameters: Vec::new(),
            headers: Headers::new(),
            body: None,
        }
    }

    /// Set the method
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Append a query parameter, order is preserved
    pub fn with_parameter(mut self, item: impl Into<QueryItem>) -> Self {
        self.parameters.push(item.into());
        self
    }

    /// Append several query parameters
    pub fn with_parameters<I>(mut self, items: impl IntoIterator<Item = I>) -> Self
    where
        I: Into<QueryItem>,
    {
        self.parameters.extend(items.into_iter().map(Into::into));
        self
    }

    /// Set a header
    ///
    /// Keys compare case-insensitively, so `accept` replaces an earlier
    /// `Accept`.
    pub fn with_header(mut self, key: impl Into<HeaderKey>, value: impl Into<HeaderValue>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Set the body
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Method
    pub fn method(&self) -> Method {
        self.method
    }

    /// Path, used verbatim
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Query parameters in order
    pub fn parameters(&self) -> &[QueryItem] {
        &self.parameters
    }

    /// Request specific headers
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Body bytes
    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }
}

impl fmt::Debug for Requestable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut headers: Vec<_> = self.headers.iter().collect();
        headers.sort();

        writeln!(f, "Request: {} - {}", self.method, self.path)?;
        write!(f, "Headers: ")?;
        for (key, value) in headers {
            write!(f, "{}: {},", key, value)?;
        }
        writeln!(f)?;
        write!(f, "Parameters: [")?;
        for (i, item) in self.parameters.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            match &item.value {
                Some(value) => write!(f, "{}={}", item.name, value)?,
                None => write!(f, "{}", item.name)?,
            }
        }
        write!(f, "]")
    }
}
