//! HTTP vocabulary shared by environments, requests and transports

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// URL scheme used to reach an environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scheme {
    /// `https`
    #[serde(rename = "https")]
    Secure,
    /// `http`
    #[serde(rename = "http")]
    Insecure,
}

impl Scheme {
    /// Literal wire scheme
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Secure => "https",
            Scheme::Insecure => "http",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "https" => Ok(Scheme::Secure),
            "http" => Ok(Scheme::Insecure),
            _ => Err(format!("Unknown scheme: {}", s)),
        }
    }
}

/// HTTP request method
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    /// GET
    #[default]
    Get,
    /// HEAD
    Head,
    /// POST
    Post,
    /// PUT
    Put,
    /// DELETE
    Delete,
    /// PATCH
    Patch,
}

impl Method {
    /// Method name as sent on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Head => "HEAD",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Patch => "PATCH",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "HEAD" => Ok(Method::Head),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "DELETE" => Ok(Method::Delete),
            "PATCH" => Ok(Method::Patch),
            _ => Err(format!("Unsupported method: {}", s)),
        }
    }
}

/// Name of an HTTP header
///
/// Kept distinct from [`HeaderValue`] so a key can never be passed where a
/// value is expected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HeaderKey(String);

impl HeaderKey {
    /// Create a header key
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Header name
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive comparison, as HTTP header names are compared
    pub fn matches(&self, other: &HeaderKey) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl From<&str> for HeaderKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

impl From<String> for HeaderKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl fmt::Display for HeaderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Value of an HTTP header
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HeaderValue(String);

impl HeaderValue {
    /// Create a header value
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Header value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for HeaderValue {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for HeaderValue {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for HeaderValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single `name[=value]` query component
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueryItem {
    /// Parameter name
    pub name: String,
    /// Parameter value, `None` renders the name alone
    pub value: Option<String>,
}

impl QueryItem {
    /// Query item with a value
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
        }
    }

    /// Query item without a value
    pub fn flag(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
        }
    }
}

impl<N, V> From<(N, V)> for QueryItem
where
    N: Into<String>,
    V: Into<String>,
{
    fn from((name, value): (N, V)) -> Self {
        Self::new(name, value)
    }
}

/// Ordered header list with HTTP key semantics
///
/// Keys compare case-insensitively and [`Headers::insert`] replaces an
/// existing entry in place, so the last write for a key wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(HeaderKey, HeaderValue)>,
}

impl Headers {
    /// Empty header list
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `value`, overwriting any previous value for the key
    pub fn insert(&mut self, key: impl Into<HeaderKey>, value: impl Into<HeaderValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| k.matches(&key)) {
            Some(entry) => *entry = (key, value),
            None => self.entries.push((key, value)),
        }
    }

    /// Value for `key`, looked up case-insensitively
    pub fn get(&self, key: &str) -> Option<&HeaderValue> {
        self.entries
            .iter()
            .find(|(k, _)| k.as_str().eq_ignore_ascii_case(key))
            .map(|(_, v)| v)
    }

    /// Whether a value is set for `key`
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Iterate over entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&HeaderKey, &HeaderValue)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no header is set
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Headers
where
    K: Into<HeaderKey>,
    V: Into<HeaderValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Headers::new();
        for (key, value) in iter {
            headers.insert(key, value);
        }
        headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheme_wire_strings() {
        assert_eq!(Scheme::Secure.as_str(), "https");
        assert_eq!(Scheme::Insecure.as_str(), "http");
        assert_eq!("HTTPS".parse::<Scheme>(), Ok(Scheme::Secure));
        assert!("ftp".parse::<Scheme>().is_err());
    }

    #[test]
    fn test_method_default_is_get() {
        assert_eq!(Method::default(), Method::Get);
        assert_eq!(Method::Patch.to_string(), "PATCH");
        assert_eq!("delete".parse::<Method>(), Ok(Method::Delete));
    }

    #[test]
    fn test_headers_last_write_wins_case_insensitive() {
        let mut headers = Headers::new();
        headers.insert("Content-Type", "text/plain");
        headers.insert("Accept", "*/*");
        headers.insert("content-type", "application/json");

        assert_eq!(headers.len(), 2);
        assert_eq!(
            headers.get("CONTENT-TYPE").map(HeaderValue::as_str),
            Some("application/json")
        );
        // Replaced in place
        let keys: Vec<_> = headers.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["content-type", "Accept"]);
    }

    #[test]
    fn test_query_item_from_tuple() {
        let item: QueryItem = ("name", "value").into();
        assert_eq!(item, QueryItem::new("name", "value"));
        assert_eq!(QueryItem::flag("debug").value, None);
    }
}
