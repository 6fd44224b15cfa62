//! Error types

use thiserror::Error;

/// Failure of a single dispatch
///
/// Every calling convention of [`crate::Client`] reports exactly these
/// kinds.
#[derive(Debug, Error)]
pub enum RequestError {
    /// Request and environment do not form a valid URL
    #[error("Unable to create valid request for resource in environment")]
    InvalidRequest,
    /// Successful status but no body bytes
    #[error("Invalid Data")]
    InvalidData,
    /// Transport response carries no HTTP status
    #[error("Invalid Response")]
    InvalidResponse,
    /// Status code outside `200..=299`
    #[error("Invalid Response StatusCode {0}")]
    UnhandledStatusCode(u16),
    /// Transport failed before producing a response
    #[error("Response Error {0}")]
    Response(#[source] TransportError),
    /// Body could not be decoded into the target type
    #[error("Decode Error {0}")]
    Decode(#[source] DecodeError),
}

/// Payload-free discriminant of [`RequestError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestErrorKind {
    /// [`RequestError::InvalidRequest`]
    InvalidRequest,
    /// [`RequestError::InvalidData`]
    InvalidData,
    /// [`RequestError::InvalidResponse`]
    InvalidResponse,
    /// [`RequestError::UnhandledStatusCode`]
    UnhandledStatusCode,
    /// [`RequestError::Response`]
    Response,
    /// [`RequestError::Decode`]
    Decode,
}

impl RequestError {
    /// Kind of failure
    pub fn kind(&self) -> RequestErrorKind {
        match self {
            RequestError::InvalidRequest => RequestErrorKind::InvalidRequest,
            RequestError::InvalidData => RequestErrorKind::InvalidData,
            RequestError::InvalidResponse => RequestErrorKind::InvalidResponse,
            RequestError::UnhandledStatusCode(_) => RequestErrorKind::UnhandledStatusCode,
            RequestError::Response(_) => RequestErrorKind::Response,
            RequestError::Decode(_) => RequestErrorKind::Decode,
        }
    }

    /// Status code of an [`RequestError::UnhandledStatusCode`]
    pub fn status_code(&self) -> Option<u16> {
        match self {
            RequestError::UnhandledStatusCode(code) => Some(*code),
            _ => None,
        }
    }
}

/// Failure reported by a [`crate::Transport`]
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection error
    #[error("Connection error: {0}")]
    Connection(String),
    /// Request timeout
    #[error("Request timeout")]
    Timeout,
    /// The backend could not build the request
    #[error("Request build error: {0}")]
    Build(String),
    /// Other error
    #[error("{0}")]
    Other(String),
}

#[cfg(feature = "reqwest")]
impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout
        } else if err.is_builder() {
            TransportError::Build(err.to_string())
        } else if err.is_connect() {
            TransportError::Connection(err.to_string())
        } else {
            TransportError::Other(err.to_string())
        }
    }
}

#[cfg(feature = "bitreq")]
impl From<bitreq::Error> for TransportError {
    fn from(err: bitreq::Error) -> Self {
        use bitreq::Error;
        use std::io;

        match err {
            Error::IoError(io_err) => {
                if io_err.kind() == io::ErrorKind::TimedOut {
                    TransportError::Timeout
                } else if io_err.kind() == io::ErrorKind::ConnectionRefused
                    || io_err.kind() == io::ErrorKind::ConnectionReset
                    || io_err.kind() == io::ErrorKind::ConnectionAborted
                    || io_err.kind() == io::ErrorKind::NotConnected
                {
                    TransportError::Connection(io_err.to_string())
                } else {
                    TransportError::Other(io_err.to_string())
                }
            }
            Error::AddressNotFound => TransportError::Connection(err.to_string()),
            _ => TransportError::Other(err.to_string()),
        }
    }
}

/// Failure turning body bytes into a typed value
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Malformed JSON or shape mismatch
    #[error("JSON decoding error: {0}")]
    Json(#[from] serde_json::Error),
    /// Error from a custom decode function
    #[error("{0}")]
    Custom(String),
}
