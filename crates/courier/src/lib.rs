//! Environment-aware HTTP request execution
//!
//! A [`Requestable`] describes one logical request. An [`Environment`]
//! describes where it goes: scheme, host, port, default headers and an
//! optional secret. A [`Client`] resolves the two into a [`WireRequest`],
//! sends it over a pluggable [`Transport`], classifies the status code and
//! decodes the body through the [`Resource`]'s decode function.
//!
//! The same pipeline is exposed as an awaitable ([`Client::fetch`]), a
//! callback ([`Client::submit`]) and a stream ([`Client::stream`]), all
//! reporting the same [`RequestError`] kinds.
//!
//! # Example
//!
//! ```no_run
//! use courier::backends::BitreqTransport;
//! use courier::{Client, Environment, RequestError, Requestable, Resource, Scheme, Secret};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Status {
//!     message: String,
//! }
//!
//! async fn example() -> Result<Status, RequestError> {
//!     let environment = Environment::builder(Scheme::Secure, "api.example.com")
//!         .header("Accept", "application/json")
//!         .secret(Secret::header("X-API-KEY", "key"))
//!         .build();
//!     let client = Client::new(environment, BitreqTransport::new());
//!
//!     client.fetch(&Resource::json(Requestable::new("/status"))).await
//! }
//! ```

pub mod backends;
mod client;
mod config;
pub mod decoder;
mod environment;
mod error;
mod http;
mod requestable;
mod resource;
mod task;
mod transport;
mod wire;

pub use client::{Client, DispatchTask, HttpResponse};
pub use self::config::{EnvironmentConfig, SecretConfig, ENV_PREFIX};
pub use decoder::{DateDecoding, Decoder, JsonDecoder};
pub use environment::{Environment, EnvironmentBuilder, Secret};
pub use error::{DecodeError, RequestError, RequestErrorKind, TransportError};
pub use http::{HeaderKey, HeaderValue, Headers, Method, QueryItem, Scheme};
pub use requestable::Requestable;
pub use resource::Resource;
pub use transport::{ResponseMetadata, TransmitCallback, Transport, TransportResponse};
pub use wire::WireRequest;
