//! A request paired with the decoding of its response

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::decoder::{Decoder, JsonDecoder};
use crate::error::DecodeError;
use crate::requestable::Requestable;

type DecodeFn<T> = dyn Fn(&[u8]) -> Result<T, DecodeError> + Send + Sync;

/// Typed endpoint: what to send and how to read the answer
///
/// The decode function is pure. Resources are cheap to clone and can be
/// dispatched any number of times.
pub struct Resource<T> {
    request: Requestable,
    decode: Arc<DecodeFn<T>>,
}

impl<T> Resource<T> {
    /// Resource decoding bodies with `decode`
    pub fn new<F>(request: Requestable, decode: F) -> Self
    where
        F: Fn(&[u8]) -> Result<T, DecodeError> + Send + Sync + 'static,
    {
        Self {
            request,
            decode: Arc::new(decode),
        }
    }

    /// Request description
    pub fn request(&self) -> &Requestable {
        &self.request
    }

    /// Run the decode function on `bytes`
    pub fn decode(&self, bytes: &[u8]) -> Result<T, DecodeError> {
        (self.decode)(bytes)
    }
}

impl<T: DeserializeOwned + 'static> Resource<T> {
    /// Resource decoding JSON bodies with the default [`JsonDecoder`]
    pub fn json(request: Requestable) -> Self {
        Self::with_decoder(request, JsonDecoder::default())
    }

    /// Resource decoding bodies with `decoder`
    pub fn with_decoder<D>(request: Requestable, decoder: D) -> Self
    where
        D: Decoder + 'static,
    {
        Self::new(request, move |bytes| decoder.parse(bytes))
    }
}

impl<T> Clone for Resource<T> {
    fn clone(&self) -> Self {
        Self {
            request: self.request.clone(),
            decode: Arc::clone(&self.decode),
        }
    }
}

impl<T> fmt::Debug for Resource<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resource")
            .field("request", &self.request)
            .field("target", &std::any::type_name::<T>())
            .finish_non_exhaustive()
    }
}
