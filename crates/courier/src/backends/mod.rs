//! Network transports

#[cfg(feature = "bitreq")]
pub mod bitreq_transport;
#[cfg(feature = "reqwest")]
pub mod reqwest_transport;

#[cfg(feature = "bitreq")]
pub use bitreq_transport::BitreqTransport;
#[cfg(feature = "reqwest")]
pub use reqwest_transport::ReqwestTransport;
