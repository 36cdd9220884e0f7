//! The transport seam.

use async_trait::async_trait;
use schema::MethodDescriptor;

use crate::error::TransportError;

/// An already-connected channel capable of one request/response exchange.
///
/// The dispatcher hands over fully-framed request bytes and expects exactly
/// one completion per call: the response bytes or a [`TransportError`].
/// Connection management, retries, and timeouts live behind this trait, not
/// in the dispatcher.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn unary(
        &self,
        method: &MethodDescriptor,
        request: Vec<u8>,
    ) -> Result<Vec<u8>, TransportError>;
}

/// How call payloads are framed on the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Framing {
    /// Raw message bytes, no prefix.
    #[default]
    Plain,
    /// Message bytes preceded by their varint-encoded length, both ways.
    LengthPrefixed,
}
