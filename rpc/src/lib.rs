//! Unary RPC dispatch for the pbrun runtime.
//!
//! A [`ServiceClient`] binds a schema-declared service to a [`Transport`]
//! and turns typed request instances into wire bytes and back, one call at a
//! time. The dispatcher is deliberately thin: framing beyond an optional
//! varint length prefix, retries, timeouts, and connection management are the
//! transport's concern.
//!
//! Streaming methods may be declared in the schema but cannot be called;
//! dispatch rejects them with [`RpcError::StreamingUnsupported`].

pub mod dispatch;
pub mod error;
pub mod transport;

pub use dispatch::ServiceClient;
pub use error::{RpcError, RpcResult, TransportError};
pub use transport::{Framing, Transport};
