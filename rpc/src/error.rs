//! Error types for rpc dispatch.

use std::fmt;

use codec::CodecError;

/// Result type for rpc operations.
pub type RpcResult<T> = Result<T, RpcError>;

/// An opaque failure reported by a transport.
///
/// Transports own their failure taxonomy (connection loss, timeouts, remote
/// status codes); the dispatcher forwards the message unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportError {
    message: String,
}

impl TransportError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "transport error: {}", self.message)
    }
}

impl std::error::Error for TransportError {}

/// Errors that can occur while dispatching a call.
#[derive(Debug, Clone, PartialEq)]
pub enum RpcError {
    /// The registry does not declare the requested service.
    UnknownService { name: String },

    /// The service does not declare the requested method.
    UnknownMethod { service: String, name: String },

    /// The method is declared streaming; only unary dispatch is implemented.
    StreamingUnsupported { method: String },

    /// Request encoding or response decoding failed.
    Codec(CodecError),

    /// The transport reported a failure.
    Transport(TransportError),

    /// A length-prefixed response's prefix disagrees with its payload.
    ResponseFraming { declared: u64, actual: usize },
}

impl fmt::Display for RpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownService { name } => write!(f, "unknown service {name}"),
            Self::UnknownMethod { service, name } => {
                write!(f, "service {service} has no method {name}")
            }
            Self::StreamingUnsupported { method } => {
                write!(f, "method {method} is streaming; only unary calls are supported")
            }
            Self::Codec(e) => write!(f, "codec error: {e}"),
            Self::Transport(e) => e.fmt(f),
            Self::ResponseFraming { declared, actual } => {
                write!(
                    f,
                    "response length prefix declares {declared} bytes, payload has {actual}"
                )
            }
        }
    }
}

impl std::error::Error for RpcError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Codec(e) => Some(e),
            Self::Transport(e) => Some(e),
            _ => None,
        }
    }
}

impl From<CodecError> for RpcError {
    fn from(err: CodecError) -> Self {
        Self::Codec(err)
    }
}

impl From<TransportError> for RpcError {
    fn from(err: TransportError) -> Self {
        Self::Transport(err)
    }
}
