//! Unary call dispatch over a schema-declared service.

use std::sync::Arc;

use codec::{decode_from_slice, encode_to_vec, MessageValue};
use schema::{MethodDescriptor, Registry};
use wire::{decode_varint, encode_varint};

use crate::error::{RpcError, RpcResult};
use crate::transport::{Framing, Transport};

/// A client bound to one service declaration.
///
/// Construction verifies the service exists; every call re-resolves its
/// method so the client itself stays stateless across calls.
pub struct ServiceClient {
    registry: Arc<Registry>,
    service: String,
    transport: Arc<dyn Transport>,
    framing: Framing,
}

impl std::fmt::Debug for ServiceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceClient")
            .field("service", &self.service)
            .field("framing", &self.framing)
            .finish_non_exhaustive()
    }
}

impl ServiceClient {
    /// Binds a client to a declared service.
    ///
    /// # Errors
    ///
    /// `UnknownService` when the registry does not declare `service`.
    pub fn new(
        registry: Arc<Registry>,
        service: impl Into<String>,
        transport: Arc<dyn Transport>,
        framing: Framing,
    ) -> RpcResult<Self> {
        let service = service.into();
        if registry.service(&service).is_none() {
            return Err(RpcError::UnknownService { name: service });
        }
        Ok(Self {
            registry,
            service,
            transport,
            framing,
        })
    }

    /// Dispatches a unary call and resolves with the decoded response.
    ///
    /// # Errors
    ///
    /// `UnknownMethod` or `StreamingUnsupported` on method lookup, `Codec`
    /// when request encoding or response decoding fails, `Transport` when the
    /// transport reports a failure, and `ResponseFraming` when a
    /// length-prefixed response's prefix disagrees with its payload.
    pub async fn call(&self, method: &str, request: &MessageValue) -> RpcResult<MessageValue> {
        let method_desc = self.resolve(method)?;

        let request_desc = self
            .registry
            .message(&method_desc.request)
            .ok_or_else(|| codec::CodecError::UnknownType {
                name: method_desc.request.clone(),
            })?;
        let mut payload = encode_to_vec(request_desc, &self.registry, request)?;
        if self.framing == Framing::LengthPrefixed {
            payload = prefix_length(&payload);
        }

        tracing::debug!(
            service = %self.service,
            method = %method_desc.name,
            request_bytes = payload.len(),
            "dispatching unary call"
        );

        let response = self.transport.unary(method_desc, payload).await?;
        let body = match self.framing {
            Framing::Plain => response.as_slice(),
            Framing::LengthPrefixed => strip_length(&response)?,
        };

        let response_desc = self
            .registry
            .message(&method_desc.response)
            .ok_or_else(|| codec::CodecError::UnknownType {
                name: method_desc.response.clone(),
            })?;
        let decoded = decode_from_slice(response_desc, &self.registry, body)?;

        tracing::debug!(
            service = %self.service,
            method = %method_desc.name,
            response_bytes = body.len(),
            "unary call complete"
        );
        Ok(decoded)
    }

    /// Callback-convention adapter over [`call`](Self::call).
    ///
    /// `on_complete` observes the same result the future would resolve with,
    /// and is invoked exactly once.
    pub async fn call_with<F>(&self, method: &str, request: &MessageValue, on_complete: F)
    where
        F: FnOnce(RpcResult<MessageValue>) + Send,
    {
        on_complete(self.call(method, request).await);
    }

    fn resolve(&self, method: &str) -> RpcResult<&MethodDescriptor> {
        let service = self
            .registry
            .service(&self.service)
            .ok_or_else(|| RpcError::UnknownService {
                name: self.service.clone(),
            })?;
        let method_desc =
            service
                .method_by_name(method)
                .ok_or_else(|| RpcError::UnknownMethod {
                    service: self.service.clone(),
                    name: method.to_string(),
                })?;
        if !method_desc.is_unary() {
            return Err(RpcError::StreamingUnsupported {
                method: method_desc.name.clone(),
            });
        }
        Ok(method_desc)
    }
}

fn prefix_length(payload: &[u8]) -> Vec<u8> {
    let mut framed = Vec::with_capacity(payload.len() + wire::MAX_VARINT_BYTES);
    encode_varint(payload.len() as u64, &mut framed);
    framed.extend_from_slice(payload);
    framed
}

fn strip_length(response: &[u8]) -> RpcResult<&[u8]> {
    let (declared, used) = decode_varint(response).map_err(codec::CodecError::from)?;
    let body = &response[used..];
    if declared != body.len() as u64 {
        return Err(RpcError::ResponseFraming {
            declared,
            actual: body.len(),
        });
    }
    Ok(body)
}
