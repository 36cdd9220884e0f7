use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use codec::{decode_from_slice, encode_to_vec, MessageValue, Value};
use demo_schema::QUERY_SERVICE;
use rpc::{Framing, RpcError, ServiceClient, Transport, TransportError};
use schema::{MethodDescriptor, Registry};
use wire::{decode_varint, encode_varint};

/// Serves the `Params` method in-memory: decodes the request with the shared
/// registry and answers with a canned `QueryParamsResponse`.
struct ParamsServer {
    registry: Arc<Registry>,
    framing: Framing,
}

impl ParamsServer {
    fn response(&self) -> MessageValue {
        let desc = self.registry.message("QueryParamsResponse").unwrap();
        let mut msg = MessageValue::new();
        msg.set(
            desc,
            1,
            Value::Message(demo_schema::params(
                vec![demo_schema::coin("untrn", "1000")],
                1_036_800,
                10_000,
            )),
        );
        msg
    }
}

#[async_trait]
impl Transport for ParamsServer {
    async fn unary(
        &self,
        method: &MethodDescriptor,
        request: Vec<u8>,
    ) -> Result<Vec<u8>, TransportError> {
        let body = match self.framing {
            Framing::Plain => request.as_slice(),
            Framing::LengthPrefixed => {
                let (declared, used) = decode_varint(&request)
                    .map_err(|e| TransportError::new(e.to_string()))?;
                let body = &request[used..];
                assert_eq!(declared, body.len() as u64);
                body
            }
        };
        let request_desc = self.registry.message(&method.request).unwrap();
        decode_from_slice(request_desc, &self.registry, body)
            .map_err(|e| TransportError::new(e.to_string()))?;

        let response_desc = self.registry.message(&method.response).unwrap();
        let mut payload = encode_to_vec(response_desc, &self.registry, &self.response())
            .map_err(|e| TransportError::new(e.to_string()))?;
        if self.framing == Framing::LengthPrefixed {
            let mut framed = Vec::new();
            encode_varint(payload.len() as u64, &mut framed);
            framed.extend_from_slice(&payload);
            payload = framed;
        }
        Ok(payload)
    }
}

/// Answers every call with fixed raw bytes.
struct CannedTransport {
    response: Vec<u8>,
}

#[async_trait]
impl Transport for CannedTransport {
    async fn unary(
        &self,
        _method: &MethodDescriptor,
        _request: Vec<u8>,
    ) -> Result<Vec<u8>, TransportError> {
        Ok(self.response.clone())
    }
}

struct FailingTransport;

#[async_trait]
impl Transport for FailingTransport {
    async fn unary(
        &self,
        _method: &MethodDescriptor,
        _request: Vec<u8>,
    ) -> Result<Vec<u8>, TransportError> {
        Err(TransportError::new("connection reset"))
    }
}

fn params_client(framing: Framing) -> ServiceClient {
    let registry = Arc::new(demo_schema::registry());
    let server = Arc::new(ParamsServer {
        registry: Arc::clone(&registry),
        framing,
    });
    ServiceClient::new(registry, QUERY_SERVICE, server, framing).unwrap()
}

fn assert_params_response(response: &MessageValue) {
    let Some(Value::Message(params)) = response.get(1) else {
        panic!("missing params field");
    };
    assert_eq!(params.get(2), Some(&Value::U64(1_036_800)));
    let Some(Value::Message(fee)) = params.get_repeated(1).first() else {
        panic!("missing min_fee entry");
    };
    assert_eq!(fee.get(1), Some(&Value::Str("untrn".into())));
}

#[tokio::test]
async fn plain_unary_roundtrip() {
    let client = params_client(Framing::Plain);
    let response = client.call("Params", &MessageValue::new()).await.unwrap();
    assert_params_response(&response);
}

#[tokio::test]
async fn length_prefixed_unary_roundtrip() {
    let client = params_client(Framing::LengthPrefixed);
    let response = client.call("Params", &MessageValue::new()).await.unwrap();
    assert_params_response(&response);
}

#[tokio::test]
async fn callback_convention_observes_the_same_result() {
    let client = params_client(Framing::Plain);
    let delivered = Mutex::new(Vec::new());
    client
        .call_with("Params", &MessageValue::new(), |result| {
            delivered.lock().unwrap().push(result);
        })
        .await;

    let delivered = delivered.into_inner().unwrap();
    assert_eq!(delivered.len(), 1);
    assert_params_response(delivered[0].as_ref().unwrap());
}

#[tokio::test]
async fn callback_convention_delivers_errors_once() {
    let registry = Arc::new(demo_schema::registry());
    let client = ServiceClient::new(
        registry,
        QUERY_SERVICE,
        Arc::new(FailingTransport),
        Framing::Plain,
    )
    .unwrap();

    let delivered = Mutex::new(Vec::new());
    client
        .call_with("Params", &MessageValue::new(), |result| {
            delivered.lock().unwrap().push(result);
        })
        .await;

    let delivered = delivered.into_inner().unwrap();
    assert_eq!(delivered.len(), 1);
    assert!(matches!(delivered[0], Err(RpcError::Transport(_))));
}

#[tokio::test]
async fn unknown_service_fails_at_construction() {
    let registry = Arc::new(demo_schema::registry());
    let err = ServiceClient::new(
        registry,
        "neutron.interchainqueries.Missing",
        Arc::new(FailingTransport),
        Framing::Plain,
    )
    .unwrap_err();
    assert!(matches!(err, RpcError::UnknownService { .. }));
}

#[tokio::test]
async fn unknown_method_is_rejected() {
    let client = params_client(Framing::Plain);
    let err = client
        .call("Missing", &MessageValue::new())
        .await
        .unwrap_err();
    assert_eq!(
        err,
        RpcError::UnknownMethod {
            service: QUERY_SERVICE.into(),
            name: "Missing".into(),
        }
    );
}

#[tokio::test]
async fn streaming_method_is_rejected() {
    let client = params_client(Framing::Plain);
    let err = client
        .call("TrackStorageValues", &MessageValue::new())
        .await
        .unwrap_err();
    assert_eq!(
        err,
        RpcError::StreamingUnsupported {
            method: "TrackStorageValues".into(),
        }
    );
}

#[tokio::test]
async fn transport_failure_surfaces() {
    let registry = Arc::new(demo_schema::registry());
    let client = ServiceClient::new(
        registry,
        QUERY_SERVICE,
        Arc::new(FailingTransport),
        Framing::Plain,
    )
    .unwrap();
    let err = client
        .call("Params", &MessageValue::new())
        .await
        .unwrap_err();
    let RpcError::Transport(transport) = err else {
        panic!("expected a transport error");
    };
    assert_eq!(transport.message(), "connection reset");
}

#[tokio::test]
async fn lying_length_prefix_is_rejected() {
    let registry = Arc::new(demo_schema::registry());
    // Prefix declares 5 bytes, payload carries 2.
    let transport = Arc::new(CannedTransport {
        response: vec![0x05, 0x08, 0x01],
    });
    let client =
        ServiceClient::new(registry, QUERY_SERVICE, transport, Framing::LengthPrefixed).unwrap();
    let err = client
        .call("Params", &MessageValue::new())
        .await
        .unwrap_err();
    assert_eq!(
        err,
        RpcError::ResponseFraming {
            declared: 5,
            actual: 2
        }
    );
}

#[tokio::test]
async fn undecodable_response_is_a_codec_error() {
    let registry = Arc::new(demo_schema::registry());
    // Field 1 is declared as a message; a varint payload cannot satisfy the
    // length-delimited read.
    let transport = Arc::new(CannedTransport {
        response: vec![0x0A, 0x64],
    });
    let client = ServiceClient::new(registry, QUERY_SERVICE, transport, Framing::Plain).unwrap();
    let err = client
        .call("Params", &MessageValue::new())
        .await
        .unwrap_err();
    assert!(matches!(err, RpcError::Codec(_)));
}
