//! Reference message and service shapes for the runtime's tests and demos.
//!
//! Real deployments generate their registries from module schemas; this crate
//! hand-builds a representative interchain-query slice of one (coins, module
//! params, contract failures, storage query results, a `Query` service) so
//! the rest of the workspace has something concrete to exercise.

use codec::{MessageValue, Value};
use schema::{
    EnumDescriptor, FieldDescriptor, FieldType, MessageDescriptor, MethodDescriptor,
    OneofDescriptor, Registry, ServiceDescriptor,
};

pub const QUERY_SERVICE: &str = "neutron.interchainqueries.Query";

/// Builds the demo registry.
///
/// The shapes are valid by construction; the unwrap cannot fire.
#[must_use]
#[allow(clippy::missing_panics_doc, clippy::too_many_lines)]
pub fn registry() -> Registry {
    Registry::builder()
        .message(
            MessageDescriptor::new("Coin")
                .field(FieldDescriptor::new(1, "denom", FieldType::String))
                .field(FieldDescriptor::new(2, "amount", FieldType::String)),
        )
        .message(
            MessageDescriptor::new("Params")
                .field(FieldDescriptor::repeated(
                    1,
                    "min_fee",
                    FieldType::Message("Coin".into()),
                ))
                .field(FieldDescriptor::new(2, "query_submit_timeout", FieldType::Uint64))
                .field(FieldDescriptor::new(3, "tx_query_removal_limit", FieldType::Uint64)),
        )
        .message(
            MessageDescriptor::new("Failure")
                .field(FieldDescriptor::new(1, "address", FieldType::String))
                .field(FieldDescriptor::new(2, "id", FieldType::Uint64))
                .field(FieldDescriptor::new(3, "sudo_payload", FieldType::Bytes)),
        )
        .message(
            MessageDescriptor::new("StorageValue")
                .field(FieldDescriptor::new(1, "storage_prefix", FieldType::String))
                .field(FieldDescriptor::new(2, "key", FieldType::Bytes))
                .field(FieldDescriptor::new(3, "value", FieldType::Bytes)),
        )
        .message(
            MessageDescriptor::new("QueryResult")
                .field(FieldDescriptor::repeated(
                    1,
                    "kv_results",
                    FieldType::Message("StorageValue".into()),
                ))
                .field(FieldDescriptor::new(2, "height", FieldType::Uint64))
                .field(FieldDescriptor::new(3, "revision", FieldType::Uint64)),
        )
        .message(
            MessageDescriptor::new("Pubkey")
                .oneof(OneofDescriptor::new("sum"))
                .field(FieldDescriptor::new(1, "ed25519", FieldType::Bytes).in_oneof(0))
                .field(FieldDescriptor::new(2, "secp256k1", FieldType::Bytes).in_oneof(0)),
        )
        .message(
            MessageDescriptor::new("FeeInfo")
                .field(FieldDescriptor::map(
                    1,
                    "rates",
                    FieldType::String,
                    FieldType::Uint64,
                ))
                .field(FieldDescriptor::new(
                    2,
                    "result",
                    FieldType::Enum("TxResult".into()),
                )),
        )
        .message(MessageDescriptor::new("QueryParamsRequest"))
        .message(
            MessageDescriptor::new("QueryParamsResponse").field(FieldDescriptor::new(
                1,
                "params",
                FieldType::Message("Params".into()),
            )),
        )
        .enum_(
            EnumDescriptor::new("TxResult")
                .value("TX_RESULT_UNSPECIFIED", 0)
                .value("TX_RESULT_ACK", 1)
                .value("TX_RESULT_TIMEOUT", 2),
        )
        .service(
            ServiceDescriptor::new(QUERY_SERVICE)
                .method(MethodDescriptor::unary(
                    "Params",
                    "QueryParamsRequest",
                    "QueryParamsResponse",
                ))
                .method(
                    MethodDescriptor::unary(
                        "TrackStorageValues",
                        "QueryParamsRequest",
                        "QueryResult",
                    )
                    .server_streaming(),
                ),
        )
        .build()
        .expect("demo registry is well-formed")
}

#[must_use]
pub fn coin(denom: &str, amount: &str) -> MessageValue {
    let mut msg = MessageValue::new();
    msg.set_raw(1, Value::Str(denom.into()));
    msg.set_raw(2, Value::Str(amount.into()));
    msg
}

#[must_use]
pub fn params(min_fee: Vec<MessageValue>, submit_timeout: u64, removal_limit: u64) -> MessageValue {
    let mut msg = MessageValue::new();
    for fee in min_fee {
        msg.push(1, Value::Message(fee));
    }
    msg.set_raw(2, Value::U64(submit_timeout));
    msg.set_raw(3, Value::U64(removal_limit));
    msg
}

#[must_use]
pub fn failure(address: &str, id: u64, sudo_payload: Vec<u8>) -> MessageValue {
    let mut msg = MessageValue::new();
    msg.set_raw(1, Value::Str(address.into()));
    msg.set_raw(2, Value::U64(id));
    msg.set_raw(3, Value::Bytes(sudo_payload));
    msg
}

#[must_use]
pub fn storage_value(prefix: &str, key: Vec<u8>, value: Vec<u8>) -> MessageValue {
    let mut msg = MessageValue::new();
    msg.set_raw(1, Value::Str(prefix.into()));
    msg.set_raw(2, Value::Bytes(key));
    msg.set_raw(3, Value::Bytes(value));
    msg
}
