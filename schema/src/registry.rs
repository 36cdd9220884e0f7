//! The type registry: all descriptors known to the process.

use std::collections::HashMap;

use wire::MAX_FIELD_NUMBER;

use crate::error::{SchemaError, SchemaResult};
use crate::field::{FieldType, Label};
use crate::message::{EnumDescriptor, MessageDescriptor};
use crate::service::ServiceDescriptor;

/// Reserved field number range (wire-format internal).
const RESERVED_RANGE: std::ops::RangeInclusive<u32> = 19_000..=19_999;

/// An immutable namespace of message, enum, and service descriptors.
///
/// Built once at startup via [`RegistryBuilder`] and then only shared by
/// reference; never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Registry {
    messages: HashMap<String, MessageDescriptor>,
    enums: HashMap<String, EnumDescriptor>,
    services: HashMap<String, ServiceDescriptor>,
}

impl Registry {
    /// Creates a registry builder.
    #[must_use]
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Looks up a message descriptor by fully-qualified name.
    #[must_use]
    pub fn message(&self, name: &str) -> Option<&MessageDescriptor> {
        self.messages.get(name)
    }

    /// Looks up an enum descriptor by fully-qualified name.
    #[must_use]
    pub fn enum_(&self, name: &str) -> Option<&EnumDescriptor> {
        self.enums.get(name)
    }

    /// Looks up a service descriptor by fully-qualified name.
    #[must_use]
    pub fn service(&self, name: &str) -> Option<&ServiceDescriptor> {
        self.services.get(name)
    }

    /// Returns the number of registered messages.
    #[must_use]
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }
}

/// Builder for [`Registry`]; validation happens at [`build`](Self::build).
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    messages: Vec<MessageDescriptor>,
    enums: Vec<EnumDescriptor>,
    services: Vec<ServiceDescriptor>,
}

impl RegistryBuilder {
    /// Adds a message descriptor.
    #[must_use]
    pub fn message(mut self, desc: MessageDescriptor) -> Self {
        self.messages.push(desc);
        self
    }

    /// Adds an enum descriptor.
    #[must_use]
    pub fn enum_(mut self, desc: EnumDescriptor) -> Self {
        self.enums.push(desc);
        self
    }

    /// Adds a service descriptor.
    #[must_use]
    pub fn service(mut self, desc: ServiceDescriptor) -> Self {
        self.services.push(desc);
        self
    }

    /// Validates every descriptor and freezes the registry.
    pub fn build(self) -> SchemaResult<Registry> {
        let mut messages = HashMap::new();
        for desc in self.messages {
            if messages.contains_key(&desc.name) {
                return Err(SchemaError::DuplicateTypeName { name: desc.name });
            }
            messages.insert(desc.name.clone(), desc);
        }

        let mut enums = HashMap::new();
        for desc in self.enums {
            if messages.contains_key(&desc.name) || enums.contains_key(&desc.name) {
                return Err(SchemaError::DuplicateTypeName { name: desc.name });
            }
            if !desc.contains(0) {
                return Err(SchemaError::MissingZeroValue {
                    enum_name: desc.name,
                });
            }
            enums.insert(desc.name.clone(), desc);
        }

        for desc in messages.values() {
            validate_message(desc, &messages, &enums)?;
        }

        let mut services = HashMap::new();
        for desc in self.services {
            validate_service(&desc, &messages)?;
            if services.contains_key(&desc.name) {
                return Err(SchemaError::DuplicateTypeName { name: desc.name });
            }
            services.insert(desc.name.clone(), desc);
        }

        Ok(Registry {
            messages,
            enums,
            services,
        })
    }
}

fn validate_message(
    desc: &MessageDescriptor,
    messages: &HashMap<String, MessageDescriptor>,
    enums: &HashMap<String, EnumDescriptor>,
) -> SchemaResult<()> {
    let mut numbers = std::collections::HashSet::new();
    for field in &desc.fields {
        if field.number == 0
            || field.number > MAX_FIELD_NUMBER
            || RESERVED_RANGE.contains(&field.number)
        {
            return Err(SchemaError::InvalidFieldNumber {
                message: desc.name.clone(),
                number: field.number,
            });
        }
        if !numbers.insert(field.number) {
            return Err(SchemaError::DuplicateFieldNumber {
                message: desc.name.clone(),
                number: field.number,
            });
        }
        if let Some(index) = field.oneof {
            if index >= desc.oneofs.len() {
                return Err(SchemaError::InvalidOneofIndex {
                    message: desc.name.clone(),
                    field: field.name.clone(),
                    index,
                });
            }
            if field.label == Label::Repeated {
                return Err(SchemaError::RepeatedFieldInOneof {
                    message: desc.name.clone(),
                    field: field.name.clone(),
                });
            }
        }
        validate_type_refs(&desc.name, &field.name, &field.ty, messages, enums)?;
    }
    Ok(())
}

fn validate_type_refs(
    message: &str,
    field: &str,
    ty: &FieldType,
    messages: &HashMap<String, MessageDescriptor>,
    enums: &HashMap<String, EnumDescriptor>,
) -> SchemaResult<()> {
    match ty {
        FieldType::Message(name) => {
            if !messages.contains_key(name) {
                return Err(SchemaError::UnresolvedTypeReference {
                    message: message.to_string(),
                    field: field.to_string(),
                    referenced: name.clone(),
                });
            }
        }
        FieldType::Enum(name) => {
            if !enums.contains_key(name) {
                return Err(SchemaError::UnresolvedTypeReference {
                    message: message.to_string(),
                    field: field.to_string(),
                    referenced: name.clone(),
                });
            }
        }
        FieldType::Map { key, value } => {
            validate_type_refs(message, field, key, messages, enums)?;
            validate_type_refs(message, field, value, messages, enums)?;
        }
        _ => {}
    }
    Ok(())
}

fn validate_service(
    desc: &ServiceDescriptor,
    messages: &HashMap<String, MessageDescriptor>,
) -> SchemaResult<()> {
    let mut names = std::collections::HashSet::new();
    for method in &desc.methods {
        if !names.insert(method.name.as_str()) {
            return Err(SchemaError::DuplicateMethodName {
                service: desc.name.clone(),
                method: method.name.clone(),
            });
        }
        for referenced in [&method.request, &method.response] {
            if !messages.contains_key(referenced) {
                return Err(SchemaError::UnresolvedMethodType {
                    service: desc.name.clone(),
                    method: method.name.clone(),
                    referenced: referenced.clone(),
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldDescriptor;
    use crate::message::OneofDescriptor;
    use crate::service::MethodDescriptor;

    fn coin() -> MessageDescriptor {
        MessageDescriptor::new("Coin")
            .field(FieldDescriptor::new(1, "denom", FieldType::String))
            .field(FieldDescriptor::new(2, "amount", FieldType::String))
    }

    #[test]
    fn build_and_lookup() {
        let registry = Registry::builder().message(coin()).build().unwrap();
        assert!(registry.message("Coin").is_some());
        assert!(registry.message("Missing").is_none());
        assert_eq!(registry.message_count(), 1);
    }

    #[test]
    fn rejects_duplicate_type_names() {
        let err = Registry::builder()
            .message(coin())
            .message(coin())
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateTypeName { .. }));
    }

    #[test]
    fn rejects_duplicate_field_numbers() {
        let desc = MessageDescriptor::new("Bad")
            .field(FieldDescriptor::new(1, "a", FieldType::Bool))
            .field(FieldDescriptor::new(1, "b", FieldType::Bool));
        let err = Registry::builder().message(desc).build().unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateFieldNumber { .. }));
    }

    #[test]
    fn rejects_field_number_zero_and_reserved() {
        for number in [0u32, 19_000, 19_999] {
            let desc = MessageDescriptor::new("Bad")
                .field(FieldDescriptor::new(number, "a", FieldType::Bool));
            let err = Registry::builder().message(desc).build().unwrap_err();
            assert!(
                matches!(err, SchemaError::InvalidFieldNumber { .. }),
                "number {number}"
            );
        }
    }

    #[test]
    fn rejects_dangling_message_reference() {
        let desc = MessageDescriptor::new("Params").field(FieldDescriptor::repeated(
            1,
            "min_fee",
            FieldType::Message("Coin".into()),
        ));
        let err = Registry::builder().message(desc).build().unwrap_err();
        assert!(matches!(err, SchemaError::UnresolvedTypeReference { .. }));
    }

    #[test]
    fn rejects_dangling_map_value_reference() {
        let desc = MessageDescriptor::new("FeeInfo").field(FieldDescriptor::map(
            1,
            "fees",
            FieldType::String,
            FieldType::Message("Coin".into()),
        ));
        let err = Registry::builder().message(desc).build().unwrap_err();
        assert!(matches!(err, SchemaError::UnresolvedTypeReference { .. }));
    }

    #[test]
    fn rejects_oneof_index_out_of_range() {
        let desc = MessageDescriptor::new("Bad")
            .field(FieldDescriptor::new(1, "a", FieldType::Bool).in_oneof(0));
        let err = Registry::builder().message(desc).build().unwrap_err();
        assert!(matches!(err, SchemaError::InvalidOneofIndex { .. }));
    }

    #[test]
    fn rejects_repeated_field_in_oneof() {
        let desc = MessageDescriptor::new("Bad")
            .oneof(OneofDescriptor::new("sum"))
            .field(FieldDescriptor::repeated(1, "a", FieldType::Uint32).in_oneof(0));
        let err = Registry::builder().message(desc).build().unwrap_err();
        assert!(matches!(err, SchemaError::RepeatedFieldInOneof { .. }));
    }

    #[test]
    fn rejects_enum_without_zero() {
        let desc = EnumDescriptor::new("Bad").value("ONE", 1);
        let err = Registry::builder().enum_(desc).build().unwrap_err();
        assert!(matches!(err, SchemaError::MissingZeroValue { .. }));
    }

    #[test]
    fn rejects_service_with_unknown_request() {
        let service = ServiceDescriptor::new("Query")
            .method(MethodDescriptor::unary("Params", "Nope", "Coin"));
        let err = Registry::builder()
            .message(coin())
            .service(service)
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::UnresolvedMethodType { .. }));
    }

    #[test]
    fn rejects_duplicate_method_names() {
        let service = ServiceDescriptor::new("Query")
            .method(MethodDescriptor::unary("Params", "Coin", "Coin"))
            .method(MethodDescriptor::unary("Params", "Coin", "Coin"));
        let err = Registry::builder()
            .message(coin())
            .service(service)
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateMethodName { .. }));
    }

    #[test]
    fn service_lookup() {
        let service = ServiceDescriptor::new("Query")
            .method(MethodDescriptor::unary("Params", "Coin", "Coin"));
        let registry = Registry::builder()
            .message(coin())
            .service(service)
            .build()
            .unwrap();
        let service = registry.service("Query").unwrap();
        assert!(service.method_by_name("Params").is_some());
    }
}
