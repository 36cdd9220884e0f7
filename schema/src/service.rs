//! Service and method descriptors.

/// A remotely-invokable method declaration.
///
/// The streaming flags are declared schema facts; the dispatcher implements
/// only the unary case and rejects calls to streaming methods.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MethodDescriptor {
    /// Method name.
    pub name: String,
    /// Fully-qualified request message name.
    pub request: String,
    /// Fully-qualified response message name.
    pub response: String,
    /// Client sends a stream of requests.
    pub client_streaming: bool,
    /// Server sends a stream of responses.
    pub server_streaming: bool,
}

impl MethodDescriptor {
    /// Creates a unary method declaration.
    #[must_use]
    pub fn unary(
        name: impl Into<String>,
        request: impl Into<String>,
        response: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            request: request.into(),
            response: response.into(),
            client_streaming: false,
            server_streaming: false,
        }
    }

    /// Marks the method as server-streaming.
    #[must_use]
    pub fn server_streaming(mut self) -> Self {
        self.server_streaming = true;
        self
    }

    /// Marks the method as client-streaming.
    #[must_use]
    pub fn client_streaming(mut self) -> Self {
        self.client_streaming = true;
        self
    }

    /// Returns `true` for plain unary methods.
    #[must_use]
    pub fn is_unary(&self) -> bool {
        !self.client_streaming && !self.server_streaming
    }
}

/// A service: a fixed, schema-declared set of named methods.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ServiceDescriptor {
    /// Fully-qualified service name.
    pub name: String,
    /// Methods in declaration order.
    pub methods: Vec<MethodDescriptor>,
}

impl ServiceDescriptor {
    /// Creates an empty service descriptor.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            methods: Vec::new(),
        }
    }

    /// Adds a method declaration.
    #[must_use]
    pub fn method(mut self, method: MethodDescriptor) -> Self {
        self.methods.push(method);
        self
    }

    /// Looks up a method by name.
    #[must_use]
    pub fn method_by_name(&self, name: &str) -> Option<&MethodDescriptor> {
        self.methods.iter().find(|m| m.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unary_by_default() {
        let method = MethodDescriptor::unary("Params", "QueryParamsRequest", "QueryParamsResponse");
        assert!(method.is_unary());
    }

    #[test]
    fn streaming_flags() {
        let method = MethodDescriptor::unary("Subscribe", "SubRequest", "SubResponse")
            .server_streaming();
        assert!(!method.is_unary());
        assert!(method.server_streaming);
        assert!(!method.client_streaming);
    }

    #[test]
    fn method_lookup() {
        let service = ServiceDescriptor::new("Query")
            .method(MethodDescriptor::unary("Params", "Req", "Resp"));
        assert!(service.method_by_name("Params").is_some());
        assert!(service.method_by_name("Missing").is_none());
    }
}
