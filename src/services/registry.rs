use {
    crate::domain::{error::GatewayError, gateway::PaymentGateway},
    std::{collections::HashMap, sync::Arc},
};

/// A registry entry: the gateway's display name (used in caller-facing
/// detail messages) plus the adapter instance.
pub struct RegisteredGateway {
    pub name: String,
    pub gateway: Arc<dyn PaymentGateway>,
}

/// Gateway-type lookup table. Populated once at process start from static
/// configuration and read-only afterwards, so concurrent resolution needs
/// no locking. Adding a gateway type is a deploy, not a runtime operation.
#[derive(Default)]
pub struct AdapterRegistry {
    entries: HashMap<u32, RegisteredGateway>,
}

impl AdapterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        gateway_type_id: u32,
        name: impl Into<String>,
        gateway: Arc<dyn PaymentGateway>,
    ) {
        self.entries.insert(
            gateway_type_id,
            RegisteredGateway {
                name: name.into(),
                gateway,
            },
        );
    }

    /// Typed rejection of unknown gateway types, distinguishable from any
    /// downstream processor failure so dispatch can short-circuit before
    /// making an external call.
    pub fn resolve(&self, gateway_type_id: u32) -> Result<&RegisteredGateway, GatewayError> {
        self.entries
            .get(&gateway_type_id)
            .ok_or_else(|| GatewayError::Configuration("Unknown payment gateway type".into()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
