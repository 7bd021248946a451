use {
    super::error::GatewayError,
    std::{collections::HashMap, fmt},
};

/// Built-in processor integrations. Adding one is a deploy-time change: a
/// new variant, a new adapter, a new registration in `main`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GatewayKind {
    Payload,
    CardConnect,
}

impl GatewayKind {
    pub fn type_id(self) -> u32 {
        match self {
            Self::Payload => 1,
            Self::CardConnect => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Payload => "Payload",
            Self::CardConnect => "CardConnect",
        }
    }
}

/// Per-request credential map supplied by the legacy caller. The valid keys
/// vary by gateway type; each adapter declares its required set and reads
/// values by key. Lives for the single request, redacted in Debug output.
#[derive(Clone)]
pub struct Credentials(HashMap<String, String>);

impl Credentials {
    pub fn new(map: HashMap<String, String>) -> Self {
        Self(map)
    }

    pub fn contains_all(&self, keys: &[&str]) -> bool {
        keys.iter().all(|key| self.0.contains_key(*key))
    }

    pub fn get(&self, key: &str) -> Result<&str, GatewayError> {
        self.0
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| GatewayError::Configuration(format!("missing credential field: {key}")))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for key in self.0.keys() {
            map.entry(key, &"<redacted>");
        }
        map.finish()
    }
}

/// Which gateway this request targets and what it may authenticate with.
/// Supplied in full on every call; nothing here is cached or persisted.
#[derive(Debug, Clone)]
pub struct GatewayIdentity {
    pub gateway_type_id: u32,
    pub gateway_type_name: String,
    pub merchant_account_id: i64,
    pub credentials: Credentials,
}
