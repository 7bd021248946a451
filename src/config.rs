use std::time::Duration;

/// Service configuration, read from the environment once at startup and
/// injected from `main`. Adapters never touch the environment themselves;
/// everything they need arrives through their constructors.
#[derive(Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub payload_api_url: String,
    /// Overrides the production CardConnect host, for UAT environments.
    pub cardconnect_hostname: Option<String>,
    /// Upper bound on a single adapter call; on expiry the dispatcher fails
    /// the request without retrying.
    pub gateway_call_timeout: Duration,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let timeout_secs = std::env::var("GATEWAY_CALL_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(30);
        Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8082".to_string()),
            payload_api_url: std::env::var("PAYLOAD_API_URL")
                .unwrap_or_else(|_| "https://api.payload.co".to_string()),
            cardconnect_hostname: std::env::var("CARDCONNECT_HOSTNAME")
                .ok()
                .filter(|v| !v.is_empty()),
            gateway_call_timeout: Duration::from_secs(timeout_secs),
        }
    }
}
