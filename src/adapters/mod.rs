pub mod api;
pub mod api_errors;
pub mod cardconnect;
pub mod payload;

use crate::domain::error::GatewayError;

/// Maps an outbound HTTP failure to the transport error kind. Anything that
/// dies between this service and the processor has an unknown outcome; the
/// dispatcher flags these as ambiguous rather than guessing.
pub(crate) fn transport_error(gateway: &str, err: reqwest::Error) -> GatewayError {
    if err.is_timeout() {
        GatewayError::Transport(format!("{gateway}: request timed out: {err}"))
    } else if err.is_connect() {
        GatewayError::Transport(format!("{gateway}: connection failed: {err}"))
    } else {
        GatewayError::Transport(format!("{gateway}: {err}"))
    }
}

/// Parses a processor body as JSON when possible, keeping the raw text
/// otherwise, so malformed responses still reach the audit trail.
pub(crate) fn json_or_string(text: String) -> serde_json::Value {
    serde_json::from_str(&text).unwrap_or(serde_json::Value::String(text))
}
