use serde::Deserialize;
use uuid::Uuid;

/// Correlation metadata the legacy caller sends on every request. Created
/// once per inbound call and threaded unchanged through dispatch and audit;
/// never persisted here.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionContext {
    pub transaction_id: Uuid,
    pub university_id: i64,
    pub user_id: i64,
}

impl TransactionContext {
    /// Parses the JSON correlation header payload. Extra keys are fine;
    /// a missing key or malformed JSON yields `None`, which the dispatcher
    /// treats as an incomplete request.
    pub fn from_header_value(raw: &str) -> Option<Self> {
        serde_json::from_str(raw).ok()
    }
}
