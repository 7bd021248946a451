use {
    super::error::{ErrorKind, GatewayError},
    serde::Serialize,
    serde_json::Value,
};

/// Canonical gateway-agnostic response envelope: the sole artifact returned
/// to the caller and logged, one per request, immutable once the dispatcher
/// finishes canonicalizing it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayResult {
    pub success: bool,
    /// Processor-shaped status: Payload reports strings like `processed`,
    /// CardConnect reports its HTTP code, stubs report ISO-8583-ish codes.
    pub status_code: Option<String>,
    pub gateway_http_status_code: Option<u16>,
    pub response_message: Option<String>,
    pub response_detail: Option<String>,
    pub payment_transaction_id: Option<String>,
    pub merchant_account_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
    /// Raw processor payloads. Audit-only; never serialized to the caller.
    #[serde(skip)]
    pub gateway_response_data: Option<Value>,
}

impl GatewayResult {
    /// A completed processor attempt, approved or declined. The dispatcher
    /// stamps merchant accounting and the response detail afterwards.
    pub fn completed(
        success: bool,
        http_status: u16,
        status_code: Option<String>,
        response_message: Option<String>,
        payment_transaction_id: Option<String>,
        gateway_response_data: Option<Value>,
    ) -> Self {
        Self {
            success,
            status_code,
            gateway_http_status_code: Some(http_status),
            response_message,
            response_detail: None,
            payment_transaction_id,
            merchant_account_id: 0,
            error_kind: None,
            gateway_response_data,
        }
    }

    /// A failure that never produced a processor response.
    pub fn failure(kind: ErrorKind, detail: String, merchant_account_id: i64) -> Self {
        Self {
            success: false,
            status_code: None,
            gateway_http_status_code: None,
            response_message: None,
            response_detail: Some(detail),
            payment_transaction_id: None,
            merchant_account_id,
            error_kind: Some(kind),
            gateway_response_data: None,
        }
    }

    pub fn local_failure(error: &GatewayError, merchant_account_id: i64) -> Self {
        Self::failure(error.kind(), error.detail().to_string(), merchant_account_id)
    }

    /// HTTP status the caller sees. Processor 5xx collapses to 400: a 5xx
    /// from this service must mean this service is broken, not the
    /// processor. Local failures map by kind.
    pub fn http_status(&self) -> u16 {
        match (self.gateway_http_status_code, self.error_kind) {
            (Some(200), _) => 200,
            (Some(code), _) if code >= 500 => 400,
            (Some(code), _) => code,
            (None, Some(ErrorKind::Validation)) => 422,
            (None, Some(ErrorKind::Configuration)) => 400,
            (None, Some(ErrorKind::Transport)) => 400,
            (None, Some(ErrorKind::Unhandled)) => 421,
            (None, None) => 200,
        }
    }
}
