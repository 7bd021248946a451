use {
    super::api_errors::GatewayReply,
    crate::{
        AppState,
        domain::{
            context::TransactionContext,
            request::{RawPaymentRequest, RawRefundRequest},
        },
    },
    axum::{
        Json,
        extract::State,
        http::HeaderMap,
        response::{IntoResponse, Response},
    },
};

/// Correlation header the legacy caller sends on every request:
/// `{"transactionId": "<uuid>", "universityId": <int>, "userId": <int>}`.
pub const CORRELATION_HEADER: &str = "x-correlation-context";

fn correlation_context(headers: &HeaderMap) -> Option<TransactionContext> {
    let raw = headers.get(CORRELATION_HEADER)?.to_str().ok()?;
    TransactionContext::from_header_value(raw)
}

pub async fn process_payment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(raw): Json<RawPaymentRequest>,
) -> Response {
    let ctx = correlation_context(&headers);
    let result = state.dispatcher.submit_payment(ctx, raw).await;
    GatewayReply(result).into_response()
}

pub async fn process_refund(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(raw): Json<RawRefundRequest>,
) -> Response {
    let ctx = correlation_context(&headers);
    let result = state.dispatcher.submit_refund(ctx, raw).await;
    GatewayReply(result).into_response()
}

/// Internal health probe; not exposed outside the service mesh.
pub async fn health() -> &'static str {
    "Test endpoint successfully reached."
}
