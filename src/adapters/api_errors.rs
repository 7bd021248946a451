use {
    crate::domain::result::GatewayResult,
    axum::{
        Json,
        http::StatusCode,
        response::{IntoResponse, Response},
    },
};

// Newtype over the canonical result so the HTTP shaping lives here in the
// adapter layer: status selection plus the `{"detail": ...}` envelope the
// legacy caller expects on success and failure alike.
pub struct GatewayReply(pub GatewayResult);

impl IntoResponse for GatewayReply {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.http_status()).unwrap_or(StatusCode::BAD_REQUEST);
        let body = serde_json::json!({ "detail": self.0 });
        (status, Json(body)).into_response()
    }
}
