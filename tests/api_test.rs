mod common;

use {
    axum::{
        Router,
        body::Body,
        http::{Request, StatusCode, header},
    },
    common::*,
    http_body_util::BodyExt,
    paygate::{AppState, adapters::api::CORRELATION_HEADER},
    serde_json::{Value, json},
    std::time::Duration,
    tower::ServiceExt,
    uuid::Uuid,
};

fn test_app(behavior: StubBehavior) -> Router {
    let stub = StubGateway::new(behavior);
    let h = harness(vec![(1, "AlwaysApprove", stub)]);
    paygate::router(
        AppState {
            dispatcher: h.dispatcher,
        },
        Duration::from_secs(30),
    )
}

fn correlation_header() -> String {
    json!({
        "transactionId": Uuid::now_v7(),
        "universityId": 42,
        "userId": 7,
    })
    .to_string()
}

fn payment_body(gateway_type_id: u32) -> Value {
    json!({
        "gatewayTypeId": gateway_type_id,
        "gatewayTypeName": "AlwaysApprove",
        "merchantAccountId": 501,
        "credentials": {},
        "account": "4111111111111111",
        "expDate": "1225",
        "cvv2": "123",
        "amount": 49.99,
        "userId": 7,
        "currencyType": 840,
    })
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn payment_request(body: &Value, with_header: bool) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/paymentGateway/processPayment")
        .header(header::CONTENT_TYPE, "application/json");
    if with_header {
        builder = builder.header(CORRELATION_HEADER, correlation_header());
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

#[tokio::test]
async fn approved_payment_round_trips_the_detail_envelope() {
    let app = test_app(StubBehavior::Approve);
    let (status, body) = send(app, payment_request(&payment_body(1), true)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["detail"]["success"], json!(true));
    assert_eq!(body["detail"]["merchantAccountId"], json!(501));
    // Raw processor payloads and error kinds stay out of the success body.
    assert!(body["detail"].get("gatewayResponseData").is_none());
    assert!(body["detail"].get("errorKind").is_none());
}

#[tokio::test]
async fn missing_correlation_header_maps_to_422() {
    let app = test_app(StubBehavior::Approve);
    let (status, body) = send(app, payment_request(&payment_body(1), false)).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["detail"]["success"], json!(false));
    assert_eq!(body["detail"]["errorKind"], json!("validation"));
    assert_eq!(body["detail"]["responseDetail"], json!("Incomplete request"));
}

#[tokio::test]
async fn unknown_gateway_type_maps_to_400() {
    let app = test_app(StubBehavior::Approve);
    let (status, body) = send(app, payment_request(&payment_body(99), true)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"]["errorKind"], json!("configuration"));
}

#[tokio::test]
async fn declined_payment_maps_to_400_without_error_kind() {
    let app = test_app(StubBehavior::Decline);
    let (status, body) = send(app, payment_request(&payment_body(1), true)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"]["success"], json!(false));
    assert!(body["detail"].get("errorKind").is_none());
}

#[tokio::test]
async fn refund_goes_through_patch() {
    let app = test_app(StubBehavior::Approve);
    let body = json!({
        "gatewayTypeId": 1,
        "gatewayTypeName": "AlwaysApprove",
        "merchantAccountId": 501,
        "credentials": {},
        "paymentTransactionId": "PNREF123",
        "userId": 7,
    });
    let request = Request::builder()
        .method("PATCH")
        .uri("/paymentGateway/processRefund")
        .header(header::CONTENT_TYPE, "application/json")
        .header(CORRELATION_HEADER, correlation_header())
        .body(Body::from(body.to_string()))
        .unwrap();

    let (status, body) = send(app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["detail"]["success"], json!(true));
}

#[tokio::test]
async fn health_probe_answers() {
    let app = test_app(StubBehavior::Approve);
    let request = Request::builder()
        .method("GET")
        .uri("/paymentGateway/test")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
