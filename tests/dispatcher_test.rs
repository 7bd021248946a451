mod common;

use {
    common::*,
    paygate::domain::{audit::AuditLevel, error::ErrorKind},
    std::time::Duration,
};

// ── Approved payment (stub "AlwaysApprove" under type id 1) ────────────────

#[tokio::test]
async fn approved_payment_returns_canonical_success() {
    let stub = StubGateway::new(StubBehavior::Approve);
    let h = harness(vec![(1, "AlwaysApprove", stub.clone())]);

    let result = h
        .dispatcher
        .submit_payment(Some(context()), raw_payment(1))
        .await;

    assert!(result.success);
    assert_eq!(result.status_code.as_deref(), Some("00"));
    assert_eq!(result.gateway_http_status_code, Some(200));
    assert!(
        result
            .payment_transaction_id
            .as_deref()
            .is_some_and(|id| !id.is_empty())
    );
    assert_eq!(result.merchant_account_id, 501);
    assert!(result.error_kind.is_none());
}

#[tokio::test]
async fn approved_payment_emits_one_audit_record() {
    let stub = StubGateway::new(StubBehavior::Approve);
    let h = harness(vec![(1, "AlwaysApprove", stub)]);
    let ctx = context();

    h.dispatcher
        .submit_payment(Some(ctx.clone()), raw_payment(1))
        .await;

    let records = h.audit.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].level, AuditLevel::Audit);
    assert_eq!(records[0].transaction_id, Some(ctx.transaction_id));
    assert_eq!(records[0].university_id, Some(ctx.university_id));
    assert_eq!(records[0].request_kind, "payment");
}

#[tokio::test]
async fn silent_approval_gets_dispatcher_summary_detail() {
    let stub = StubGateway::new(StubBehavior::ApproveSilent);
    let h = harness(vec![(1, "AlwaysApprove", stub)]);

    let result = h
        .dispatcher
        .submit_payment(Some(context()), raw_payment(1))
        .await;

    assert_eq!(result.response_detail.as_deref(), Some("Transaction approved"));
}

// ── Declines are completed attempts, not system failures ───────────────────

#[tokio::test]
async fn declined_payment_is_completed_not_failed() {
    let stub = StubGateway::new(StubBehavior::Decline);
    let h = harness(vec![(1, "AlwaysApprove", stub.clone())]);

    let result = h
        .dispatcher
        .submit_payment(Some(context()), raw_payment(1))
        .await;

    assert!(!result.success);
    assert_eq!(result.gateway_http_status_code, Some(400));
    // A decline carries no error kind; that is what distinguishes it from
    // a dispatch failure.
    assert!(result.error_kind.is_none());
    // The processor's own message wins over the dispatcher summary.
    assert_eq!(result.response_detail.as_deref(), Some("Do not honor"));
    assert_eq!(stub.call_count(), 1);

    let records = h.audit.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].level, AuditLevel::Error);
}

// ── Unknown gateway type: short-circuit before any external call ───────────

#[tokio::test]
async fn unknown_gateway_type_makes_zero_adapter_calls() {
    let stub = StubGateway::new(StubBehavior::Approve);
    let h = harness(vec![(1, "AlwaysApprove", stub.clone())]);

    let result = h
        .dispatcher
        .submit_payment(Some(context()), raw_payment(99))
        .await;

    assert!(!result.success);
    assert_eq!(result.error_kind, Some(ErrorKind::Configuration));
    assert_eq!(
        result.response_detail.as_deref(),
        Some("Unknown payment gateway type")
    );
    assert_eq!(stub.call_count(), 0);

    let records = h.audit.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].level, AuditLevel::Error);
}

#[tokio::test]
async fn missing_credentials_rejected_before_invoke() {
    let stub = StubGateway::requiring(StubBehavior::Approve, &["apiKey", "processingId"]);
    let h = harness(vec![(1, "AlwaysApprove", stub.clone())]);

    let result = h
        .dispatcher
        .submit_payment(Some(context()), raw_payment(1))
        .await;

    assert_eq!(result.error_kind, Some(ErrorKind::Configuration));
    assert_eq!(
        result.response_detail.as_deref(),
        Some("Required credentials for AlwaysApprove are not present")
    );
    assert_eq!(stub.call_count(), 0);
    assert_eq!(h.audit.records().len(), 1);
}

// ── No duplicate dispatch ──────────────────────────────────────────────────

#[tokio::test]
async fn one_submission_means_one_external_attempt() {
    let stub = StubGateway::new(StubBehavior::Approve);
    let h = harness(vec![(1, "AlwaysApprove", stub.clone())]);

    h.dispatcher
        .submit_payment(Some(context()), raw_payment(1))
        .await;

    assert_eq!(stub.call_count(), 1);
}

#[tokio::test]
async fn transport_failure_is_not_retried() {
    let stub = StubGateway::new(StubBehavior::TransportFail);
    let h = harness(vec![(1, "AlwaysApprove", stub.clone())]);

    let result = h
        .dispatcher
        .submit_payment(Some(context()), raw_payment(1))
        .await;

    assert_eq!(result.error_kind, Some(ErrorKind::Transport));
    assert_eq!(stub.call_count(), 1);

    let records = h.audit.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].level, AuditLevel::Error);
    assert_eq!(records[0].data["ambiguous"], serde_json::json!(true));
}

// ── Timeout: 5s hang against a 2s budget ───────────────────────────────────

#[tokio::test(start_paused = true)]
async fn slow_gateway_times_out_with_ambiguous_audit() {
    let stub = StubGateway::new(StubBehavior::Hang(Duration::from_secs(5)));
    let h = harness_with_timeout(
        vec![(1, "AlwaysApprove", stub.clone())],
        Duration::from_secs(2),
    );

    let result = h
        .dispatcher
        .submit_payment(Some(context()), raw_payment(1))
        .await;

    assert!(!result.success);
    assert_eq!(result.error_kind, Some(ErrorKind::Transport));
    assert!(result.gateway_http_status_code.is_none());
    assert!(
        result
            .response_detail
            .as_deref()
            .is_some_and(|d| d.contains("timed out"))
    );
    assert_eq!(stub.call_count(), 1);

    let records = h.audit.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].level, AuditLevel::Error);
    assert_eq!(records[0].data["ambiguous"], serde_json::json!(true));
}

// ── Adapter defects are contained ──────────────────────────────────────────

#[tokio::test]
async fn panicking_adapter_becomes_unhandled_failure() {
    let stub = StubGateway::new(StubBehavior::Panic);
    let h = harness(vec![(1, "AlwaysApprove", stub)]);

    let result = h
        .dispatcher
        .submit_payment(Some(context()), raw_payment(1))
        .await;

    assert!(!result.success);
    assert_eq!(result.error_kind, Some(ErrorKind::Unhandled));
    assert_eq!(
        result.response_detail.as_deref(),
        Some("Unexpected error encountered processing AlwaysApprove payment request")
    );
    assert_eq!(result.http_status(), 421);

    let records = h.audit.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].level, AuditLevel::Error);
}
