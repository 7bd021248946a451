#![allow(dead_code)]

use {
    paygate::domain::{
        audit::AuditRecord,
        context::TransactionContext,
        error::GatewayError,
        gateway::{GatewayFuture, PaymentGateway},
        identity::Credentials,
        request::{PaymentRequest, RawPaymentRequest, RawRefundRequest, RefundRequest},
        result::GatewayResult,
    },
    paygate::services::{audit::AuditSink, dispatcher::Dispatcher, registry::AdapterRegistry},
    std::{
        collections::HashMap,
        sync::{
            Arc, Mutex,
            atomic::{AtomicUsize, Ordering},
        },
        time::Duration,
    },
    uuid::Uuid,
};

/// What a stub gateway does when invoked.
pub enum StubBehavior {
    Approve,
    /// Approves without a processor message, so the dispatcher's own
    /// summary shows through as the response detail.
    ApproveSilent,
    Decline,
    Hang(Duration),
    TransportFail,
    Panic,
    /// Completed attempt with this gateway HTTP status and no message.
    HttpStatus(u16),
}

/// In-memory gateway for dispatcher tests: counts invocations and records
/// the refund amount it resolved.
pub struct StubGateway {
    behavior: StubBehavior,
    required: &'static [&'static str],
    calls: AtomicUsize,
    original_amount: f64,
    resolved_refund_amount: Mutex<Option<f64>>,
}

impl StubGateway {
    pub fn new(behavior: StubBehavior) -> Arc<Self> {
        Self::build(behavior, &[], 100.0)
    }

    pub fn requiring(behavior: StubBehavior, required: &'static [&'static str]) -> Arc<Self> {
        Self::build(behavior, required, 100.0)
    }

    pub fn with_original_amount(behavior: StubBehavior, original_amount: f64) -> Arc<Self> {
        Self::build(behavior, &[], original_amount)
    }

    fn build(
        behavior: StubBehavior,
        required: &'static [&'static str],
        original_amount: f64,
    ) -> Arc<Self> {
        Arc::new(Self {
            behavior,
            required,
            calls: AtomicUsize::new(0),
            original_amount,
            resolved_refund_amount: Mutex::new(None),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The amount the stub would have sent to the processor on the last
    /// refund, after defaulting an absent amount to the original.
    pub fn resolved_refund_amount(&self) -> Option<f64> {
        *self.resolved_refund_amount.lock().unwrap()
    }

    async fn respond(&self) -> Result<GatewayResult, GatewayError> {
        match &self.behavior {
            StubBehavior::Approve => Ok(GatewayResult::completed(
                true,
                200,
                Some("00".into()),
                Some("Approved".into()),
                Some(format!("STUB-{}", Uuid::now_v7().simple())),
                None,
            )),
            StubBehavior::ApproveSilent => Ok(GatewayResult::completed(
                true,
                200,
                Some("00".into()),
                None,
                Some(format!("STUB-{}", Uuid::now_v7().simple())),
                None,
            )),
            StubBehavior::Decline => Ok(GatewayResult::completed(
                false,
                400,
                Some("05".into()),
                Some("Do not honor".into()),
                None,
                None,
            )),
            StubBehavior::Hang(delay) => {
                tokio::time::sleep(*delay).await;
                Ok(GatewayResult::completed(
                    true,
                    200,
                    Some("00".into()),
                    None,
                    Some("STUB-SLOW".into()),
                    None,
                ))
            }
            StubBehavior::TransportFail => {
                Err(GatewayError::Transport("connection refused".into()))
            }
            StubBehavior::Panic => panic!("stub gateway blew up"),
            StubBehavior::HttpStatus(code) => {
                Ok(GatewayResult::completed(false, *code, None, None, None, None))
            }
        }
    }
}

impl PaymentGateway for StubGateway {
    fn required_credentials(&self) -> &'static [&'static str] {
        self.required
    }

    fn process_payment<'a>(
        &'a self,
        _credentials: &'a Credentials,
        _payment: &'a PaymentRequest,
    ) -> GatewayFuture<'a> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Box::pin(self.respond())
    }

    fn process_refund<'a>(
        &'a self,
        _credentials: &'a Credentials,
        refund: &'a RefundRequest,
    ) -> GatewayFuture<'a> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Box::pin(async move {
            let resolved = refund
                .amount
                .map(|a| a.value())
                .unwrap_or(self.original_amount);
            *self.resolved_refund_amount.lock().unwrap() = Some(resolved);
            self.respond().await
        })
    }
}

/// Audit sink that keeps every record so tests can assert exactly-once
/// emission and record contents.
#[derive(Default)]
pub struct RecordingAuditSink {
    records: Mutex<Vec<AuditRecord>>,
}

impl AuditSink for RecordingAuditSink {
    fn emit(&self, record: &AuditRecord) {
        self.records.lock().unwrap().push(record.clone());
    }
}

impl RecordingAuditSink {
    pub fn records(&self) -> Vec<AuditRecord> {
        self.records.lock().unwrap().clone()
    }
}

pub struct Harness {
    pub dispatcher: Arc<Dispatcher>,
    pub audit: Arc<RecordingAuditSink>,
}

pub fn harness(gateways: Vec<(u32, &str, Arc<StubGateway>)>) -> Harness {
    harness_with_timeout(gateways, Duration::from_secs(2))
}

pub fn harness_with_timeout(
    gateways: Vec<(u32, &str, Arc<StubGateway>)>,
    call_timeout: Duration,
) -> Harness {
    let mut registry = AdapterRegistry::new();
    for (type_id, name, gateway) in gateways {
        registry.register(type_id, name, gateway);
    }
    let audit = Arc::new(RecordingAuditSink::default());
    let dispatcher = Arc::new(Dispatcher::new(
        Arc::new(registry),
        audit.clone(),
        call_timeout,
    ));
    Harness { dispatcher, audit }
}

pub fn context() -> TransactionContext {
    TransactionContext {
        transaction_id: Uuid::now_v7(),
        university_id: 42,
        user_id: 7,
    }
}

/// A payment that passes normalization, aimed at `gateway_type_id`.
pub fn raw_payment(gateway_type_id: u32) -> RawPaymentRequest {
    RawPaymentRequest {
        gateway_type_id,
        gateway_type_name: "AlwaysApprove".into(),
        merchant_account_id: 501,
        credentials: HashMap::new(),
        account: "4111111111111111".into(),
        exp_date: "1225".into(),
        cvv2: "123".into(),
        amount: 49.99,
        user_id: 7,
        currency_type: 840,
        name: None,
        street: None,
        city: None,
        state: None,
        zip: None,
        country: None,
        comment: None,
        user_name: None,
    }
}

pub fn raw_refund(gateway_type_id: u32, payment_transaction_id: &str) -> RawRefundRequest {
    RawRefundRequest {
        gateway_type_id,
        gateway_type_name: "AlwaysApprove".into(),
        merchant_account_id: 501,
        credentials: HashMap::new(),
        payment_transaction_id: payment_transaction_id.into(),
        user_id: 7,
        comment: None,
        amount: None,
        masked_card_number: None,
        currency_type: None,
    }
}
