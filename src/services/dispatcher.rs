use {
    crate::domain::{
        audit::{AuditLevel, AuditRecord},
        card::mask_account,
        context::TransactionContext,
        error::{ErrorKind, GatewayError},
        gateway::PaymentGateway,
        identity::GatewayIdentity,
        request::{PaymentRequest, RawPaymentRequest, RawRefundRequest, RefundRequest},
        result::GatewayResult,
    },
    crate::services::{audit::AuditSink, registry::AdapterRegistry},
    serde_json::{Map, Value, json},
    std::{sync::Arc, time::Duration},
};

const PAYMENT_URI: &str = "/paymentGateway/processPayment";
const REFUND_URI: &str = "/paymentGateway/processRefund";

/// Per-request orchestration: validate, resolve the adapter, invoke it once
/// under a bounded timeout, canonicalize the outcome, emit exactly one audit
/// record. Holds no cross-request state, so any number of requests can run
/// through one instance concurrently.
///
/// There is deliberately no retry anywhere in here: a blind retry of a
/// payment call risks double-charging. The legacy caller owns retry policy.
pub struct Dispatcher {
    registry: Arc<AdapterRegistry>,
    audit: Arc<dyn AuditSink>,
    call_timeout: Duration,
}

enum Operation {
    Payment(PaymentRequest),
    Refund(RefundRequest),
}

impl Operation {
    fn noun(&self) -> &'static str {
        match self {
            Self::Payment(_) => "payment",
            Self::Refund(_) => "refund",
        }
    }
}

impl Dispatcher {
    pub fn new(
        registry: Arc<AdapterRegistry>,
        audit: Arc<dyn AuditSink>,
        call_timeout: Duration,
    ) -> Self {
        Self {
            registry,
            audit,
            call_timeout,
        }
    }

    pub async fn submit_payment(
        &self,
        ctx: Option<TransactionContext>,
        raw: RawPaymentRequest,
    ) -> GatewayResult {
        let attempt = Attempt::payment(ctx.as_ref(), &raw);
        let merchant_account_id = raw.merchant_account_id;
        if ctx.is_none() {
            let error = GatewayError::Validation("Incomplete request".into());
            return self.fail(&attempt, &error, merchant_account_id);
        }
        let payment = match PaymentRequest::normalize(&raw) {
            Ok(payment) => payment,
            Err(error) => return self.fail(&attempt, &error, merchant_account_id),
        };
        self.invoke(attempt, raw.identity(), Operation::Payment(payment))
            .await
    }

    pub async fn submit_refund(
        &self,
        ctx: Option<TransactionContext>,
        raw: RawRefundRequest,
    ) -> GatewayResult {
        let attempt = Attempt::refund(ctx.as_ref(), &raw);
        let merchant_account_id = raw.merchant_account_id;
        if ctx.is_none() {
            let error = GatewayError::Validation("Incomplete request".into());
            return self.fail(&attempt, &error, merchant_account_id);
        }
        let refund = match RefundRequest::normalize(&raw) {
            Ok(refund) => refund,
            Err(error) => return self.fail(&attempt, &error, merchant_account_id),
        };
        self.invoke(attempt, raw.identity(), Operation::Refund(refund))
            .await
    }

    /// Failure before any external call: resolved locally, audited at ERROR.
    fn fail(
        &self,
        attempt: &Attempt,
        error: &GatewayError,
        merchant_account_id: i64,
    ) -> GatewayResult {
        let result = GatewayResult::local_failure(error, merchant_account_id);
        self.audit.emit(&attempt.finish(&result, false));
        result
    }

    async fn invoke(
        &self,
        attempt: Attempt,
        identity: GatewayIdentity,
        operation: Operation,
    ) -> GatewayResult {
        let merchant_account_id = identity.merchant_account_id;
        let entry = match self.registry.resolve(identity.gateway_type_id) {
            Ok(entry) => entry,
            Err(error) => return self.fail(&attempt, &error, merchant_account_id),
        };
        if !identity
            .credentials
            .contains_all(entry.gateway.required_credentials())
        {
            let error = GatewayError::Configuration(format!(
                "Required credentials for {} are not present",
                entry.name
            ));
            return self.fail(&attempt, &error, merchant_account_id);
        }

        let gateway = entry.gateway.clone();
        let gateway_name = entry.name.clone();
        let fallback = (attempt.clone(), gateway_name.clone(), operation.noun());
        let audit = self.audit.clone();
        let call_timeout = self.call_timeout;

        // Detached so a caller disconnect cannot cancel the attempt mid-call
        // and leave it unaudited; a charge may have landed even if nobody is
        // waiting for the answer. This also contains panicking adapters.
        let task = tokio::spawn(async move {
            let outcome = tokio::time::timeout(call_timeout, async {
                match &operation {
                    Operation::Payment(payment) => {
                        gateway.process_payment(&identity.credentials, payment).await
                    }
                    Operation::Refund(refund) => {
                        gateway.process_refund(&identity.credentials, refund).await
                    }
                }
            })
            .await;

            let (result, ambiguous) = match outcome {
                Ok(Ok(mut result)) => {
                    result.merchant_account_id = merchant_account_id;
                    let summary = completion_detail(&result, &operation, &gateway_name);
                    result.response_detail = result.response_message.clone().or(Some(summary));
                    (result, false)
                }
                Ok(Err(error)) => {
                    let ambiguous = error.kind() == ErrorKind::Transport;
                    let result = failure_result(
                        &error,
                        operation.noun(),
                        &gateway_name,
                        merchant_account_id,
                    );
                    (result, ambiguous)
                }
                Err(_elapsed) => {
                    let error = GatewayError::Transport(format!(
                        "gateway call to {gateway_name} timed out after {}s; outcome unknown",
                        call_timeout.as_secs()
                    ));
                    let result = GatewayResult::local_failure(&error, merchant_account_id);
                    (result, true)
                }
            };
            audit.emit(&attempt.finish(&result, ambiguous));
            result
        });

        match task.await {
            Ok(result) => result,
            Err(join_error) => {
                let (attempt, gateway_name, noun) = fallback;
                tracing::error!(
                    error = %join_error,
                    gateway = %gateway_name,
                    "gateway invocation task died"
                );
                let error = GatewayError::Adapter(format!(
                    "Unexpected error encountered processing {gateway_name} {noun} request"
                ));
                self.fail(&attempt, &error, merchant_account_id)
            }
        }
    }
}

/// Caller-facing summary used when the processor message is absent.
fn completion_detail(result: &GatewayResult, operation: &Operation, gateway_name: &str) -> String {
    let approved = result.gateway_http_status_code == Some(200);
    match operation {
        Operation::Payment(_) if approved => "Transaction approved".into(),
        Operation::Payment(_) => format!(
            "Error encountered during payment attempt to {gateway_name} payment processing endpoint"
        ),
        Operation::Refund(_) if approved => "Refund successfully processed".into(),
        Operation::Refund(_) => {
            // Payload reports a missing payment transaction id as a plain 404.
            if gateway_name == "Payload" && result.gateway_http_status_code == Some(404) {
                "The provided payment transaction id does not exist".into()
            } else {
                format!(
                    "Error encountered during refund request to {gateway_name} refund processing endpoint"
                )
            }
        }
    }
}

/// Canonicalizes an adapter error. Unhandled defects are logged with their
/// internals and surfaced to the caller with a generic message only.
fn failure_result(
    error: &GatewayError,
    noun: &'static str,
    gateway_name: &str,
    merchant_account_id: i64,
) -> GatewayResult {
    match error.kind() {
        ErrorKind::Unhandled => {
            tracing::error!(error = %error, gateway = %gateway_name, "adapter failure");
            GatewayResult::failure(
                ErrorKind::Unhandled,
                format!("Unexpected error encountered processing {gateway_name} {noun} request"),
                merchant_account_id,
            )
        }
        _ => GatewayResult::local_failure(error, merchant_account_id),
    }
}

/// Everything about one transaction attempt that the audit record needs,
/// captured up front with card data already masked. Cloneable so the
/// invocation task can own one copy and the panic path another.
#[derive(Clone)]
struct Attempt {
    ctx: Option<TransactionContext>,
    request_uri: &'static str,
    request_kind: &'static str,
    data: Map<String, Value>,
}

impl Attempt {
    fn payment(ctx: Option<&TransactionContext>, raw: &RawPaymentRequest) -> Self {
        let mut data = Map::new();
        data.insert("gatewayTypeId".into(), json!(raw.gateway_type_id));
        data.insert("gatewayTypeName".into(), json!(raw.gateway_type_name));
        data.insert("merchantAccountId".into(), json!(raw.merchant_account_id));
        data.insert("userId".into(), json!(raw.user_id));
        data.insert("maskedCardNumber".into(), json!(mask_account(&raw.account)));
        data.insert("amount".into(), json!(raw.amount));
        data.insert("currencyType".into(), json!(raw.currency_type));
        if let Some(comment) = &raw.comment {
            data.insert("comment".into(), json!(comment));
        }
        if let Some(user_name) = &raw.user_name {
            data.insert("userName".into(), json!(user_name));
        }
        Self {
            ctx: ctx.cloned(),
            request_uri: PAYMENT_URI,
            request_kind: "payment",
            data,
        }
    }

    fn refund(ctx: Option<&TransactionContext>, raw: &RawRefundRequest) -> Self {
        let mut data = Map::new();
        data.insert("gatewayTypeId".into(), json!(raw.gateway_type_id));
        data.insert("gatewayTypeName".into(), json!(raw.gateway_type_name));
        data.insert("merchantAccountId".into(), json!(raw.merchant_account_id));
        data.insert("userId".into(), json!(raw.user_id));
        data.insert(
            "paymentTransactionId".into(),
            json!(raw.payment_transaction_id),
        );
        if let Some(amount) = raw.amount {
            data.insert("amount".into(), json!(amount));
        }
        if let Some(masked) = &raw.masked_card_number {
            data.insert("maskedCardNumber".into(), json!(masked));
        }
        if let Some(currency_type) = raw.currency_type {
            data.insert("currencyType".into(), json!(currency_type));
        }
        if let Some(comment) = &raw.comment {
            data.insert("comment".into(), json!(comment));
        }
        Self {
            ctx: ctx.cloned(),
            request_uri: REFUND_URI,
            request_kind: "refund",
            data,
        }
    }

    /// Builds the single audit record for this attempt. AUDIT only when the
    /// gateway answered 200; every other outcome is an ERROR-level record.
    fn finish(&self, result: &GatewayResult, ambiguous: bool) -> AuditRecord {
        let mut data = self.data.clone();
        if let Some(detail) = &result.response_detail {
            data.insert("status".into(), json!(detail));
        }
        data.insert("httpResponseCode".into(), json!(result.http_status()));
        // For refunds the key already holds the caller's reference; the
        // gateway-assigned id is still visible inside responseDetail.
        if let Some(id) = &result.payment_transaction_id {
            data.entry("paymentTransactionId".to_string())
                .or_insert(json!(id));
        }
        data.insert(
            "responseDetail".into(),
            serde_json::to_value(result).unwrap_or(Value::Null),
        );
        if let Some(raw) = &result.gateway_response_data {
            data.insert("gatewayResponseData".into(), raw.clone());
        }
        if ambiguous {
            data.insert("ambiguous".into(), json!(true));
        }
        let level = if result.gateway_http_status_code == Some(200) {
            AuditLevel::Audit
        } else {
            AuditLevel::Error
        };
        AuditRecord::new(
            level,
            self.ctx.as_ref(),
            self.request_uri,
            self.request_kind,
            Value::Object(data),
        )
    }
}
