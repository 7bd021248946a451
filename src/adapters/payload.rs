use {
    super::{json_or_string, transport_error},
    crate::domain::{
        error::GatewayError,
        gateway::{GatewayFuture, PaymentGateway},
        identity::Credentials,
        request::{PaymentRequest, RefundRequest},
        result::GatewayResult,
    },
    serde::Deserialize,
    serde_json::{Value, json},
};

const GATEWAY_NAME: &str = "Payload";

// Payload caps transaction descriptions at 128 characters.
const DESCRIPTION_LIMIT: usize = 128;

/// Error types Payload names in its error envelope. Anything else is an
/// unrecognized response shape.
const KNOWN_ERROR_TYPES: &[&str] = &[
    "BadRequest",
    "Unauthorized",
    "Forbidden",
    "NotFound",
    "Conflict",
    "InvalidAttributes",
    "TooManyRequests",
    "InternalServerError",
    "ServiceUnavailable",
];

/// Payload.co integration. Payments are a single transaction create; a
/// refund first fetches the original payment, then voids it when funding is
/// still pending and refunds it once it has batched.
pub struct PayloadGateway {
    client: reqwest::Client,
    transactions_url: String,
}

impl PayloadGateway {
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            transactions_url: format!("{}/transactions", base_url.trim_end_matches('/')),
        }
    }
}

struct PayloadCredentials {
    api_key: String,
    processing_id: String,
}

impl PayloadCredentials {
    fn read(credentials: &Credentials) -> Result<Self, GatewayError> {
        Ok(Self {
            api_key: credentials.get("apiKey")?.to_string(),
            processing_id: credentials.get("processingId")?.to_string(),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
struct PayloadTransaction {
    id: Option<String>,
    status: Option<String>,
    status_code: Option<String>,
    status_message: Option<String>,
    funding_status: Option<String>,
    amount: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct PayloadErrorBody {
    error_type: Option<String>,
    details: Option<Value>,
    transaction: Option<PayloadTransaction>,
}

fn parse_transaction(raw: &Value) -> Result<PayloadTransaction, GatewayError> {
    serde_json::from_value(raw.clone()).map_err(|e| {
        GatewayError::Adapter(format!("Payload returned an unexpected transaction shape: {e}"))
    })
}

fn description(comment: Option<&str>) -> String {
    comment
        .unwrap_or("")
        .chars()
        .take(DESCRIPTION_LIMIT)
        .collect()
}

/// The processor embeds its card-number complaint at a fixed path in the
/// error details; the front end displays that exact string.
fn card_number_detail(details: &Value) -> Option<String> {
    details
        .get("payment_method")?
        .get("card")?
        .get("card_number")?
        .as_str()
        .map(str::to_string)
}

fn unknown_response(raw: Value) -> GatewayResult {
    GatewayResult::completed(
        false,
        422,
        None,
        Some("Unknown Payload response type".into()),
        None,
        Some(raw),
    )
}

fn unrecognized_response(raw: Value) -> GatewayResult {
    GatewayResult::completed(
        false,
        400,
        None,
        Some("Unrecognized Payload error response".into()),
        None,
        Some(raw),
    )
}

fn payment_error(http_status: u16, raw: Value) -> GatewayResult {
    let Ok(body) = serde_json::from_value::<PayloadErrorBody>(raw.clone()) else {
        return unknown_response(raw);
    };
    match body.error_type.as_deref() {
        Some("TransactionDeclined") => {
            let tx = body.transaction.unwrap_or_default();
            GatewayResult::completed(
                false,
                http_status,
                tx.status_code,
                tx.status_message,
                None,
                Some(raw),
            )
        }
        Some(error_type) if KNOWN_ERROR_TYPES.contains(&error_type) => {
            let message = body.details.as_ref().and_then(card_number_detail);
            GatewayResult::completed(false, http_status, None, message, None, Some(raw))
        }
        Some(_) => unrecognized_response(raw),
        None => unknown_response(raw),
    }
}

/// Refund-side errors carry no caller-facing message of their own; the
/// dispatcher supplies the summary (including the missing-transaction text
/// for a 404).
fn refund_error(http_status: u16, raw: Value) -> GatewayResult {
    let Ok(body) = serde_json::from_value::<PayloadErrorBody>(raw.clone()) else {
        return unknown_response(raw);
    };
    match body.error_type.as_deref() {
        Some(error_type) if KNOWN_ERROR_TYPES.contains(&error_type) => {
            GatewayResult::completed(false, http_status, None, None, None, Some(raw))
        }
        Some(_) => unrecognized_response(raw),
        None => unknown_response(raw),
    }
}

impl PayloadGateway {
    async fn payment(
        &self,
        credentials: &Credentials,
        payment: &PaymentRequest,
    ) -> Result<GatewayResult, GatewayError> {
        let creds = PayloadCredentials::read(credentials)?;
        let body = json!({
            "type": "payment",
            "amount": payment.amount.value(),
            "processing_id": creds.processing_id,
            "description": description(payment.comment.as_deref()),
            "payment_method": {
                "type": "card",
                "account_holder": payment.billing.name,
                "card": {
                    "card_number": payment.card.as_str(),
                    "expiry": payment.exp_date.as_mm_slash_yy(),
                    "card_code": payment.cvv2.as_str(),
                },
            },
        });
        let response = self
            .client
            .post(&self.transactions_url)
            .basic_auth(&creds.api_key, None::<&str>)
            .json(&body)
            .send()
            .await
            .map_err(|e| transport_error(GATEWAY_NAME, e))?;
        let http_status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| transport_error(GATEWAY_NAME, e))?;
        let raw = json_or_string(text);

        if (200..300).contains(&http_status) {
            let tx = parse_transaction(&raw)?;
            return Ok(GatewayResult::completed(
                true,
                200,
                tx.status_code.or(tx.status),
                tx.status_message,
                tx.id,
                Some(raw),
            ));
        }
        Ok(payment_error(http_status, raw))
    }

    async fn refund(
        &self,
        credentials: &Credentials,
        refund: &RefundRequest,
    ) -> Result<GatewayResult, GatewayError> {
        let creds = PayloadCredentials::read(credentials)?;
        let description = description(refund.comment.as_deref());
        let lookup_url = format!(
            "{}/{}",
            self.transactions_url, refund.payment_transaction_id
        );

        let response = self
            .client
            .get(&lookup_url)
            .basic_auth(&creds.api_key, None::<&str>)
            .send()
            .await
            .map_err(|e| transport_error(GATEWAY_NAME, e))?;
        let http_status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| transport_error(GATEWAY_NAME, e))?;
        let raw = json_or_string(text);
        if !(200..300).contains(&http_status) {
            return Ok(refund_error(http_status, raw));
        }

        let payment = parse_transaction(&raw)?;
        let responses = vec![raw];

        if payment.status.as_deref() == Some("voided") {
            return Ok(GatewayResult::completed(
                true,
                200,
                payment.status,
                Some(
                    "Payment transaction has already been voided.  No further action has been \
                     taken."
                        .into(),
                ),
                None,
                Some(Value::Array(responses)),
            ));
        }

        match payment.funding_status.as_deref() {
            Some("pending") => {
                // Not settled yet: void the payment instead of refunding it.
                let body = json!({ "status": "voided", "description": description });
                let response = self
                    .client
                    .put(&lookup_url)
                    .basic_auth(&creds.api_key, None::<&str>)
                    .json(&body)
                    .send()
                    .await
                    .map_err(|e| transport_error(GATEWAY_NAME, e))?;
                self.finish_refund(response, responses).await
            }
            Some("batched") => {
                // Settled: issue a refund transaction against the original.
                let amount = refund.amount.map(|a| a.value()).or(payment.amount);
                let body = json!({
                    "type": "refund",
                    "amount": amount,
                    "ledger": [{ "assoc_transaction_id": refund.payment_transaction_id }],
                    "description": description,
                });
                let response = self
                    .client
                    .post(&self.transactions_url)
                    .basic_auth(&creds.api_key, None::<&str>)
                    .json(&body)
                    .send()
                    .await
                    .map_err(|e| transport_error(GATEWAY_NAME, e))?;
                self.finish_refund(response, responses).await
            }
            other => {
                let status = other.unwrap_or("unknown");
                Ok(GatewayResult::completed(
                    false,
                    400,
                    None,
                    Some(format!(
                        "Unknown funding status '{status}' encountered during refund process. \
                         Payment was not refunded."
                    )),
                    None,
                    Some(Value::Array(responses)),
                ))
            }
        }
    }

    async fn finish_refund(
        &self,
        response: reqwest::Response,
        mut responses: Vec<Value>,
    ) -> Result<GatewayResult, GatewayError> {
        let http_status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| transport_error(GATEWAY_NAME, e))?;
        let raw = json_or_string(text);

        if (200..300).contains(&http_status) {
            let tx = parse_transaction(&raw)?;
            responses.push(raw);
            return Ok(GatewayResult::completed(
                true,
                200,
                tx.status,
                tx.status_message,
                tx.id,
                Some(Value::Array(responses)),
            ));
        }

        let mut result = refund_error(http_status, raw);
        if let Some(tail) = result.gateway_response_data.take() {
            responses.push(tail);
        }
        result.gateway_response_data = Some(Value::Array(responses));
        Ok(result)
    }
}

impl PaymentGateway for PayloadGateway {
    fn required_credentials(&self) -> &'static [&'static str] {
        &["apiKey", "processingId"]
    }

    fn process_payment<'a>(
        &'a self,
        credentials: &'a Credentials,
        payment: &'a PaymentRequest,
    ) -> GatewayFuture<'a> {
        Box::pin(async move { self.payment(credentials, payment).await })
    }

    fn process_refund<'a>(
        &'a self,
        credentials: &'a Credentials,
        refund: &'a RefundRequest,
    ) -> GatewayFuture<'a> {
        Box::pin(async move { self.refund(credentials, refund).await })
    }
}
