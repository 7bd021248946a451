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

const GATEWAY_NAME: &str = "CardConnect";
const PROD_HOSTNAME: &str = "fts.cardconnect.com";

// respstat: A approved, B retry, C declined. B and C are both declines here.
const RESPSTAT_APPROVED: &str = "A";
const RESPSTAT_RETRY: &str = "B";

// authcode on a void response: REVERS means the void went through.
const AUTHCODE_REVERSED: &str = "REVERS";
const AUTHCODE_NULL: &str = "NULL";

/// CardConnect (CardPointe) integration. Payments are a single
/// capture-on-auth call; a refund inquires on the original transaction
/// first, voids it while it is still voidable and refunds it once settled.
pub struct CardConnectGateway {
    client: reqwest::Client,
    auth_url: String,
    inquire_url: String,
    void_url: String,
    refund_url: String,
}

impl CardConnectGateway {
    /// `hostname` overrides the production host, for UAT environments.
    pub fn new(client: reqwest::Client, hostname: Option<&str>) -> Self {
        let host = hostname.filter(|h| !h.is_empty()).unwrap_or(PROD_HOSTNAME);
        Self {
            client,
            auth_url: format!("https://{host}/cardconnect/rest/auth"),
            inquire_url: format!("https://{host}/cardconnect/rest/inquire"),
            void_url: format!("https://{host}/cardconnect/rest/void"),
            refund_url: format!("https://{host}/cardconnect/rest/refund"),
        }
    }
}

// merchantId here is CardConnect's own merchant keyword, not the platform's
// merchantAccountId.
struct CardConnectCredentials {
    username: String,
    password: String,
    merchant_id: String,
}

impl CardConnectCredentials {
    fn read(credentials: &Credentials) -> Result<Self, GatewayError> {
        Ok(Self {
            username: credentials.get("username")?.to_string(),
            password: credentials.get("password")?.to_string(),
            merchant_id: credentials.get("merchantId")?.to_string(),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
struct CardConnectResponse {
    respstat: Option<String>,
    resptext: Option<String>,
    retref: Option<String>,
    authcode: Option<String>,
    voidable: Option<String>,
    refundable: Option<String>,
}

impl CardConnectResponse {
    fn approved(&self) -> bool {
        self.respstat.as_deref() == Some(RESPSTAT_APPROVED)
    }

    fn retry(&self) -> bool {
        self.respstat.as_deref() == Some(RESPSTAT_RETRY)
    }

    fn voidable(&self) -> bool {
        self.voidable.as_deref() == Some("Y")
    }

    fn refundable(&self) -> bool {
        self.refundable.as_deref() == Some("Y")
    }

    fn append_resptext(&self, message: String) -> String {
        match &self.resptext {
            Some(text) => format!("{message} {text}"),
            None => message,
        }
    }
}

fn parse_response(raw: &Value) -> Result<CardConnectResponse, GatewayError> {
    serde_json::from_value(raw.clone()).map_err(|e| {
        GatewayError::Adapter(format!("CardConnect returned an unexpected response shape: {e}"))
    })
}

fn completed(
    success: bool,
    http_status: u16,
    message: String,
    transaction_id: Option<String>,
    data: Value,
) -> GatewayResult {
    GatewayResult::completed(
        success,
        http_status,
        Some(http_status.to_string()),
        Some(message),
        transaction_id,
        Some(data),
    )
}

impl CardConnectGateway {
    async fn payment(
        &self,
        credentials: &Credentials,
        payment: &PaymentRequest,
    ) -> Result<GatewayResult, GatewayError> {
        let creds = CardConnectCredentials::read(credentials)?;
        // Capture-on-auth: "capture": "Y" settles the transaction in one
        // call. ecomind "E" marks an e-commerce card-not-present origin.
        let mut body = json!({
            "merchid": creds.merchant_id,
            "account": payment.card.as_str(),
            "expiry": payment.exp_date.as_mmyy(),
            "amount": payment.amount.value(),
            "capture": "Y",
            "cvv2": payment.cvv2.as_str(),
            "currency": payment.currency.alpha(),
            "ecomind": "E",
        });
        if let Some(zip) = payment.billing.zip.as_deref().filter(|z| !z.is_empty()) {
            body["postal"] = json!(zip);
        }
        if let Some(name) = payment.billing.name.as_deref().filter(|n| !n.is_empty()) {
            body["name"] = json!(name);
        }
        // The auth endpoint has no comment field; the Description userfield
        // is the only place a free-text note survives.
        body["userfields"] = json!([
            { "Description": payment.comment.clone().unwrap_or_default() }
        ]);

        let response = self
            .client
            .post(&self.auth_url)
            .basic_auth(&creds.username, Some(&creds.password))
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

        match http_status {
            200 => {
                let parsed = parse_response(&raw)?;
                if parsed.approved() {
                    Ok(completed(
                        true,
                        200,
                        "Success.".into(),
                        parsed.retref,
                        raw,
                    ))
                } else {
                    let base = if parsed.retry() {
                        "Please retry the request."
                    } else {
                        "Authorization failed."
                    };
                    let message = match &parsed.resptext {
                        Some(text) => format!("{base} {text}."),
                        None => base.to_string(),
                    };
                    Ok(completed(false, 400, message, parsed.retref, raw))
                }
            }
            401 => Ok(completed(
                false,
                401,
                "There was an authorization error with your request.".into(),
                None,
                raw,
            )),
            other => Ok(completed(
                false,
                other,
                "There was a network error with your request.".into(),
                None,
                raw,
            )),
        }
    }

    async fn refund(
        &self,
        credentials: &Credentials,
        refund: &RefundRequest,
    ) -> Result<GatewayResult, GatewayError> {
        let creds = CardConnectCredentials::read(credentials)?;
        let retref = refund.payment_transaction_id.as_str();

        let inquire_url = format!("{}/{}/{}", self.inquire_url, retref, creds.merchant_id);
        let response = self
            .client
            .get(&inquire_url)
            .basic_auth(&creds.username, Some(&creds.password))
            .send()
            .await
            .map_err(|e| transport_error(GATEWAY_NAME, e))?;
        let http_status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| transport_error(GATEWAY_NAME, e))?;
        let raw = json_or_string(text);

        if http_status == 401 {
            return Ok(completed(
                false,
                401,
                "There was an authorization error while accessing your previous payment status."
                    .into(),
                None,
                raw,
            ));
        }
        if http_status != 200 {
            return Ok(completed(
                false,
                http_status,
                "Unable to complete request for payment status. Please contact support.".into(),
                Some(retref.to_string()),
                raw,
            ));
        }

        let inquiry = parse_response(&raw)?;
        let responses = vec![raw];

        if !inquiry.approved() {
            // Retry and decline statuses both mean there is nothing to refund.
            return Ok(completed(
                false,
                409,
                "The payment requested was not authorized or does not exist.".into(),
                Some(retref.to_string()),
                Value::Array(responses),
            ));
        }
        if inquiry.voidable() {
            self.void_transaction(&creds, retref, responses).await
        } else if inquiry.refundable() {
            let amount = refund.amount.map(|a| a.value());
            self.refund_transaction(&creds, retref, amount, responses)
                .await
        } else {
            Ok(completed(
                false,
                409,
                "The refund cannot be processed at this time.".into(),
                Some(retref.to_string()),
                Value::Array(responses),
            ))
        }
    }

    async fn void_transaction(
        &self,
        creds: &CardConnectCredentials,
        retref: &str,
        mut responses: Vec<Value>,
    ) -> Result<GatewayResult, GatewayError> {
        // No amount in the body: a void always reverses the full transaction.
        let body = json!({ "retref": retref, "merchid": creds.merchant_id });
        let response = self
            .client
            .post(&self.void_url)
            .basic_auth(&creds.username, Some(&creds.password))
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

        match http_status {
            200 => {
                let parsed = parse_response(&raw)?;
                responses.push(raw);
                let transaction_id = parsed.retref.clone().or_else(|| Some(retref.to_string()));
                let (success, code, message) = if parsed.approved()
                    && parsed.authcode.as_deref() == Some(AUTHCODE_REVERSED)
                {
                    (true, 200, "Successfully voided transaction.".to_string())
                } else if parsed.approved() && parsed.authcode.as_deref() == Some(AUTHCODE_NULL) {
                    let message =
                        parsed.append_resptext("Void transaction was unsuccessful.".to_string());
                    (false, 400, message)
                } else if parsed.approved() && parsed.authcode.is_none() {
                    // The void endpoint gave no verdict either way; without
                    // more signal, treat an approved void as done.
                    (true, 200, "success".to_string())
                } else {
                    let base = if parsed.retry() {
                        "Unable to complete void transaction."
                    } else {
                        "Void transaction was declined."
                    };
                    (false, 409, parsed.append_resptext(base.to_string()))
                };
                Ok(completed(
                    success,
                    code,
                    message,
                    transaction_id,
                    Value::Array(responses),
                ))
            }
            401 => {
                responses.push(raw);
                Ok(completed(
                    false,
                    401,
                    "There was an authorization error while processing a void request.".into(),
                    None,
                    Value::Array(responses),
                ))
            }
            other => {
                responses.push(raw);
                Ok(completed(
                    false,
                    other,
                    "Unable to complete void transaction.".into(),
                    Some(retref.to_string()),
                    Value::Array(responses),
                ))
            }
        }
    }

    async fn refund_transaction(
        &self,
        creds: &CardConnectCredentials,
        retref: &str,
        amount: Option<f64>,
        mut responses: Vec<Value>,
    ) -> Result<GatewayResult, GatewayError> {
        let mut body = json!({ "retref": retref, "merchid": creds.merchant_id });
        // Omitting the amount makes the processor refund the full original.
        if let Some(amount) = amount {
            body["amount"] = json!(amount);
        }
        let response = self
            .client
            .post(&self.refund_url)
            .basic_auth(&creds.username, Some(&creds.password))
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

        match http_status {
            200 => {
                let parsed = parse_response(&raw)?;
                responses.push(raw);
                let transaction_id = parsed.retref.clone().or_else(|| Some(retref.to_string()));
                let (success, code, message) = if parsed.approved() {
                    (true, 200, "Successful refund transaction.".to_string())
                } else {
                    let base = if parsed.retry() {
                        "Please retry the request."
                    } else {
                        "Refund failed."
                    };
                    (false, 400, parsed.append_resptext(base.to_string()))
                };
                Ok(completed(
                    success,
                    code,
                    message,
                    transaction_id,
                    Value::Array(responses),
                ))
            }
            401 => {
                responses.push(raw);
                Ok(completed(
                    false,
                    401,
                    "There was an authorization error while processing the refund request.".into(),
                    None,
                    Value::Array(responses),
                ))
            }
            other => {
                responses.push(raw);
                Ok(completed(
                    false,
                    other,
                    "Unable to complete refund transaction".into(),
                    Some(retref.to_string()),
                    Value::Array(responses),
                ))
            }
        }
    }
}

impl PaymentGateway for CardConnectGateway {
    fn required_credentials(&self) -> &'static [&'static str] {
        &["username", "password", "merchantId"]
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
