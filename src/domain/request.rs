use {
    super::card::{CardNumber, Cvv, ExpDate},
    super::error::GatewayError,
    super::identity::{Credentials, GatewayIdentity},
    super::money::{Amount, Currency},
    serde::Deserialize,
    std::collections::HashMap,
};

/// Wire shape of a payment submission; field names are owned by the legacy
/// caller. No Debug derive — `account` and `cvv2` are in the clear here.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPaymentRequest {
    pub gateway_type_id: u32,
    pub gateway_type_name: String,
    pub merchant_account_id: i64,
    pub credentials: HashMap<String, String>,
    pub account: String,
    pub exp_date: String,
    pub cvv2: String,
    pub amount: f64,
    pub user_id: i64,
    pub currency_type: u16,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub street: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub zip: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub user_name: Option<String>,
}

impl RawPaymentRequest {
    pub fn identity(&self) -> GatewayIdentity {
        GatewayIdentity {
            gateway_type_id: self.gateway_type_id,
            gateway_type_name: self.gateway_type_name.clone(),
            merchant_account_id: self.merchant_account_id,
            credentials: Credentials::new(self.credentials.clone()),
        }
    }
}

/// Wire shape of a refund submission.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRefundRequest {
    pub gateway_type_id: u32,
    pub gateway_type_name: String,
    pub merchant_account_id: i64,
    pub credentials: HashMap<String, String>,
    pub payment_transaction_id: String,
    pub user_id: i64,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub masked_card_number: Option<String>,
    #[serde(default)]
    pub currency_type: Option<u16>,
}

impl RawRefundRequest {
    pub fn identity(&self) -> GatewayIdentity {
        GatewayIdentity {
            gateway_type_id: self.gateway_type_id,
            gateway_type_name: self.gateway_type_name.clone(),
            merchant_account_id: self.merchant_account_id,
            credentials: Credentials::new(self.credentials.clone()),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct BillingAddress {
    pub name: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub country: Option<String>,
}

/// Processor-agnostic payment, produced only by `normalize`. Holding one
/// means every card field already matched its pattern and the currency is
/// a known code — adapters never re-validate.
#[derive(Debug, Clone)]
pub struct PaymentRequest {
    pub card: CardNumber,
    pub exp_date: ExpDate,
    pub cvv2: Cvv,
    pub amount: Amount,
    pub currency: Currency,
    pub billing: BillingAddress,
    pub comment: Option<String>,
    pub user_name: Option<String>,
}

impl PaymentRequest {
    /// Fails closed: a malformed field here must never reach a processor.
    pub fn normalize(raw: &RawPaymentRequest) -> Result<Self, GatewayError> {
        Ok(Self {
            card: CardNumber::new(raw.account.clone())?,
            exp_date: ExpDate::new(raw.exp_date.clone())?,
            cvv2: Cvv::new(raw.cvv2.clone())?,
            amount: Amount::new(raw.amount)?,
            currency: Currency::from_numeric(raw.currency_type)?,
            billing: BillingAddress {
                name: raw.name.clone(),
                street: raw.street.clone(),
                city: raw.city.clone(),
                state: raw.state.clone(),
                zip: raw.zip.clone(),
                country: raw.country.clone(),
            },
            comment: raw.comment.clone(),
            user_name: raw.user_name.clone(),
        })
    }
}

/// Processor-agnostic refund. An absent amount means full-original-amount;
/// only the adapter can resolve that, since only the processor knows the
/// original.
#[derive(Debug, Clone)]
pub struct RefundRequest {
    pub payment_transaction_id: String,
    pub amount: Option<Amount>,
    pub currency: Option<Currency>,
    pub masked_card_number: Option<String>,
    pub comment: Option<String>,
}

impl RefundRequest {
    pub fn normalize(raw: &RawRefundRequest) -> Result<Self, GatewayError> {
        if raw.payment_transaction_id.trim().is_empty() {
            return Err(GatewayError::Validation(
                "paymentTransactionId must not be empty".into(),
            ));
        }
        Ok(Self {
            payment_transaction_id: raw.payment_transaction_id.clone(),
            amount: raw.amount.map(Amount::new).transpose()?,
            currency: raw.currency_type.map(Currency::from_numeric).transpose()?,
            masked_card_number: raw.masked_card_number.clone(),
            comment: raw.comment.clone(),
        })
    }
}
