use {
    super::error::GatewayError,
    super::identity::Credentials,
    super::request::{PaymentRequest, RefundRequest},
    super::result::GatewayResult,
    std::{future::Future, pin::Pin},
};

pub type GatewayFuture<'a> =
    Pin<Box<dyn Future<Output = Result<GatewayResult, GatewayError>> + Send + 'a>>;

/// The two-operation contract every processor integration satisfies. The
/// dispatcher resolves an implementation from the registry and calls at
/// most one of these, once, per inbound request.
///
/// A processor decline is a completed attempt: return `Ok` with
/// `success = false`. Reserve `Err(GatewayError::Transport)` for failures
/// where no usable response arrived, so the dispatcher can flag the outcome
/// as ambiguous.
pub trait PaymentGateway: Send + Sync {
    /// Credential keys that must be present in the request before either
    /// operation is invoked.
    fn required_credentials(&self) -> &'static [&'static str];

    fn process_payment<'a>(
        &'a self,
        credentials: &'a Credentials,
        payment: &'a PaymentRequest,
    ) -> GatewayFuture<'a>;

    /// Mirrors `process_payment`. An absent refund amount means
    /// full-original-amount; the implementation resolves it because only
    /// the processor knows the original transaction.
    fn process_refund<'a>(
        &'a self,
        credentials: &'a Credentials,
        refund: &'a RefundRequest,
    ) -> GatewayFuture<'a>;
}
