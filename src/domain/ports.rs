use super::payment::{PaymentRequest, TransactionReference};
use super::transaction::{CollectResponse, TransactionSnapshot};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Outbound port to the payment gateway.
///
/// Implementations must not retry on their own; the caller decides what a failure means.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Submits a collection request and returns the gateway's synchronous answer.
    async fn collect(&self, request: &PaymentRequest) -> Result<CollectResponse>;

    /// Fetches a fresh status snapshot for `reference`.
    async fn transaction_status(
        &self,
        reference: &TransactionReference,
    ) -> Result<TransactionSnapshot>;
}

pub type PaymentGatewayRef = Arc<dyn PaymentGateway>;
