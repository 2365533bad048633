use crate::domain::payment::{PaymentRequest, TransactionReference};
use crate::domain::ports::PaymentGateway;
use crate::domain::transaction::{CollectResponse, TransactionSnapshot, TransactionStatus};
use crate::error::{PaymentError, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Reference handed out by [`ScriptedGateway::dry_run`].
pub const DRY_RUN_REFERENCE: &str = "dry-run";

/// A gateway that replays scripted responses instead of talking to the network.
///
/// Collect responses are consumed in order; running out is a transport error. Status
/// responses are consumed in order too, after which every query reports `PENDING`.
/// Every call is recorded so tests can assert on what was sent and when.
#[derive(Default)]
pub struct ScriptedGateway {
    collect_script: Mutex<VecDeque<Result<CollectResponse>>>,
    status_script: Mutex<VecDeque<Result<TransactionSnapshot>>>,
    collect_calls: Mutex<Vec<PaymentRequest>>,
    status_calls: Mutex<Vec<(TransactionReference, Instant)>>,
}

impl ScriptedGateway {
    /// Creates a gateway with empty scripts.
    pub fn new() -> Self {
        Self::default()
    }

    /// A gateway that accepts `request`, reports it pending once, then successful.
    ///
    /// Backs `--dry-run`, which exercises the whole flow without credentials.
    pub fn dry_run(request: &PaymentRequest) -> Self {
        let accepted = CollectResponse {
            reference: Some(DRY_RUN_REFERENCE.to_string()),
            ussd_code: Some("*126#".to_string()),
            operator: Some("DRY-RUN".to_string()),
            ..Default::default()
        };
        let pending = TransactionSnapshot {
            reference: Some(DRY_RUN_REFERENCE.to_string()),
            status: TransactionStatus::Pending,
            ..Default::default()
        };
        let successful = TransactionSnapshot {
            status: TransactionStatus::Successful,
            amount: Some(request.amount.value()),
            currency: Some(request.currency.clone()),
            operator: Some("DRY-RUN".to_string()),
            description: Some(request.description.clone()),
            phone_number: Some(request.payer.to_string()),
            ..pending.clone()
        };

        Self {
            collect_script: Mutex::new(VecDeque::from([Ok(accepted)])),
            status_script: Mutex::new(VecDeque::from([Ok(pending), Ok(successful)])),
            ..Self::default()
        }
    }

    pub async fn push_collect(&self, response: Result<CollectResponse>) {
        self.collect_script.lock().await.push_back(response);
    }

    pub async fn push_statuses(
        &self,
        responses: impl IntoIterator<Item = Result<TransactionSnapshot>>,
    ) {
        self.status_script.lock().await.extend(responses);
    }

    /// Requests received by `collect`, in order.
    pub async fn collect_calls(&self) -> Vec<PaymentRequest> {
        self.collect_calls.lock().await.clone()
    }

    /// Instants at which status queries were received.
    pub async fn status_calls(&self) -> Vec<Instant> {
        self.status_calls
            .lock()
            .await
            .iter()
            .map(|(_, at)| *at)
            .collect()
    }

    /// References that status queries were issued for.
    pub async fn status_references(&self) -> Vec<TransactionReference> {
        self.status_calls
            .lock()
            .await
            .iter()
            .map(|(reference, _)| reference.clone())
            .collect()
    }
}

#[async_trait]
impl PaymentGateway for ScriptedGateway {
    async fn collect(&self, request: &PaymentRequest) -> Result<CollectResponse> {
        self.collect_calls.lock().await.push(request.clone());
        self.collect_script
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| {
                Err(PaymentError::TransportError(
                    "no scripted collect response".into(),
                ))
            })
    }

    async fn transaction_status(
        &self,
        reference: &TransactionReference,
    ) -> Result<TransactionSnapshot> {
        self.status_calls
            .lock()
            .await
            .push((reference.clone(), Instant::now()));
        self.status_script
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| {
                Ok(TransactionSnapshot {
                    reference: Some(reference.to_string()),
                    status: TransactionStatus::Pending,
                    ..Default::default()
                })
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_exhausted_collect_script_is_transport_error() {
        let gateway = ScriptedGateway::new();
        let request = PaymentRequest::new(
            "10".parse().unwrap(),
            "237670000000".parse().unwrap(),
            "Test",
        )
        .unwrap();

        let result = gateway.collect(&request).await;
        assert!(matches!(result, Err(PaymentError::TransportError(_))));
        assert_eq!(gateway.collect_calls().await.len(), 1);
    }

    #[tokio::test]
    async fn test_dry_run_settles_successfully() {
        let request = PaymentRequest::new(
            "750".parse().unwrap(),
            "237670000000".parse().unwrap(),
            "Rehearsal",
        )
        .unwrap();
        let gateway = ScriptedGateway::dry_run(&request);
        let reference = TransactionReference::new(DRY_RUN_REFERENCE);

        let accepted = gateway.collect(&request).await.unwrap();
        let first = gateway.transaction_status(&reference).await.unwrap();
        let second = gateway.transaction_status(&reference).await.unwrap();

        assert_eq!(accepted.reference.as_deref(), Some(DRY_RUN_REFERENCE));
        assert_eq!(first.status, TransactionStatus::Pending);
        assert_eq!(second.status, TransactionStatus::Successful);
        assert_eq!(second.amount, Some(request.amount.value()));
        assert_eq!(second.phone_number.as_deref(), Some("237670000000"));
        assert_eq!(gateway.collect_calls().await, vec![request]);
    }

    #[tokio::test]
    async fn test_status_script_then_pending() {
        let gateway = ScriptedGateway::new();
        gateway
            .push_statuses([Ok(TransactionSnapshot {
                status: TransactionStatus::Failed,
                ..Default::default()
            })])
            .await;
        let reference = TransactionReference::new("ref-1");

        let first = gateway.transaction_status(&reference).await.unwrap();
        let second = gateway.transaction_status(&reference).await.unwrap();

        assert_eq!(first.status, TransactionStatus::Failed);
        assert_eq!(second.status, TransactionStatus::Pending);
        assert_eq!(second.reference.as_deref(), Some("ref-1"));
        assert_eq!(gateway.status_references().await.len(), 2);
    }
}
