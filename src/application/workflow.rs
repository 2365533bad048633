use super::initiator::{Initiation, PaymentInitiator};
use super::poller::{PollConfig, PollInterrupted, StatusPoller, TerminalOutcome};
use crate::domain::payment::PaymentRequest;
use crate::domain::ports::PaymentGatewayRef;
use crate::error::Result;
use std::future::Future;

/// How polling ended: a terminal outcome, or interrupted before reaching one.
pub type PollResult = std::result::Result<TerminalOutcome, PollInterrupted>;

/// Initiates a collection and follows it to a terminal state.
///
/// Both stages share one gateway handle. Any initiation error aborts before the first
/// status query.
pub struct CollectionWorkflow {
    initiator: PaymentInitiator,
    poller: StatusPoller,
}

impl CollectionWorkflow {
    pub fn new(gateway: PaymentGatewayRef, poll_config: PollConfig) -> Self {
        Self {
            initiator: PaymentInitiator::new(gateway.clone()),
            poller: StatusPoller::new(gateway, poll_config),
        }
    }

    /// Runs both stages back to back, polling until an outcome or until `shutdown`
    /// resolves.
    ///
    /// `on_accepted` is called once the gateway accepted the collection and before the
    /// first status query.
    pub async fn run_until<F, A>(
        &self,
        request: &PaymentRequest,
        shutdown: F,
        on_accepted: A,
    ) -> Result<(Initiation, PollResult)>
    where
        F: Future<Output = ()>,
        A: FnOnce(&Initiation),
    {
        let initiation = self.initiator.initiate(request).await?;
        on_accepted(&initiation);
        let outcome = self.poller.poll_until(&initiation.reference, shutdown).await;
        Ok((initiation, outcome))
    }
}
