use crate::domain::payment::TransactionReference;
use crate::domain::ports::PaymentGatewayRef;
use crate::domain::transaction::{TransactionSnapshot, TransactionStatus};
use std::future::Future;
use std::time::Duration;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 12;
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PollConfig {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            interval: DEFAULT_INTERVAL,
        }
    }
}

/// Diagnostics gathered over one polling run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PollReport {
    /// Status queries issued.
    pub attempts: u32,
    pub pending: u32,
    /// Rounds whose status was missing or not one the gateway documents.
    pub unrecognized: u32,
    /// Rounds lost to transport or parse errors.
    pub transient_errors: u32,
    pub last_snapshot: Option<TransactionSnapshot>,
}

/// How a polling run ended.
///
/// `Failed` and `TimedOut` are distinct: the first is the gateway saying no, the second
/// is the gateway never saying anything final within the attempt budget.
#[derive(Debug, Clone, PartialEq)]
pub enum TerminalOutcome {
    Successful {
        snapshot: TransactionSnapshot,
        report: PollReport,
    },
    Failed {
        reason: String,
        snapshot: TransactionSnapshot,
        report: PollReport,
    },
    TimedOut {
        report: PollReport,
    },
}

impl TerminalOutcome {
    pub fn report(&self) -> &PollReport {
        match self {
            Self::Successful { report, .. }
            | Self::Failed { report, .. }
            | Self::TimedOut { report } => report,
        }
    }
}

/// Returned by [`StatusPoller::poll_until`] when the shutdown future fires first.
#[derive(Debug, Clone, PartialEq)]
pub struct PollInterrupted {
    pub report: PollReport,
}

/// State of the poll loop between rounds.
#[derive(Debug)]
enum PollState {
    Pending,
    Successful(TransactionSnapshot),
    Failed(TransactionSnapshot),
}

/// Queries the status endpoint at a fixed interval until the transaction resolves.
pub struct StatusPoller {
    gateway: PaymentGatewayRef,
    config: PollConfig,
}

impl StatusPoller {
    pub fn new(gateway: PaymentGatewayRef, config: PollConfig) -> Self {
        Self { gateway, config }
    }

    /// Polls until SUCCESSFUL, FAILED or the attempt budget runs out.
    pub async fn poll(&self, reference: &TransactionReference) -> TerminalOutcome {
        let mut report = PollReport::default();
        self.run(reference, &mut report).await
    }

    /// Same as [`poll`](Self::poll), but gives up as soon as `shutdown` completes.
    ///
    /// The round sequencing is unchanged; `shutdown` is only observed while a query or
    /// a sleep is in flight.
    pub async fn poll_until<F>(
        &self,
        reference: &TransactionReference,
        shutdown: F,
    ) -> Result<TerminalOutcome, PollInterrupted>
    where
        F: Future<Output = ()>,
    {
        let mut report = PollReport::default();
        let outcome = tokio::select! {
            outcome = self.run(reference, &mut report) => Some(outcome),
            _ = shutdown => None,
        };
        match outcome {
            Some(outcome) => Ok(outcome),
            None => {
                log::warn!("Polling of {reference} interrupted");
                Err(PollInterrupted { report })
            }
        }
    }

    async fn run(
        &self,
        reference: &TransactionReference,
        report: &mut PollReport,
    ) -> TerminalOutcome {
        for attempt in 0..self.config.max_attempts {
            // No delay before the first query.
            if attempt > 0 {
                tokio::time::sleep(self.config.interval).await;
            }

            report.attempts += 1;
            match self.round(reference, attempt, report).await {
                PollState::Pending => continue,
                PollState::Successful(snapshot) => {
                    log::info!("Transaction {reference} successful");
                    return TerminalOutcome::Successful {
                        snapshot,
                        report: report.clone(),
                    };
                }
                PollState::Failed(snapshot) => {
                    let reason = snapshot.failure_reason();
                    log::info!("Transaction {reference} failed: {reason}");
                    return TerminalOutcome::Failed {
                        reason,
                        snapshot,
                        report: report.clone(),
                    };
                }
            }
        }

        log::warn!(
            "Transaction {reference} still unresolved after {} attempts",
            report.attempts
        );
        TerminalOutcome::TimedOut {
            report: report.clone(),
        }
    }

    async fn round(
        &self,
        reference: &TransactionReference,
        attempt: u32,
        report: &mut PollReport,
    ) -> PollState {
        let snapshot = match self.gateway.transaction_status(reference).await {
            Ok(snapshot) => snapshot,
            Err(err) => {
                log::warn!(
                    "Status query {}/{} for {reference} failed: {err}",
                    attempt + 1,
                    self.config.max_attempts
                );
                report.transient_errors += 1;
                return PollState::Pending;
            }
        };

        log::debug!(
            "Status query {}/{} for {reference}: {}",
            attempt + 1,
            self.config.max_attempts,
            snapshot.status
        );
        report.last_snapshot = Some(snapshot.clone());

        match snapshot.status {
            TransactionStatus::Successful => PollState::Successful(snapshot),
            TransactionStatus::Failed => PollState::Failed(snapshot),
            TransactionStatus::Pending => {
                report.pending += 1;
                PollState::Pending
            }
            TransactionStatus::Unknown => {
                log::warn!("Unrecognized status for {reference}, treating as pending");
                report.unrecognized += 1;
                PollState::Pending
            }
        }
    }
}
