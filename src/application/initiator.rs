use crate::domain::payment::{PaymentRequest, TransactionReference};
use crate::domain::ports::PaymentGatewayRef;
use crate::domain::transaction::CollectResponse;
use crate::error::{PaymentError, Result};

/// Submits a collection request exactly once and turns the answer into a reference.
pub struct PaymentInitiator {
    gateway: PaymentGatewayRef,
}

/// What the payer needs to know after a collection was accepted.
#[derive(Debug, Clone, PartialEq)]
pub struct Initiation {
    pub reference: TransactionReference,
    pub ussd_code: Option<String>,
    pub operator: Option<String>,
}

impl PaymentInitiator {
    pub fn new(gateway: PaymentGatewayRef) -> Self {
        Self { gateway }
    }

    /// Sends `request` to the gateway.
    ///
    /// Nothing is retried. A body that cannot be understood is reported as a transport
    /// failure, like a lost connection. A response carrying an error code, or one without
    /// a reference, is a `GatewayRejected`.
    pub async fn initiate(&self, request: &PaymentRequest) -> Result<Initiation> {
        log::info!(
            "Submitting collection of {} {} from {}",
            request.amount,
            request.currency,
            request.payer
        );
        let response = self.gateway.collect(request).await.map_err(|err| match err {
            PaymentError::ParseError(e) => PaymentError::TransportError(Box::new(e)),
            other => other,
        })?;
        Self::accept(response)
    }

    fn accept(response: CollectResponse) -> Result<Initiation> {
        let CollectResponse {
            reference,
            ussd_code,
            operator,
            message,
            error_code,
            detail,
            http_status,
        } = response;

        if let Some(code) = error_code.filter(|c| !c.trim().is_empty()) {
            return Err(PaymentError::GatewayRejected {
                code,
                message: message.unwrap_or_default(),
            });
        }

        let Some(reference) = reference.filter(|r| !r.trim().is_empty()) else {
            let code = match http_status {
                Some(status) if !(200..300).contains(&status) => format!("HTTP {status}"),
                _ => String::new(),
            };
            let message = [message, detail]
                .into_iter()
                .flatten()
                .find(|m| !m.trim().is_empty())
                .unwrap_or_else(|| "no transaction reference returned".to_string());
            return Err(PaymentError::GatewayRejected { code, message });
        };

        log::info!("Collection accepted with reference {reference}");
        Ok(Initiation {
            reference: TransactionReference::new(reference),
            ussd_code,
            operator,
        })
    }
}
