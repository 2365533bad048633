use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Error, Debug)]
pub enum PaymentError {
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Transport error: {0}")]
    TransportError(#[source] BoxError),
    #[error("Parse error: {0}")]
    ParseError(#[from] serde_json::Error),
    #[error("Gateway rejected the request: {message} ({code})")]
    GatewayRejected { code: String, message: String },
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<reqwest::Error> for PaymentError {
    fn from(err: reqwest::Error) -> Self {
        Self::TransportError(Box::new(err))
    }
}

pub type Result<T> = std::result::Result<T, PaymentError>;
