use rust_decimal::Decimal;
use serde::Deserialize;
use std::fmt;

/// Synchronous answer to a collection request.
///
/// A non-empty `error_code` means the gateway refused the collection. Authentication
/// failures carry no code, only a `detail`.
#[derive(Debug, Deserialize, PartialEq, Clone, Default)]
#[serde(default)]
pub struct CollectResponse {
    pub reference: Option<String>,
    pub ussd_code: Option<String>,
    pub operator: Option<String>,
    pub message: Option<String>,
    pub error_code: Option<String>,
    pub detail: Option<String>,
    /// HTTP status the response arrived with, when it came over HTTP.
    #[serde(skip)]
    pub http_status: Option<u16>,
}

#[derive(Debug, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
#[serde(from = "Option<String>")]
pub enum TransactionStatus {
    Pending,
    Successful,
    Failed,
    #[default]
    Unknown,
}

impl From<Option<String>> for TransactionStatus {
    fn from(raw: Option<String>) -> Self {
        match raw.as_deref().map(str::trim) {
            Some(s) if s.eq_ignore_ascii_case("PENDING") => Self::Pending,
            Some(s) if s.eq_ignore_ascii_case("SUCCESSFUL") => Self::Successful,
            Some(s) if s.eq_ignore_ascii_case("FAILED") => Self::Failed,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Pending => "PENDING",
            Self::Successful => "SUCCESSFUL",
            Self::Failed => "FAILED",
            Self::Unknown => "UNKNOWN",
        };
        f.write_str(label)
    }
}

/// One status query result. Every query yields a fresh snapshot.
#[derive(Debug, Deserialize, PartialEq, Clone, Default)]
#[serde(default)]
pub struct TransactionSnapshot {
    pub reference: Option<String>,
    pub external_reference: Option<String>,
    pub status: TransactionStatus,
    pub amount: Option<Decimal>,
    pub currency: Option<String>,
    pub operator: Option<String>,
    pub code: Option<String>,
    pub operator_reference: Option<String>,
    pub description: Option<String>,
    /// Only meaningful when `status` is `Failed`.
    pub reason: Option<String>,
    pub phone_number: Option<String>,
    pub endpoint: Option<String>,
}

impl TransactionSnapshot {
    /// Failure reason, or a placeholder when the gateway did not give one.
    pub fn failure_reason(&self) -> String {
        self.reason
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .unwrap_or("no reason given")
            .to_string()
    }
}

impl fmt::Display for TransactionSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let field = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".to_string());
        writeln!(f, "Reference:          {}", field(&self.reference))?;
        writeln!(f, "Status:             {}", self.status)?;
        writeln!(
            f,
            "Amount:             {} {}",
            self.amount
                .map(|a| a.normalize().to_string())
                .unwrap_or_else(|| "-".to_string()),
            field(&self.currency)
        )?;
        writeln!(f, "Operator:           {}", field(&self.operator))?;
        writeln!(f, "Operator reference: {}", field(&self.operator_reference))?;
        writeln!(f, "Phone number:       {}", field(&self.phone_number))?;
        write!(f, "Description:        {}", field(&self.description))
    }
}
