use crate::error::PaymentError;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Currency every collection is requested in.
pub const CURRENCY: &str = "XAF";

const MIN_PHONE_DIGITS: usize = 8;
const MAX_PHONE_DIGITS: usize = 15;

/// Largest amount accepted, in XAF.
pub const MAX_AMOUNT: u64 = 1_000_000_000_000;

/// Represents a positive, whole number of XAF to collect.
///
/// XAF has no minor units, so fractional amounts are rejected. Serialized as a JSON
/// integer; deserializes from either a number or a string.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Deserialize)]
#[serde(try_from = "Decimal")]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self, PaymentError> {
        if value <= Decimal::ZERO {
            return Err(PaymentError::ValidationError(
                "Invalid amount, must be a positive number".to_string(),
            ));
        }
        if !value.fract().is_zero() {
            return Err(PaymentError::ValidationError(format!(
                "Invalid amount, {CURRENCY} has no minor units so it must be a whole number"
            )));
        }
        if value > Decimal::from(MAX_AMOUNT) {
            return Err(PaymentError::ValidationError(format!(
                "Invalid amount, must not exceed {MAX_AMOUNT} {CURRENCY}"
            )));
        }
        Ok(Self(value.normalize()))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = PaymentError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl FromStr for Amount {
    type Err = PaymentError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let value = Decimal::from_str(input.trim()).map_err(|_| {
            PaymentError::ValidationError(
                "Invalid amount, must be a positive number".to_string(),
            )
        })?;
        Self::new(value)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let units = self
            .0
            .to_u64()
            .ok_or_else(|| serde::ser::Error::custom("amount out of range"))?;
        serializer.serialize_u64(units)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}

/// Payer's mobile number in international form, digits only (e.g. `237670000000`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for PhoneNumber {
    type Err = PaymentError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        let digits: String = trimmed
            .strip_prefix('+')
            .unwrap_or(trimmed)
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();

        if digits.is_empty() {
            return Err(PaymentError::ValidationError(
                "Phone number is required".to_string(),
            ));
        }
        if !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(PaymentError::ValidationError(
                "Phone number must contain digits only".to_string(),
            ));
        }
        if !(MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&digits.len()) {
            return Err(PaymentError::ValidationError(format!(
                "Phone number must have between {MIN_PHONE_DIGITS} and {MAX_PHONE_DIGITS} digits, including the country code"
            )));
        }
        Ok(Self(digits))
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A collection request as submitted to the gateway.
///
/// Built once from validated input and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRequest {
    pub amount: Amount,
    #[serde(rename = "from")]
    pub payer: PhoneNumber,
    pub currency: String,
    pub description: String,
}

impl PaymentRequest {
    pub fn new(
        amount: Amount,
        payer: PhoneNumber,
        description: impl Into<String>,
    ) -> Result<Self, PaymentError> {
        let description = description.into().trim().to_string();
        if description.is_empty() {
            return Err(PaymentError::ValidationError(
                "Description is required".to_string(),
            ));
        }
        Ok(Self {
            amount,
            payer,
            currency: CURRENCY.to_string(),
            description,
        })
    }
}

/// Opaque handle returned by the gateway at initiation, keying every status query.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionReference(String);

impl TransactionReference {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TransactionReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
