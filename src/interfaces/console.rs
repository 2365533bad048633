use crate::domain::payment::{Amount, PaymentRequest, PhoneNumber};
use crate::error::{PaymentError, Result};
use std::io::{BufRead, Write};

pub const PHONE_PROMPT: &str = "Enter your phone number (with country code):";
pub const AMOUNT_PROMPT: &str = "Enter the amount to be debited:";
pub const DESCRIPTION_PROMPT: &str = "Enter a description:";

/// Values already known before prompting, e.g. from command-line flags.
#[derive(Debug, Default, Clone)]
pub struct PaymentInput {
    pub phone: Option<String>,
    pub amount: Option<String>,
    pub description: Option<String>,
}

/// Collects payment details line by line from any `BufRead` source (e.g. Stdin).
///
/// Only missing values are prompted for. Everything is validated before a
/// `PaymentRequest` is handed out, so no network call ever sees bad input.
pub struct Prompter<R: BufRead, W: Write> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Prints `prompt` and returns the next line, trimmed.
    pub fn ask(&mut self, prompt: &str) -> Result<String> {
        writeln!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(PaymentError::ValidationError(format!(
                "no input provided for \"{prompt}\""
            )));
        }
        Ok(line.trim().to_string())
    }

    pub fn payment_request(&mut self, known: PaymentInput) -> Result<PaymentRequest> {
        let phone = self.value_or_ask(known.phone, PHONE_PROMPT)?;
        let amount = self.value_or_ask(known.amount, AMOUNT_PROMPT)?;
        let description = self.value_or_ask(known.description, DESCRIPTION_PROMPT)?;

        let payer: PhoneNumber = phone.parse()?;
        let amount: Amount = amount.parse()?;
        PaymentRequest::new(amount, payer, description)
    }

    fn value_or_ask(&mut self, value: Option<String>, prompt: &str) -> Result<String> {
        match value {
            Some(value) => Ok(value),
            None => self.ask(prompt),
        }
    }
}
