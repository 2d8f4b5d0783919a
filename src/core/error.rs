use rust_decimal::Decimal;
use serde::Serialize;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while validating inputs or computing a duty breakdown.
///
/// The calculator never performs I/O, so there are no transient or
/// retryable failures: every error is a rejected value the caller should
/// surface as a field-level validation message.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DutyError {
    /// A valuation amount (declared value, insurance, freight, other
    /// charges) is negative or not a number.
    #[error("invalid input for {field}: {reason}, got '{value}'")]
    InvalidInput {
        field: &'static str,
        value: String,
        reason: &'static str,
    },
    /// A configuration value (exchange rate, percentage rate, fixed fee)
    /// is outside its allowed range.
    #[error("invalid parameter {field}: {reason}, got {value}")]
    InvalidParameter {
        field: &'static str,
        value: String,
        reason: &'static str,
    },
}

impl DutyError {
    pub fn invalid_input(field: &'static str, value: impl ToString, reason: &'static str) -> Self {
        Self::InvalidInput {
            field,
            value: value.to_string(),
            reason,
        }
    }

    pub fn invalid_parameter(
        field: &'static str,
        value: impl ToString,
        reason: &'static str,
    ) -> Self {
        Self::InvalidParameter {
            field,
            value: value.to_string(),
            reason,
        }
    }

    /// Name of the offending field, for attaching the message to a form input.
    pub fn field(&self) -> &'static str {
        match self {
            Self::InvalidInput { field, .. } | Self::InvalidParameter { field, .. } => field,
        }
    }
}

/// Parse a user-entered valuation amount.
///
/// Accepts plain decimal text only (surrounding whitespace is ignored).
/// Formatted display strings such as `RD$1,200.00` are rejected rather than
/// stripped and re-parsed.
pub fn parse_amount(field: &'static str, text: &str) -> Result<Decimal, DutyError> {
    let amount = Decimal::from_str(text.trim())
        .map_err(|_| DutyError::invalid_input(field, text, "not a number"))?;
    if amount < Decimal::ZERO {
        return Err(DutyError::invalid_input(field, text, "must not be negative"));
    }
    Ok(amount)
}

/// Parse a user-entered configuration value (rate or fee).
pub fn parse_parameter(field: &'static str, text: &str) -> Result<Decimal, DutyError> {
    Decimal::from_str(text.trim())
        .map_err(|_| DutyError::invalid_parameter(field, text, "not a number"))
}
