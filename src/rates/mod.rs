//! Exchange-rate providers.
//!
//! The calculator takes the rate as a plain value; these providers supply
//! and remember it between sessions. When a provider fails, callers fall
//! back to the last-known-good rate rather than computing with zero.

pub mod store;

use crate::core::currency::ExchangeRate;
use chrono::{DateTime, Utc};
use log::warn;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by exchange-rate providers.
#[derive(Debug, Error)]
pub enum RateError {
    #[error("failed to access rate store: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse rate record: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("no exchange rate has been stored")]
    Unavailable,
}

/// A stored rate and when it was last updated.
///
/// Also reads documents written with the keys `valor` and
/// `fechaActualizacion`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateRecord {
    #[serde(alias = "valor")]
    pub rate: ExchangeRate,
    #[serde(alias = "fechaActualizacion")]
    pub updated_at: DateTime<Utc>,
}

impl RateRecord {
    pub fn new(rate: ExchangeRate, updated_at: DateTime<Utc>) -> Self {
        Self { rate, updated_at }
    }

    pub fn now(rate: ExchangeRate) -> Self {
        Self::new(rate, Utc::now())
    }
}

/// Supplies the current DOP-per-USD rate and accepts updates.
pub trait ExchangeRateProvider {
    fn fetch_exchange_rate(&self) -> Result<RateRecord, RateError>;

    fn persist_exchange_rate(&mut self, rate: ExchangeRate) -> Result<RateRecord, RateError>;
}

/// The provider's rate, or `last_known_good` if it cannot supply one.
pub fn resolve_rate(
    provider: &dyn ExchangeRateProvider,
    last_known_good: ExchangeRate,
) -> ExchangeRate {
    match provider.fetch_exchange_rate() {
        Ok(record) => record.rate,
        Err(e) => {
            warn!(
                "exchange rate unavailable ({}), using last known good {}",
                e, last_known_good
            );
            last_known_good
        }
    }
}
