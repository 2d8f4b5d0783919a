use crate::core::currency::ExchangeRate;
use crate::rates::{ExchangeRateProvider, RateError, RateRecord};
use log::info;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Keeps the rate for the lifetime of the process.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRateStore {
    record: Option<RateRecord>,
}

impl InMemoryRateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(record: RateRecord) -> Self {
        Self {
            record: Some(record),
        }
    }
}

impl ExchangeRateProvider for InMemoryRateStore {
    fn fetch_exchange_rate(&self) -> Result<RateRecord, RateError> {
        self.record.ok_or(RateError::Unavailable)
    }

    fn persist_exchange_rate(&mut self, rate: ExchangeRate) -> Result<RateRecord, RateError> {
        let record = RateRecord::now(rate);
        self.record = Some(record);
        Ok(record)
    }
}

/// Keeps the rate as a single JSON document on disk.
#[derive(Debug, Clone)]
pub struct JsonFileRateStore {
    path: PathBuf,
}

impl JsonFileRateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ExchangeRateProvider for JsonFileRateStore {
    fn fetch_exchange_rate(&self) -> Result<RateRecord, RateError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(RateError::Unavailable),
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_str(&content)?)
    }

    fn persist_exchange_rate(&mut self, rate: ExchangeRate) -> Result<RateRecord, RateError> {
        let record = RateRecord::now(rate);
        let json = serde_json::to_string_pretty(&record)?;
        fs::write(&self.path, json)?;
        info!("exchange rate updated to {} in {}", rate, self.path.display());
        Ok(record)
    }
}
