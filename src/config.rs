//! Loading and overriding [`DutyParameters`] at the configuration boundary.
//!
//! Everything that enters through here is fully validated, including the
//! [0, 1] range on percentage rates that the calculator itself tolerates.

use crate::core::error::DutyError;
use crate::core::parameters::DutyParameters;
use log::{info, warn};
use rust_decimal::Decimal;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read parameters file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse parameters file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Invalid(#[from] DutyError),
}

/// Values entered for this session, applied on top of file or default
/// parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterOverrides {
    pub exchange_rate: Option<Decimal>,
    pub gravamen_rate: Option<Decimal>,
    pub co2_rate: Option<Decimal>,
    pub marbete_fee: Option<Decimal>,
    pub customs_service_fee: Option<Decimal>,
    pub customs_declaration_fee: Option<Decimal>,
}

impl ParameterOverrides {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply(&self, params: DutyParameters) -> DutyParameters {
        DutyParameters {
            exchange_rate: self.exchange_rate.unwrap_or(params.exchange_rate),
            gravamen_rate: self.gravamen_rate.unwrap_or(params.gravamen_rate),
            co2_rate: self.co2_rate.unwrap_or(params.co2_rate),
            marbete_fee: self.marbete_fee.unwrap_or(params.marbete_fee),
            customs_service_fee: self
                .customs_service_fee
                .unwrap_or(params.customs_service_fee),
            customs_declaration_fee: self
                .customs_declaration_fee
                .or(params.customs_declaration_fee),
        }
    }
}

/// Parse a JSON parameters document. Missing fields take their defaults.
pub fn parse_parameters(json: &str) -> Result<DutyParameters, ConfigError> {
    let params: DutyParameters = serde_json::from_str(json)?;
    params.validate().map_err(|e| {
        warn!("rejected duty parameters: {}", e);
        e
    })?;
    Ok(params)
}

pub fn load_parameters(path: impl AsRef<Path>) -> Result<DutyParameters, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    let params = parse_parameters(&content)?;
    info!("loaded duty parameters from {}", path.display());
    Ok(params)
}

/// Resolve the session parameters: file (or defaults), then overrides, then
/// validation of the result.
pub fn resolve_parameters(
    path: Option<&Path>,
    overrides: &ParameterOverrides,
) -> Result<DutyParameters, ConfigError> {
    let base = match path {
        Some(path) => load_parameters(path)?,
        None => DutyParameters::default(),
    };
    let params = overrides.apply(base);
    params.validate()?;
    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_empty_object_gives_defaults() {
        assert_eq!(parse_parameters("{}").unwrap(), DutyParameters::default());
    }

    #[test]
    fn test_parse_rejects_rate_above_one() {
        let result = parse_parameters(r#"{"co2_rate": "3"}"#);
        assert!(matches!(
            result,
            Err(ConfigError::Invalid(DutyError::InvalidParameter { field: "co2_rate", .. }))
        ));
    }

    #[test]
    fn test_parse_rejects_zero_exchange_rate() {
        assert!(matches!(
            parse_parameters(r#"{"exchange_rate": 0}"#),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_overrides_apply() {
        let overrides = ParameterOverrides {
            exchange_rate: Some(dec!(62)),
            customs_declaration_fee: Some(dec!(500)),
            ..Default::default()
        };
        let params = overrides.apply(DutyParameters::default());
        assert_eq!(params.exchange_rate, dec!(62));
        assert_eq!(params.customs_declaration_fee, Some(dec!(500)));
        assert_eq!(params.gravamen_rate, DutyParameters::default().gravamen_rate);
    }

    #[test]
    fn test_resolve_validates_overrides() {
        let overrides = ParameterOverrides {
            gravamen_rate: Some(dec!(20)),
            ..Default::default()
        };
        assert!(resolve_parameters(None, &overrides).is_err());
        assert!(ParameterOverrides::default().is_empty());
    }

    #[test]
    fn test_load_missing_file() {
        let path = std::env::temp_dir().join("duty-estimator-no-such-params.json");
        assert!(matches!(load_parameters(path), Err(ConfigError::Io(_))));
    }
}
