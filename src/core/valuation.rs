use crate::core::error::DutyError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Insurance assumed when none is declared: 2% of the FOB value.
pub const DEFAULT_INSURANCE_RATE: Decimal = dec!(0.02);

/// Freight assumed when none is declared, in USD.
pub const DEFAULT_FREIGHT: Decimal = dec!(800);

/// Other charges assumed when none are declared, in USD.
pub const DEFAULT_OTHER_CHARGES: Decimal = Decimal::ZERO;

/// Countries whose vehicles are exempt from gravamen, in normalized form.
const GRAVAMEN_EXEMPT_ORIGINS: [&str; 2] = ["ESTADOS UNIDOS", "UNITED STATES"];

/// Trim and uppercase a country name for comparison.
pub fn normalize_country(country: &str) -> String {
    country.trim().to_uppercase()
}

/// Whether vehicles from `country` pay no gravamen.
pub fn is_gravamen_exempt(country: &str) -> bool {
    let normalized = normalize_country(country);
    GRAVAMEN_EXEMPT_ORIGINS.contains(&normalized.as_str())
}

/// The declared value of one vehicle and the charges added to reach its CIF
/// value, all in USD.
///
/// Insurance, freight and other charges are optional; when unset the
/// documented defaults apply (2% of declared value, 800 and 0).
///
/// # Examples
///
/// ```
/// use duty_estimator::core::valuation::VehicleValuation;
/// use rust_decimal_macros::dec;
///
/// let valuation = VehicleValuation::new(dec!(10000), "Japan");
/// assert_eq!(valuation.insurance(), dec!(200));
/// assert_eq!(valuation.freight(), dec!(800));
/// assert_eq!(valuation.other_charges(), dec!(0));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleValuation {
    /// FOB value.
    declared_value: Decimal,
    country_of_origin: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    insurance: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    freight: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    other_charges: Option<Decimal>,
    /// Replaces the declared value on the "vehicle value" line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    vehicle_value_override: Option<Decimal>,
}

impl VehicleValuation {
    pub fn new(declared_value: Decimal, country_of_origin: impl Into<String>) -> Self {
        Self {
            declared_value,
            country_of_origin: country_of_origin.into(),
            insurance: None,
            freight: None,
            other_charges: None,
            vehicle_value_override: None,
        }
    }

    pub fn with_insurance(mut self, insurance: Decimal) -> Self {
        self.insurance = Some(insurance);
        self
    }

    pub fn with_freight(mut self, freight: Decimal) -> Self {
        self.freight = Some(freight);
        self
    }

    pub fn with_other_charges(mut self, other_charges: Decimal) -> Self {
        self.other_charges = Some(other_charges);
        self
    }

    pub fn with_vehicle_value_override(mut self, value: Decimal) -> Self {
        self.vehicle_value_override = Some(value);
        self
    }

    // --- Accessors ---

    pub fn declared_value(&self) -> Decimal {
        self.declared_value
    }

    pub fn country_of_origin(&self) -> &str {
        &self.country_of_origin
    }

    pub fn insurance(&self) -> Decimal {
        self.insurance
            .unwrap_or(self.declared_value * DEFAULT_INSURANCE_RATE)
    }

    pub fn freight(&self) -> Decimal {
        self.freight.unwrap_or(DEFAULT_FREIGHT)
    }

    pub fn other_charges(&self) -> Decimal {
        self.other_charges.unwrap_or(DEFAULT_OTHER_CHARGES)
    }

    /// Value shown on the "vehicle value" line.
    pub fn vehicle_value(&self) -> Decimal {
        self.vehicle_value_override.unwrap_or(self.declared_value)
    }

    pub fn vehicle_value_override(&self) -> Option<Decimal> {
        self.vehicle_value_override
    }

    pub fn is_gravamen_exempt(&self) -> bool {
        is_gravamen_exempt(&self.country_of_origin)
    }

    /// Reject negative amounts. Checked before any arithmetic.
    pub fn validate(&self) -> Result<(), DutyError> {
        let fields = [
            ("declared_value", Some(self.declared_value)),
            ("insurance", self.insurance),
            ("freight", self.freight),
            ("other_charges", self.other_charges),
            ("vehicle_value_override", self.vehicle_value_override),
        ];
        for (field, value) in fields {
            if let Some(value) = value {
                if value < Decimal::ZERO {
                    return Err(DutyError::invalid_input(field, value, "must not be negative"));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let v = VehicleValuation::new(dec!(15000), "Japan");
        assert_eq!(v.insurance(), dec!(300));
        assert_eq!(v.freight(), DEFAULT_FREIGHT);
        assert_eq!(v.other_charges(), Decimal::ZERO);
        assert_eq!(v.vehicle_value(), dec!(15000));
    }

    #[test]
    fn test_explicit_charges_win() {
        let v = VehicleValuation::new(dec!(15000), "Japan")
            .with_insurance(dec!(100))
            .with_freight(dec!(1200))
            .with_other_charges(dec!(50));
        assert_eq!(v.insurance(), dec!(100));
        assert_eq!(v.freight(), dec!(1200));
        assert_eq!(v.other_charges(), dec!(50));
    }

    #[test]
    fn test_override_replaces_vehicle_value_only() {
        let v = VehicleValuation::new(dec!(15000), "Japan").with_vehicle_value_override(dec!(14000));
        assert_eq!(v.vehicle_value(), dec!(14000));
        assert_eq!(v.declared_value(), dec!(15000));
        assert_eq!(v.insurance(), dec!(300));
    }

    #[test]
    fn test_exemption_is_case_and_space_insensitive() {
        assert!(is_gravamen_exempt("Estados Unidos"));
        assert!(is_gravamen_exempt("  united states "));
        assert!(is_gravamen_exempt("ESTADOS UNIDOS"));
        assert!(!is_gravamen_exempt("Japan"));
        assert!(!is_gravamen_exempt("Estados Unidos Mexicanos"));
    }

    #[test]
    fn test_validate_rejects_negative_declared_value() {
        let err = VehicleValuation::new(dec!(-1), "Japan").validate().unwrap_err();
        assert_eq!(err.field(), "declared_value");
    }

    #[test]
    fn test_validate_rejects_negative_freight() {
        let err = VehicleValuation::new(dec!(1), "Japan")
            .with_freight(dec!(-800))
            .validate()
            .unwrap_err();
        assert!(matches!(err, DutyError::InvalidInput { field: "freight", .. }));
    }

    #[test]
    fn test_validate_rejects_each_negative_charge() {
        let base = || VehicleValuation::new(dec!(10000), "Japan");
        let cases = [
            ("insurance", base().with_insurance(dec!(-200))),
            ("other_charges", base().with_other_charges(dec!(-0.01))),
            ("vehicle_value_override", base().with_vehicle_value_override(dec!(-9000))),
        ];
        for (field, valuation) in cases {
            let err = valuation.validate().unwrap_err();
            assert_eq!(err.field(), field);
            assert!(matches!(err, DutyError::InvalidInput { .. }));
        }
    }

    #[test]
    fn test_validate_accepts_zero_charges() {
        let v = VehicleValuation::new(Decimal::ZERO, "Japan")
            .with_insurance(Decimal::ZERO)
            .with_freight(Decimal::ZERO)
            .with_other_charges(Decimal::ZERO)
            .with_vehicle_value_override(Decimal::ZERO);
        assert!(v.validate().is_ok());
    }

    #[test]
    fn test_deserialize_partial() {
        let v: VehicleValuation =
            serde_json::from_str(r#"{"declared_value": "9000", "country_of_origin": "Korea"}"#)
                .unwrap();
        assert_eq!(v.declared_value(), dec!(9000));
        assert_eq!(v.freight(), dec!(800));
    }
}
