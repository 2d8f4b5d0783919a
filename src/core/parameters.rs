use crate::core::currency::ExchangeRate;
use crate::core::error::DutyError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

/// ITBIS (Dominican VAT) rate applied to CIF plus gravamen. Not configurable.
pub const ITBIS_RATE: Decimal = dec!(0.18);

/// First-plate fee rate applied to the CIF value. Not configurable.
pub const PLATE_FEE_RATE: Decimal = dec!(0.17);

/// Rate used until a stored or user-entered rate is available.
pub const LAST_KNOWN_GOOD_RATE: Decimal = dec!(59.54);

/// Tariff brackets offered for gravamen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GravamenBracket {
    Exempt,
    Ten,
    Twenty,
    Thirty,
}

impl GravamenBracket {
    pub const ALL: [GravamenBracket; 4] = [Self::Exempt, Self::Ten, Self::Twenty, Self::Thirty];

    pub fn rate(&self) -> Decimal {
        match self {
            Self::Exempt => Decimal::ZERO,
            Self::Ten => dec!(0.10),
            Self::Twenty => dec!(0.20),
            Self::Thirty => dec!(0.30),
        }
    }
}

impl fmt::Display for GravamenBracket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", (self.rate() * dec!(100)).normalize())
    }
}

/// CO2 emission fee brackets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Co2Bracket {
    Low,
    Medium,
    High,
}

impl Co2Bracket {
    pub const ALL: [Co2Bracket; 3] = [Self::Low, Self::Medium, Self::High];

    pub fn rate(&self) -> Decimal {
        match self {
            Self::Low => dec!(0.01),
            Self::Medium => dec!(0.02),
            Self::High => dec!(0.03),
        }
    }
}

impl fmt::Display for Co2Bracket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", (self.rate() * dec!(100)).normalize())
    }
}

fn default_exchange_rate() -> Decimal {
    LAST_KNOWN_GOOD_RATE
}

fn default_gravamen_rate() -> Decimal {
    GravamenBracket::Twenty.rate()
}

fn default_co2_rate() -> Decimal {
    Co2Bracket::Low.rate()
}

fn default_marbete_fee() -> Decimal {
    dec!(3000)
}

fn default_customs_service_fee() -> Decimal {
    dec!(2500)
}

/// Session-level duty configuration.
///
/// Rates are fractions (0.10 = 10%). Fees are fixed amounts in local
/// currency (DOP). Every field has a default, so a partial JSON document
/// deserializes into a usable parameter set.
///
/// # Examples
///
/// ```
/// use duty_estimator::core::parameters::{DutyParameters, GravamenBracket};
/// use rust_decimal_macros::dec;
///
/// let params = DutyParameters::default()
///     .with_exchange_rate(dec!(60.10))
///     .with_gravamen(GravamenBracket::Ten);
/// assert_eq!(params.gravamen_rate, dec!(0.10));
/// assert!(params.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DutyParameters {
    #[serde(default = "default_exchange_rate")]
    pub exchange_rate: Decimal,
    #[serde(default = "default_gravamen_rate")]
    pub gravamen_rate: Decimal,
    #[serde(default = "default_co2_rate")]
    pub co2_rate: Decimal,
    #[serde(default = "default_marbete_fee")]
    pub marbete_fee: Decimal,
    #[serde(default = "default_customs_service_fee")]
    pub customs_service_fee: Decimal,
    /// Optional line item; `None` leaves it out of the breakdown.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customs_declaration_fee: Option<Decimal>,
}

impl Default for DutyParameters {
    fn default() -> Self {
        Self {
            exchange_rate: default_exchange_rate(),
            gravamen_rate: default_gravamen_rate(),
            co2_rate: default_co2_rate(),
            marbete_fee: default_marbete_fee(),
            customs_service_fee: default_customs_service_fee(),
            customs_declaration_fee: None,
        }
    }
}

impl DutyParameters {
    pub fn with_exchange_rate(mut self, rate: Decimal) -> Self {
        self.exchange_rate = rate;
        self
    }

    pub fn with_gravamen_rate(mut self, rate: Decimal) -> Self {
        self.gravamen_rate = rate;
        self
    }

    pub fn with_gravamen(self, bracket: GravamenBracket) -> Self {
        self.with_gravamen_rate(bracket.rate())
    }

    pub fn with_co2_rate(mut self, rate: Decimal) -> Self {
        self.co2_rate = rate;
        self
    }

    pub fn with_co2(self, bracket: Co2Bracket) -> Self {
        self.with_co2_rate(bracket.rate())
    }

    pub fn with_marbete_fee(mut self, fee: Decimal) -> Self {
        self.marbete_fee = fee;
        self
    }

    pub fn with_customs_service_fee(mut self, fee: Decimal) -> Self {
        self.customs_service_fee = fee;
        self
    }

    pub fn with_customs_declaration_fee(mut self, fee: Decimal) -> Self {
        self.customs_declaration_fee = Some(fee);
        self
    }

    /// The exchange rate, rejected if not strictly positive.
    pub fn rate(&self) -> Result<ExchangeRate, DutyError> {
        ExchangeRate::new(self.exchange_rate)
    }

    /// Checks applied when computing: positive exchange rate, no negative
    /// rate or fee. Rates above 100% pass here.
    pub fn check_computable(&self) -> Result<ExchangeRate, DutyError> {
        let rate = self.rate()?;
        for (field, value) in [("gravamen_rate", self.gravamen_rate), ("co2_rate", self.co2_rate)] {
            if value < Decimal::ZERO {
                return Err(DutyError::invalid_parameter(field, value, "must not be negative"));
            }
        }
        for (field, value) in self.fees() {
            if value < Decimal::ZERO {
                return Err(DutyError::invalid_parameter(field, value, "must not be negative"));
            }
        }
        Ok(rate)
    }

    /// Full validation for the configuration boundary: everything
    /// `check_computable` checks, plus percentage rates within [0, 1].
    pub fn validate(&self) -> Result<(), DutyError> {
        self.check_computable()?;
        for (field, value) in [("gravamen_rate", self.gravamen_rate), ("co2_rate", self.co2_rate)] {
            if value > Decimal::ONE {
                return Err(DutyError::invalid_parameter(
                    field,
                    value,
                    "must be a fraction between 0 and 1",
                ));
            }
        }
        Ok(())
    }

    fn fees(&self) -> [(&'static str, Decimal); 3] {
        [
            ("marbete_fee", self.marbete_fee),
            ("customs_service_fee", self.customs_service_fee),
            (
                "customs_declaration_fee",
                self.customs_declaration_fee.unwrap_or(Decimal::ZERO),
            ),
        ]
    }
}
