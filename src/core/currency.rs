use crate::core::error::DutyError;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::Add;

/// ISO 4217-style currency code.
///
/// Only two currencies take part in a duty estimate: the US dollar, in which
/// vehicles are declared, and the Dominican peso, in which duties are paid.
///
/// # Examples
///
/// ```
/// use duty_estimator::core::currency::CurrencyCode;
///
/// assert_eq!(CurrencyCode::usd().as_str(), "USD");
/// assert_ne!(CurrencyCode::usd(), CurrencyCode::dop());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn usd() -> Self {
        Self::new("USD")
    }

    pub fn dop() -> Self {
        Self::new("DOP")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Display prefix, e.g. `RD$` for pesos.
    pub fn symbol(&self) -> &str {
        match self.as_str() {
            "USD" => "US$",
            "DOP" => "RD$",
            other => other,
        }
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CurrencyCode {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Local-currency units (DOP) per one US dollar.
///
/// Always strictly positive: a zero or negative rate cannot be constructed,
/// so conversion never divides by zero.
///
/// # Examples
///
/// ```
/// use duty_estimator::core::currency::ExchangeRate;
/// use rust_decimal_macros::dec;
///
/// assert!(ExchangeRate::new(dec!(59.54)).is_ok());
/// assert!(ExchangeRate::new(dec!(0)).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct ExchangeRate(Decimal);

impl ExchangeRate {
    pub fn new(rate: Decimal) -> Result<Self, DutyError> {
        if rate <= Decimal::ZERO {
            return Err(DutyError::invalid_parameter(
                "exchange_rate",
                rate,
                "must be positive",
            ));
        }
        Ok(Self(rate))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for ExchangeRate {
    type Error = DutyError;

    fn try_from(rate: Decimal) -> Result<Self, Self::Error> {
        Self::new(rate)
    }
}

impl From<ExchangeRate> for Decimal {
    fn from(rate: ExchangeRate) -> Self {
        rate.0
    }
}

impl fmt::Display for ExchangeRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} DOP/USD", self.0)
    }
}

/// Converts between US dollars and Dominican pesos at a fixed rate.
///
/// Conversions are checked: a result that does not fit in a [`Decimal`]
/// is reported as an out-of-range exchange rate instead of panicking.
///
/// # Examples
///
/// ```
/// use duty_estimator::core::currency::{CurrencyConverter, ExchangeRate};
/// use rust_decimal_macros::dec;
///
/// let converter = CurrencyConverter::new(ExchangeRate::new(dec!(60)).unwrap());
/// assert_eq!(converter.to_local(dec!(100)).unwrap(), dec!(6000));
/// assert_eq!(converter.to_usd(dec!(6000)).unwrap(), dec!(100));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrencyConverter {
    rate: ExchangeRate,
}

impl CurrencyConverter {
    pub fn new(rate: ExchangeRate) -> Self {
        Self { rate }
    }

    pub fn rate(&self) -> ExchangeRate {
        self.rate
    }

    /// USD amount expressed in local currency.
    pub fn to_local(&self, usd: Decimal) -> Result<Decimal, DutyError> {
        usd.checked_mul(self.rate.value())
            .ok_or_else(|| self.out_of_range())
    }

    /// Local-currency amount expressed in USD.
    pub fn to_usd(&self, local: Decimal) -> Result<Decimal, DutyError> {
        local
            .checked_div(self.rate.value())
            .ok_or_else(|| self.out_of_range())
    }

    /// An amount declared in USD, paired with its local equivalent.
    pub fn from_usd(&self, usd: Decimal) -> Result<Amount, DutyError> {
        Ok(Amount {
            usd,
            local: self.to_local(usd)?,
        })
    }

    /// An amount fixed in local currency, paired with its USD equivalent.
    pub fn from_local(&self, local: Decimal) -> Result<Amount, DutyError> {
        Ok(Amount {
            usd: self.to_usd(local)?,
            local,
        })
    }

    fn out_of_range(&self) -> DutyError {
        DutyError::invalid_parameter("exchange_rate", self.rate.value(), "amount out of range")
    }
}

/// `usd * rate`.
pub fn to_local(usd: Decimal, rate: ExchangeRate) -> Result<Decimal, DutyError> {
    CurrencyConverter::new(rate).to_local(usd)
}

/// `local / rate`.
pub fn to_usd(local: Decimal, rate: ExchangeRate) -> Result<Decimal, DutyError> {
    CurrencyConverter::new(rate).to_usd(local)
}

/// A monetary amount expressed in both currencies.
///
/// Values keep full precision; rounding happens only when formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Amount {
    pub usd: Decimal,
    pub local: Decimal,
}

impl Amount {
    pub const ZERO: Amount = Amount {
        usd: Decimal::ZERO,
        local: Decimal::ZERO,
    };

    /// Component-wise sum, `None` if either side overflows.
    pub fn checked_add(self, rhs: Amount) -> Option<Amount> {
        Some(Amount {
            usd: self.usd.checked_add(rhs.usd)?,
            local: self.local.checked_add(rhs.local)?,
        })
    }

    pub fn is_non_negative(&self) -> bool {
        self.usd >= Decimal::ZERO && self.local >= Decimal::ZERO
    }

    /// Both sides rounded to cents.
    pub fn rounded(&self) -> Amount {
        Amount {
            usd: round_cents(self.usd),
            local: round_cents(self.local),
        }
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Amount) -> Amount {
        Amount {
            usd: self.usd + rhs.usd,
            local: self.local + rhs.local,
        }
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, Add::add)
    }
}

/// Round to two decimals, halves away from zero.
pub fn round_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Format a peso amount for display, e.g. `RD$1,234.57`.
pub fn format_local(value: Decimal) -> String {
    format_amount(&CurrencyCode::dop(), value)
}

/// Format a dollar amount for display, e.g. `US$1,234.57`.
pub fn format_usd(value: Decimal) -> String {
    format_amount(&CurrencyCode::usd(), value)
}

/// Format `value` with the currency's symbol, thousands separators and
/// two decimals.
pub fn format_amount(currency: &CurrencyCode, value: Decimal) -> String {
    let rounded = round_cents(value);
    let text = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if rounded < Decimal::ZERO { "-" } else { "" };
    format!("{}{}{}.{}", sign, currency.symbol(), grouped, frac_part)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn rate(value: Decimal) -> ExchangeRate {
        ExchangeRate::new(value).unwrap()
    }

    #[test]
    fn test_currency_code_equality() {
        assert_eq!(CurrencyCode::new("USD"), CurrencyCode::usd());
        assert_eq!(format!("{}", CurrencyCode::dop()), "DOP");
    }

    #[test]
    fn test_format_amount_other_currency() {
        assert_eq!(format_amount(&CurrencyCode::new("EUR"), dec!(1000)), "EUR1,000.00");
    }

    #[test]
    fn test_exchange_rate_rejects_zero_and_negative() {
        assert!(matches!(
            ExchangeRate::new(Decimal::ZERO),
            Err(DutyError::InvalidParameter { field: "exchange_rate", .. })
        ));
        assert!(ExchangeRate::new(dec!(-59.54)).is_err());
    }

    #[test]
    fn test_exchange_rate_deserialize_validates() {
        let ok: ExchangeRate = serde_json::from_str("\"59.54\"").unwrap();
        assert_eq!(ok.value(), dec!(59.54));
        assert!(serde_json::from_str::<ExchangeRate>("\"0\"").is_err());
    }

    #[test]
    fn test_convert_both_directions() {
        let converter = CurrencyConverter::new(rate(dec!(59.54)));
        assert_eq!(converter.to_local(dec!(100)).unwrap(), dec!(5954));
        assert_eq!(converter.to_usd(dec!(5954)).unwrap(), dec!(100));
    }

    #[test]
    fn test_free_functions_match_converter() {
        let r = rate(dec!(58.25));
        assert_eq!(to_local(dec!(10), r).unwrap(), dec!(582.5));
        assert_eq!(to_usd(dec!(582.5), r).unwrap(), dec!(10));
    }

    #[test]
    fn test_amount_from_local_keeps_local_value() {
        let converter = CurrencyConverter::new(rate(dec!(50)));
        let fee = converter.from_local(dec!(3000)).unwrap();
        assert_eq!(fee.local, dec!(3000));
        assert_eq!(fee.usd, dec!(60));
    }

    #[test]
    fn test_amount_sum() {
        let converter = CurrencyConverter::new(rate(dec!(50)));
        let total: Amount = [
            converter.from_usd(dec!(10)).unwrap(),
            converter.from_local(dec!(500)).unwrap(),
        ]
        .into_iter()
        .sum();
        assert_eq!(total.usd, dec!(20));
        assert_eq!(total.local, dec!(1000));
    }

    #[test]
    fn test_conversion_overflow_is_an_error() {
        let tiny = CurrencyConverter::new(rate(dec!(0.0000000000000000000000000001)));
        let err = tiny.to_usd(dec!(3000)).unwrap_err();
        assert!(matches!(err, DutyError::InvalidParameter { field: "exchange_rate", .. }));
        assert!(tiny.from_local(dec!(2500)).is_err());

        let large = CurrencyConverter::new(rate(dec!(59.54)));
        assert!(large.to_local(Decimal::MAX).is_err());
    }

    #[test]
    fn test_amount_checked_add_overflow() {
        let max = Amount {
            usd: Decimal::MAX,
            local: Decimal::ONE,
        };
        assert_eq!(max.checked_add(Amount::ZERO), Some(max));
        assert!(max.checked_add(max).is_none());
    }

    #[test]
    fn test_round_cents_midpoint() {
        assert_eq!(round_cents(dec!(1.005)), dec!(1.01));
        assert_eq!(round_cents(dec!(2.344)), dec!(2.34));
    }

    #[test]
    fn test_format_local_thousands() {
        assert_eq!(format_local(dec!(1234567.891)), "RD$1,234,567.89");
        assert_eq!(format_local(dec!(0)), "RD$0.00");
        assert_eq!(format_local(dec!(999.995)), "RD$1,000.00");
    }

    #[test]
    fn test_format_usd_small_and_negative() {
        assert_eq!(format_usd(dec!(12.5)), "US$12.50");
        assert_eq!(format_usd(dec!(-1500)), "-US$1,500.00");
    }
}
