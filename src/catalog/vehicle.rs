use crate::core::valuation::VehicleValuation;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One catalog record.
///
/// Deserializes from either the English field names or the Spanish keys
/// served by the vehicle service (`Marca`, `Modelo`, `Año`, `Valor`, `Pais`,
/// `Especificaciones`).
///
/// # Examples
///
/// ```
/// use duty_estimator::catalog::vehicle::Vehicle;
/// use rust_decimal_macros::dec;
///
/// let vehicle: Vehicle = serde_json::from_str(
///     r#"{"Marca": "Toyota", "Modelo": "Corolla", "Año": 2021, "Valor": "14500", "Pais": "Japon"}"#,
/// ).unwrap();
/// assert_eq!(vehicle.value, dec!(14500));
/// assert_eq!(vehicle.valuation().freight(), dec!(800));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    #[serde(alias = "Marca")]
    pub brand: String,
    #[serde(alias = "Modelo")]
    pub model: String,
    #[serde(alias = "Año")]
    pub year: i32,
    /// Declared (FOB) value in USD.
    #[serde(alias = "Valor")]
    pub value: Decimal,
    #[serde(alias = "Pais")]
    pub country: String,
    #[serde(default, alias = "Especificaciones")]
    pub specifications: String,
}

impl Vehicle {
    pub fn new(
        brand: impl Into<String>,
        model: impl Into<String>,
        year: i32,
        value: Decimal,
        country: impl Into<String>,
    ) -> Self {
        Self {
            brand: brand.into(),
            model: model.into(),
            year,
            value,
            country: country.into(),
            specifications: String::new(),
        }
    }

    pub fn with_specifications(mut self, specifications: impl Into<String>) -> Self {
        self.specifications = specifications.into();
        self
    }

    /// Valuation of this vehicle with default insurance, freight and other
    /// charges.
    pub fn valuation(&self) -> VehicleValuation {
        VehicleValuation::new(self.value, self.country.clone())
    }
}

impl fmt::Display for Vehicle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} ({})", self.brand, self.model, self.year, self.country)
    }
}

/// Catalog search criteria. Empty criteria match every record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleFilter {
    /// Case-insensitive substring of the brand.
    #[serde(default)]
    pub brand: Option<String>,
    /// Case-insensitive substring of the model.
    #[serde(default)]
    pub model: Option<String>,
    /// Exact model year.
    #[serde(default)]
    pub year: Option<i32>,
}

impl VehicleFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn matches(&self, vehicle: &Vehicle) -> bool {
        contains_ignore_case(&vehicle.brand, self.brand.as_deref())
            && contains_ignore_case(&vehicle.model, self.model.as_deref())
            && self.year.map_or(true, |year| vehicle.year == year)
    }
}

/// Blank needles match everything, as an empty search box does.
fn contains_ignore_case(haystack: &str, needle: Option<&str>) -> bool {
    match needle.map(str::trim) {
        None | Some("") => true,
        Some(needle) => haystack.to_lowercase().contains(&needle.to_lowercase()),
    }
}
