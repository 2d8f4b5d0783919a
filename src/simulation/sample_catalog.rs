//! Random vehicle catalogs.
//!
//! Used to benchmark the calculator over many rows and to produce a catalog
//! file to try the CLI with.

use crate::catalog::memory::InMemoryCatalog;
use crate::catalog::vehicle::Vehicle;
use rand::seq::SliceRandom;
use rand::Rng;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

const MAKES: [(&str, &[&str], &str); 6] = [
    ("Toyota", &["Corolla", "RAV4", "Hilux", "Land Cruiser"], "Japon"),
    ("Honda", &["Civic", "CR-V", "Accord"], "Japon"),
    ("Hyundai", &["Tucson", "Elantra", "Santa Fe"], "Corea del Sur"),
    ("Kia", &["Sportage", "Rio", "Sorento"], "Corea del Sur"),
    ("Ford", &["F-150", "Explorer", "Ranger"], "Estados Unidos"),
    ("Chevrolet", &["Silverado", "Tahoe", "Equinox"], "Estados Unidos"),
];

/// Configuration for generating a random catalog.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub vehicle_count: usize,
    pub min_year: i32,
    pub max_year: i32,
    /// Minimum declared value, USD.
    pub min_value: Decimal,
    /// Maximum declared value, USD.
    pub max_value: Decimal,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            vehicle_count: 50,
            min_year: 2015,
            max_year: 2025,
            min_value: Decimal::from(5_000),
            max_value: Decimal::from(80_000),
        }
    }
}

/// Generate a random catalog.
pub fn generate_random_catalog(config: &CatalogConfig) -> InMemoryCatalog {
    let mut rng = rand::thread_rng();

    let min_value = config.min_value.to_f64().unwrap_or(5_000.0);
    let max_value = config.max_value.to_f64().unwrap_or(80_000.0);

    (0..config.vehicle_count)
        .filter_map(|_| {
            let (brand, models, country) = MAKES.choose(&mut rng)?;
            let model = models.choose(&mut rng)?;
            let year = if config.max_year > config.min_year {
                rng.gen_range(config.min_year..=config.max_year)
            } else {
                config.min_year
            };
            let value = if max_value > min_value {
                rng.gen_range(min_value..max_value)
            } else {
                min_value
            };
            let value = Decimal::from_f64_retain(value)
                .unwrap_or(config.min_value)
                .round_dp(2);
            Some(Vehicle::new(*brand, *model, year, value, *country))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generates_requested_count() {
        let config = CatalogConfig {
            vehicle_count: 25,
            ..Default::default()
        };
        assert_eq!(generate_random_catalog(&config).len(), 25);
    }

    #[test]
    fn test_inverted_ranges_use_minimum() {
        let config = CatalogConfig {
            vehicle_count: 10,
            min_year: 2024,
            max_year: 2018,
            min_value: Decimal::from(20_000),
            max_value: Decimal::from(10_000),
        };
        let catalog = generate_random_catalog(&config);
        assert_eq!(catalog.len(), 10);
        for v in catalog.vehicles() {
            assert_eq!(v.year, 2024);
            assert_eq!(v.value, Decimal::from(20_000));
        }
    }

    #[test]
    fn test_values_and_years_in_range() {
        let config = CatalogConfig::default();
        let catalog = generate_random_catalog(&config);
        for v in catalog.vehicles() {
            assert!(v.value >= config.min_value && v.value <= config.max_value);
            assert!(v.year >= config.min_year && v.year <= config.max_year);
        }
    }

    #[test]
    fn test_catalog_estimates() {
        use crate::core::parameters::DutyParameters;
        use crate::duty::calculator::compute_duty_breakdown;

        let catalog = generate_random_catalog(&CatalogConfig::default());
        let params = DutyParameters::default();
        for v in catalog.vehicles() {
            let breakdown = compute_duty_breakdown(&v.valuation(), &params).unwrap();
            assert!(breakdown.is_non_negative());
        }
    }
}
