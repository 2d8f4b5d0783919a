//! # duty-estimator
//!
//! Dominican Republic vehicle import duty estimator.
//!
//! Given a vehicle's declared (FOB) value, its country of origin and a set
//! of configurable rates, this crate computes the CIF valuation and every
//! charge levied on import: gravamen, ITBIS, CO2 fee, plate fee, customs
//! service fees and marbete, in both US dollars and Dominican pesos.
//!
//! ## Architecture
//!
//! - **core**: Currencies and conversion, errors, valuation inputs, duty parameters
//! - **duty**: The calculation engine, its breakdown, per-row selection estimates
//! - **catalog**: Vehicle records and filtering
//! - **rates**: Exchange-rate providers with last-known-good fallback
//! - **config**: Parameter loading and validation
//! - **simulation**: Random catalogs for benchmarks and demos

pub mod catalog;
pub mod config;
pub mod core;
pub mod duty;
pub mod rates;
pub mod simulation;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::catalog::memory::InMemoryCatalog;
    pub use crate::catalog::vehicle::{Vehicle, VehicleFilter};
    pub use crate::catalog::VehicleCatalog;
    pub use crate::core::currency::{Amount, CurrencyConverter, ExchangeRate};
    pub use crate::core::error::DutyError;
    pub use crate::core::parameters::{Co2Bracket, DutyParameters, GravamenBracket};
    pub use crate::core::valuation::VehicleValuation;
    pub use crate::duty::breakdown::{DutyBreakdown, LineItem};
    pub use crate::duty::calculator::{compute_duty_breakdown, DutyCalculator};
    pub use crate::duty::selection::{estimate_selection, VehicleEstimate};
    pub use crate::rates::{resolve_rate, ExchangeRateProvider, RateRecord};
}
