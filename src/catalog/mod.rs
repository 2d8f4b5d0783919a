//! Vehicle catalog: records users browse and select for an estimate.
//!
//! The calculator only needs a declared value and an origin country from
//! each record; how records are stored is up to the [`VehicleCatalog`]
//! implementation.

pub mod memory;
pub mod vehicle;

use crate::catalog::vehicle::{Vehicle, VehicleFilter};
use thiserror::Error;

/// Errors raised by catalog providers.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("catalog service reported failure")]
    Unavailable,
    #[error("invalid vehicle record {index}: {reason}")]
    InvalidRecord { index: usize, reason: String },
}

/// Source of vehicle records.
pub trait VehicleCatalog {
    /// Records matching `filter`, in catalog order.
    fn fetch_vehicles(&self, filter: &VehicleFilter) -> Result<Vec<Vehicle>, CatalogError>;
}
