use crate::catalog::vehicle::{Vehicle, VehicleFilter};
use crate::catalog::{CatalogError, VehicleCatalog};
use log::info;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Accepted catalog documents: a bare array of records, or the
/// `{ "success": true, "data": [...] }` envelope of the vehicle service.
#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogDocument {
    Envelope { success: bool, data: Vec<Vehicle> },
    Records(Vec<Vehicle>),
}

/// A catalog held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    vehicles: Vec<Vehicle>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, vehicle: Vehicle) {
        self.vehicles.push(vehicle);
    }

    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    /// Parse a JSON catalog document, rejecting records with a negative value.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let vehicles = match serde_json::from_str::<CatalogDocument>(json)? {
            CatalogDocument::Envelope { success: false, .. } => {
                return Err(CatalogError::Unavailable)
            }
            CatalogDocument::Envelope { data, .. } => data,
            CatalogDocument::Records(records) => records,
        };

        for (index, vehicle) in vehicles.iter().enumerate() {
            if vehicle.value < Decimal::ZERO {
                return Err(CatalogError::InvalidRecord {
                    index,
                    reason: format!("negative value {}", vehicle.value),
                });
            }
        }

        Ok(vehicles.into_iter().collect())
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let catalog = Self::from_json_str(&content)?;
        info!("loaded {} vehicles from {}", catalog.len(), path.display());
        Ok(catalog)
    }
}

impl FromIterator<Vehicle> for InMemoryCatalog {
    fn from_iter<T: IntoIterator<Item = Vehicle>>(iter: T) -> Self {
        Self {
            vehicles: iter.into_iter().collect(),
        }
    }
}

impl VehicleCatalog for InMemoryCatalog {
    fn fetch_vehicles(&self, filter: &VehicleFilter) -> Result<Vec<Vehicle>, CatalogError> {
        Ok(self
            .vehicles
            .iter()
            .filter(|v| filter.matches(v))
            .cloned()
            .collect())
    }
}
