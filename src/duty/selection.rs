use crate::catalog::vehicle::Vehicle;
use crate::core::error::DutyError;
use crate::core::parameters::DutyParameters;
use crate::duty::breakdown::DutyBreakdown;
use crate::duty::calculator::DutyCalculator;
use serde::Serialize;
use thiserror::Error;

/// Why one selected row has no breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
pub enum SelectionError {
    #[error("row {index} is out of range ({len} vehicles listed)")]
    OutOfRange { index: usize, len: usize },
    #[error(transparent)]
    Duty(DutyError),
}

/// The estimate for one selected row.
///
/// Each row stands alone: estimates are never summed into a combined
/// declaration.
#[derive(Debug, Clone, Serialize)]
pub struct VehicleEstimate {
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle: Option<Vehicle>,
    pub result: Result<DutyBreakdown, SelectionError>,
}

impl VehicleEstimate {
    pub fn breakdown(&self) -> Option<&DutyBreakdown> {
        self.result.as_ref().ok()
    }
}

/// Estimate duties for the selected rows of a vehicle listing, in selection
/// order. A bad row yields an error for that row only.
pub fn estimate_selection(
    vehicles: &[Vehicle],
    selected: &[usize],
    params: &DutyParameters,
) -> Vec<VehicleEstimate> {
    selected
        .iter()
        .map(|&index| match vehicles.get(index) {
            Some(vehicle) => VehicleEstimate {
                index,
                vehicle: Some(vehicle.clone()),
                result: DutyCalculator::compute(&vehicle.valuation(), params)
                    .map_err(SelectionError::Duty),
            },
            None => VehicleEstimate {
                index,
                vehicle: None,
                result: Err(SelectionError::OutOfRange {
                    index,
                    len: vehicles.len(),
                }),
            },
        })
        .collect()
}
