//! Filter a random catalog and estimate the selected rows.

use duty_estimator::catalog::vehicle::VehicleFilter;
use duty_estimator::catalog::VehicleCatalog;
use duty_estimator::core::currency::format_local;
use duty_estimator::core::parameters::DutyParameters;
use duty_estimator::duty::selection::estimate_selection;
use duty_estimator::simulation::sample_catalog::{generate_random_catalog, CatalogConfig};

fn main() {
    let catalog = generate_random_catalog(&CatalogConfig {
        vehicle_count: 30,
        ..Default::default()
    });

    let filter = VehicleFilter::new().with_brand("o");
    let listing = match catalog.fetch_vehicles(&filter) {
        Ok(listing) => listing,
        Err(e) => {
            eprintln!("catalog error: {}", e);
            return;
        }
    };

    println!("{} of {} vehicles match brand contains 'o'\n", listing.len(), catalog.len());
    for (row, vehicle) in listing.iter().enumerate().take(5) {
        println!("  {:>2}  {:<40} US${}", row, vehicle.to_string(), vehicle.value);
    }

    let selected: Vec<usize> = (0..listing.len().min(3)).collect();
    let estimates = estimate_selection(&listing, &selected, &DutyParameters::default());

    println!("\n━━━ Estimates ━━━\n");
    for estimate in estimates {
        match (estimate.vehicle, estimate.result) {
            (Some(vehicle), Ok(breakdown)) => println!(
                "  {:<40} total {:>18}",
                vehicle.to_string(),
                format_local(breakdown.grand_total.local)
            ),
            (_, Err(e)) => println!("  row {}: {}", estimate.index, e),
            (None, Ok(_)) => {}
        }
    }
}
