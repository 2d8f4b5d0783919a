//! Duty breakdown for a single vehicle.
//!
//! Compares the same declared value from a gravamen-paying origin and from
//! the United States.

use duty_estimator::core::currency::{format_local, format_usd};
use duty_estimator::core::parameters::{Co2Bracket, DutyParameters, GravamenBracket};
use duty_estimator::core::valuation::VehicleValuation;
use duty_estimator::duty::calculator::compute_duty_breakdown;
use rust_decimal_macros::dec;

fn main() {
    println!("╔══════════════════════════════════════════╗");
    println!("║  duty-estimator: Basic Estimate Example  ║");
    println!("╚══════════════════════════════════════════╝\n");

    let params = DutyParameters::default()
        .with_exchange_rate(dec!(59.54))
        .with_gravamen(GravamenBracket::Ten)
        .with_co2(Co2Bracket::Low);

    for country in ["Japon", "Estados Unidos"] {
        println!("━━━ Declared US$10,000 from {} ━━━\n", country);

        let valuation = VehicleValuation::new(dec!(10000), country)
            .with_insurance(dec!(200))
            .with_freight(dec!(800));

        match compute_duty_breakdown(&valuation, &params) {
            Ok(breakdown) => {
                println!("{}", breakdown);
                println!(
                    "Duties only: {} / {}\n",
                    format_usd(breakdown.customs_total.usd + breakdown.dgii_total.usd),
                    format_local(breakdown.customs_total.local + breakdown.dgii_total.local)
                );
            }
            Err(e) => println!("Cannot estimate: {}\n", e),
        }
    }

    // A zero rate is rejected instead of producing a garbled breakdown.
    let broken = params.clone().with_exchange_rate(dec!(0));
    let valuation = VehicleValuation::new(dec!(10000), "Japon");
    if let Err(e) = compute_duty_breakdown(&valuation, &broken) {
        println!("With a zero exchange rate: {}", e);
    }
}
