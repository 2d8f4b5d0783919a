//! duty-estimator CLI
//!
//! Estimate Dominican Republic import duties from the command line.
//!
//! # Usage
//!
//! ```bash
//! # One vehicle
//! duty-estimator estimate --value 10000 --country Japan --gravamen 0.10
//!
//! # Browse a catalog and estimate selected rows
//! duty-estimator catalog --input vehicles.json --brand toyota --select 0,2
//!
//! # Show or update the stored exchange rate
//! duty-estimator rate --store rate.json --set 60.15
//!
//! # Generate a random catalog
//! duty-estimator generate --count 40 --output vehicles.json
//! ```

use duty_estimator::catalog::memory::InMemoryCatalog;
use duty_estimator::catalog::vehicle::VehicleFilter;
use duty_estimator::catalog::VehicleCatalog;
use duty_estimator::config::{resolve_parameters, ParameterOverrides};
use duty_estimator::core::currency::ExchangeRate;
use duty_estimator::core::error::{parse_amount, parse_parameter};
use duty_estimator::core::parameters::DutyParameters;
use duty_estimator::core::valuation::VehicleValuation;
use duty_estimator::duty::calculator::compute_duty_breakdown;
use duty_estimator::duty::selection::estimate_selection;
use duty_estimator::rates::store::JsonFileRateStore;
use duty_estimator::rates::{resolve_rate, ExchangeRateProvider};
use duty_estimator::simulation::sample_catalog::{generate_random_catalog, CatalogConfig};
use log::info;
use std::fmt::Display;
use std::fs;
use std::path::Path;
use std::process;

fn print_usage() {
    eprintln!(
        r#"duty-estimator: Dominican Republic vehicle import duty estimator

USAGE:
    duty-estimator <COMMAND> [OPTIONS]

COMMANDS:
    estimate    Compute the duty breakdown of one vehicle
    catalog     List catalog vehicles and estimate selected rows
    rate        Show or update the stored exchange rate
    generate    Generate a random vehicle catalog (for testing)
    help        Show this message

OPTIONS (estimate):
    --value <USD>           Declared (FOB) value
    --country <NAME>        Country of origin
    --insurance <USD>       Insurance (default: 2% of value)
    --freight <USD>         Freight (default: 800)
    --other <USD>           Other charges (default: 0)
    --vehicle-value <USD>   Override the vehicle value line

OPTIONS (catalog):
    --input <FILE>          Path to JSON catalog
    --brand <TEXT>          Brand contains TEXT
    --model <TEXT>          Model contains TEXT
    --year <YEAR>           Model year
    --select <LIST>         Comma-separated row numbers to estimate

PARAMETERS (estimate, catalog):
    --params <FILE>         JSON duty parameters
    --rate <DOP>            Exchange rate, DOP per USD
    --rate-store <FILE>     Read the exchange rate from a rate store
    --gravamen <RATE>       Gravamen rate (0, 0.10, 0.20, 0.30)
    --co2 <RATE>            CO2 rate (0.01, 0.02, 0.03)
    --marbete <DOP>         Marbete fee
    --service-fee <DOP>     Customs service fee
    --declaration-fee <DOP> Customs declaration fee
    --format <FORMAT>       Output format: text (default) or json

OPTIONS (rate):
    --store <FILE>          Rate store path
    --set <DOP>             New exchange rate

OPTIONS (generate):
    --count <N>             Number of vehicles (default: 50)
    --output <FILE>         Write to file instead of stdout

EXAMPLES:
    duty-estimator estimate --value 10000 --country Japan --rate 59.54 --gravamen 0.10
    duty-estimator estimate --value 25000 --country "Estados Unidos" --format json
    duty-estimator catalog --input vehicles.json --brand toyota --year 2021 --select 0
    duty-estimator rate --store rate.json --set 60.15
    duty-estimator generate --count 40 --output vehicles.json"#
    );
}

fn fail(message: impl Display) -> ! {
    eprintln!("Error: {}", message);
    process::exit(1);
}

fn or_fail<T, E: Display>(result: Result<T, E>) -> T {
    result.unwrap_or_else(|e| fail(e))
}

fn take_value(args: &[String], i: &mut usize) -> String {
    let flag = &args[*i];
    *i += 1;
    args.get(*i)
        .cloned()
        .unwrap_or_else(|| fail(format!("{} requires a value", flag)))
}

/// Flags shared by every command that computes a breakdown.
#[derive(Default)]
struct ParameterOptions {
    params_path: Option<String>,
    rate_store: Option<String>,
    overrides: ParameterOverrides,
    json: bool,
}

impl ParameterOptions {
    /// Consume the flag at `args[*i]` if it is a parameter flag.
    fn take(&mut self, args: &[String], i: &mut usize) -> bool {
        let o = &mut self.overrides;
        match args[*i].as_str() {
            "--params" => self.params_path = Some(take_value(args, i)),
            "--rate-store" => self.rate_store = Some(take_value(args, i)),
            "--rate" => {
                o.exchange_rate = Some(or_fail(parse_parameter("exchange_rate", &take_value(args, i))))
            }
            "--gravamen" => {
                o.gravamen_rate = Some(or_fail(parse_parameter("gravamen_rate", &take_value(args, i))))
            }
            "--co2" => o.co2_rate = Some(or_fail(parse_parameter("co2_rate", &take_value(args, i)))),
            "--marbete" => {
                o.marbete_fee = Some(or_fail(parse_parameter("marbete_fee", &take_value(args, i))))
            }
            "--service-fee" => {
                o.customs_service_fee = Some(or_fail(parse_parameter(
                    "customs_service_fee",
                    &take_value(args, i),
                )))
            }
            "--declaration-fee" => {
                o.customs_declaration_fee = Some(or_fail(parse_parameter(
                    "customs_declaration_fee",
                    &take_value(args, i),
                )))
            }
            "--format" => {
                self.json = match take_value(args, i).as_str() {
                    "json" => true,
                    "text" => false,
                    other => fail(format!("unknown format '{}', expected text or json", other)),
                }
            }
            _ => return false,
        }
        true
    }

    fn resolve(&self) -> DutyParameters {
        let mut params = or_fail(resolve_parameters(
            self.params_path.as_deref().map(Path::new),
            &self.overrides,
        ));
        if self.overrides.exchange_rate.is_none() {
            if let Some(store_path) = &self.rate_store {
                let store = JsonFileRateStore::new(store_path);
                let fallback = or_fail(params.rate());
                params.exchange_rate = resolve_rate(&store, fallback).value();
            }
        }
        params
    }
}

fn print_json(value: &impl serde::Serialize) {
    println!("{}", or_fail(serde_json::to_string_pretty(value)));
}

fn cmd_estimate(args: &[String]) {
    let mut options = ParameterOptions::default();
    let mut value = None;
    let mut country = None;
    let mut insurance = None;
    let mut freight = None;
    let mut other = None;
    let mut vehicle_value = None;
    let mut i = 0;
    while i < args.len() {
        if !options.take(args, &mut i) {
            match args[i].as_str() {
                "--value" => value = Some(or_fail(parse_amount("declared_value", &take_value(args, &mut i)))),
                "--country" => country = Some(take_value(args, &mut i)),
                "--insurance" => insurance = Some(or_fail(parse_amount("insurance", &take_value(args, &mut i)))),
                "--freight" => freight = Some(or_fail(parse_amount("freight", &take_value(args, &mut i)))),
                "--other" => other = Some(or_fail(parse_amount("other_charges", &take_value(args, &mut i)))),
                "--vehicle-value" => {
                    vehicle_value = Some(or_fail(parse_amount(
                        "vehicle_value_override",
                        &take_value(args, &mut i),
                    )))
                }
                unknown => fail(format!("unknown option: {}", unknown)),
            }
        }
        i += 1;
    }

    let value = value.unwrap_or_else(|| fail("--value <USD> is required"));
    let country = country.unwrap_or_else(|| fail("--country <NAME> is required"));

    let mut valuation = VehicleValuation::new(value, country);
    if let Some(insurance) = insurance {
        valuation = valuation.with_insurance(insurance);
    }
    if let Some(freight) = freight {
        valuation = valuation.with_freight(freight);
    }
    if let Some(other) = other {
        valuation = valuation.with_other_charges(other);
    }
    if let Some(vehicle_value) = vehicle_value {
        valuation = valuation.with_vehicle_value_override(vehicle_value);
    }

    let params = options.resolve();
    let breakdown = or_fail(compute_duty_breakdown(&valuation, &params));

    if options.json {
        print_json(&breakdown.rounded());
    } else {
        println!("{}", breakdown);
    }
}

fn parse_selection(list: &str) -> Vec<usize> {
    list.split(',')
        .filter(|s| !s.trim().is_empty())
        .map(|s| {
            s.trim()
                .parse()
                .unwrap_or_else(|_| fail(format!("invalid row number '{}'", s)))
        })
        .collect()
}

fn cmd_catalog(args: &[String]) {
    let mut options = ParameterOptions::default();
    let mut input_path = None;
    let mut filter = VehicleFilter::new();
    let mut selected = Vec::new();
    let mut i = 0;
    while i < args.len() {
        if !options.take(args, &mut i) {
            match args[i].as_str() {
                "--input" => input_path = Some(take_value(args, &mut i)),
                "--brand" => filter.brand = Some(take_value(args, &mut i)),
                "--model" => filter.model = Some(take_value(args, &mut i)),
                "--year" => {
                    let year = take_value(args, &mut i);
                    filter.year = Some(
                        year.trim()
                            .parse()
                            .unwrap_or_else(|_| fail(format!("invalid year '{}'", year))),
                    );
                }
                "--select" => selected = parse_selection(&take_value(args, &mut i)),
                unknown => fail(format!("unknown option: {}", unknown)),
            }
        }
        i += 1;
    }

    let path = input_path.unwrap_or_else(|| fail("--input <FILE> is required"));
    let catalog = or_fail(InMemoryCatalog::from_json_file(&path));
    let vehicles = or_fail(catalog.fetch_vehicles(&filter));

    if selected.is_empty() {
        if options.json {
            print_json(&vehicles);
        } else {
            for (row, vehicle) in vehicles.iter().enumerate() {
                println!("{:>4}  {:<40} US${}", row, vehicle.to_string(), vehicle.value);
            }
            println!("\n{} vehicles", vehicles.len());
        }
        return;
    }

    let params = options.resolve();
    let estimates = estimate_selection(&vehicles, &selected, &params);
    info!("estimated {} selected vehicles", estimates.len());

    if options.json {
        print_json(&estimates);
        return;
    }
    println!("Selected vehicles: {}\n", estimates.len());
    for estimate in &estimates {
        match (&estimate.vehicle, &estimate.result) {
            (Some(vehicle), Ok(breakdown)) => println!("[{}] {}\n{}", estimate.index, vehicle, breakdown),
            (_, Err(e)) => println!("[{}] {}\n", estimate.index, e),
            (None, Ok(_)) => {}
        }
    }
}

fn cmd_rate(args: &[String]) {
    let mut store_path = None;
    let mut new_rate = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--store" => store_path = Some(take_value(args, &mut i)),
            "--set" => {
                let rate = or_fail(parse_parameter("exchange_rate", &take_value(args, &mut i)));
                new_rate = Some(or_fail(ExchangeRate::new(rate)));
            }
            unknown => fail(format!("unknown option: {}", unknown)),
        }
        i += 1;
    }

    let path = store_path.unwrap_or_else(|| fail("--store <FILE> is required"));
    let mut store = JsonFileRateStore::new(path);

    let record = match new_rate {
        Some(rate) => or_fail(store.persist_exchange_rate(rate)),
        None => or_fail(store.fetch_exchange_rate()),
    };
    println!("Exchange rate: {}", record.rate);
    println!("Updated:       {}", record.updated_at.to_rfc3339());
}

fn cmd_generate(args: &[String]) {
    let mut config = CatalogConfig::default();
    let mut output_path: Option<String> = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--count" => {
                let count = take_value(args, &mut i);
                config.vehicle_count = count
                    .parse()
                    .unwrap_or_else(|_| fail("--count requires a number"));
            }
            "--output" => output_path = Some(take_value(args, &mut i)),
            unknown => fail(format!("unknown option: {}", unknown)),
        }
        i += 1;
    }

    let catalog = generate_random_catalog(&config);
    let json = or_fail(serde_json::to_string_pretty(catalog.vehicles()));

    if let Some(path) = output_path {
        or_fail(fs::write(&path, &json));
        eprintln!("Generated {} vehicles → {}", catalog.len(), path);
    } else {
        println!("{}", json);
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let command = args[1].as_str();
    let rest = &args[2..];

    match command {
        "estimate" => cmd_estimate(rest),
        "catalog" => cmd_catalog(rest),
        "rate" => cmd_rate(rest),
        "generate" => cmd_generate(rest),
        "help" | "--help" | "-h" => print_usage(),
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            process::exit(1);
        }
    }
}
