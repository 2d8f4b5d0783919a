use crate::core::currency::{Amount, CurrencyConverter};
use crate::core::error::DutyError;
use crate::core::parameters::{DutyParameters, ITBIS_RATE, PLATE_FEE_RATE};
use crate::core::valuation::VehicleValuation;
use crate::duty::breakdown::DutyBreakdown;
use log::debug;
use rust_decimal::Decimal;

/// The duty calculation engine.
///
/// Stateless: every call is a pure function of its arguments, so it can be
/// rerun on every parameter change without caching or debouncing.
pub struct DutyCalculator;

impl DutyCalculator {
    /// Compute the full duty breakdown for one vehicle.
    ///
    /// # Algorithm
    ///
    /// All valuation amounts are USD.
    ///
    /// 1. CIF = declared value + insurance + freight + other charges.
    /// 2. Gravamen = CIF × gravamen rate, or 0 for US-origin vehicles.
    /// 3. ITBIS = (CIF + gravamen) × 18%.
    /// 4. CO2 fee = CIF × CO2 rate.
    /// 5. Plate fee = CIF × 17%.
    /// 6. Customs total = gravamen + ITBIS + service fee + declaration fee.
    /// 7. DGII total = CO2 fee + plate fee + marbete.
    /// 8. Grand total = vehicle value + insurance + freight + other charges
    ///    + customs total + DGII total.
    ///
    /// USD amounts are converted to pesos at the exchange rate. The fixed
    /// fees are peso amounts and are converted the other way.
    ///
    /// # Errors
    ///
    /// [`DutyError::InvalidInput`] for a negative valuation amount,
    /// [`DutyError::InvalidParameter`] for a non-positive exchange rate or a
    /// negative rate or fee. Amounts too large to represent are reported as
    /// `InvalidInput` on the line that overflowed, or as `InvalidParameter`
    /// on `exchange_rate` when a currency conversion overflows.
    pub fn compute(
        valuation: &VehicleValuation,
        params: &DutyParameters,
    ) -> Result<DutyBreakdown, DutyError> {
        valuation.validate()?;
        let rate = params.check_computable()?;
        let fx = CurrencyConverter::new(rate);

        let declared = valuation.declared_value();
        let insurance = valuation.insurance();
        let freight = valuation.freight();
        let other_charges = valuation.other_charges();
        let cif = checked_sum("cif_total", &[declared, insurance, freight, other_charges])?;

        let exempt = valuation.is_gravamen_exempt();
        let gravamen = if exempt {
            Decimal::ZERO
        } else {
            checked_product("gravamen", cif, params.gravamen_rate)?
        };
        let itbis = checked_product(
            "itbis",
            checked_sum("itbis", &[cif, gravamen])?,
            ITBIS_RATE,
        )?;
        let co2_fee = checked_product("co2_fee", cif, params.co2_rate)?;
        let plate_fee = checked_product("plate_fee", cif, PLATE_FEE_RATE)?;

        let gravamen = fx.from_usd(gravamen)?;
        let itbis = fx.from_usd(itbis)?;
        let customs_service_fee = fx.from_local(params.customs_service_fee)?;
        let customs_declaration_fee = params
            .customs_declaration_fee
            .map(|fee| fx.from_local(fee))
            .transpose()?;
        let customs_total = checked_total(
            "customs_total",
            &[
                gravamen,
                itbis,
                customs_service_fee,
                customs_declaration_fee.unwrap_or(Amount::ZERO),
            ],
        )?;

        let co2_fee = fx.from_usd(co2_fee)?;
        let plate_fee = fx.from_usd(plate_fee)?;
        let marbete = fx.from_local(params.marbete_fee)?;
        let dgii_total = checked_total("dgii_total", &[co2_fee, plate_fee, marbete])?;

        let vehicle_value = fx.from_usd(valuation.vehicle_value())?;
        let insurance = fx.from_usd(insurance)?;
        let freight = fx.from_usd(freight)?;
        let other_charges = fx.from_usd(other_charges)?;
        let cif_total = fx.from_usd(cif)?;

        // Declared value enters once, through vehicle_value; CIF is not added.
        let grand_total = checked_total(
            "grand_total",
            &[
                vehicle_value,
                insurance,
                freight,
                other_charges,
                customs_total,
                dgii_total,
            ],
        )?;

        debug!(
            "duty breakdown: origin={} exempt={} cif={} grand_total_usd={} rate={}",
            valuation.country_of_origin(),
            exempt,
            cif,
            grand_total.usd,
            rate
        );

        Ok(DutyBreakdown {
            exchange_rate: rate,
            gravamen_exempt: exempt,
            vehicle_value,
            insurance,
            freight,
            other_charges,
            cif_total,
            gravamen,
            itbis,
            customs_service_fee,
            customs_declaration_fee,
            customs_total,
            co2_fee,
            plate_fee,
            marbete,
            dgii_total,
            grand_total,
        })
    }
}

fn out_of_range(field: &'static str, value: Decimal) -> DutyError {
    DutyError::invalid_input(field, value, "amount out of range")
}

fn checked_sum(field: &'static str, values: &[Decimal]) -> Result<Decimal, DutyError> {
    values
        .iter()
        .try_fold(Decimal::ZERO, |acc, value| acc.checked_add(*value))
        .ok_or_else(|| out_of_range(field, values.iter().copied().max().unwrap_or_default()))
}

fn checked_product(field: &'static str, base: Decimal, rate: Decimal) -> Result<Decimal, DutyError> {
    base.checked_mul(rate).ok_or_else(|| out_of_range(field, base))
}

fn checked_total(field: &'static str, amounts: &[Amount]) -> Result<Amount, DutyError> {
    amounts
        .iter()
        .try_fold(Amount::ZERO, |acc, amount| acc.checked_add(*amount))
        .ok_or_else(|| {
            let largest = amounts.iter().map(|a| a.local).max().unwrap_or_default();
            out_of_range(field, largest)
        })
}

/// Compute the duty breakdown for one vehicle. See [`DutyCalculator::compute`].
pub fn compute_duty_breakdown(
    valuation: &VehicleValuation,
    params: &DutyParameters,
) -> Result<DutyBreakdown, DutyError> {
    DutyCalculator::compute(valuation, params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::parse_amount;
    use rust_decimal_macros::dec;

    fn japan_valuation() -> VehicleValuation {
        VehicleValuation::new(dec!(10000), "Japan")
            .with_insurance(dec!(200))
            .with_freight(dec!(800))
            .with_other_charges(dec!(0))
    }

    fn scenario_params() -> DutyParameters {
        DutyParameters::default()
            .with_exchange_rate(dec!(59.54))
            .with_gravamen_rate(dec!(0.10))
            .with_co2_rate(dec!(0.01))
    }

    #[test]
    fn test_japan_scenario() {
        let b = compute_duty_breakdown(&japan_valuation(), &scenario_params()).unwrap();
        assert_eq!(b.cif_total.usd, dec!(11000));
        assert_eq!(b.gravamen.usd, dec!(1100));
        assert_eq!(b.itbis.usd, dec!(2178));
        assert_eq!(b.co2_fee.usd, dec!(110));
        assert_eq!(b.plate_fee.usd, dec!(1870));
        assert!(!b.gravamen_exempt);
    }

    #[test]
    fn test_us_origin_exempt_from_gravamen() {
        let valuation = VehicleValuation::new(dec!(10000), "Estados Unidos")
            .with_insurance(dec!(200))
            .with_freight(dec!(800));
        let b = compute_duty_breakdown(&valuation, &scenario_params()).unwrap();
        assert_eq!(b.gravamen.usd, Decimal::ZERO);
        assert_eq!(b.itbis.usd, dec!(1980));
        assert!(b.gravamen_exempt);
    }

    #[test]
    fn test_local_conversion() {
        let b = compute_duty_breakdown(&japan_valuation(), &scenario_params()).unwrap();
        assert_eq!(b.cif_total.local, dec!(654940));
        assert_eq!(b.gravamen.local, dec!(65494));
    }

    #[test]
    fn test_fixed_fees_stay_in_local_currency() {
        let params = scenario_params()
            .with_exchange_rate(dec!(50))
            .with_marbete_fee(dec!(3000))
            .with_customs_service_fee(dec!(2500));
        let b = compute_duty_breakdown(&japan_valuation(), &params).unwrap();
        assert_eq!(b.marbete.local, dec!(3000));
        assert_eq!(b.marbete.usd, dec!(60));
        assert_eq!(b.customs_service_fee.usd, dec!(50));
    }

    #[test]
    fn test_bucket_totals() {
        let params = scenario_params()
            .with_exchange_rate(dec!(50))
            .with_customs_declaration_fee(dec!(1000));
        let b = compute_duty_breakdown(&japan_valuation(), &params).unwrap();
        // 1100 + 2178 + 2500/50 + 1000/50
        assert_eq!(b.customs_total.usd, dec!(3348));
        // 110 + 1870 + 3000/50
        assert_eq!(b.dgii_total.usd, dec!(2040));
        assert_eq!(b.customs_declaration_fee.map(|a| a.local), Some(dec!(1000)));
    }

    #[test]
    fn test_grand_total_counts_declared_value_once() {
        let params = scenario_params().with_exchange_rate(dec!(50));
        let b = compute_duty_breakdown(&japan_valuation(), &params).unwrap();
        let expected = b.cif_total.usd + b.customs_total.usd + b.dgii_total.usd;
        assert_eq!(b.grand_total.usd, expected);
        assert_eq!(b.grand_total.local, expected * dec!(50));
    }

    #[test]
    fn test_vehicle_value_override() {
        let valuation = japan_valuation().with_vehicle_value_override(dec!(9000));
        let b = compute_duty_breakdown(&valuation, &scenario_params()).unwrap();
        assert_eq!(b.vehicle_value.usd, dec!(9000));
        // duties still follow the declared value
        assert_eq!(b.cif_total.usd, dec!(11000));
        let base = compute_duty_breakdown(&japan_valuation(), &scenario_params()).unwrap();
        assert_eq!(base.grand_total.usd - b.grand_total.usd, dec!(1000));
    }

    #[test]
    fn test_default_charges() {
        let valuation = VehicleValuation::new(dec!(20000), "Korea");
        let b = compute_duty_breakdown(&valuation, &scenario_params()).unwrap();
        assert_eq!(b.insurance.usd, dec!(400));
        assert_eq!(b.freight.usd, dec!(800));
        assert_eq!(b.cif_total.usd, dec!(21200));
    }

    #[test]
    fn test_zero_exchange_rate_rejected() {
        let params = scenario_params().with_exchange_rate(Decimal::ZERO);
        let err = compute_duty_breakdown(&japan_valuation(), &params).unwrap_err();
        assert!(matches!(err, DutyError::InvalidParameter { field: "exchange_rate", .. }));
    }

    #[test]
    fn test_negative_declared_value_rejected() {
        let valuation = VehicleValuation::new(dec!(-5), "Japan");
        let err = compute_duty_breakdown(&valuation, &scenario_params()).unwrap_err();
        assert!(matches!(err, DutyError::InvalidInput { field: "declared_value", .. }));
    }

    #[test]
    fn test_declared_value_too_large_is_an_error() {
        let declared = parse_amount("declared_value", "1000000000000000000000000000").unwrap();
        let valuation = VehicleValuation::new(declared, "Japan");
        let err = compute_duty_breakdown(&valuation, &scenario_params()).unwrap_err();
        assert!(matches!(err, DutyError::InvalidInput { .. }));
        assert!(err.to_string().contains("amount out of range"));
    }

    #[test]
    fn test_maximum_declared_value_is_an_error() {
        let valuation = VehicleValuation::new(Decimal::MAX, "Estados Unidos")
            .with_insurance(Decimal::ZERO)
            .with_freight(Decimal::ZERO);
        let err = compute_duty_breakdown(&valuation, &scenario_params()).unwrap_err();
        assert!(matches!(
            err,
            DutyError::InvalidInput { .. } | DutyError::InvalidParameter { .. }
        ));
    }

    #[test]
    fn test_tiny_exchange_rate_is_an_error() {
        let params = scenario_params().with_exchange_rate(dec!(0.0000000000000000000000000001));
        assert!(params.check_computable().is_ok());
        let err = compute_duty_breakdown(&japan_valuation(), &params).unwrap_err();
        assert!(matches!(err, DutyError::InvalidParameter { field: "exchange_rate", .. }));
    }

    #[test]
    fn test_zero_declared_value() {
        let valuation = VehicleValuation::new(Decimal::ZERO, "Japan");
        let b = compute_duty_breakdown(&valuation, &scenario_params()).unwrap();
        assert_eq!(b.insurance.usd, Decimal::ZERO);
        assert_eq!(b.cif_total.usd, dec!(800));
        assert!(b.is_non_negative());
    }
}
