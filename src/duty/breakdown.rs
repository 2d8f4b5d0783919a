use crate::core::currency::{format_local, format_usd, Amount, ExchangeRate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Named line items of a duty breakdown, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineItem {
    VehicleValue,
    Insurance,
    Freight,
    OtherCharges,
    CifTotal,
    Gravamen,
    Itbis,
    CustomsServiceFee,
    CustomsDeclarationFee,
    CustomsTotal,
    Co2Fee,
    PlateFee,
    Marbete,
    DgiiTotal,
    GrandTotal,
}

impl LineItem {
    pub fn label(&self) -> &'static str {
        match self {
            Self::VehicleValue => "Vehicle value",
            Self::Insurance => "Insurance",
            Self::Freight => "Freight",
            Self::OtherCharges => "Other charges",
            Self::CifTotal => "CIF total",
            Self::Gravamen => "Gravamen",
            Self::Itbis => "ITBIS (18%)",
            Self::CustomsServiceFee => "Customs service fee",
            Self::CustomsDeclarationFee => "Customs declaration fee",
            Self::CustomsTotal => "Customs total",
            Self::Co2Fee => "CO2 fee",
            Self::PlateFee => "Plate fee (17%)",
            Self::Marbete => "Marbete",
            Self::DgiiTotal => "DGII total",
            Self::GrandTotal => "Grand total",
        }
    }

    /// Subtotals and the grand total, as opposed to individual charges.
    pub fn is_total(&self) -> bool {
        matches!(
            self,
            Self::CifTotal | Self::CustomsTotal | Self::DgiiTotal | Self::GrandTotal
        )
    }
}

impl fmt::Display for LineItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Every charge of one vehicle import, each in USD and local currency.
///
/// Produced by [`compute_duty_breakdown`](crate::duty::calculator::compute_duty_breakdown);
/// has no lifecycle of its own and is recomputed whenever an input changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DutyBreakdown {
    pub exchange_rate: ExchangeRate,
    pub gravamen_exempt: bool,

    pub vehicle_value: Amount,
    pub insurance: Amount,
    pub freight: Amount,
    pub other_charges: Amount,
    pub cif_total: Amount,

    // Customs agency (DGA) bucket
    pub gravamen: Amount,
    pub itbis: Amount,
    pub customs_service_fee: Amount,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customs_declaration_fee: Option<Amount>,
    pub customs_total: Amount,

    // Tax authority (DGII) bucket
    pub co2_fee: Amount,
    pub plate_fee: Amount,
    pub marbete: Amount,
    pub dgii_total: Amount,

    pub grand_total: Amount,
}

impl DutyBreakdown {
    /// Amount for a line item. `None` only for an unconfigured optional fee.
    pub fn get(&self, item: LineItem) -> Option<Amount> {
        let amount = match item {
            LineItem::VehicleValue => self.vehicle_value,
            LineItem::Insurance => self.insurance,
            LineItem::Freight => self.freight,
            LineItem::OtherCharges => self.other_charges,
            LineItem::CifTotal => self.cif_total,
            LineItem::Gravamen => self.gravamen,
            LineItem::Itbis => self.itbis,
            LineItem::CustomsServiceFee => self.customs_service_fee,
            LineItem::CustomsDeclarationFee => return self.customs_declaration_fee,
            LineItem::CustomsTotal => self.customs_total,
            LineItem::Co2Fee => self.co2_fee,
            LineItem::PlateFee => self.plate_fee,
            LineItem::Marbete => self.marbete,
            LineItem::DgiiTotal => self.dgii_total,
            LineItem::GrandTotal => self.grand_total,
        };
        Some(amount)
    }

    /// All present line items in display order.
    pub fn items(&self) -> Vec<(LineItem, Amount)> {
        const ORDER: [LineItem; 15] = [
            LineItem::VehicleValue,
            LineItem::Insurance,
            LineItem::Freight,
            LineItem::OtherCharges,
            LineItem::CifTotal,
            LineItem::Gravamen,
            LineItem::Itbis,
            LineItem::CustomsServiceFee,
            LineItem::CustomsDeclarationFee,
            LineItem::CustomsTotal,
            LineItem::Co2Fee,
            LineItem::PlateFee,
            LineItem::Marbete,
            LineItem::DgiiTotal,
            LineItem::GrandTotal,
        ];
        ORDER
            .iter()
            .filter_map(|item| self.get(*item).map(|amount| (*item, amount)))
            .collect()
    }

    /// Whether every line item is non-negative in both currencies.
    pub fn is_non_negative(&self) -> bool {
        self.items().iter().all(|(_, amount)| amount.is_non_negative())
    }

    /// Copy with every amount rounded to cents, for display or export.
    pub fn rounded(&self) -> DutyBreakdown {
        DutyBreakdown {
            vehicle_value: self.vehicle_value.rounded(),
            insurance: self.insurance.rounded(),
            freight: self.freight.rounded(),
            other_charges: self.other_charges.rounded(),
            cif_total: self.cif_total.rounded(),
            gravamen: self.gravamen.rounded(),
            itbis: self.itbis.rounded(),
            customs_service_fee: self.customs_service_fee.rounded(),
            customs_declaration_fee: self.customs_declaration_fee.map(|a| a.rounded()),
            customs_total: self.customs_total.rounded(),
            co2_fee: self.co2_fee.rounded(),
            plate_fee: self.plate_fee.rounded(),
            marbete: self.marbete.rounded(),
            dgii_total: self.dgii_total.rounded(),
            grand_total: self.grand_total.rounded(),
            ..self.clone()
        }
    }
}

impl fmt::Display for DutyBreakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Duty Breakdown ===")?;
        writeln!(f, "Exchange rate: {}", self.exchange_rate)?;
        if self.gravamen_exempt {
            writeln!(f, "Origin exempt from gravamen")?;
        }
        writeln!(f)?;
        for (item, amount) in self.items() {
            if item.is_total() {
                writeln!(f, "{:-<62}", "")?;
            }
            writeln!(
                f,
                "{:<26} {:>16} {:>18}",
                item.label(),
                format_usd(amount.usd),
                format_local(amount.local)
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::parameters::DutyParameters;
    use crate::core::valuation::VehicleValuation;
    use crate::duty::calculator::compute_duty_breakdown;
    use rust_decimal_macros::dec;

    fn sample() -> DutyBreakdown {
        let valuation = VehicleValuation::new(dec!(10000), "Japan")
            .with_insurance(dec!(200))
            .with_freight(dec!(800));
        let params = DutyParameters::default().with_exchange_rate(dec!(60));
        compute_duty_breakdown(&valuation, &params).unwrap()
    }

    #[test]
    fn test_items_skip_missing_declaration_fee() {
        let breakdown = sample();
        let items = breakdown.items();
        assert_eq!(items.len(), 14);
        assert!(items
            .iter()
            .all(|(item, _)| *item != LineItem::CustomsDeclarationFee));
        assert_eq!(items.last().map(|(item, _)| *item), Some(LineItem::GrandTotal));
    }

    #[test]
    fn test_get_matches_fields() {
        let breakdown = sample();
        assert_eq!(breakdown.get(LineItem::CifTotal), Some(breakdown.cif_total));
        assert_eq!(breakdown.get(LineItem::CustomsDeclarationFee), None);
    }

    #[test]
    fn test_rounded_keeps_rate() {
        let breakdown = sample();
        let rounded = breakdown.rounded();
        assert_eq!(rounded.exchange_rate, breakdown.exchange_rate);
        assert_eq!(rounded.cif_total.local, dec!(660000));
    }

    #[test]
    fn test_display_lists_every_item() {
        let text = sample().to_string();
        assert!(text.contains("Gravamen"));
        assert!(text.contains("US$11,000.00"));
        assert!(text.contains("RD$660,000.00"));
        assert!(!text.contains("Customs declaration fee"));
    }

    #[test]
    fn test_serializes_snake_case_keys() {
        let json = serde_json::to_value(sample()).unwrap();
        assert!(json.get("cif_total").is_some());
        assert!(json.get("customs_declaration_fee").is_none());
    }
}
