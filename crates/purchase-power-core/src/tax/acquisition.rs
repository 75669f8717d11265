use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::policy::{AcquisitionTaxPolicy, ExemptionOrder, TaxBand};
use crate::types::{Money, Rate};

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// 취득세 breakdown for one purchase price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcquisitionTaxBreakdown {
    /// Progressive transfer tax before any exemption.
    pub base_tax: Money,
    /// 지방교육세
    pub education_tax: Money,
    /// 농어촌특별세. Not levied by this engine and always zero.
    pub special_tax: Money,
    /// Total before the first-time-buyer exemption.
    pub subtotal: Money,
    pub exemption: Money,
    pub final_tax: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Marginal tax across the configured bands: each band's rate applies only
/// to the slice of the price that falls inside it.
pub fn progressive_base_tax(price: Money, bands: &[TaxBand]) -> Money {
    let mut tax = Decimal::ZERO;
    let mut lower = Decimal::ZERO;

    for band in bands {
        if price <= lower {
            break;
        }
        let upper = match band.upper_bound {
            Some(bound) => price.min(bound),
            None => price,
        };
        tax += (upper - lower) * band.rate;
        match band.upper_bound {
            Some(bound) => lower = bound,
            None => break,
        }
    }

    tax
}

/// Acquisition tax on `price`, with the first-time-buyer exemption taken
/// in the order the policy prescribes. The net tax never goes below zero.
pub fn calculate_acquisition_tax(
    price: Money,
    first_time_buyer: bool,
    policy: &AcquisitionTaxPolicy,
) -> AcquisitionTaxBreakdown {
    let price = price.max(Decimal::ZERO);
    let base_tax = progressive_base_tax(price, &policy.bands);
    let special_tax = Decimal::ZERO;

    let cap = if first_time_buyer {
        policy.first_time_exemption_cap
    } else {
        Decimal::ZERO
    };

    match policy.exemption_order {
        ExemptionOrder::AfterSurtax => {
            let education_tax = base_tax * policy.education_surtax_rate;
            let subtotal = base_tax + education_tax + special_tax;
            let exemption = subtotal.min(cap);
            AcquisitionTaxBreakdown {
                base_tax,
                education_tax,
                special_tax,
                subtotal,
                exemption,
                final_tax: subtotal - exemption,
            }
        }
        ExemptionOrder::BeforeSurtax => {
            let exemption = base_tax.min(cap);
            let education_tax = (base_tax - exemption) * policy.education_surtax_rate;
            let subtotal = base_tax + education_tax + special_tax;
            AcquisitionTaxBreakdown {
                base_tax,
                education_tax,
                special_tax,
                subtotal,
                exemption,
                final_tax: subtotal - exemption,
            }
        }
    }
}

/// Registration fee (등기비) at a flat rate of price.
pub fn registration_fee(price: Money, rate: Rate) -> Money {
    price.max(Decimal::ZERO) * rate
}
