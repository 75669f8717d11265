use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::policy::{PolicyConfig, NO_MORTGAGE_CAP};
use crate::regulation::regions::ltv_loan_limit;
use crate::types::{format_price, Money, Rate, Region};
use crate::PurchasePowerResult;

/// How far the same cash budget reaches in one region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionalFeasibility {
    pub region: Region,
    pub name: String,
    pub ltv_standard: Rate,
    pub ltv_first_time: Rate,
    /// The ceiling that applies to this household.
    pub ltv_applied: Rate,
    /// Price at which the budget exactly covers the non-LTV share:
    /// `budget / (1 − LTV)`.
    pub max_price_by_ltv: Money,
    /// Same, with the loan additionally held under the regional cap.
    pub max_price_with_cap: Money,
    pub feasible: bool,
    pub reason: String,
}

/// Maximum reachable price in each of the four regions for `budget`.
/// Income (DSR) is deliberately left out; this compares regulation only.
pub fn regional_feasibility(
    budget: Money,
    first_time_buyer: bool,
    policy: &PolicyConfig,
) -> PurchasePowerResult<Vec<RegionalFeasibility>> {
    let budget = budget.max(Decimal::ZERO);

    Region::ALL
        .into_iter()
        .map(|region| {
            let entry = policy.region(region)?;
            let ltv = if first_time_buyer {
                entry.ltv_first_time
            } else {
                entry.ltv_standard
            };

            let loan_by_ltv = ltv_loan_limit(budget, ltv)?;
            let max_price_by_ltv = budget + loan_by_ltv;
            let max_price_with_cap = if entry.mortgage_cap < NO_MORTGAGE_CAP {
                budget + loan_by_ltv.min(entry.mortgage_cap)
            } else {
                max_price_by_ltv
            };

            let feasible = max_price_with_cap > Decimal::ZERO;
            let reason = if feasible {
                format!("최대 {} 구매 가능", format_price(max_price_with_cap))
            } else {
                "가용 예산 부족".to_string()
            };

            Ok(RegionalFeasibility {
                region,
                name: entry.short_name.clone(),
                ltv_standard: entry.ltv_standard,
                ltv_first_time: entry.ltv_first_time,
                ltv_applied: ltv,
                max_price_by_ltv,
                max_price_with_cap,
                feasible,
                reason,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_four_regions_in_order() {
        let rows = regional_feasibility(dec!(20000), true, &PolicyConfig::default()).unwrap();
        let regions: Vec<Region> = rows.iter().map(|r| r.region).collect();
        assert_eq!(regions, Region::ALL.to_vec());
    }

    #[test]
    fn test_ltv_price_multiplier() {
        // 2억 at 80% LTV reaches 10억 before the cap, 2억 + 6억 with it
        let rows = regional_feasibility(dec!(20000), true, &PolicyConfig::default()).unwrap();
        let seoul = &rows[0];
        assert_eq!(seoul.max_price_by_ltv, dec!(100000));
        assert_eq!(seoul.max_price_with_cap, dec!(80000));
        assert!(seoul.feasible);
    }

    #[test]
    fn test_uncapped_region_ignores_sentinel() {
        let rows = regional_feasibility(dec!(30000), true, &PolicyConfig::default()).unwrap();
        let other = &rows[3];
        assert_eq!(other.max_price_with_cap, other.max_price_by_ltv);
    }

    #[test]
    fn test_zero_budget_infeasible() {
        let rows = regional_feasibility(Decimal::ZERO, true, &PolicyConfig::default()).unwrap();
        assert!(rows.iter().all(|r| !r.feasible));
        assert_eq!(rows[0].reason, "가용 예산 부족");
    }
}
