use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::PurchasePowerError;
use crate::policy::{PolicyConfig, NO_MORTGAGE_CAP};
use crate::types::{Money, Rate, Region};
use crate::PurchasePowerResult;

/// Regulatory terms that apply to one region for one buyer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegulationInfo {
    pub region: Region,
    pub region_name: String,
    pub is_regulated: bool,
    /// Absolute mortgage ceiling. Unregulated regions carry a large sentinel.
    pub mortgage_cap: Money,
    pub has_mortgage_cap: bool,
    pub ltv_limit: Rate,
    pub stress_test_rate: Rate,
    pub details: String,
}

/// Look up the regulation entry for `region`, picking the first-time or
/// standard LTV ceiling.
pub fn regulation_info(
    region: Region,
    first_time_buyer: bool,
    policy: &PolicyConfig,
) -> PurchasePowerResult<RegulationInfo> {
    let entry = policy.region(region)?;
    let ltv_limit = if first_time_buyer {
        entry.ltv_first_time
    } else {
        entry.ltv_standard
    };

    Ok(RegulationInfo {
        region,
        region_name: entry.name.clone(),
        is_regulated: entry.regulated,
        mortgage_cap: entry.mortgage_cap,
        has_mortgage_cap: entry.mortgage_cap < NO_MORTGAGE_CAP,
        ltv_limit,
        stress_test_rate: entry.stress_test_rate,
        details: entry.details.clone(),
    })
}

/// Largest loan an LTV ceiling allows when `budget` is the whole equity
/// share: `budget · LTV / (1 − LTV)`.
pub fn ltv_loan_limit(budget: Money, ltv: Rate) -> PurchasePowerResult<Money> {
    let equity_share = Decimal::ONE - ltv;
    (budget.max(Decimal::ZERO) * ltv)
        .checked_div(equity_share)
        .filter(|_| equity_share > Decimal::ZERO)
        .ok_or_else(|| PurchasePowerError::DivisionByZero {
            context: format!("LTV loan limit at LTV {ltv}"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_seoul_first_time() {
        let info = regulation_info(Region::Seoul, true, &PolicyConfig::default()).unwrap();
        assert!(info.is_regulated);
        assert!(info.has_mortgage_cap);
        assert_eq!(info.mortgage_cap, dec!(60000));
        assert_eq!(info.ltv_limit, dec!(0.8));
    }

    #[test]
    fn test_seoul_repeat_buyer_gets_lower_ltv() {
        let info = regulation_info(Region::Seoul, false, &PolicyConfig::default()).unwrap();
        assert_eq!(info.ltv_limit, dec!(0.5));
    }

    #[test]
    fn test_other_region_uncapped() {
        let info = regulation_info(Region::Other, true, &PolicyConfig::default()).unwrap();
        assert!(!info.is_regulated);
        assert!(!info.has_mortgage_cap);
        assert_eq!(info.ltv_limit, dec!(0.85));
    }

    #[test]
    fn test_ltv_loan_limit() {
        // 1억 equity at 80% LTV supports a 4억 loan
        assert_eq!(ltv_loan_limit(dec!(10000), dec!(0.8)).unwrap(), dec!(40000));
        assert_eq!(ltv_loan_limit(dec!(-5), dec!(0.8)).unwrap(), Decimal::ZERO);
        assert!(ltv_loan_limit(dec!(10000), Decimal::ONE).is_err());
    }

    #[test]
    fn test_first_time_ltv_never_lower() {
        let policy = PolicyConfig::default();
        for region in Region::ALL {
            let first = regulation_info(region, true, &policy).unwrap();
            let repeat = regulation_info(region, false, &policy).unwrap();
            assert!(first.ltv_limit >= repeat.ltv_limit, "{region}");
        }
    }
}
