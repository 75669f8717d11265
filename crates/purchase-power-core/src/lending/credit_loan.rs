use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::amortization::monthly_payment;
use crate::policy::{CreditLimitModel, CreditLoanPolicy};
use crate::types::Money;

const BASE_TIER_LABEL: &str = "기본";

/// Unsecured (신용대출) limit for one borrower.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditLoanInfo {
    pub eligible: bool,
    pub max_loan: Money,
    pub monthly_payment: Money,
    /// Score tier that set the cap, when a tiered model is in force.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl CreditLoanInfo {
    fn ineligible(reason: &str) -> Self {
        CreditLoanInfo {
            eligible: false,
            max_loan: Decimal::ZERO,
            monthly_payment: Decimal::ZERO,
            tier: None,
            reason: Some(reason.to_string()),
        }
    }
}

/// Size one borrower's unsecured loan.
///
/// Multi-property owners are refused outright. Otherwise the limit is the
/// income multiple, further held under the score-tier cap when the policy
/// uses tiers. The implied payment uses the policy's fixed rate and term,
/// independent of the mortgage.
pub fn calculate_credit_loan(
    opted_in: bool,
    pre_tax_annual: Money,
    credit_score: u32,
    multi_property_owner: bool,
    policy: &CreditLoanPolicy,
) -> CreditLoanInfo {
    if !opted_in {
        return CreditLoanInfo::ineligible("신용대출 미선택");
    }
    if multi_property_owner {
        return CreditLoanInfo::ineligible("다주택자는 신용대출 불가");
    }

    let income = pre_tax_annual.max(Decimal::ZERO);
    let (max_loan, tier) = match &policy.model {
        CreditLimitModel::ScoreTiers {
            income_multiple,
            base_cap,
            tiers,
        } => {
            let (label, cap) = tiers
                .iter()
                .rev()
                .find(|t| credit_score >= t.min_score)
                .map(|t| (t.label.clone(), t.cap))
                .unwrap_or_else(|| (BASE_TIER_LABEL.to_string(), *base_cap));
            ((income * *income_multiple).min(cap), Some(label))
        }
        CreditLimitModel::IncomeMultiple { income_multiple } => (income * *income_multiple, None),
    };

    CreditLoanInfo {
        eligible: true,
        max_loan,
        monthly_payment: monthly_payment(max_loan, policy.interest_rate, policy.term_years),
        tier,
        reason: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::PolicyConfig;
    use rust_decimal_macros::dec;

    fn policy() -> CreditLoanPolicy {
        PolicyConfig::default().credit_loan
    }

    #[test]
    fn test_not_opted_in() {
        let info = calculate_credit_loan(false, dec!(8000), 950, false, &policy());
        assert!(!info.eligible);
        assert_eq!(info.max_loan, Decimal::ZERO);
        assert_eq!(info.reason.as_deref(), Some("신용대출 미선택"));
    }

    #[test]
    fn test_multi_property_owner_refused() {
        let info = calculate_credit_loan(true, dec!(8000), 950, true, &policy());
        assert!(!info.eligible);
        assert_eq!(info.monthly_payment, Decimal::ZERO);
    }

    #[test]
    fn test_income_binds_below_tier_cap() {
        // 5000 * 50% = 2500 < base cap 5000
        let info = calculate_credit_loan(true, dec!(5000), 650, false, &policy());
        assert!(info.eligible);
        assert_eq!(info.max_loan, dec!(2500));
        assert_eq!(info.tier.as_deref(), Some("기본"));
        assert!(info.monthly_payment > Decimal::ZERO);
    }

    #[test]
    fn test_tier_cap_binds_for_high_income() {
        // 30000 * 50% = 15000, score 760 caps at 8000
        let info = calculate_credit_loan(true, dec!(30000), 760, false, &policy());
        assert_eq!(info.max_loan, dec!(8000));
        assert_eq!(info.tier.as_deref(), Some("양호"));
    }

    #[test]
    fn test_top_tier() {
        let info = calculate_credit_loan(true, dec!(40000), 900, false, &policy());
        assert_eq!(info.max_loan, dec!(15000));
        assert_eq!(info.tier.as_deref(), Some("최우수"));
    }

    #[test]
    fn test_income_multiple_model_ignores_score() {
        let mut p = policy();
        p.model = CreditLimitModel::IncomeMultiple {
            income_multiple: dec!(0.5),
        };
        let low = calculate_credit_loan(true, dec!(30000), 400, false, &p);
        let high = calculate_credit_loan(true, dec!(30000), 950, false, &p);
        assert_eq!(low.max_loan, dec!(15000));
        assert_eq!(low.max_loan, high.max_loan);
        assert!(low.tier.is_none());
    }
}
