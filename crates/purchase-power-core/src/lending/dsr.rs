use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::amortization::principal_for_payment;
use crate::policy::DsrPolicy;
use crate::types::{LoanTerm, Money, Rate};

/// Debt-service-ratio ceiling, both as a payment and as the principal it
/// supports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DsrLimit {
    pub annual_income: Money,
    pub ratio: Rate,
    pub max_annual_payment: Money,
    pub max_monthly_payment: Money,
    pub reference_rate: Rate,
    pub term_years: u32,
    pub max_loan: Money,
}

/// Largest principal whose level payment at `reference_rate` stays within
/// `ratio` of gross annual income.
pub fn max_loan_by_dsr(annual_income: Money, ratio: Rate, reference_rate: Rate, term_years: u32) -> Money {
    let max_monthly = annual_income.max(Decimal::ZERO) * ratio / dec!(12);
    principal_for_payment(max_monthly, reference_rate, term_years)
}

/// DSR ceiling for a household, with the reference rate resolved against
/// the quoted mortgage rate.
pub fn dsr_limit(annual_income: Money, term: LoanTerm, mortgage_rate: Rate, policy: &DsrPolicy) -> DsrLimit {
    let reference_rate = policy.resolve_rate(mortgage_rate);
    let annual_income = annual_income.max(Decimal::ZERO);
    let max_annual_payment = annual_income * policy.ratio;

    DsrLimit {
        annual_income,
        ratio: policy.ratio,
        max_annual_payment,
        max_monthly_payment: max_annual_payment / dec!(12),
        reference_rate,
        term_years: term.years(),
        max_loan: max_loan_by_dsr(annual_income, policy.ratio, reference_rate, term.years()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amortization::monthly_payment;
    use crate::policy::{DsrReferenceRate, PolicyConfig};

    #[test]
    fn test_zero_income_zero_loan() {
        assert_eq!(max_loan_by_dsr(Decimal::ZERO, dec!(0.4), dec!(0.04), 30), Decimal::ZERO);
    }

    #[test]
    fn test_zero_rate_is_payment_times_periods() {
        // 6000 * 40% / 12 = 200 per month, 360 months
        assert_eq!(max_loan_by_dsr(dec!(6000), dec!(0.4), Decimal::ZERO, 30), dec!(72000));
    }

    #[test]
    fn test_limit_reproduces_payment_ceiling() {
        let limit = dsr_limit(dec!(5000), LoanTerm::Years30, dec!(0.04), &PolicyConfig::default().dsr);
        let pmt = monthly_payment(limit.max_loan, limit.reference_rate, 30);
        assert!((pmt - limit.max_monthly_payment).abs() < dec!(0.0000001), "got {pmt}");
    }

    #[test]
    fn test_fixed_reference_rate_overrides_mortgage_rate() {
        let mut policy = PolicyConfig::default().dsr;
        policy.reference_rate = DsrReferenceRate::Fixed(dec!(0.045));
        let fixed = dsr_limit(dec!(5000), LoanTerm::Years30, dec!(0.03), &policy);
        assert_eq!(fixed.reference_rate, dec!(0.045));

        let floating = dsr_limit(dec!(5000), LoanTerm::Years30, dec!(0.03), &PolicyConfig::default().dsr);
        // A lower reference rate supports a larger principal
        assert!(floating.max_loan > fixed.max_loan);
    }

    #[test]
    fn test_longer_term_supports_more() {
        let dsr = PolicyConfig::default().dsr;
        let short = dsr_limit(dec!(5000), LoanTerm::Years10, dec!(0.04), &dsr);
        let long = dsr_limit(dec!(5000), LoanTerm::Years30, dec!(0.04), &dsr);
        assert!(long.max_loan > short.max_loan);
    }
}
