use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::PurchasePowerError;
use crate::policy::PolicyConfig;
use crate::types::{validate_rate, LoanTerm, Money, Rate, Region};
use crate::PurchasePowerResult;

fn default_credit_score() -> u32 {
    700
}

/// One earner's income and unsecured-loan preference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Borrower {
    /// 세후 월소득
    pub monthly_income_after_tax: Money,
    /// 세전 연봉, used for DSR and eligibility tests
    pub pre_tax_annual_income: Money,
    #[serde(default)]
    pub use_credit_loan: bool,
    #[serde(default = "default_credit_score")]
    pub credit_score: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BorrowerRole {
    Applicant,
    Spouse,
}

/// Filing structure. Joint households carry both earners explicitly so a
/// spouse can never be half-specified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Household {
    Single { applicant: Borrower },
    Joint { applicant: Borrower, spouse: Borrower },
}

impl Household {
    pub fn is_joint(&self) -> bool {
        matches!(self, Household::Joint { .. })
    }

    pub fn borrowers(&self) -> Vec<(BorrowerRole, &Borrower)> {
        match self {
            Household::Single { applicant } => vec![(BorrowerRole::Applicant, applicant)],
            Household::Joint { applicant, spouse } => vec![
                (BorrowerRole::Applicant, applicant),
                (BorrowerRole::Spouse, spouse),
            ],
        }
    }

    pub fn monthly_income_after_tax(&self) -> Money {
        self.borrowers()
            .iter()
            .map(|(_, b)| b.monthly_income_after_tax)
            .sum()
    }

    pub fn pre_tax_annual_income(&self) -> Money {
        self.borrowers()
            .iter()
            .map(|(_, b)| b.pre_tax_annual_income)
            .sum()
    }
}

/// Everything the engine needs for one calculation. Amounts are in 만원.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationInput {
    pub household: Household,
    pub savings: Money,
    /// 부모 증여
    #[serde(default)]
    pub parent_gift: Money,
    #[serde(default)]
    pub other_assets: Money,
    #[serde(default)]
    pub emergency_fund: Money,
    #[serde(default)]
    pub interior_cost: Money,
    #[serde(default)]
    pub moving_cost: Money,
    pub target_region: Region,
    pub loan_term: LoanTerm,
    /// Quoted mortgage rate as a decimal (0.04 = 4%).
    pub interest_rate: Rate,
    /// Price to evaluate instead of searching for the maximum. Zero means
    /// unspecified.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_price: Option<Money>,
}

impl CalculationInput {
    pub fn total_assets(&self) -> Money {
        self.savings + self.parent_gift + self.other_assets
    }

    /// Costs set aside before any loan sizing.
    pub fn reserved_costs(&self) -> Money {
        self.emergency_fund + self.interior_cost + self.moving_cost
    }

    pub fn target_price(&self) -> Option<Money> {
        self.target_price.filter(|p| *p > Decimal::ZERO)
    }

    /// Boundary validation. Everything the engine assumes about its input is
    /// checked here, so a rejected input never reaches the arithmetic.
    pub fn validate(&self, policy: &PolicyConfig) -> PurchasePowerResult<()> {
        for (role, borrower) in self.household.borrowers() {
            let prefix = match role {
                BorrowerRole::Applicant => "applicant",
                BorrowerRole::Spouse => "spouse",
            };
            if borrower.monthly_income_after_tax <= Decimal::ZERO {
                return Err(PurchasePowerError::InvalidInput {
                    field: format!("{prefix}.monthly_income_after_tax"),
                    reason: "After-tax monthly income must be positive".into(),
                });
            }
            if borrower.pre_tax_annual_income <= Decimal::ZERO {
                return Err(PurchasePowerError::InvalidInput {
                    field: format!("{prefix}.pre_tax_annual_income"),
                    reason: "Pre-tax annual income must be positive".into(),
                });
            }
            let credit = &policy.credit_loan;
            if borrower.use_credit_loan
                && !(credit.min_score..=credit.max_score).contains(&borrower.credit_score)
            {
                return Err(PurchasePowerError::InvalidInput {
                    field: format!("{prefix}.credit_score"),
                    reason: format!(
                        "Credit score must be between {} and {}",
                        credit.min_score, credit.max_score
                    ),
                });
            }
        }

        let amounts = [
            ("savings", self.savings),
            ("parent_gift", self.parent_gift),
            ("other_assets", self.other_assets),
            ("emergency_fund", self.emergency_fund),
            ("interior_cost", self.interior_cost),
            ("moving_cost", self.moving_cost),
            ("target_price", self.target_price.unwrap_or(Decimal::ZERO)),
        ];
        for (field, value) in amounts {
            if value < Decimal::ZERO {
                return Err(PurchasePowerError::InvalidInput {
                    field: field.into(),
                    reason: "Amount cannot be negative".into(),
                });
            }
        }

        validate_rate("interest_rate", self.interest_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn borrower(monthly: Money, annual: Money) -> Borrower {
        Borrower {
            monthly_income_after_tax: monthly,
            pre_tax_annual_income: annual,
            use_credit_loan: false,
            credit_score: 700,
        }
    }

    fn single_input() -> CalculationInput {
        CalculationInput {
            household: Household::Single {
                applicant: borrower(dec!(400), dec!(5000)),
            },
            savings: dec!(30000),
            parent_gift: Decimal::ZERO,
            other_assets: Decimal::ZERO,
            emergency_fund: dec!(1000),
            interior_cost: dec!(1000),
            moving_cost: dec!(100),
            target_region: Region::Seoul,
            loan_term: LoanTerm::Years30,
            interest_rate: dec!(0.04),
            target_price: None,
        }
    }

    #[test]
    fn test_valid_single_input() {
        single_input().validate(&PolicyConfig::default()).unwrap();
    }

    #[test]
    fn test_joint_with_zero_spouse_income_rejected() {
        let mut input = single_input();
        input.household = Household::Joint {
            applicant: borrower(dec!(400), dec!(5000)),
            spouse: borrower(Decimal::ZERO, Decimal::ZERO),
        };
        match input.validate(&PolicyConfig::default()) {
            Err(PurchasePowerError::InvalidInput { field, .. }) => {
                assert_eq!(field, "spouse.monthly_income_after_tax")
            }
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_negative_asset_rejected() {
        let mut input = single_input();
        input.savings = dec!(-1);
        assert!(input.validate(&PolicyConfig::default()).is_err());
    }

    #[test]
    fn test_percent_rate_rejected() {
        let mut input = single_input();
        input.interest_rate = dec!(4.0);
        assert!(input.validate(&PolicyConfig::default()).is_err());
    }

    #[test]
    fn test_credit_score_checked_only_when_opted_in() {
        let mut input = single_input();
        if let Household::Single { applicant } = &mut input.household {
            applicant.credit_score = 100;
        }
        input.validate(&PolicyConfig::default()).unwrap();

        if let Household::Single { applicant } = &mut input.household {
            applicant.use_credit_loan = true;
        }
        assert!(input.validate(&PolicyConfig::default()).is_err());
    }

    #[test]
    fn test_zero_target_price_means_unspecified() {
        let mut input = single_input();
        input.target_price = Some(Decimal::ZERO);
        assert_eq!(input.target_price(), None);
        input.target_price = Some(dec!(50000));
        assert_eq!(input.target_price(), Some(dec!(50000)));
    }

    #[test]
    fn test_joint_income_sums() {
        let household = Household::Joint {
            applicant: borrower(dec!(400), dec!(5000)),
            spouse: borrower(dec!(300), dec!(4000)),
        };
        assert!(household.is_joint());
        assert_eq!(household.monthly_income_after_tax(), dec!(700));
        assert_eq!(household.pre_tax_annual_income(), dec!(9000));
    }

    #[test]
    fn test_deserializes_tagged_household() {
        let json = r#"{
            "household": {
                "type": "single",
                "applicant": {
                    "monthly_income_after_tax": "400",
                    "pre_tax_annual_income": "5000"
                }
            },
            "savings": "30000",
            "target_region": "seoul",
            "loan_term": 30,
            "interest_rate": "0.04"
        }"#;
        let input: CalculationInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.loan_term, LoanTerm::Years30);
        assert_eq!(input.reserved_costs(), Decimal::ZERO);
        assert!(!input.household.is_joint());
    }
}
