use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use purchase_power_core::lending::credit_loan::calculate_credit_loan;
use purchase_power_core::lending::dsr::dsr_limit;
use purchase_power_core::policy::PolicyConfig;
use purchase_power_core::{validate_rate, LoanTerm};

/// Arguments for the DSR ceiling
#[derive(Args)]
pub struct DsrArgs {
    /// Household pre-tax annual income in 만원
    #[arg(long)]
    pub annual_income: Decimal,

    /// Loan term in years: 10, 15, 20 or 30
    #[arg(long, default_value_t = 30)]
    pub term: u32,

    /// Mortgage interest rate as a decimal (0.04 = 4%)
    #[arg(long)]
    pub rate: Decimal,
}

/// Arguments for one borrower's unsecured loan
#[derive(Args)]
pub struct CreditLoanArgs {
    /// Borrower pre-tax annual income in 만원
    #[arg(long)]
    pub annual_income: Decimal,

    /// Credit score
    #[arg(long, default_value_t = 700)]
    pub credit_score: u32,

    /// Borrower already owns more than one home
    #[arg(long)]
    pub multi_property: bool,
}

pub fn run_dsr(args: DsrArgs, policy: &PolicyConfig) -> Result<Value, Box<dyn std::error::Error>> {
    if args.annual_income < Decimal::ZERO {
        return Err("--annual-income cannot be negative".into());
    }
    validate_rate("rate", args.rate)?;
    let term = LoanTerm::try_from(args.term)?;
    let limit = dsr_limit(args.annual_income, term, args.rate, &policy.dsr);
    Ok(json!({ "result": limit }))
}

pub fn run_credit_loan(
    args: CreditLoanArgs,
    policy: &PolicyConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let credit = &policy.credit_loan;
    if !(credit.min_score..=credit.max_score).contains(&args.credit_score) {
        return Err(format!(
            "--credit-score must be between {} and {}",
            credit.min_score, credit.max_score
        )
        .into());
    }

    let info = calculate_credit_loan(
        true,
        args.annual_income,
        args.credit_score,
        args.multi_property,
        credit,
    );
    Ok(json!({ "result": info }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use purchase_power_core::PurchasePowerError;

    fn dsr_args(rate: &str) -> DsrArgs {
        DsrArgs {
            annual_income: Decimal::from(5000),
            term: 30,
            rate: rate.parse().unwrap(),
        }
    }

    fn rejected_field(rate: &str) -> String {
        let err = run_dsr(dsr_args(rate), &PolicyConfig::default()).unwrap_err();
        match err.downcast_ref::<PurchasePowerError>() {
            Some(PurchasePowerError::InvalidInput { field, .. }) => field.clone(),
            other => panic!("expected InvalidInput for rate {rate}, got {other:?}"),
        }
    }

    #[test]
    fn test_dsr_rejects_negative_rate() {
        assert_eq!(rejected_field("-12"), "rate");
    }

    #[test]
    fn test_dsr_rejects_percent_written_rate() {
        assert_eq!(rejected_field("4.0"), "rate");
    }

    #[test]
    fn test_dsr_accepts_decimal_rate() {
        let value = run_dsr(dsr_args("0.04"), &PolicyConfig::default()).unwrap();
        assert_eq!(value["result"]["term_years"], 30);
    }
}
