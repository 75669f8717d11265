use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use purchase_power_core::policy::PolicyConfig;
use purchase_power_core::purchase_power::calculator::analyze_purchase_power_with_policy;
use purchase_power_core::purchase_power::input::{Borrower, CalculationInput, Household};
use purchase_power_core::{LoanTerm, Region};

use crate::input;

/// Arguments for the full purchase-power calculation. Amounts are in 만원.
#[derive(Args)]
pub struct CalculateArgs {
    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Applicant after-tax monthly income
    #[arg(long)]
    pub monthly_income: Option<Decimal>,

    /// Applicant pre-tax annual income
    #[arg(long)]
    pub annual_income: Option<Decimal>,

    /// Applicant takes an unsecured credit loan
    #[arg(long)]
    pub credit_loan: bool,

    /// Applicant credit score
    #[arg(long, default_value_t = 700)]
    pub credit_score: u32,

    /// Spouse after-tax monthly income (switches to a joint household)
    #[arg(long)]
    pub spouse_monthly_income: Option<Decimal>,

    /// Spouse pre-tax annual income
    #[arg(long)]
    pub spouse_annual_income: Option<Decimal>,

    /// Spouse takes an unsecured credit loan
    #[arg(long)]
    pub spouse_credit_loan: bool,

    /// Spouse credit score
    #[arg(long, default_value_t = 700)]
    pub spouse_credit_score: u32,

    /// Savings
    #[arg(long)]
    pub savings: Option<Decimal>,

    /// Expected gift from parents
    #[arg(long, default_value = "0")]
    pub parent_gift: Decimal,

    /// Other liquid assets
    #[arg(long, default_value = "0")]
    pub other_assets: Decimal,

    /// Emergency fund kept aside
    #[arg(long, default_value = "0")]
    pub emergency_fund: Decimal,

    /// Interior budget
    #[arg(long, default_value = "0")]
    pub interior_cost: Decimal,

    /// Moving costs
    #[arg(long, default_value = "0")]
    pub moving_cost: Decimal,

    /// Target region: seoul, gyeonggi, metropolitan, other
    #[arg(long, default_value = "seoul")]
    pub region: Region,

    /// Loan term in years: 10, 15, 20 or 30
    #[arg(long, default_value_t = 30)]
    pub term: u32,

    /// Mortgage interest rate as a decimal (0.04 = 4%)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Evaluate this price instead of searching for the maximum
    #[arg(long)]
    pub target_price: Option<Decimal>,
}

pub fn run_calculate(
    args: CalculateArgs,
    policy: &PolicyConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let calc_input: CalculationInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        input_from_flags(args)?
    };

    let output = analyze_purchase_power_with_policy(&calc_input, policy)?;
    Ok(serde_json::to_value(output)?)
}

fn input_from_flags(args: CalculateArgs) -> Result<CalculationInput, Box<dyn std::error::Error>> {
    let applicant = Borrower {
        monthly_income_after_tax: args
            .monthly_income
            .ok_or("--monthly-income is required (or provide --input)")?,
        pre_tax_annual_income: args
            .annual_income
            .ok_or("--annual-income is required (or provide --input)")?,
        use_credit_loan: args.credit_loan,
        credit_score: args.credit_score,
    };

    let household = match (args.spouse_monthly_income, args.spouse_annual_income) {
        (None, None) => Household::Single { applicant },
        (monthly, annual) => Household::Joint {
            applicant,
            spouse: Borrower {
                monthly_income_after_tax: monthly.unwrap_or(Decimal::ZERO),
                pre_tax_annual_income: annual.unwrap_or(Decimal::ZERO),
                use_credit_loan: args.spouse_credit_loan,
                credit_score: args.spouse_credit_score,
            },
        },
    };

    Ok(CalculationInput {
        household,
        savings: args
            .savings
            .ok_or("--savings is required (or provide --input)")?,
        parent_gift: args.parent_gift,
        other_assets: args.other_assets,
        emergency_fund: args.emergency_fund,
        interior_cost: args.interior_cost,
        moving_cost: args.moving_cost,
        target_region: args.region,
        loan_term: LoanTerm::try_from(args.term)?,
        interest_rate: args.rate.ok_or("--rate is required (or provide --input)")?,
        target_price: args.target_price,
    })
}
