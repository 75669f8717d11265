use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, warn};

use crate::amortization::{monthly_payment, total_interest};
use crate::lending::credit_loan::{calculate_credit_loan, CreditLoanInfo};
use crate::lending::dsr::{dsr_limit, DsrLimit};
use crate::lending::government::{evaluate_government_loans, GovernmentLoanProduct};
use crate::policy::{PaymentPolicy, PolicyConfig};
use crate::purchase_power::input::{BorrowerRole, CalculationInput};
use crate::purchase_power::rationale::{assess_target, explain, LoanLimits, Rationale};
use crate::purchase_power::solver::{
    at_target_price, solve_purchase_price, SolverContext, SolverDiagnostics,
};
use crate::regulation::feasibility::{regional_feasibility, RegionalFeasibility};
use crate::regulation::first_time::is_first_time_eligible;
use crate::regulation::regions::{ltv_loan_limit, regulation_info, RegulationInfo};
use crate::tax::acquisition::AcquisitionTaxBreakdown;
use crate::types::{format_price, with_metadata, ComputationOutput, LoanTerm, Money, Rate};
use crate::PurchasePowerResult;

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeSummary {
    pub is_joint: bool,
    pub monthly_after_tax: Money,
    pub annual_after_tax: Money,
    pub pre_tax_annual: Money,
}

/// Each asset and deduction line that feeds the available budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub savings: Money,
    pub parent_gift: Money,
    pub other_assets: Money,
    pub total_assets: Money,
    pub emergency_fund: Money,
    pub interior_cost: Money,
    pub moving_cost: Money,
    pub acquisition_tax: Money,
    pub registration_fee: Money,
    pub total_deductions: Money,
    pub available_budget: Money,
    /// Deductions in excess of assets; zero when the budget is positive.
    pub budget_shortfall: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanInfo {
    pub ltv: Rate,
    pub ltv_loan_limit: Money,
    pub dsr_loan_limit: Money,
    pub regulatory_cap: Money,
    pub has_regulatory_cap: bool,
    /// `min(LTV limit, regulatory cap)`, ignoring income.
    pub max_loan_at_cap: Money,
    /// `min(LTV limit, regulatory cap, DSR limit)`
    pub max_loan: Money,
    pub interest_rate: Rate,
    pub loan_term: LoanTerm,
    pub monthly_payment: Money,
    pub payment_rate_min: Rate,
    pub payment_rate_max: Rate,
    pub monthly_payment_min: Money,
    pub monthly_payment_max: Money,
    pub total_interest: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BorrowerCreditLoan {
    pub role: BorrowerRole,
    #[serde(flatten)]
    pub loan: CreditLoanInfo,
}

/// Headline prices, from cash alone up to every lever pulled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchasePowerSummary {
    pub cash_only: Money,
    /// Budget plus the income-constrained mortgage.
    pub with_mortgage: Money,
    /// Budget plus the mortgage the regulation alone would allow.
    pub at_regulatory_cap: Money,
    pub with_credit_loan: Money,
    pub recommended_price: Money,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BurdenLevel {
    Comfortable,
    Moderate,
    Heavy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentBurden {
    /// Minimum monthly payment over after-tax monthly income.
    pub ratio: Rate,
    pub percent: Decimal,
    pub level: BurdenLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub first_time_buyer: bool,
    pub income: IncomeSummary,
    pub costs: CostBreakdown,
    pub acquisition_tax: AcquisitionTaxBreakdown,
    pub regulation: RegulationInfo,
    pub dsr: DsrLimit,
    pub loan: LoanInfo,
    pub credit_loans: Vec<BorrowerCreditLoan>,
    pub credit_loan_total: Money,
    pub credit_loan_monthly_payment: Money,
    pub purchase_power: PurchasePowerSummary,
    pub payment_burden: PaymentBurden,
    pub government_loans: Vec<GovernmentLoanProduct>,
    pub regional_feasibility: Vec<RegionalFeasibility>,
    pub rationale: Rationale,
    pub solver: SolverDiagnostics,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Run the full pipeline under the default (2025) policy, wrapped in the
/// standard output envelope.
pub fn analyze_purchase_power(
    input: &CalculationInput,
) -> PurchasePowerResult<ComputationOutput<CalculationResult>> {
    analyze_purchase_power_with_policy(input, &PolicyConfig::default())
}

pub fn analyze_purchase_power_with_policy(
    input: &CalculationInput,
    policy: &PolicyConfig,
) -> PurchasePowerResult<ComputationOutput<CalculationResult>> {
    let start = Instant::now();
    let result = calculate(input, policy)?;
    let warnings = result_warnings(&result);

    let assumptions = serde_json::json!({
        "region": input.target_region,
        "ltv": result.loan.ltv.to_string(),
        "dsr_ratio": policy.dsr.ratio.to_string(),
        "dsr_reference_rate": result.dsr.reference_rate.to_string(),
        "loan_term_years": input.loan_term.years(),
        "first_time_buyer": result.first_time_buyer,
        "exemption_order": policy.acquisition_tax.exemption_order,
    });

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Fixed-point purchase price with progressive acquisition tax; loan = min(LTV, DSR, regulatory cap)",
        &assumptions,
        warnings,
        elapsed,
        result,
    ))
}

/// Compute the purchase-power result for one household.
///
/// The result depends only on `input` and `policy`; calling twice with the
/// same arguments yields equal values.
pub fn calculate(
    input: &CalculationInput,
    policy: &PolicyConfig,
) -> PurchasePowerResult<CalculationResult> {
    policy.validate()?;
    input.validate(policy)?;

    let household = &input.household;
    let joint = household.is_joint();
    let monthly_after_tax = household.monthly_income_after_tax();
    let pre_tax_annual = household.pre_tax_annual_income();
    let income = IncomeSummary {
        is_joint: joint,
        monthly_after_tax,
        annual_after_tax: monthly_after_tax * dec!(12),
        pre_tax_annual,
    };

    let first_time_buyer = is_first_time_eligible(pre_tax_annual, joint, &policy.first_time_buyer);
    let regulation = regulation_info(input.target_region, first_time_buyer, policy)?;
    let dsr = dsr_limit(pre_tax_annual, input.loan_term, input.interest_rate, &policy.dsr);

    debug!(
        region = %input.target_region,
        first_time_buyer,
        ltv = %regulation.ltv_limit,
        dsr_max_loan = %dsr.max_loan,
        "starting purchase power calculation"
    );

    // --- Price / cost fixed point ---
    let ctx = SolverContext {
        total_assets: input.total_assets(),
        reserved_costs: input.reserved_costs(),
        first_time_buyer,
        ltv: regulation.ltv_limit,
        dsr_max_loan: dsr.max_loan,
        tax_policy: &policy.acquisition_tax,
        registration_fee_rate: policy.registration_fee_rate,
        settings: &policy.solver,
    };
    let outcome = match input.target_price() {
        Some(target) => at_target_price(target, &ctx)?,
        None => solve_purchase_price(&ctx)?,
    };
    let estimate = outcome.estimate;
    let budget = estimate.available_budget;

    if estimate.budget_shortfall > Decimal::ZERO {
        warn!(
            shortfall = %estimate.budget_shortfall,
            price = %estimate.price,
            "reserved and transaction costs exceed total assets"
        );
    }

    // --- Loan limits ---
    let ltv_loan = ltv_loan_limit(budget, regulation.ltv_limit)?;
    let max_loan_at_cap = ltv_loan.min(regulation.mortgage_cap);
    let max_loan = max_loan_at_cap.min(dsr.max_loan);
    let loan = loan_info(
        &regulation,
        &dsr,
        ltv_loan,
        max_loan_at_cap,
        max_loan,
        input,
        &policy.payment,
    );

    // --- Unsecured loans ---
    let credit_loans: Vec<BorrowerCreditLoan> = household
        .borrowers()
        .into_iter()
        .map(|(role, borrower)| BorrowerCreditLoan {
            role,
            loan: calculate_credit_loan(
                borrower.use_credit_loan,
                borrower.pre_tax_annual_income,
                borrower.credit_score,
                false,
                &policy.credit_loan,
            ),
        })
        .collect();
    let credit_loan_total: Money = credit_loans.iter().map(|c| c.loan.max_loan).sum();
    let credit_loan_monthly_payment: Money =
        credit_loans.iter().map(|c| c.loan.monthly_payment).sum();

    let with_mortgage = budget + max_loan;
    let purchase_power = PurchasePowerSummary {
        cash_only: budget,
        with_mortgage,
        at_regulatory_cap: budget + max_loan_at_cap,
        with_credit_loan: with_mortgage + credit_loan_total,
        recommended_price: with_mortgage,
    };

    let payment_burden = payment_burden(loan.monthly_payment_min, monthly_after_tax, &policy.payment);

    let evaluated_price = input.target_price().unwrap_or(with_mortgage);
    let government_loans = evaluate_government_loans(
        evaluated_price,
        pre_tax_annual,
        joint,
        first_time_buyer,
        &policy.government_loans,
    );
    let regional = regional_feasibility(budget, first_time_buyer, policy)?;

    let limits = LoanLimits {
        by_dsr: dsr.max_loan,
        by_ltv: ltv_loan,
        regulatory_cap: regulation.mortgage_cap,
        has_regulatory_cap: regulation.has_mortgage_cap,
    };
    let target = input
        .target_price()
        .map(|t| assess_target(t, budget, max_loan, credit_loan_total));
    let rationale = explain(
        &limits,
        policy.dsr.ratio,
        regulation.ltv_limit,
        &regulation.region_name,
        target,
    );

    let transaction_costs = estimate.acquisition_tax.final_tax + estimate.registration_fee;
    let costs = CostBreakdown {
        savings: input.savings,
        parent_gift: input.parent_gift,
        other_assets: input.other_assets,
        total_assets: input.total_assets(),
        emergency_fund: input.emergency_fund,
        interior_cost: input.interior_cost,
        moving_cost: input.moving_cost,
        acquisition_tax: estimate.acquisition_tax.final_tax,
        registration_fee: estimate.registration_fee,
        total_deductions: input.reserved_costs() + transaction_costs,
        available_budget: budget,
        budget_shortfall: estimate.budget_shortfall,
    };

    debug!(
        price = %estimate.price,
        max_loan = %max_loan,
        binding = ?rationale.binding_constraint,
        recommended = %format_price(with_mortgage),
        "purchase power calculated"
    );

    Ok(CalculationResult {
        first_time_buyer,
        income,
        costs,
        acquisition_tax: estimate.acquisition_tax,
        regulation,
        dsr,
        loan,
        credit_loans,
        credit_loan_total,
        credit_loan_monthly_payment,
        purchase_power,
        payment_burden,
        government_loans,
        regional_feasibility: regional,
        rationale,
        solver: outcome.diagnostics,
    })
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn loan_info(
    regulation: &RegulationInfo,
    dsr: &DsrLimit,
    ltv_loan: Money,
    max_loan_at_cap: Money,
    max_loan: Money,
    input: &CalculationInput,
    payment: &PaymentPolicy,
) -> LoanInfo {
    let years = input.loan_term.years();
    let rate = input.interest_rate;
    let payment_rate_min = (rate - payment.rate_below).max(Decimal::ZERO);
    let payment_rate_max = rate + payment.rate_above;

    LoanInfo {
        ltv: regulation.ltv_limit,
        ltv_loan_limit: ltv_loan,
        dsr_loan_limit: dsr.max_loan,
        regulatory_cap: regulation.mortgage_cap,
        has_regulatory_cap: regulation.has_mortgage_cap,
        max_loan_at_cap,
        max_loan,
        interest_rate: rate,
        loan_term: input.loan_term,
        monthly_payment: monthly_payment(max_loan, rate, years),
        payment_rate_min,
        payment_rate_max,
        monthly_payment_min: monthly_payment(max_loan, payment_rate_min, years),
        monthly_payment_max: monthly_payment(max_loan, payment_rate_max, years),
        total_interest: total_interest(max_loan, rate, years),
    }
}

fn payment_burden(payment: Money, monthly_income: Money, policy: &PaymentPolicy) -> PaymentBurden {
    let ratio = if monthly_income > Decimal::ZERO {
        payment / monthly_income
    } else {
        Decimal::ZERO
    };
    let level = if ratio < policy.comfortable_ratio {
        BurdenLevel::Comfortable
    } else if ratio <= policy.heavy_ratio {
        BurdenLevel::Moderate
    } else {
        BurdenLevel::Heavy
    };

    PaymentBurden {
        ratio,
        percent: (ratio * dec!(100)).round_dp(1),
        level,
    }
}

fn result_warnings(result: &CalculationResult) -> Vec<String> {
    let mut warnings = Vec::new();

    if !result.solver.converged {
        warnings.push(format!(
            "Purchase price did not converge after {} iterations (last change {}); figures are approximate",
            result.solver.iterations, result.solver.last_delta
        ));
    }
    if result.costs.budget_shortfall > Decimal::ZERO {
        warnings.push(format!(
            "Reserved and transaction costs exceed assets by {}",
            format_price(result.costs.budget_shortfall)
        ));
    }
    if result.payment_burden.level == BurdenLevel::Heavy {
        warnings.push(format!(
            "Monthly payment takes {}% of after-tax income",
            result.payment_burden.percent
        ));
    }
    if let Some(target) = &result.rationale.target {
        if !target.achievable {
            warnings.push(target.message.clone());
        }
    }

    warnings
}
