//! Purchase price / transaction-cost fixed point.
//!
//! Acquisition tax and the registration fee depend on the purchase price,
//! while the price is the after-cost budget plus the loan that budget
//! supports. The map `price → budget(price) + loan(budget(price))` is a
//! contraction whenever the marginal cost rate times `1 / (1 − LTV)` stays
//! under one, which holds by a wide margin for real policy values.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::PurchasePowerError;
use crate::policy::{AcquisitionTaxPolicy, SolverSettings};
use crate::regulation::regions::ltv_loan_limit;
use crate::tax::acquisition::{calculate_acquisition_tax, registration_fee, AcquisitionTaxBreakdown};
use crate::types::{Money, Rate};
use crate::PurchasePowerResult;

/// Fixed inputs of the iteration.
#[derive(Debug, Clone)]
pub struct SolverContext<'a> {
    pub total_assets: Money,
    pub reserved_costs: Money,
    pub first_time_buyer: bool,
    pub ltv: Rate,
    pub dsr_max_loan: Money,
    pub tax_policy: &'a AcquisitionTaxPolicy,
    pub registration_fee_rate: Rate,
    pub settings: &'a SolverSettings,
}

/// Costs and budget evaluated at one candidate price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceEstimate {
    pub price: Money,
    pub acquisition_tax: AcquisitionTaxBreakdown,
    pub registration_fee: Money,
    /// Assets less reserved costs and transaction costs, floored at zero.
    pub available_budget: Money,
    /// How far costs exceed assets; zero when the budget is positive.
    pub budget_shortfall: Money,
    /// `min(LTV loan on the budget, DSR loan)`
    pub loan_ceiling: Money,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolveMode {
    /// Price found by fixed-point iteration.
    Iterated,
    /// Caller supplied the price; costs evaluated there directly.
    TargetPrice,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverDiagnostics {
    pub mode: SolveMode,
    pub iterations: u32,
    pub converged: bool,
    pub last_delta: Money,
    pub tolerance: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverOutcome {
    pub estimate: PriceEstimate,
    pub diagnostics: SolverDiagnostics,
}

/// Evaluate transaction costs, budget and loan ceiling at `price`.
pub fn estimate_at(price: Money, ctx: &SolverContext<'_>) -> PurchasePowerResult<PriceEstimate> {
    let acquisition_tax = calculate_acquisition_tax(price, ctx.first_time_buyer, ctx.tax_policy);
    let fee = registration_fee(price, ctx.registration_fee_rate);

    let raw_budget = ctx.total_assets - ctx.reserved_costs - acquisition_tax.final_tax - fee;
    let available_budget = raw_budget.max(Decimal::ZERO);
    let budget_shortfall = (-raw_budget).max(Decimal::ZERO);

    let loan_ceiling = ltv_loan_limit(available_budget, ctx.ltv)?.min(ctx.dsr_max_loan);

    Ok(PriceEstimate {
        price,
        acquisition_tax,
        registration_fee: fee,
        available_budget,
        budget_shortfall,
        loan_ceiling,
    })
}

/// Iterate from the seed price until successive prices differ by less than
/// the tolerance or the iteration cap is reached.
///
/// Hitting the cap is logged and reported in the diagnostics; with
/// `settings.strict` it is an error instead.
pub fn solve_purchase_price(ctx: &SolverContext<'_>) -> PurchasePowerResult<SolverOutcome> {
    let settings = ctx.settings;
    let mut price = settings.seed_price;
    let mut last_delta = Decimal::MAX;
    let mut iterations = 0;

    while iterations < settings.max_iterations {
        let estimate = estimate_at(price, ctx)?;
        let next = estimate.available_budget + estimate.loan_ceiling;
        last_delta = (next - price).abs();
        iterations += 1;

        debug!(
            iteration = iterations,
            price = %price,
            next = %next,
            delta = %last_delta,
            "purchase price iteration"
        );

        price = next;
        if last_delta < settings.tolerance {
            break;
        }
    }

    let converged = last_delta < settings.tolerance;
    if !converged {
        warn!(
            iterations,
            delta = %last_delta,
            tolerance = %settings.tolerance,
            "purchase price did not converge; check tax bands and LTV for a non-contracting policy"
        );
        if settings.strict {
            return Err(PurchasePowerError::ConvergenceFailure {
                function: "purchase price solver".into(),
                iterations,
                last_delta,
            });
        }
    }

    Ok(SolverOutcome {
        estimate: estimate_at(price, ctx)?,
        diagnostics: SolverDiagnostics {
            mode: SolveMode::Iterated,
            iterations,
            converged,
            last_delta,
            tolerance: settings.tolerance,
        },
    })
}

/// Skip the iteration and take costs at a caller-specified price.
pub fn at_target_price(target: Money, ctx: &SolverContext<'_>) -> PurchasePowerResult<SolverOutcome> {
    Ok(SolverOutcome {
        estimate: estimate_at(target, ctx)?,
        diagnostics: SolverDiagnostics {
            mode: SolveMode::TargetPrice,
            iterations: 0,
            converged: true,
            last_delta: Decimal::ZERO,
            tolerance: ctx.settings.tolerance,
        },
    })
}
