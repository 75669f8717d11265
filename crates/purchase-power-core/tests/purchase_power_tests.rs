use purchase_power_core::policy::PolicyConfig;
use purchase_power_core::purchase_power::calculator::{analyze_purchase_power, calculate, BurdenLevel};
use purchase_power_core::purchase_power::input::{Borrower, CalculationInput, Household};
use purchase_power_core::purchase_power::rationale::BindingConstraint;
use purchase_power_core::{LoanTerm, PurchasePowerError, Region};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Fixtures
// ===========================================================================

fn earner(monthly: Decimal, annual: Decimal) -> Borrower {
    Borrower {
        monthly_income_after_tax: monthly,
        pre_tax_annual_income: annual,
        use_credit_loan: false,
        credit_score: 700,
    }
}

/// Single earner, 400/month after tax, 5000/year pre-tax, 3억 saved,
/// buying in Seoul on a 30-year loan at 4%.
fn scenario_a() -> CalculationInput {
    CalculationInput {
        household: Household::Single {
            applicant: earner(dec!(400), dec!(5000)),
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

fn scenario_b() -> CalculationInput {
    CalculationInput {
        target_region: Region::Other,
        ..scenario_a()
    }
}

// ===========================================================================
// Scenarios
// ===========================================================================

#[test]
fn test_scenario_a_seoul_first_time() {
    let policy = PolicyConfig::default();
    let result = calculate(&scenario_a(), &policy).unwrap();

    assert!(result.first_time_buyer);
    assert!(result.costs.available_budget >= Decimal::ZERO);
    assert_eq!(result.loan.ltv, policy.region(Region::Seoul).unwrap().ltv_first_time);

    let expected = result
        .loan
        .regulatory_cap
        .min(result.loan.ltv_loan_limit)
        .min(result.loan.dsr_loan_limit);
    assert_eq!(result.loan.max_loan, expected);
    assert_eq!(
        result.purchase_power.with_mortgage,
        result.costs.available_budget + result.loan.max_loan
    );
}

#[test]
fn test_scenario_a_cost_lines_add_up() {
    let result = calculate(&scenario_a(), &PolicyConfig::default()).unwrap();
    let c = &result.costs;
    assert_eq!(c.total_assets, dec!(30000));
    assert_eq!(
        c.total_deductions,
        dec!(2100) + c.acquisition_tax + c.registration_fee
    );
    assert_eq!(c.available_budget, c.total_assets - c.total_deductions);
    assert_eq!(c.acquisition_tax, result.acquisition_tax.final_tax);
}

#[test]
fn test_scenario_b_unregulated_region_lends_at_least_as_much() {
    let policy = PolicyConfig::default();
    let a = calculate(&scenario_a(), &policy).unwrap();
    let b = calculate(&scenario_b(), &policy).unwrap();

    assert!(!b.regulation.is_regulated);
    assert!(!b.loan.has_regulatory_cap);
    assert!(b.loan.max_loan >= a.loan.max_loan);
}

#[test]
fn test_scenario_c_joint_with_zero_spouse_income_rejected() {
    let mut input = scenario_a();
    input.household = Household::Joint {
        applicant: earner(dec!(400), dec!(5000)),
        spouse: earner(Decimal::ZERO, Decimal::ZERO),
    };

    let err = calculate(&input, &PolicyConfig::default()).unwrap_err();
    assert!(err.is_caller_error());
    match err {
        PurchasePowerError::InvalidInput { field, .. } => {
            assert_eq!(field, "spouse.monthly_income_after_tax")
        }
        other => panic!("expected InvalidInput, got {other:?}"),
    }
}

#[test]
fn test_identical_input_serializes_identically() {
    let policy = PolicyConfig::default();
    let first = serde_json::to_string(&calculate(&scenario_a(), &policy).unwrap()).unwrap();
    let second = serde_json::to_string(&calculate(&scenario_a(), &policy).unwrap()).unwrap();
    assert_eq!(first, second);
}

// ===========================================================================
// Limits and rationale
// ===========================================================================

#[test]
fn test_wealthy_low_income_household_is_dsr_bound() {
    let mut input = scenario_b();
    input.savings = dec!(200000);
    let result = calculate(&input, &PolicyConfig::default()).unwrap();
    assert_eq!(result.rationale.binding_constraint, BindingConstraint::Dsr);
    assert_eq!(result.loan.max_loan, result.dsr.max_loan);
}

#[test]
fn test_high_income_seoul_hits_regulatory_cap() {
    let mut input = scenario_a();
    input.household = Household::Single {
        applicant: earner(dec!(1500), dec!(30000)),
    };
    input.savings = dec!(100000);
    let result = calculate(&input, &PolicyConfig::default()).unwrap();

    assert_eq!(result.rationale.binding_constraint, BindingConstraint::RegulatoryCap);
    assert_eq!(result.loan.max_loan, dec!(60000));
    assert!(result.rationale.reason.contains("6.0억"));
}

#[test]
fn test_low_savings_is_ltv_bound() {
    let mut input = scenario_b();
    input.household = Household::Single {
        applicant: earner(dec!(800), dec!(12000)),
    };
    input.savings = dec!(5000);
    let result = calculate(&input, &PolicyConfig::default()).unwrap();
    assert_eq!(result.rationale.binding_constraint, BindingConstraint::Ltv);
    assert_eq!(result.loan.max_loan, result.loan.ltv_loan_limit);
}

#[test]
fn test_reachable_target_reports_margin() {
    let mut input = scenario_a();
    input.target_price = Some(dec!(40000));
    let result = calculate(&input, &PolicyConfig::default()).unwrap();

    let target = result.rationale.target.unwrap();
    assert!(target.achievable);
    assert_eq!(target.margin, target.total_purchasing_power - dec!(40000));
    assert!(target.message.starts_with("목표 4.0억 구매 가능"));
}

#[test]
fn test_government_loans_annotated() {
    let result = calculate(&scenario_a(), &PolicyConfig::default()).unwrap();
    assert_eq!(result.government_loans.len(), 3);
    let generic = result.government_loans.last().unwrap();
    assert!(generic.eligible);
    assert_eq!(generic.reason, None);
}

#[test]
fn test_regional_feasibility_covers_every_region() {
    let result = calculate(&scenario_a(), &PolicyConfig::default()).unwrap();
    let regions: Vec<Region> = result.regional_feasibility.iter().map(|r| r.region).collect();
    assert_eq!(regions, Region::ALL.to_vec());
}

// ===========================================================================
// Envelope
// ===========================================================================

#[test]
fn test_envelope_carries_metadata() {
    let output = analyze_purchase_power(&scenario_a()).unwrap();
    assert_eq!(output.metadata.currency_unit, "만원");
    assert_eq!(output.assumptions["region"], "seoul");
    assert_eq!(output.assumptions["loan_term_years"], 30);
    assert!(output.result.solver.converged);

    // The DSR-sized payment is ~38% of a 400 after-tax income
    assert_eq!(output.result.payment_burden.level, BurdenLevel::Heavy);
    assert_eq!(output.warnings.len(), 1, "{:?}", output.warnings);
    assert!(output.warnings[0].contains("after-tax income"));
}

#[test]
fn test_fixed_dsr_reference_rate_changes_dsr_limit() {
    use purchase_power_core::policy::DsrReferenceRate;

    let mut policy = PolicyConfig::default();
    let floating = calculate(&scenario_a(), &policy).unwrap();
    policy.dsr.reference_rate = DsrReferenceRate::Fixed(dec!(0.045));
    let fixed = calculate(&scenario_a(), &policy).unwrap();

    assert_eq!(fixed.dsr.reference_rate, dec!(0.045));
    assert!(fixed.dsr.max_loan < floating.dsr.max_loan);
}

// ===========================================================================
// Policy overrides
// ===========================================================================

#[test]
fn test_percent_written_fixed_dsr_rate_is_a_policy_error() {
    use purchase_power_core::policy::DsrReferenceRate;

    let mut policy = PolicyConfig::default();
    policy.dsr.reference_rate = DsrReferenceRate::Fixed(dec!(4.5));
    assert!(matches!(
        calculate(&scenario_a(), &policy),
        Err(PurchasePowerError::InvalidPolicy(_))
    ));
}

#[test]
fn test_percent_written_credit_loan_rate_is_a_policy_error() {
    let mut policy = PolicyConfig::default();
    policy.credit_loan.interest_rate = dec!(50);

    let mut input = scenario_a();
    input.household = Household::Single {
        applicant: Borrower {
            use_credit_loan: true,
            ..earner(dec!(400), dec!(5000))
        },
    };
    let err = calculate(&input, &policy).unwrap_err();
    assert!(matches!(err, PurchasePowerError::InvalidPolicy(_)));
    assert!(!err.is_caller_error());
}
