//! Regulatory and lending policy as data.
//!
//! Every threshold the engine consults lives here so a policy revision is a
//! configuration edit. [`PolicyConfig::default`] carries the 2025 rules; a
//! caller may deserialize an override from JSON or YAML.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::PurchasePowerError;
use crate::types::{Money, Rate, Region};
use crate::PurchasePowerResult;

/// Mortgage cap used for regions without a regulatory ceiling.
pub const NO_MORTGAGE_CAP: Money = dec!(999999);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyConfig {
    pub acquisition_tax: AcquisitionTaxPolicy,
    /// Registration fee (등기비) as a fraction of purchase price.
    pub registration_fee_rate: Rate,
    pub first_time_buyer: FirstTimeBuyerPolicy,
    pub regions: Vec<RegionPolicy>,
    pub dsr: DsrPolicy,
    pub credit_loan: CreditLoanPolicy,
    pub government_loans: Vec<GovernmentLoanSpec>,
    pub payment: PaymentPolicy,
    pub solver: SolverSettings,
}

// ---------------------------------------------------------------------------
// Acquisition tax
// ---------------------------------------------------------------------------

/// One marginal band. The band covers prices up to `upper_bound`
/// (exclusive of the previous band's bound); `None` means unbounded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxBand {
    pub upper_bound: Option<Money>,
    pub rate: Rate,
}

/// Where the first-time-buyer exemption is taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExemptionOrder {
    /// Surtax is levied on the full base tax, then the exemption comes off
    /// the combined subtotal.
    AfterSurtax,
    /// The exemption reduces the base tax first and the surtax is levied on
    /// what remains.
    BeforeSurtax,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcquisitionTaxPolicy {
    pub bands: Vec<TaxBand>,
    /// 지방교육세 as a fraction of base tax.
    pub education_surtax_rate: Rate,
    pub first_time_exemption_cap: Money,
    pub exemption_order: ExemptionOrder,
}

// ---------------------------------------------------------------------------
// First-time buyer, regions
// ---------------------------------------------------------------------------

/// Household pre-tax income ceilings for first-time-buyer treatment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FirstTimeBuyerPolicy {
    pub single_income_limit: Money,
    pub joint_income_limit: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionPolicy {
    pub region: Region,
    pub name: String,
    /// Shorter label used in the regional comparison list.
    pub short_name: String,
    pub regulated: bool,
    pub mortgage_cap: Money,
    pub ltv_first_time: Rate,
    pub ltv_standard: Rate,
    /// Disclosed to the user; the solver does not consume it.
    pub stress_test_rate: Rate,
    pub details: String,
}

// ---------------------------------------------------------------------------
// DSR
// ---------------------------------------------------------------------------

/// Interest rate the DSR ceiling is reverse-amortized at.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "rate", rename_all = "snake_case")]
pub enum DsrReferenceRate {
    /// Use the mortgage rate the household supplied.
    MortgageRate,
    /// A fixed policy rate regardless of the quoted mortgage rate.
    Fixed(Rate),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DsrPolicy {
    /// Maximum annual debt service as a fraction of gross annual income.
    pub ratio: Rate,
    pub reference_rate: DsrReferenceRate,
}

impl DsrPolicy {
    pub fn resolve_rate(&self, mortgage_rate: Rate) -> Rate {
        match self.reference_rate {
            DsrReferenceRate::MortgageRate => mortgage_rate,
            DsrReferenceRate::Fixed(rate) => rate,
        }
    }
}

// ---------------------------------------------------------------------------
// Credit loan
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditTier {
    pub label: String,
    pub min_score: u32,
    pub cap: Money,
}

/// How the unsecured limit is sized. The two models are alternatives; a
/// policy picks exactly one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum CreditLimitModel {
    /// `min(income × income_multiple, cap of the highest tier the score reaches)`.
    /// Scores below every tier get `base_cap`.
    ScoreTiers {
        income_multiple: Rate,
        base_cap: Money,
        tiers: Vec<CreditTier>,
    },
    /// `income × income_multiple`, no score dependency.
    IncomeMultiple { income_multiple: Rate },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditLoanPolicy {
    pub model: CreditLimitModel,
    pub interest_rate: Rate,
    pub term_years: u32,
    pub min_score: u32,
    pub max_score: u32,
}

// ---------------------------------------------------------------------------
// Government loans
// ---------------------------------------------------------------------------

/// Static description of a subsidized product and its eligibility rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GovernmentLoanSpec {
    pub name: String,
    pub ltv: Rate,
    pub interest_rate_label: String,
    pub price_limit_label: String,
    pub income_limit_label_single: String,
    pub income_limit_label_joint: String,
    pub requires_first_time: bool,
    pub income_limit_single: Option<Money>,
    pub income_limit_joint: Option<Money>,
    pub price_limit: Option<Money>,
}

// ---------------------------------------------------------------------------
// Payments, solver
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentPolicy {
    /// The low end of the payment range is quoted at `rate - rate_below`.
    pub rate_below: Rate,
    /// The high end of the payment range is quoted at `rate + rate_above`.
    pub rate_above: Rate,
    /// Payment-to-income ratio under which the burden is comfortable.
    pub comfortable_ratio: Rate,
    /// Payment-to-income ratio above which the burden is heavy.
    pub heavy_ratio: Rate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverSettings {
    pub seed_price: Money,
    pub tolerance: Money,
    pub max_iterations: u32,
    /// Fail the calculation instead of warning when the cap is hit.
    #[serde(default)]
    pub strict: bool,
}

// ---------------------------------------------------------------------------
// Defaults (2025 rules)
// ---------------------------------------------------------------------------

impl Default for PolicyConfig {
    fn default() -> Self {
        PolicyConfig {
            acquisition_tax: AcquisitionTaxPolicy {
                bands: vec![
                    TaxBand {
                        upper_bound: Some(dec!(60000)),
                        rate: dec!(0.01),
                    },
                    TaxBand {
                        upper_bound: Some(dec!(90000)),
                        rate: dec!(0.02),
                    },
                    TaxBand {
                        upper_bound: None,
                        rate: dec!(0.03),
                    },
                ],
                education_surtax_rate: dec!(0.1),
                first_time_exemption_cap: dec!(200),
                exemption_order: ExemptionOrder::AfterSurtax,
            },
            registration_fee_rate: dec!(0.004),
            first_time_buyer: FirstTimeBuyerPolicy {
                single_income_limit: dec!(5000),
                joint_income_limit: dec!(7000),
            },
            regions: default_regions(),
            dsr: DsrPolicy {
                ratio: dec!(0.4),
                reference_rate: DsrReferenceRate::MortgageRate,
            },
            credit_loan: CreditLoanPolicy {
                model: CreditLimitModel::ScoreTiers {
                    income_multiple: dec!(0.5),
                    base_cap: dec!(5000),
                    tiers: vec![
                        CreditTier {
                            label: "보통".into(),
                            min_score: 700,
                            cap: dec!(6000),
                        },
                        CreditTier {
                            label: "양호".into(),
                            min_score: 750,
                            cap: dec!(8000),
                        },
                        CreditTier {
                            label: "우수".into(),
                            min_score: 800,
                            cap: dec!(10000),
                        },
                        CreditTier {
                            label: "최우수".into(),
                            min_score: 900,
                            cap: dec!(15000),
                        },
                    ],
                },
                interest_rate: dec!(0.05),
                term_years: 10,
                min_score: 300,
                max_score: 999,
            },
            government_loans: default_government_loans(),
            payment: PaymentPolicy {
                rate_below: dec!(0.007),
                rate_above: dec!(0.005),
                comfortable_ratio: dec!(0.20),
                heavy_ratio: dec!(0.30),
            },
            solver: SolverSettings {
                seed_price: dec!(40000),
                tolerance: dec!(100),
                max_iterations: 10,
                strict: false,
            },
        }
    }
}

fn default_regions() -> Vec<RegionPolicy> {
    vec![
        RegionPolicy {
            region: Region::Seoul,
            name: "서울 (투기과열지구)".into(),
            short_name: "서울 (투기과열)".into(),
            regulated: true,
            mortgage_cap: dec!(60000),
            ltv_first_time: dec!(0.8),
            ltv_standard: dec!(0.5),
            stress_test_rate: dec!(0.03),
            details: "투기과열지구. 생애최초는 LTV 80% (최대 6억), 일반은 50%.".into(),
        },
        RegionPolicy {
            region: Region::Gyeonggi,
            name: "경기 (조정대상지역)".into(),
            short_name: "경기 (조정대상)".into(),
            regulated: true,
            mortgage_cap: dec!(60000),
            ltv_first_time: dec!(0.8),
            ltv_standard: dec!(0.7),
            stress_test_rate: dec!(0.03),
            details: "조정대상지역. 주담대 6억 상한, 생애최초 LTV 80%.".into(),
        },
        RegionPolicy {
            region: Region::Metropolitan,
            name: "광역시 (조정)".into(),
            short_name: "광역시 (조정)".into(),
            regulated: true,
            mortgage_cap: dec!(60000),
            ltv_first_time: dec!(0.8),
            ltv_standard: dec!(0.7),
            stress_test_rate: dec!(0.03),
            details: "조정대상지역. 서울과 동일한 상한 적용.".into(),
        },
        RegionPolicy {
            region: Region::Other,
            name: "기타 지역 (비규제)".into(),
            short_name: "그외지방 (비규제)".into(),
            regulated: false,
            mortgage_cap: NO_MORTGAGE_CAP,
            ltv_first_time: dec!(0.85),
            ltv_standard: dec!(0.8),
            stress_test_rate: dec!(0.015),
            details: "규제 없음. 일반적인 금융기준 적용.".into(),
        },
    ]
}

fn default_government_loans() -> Vec<GovernmentLoanSpec> {
    vec![
        GovernmentLoanSpec {
            name: "디딤돌 대출 (생애최초)".into(),
            ltv: dec!(0.8),
            interest_rate_label: "2.65%~3.95%".into(),
            price_limit_label: "5억 이하".into(),
            income_limit_label_single: "단독 6천만원".into(),
            income_limit_label_joint: "부부 7천만원".into(),
            requires_first_time: true,
            income_limit_single: Some(dec!(6000)),
            income_limit_joint: Some(dec!(7000)),
            price_limit: Some(dec!(50000)),
        },
        GovernmentLoanSpec {
            name: "보금자리론".into(),
            ltv: dec!(0.7),
            interest_rate_label: "3.8%".into(),
            price_limit_label: "6억 이하".into(),
            income_limit_label_single: "제한 없음".into(),
            income_limit_label_joint: "제한 없음".into(),
            requires_first_time: false,
            income_limit_single: None,
            income_limit_joint: None,
            price_limit: Some(dec!(60000)),
        },
        GovernmentLoanSpec {
            name: "일반 주담대".into(),
            ltv: dec!(0.7),
            interest_rate_label: "4.0%~6.0%".into(),
            price_limit_label: "제한 없음".into(),
            income_limit_label_single: "제한 없음".into(),
            income_limit_label_joint: "제한 없음".into(),
            requires_first_time: false,
            income_limit_single: None,
            income_limit_joint: None,
            price_limit: None,
        },
    ]
}

// ---------------------------------------------------------------------------
// Lookup and validation
// ---------------------------------------------------------------------------

impl PolicyConfig {
    pub fn region(&self, region: Region) -> PurchasePowerResult<&RegionPolicy> {
        self.regions
            .iter()
            .find(|r| r.region == region)
            .ok_or_else(|| {
                PurchasePowerError::InvalidPolicy(format!("no regulation entry for region '{region}'"))
            })
    }

    /// Reject policies the engine cannot evaluate soundly: LTV at or above
    /// 100% (the budget-to-loan multiplier blows up), bands out of order, or
    /// marginal tax rates that stop the solver from contracting.
    pub fn validate(&self) -> PurchasePowerResult<()> {
        let tax = &self.acquisition_tax;
        if tax.bands.is_empty() {
            return Err(PurchasePowerError::InvalidPolicy(
                "acquisition tax needs at least one band".into(),
            ));
        }
        let mut previous = Decimal::ZERO;
        for (i, band) in tax.bands.iter().enumerate() {
            if band.rate < Decimal::ZERO || band.rate >= Decimal::ONE {
                return Err(PurchasePowerError::InvalidPolicy(format!(
                    "tax band {i} rate {} must be in [0, 1)",
                    band.rate
                )));
            }
            match band.upper_bound {
                Some(bound) if bound <= previous => {
                    return Err(PurchasePowerError::InvalidPolicy(format!(
                        "tax band {i} bound {bound} is not above the previous bound {previous}"
                    )));
                }
                Some(bound) => previous = bound,
                None if i + 1 != tax.bands.len() => {
                    return Err(PurchasePowerError::InvalidPolicy(
                        "only the last tax band may be unbounded".into(),
                    ));
                }
                None => {}
            }
        }
        if tax.first_time_exemption_cap < Decimal::ZERO {
            return Err(PurchasePowerError::InvalidPolicy(
                "first-time exemption cap cannot be negative".into(),
            ));
        }
        check_rate("education surtax rate", tax.education_surtax_rate)?;
        check_rate("registration fee rate", self.registration_fee_rate)?;

        for region in Region::ALL {
            let entry = self.region(region)?;
            for ltv in [entry.ltv_first_time, entry.ltv_standard] {
                if ltv < Decimal::ZERO || ltv >= Decimal::ONE {
                    return Err(PurchasePowerError::InvalidPolicy(format!(
                        "LTV {ltv} for '{region}' must be in [0, 1)"
                    )));
                }
            }
            if entry.mortgage_cap < Decimal::ZERO {
                return Err(PurchasePowerError::InvalidPolicy(format!(
                    "mortgage cap for '{region}' cannot be negative"
                )));
            }
        }

        if self.dsr.ratio <= Decimal::ZERO || self.dsr.ratio > Decimal::ONE {
            return Err(PurchasePowerError::InvalidPolicy(
                "DSR ratio must be in (0, 1]".into(),
            ));
        }
        if let DsrReferenceRate::Fixed(rate) = self.dsr.reference_rate {
            check_rate("fixed DSR reference rate", rate)?;
        }

        let credit = &self.credit_loan;
        check_rate("credit loan interest rate", credit.interest_rate)?;
        if credit.min_score > credit.max_score {
            return Err(PurchasePowerError::InvalidPolicy(format!(
                "credit score range {}..={} is inverted",
                credit.min_score, credit.max_score
            )));
        }
        if let CreditLimitModel::ScoreTiers { tiers, .. } = &credit.model {
            if tiers.windows(2).any(|w| w[0].min_score >= w[1].min_score) {
                return Err(PurchasePowerError::InvalidPolicy(
                    "credit tiers must be sorted by strictly increasing min_score".into(),
                ));
            }
        }

        check_rate("payment range rate_below", self.payment.rate_below)?;
        check_rate("payment range rate_above", self.payment.rate_above)?;

        if self.government_loans.is_empty() {
            return Err(PurchasePowerError::InvalidPolicy(
                "government loan catalog cannot be empty".into(),
            ));
        }
        if self.solver.max_iterations == 0 || self.solver.tolerance <= Decimal::ZERO {
            return Err(PurchasePowerError::InvalidPolicy(
                "solver needs a positive tolerance and at least one iteration".into(),
            ));
        }
        if self.payment.comfortable_ratio > self.payment.heavy_ratio {
            return Err(PurchasePowerError::InvalidPolicy(
                "comfortable payment ratio cannot exceed the heavy ratio".into(),
            ));
        }

        Ok(())
    }
}

/// Policy rates are decimals in `[0, 1)`; a percent written as a whole
/// number overflows the amortization factor.
fn check_rate(what: &str, rate: Rate) -> PurchasePowerResult<()> {
    if rate < Decimal::ZERO || rate >= Decimal::ONE {
        return Err(PurchasePowerError::InvalidPolicy(format!(
            "{what} {rate} must be a decimal in [0, 1), e.g. 0.045 for 4.5%"
        )));
    }
    Ok(())
}
