use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{format_percent, format_price, Money, Rate};

/// The limit that decides the final mortgage amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BindingConstraint {
    Dsr,
    Ltv,
    RegulatoryCap,
}

/// The three loan ceilings the rationale compares.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanLimits {
    pub by_dsr: Money,
    pub by_ltv: Money,
    pub regulatory_cap: Money,
    pub has_regulatory_cap: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetAssessment {
    pub target_price: Money,
    /// Cash + primary loan + unsecured loans.
    pub total_purchasing_power: Money,
    /// Loan the target needs on top of the cash budget.
    pub required_loan: Money,
    pub achievable: bool,
    pub achievable_without_credit_loan: bool,
    /// Purchasing power minus target; negative is a shortfall.
    pub margin: Money,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rationale {
    pub binding_constraint: BindingConstraint,
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<TargetAssessment>,
}

/// Smallest of the three limits. Ties resolve in the order DSR, LTV, cap.
pub fn binding_constraint(limits: &LoanLimits) -> BindingConstraint {
    let candidates = [
        (BindingConstraint::Dsr, limits.by_dsr),
        (BindingConstraint::Ltv, limits.by_ltv),
        (BindingConstraint::RegulatoryCap, limits.regulatory_cap),
    ];
    candidates
        .iter()
        .fold(candidates[0], |best, current| {
            if current.1 < best.1 {
                *current
            } else {
                best
            }
        })
        .0
}

/// The next-tightest limit after DSR. An uncapped region never names its
/// sentinel cap.
fn runner_up_to_dsr(limits: &LoanLimits) -> (&'static str, Money) {
    if limits.has_regulatory_cap && limits.regulatory_cap < limits.by_ltv {
        ("규제 상한", limits.regulatory_cap)
    } else {
        ("LTV 한도", limits.by_ltv)
    }
}

fn constraint_reason(
    constraint: BindingConstraint,
    limits: &LoanLimits,
    dsr_ratio: Rate,
    ltv: Rate,
    region_name: &str,
) -> String {
    match constraint {
        BindingConstraint::Dsr => {
            let (runner_up, amount) = runner_up_to_dsr(limits);
            format!(
                "소득 기준(DSR {}) 한도 {}가 {} {}보다 낮아 최종 대출액을 결정합니다.",
                format_percent(dsr_ratio),
                format_price(limits.by_dsr),
                runner_up,
                format_price(amount),
            )
        }
        BindingConstraint::Ltv => format!(
            "가용 예산 기준 LTV {} 한도 {}가 가장 낮습니다. 자기자본이 늘어야 대출 한도가 커집니다.",
            format_percent(ltv),
            format_price(limits.by_ltv),
        ),
        BindingConstraint::RegulatoryCap => format!(
            "{} 주택담보대출 규제 상한 {}이 적용됩니다.",
            region_name,
            format_price(limits.regulatory_cap),
        ),
    }
}

/// Compare the total purchasing power to a requested price.
pub fn assess_target(
    target_price: Money,
    available_budget: Money,
    max_loan: Money,
    credit_loan_total: Money,
) -> TargetAssessment {
    let with_mortgage = available_budget + max_loan;
    let total = with_mortgage + credit_loan_total;
    let margin = total - target_price;
    let achievable = margin >= Decimal::ZERO;

    let message = if achievable {
        format!(
            "목표 {} 구매 가능 (여유 {})",
            format_price(target_price),
            format_price(margin)
        )
    } else {
        format!(
            "목표 {}까지 {} 부족",
            format_price(target_price),
            format_price(-margin)
        )
    };

    TargetAssessment {
        target_price,
        total_purchasing_power: total,
        required_loan: (target_price - available_budget).max(Decimal::ZERO),
        achievable,
        achievable_without_credit_loan: with_mortgage >= target_price,
        margin,
        message,
    }
}

/// Explain which constraint binds and, when a target was given, whether it
/// is reachable.
pub fn explain(
    limits: &LoanLimits,
    dsr_ratio: Rate,
    ltv: Rate,
    region_name: &str,
    target: Option<TargetAssessment>,
) -> Rationale {
    let constraint = binding_constraint(limits);
    Rationale {
        binding_constraint: constraint,
        reason: constraint_reason(constraint, limits, dsr_ratio, ltv, region_name),
        target,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn limits(dsr: Money, ltv: Money, cap: Money) -> LoanLimits {
        LoanLimits {
            by_dsr: dsr,
            by_ltv: ltv,
            regulatory_cap: cap,
            has_regulatory_cap: true,
        }
    }

    #[test]
    fn test_dsr_binds() {
        assert_eq!(
            binding_constraint(&limits(dec!(30000), dec!(90000), dec!(60000))),
            BindingConstraint::Dsr
        );
    }

    #[test]
    fn test_ltv_binds() {
        assert_eq!(
            binding_constraint(&limits(dec!(50000), dec!(20000), dec!(60000))),
            BindingConstraint::Ltv
        );
    }

    #[test]
    fn test_cap_binds() {
        assert_eq!(
            binding_constraint(&limits(dec!(70000), dec!(90000), dec!(60000))),
            BindingConstraint::RegulatoryCap
        );
    }

    #[test]
    fn test_ties_prefer_dsr_then_ltv() {
        assert_eq!(
            binding_constraint(&limits(dec!(60000), dec!(60000), dec!(60000))),
            BindingConstraint::Dsr
        );
        assert_eq!(
            binding_constraint(&limits(dec!(70000), dec!(60000), dec!(60000))),
            BindingConstraint::Ltv
        );
    }

    #[test]
    fn test_reason_names_cap_region() {
        let r = explain(
            &limits(dec!(70000), dec!(90000), dec!(60000)),
            dec!(0.4),
            dec!(0.8),
            "서울 (투기과열지구)",
            None,
        );
        assert_eq!(r.reason, "서울 (투기과열지구) 주택담보대출 규제 상한 6.0억이 적용됩니다.");
    }

    #[test]
    fn test_dsr_reason_names_ltv_when_it_is_next() {
        let r = explain(
            &limits(dec!(30000), dec!(50000), dec!(60000)),
            dec!(0.4),
            dec!(0.8),
            "서울 (투기과열지구)",
            None,
        );
        assert_eq!(r.binding_constraint, BindingConstraint::Dsr);
        assert_eq!(
            r.reason,
            "소득 기준(DSR 40%) 한도 3.0억가 LTV 한도 5.0억보다 낮아 최종 대출액을 결정합니다."
        );
    }

    #[test]
    fn test_dsr_reason_names_cap_when_it_is_next() {
        let r = explain(
            &limits(dec!(30000), dec!(90000), dec!(60000)),
            dec!(0.4),
            dec!(0.8),
            "서울 (투기과열지구)",
            None,
        );
        assert_eq!(
            r.reason,
            "소득 기준(DSR 40%) 한도 3.0억가 규제 상한 6.0억보다 낮아 최종 대출액을 결정합니다."
        );
    }

    #[test]
    fn test_dsr_reason_skips_uncapped_sentinel() {
        let mut l = limits(dec!(30000), dec!(2000000), dec!(999999));
        l.has_regulatory_cap = false;
        let r = explain(&l, dec!(0.4), dec!(0.85), "기타 지역 (비규제)", None);
        assert!(r.reason.contains("LTV 한도 200.0억"), "{}", r.reason);
    }

    #[test]
    fn test_target_shortfall() {
        let t = assess_target(dec!(80000), dec!(20000), dec!(50000), Decimal::ZERO);
        assert!(!t.achievable);
        assert_eq!(t.margin, dec!(-10000));
        assert_eq!(t.required_loan, dec!(60000));
        assert_eq!(t.message, "목표 8.0억까지 1.0억 부족");
    }

    #[test]
    fn test_target_reached_only_with_credit_loan() {
        let t = assess_target(dec!(72000), dec!(20000), dec!(50000), dec!(5000));
        assert!(t.achievable);
        assert!(!t.achievable_without_credit_loan);
        assert_eq!(t.margin, dec!(3000));
    }
}
