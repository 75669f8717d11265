use serde::{Deserialize, Serialize};

use crate::policy::GovernmentLoanSpec;
use crate::types::{Money, Rate};

/// A catalog product annotated for one household.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GovernmentLoanProduct {
    pub name: String,
    pub income_limit: String,
    pub price_limit: String,
    pub ltv: Rate,
    pub interest_rate: String,
    pub eligible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Evaluate every catalog product against the household's price and income.
/// A product with no first-time, income or price condition is always
/// eligible.
pub fn evaluate_government_loans(
    purchase_price: Money,
    pre_tax_annual: Money,
    joint: bool,
    first_time_buyer: bool,
    catalog: &[GovernmentLoanSpec],
) -> Vec<GovernmentLoanProduct> {
    catalog
        .iter()
        .map(|spec| {
            let mut failures: Vec<&str> = Vec::new();

            if spec.requires_first_time && !first_time_buyer {
                failures.push("생애최초 요건 미충족");
            }
            let income_limit = if joint {
                spec.income_limit_joint
            } else {
                spec.income_limit_single
            };
            if income_limit.is_some_and(|limit| pre_tax_annual > limit) {
                failures.push("소득 한도 초과");
            }
            if spec.price_limit.is_some_and(|limit| purchase_price > limit) {
                failures.push("주택가격 한도 초과");
            }

            GovernmentLoanProduct {
                name: spec.name.clone(),
                income_limit: if joint {
                    spec.income_limit_label_joint.clone()
                } else {
                    spec.income_limit_label_single.clone()
                },
                price_limit: spec.price_limit_label.clone(),
                ltv: spec.ltv,
                interest_rate: spec.interest_rate_label.clone(),
                eligible: failures.is_empty(),
                reason: (!failures.is_empty()).then(|| failures.join(", ")),
            }
        })
        .collect()
}
