use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::PurchasePowerError;
use crate::PurchasePowerResult;

/// All monetary values, in 만원 (10,000 KRW). Wraps Decimal to prevent
/// accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.04 = 4%). Never as percentages.
pub type Rate = Decimal;

/// Regulatory tier of the target region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    /// 서울 — speculative overheated district
    Seoul,
    /// 경기 — adjustment-target area
    Gyeonggi,
    /// 광역시 — metropolitan cities
    Metropolitan,
    /// Everything else, unregulated
    Other,
}

impl Region {
    pub const ALL: [Region; 4] = [
        Region::Seoul,
        Region::Gyeonggi,
        Region::Metropolitan,
        Region::Other,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Region::Seoul => "seoul",
            Region::Gyeonggi => "gyeonggi",
            Region::Metropolitan => "metropolitan",
            Region::Other => "other",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Region {
    type Err = PurchasePowerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Region::ALL
            .into_iter()
            .find(|r| r.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| PurchasePowerError::InvalidInput {
                field: "target_region".into(),
                reason: format!(
                    "Unknown region '{s}'; expected one of seoul, gyeonggi, metropolitan, other"
                ),
            })
    }
}

/// Mortgage term. Only the terms lenders actually offer are representable;
/// serialized as the plain year count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum LoanTerm {
    Years10,
    Years15,
    Years20,
    Years30,
}

impl LoanTerm {
    pub const ALL: [LoanTerm; 4] = [
        LoanTerm::Years10,
        LoanTerm::Years15,
        LoanTerm::Years20,
        LoanTerm::Years30,
    ];

    pub fn years(&self) -> u32 {
        match self {
            LoanTerm::Years10 => 10,
            LoanTerm::Years15 => 15,
            LoanTerm::Years20 => 20,
            LoanTerm::Years30 => 30,
        }
    }
}

impl TryFrom<u32> for LoanTerm {
    type Error = PurchasePowerError;

    fn try_from(years: u32) -> Result<Self, Self::Error> {
        LoanTerm::ALL
            .into_iter()
            .find(|t| t.years() == years)
            .ok_or_else(|| PurchasePowerError::InvalidInput {
                field: "loan_term".into(),
                reason: format!("Unsupported loan term {years}; expected 10, 15, 20 or 30 years"),
            })
    }
}

impl From<LoanTerm> for u32 {
    fn from(term: LoanTerm) -> Self {
        term.years()
    }
}

/// Reject a quoted annual rate outside `[0, 1)`. Percent-for-decimal slips
/// (4.0 for 4%) would otherwise overflow the amortization math.
pub fn validate_rate(field: &str, rate: Rate) -> PurchasePowerResult<()> {
    if rate < Decimal::ZERO || rate >= Decimal::ONE {
        return Err(PurchasePowerError::InvalidInput {
            field: field.into(),
            reason: "Interest rate must be a decimal in [0, 1), e.g. 0.04 for 4%".into(),
        });
    }
    Ok(())
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
    pub currency_unit: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
            currency_unit: "만원".to_string(),
        },
    }
}

const MANWON_PER_EOK: Decimal = dec!(10000);

/// Headline price in 억 (100M KRW), e.g. `45000` → `"4.5억"`.
/// Amounts under 1,000만원 fall back to [`format_manwon`].
pub fn format_price(amount: Money) -> String {
    if amount >= dec!(1000) {
        format!("{:.1}억", amount / MANWON_PER_EOK)
    } else {
        format_manwon(amount)
    }
}

/// Whole 만원 with thousands grouping, e.g. `12345.6` → `"12,345만원"`.
pub fn format_manwon(amount: Money) -> String {
    let negative = amount < Decimal::ZERO;
    let digits = amount.abs().trunc().normalize().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if negative {
        format!("-{grouped}만원")
    } else {
        format!("{grouped}만원")
    }
}

/// A rate as a whole-number percent string, e.g. `0.8` → `"80%"`.
pub fn format_percent(rate: Rate) -> String {
    format!("{}%", (rate * dec!(100)).round_dp(1).normalize())
}
