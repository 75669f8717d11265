use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use purchase_power_core::policy::PolicyConfig;
use purchase_power_core::tax::acquisition::{calculate_acquisition_tax, registration_fee};

/// Arguments for the acquisition tax (취득세) breakdown
#[derive(Args)]
pub struct TaxArgs {
    /// Purchase price in 만원
    #[arg(long)]
    pub price: Decimal,

    /// Apply the first-time buyer exemption
    #[arg(long)]
    pub first_time: bool,
}

pub fn run_tax(args: TaxArgs, policy: &PolicyConfig) -> Result<Value, Box<dyn std::error::Error>> {
    if args.price < Decimal::ZERO {
        return Err("--price cannot be negative".into());
    }

    let breakdown = calculate_acquisition_tax(args.price, args.first_time, &policy.acquisition_tax);
    let fee = registration_fee(args.price, policy.registration_fee_rate);
    let total = breakdown.final_tax + fee;

    Ok(json!({
        "result": {
            "price": args.price,
            "first_time_buyer": args.first_time,
            "acquisition_tax": breakdown,
            "registration_fee": fee,
            "total_transaction_cost": total,
        }
    }))
}
