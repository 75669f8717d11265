use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use purchase_power_core::policy::PolicyConfig;
use purchase_power_core::regulation::feasibility::regional_feasibility;

/// Arguments for the regional comparison
#[derive(Args)]
pub struct RegionsArgs {
    /// Cash budget after costs, in 만원
    #[arg(long)]
    pub budget: Decimal,

    /// Use first-time buyer LTV ceilings
    #[arg(long)]
    pub first_time: bool,
}

pub fn run_regions(args: RegionsArgs, policy: &PolicyConfig) -> Result<Value, Box<dyn std::error::Error>> {
    let rows = regional_feasibility(args.budget, args.first_time, policy)?;
    Ok(serde_json::to_value(rows)?)
}
