use serde_json::Value;

use purchase_power_core::policy::PolicyConfig;

/// The policy in force, so it can be saved and edited as an override.
pub fn run_policy(policy: &PolicyConfig) -> Result<Value, Box<dyn std::error::Error>> {
    Ok(serde_json::to_value(policy)?)
}
