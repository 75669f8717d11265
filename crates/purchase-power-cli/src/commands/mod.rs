pub mod calculate;
pub mod lending;
pub mod policy;
pub mod regions;
pub mod tax;

use purchase_power_core::policy::PolicyConfig;
use tracing::debug;

use crate::input;

/// The policy in force: the `--policy` file when given, otherwise the
/// built-in defaults. Overrides are validated before use.
pub fn load_policy(path: Option<&str>) -> Result<PolicyConfig, Box<dyn std::error::Error>> {
    match path {
        Some(path) => {
            let policy: PolicyConfig = input::file::read_input(path)?;
            policy.validate()?;
            debug!(path, "loaded policy override");
            Ok(policy)
        }
        None => Ok(PolicyConfig::default()),
    }
}
