use crate::policy::FirstTimeBuyerPolicy;
use crate::types::Money;

/// Whether a household's combined pre-tax income keeps it inside the
/// first-time-buyer ceiling for its filing type.
pub fn is_first_time_eligible(pre_tax_annual: Money, joint: bool, policy: &FirstTimeBuyerPolicy) -> bool {
    let limit = if joint {
        policy.joint_income_limit
    } else {
        policy.single_income_limit
    };
    pre_tax_annual <= limit
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::PolicyConfig;
    use rust_decimal_macros::dec;

    #[test]
    fn test_single_threshold_inclusive() {
        let p = PolicyConfig::default().first_time_buyer;
        assert!(is_first_time_eligible(dec!(5000), false, &p));
        assert!(!is_first_time_eligible(dec!(5001), false, &p));
    }

    #[test]
    fn test_joint_threshold_is_higher() {
        let p = PolicyConfig::default().first_time_buyer;
        assert!(is_first_time_eligible(dec!(6500), true, &p));
        assert!(!is_first_time_eligible(dec!(6500), false, &p));
    }
}
