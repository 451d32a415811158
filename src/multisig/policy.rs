//! Quorum arithmetic.

use serde::{Deserialize, Serialize};

use crate::core::errors::WalletError;

/// M-of-N threshold policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdPolicy {
    /// Distinct confirmations needed to execute.
    pub required: usize,
    /// Size of the owner set.
    pub total: usize,
}

impl ThresholdPolicy {
    pub fn new(required: usize, total: usize) -> Result<Self, WalletError> {
        if required == 0 || required > total {
            return Err(WalletError::InvalidConfiguration(format!(
                "invalid required confirmations: {} of {}",
                required, total
            )));
        }

        Ok(Self { required, total })
    }

    /// Whether `confirmations` distinct votes reach quorum.
    pub fn is_satisfied(&self, confirmations: usize) -> bool {
        confirmations >= self.required
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_policy() {
        let policy = ThresholdPolicy::new(2, 3).unwrap();
        assert_eq!(policy.required, 2);
        assert_eq!(policy.total, 3);
        assert!(!policy.is_satisfied(1));
        assert!(policy.is_satisfied(2));
        assert!(policy.is_satisfied(3));
    }

    #[test]
    fn test_invalid_policy() {
        assert!(ThresholdPolicy::new(0, 3).is_err());
        assert!(ThresholdPolicy::new(4, 3).is_err());
    }
}
