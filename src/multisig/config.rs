//! Owner set and confirmation threshold.
//!
//! A `MultiSigConfig` can only be obtained through [`MultiSigConfig::new`],
//! so holding one proves the owner-set invariants hold.

use std::collections::HashSet;

use crate::core::domain::Address;
use crate::core::errors::WalletError;

use super::policy::ThresholdPolicy;

/// Validated owner set plus required-confirmation threshold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiSigConfig {
    owners: Vec<Address>,
    policy: ThresholdPolicy,
}

impl MultiSigConfig {
    /// Validate and build a configuration.
    ///
    /// # Arguments
    /// * `owners` - authorized identities, in the order they were supplied
    /// * `required_confirmations` - distinct confirmations needed to execute
    ///
    /// # Errors
    /// `InvalidConfiguration` when the owner list is empty, contains the zero
    /// address or a duplicate, or the threshold is outside `[1, owners.len()]`.
    pub fn new(owners: Vec<Address>, required_confirmations: usize) -> Result<Self, WalletError> {
        if owners.is_empty() {
            return Err(WalletError::InvalidConfiguration("owner required".to_string()));
        }

        let policy = ThresholdPolicy::new(required_confirmations, owners.len())?;

        let mut seen = HashSet::with_capacity(owners.len());
        for owner in &owners {
            if owner.is_zero() {
                return Err(WalletError::InvalidConfiguration(
                    "invalid owner address".to_string(),
                ));
            }
            if !seen.insert(*owner) {
                return Err(WalletError::InvalidConfiguration(format!(
                    "owner must be unique: {}",
                    owner
                )));
            }
        }

        Ok(Self { owners, policy })
    }

    pub fn owners(&self) -> &[Address] {
        &self.owners
    }

    pub fn required_confirmations(&self) -> usize {
        self.policy.required
    }

    pub fn policy(&self) -> &ThresholdPolicy {
        &self.policy
    }

    /// Check whether `address` belongs to the owner set.
    pub fn is_owner(&self, address: &Address) -> bool {
        self.owners.iter().any(|o| o == address)
    }
}
