//! Multi-owner approval
//!
//! ## Modules
//! - `config` - validated owner set and threshold
//! - `policy` - quorum arithmetic
//! - `transaction` - proposed transfer records
//! - `engine` - the approval state machine

pub mod config;
pub mod engine;
pub mod policy;
pub mod transaction;

pub use config::MultiSigConfig;
pub use engine::{ConfirmOutcome, MultisigApprovalEngine, DEFAULT_PAYMENT_TIMEOUT};
pub use policy::ThresholdPolicy;
pub use transaction::{Transaction, TransactionStatus};
