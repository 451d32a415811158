// src/lib.rs
//! Multi-owner safe wallet: an owner set, a confirmation threshold and a
//! ledger of proposed transfers that execute exactly once on quorum.

pub mod cli;
pub mod core;
pub mod events;
pub mod multisig;
pub mod payment;
pub mod simulation;

pub use crate::core::domain::{Address, Amount, TxId};
pub use crate::core::errors::WalletError;
pub use crate::multisig::{ConfirmOutcome, MultisigApprovalEngine};
pub use crate::payment::{PaymentTransfer, TransferError};
