pub mod config;
pub mod domain;
pub mod errors;

pub use config::WalletConfig;
pub use domain::{Address, Amount, TxId};
pub use errors::WalletError;
