//! Scripted replay of owner actions against an engine backed by an
//! [`InMemoryLedger`]. Drives the `simulate` subcommand.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

use crate::core::config::WalletConfig;
use crate::core::domain::{amount_serde, Address, Amount, TxId};
use crate::core::errors::WalletError;
use crate::events::{RecordingSubscriber, WalletEvent};
use crate::multisig::{ConfirmOutcome, MultisigApprovalEngine};
use crate::payment::InMemoryLedger;

/// One scripted action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ScriptStep {
    Deposit {
        #[serde(with = "amount_serde")]
        amount: Amount,
    },
    Propose {
        caller: Address,
        destination: Address,
        #[serde(with = "amount_serde")]
        amount: Amount,
    },
    Confirm { caller: Address, tx_id: TxId },
}

/// What happened when a step ran.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum StepResult {
    Deposited {
        #[serde(with = "amount_serde")]
        balance: Amount,
    },
    Proposed { tx_id: TxId },
    Confirmed(ConfirmOutcome),
    Failed { code: String, message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepReport {
    pub index: usize,
    pub step: ScriptStep,
    pub result: StepResult,
    pub events: Vec<WalletEvent>,
}

pub fn load_script(path: impl AsRef<Path>) -> Result<Vec<ScriptStep>, WalletError> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path)
        .map_err(|e| WalletError::Config(format!("{}: {}", path.display(), e)))?;
    serde_json::from_str(&raw).map_err(|e| WalletError::Config(format!("{}: {}", path.display(), e)))
}

/// Engine wired to an in-memory ledger, with every event recorded.
pub struct Simulator {
    engine: MultisigApprovalEngine,
    ledger: Arc<InMemoryLedger>,
    recorder: Arc<RecordingSubscriber>,
}

impl Simulator {
    pub fn new(config: &WalletConfig) -> Result<Self, WalletError> {
        let ledger = Arc::new(InMemoryLedger::with_balance(config.initial_balance));
        let engine = MultisigApprovalEngine::from_config(config, ledger.clone())?;
        let recorder = Arc::new(RecordingSubscriber::new());
        engine.subscribe(recorder.clone());
        Ok(Self { engine, ledger, recorder })
    }

    pub fn engine(&self) -> &MultisigApprovalEngine {
        &self.engine
    }

    pub fn ledger(&self) -> &InMemoryLedger {
        &self.ledger
    }

    /// Run one step. Engine errors become `StepResult::Failed`; the script
    /// keeps going.
    pub async fn step(&self, index: usize, step: ScriptStep) -> StepReport {
        let result = match &step {
            ScriptStep::Deposit { amount } => Ok(StepResult::Deposited {
                balance: self.ledger.deposit(*amount),
            }),
            ScriptStep::Propose { caller, destination, amount } => self
                .engine
                .propose(caller, *destination, *amount)
                .await
                .map(|tx_id| StepResult::Proposed { tx_id }),
            ScriptStep::Confirm { caller, tx_id } => {
                self.engine.confirm(caller, *tx_id).await.map(StepResult::Confirmed)
            }
        };

        let result = result.unwrap_or_else(|e| StepResult::Failed {
            code: e.code().to_string(),
            message: e.to_string(),
        });

        StepReport { index, step, result, events: self.recorder.take() }
    }

    pub async fn run(&self, steps: Vec<ScriptStep>) -> Vec<StepReport> {
        let mut reports = Vec::with_capacity(steps.len());
        for (index, step) in steps.into_iter().enumerate() {
            reports.push(self.step(index, step).await);
        }
        reports
    }
}
