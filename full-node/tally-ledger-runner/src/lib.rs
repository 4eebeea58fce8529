#![deny(missing_docs)]
//! The ordering boundary of the Tally ledger.
//!
//! A [`Ledger`] owns a module and its storage and is the only writer to that
//! storage. Transactions are serialized behind an async mutex, stamped with a
//! single clock reading, and either committed in one step or reverted
//! entirely. Reads run against copy-on-write snapshots and never wait on the
//! writer.

/// Clocks the ledger reads its time from.
pub mod clock;
/// TOML configuration of the runner.
pub mod config;
/// Replays a scripted list of election transactions.
pub mod replay;
mod runner;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{from_toml_path, ClockConfig, LedgerConfig, RunnerConfig};
pub use runner::{Ledger, LedgerEvent, Receipt, Transaction, TxOutcome};
