use std::sync::Arc;

use anyhow::{ensure, Context as _};
use tally_modules_api::{Context, Error, Event, Module, Spec, Storage};
use tally_state::WorkingSet;
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info, trace};

use crate::clock::Clock;
use crate::config::RunnerConfig;

type ContextOf<M> = <M as Module>::Context;
type StorageOf<M> = <ContextOf<M> as Spec>::Storage;
type AddressOf<M> = <ContextOf<M> as Spec>::Address;

/// A call submitted to the ledger.
pub struct Transaction<M: Module> {
    /// Identity the call is made by.
    pub sender: AddressOf<M>,
    /// The module call.
    pub message: M::CallMessage,
}

impl<M: Module> Transaction<M> {
    /// Creates a transaction.
    pub fn new(sender: AddressOf<M>, message: M::CallMessage) -> Self {
        Self { sender, message }
    }
}

/// What happened to a transaction.
#[derive(Debug)]
pub enum TxOutcome {
    /// The writes were applied. `version` is the storage version they produced.
    Committed {
        /// Storage version after the commit.
        version: u64,
    },
    /// The call was rejected and nothing was written.
    Rejected(Error),
}

/// The result of applying one transaction.
#[derive(Debug)]
pub struct Receipt {
    /// Position of the transaction in the ledger's total order.
    pub sequence: u64,
    /// Ledger time the transaction was executed at.
    pub timestamp: u64,
    /// Whether the transaction was committed.
    pub outcome: TxOutcome,
    /// Events emitted by the transaction. Always empty for rejected ones.
    pub events: Vec<Event>,
}

impl Receipt {
    /// Returns `true` if the transaction's writes were applied.
    pub fn is_committed(&self) -> bool {
        matches!(self.outcome, TxOutcome::Committed { .. })
    }

    /// The rejection, if the transaction was rejected.
    pub fn error(&self) -> Option<&Error> {
        match &self.outcome {
            TxOutcome::Committed { .. } => None,
            TxOutcome::Rejected(err) => Some(err),
        }
    }
}

/// An event published after its transaction was committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEvent {
    /// Sequence number of the transaction that emitted the event.
    pub sequence: u64,
    /// The event itself.
    pub event: Event,
}

/// The single writer in front of a module's state.
///
/// Transactions are applied one at a time, in the order they acquire the
/// executor lock. Reads never take that lock: they run against a snapshot of
/// the last commit.
pub struct Ledger<M: Module> {
    module: M,
    storage: StorageOf<M>,
    clock: Arc<dyn Clock>,
    /// Sequence number of the next transaction.
    executor: Mutex<u64>,
    events: broadcast::Sender<LedgerEvent>,
}

impl<M> Ledger<M>
where
    M: Module,
{
    /// Creates a ledger over `storage`. Genesis still has to be run.
    pub fn new(
        module: M,
        storage: StorageOf<M>,
        clock: Arc<dyn Clock>,
        config: &RunnerConfig,
    ) -> anyhow::Result<Self> {
        ensure!(
            config.event_channel_capacity > 0,
            "event_channel_capacity must be greater than zero"
        );
        let (events, _) = broadcast::channel(config.event_channel_capacity);

        Ok(Self {
            module,
            storage,
            clock,
            executor: Mutex::new(0),
            events,
        })
    }

    /// Runs the module's genesis and commits its writes.
    pub async fn genesis(&self, config: &M::Config) -> anyhow::Result<()> {
        let _executor = self.executor.lock().await;

        let mut working_set = WorkingSet::new(self.storage.clone());
        self.module
            .genesis(config, &mut working_set)
            .context("Genesis failed")?;
        let version = self
            .storage
            .commit(working_set.checkpoint().freeze())
            .context("Failed to commit genesis state")?;

        info!(version, "Genesis committed");
        Ok(())
    }

    /// Applies a transaction.
    ///
    /// The clock is read once, under the executor lock. Every submitted
    /// transaction consumes a sequence number: a rejected call is reverted, a
    /// failed commit is returned as an error.
    pub async fn submit(&self, tx: Transaction<M>) -> anyhow::Result<Receipt> {
        let mut next_sequence = self.executor.lock().await;
        let sequence = *next_sequence;
        *next_sequence += 1;
        let timestamp = self.clock.now();
        let sender = tx.sender;
        let context = <ContextOf<M> as Context>::new(sender, timestamp);

        let mut working_set = WorkingSet::new(self.storage.clone());
        let receipt = match self.module.call(tx.message, &context, &mut working_set) {
            Ok(_) => {
                let events = working_set.take_events();
                let version = self
                    .storage
                    .commit(working_set.checkpoint().freeze())
                    .with_context(|| format!("Failed to commit transaction {sequence}"))?;
                debug!(sequence, %sender, timestamp, version, "Transaction committed");

                Receipt {
                    sequence,
                    timestamp,
                    outcome: TxOutcome::Committed { version },
                    events,
                }
            }
            Err(err) => {
                working_set.revert();
                debug!(sequence, %sender, timestamp, error = %err, "Transaction rejected");

                Receipt {
                    sequence,
                    timestamp,
                    outcome: TxOutcome::Rejected(err),
                    events: Vec::new(),
                }
            }
        };

        // Published while the lock is still held so subscribers see commit order.
        for event in &receipt.events {
            let published = LedgerEvent {
                sequence,
                event: event.clone(),
            };
            if self.events.send(published).is_err() {
                trace!(sequence, "No event subscribers");
            }
        }

        Ok(receipt)
    }

    /// Runs `query` against a snapshot of the last commit, with the clock read once.
    pub fn query<R>(&self, query: impl FnOnce(&M, u64, &mut WorkingSet<StorageOf<M>>) -> R) -> R {
        let now = self.clock.now();
        let mut working_set = WorkingSet::new(self.storage.snapshot());
        query(&self.module, now, &mut working_set)
    }

    /// Returns a pinned snapshot of the last commit, for several reads that
    /// must agree with each other.
    pub fn snapshot(&self) -> WorkingSet<StorageOf<M>> {
        WorkingSet::new(self.storage.snapshot())
    }

    /// Subscribes to events committed from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<LedgerEvent> {
        self.events.subscribe()
    }

    /// The module the ledger drives.
    pub fn module(&self) -> &M {
        &self.module
    }

    /// Number of commits applied to the storage so far.
    pub fn version(&self) -> u64 {
        self.storage.version()
    }
}
