use std::fs::File;
use std::io::{BufReader, Write};
use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, Context as _};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tally_election::{
    error_kind, BallotRecord, CallMessage, Election, ElectionConfig, ElectionEvent,
    ElectionResults, ErrorKind,
};
use tally_modules_api::default_context::DefaultContext;
use tally_modules_api::Address;
use tally_state::InMemoryStorage;
use tracing::info;

use crate::clock::{Clock, ManualClock, SystemClock};
use crate::config::{ClockConfig, LedgerConfig};
use crate::runner::{Ledger, Receipt, Transaction};

/// A ledger running the election module over in-memory storage.
pub type ElectionLedger = Ledger<Election<DefaultContext>>;

/// One scripted transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptEntry {
    /// Ledger time to run the transaction at. Only allowed with a manual clock.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub at: Option<u64>,
    /// The caller.
    pub sender: Address,
    /// The election call.
    pub call: CallMessage<DefaultContext>,
}

/// Whether a replayed transaction went through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Committed.
    Committed,
    /// Rejected without effect.
    Rejected,
}

/// A [`Receipt`] with its events decoded, ready to be printed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReceiptView {
    /// Position in the ledger's total order.
    pub sequence: u64,
    /// Ledger time of execution.
    pub timestamp: u64,
    /// Outcome of the transaction.
    pub status: Status,
    /// Kind of the rejection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
    /// Full rejection message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Decoded events.
    pub events: Vec<ElectionEvent<Address>>,
}

impl ReceiptView {
    /// Decodes the events of `receipt`.
    pub fn from_receipt(receipt: &Receipt) -> anyhow::Result<Self> {
        let events = receipt
            .events
            .iter()
            .map(ElectionEvent::<Address>::try_from)
            .collect::<Result<Vec<_>, _>>()
            .with_context(|| format!("Undecodable event in transaction {}", receipt.sequence))?;
        let error = receipt.error();

        Ok(Self {
            sequence: receipt.sequence,
            timestamp: receipt.timestamp,
            status: if receipt.is_committed() {
                Status::Committed
            } else {
                Status::Rejected
            },
            error_kind: error.and_then(error_kind::<Address>),
            error: error.map(|err| format!("{err:#}")),
            events,
        })
    }
}

/// Everything a replay produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplayReport {
    /// One view per scripted transaction, in order.
    pub receipts: Vec<ReceiptView>,
    /// Results at the time of the last transaction.
    pub results: ElectionResults,
    /// Every recorded ballot, in commit order.
    pub ballots: Vec<BallotRecord<Address>>,
}

#[derive(Serialize)]
struct Summary<'a> {
    results: &'a ElectionResults,
    ballots: &'a [BallotRecord<Address>],
}

impl ReplayReport {
    /// Writes one JSON line per receipt, then the results and the ballots as
    /// a single pretty-printed object.
    pub fn write_json<W: Write>(&self, mut out: W) -> anyhow::Result<()> {
        for receipt in &self.receipts {
            serde_json::to_writer(&mut out, receipt)?;
            writeln!(out)?;
        }
        let summary = Summary {
            results: &self.results,
            ballots: &self.ballots,
        };
        serde_json::to_writer_pretty(&mut out, &summary)?;
        writeln!(out)?;
        out.flush()?;
        Ok(())
    }
}

/// Builds an election ledger as described by `config`.
///
/// The manual clock, if configured, is returned alongside so the caller can
/// move it.
pub fn build_ledger(
    config: &LedgerConfig,
) -> anyhow::Result<(ElectionLedger, Option<Arc<ManualClock>>)> {
    let (clock, manual) = match config.clock {
        ClockConfig::System => (Arc::new(SystemClock) as Arc<dyn Clock>, None),
        ClockConfig::Manual { start } => {
            let clock = Arc::new(ManualClock::new(start));
            (clock.clone() as Arc<dyn Clock>, Some(clock))
        }
    };

    let ledger = Ledger::new(
        Election::default(),
        InMemoryStorage::new(),
        clock,
        &config.runner,
    )?;
    Ok((ledger, manual))
}

/// Submits every entry of `script` in order and collects the outcome.
pub async fn replay(
    ledger: &ElectionLedger,
    clock: Option<&ManualClock>,
    script: Vec<ScriptEntry>,
) -> anyhow::Result<ReplayReport> {
    let mut receipts = Vec::with_capacity(script.len());

    for (index, entry) in script.into_iter().enumerate() {
        if let Some(at) = entry.at {
            let clock = clock.ok_or_else(|| {
                anyhow!("Script entry {index} sets `at`, which requires a manual clock")
            })?;
            clock.set(at);
        }

        let receipt = ledger
            .submit(Transaction::new(entry.sender, entry.call))
            .await?;
        receipts.push(ReceiptView::from_receipt(&receipt)?);
    }

    let (results, ballots) = ledger.query(|election, now, working_set| {
        let results = election.get_results(now, working_set);
        let ballots = election.list_ballots(0, u64::MAX, working_set);
        results.map(|results| (results, ballots))
    })?;

    info!(
        transactions = receipts.len(),
        total_votes = results.total_votes,
        "Replay finished"
    );
    Ok(ReplayReport {
        receipts,
        results,
        ballots,
    })
}

/// Reads a JSON file into `R`.
pub fn from_json_path<P: AsRef<Path>, R: DeserializeOwned>(path: P) -> anyhow::Result<R> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let result = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(result)
}

/// Reads the election genesis configuration.
pub fn load_genesis<P: AsRef<Path>>(path: P) -> anyhow::Result<ElectionConfig<DefaultContext>> {
    from_json_path(path)
}

/// Reads a replay script: a JSON array of [`ScriptEntry`].
pub fn load_script<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<ScriptEntry>> {
    from_json_path(path)
}
