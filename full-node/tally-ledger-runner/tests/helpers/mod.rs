#![allow(dead_code)]

use std::sync::Arc;

use tally_election::{error_kind, CallMessage, Election, ElectionConfig, ErrorKind};
use tally_ledger_runner::{Ledger, ManualClock, Receipt, RunnerConfig, Transaction};
use tally_modules_api::default_context::DefaultContext;
use tally_modules_api::utils::generate_address;
use tally_modules_api::Address;
use tally_state::InMemoryStorage;

pub type C = DefaultContext;
pub type ElectionLedger = Ledger<Election<C>>;

pub const T0: u64 = 1_700_000_000;
pub const T_CLOSE: u64 = T0 + 3600;

pub fn admin() -> Address {
    generate_address::<C>("admin")
}

pub fn identity(label: &str) -> Address {
    generate_address::<C>(label)
}

pub fn election_config() -> ElectionConfig<C> {
    ElectionConfig {
        title: "Runner election".to_owned(),
        description: String::new(),
        opens_at: T0,
        closes_at: T_CLOSE,
        admin: admin(),
    }
}

/// A ledger after genesis, with its clock stopped just before the election opens.
pub async fn new_ledger() -> (Arc<ElectionLedger>, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(T0 - 60));
    let ledger = Ledger::new(
        Election::<C>::default(),
        InMemoryStorage::new(),
        clock.clone(),
        &RunnerConfig::default(),
    )
    .unwrap();
    ledger.genesis(&election_config()).await.unwrap();
    (Arc::new(ledger), clock)
}

pub async fn submit(ledger: &ElectionLedger, sender: Address, message: CallMessage<C>) -> Receipt {
    ledger
        .submit(Transaction::new(sender, message))
        .await
        .unwrap()
}

pub async fn register_candidate(ledger: &ElectionLedger, id: u64, name: &str) -> Receipt {
    submit(
        ledger,
        admin(),
        CallMessage::RegisterCandidate {
            id,
            name: name.to_owned(),
            description: String::new(),
        },
    )
    .await
}

pub async fn register_voter(ledger: &ElectionLedger, identity: Address) -> Receipt {
    submit(ledger, admin(), CallMessage::RegisterVoter { identity }).await
}

pub async fn vote(ledger: &ElectionLedger, voter: Address, candidate_id: u64) -> Receipt {
    submit(ledger, voter, CallMessage::CastBallot { candidate_id }).await
}

pub fn rejection(receipt: &Receipt) -> Option<ErrorKind> {
    receipt.error().and_then(error_kind::<Address>)
}
