#![allow(dead_code)]

use tally_election::{error_kind, CallMessage, Election, ElectionConfig, ErrorKind};
use tally_modules_api::default_context::DefaultContext;
use tally_modules_api::utils::generate_address;
use tally_modules_api::{Address, Context, Error, Event, Module, Storage as _};
use tally_state::{InMemoryStorage, WorkingSet};

pub type C = DefaultContext;

pub const T0: u64 = 1_700_000_000;
pub const T_CLOSE: u64 = T0 + 3600;

pub fn admin() -> Address {
    generate_address::<C>("admin")
}

pub fn identity(label: &str) -> Address {
    generate_address::<C>(label)
}

/// Applies calls the way the ledger runner does: each one on a fresh working
/// set, committed on success and dropped on failure.
pub struct Harness {
    pub election: Election<C>,
    pub storage: InMemoryStorage,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_window(T0, T_CLOSE)
    }

    pub fn with_window(opens_at: u64, closes_at: u64) -> Self {
        let election = Election::<C>::default();
        let storage = InMemoryStorage::new();
        let config = ElectionConfig::<C> {
            title: "Test election".to_owned(),
            description: "Integration test".to_owned(),
            opens_at,
            closes_at,
            admin: admin(),
        };

        let mut working_set = WorkingSet::new(storage.clone());
        election.genesis(&config, &mut working_set).unwrap();
        storage.commit(working_set.checkpoint().freeze()).unwrap();

        Self { election, storage }
    }

    pub fn apply(&self, sender: Address, now: u64, msg: CallMessage<C>) -> Result<Vec<Event>, Error> {
        let context = C::new(sender, now);
        let mut working_set = WorkingSet::new(self.storage.clone());
        match self.election.call(msg, &context, &mut working_set) {
            Ok(_) => {
                let events = working_set.take_events();
                self.storage
                    .commit(working_set.checkpoint().freeze())
                    .unwrap();
                Ok(events)
            }
            Err(err) => {
                assert!(
                    !working_set.has_pending_writes(),
                    "rejected call left writes behind"
                );
                assert!(working_set.events().is_empty(), "rejected call emitted events");
                working_set.revert();
                Err(err)
            }
        }
    }

    pub fn register_candidate(&self, id: u64, name: &str) -> Result<Vec<Event>, Error> {
        self.apply(
            admin(),
            T0 - 60,
            CallMessage::RegisterCandidate {
                id,
                name: name.to_owned(),
                description: format!("{name} for president"),
            },
        )
    }

    pub fn register_voter(&self, identity: Address) -> Result<Vec<Event>, Error> {
        self.apply(admin(), T0 - 60, CallMessage::RegisterVoter { identity })
    }

    pub fn vote(&self, voter: Address, now: u64, candidate_id: u64) -> Result<Vec<Event>, Error> {
        self.apply(voter, now, CallMessage::CastBallot { candidate_id })
    }

    pub fn read(&self) -> WorkingSet<InMemoryStorage> {
        WorkingSet::new(self.storage.snapshot())
    }
}

pub fn kind<T: std::fmt::Debug>(result: Result<T, Error>) -> ErrorKind {
    let err = result.unwrap_err();
    error_kind::<Address>(&err).expect("not an election error")
}
