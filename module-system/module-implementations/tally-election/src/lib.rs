//! The election module: an eligibility registry, a candidate registry, an
//! append-only ballot ledger and the controller gating them on the election
//! window.

pub mod call;
mod error;
mod event;
pub mod genesis;
pub mod query;
mod types;

use anyhow::Context as _;
pub use call::CallMessage;
pub use error::{error_kind, ElectionError, ErrorKind, Lookup};
pub use event::ElectionEvent;
pub use genesis::ElectionConfig;
pub use query::{CandidateTally, ElectionInfo, ElectionResults};
use tally_modules_api::{CallResponse, Context, Error, ModuleInfo, Prefix, Spec};
use tally_state::{StateMap, StateValue, StateVec, WorkingSet};
pub use types::{Ballot, BallotRecord, Candidate, CandidateId, ElectionMetadata, ElectionPhase};

const MODULE_NAME: &str = "Election";

#[derive(Clone)]
pub struct Election<C: Context> {
    pub address: C::Address,

    pub(crate) metadata: StateValue<ElectionMetadata<C::Address>>,

    /// Running total, equal to the number of recorded ballots.
    pub(crate) total_votes: StateValue<u64>,

    pub(crate) candidates: StateMap<CandidateId, Candidate>,

    /// Candidate ids in registration order.
    pub(crate) candidate_ids: StateVec<CandidateId>,

    pub(crate) eligible_voters: StateMap<C::Address, bool>,

    pub(crate) eligible_voter_count: StateValue<u64>,

    pub(crate) ballots: StateMap<C::Address, Ballot>,

    /// Voters in the order their ballots were committed.
    pub(crate) ballot_order: StateVec<C::Address>,
}

fn storage_prefix(field: &'static str) -> tally_state::Prefix {
    Prefix::new_storage(module_path!(), MODULE_NAME, field).into()
}

impl<C: Context> Default for Election<C> {
    fn default() -> Self {
        Self {
            address: C::Address::from(Prefix::new_module(module_path!(), MODULE_NAME).hash::<C>()),
            metadata: StateValue::new(storage_prefix("metadata")),
            total_votes: StateValue::new(storage_prefix("total_votes")),
            candidates: StateMap::new(storage_prefix("candidates")),
            candidate_ids: StateVec::new(storage_prefix("candidate_ids")),
            eligible_voters: StateMap::new(storage_prefix("eligible_voters")),
            eligible_voter_count: StateValue::new(storage_prefix("eligible_voter_count")),
            ballots: StateMap::new(storage_prefix("ballots")),
            ballot_order: StateVec::new(storage_prefix("ballot_order")),
        }
    }
}

impl<C: Context> ModuleInfo for Election<C> {
    type Context = C;

    fn address(&self) -> &C::Address {
        &self.address
    }

    fn prefix(&self) -> Prefix {
        Prefix::new_module(module_path!(), MODULE_NAME)
    }
}

impl<C: Context> tally_modules_api::Module for Election<C> {
    type Context = C;

    type Config = ElectionConfig<C>;

    type CallMessage = call::CallMessage<C>;

    fn genesis(
        &self,
        config: &Self::Config,
        working_set: &mut WorkingSet<<C as Spec>::Storage>,
    ) -> Result<(), Error> {
        Ok(self.init_module(config, working_set)?)
    }

    fn call(
        &self,
        msg: Self::CallMessage,
        context: &Self::Context,
        working_set: &mut WorkingSet<<C as Spec>::Storage>,
    ) -> Result<CallResponse, Error> {
        let sender = *context.sender();
        match msg {
            CallMessage::RegisterCandidate {
                id,
                name,
                description,
            } => Ok(self
                .register_candidate(id, name, description, context, working_set)
                .with_context(|| format!("Failed to register candidate {id} by sender {sender}"))?),

            CallMessage::RegisterVoter { identity } => Ok(self
                .register_voter(identity, context, working_set)
                .with_context(|| format!("Failed to register voter {identity} by sender {sender}"))?),

            CallMessage::CastBallot { candidate_id } => Ok(self
                .cast_ballot(candidate_id, context, working_set)
                .with_context(|| {
                    format!("Failed to cast ballot for candidate {candidate_id} by sender {sender}")
                })?),
        }
    }
}
