use anyhow::{ensure, Result};
use tally_modules_api::{CallResponse, Context};
use tally_state::WorkingSet;
use tracing::debug;

use crate::event::ElectionEvent;
use crate::types::{Ballot, Candidate, CandidateId, ElectionMetadata, ElectionPhase};
use crate::{Election, ElectionError};

/// Call actions supported by the module.
#[derive(
    borsh::BorshDeserialize,
    borsh::BorshSerialize,
    serde::Serialize,
    serde::Deserialize,
    Debug,
    PartialEq,
    Clone,
)]
#[serde(
    rename_all = "snake_case",
    bound = "C::Address: serde::Serialize + serde::de::DeserializeOwned"
)]
pub enum CallMessage<C: Context> {
    /// Adds a candidate with zero votes. Must be called by the admin.
    RegisterCandidate {
        id: CandidateId,
        name: String,
        description: String,
    },
    /// Makes `identity` eligible to vote. Must be called by the admin.
    RegisterVoter { identity: C::Address },
    /// Casts the sender's ballot.
    CastBallot { candidate_id: CandidateId },
}

impl<C: Context> Election<C> {
    /// Registers a candidate. Allowed at any time, including after the election opened.
    pub(crate) fn register_candidate(
        &self,
        id: CandidateId,
        name: String,
        description: String,
        context: &C,
        working_set: &mut WorkingSet<C::Storage>,
    ) -> Result<CallResponse> {
        self.exit_if_not_admin(context, working_set)?;
        ensure!(
            !self.candidates.contains(&id, working_set),
            ElectionError::<C::Address>::DuplicateCandidate { id }
        );

        let candidate = Candidate::new(id, name, description);
        self.candidates.set(&id, &candidate, working_set);
        self.candidate_ids.push(&id, working_set);

        working_set.add_event(
            ElectionEvent::<C::Address>::CandidateRegistered {
                id,
                name: candidate.name,
            }
            .to_event(),
        );
        debug!(id, "Candidate registered");

        Ok(CallResponse::default())
    }

    /// Grants `identity` the right to vote. There is no way to take it back.
    pub(crate) fn register_voter(
        &self,
        identity: C::Address,
        context: &C,
        working_set: &mut WorkingSet<C::Storage>,
    ) -> Result<CallResponse> {
        self.exit_if_not_admin(context, working_set)?;
        ensure!(
            !self.is_eligible(&identity, working_set),
            ElectionError::AlreadyRegistered { identity }
        );

        let count = self
            .eligible_voter_count
            .get(working_set)
            .unwrap_or_default()
            .checked_add(1)
            .ok_or(ElectionError::<C::Address>::Overflow)?;

        self.eligible_voters.set(&identity, &true, working_set);
        self.eligible_voter_count.set(&count, working_set);

        working_set.add_event(ElectionEvent::VoterRegistered { identity }.to_event());
        debug!(%identity, "Voter registered");

        Ok(CallResponse::default())
    }

    /// Records the sender's ballot.
    ///
    /// Checks run in a fixed order (eligibility, window, candidate, duplicate)
    /// and every one of them happens before the first write.
    pub(crate) fn cast_ballot(
        &self,
        candidate_id: CandidateId,
        context: &C,
        working_set: &mut WorkingSet<C::Storage>,
    ) -> Result<CallResponse> {
        let metadata = self.metadata_or_err(working_set)?;
        let identity = *context.sender();
        let now = context.timestamp();

        ensure!(
            self.is_eligible(&identity, working_set),
            ElectionError::Ineligible { identity }
        );
        ensure!(
            metadata.phase(now) == ElectionPhase::Open,
            ElectionError::<C::Address>::ElectionClosed {
                now,
                opens_at: metadata.opens_at,
                closes_at: metadata.closes_at,
            }
        );
        let mut candidate = self
            .candidates
            .get(&candidate_id, working_set)
            .ok_or(ElectionError::<C::Address>::UnknownCandidate { id: candidate_id })?;
        ensure!(
            !self.ballots.contains(&identity, working_set),
            ElectionError::DuplicateBallot { identity }
        );

        candidate.votes = candidate
            .votes
            .checked_add(1)
            .ok_or(ElectionError::<C::Address>::Overflow)?;
        let total_votes = self
            .total_votes
            .get(working_set)
            .unwrap_or_default()
            .checked_add(1)
            .ok_or(ElectionError::<C::Address>::Overflow)?;

        let ballot = Ballot {
            candidate_id,
            cast_at: now,
        };
        self.ballots.set(&identity, &ballot, working_set);
        let sequence = self.ballot_order.push(&identity, working_set);
        self.candidates.set(&candidate_id, &candidate, working_set);
        self.total_votes.set(&total_votes, working_set);

        working_set.add_event(
            ElectionEvent::BallotCast {
                identity,
                candidate_id,
                timestamp: now,
            }
            .to_event(),
        );
        debug!(%identity, candidate_id, sequence, "Ballot recorded");

        Ok(CallResponse::default())
    }

    pub(crate) fn metadata_or_err(
        &self,
        working_set: &mut WorkingSet<C::Storage>,
    ) -> Result<ElectionMetadata<C::Address>, ElectionError<C::Address>> {
        self.metadata
            .get(working_set)
            .ok_or(ElectionError::NotInitialized)
    }

    fn exit_if_not_admin(
        &self,
        context: &C,
        working_set: &mut WorkingSet<C::Storage>,
    ) -> Result<()> {
        let metadata = self.metadata_or_err(working_set)?;

        ensure!(
            &metadata.admin == context.sender(),
            ElectionError::Unauthorized {
                caller: *context.sender()
            }
        );
        Ok(())
    }
}
