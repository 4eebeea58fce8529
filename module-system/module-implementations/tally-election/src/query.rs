use serde::{Deserialize, Serialize};
use tally_modules_api::Context;
use tally_state::WorkingSet;
use tracing::error;

use crate::types::{Ballot, BallotRecord, Candidate, CandidateId, ElectionPhase};
use crate::{Election, ElectionError, Lookup};

/// Descriptive data of the election plus its live counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectionInfo<A> {
    pub title: String,
    pub description: String,
    pub opens_at: u64,
    pub closes_at: u64,
    pub admin: A,
    pub total_votes: u64,
    pub candidate_count: u64,
    pub phase: ElectionPhase,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateTally {
    pub id: CandidateId,
    pub name: String,
    pub votes: u64,
}

impl From<Candidate> for CandidateTally {
    fn from(candidate: Candidate) -> Self {
        Self {
            id: candidate.id,
            name: candidate.name,
            votes: candidate.votes,
        }
    }
}

/// Tallies in candidate registration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectionResults {
    pub candidates: Vec<CandidateTally>,
    pub total_votes: u64,
    pub phase: ElectionPhase,
}

impl ElectionResults {
    /// Candidates sharing the highest tally, in registration order. Empty when
    /// nobody has any vote.
    pub fn leaders(&self) -> Vec<&CandidateTally> {
        let top = self.candidates.iter().map(|c| c.votes).max().unwrap_or(0);
        if top == 0 {
            return Vec::new();
        }
        self.candidates.iter().filter(|c| c.votes == top).collect()
    }
}

impl<C: Context> Election<C> {
    pub fn is_eligible(&self, identity: &C::Address, working_set: &mut WorkingSet<C::Storage>) -> bool {
        self.eligible_voters
            .get(identity, working_set)
            .unwrap_or_default()
    }

    pub fn eligible_voter_count(&self, working_set: &mut WorkingSet<C::Storage>) -> u64 {
        self.eligible_voter_count.get(working_set).unwrap_or_default()
    }

    pub fn get_candidate(
        &self,
        id: CandidateId,
        working_set: &mut WorkingSet<C::Storage>,
    ) -> Result<Candidate, ElectionError<C::Address>> {
        self.candidates
            .get(&id, working_set)
            .ok_or(ElectionError::NotFound(Lookup::Candidate(id)))
    }

    pub fn list_candidate_ids(&self, working_set: &mut WorkingSet<C::Storage>) -> Vec<CandidateId> {
        self.candidate_ids
            .collect_all(working_set)
            .unwrap_or_else(|err| {
                error!(error = %err, "Candidate registry is inconsistent");
                Vec::new()
            })
    }

    /// Every candidate with its tally, in registration order.
    pub fn list_results(&self, working_set: &mut WorkingSet<C::Storage>) -> Vec<CandidateTally> {
        self.list_candidate_ids(working_set)
            .into_iter()
            .filter_map(|id| self.candidates.get(&id, working_set))
            .map(CandidateTally::from)
            .collect()
    }

    pub fn has_voted(&self, identity: &C::Address, working_set: &mut WorkingSet<C::Storage>) -> bool {
        self.ballots.contains(identity, working_set)
    }

    /// The ballot `identity` cast. Ballots are public.
    pub fn get_ballot(
        &self,
        identity: &C::Address,
        working_set: &mut WorkingSet<C::Storage>,
    ) -> Result<Ballot, ElectionError<C::Address>> {
        self.ballots
            .get(identity, working_set)
            .ok_or(ElectionError::NotFound(Lookup::Ballot(*identity)))
    }

    pub fn ballot_count(&self, working_set: &mut WorkingSet<C::Storage>) -> u64 {
        self.ballot_order.len(working_set) as u64
    }

    /// Up to `limit` ballots starting at position `offset` of the commit order.
    pub fn list_ballots(
        &self,
        offset: u64,
        limit: u64,
        working_set: &mut WorkingSet<C::Storage>,
    ) -> Vec<BallotRecord<C::Address>> {
        let start = usize::try_from(offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);
        let identities = self
            .ballot_order
            .range(start, limit, working_set)
            .unwrap_or_else(|err| {
                error!(error = %err, "Ballot order is inconsistent");
                Vec::new()
            });

        identities
            .into_iter()
            .enumerate()
            .filter_map(|(index, identity)| {
                let sequence = offset + index as u64;
                let ballot = self.ballots.get(&identity, working_set)?;
                Some(BallotRecord {
                    sequence,
                    identity,
                    candidate_id: ballot.candidate_id,
                    cast_at: ballot.cast_at,
                })
            })
            .collect()
    }

    /// `None` until the election has been created.
    pub fn phase(&self, now: u64, working_set: &mut WorkingSet<C::Storage>) -> Option<ElectionPhase> {
        self.metadata.get(working_set).map(|metadata| metadata.phase(now))
    }

    pub fn is_active(&self, now: u64, working_set: &mut WorkingSet<C::Storage>) -> bool {
        self.phase(now, working_set) == Some(ElectionPhase::Open)
    }

    pub fn total_votes(&self, working_set: &mut WorkingSet<C::Storage>) -> u64 {
        self.total_votes.get(working_set).unwrap_or_default()
    }

    pub fn get_election_info(
        &self,
        now: u64,
        working_set: &mut WorkingSet<C::Storage>,
    ) -> Result<ElectionInfo<C::Address>, ElectionError<C::Address>> {
        let metadata = self.metadata_or_err(working_set)?;
        let phase = metadata.phase(now);

        Ok(ElectionInfo {
            title: metadata.title,
            description: metadata.description,
            opens_at: metadata.opens_at,
            closes_at: metadata.closes_at,
            admin: metadata.admin,
            total_votes: self.total_votes(working_set),
            candidate_count: self.candidate_ids.len(working_set) as u64,
            phase,
        })
    }

    pub fn get_results(
        &self,
        now: u64,
        working_set: &mut WorkingSet<C::Storage>,
    ) -> Result<ElectionResults, ElectionError<C::Address>> {
        let phase = self.metadata_or_err(working_set)?.phase(now);

        Ok(ElectionResults {
            candidates: self.list_results(working_set),
            total_votes: self.total_votes(working_set),
            phase,
        })
    }
}
