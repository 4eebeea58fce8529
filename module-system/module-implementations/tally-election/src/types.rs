use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

/// Numeric candidate identifier, unique within the election.
pub type CandidateId = u64;

/// The descriptive part of an election. Written once at genesis.
#[derive(Debug, Clone, PartialEq, Eq, BorshDeserialize, BorshSerialize, Serialize, Deserialize)]
pub struct ElectionMetadata<A> {
    pub title: String,
    pub description: String,
    pub opens_at: u64,
    pub closes_at: u64,
    pub admin: A,
}

impl<A> ElectionMetadata<A> {
    pub fn phase(&self, now: u64) -> ElectionPhase {
        ElectionPhase::at(self.opens_at, self.closes_at, now)
    }
}

/// Where the election stands at a given instant. Derived, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElectionPhase {
    Unopened,
    Open,
    Closed,
}

impl ElectionPhase {
    /// Both ends of the window are inclusive.
    pub fn at(opens_at: u64, closes_at: u64, now: u64) -> Self {
        if now < opens_at {
            ElectionPhase::Unopened
        } else if now > closes_at {
            ElectionPhase::Closed
        } else {
            ElectionPhase::Open
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, BorshDeserialize, BorshSerialize, Serialize, Deserialize)]
pub struct Candidate {
    pub id: CandidateId,
    pub name: String,
    pub description: String,
    pub votes: u64,
}

impl Candidate {
    pub(crate) fn new(id: CandidateId, name: String, description: String) -> Self {
        Self {
            id,
            name,
            description,
            votes: 0,
        }
    }
}

/// One identity's vote. Never updated once written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, BorshDeserialize, BorshSerialize, Serialize, Deserialize)]
pub struct Ballot {
    pub candidate_id: CandidateId,
    pub cast_at: u64,
}

/// A ballot as it appears in the enumeration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BallotRecord<A> {
    pub sequence: u64,
    pub identity: A,
    pub candidate_id: CandidateId,
    pub cast_at: u64,
}
