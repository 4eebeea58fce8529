use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};
use tally_state::Event;

use crate::types::CandidateId;

/// Notifications emitted by successful election calls.
#[derive(Debug, Clone, PartialEq, Eq, BorshDeserialize, BorshSerialize, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElectionEvent<A> {
    CandidateRegistered {
        id: CandidateId,
        name: String,
    },
    VoterRegistered {
        identity: A,
    },
    BallotCast {
        identity: A,
        candidate_id: CandidateId,
        timestamp: u64,
    },
}

impl<A: BorshSerialize> ElectionEvent<A> {
    pub fn key(&self) -> &'static str {
        match self {
            ElectionEvent::CandidateRegistered { .. } => "Election: candidate_registered",
            ElectionEvent::VoterRegistered { .. } => "Election: voter_registered",
            ElectionEvent::BallotCast { .. } => "Election: ballot_cast",
        }
    }

    pub fn to_event(&self) -> Event {
        Event::new(self.key(), self)
    }
}

impl<A: BorshDeserialize> TryFrom<&Event> for ElectionEvent<A> {
    type Error = std::io::Error;

    fn try_from(event: &Event) -> Result<Self, Self::Error> {
        event.decode()
    }
}
