use std::fmt::{Debug, Display};

use serde::{Deserialize, Serialize};

use crate::types::CandidateId;

/// Every way an election call or lookup can be rejected.
///
/// Rejections are final: they depend only on the current state and the
/// request, and leave the state untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ElectionError<A: Debug + Display> {
    #[error("{caller} is not the election administrator")]
    Unauthorized { caller: A },

    #[error("a candidate with id {id} is already registered, pick another id")]
    DuplicateCandidate { id: CandidateId },

    #[error("{identity} is already registered as an eligible voter")]
    AlreadyRegistered { identity: A },

    #[error("{identity} has already cast a ballot")]
    DuplicateBallot { identity: A },

    #[error("{identity} is not registered as an eligible voter")]
    Ineligible { identity: A },

    #[error("ballots are accepted from {opens_at} to {closes_at}, ledger time is {now}")]
    ElectionClosed {
        now: u64,
        opens_at: u64,
        closes_at: u64,
    },

    #[error("no candidate with id {id} is registered")]
    UnknownCandidate { id: CandidateId },

    #[error("{0} not found")]
    NotFound(Lookup<A>),

    #[error("the election must open no later than it closes (opens at {opens_at}, closes at {closes_at})")]
    InvalidSchedule { opens_at: u64, closes_at: u64 },

    #[error("invalid election configuration: {0}")]
    InvalidConfig(String),

    #[error("the election has already been created")]
    AlreadyInitialized,

    #[error("the election has not been created yet")]
    NotInitialized,

    #[error("vote count overflow")]
    Overflow,
}

/// The thing a failed lookup was looking for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<A> {
    Candidate(CandidateId),
    Ballot(A),
}

impl<A: Display> Display for Lookup<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Lookup::Candidate(id) => write!(f, "candidate {id}"),
            Lookup::Ballot(identity) => write!(f, "ballot of {identity}"),
        }
    }
}

/// Fieldless view of [`ElectionError`], for matching and reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Unauthorized,
    DuplicateCandidate,
    AlreadyRegistered,
    DuplicateBallot,
    Ineligible,
    ElectionClosed,
    UnknownCandidate,
    NotFound,
    InvalidSchedule,
    InvalidConfig,
    AlreadyInitialized,
    NotInitialized,
    Overflow,
}

impl<A: Debug + Display> ElectionError<A> {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ElectionError::Unauthorized { .. } => ErrorKind::Unauthorized,
            ElectionError::DuplicateCandidate { .. } => ErrorKind::DuplicateCandidate,
            ElectionError::AlreadyRegistered { .. } => ErrorKind::AlreadyRegistered,
            ElectionError::DuplicateBallot { .. } => ErrorKind::DuplicateBallot,
            ElectionError::Ineligible { .. } => ErrorKind::Ineligible,
            ElectionError::ElectionClosed { .. } => ErrorKind::ElectionClosed,
            ElectionError::UnknownCandidate { .. } => ErrorKind::UnknownCandidate,
            ElectionError::NotFound(_) => ErrorKind::NotFound,
            ElectionError::InvalidSchedule { .. } => ErrorKind::InvalidSchedule,
            ElectionError::InvalidConfig(_) => ErrorKind::InvalidConfig,
            ElectionError::AlreadyInitialized => ErrorKind::AlreadyInitialized,
            ElectionError::NotInitialized => ErrorKind::NotInitialized,
            ElectionError::Overflow => ErrorKind::Overflow,
        }
    }
}

/// Recovers the [`ErrorKind`] of an election rejection that crossed the module boundary.
pub fn error_kind<A>(err: &tally_modules_api::Error) -> Option<ErrorKind>
where
    A: Debug + Display + Send + Sync + 'static,
{
    err.downcast_ref::<ElectionError<A>>()
        .map(ElectionError::kind)
}
