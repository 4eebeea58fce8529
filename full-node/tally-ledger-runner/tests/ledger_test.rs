use std::sync::Arc;

use helpers::*;
use tally_election::{ElectionEvent, ErrorKind};
use tally_ledger_runner::{Ledger, RunnerConfig, SystemClock, TxOutcome};
use tally_modules_api::Address;
use tally_state::InMemoryStorage;

mod helpers;

#[tokio::test]
async fn receipts_carry_sequence_time_and_events() {
    let (ledger, clock) = new_ledger().await;
    let voter = identity("voter");

    let receipt = register_candidate(&ledger, 1, "Alice").await;
    assert_eq!(receipt.sequence, 0);
    assert_eq!(receipt.timestamp, T0 - 60);
    assert!(matches!(receipt.outcome, TxOutcome::Committed { .. }));
    assert_eq!(receipt.events.len(), 1);

    register_voter(&ledger, voter).await;

    clock.set(T0 + 5);
    let receipt = vote(&ledger, voter, 1).await;
    assert_eq!(receipt.sequence, 2);
    assert_eq!(receipt.timestamp, T0 + 5);
    assert_eq!(
        ElectionEvent::<Address>::try_from(&receipt.events[0]).unwrap(),
        ElectionEvent::BallotCast {
            identity: voter,
            candidate_id: 1,
            timestamp: T0 + 5,
        }
    );

    let ballot = ledger.query(|election, _, working_set| election.get_ballot(&voter, working_set));
    assert_eq!(ballot.unwrap().cast_at, T0 + 5);
}

#[tokio::test]
async fn rejected_transactions_change_nothing() {
    let (ledger, clock) = new_ledger().await;
    let voter = identity("voter");
    register_candidate(&ledger, 1, "Alice").await;
    register_voter(&ledger, voter).await;
    let version = ledger.version();

    // Too early.
    let receipt = vote(&ledger, voter, 1).await;
    assert_eq!(rejection(&receipt), Some(ErrorKind::ElectionClosed));
    assert!(receipt.events.is_empty());
    assert_eq!(receipt.sequence, 2);
    assert_eq!(ledger.version(), version);

    clock.set(T_CLOSE);
    let receipt = vote(&ledger, voter, 1).await;
    assert!(receipt.is_committed());
    assert_eq!(receipt.sequence, 3);

    clock.advance(1);
    let receipt = vote(&ledger, identity("late"), 1).await;
    assert_eq!(rejection(&receipt), Some(ErrorKind::Ineligible));
    assert!(!ledger.query(|election, now, working_set| election.is_active(now, working_set)));
}

#[tokio::test]
async fn concurrent_ballots_from_one_identity() {
    let (ledger, clock) = new_ledger().await;
    let voter = identity("voter");
    register_candidate(&ledger, 1, "Alice").await;
    register_candidate(&ledger, 2, "Bob").await;
    register_voter(&ledger, voter).await;
    clock.set(T0 + 1);

    let handles: Vec<_> = [1, 2]
        .into_iter()
        .map(|candidate_id| {
            let ledger = ledger.clone();
            tokio::spawn(async move { vote(&ledger, voter, candidate_id).await })
        })
        .collect();

    let mut receipts = Vec::new();
    for handle in handles {
        receipts.push(handle.await.unwrap());
    }
    receipts.sort_by_key(|receipt| receipt.sequence);

    assert!(receipts[0].is_committed());
    assert_eq!(rejection(&receipts[1]), Some(ErrorKind::DuplicateBallot));

    let total = ledger.query(|election, _, working_set| election.total_votes(working_set));
    assert_eq!(total, 1);
}

#[tokio::test]
async fn concurrent_voters_are_totally_ordered() {
    let (ledger, clock) = new_ledger().await;
    register_candidate(&ledger, 1, "Alice").await;
    let voters: Vec<_> = (0..20).map(|i| identity(&format!("voter_{i}"))).collect();
    for voter in &voters {
        register_voter(&ledger, *voter).await;
    }
    clock.set(T0);

    let mut events = ledger.subscribe();
    let handles: Vec<_> = voters
        .iter()
        .map(|voter| {
            let ledger = ledger.clone();
            let voter = *voter;
            tokio::spawn(async move { vote(&ledger, voter, 1).await })
        })
        .collect();
    for handle in handles {
        assert!(handle.await.unwrap().is_committed());
    }

    // Events arrive in commit order, and ballots are enumerated in that same order.
    let mut published = Vec::new();
    for _ in 0..voters.len() {
        let event = events.recv().await.unwrap();
        match ElectionEvent::<Address>::try_from(&event.event).unwrap() {
            ElectionEvent::BallotCast { identity, .. } => published.push((event.sequence, identity)),
            other => panic!("unexpected event {other:?}"),
        }
    }
    assert!(published.windows(2).all(|pair| pair[0].0 < pair[1].0));

    let ballots = ledger.query(|election, _, working_set| election.list_ballots(0, 100, working_set));
    let enumerated: Vec<_> = ballots.iter().map(|ballot| ballot.identity).collect();
    let published: Vec<_> = published.into_iter().map(|(_, identity)| identity).collect();
    assert_eq!(enumerated, published);

    let results = ledger
        .query(|election, now, working_set| election.get_results(now, working_set))
        .unwrap();
    assert_eq!(results.total_votes, 20);
    assert_eq!(results.candidates[0].votes, 20);
}

#[tokio::test]
async fn rejected_transactions_publish_nothing() {
    let (ledger, _clock) = new_ledger().await;
    let mut events = ledger.subscribe();

    let receipt = register_voter(&ledger, identity("voter")).await;
    assert!(receipt.is_committed());
    let receipt = register_voter(&ledger, identity("voter")).await;
    assert_eq!(rejection(&receipt), Some(ErrorKind::AlreadyRegistered));
    let receipt = register_candidate(&ledger, 1, "Alice").await;
    assert!(receipt.is_committed());

    let first = events.recv().await.unwrap();
    let second = events.recv().await.unwrap();
    assert_eq!(first.sequence, 0);
    assert_eq!(second.sequence, 2);
    assert_eq!(second.event.key(), "Election: candidate_registered");
    assert!(events.try_recv().is_err());
}

#[tokio::test]
async fn snapshots_do_not_see_later_commits() {
    let (ledger, _clock) = new_ledger().await;
    register_candidate(&ledger, 1, "Alice").await;

    let mut before = ledger.snapshot();
    register_candidate(&ledger, 2, "Bob").await;
    let mut after = ledger.snapshot();

    let election = ledger.module();
    assert_eq!(election.list_candidate_ids(&mut before), vec![1]);
    assert_eq!(election.list_candidate_ids(&mut after), vec![1, 2]);
}

#[tokio::test]
async fn genesis_runs_once() {
    let (ledger, _clock) = new_ledger().await;
    let err = ledger.genesis(&election_config()).await.unwrap_err();
    assert_eq!(err.to_string(), "Genesis failed");
}

#[tokio::test]
async fn zero_capacity_event_channel_is_rejected() {
    let config = RunnerConfig {
        event_channel_capacity: 0,
    };
    let result = Ledger::new(
        tally_election::Election::<C>::default(),
        InMemoryStorage::new(),
        Arc::new(SystemClock),
        &config,
    );
    assert!(result.is_err());
}
