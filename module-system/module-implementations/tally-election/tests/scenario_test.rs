use helpers::*;
use tally_election::{ElectionEvent, ElectionPhase, ErrorKind};
use tally_state::Storage as _;

mod helpers;

#[test]
fn single_voter_scenario() {
    let harness = Harness::new();
    let voter_a = identity("A");
    let voter_b = identity("B");
    let voter_c = identity("C");

    harness.register_candidate(1, "Alice").unwrap();
    harness.register_candidate(2, "Bob").unwrap();
    harness.register_voter(voter_a).unwrap();
    harness.register_voter(voter_b).unwrap();

    let events = harness.vote(voter_a, T0 + 10, 1).unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(
        ElectionEvent::try_from(&events[0]).unwrap(),
        ElectionEvent::BallotCast {
            identity: voter_a,
            candidate_id: 1,
            timestamp: T0 + 10,
        }
    );
    {
        let mut read = harness.read();
        assert_eq!(harness.election.get_candidate(1, &mut read).unwrap().votes, 1);
        assert_eq!(harness.election.total_votes(&mut read), 1);
    }

    let version = harness.storage.version();
    assert_eq!(kind(harness.vote(voter_a, T0 + 20, 2)), ErrorKind::DuplicateBallot);
    assert_eq!(harness.storage.version(), version);

    assert_eq!(kind(harness.vote(voter_c, T0 + 30, 1)), ErrorKind::Ineligible);
    assert_eq!(kind(harness.vote(voter_b, T0 + 3700, 2)), ErrorKind::ElectionClosed);

    let mut read = harness.read();
    let results = harness.election.get_results(T0 + 3700, &mut read).unwrap();
    assert_eq!(results.total_votes, 1);
    assert_eq!(results.phase, ElectionPhase::Closed);
    let votes: Vec<_> = results
        .candidates
        .iter()
        .map(|c| (c.name.as_str(), c.votes))
        .collect();
    assert_eq!(votes, vec![("Alice", 1), ("Bob", 0)]);
    assert!(!harness.election.has_voted(&voter_b, &mut read));
}

#[test]
fn duplicate_candidate_scenario() {
    let harness = Harness::new();

    let events = harness.register_candidate(5, "Eve").unwrap();
    assert_eq!(
        ElectionEvent::<tally_modules_api::Address>::try_from(&events[0]).unwrap(),
        ElectionEvent::CandidateRegistered {
            id: 5,
            name: "Eve".to_owned()
        }
    );
    assert_eq!(kind(harness.register_candidate(5, "Mallory")), ErrorKind::DuplicateCandidate);

    let mut read = harness.read();
    assert_eq!(harness.election.list_candidate_ids(&mut read), vec![5]);
    assert_eq!(harness.election.get_candidate(5, &mut read).unwrap().name, "Eve");
}

#[test]
fn tied_leaders_in_registration_order() {
    let harness = Harness::new();
    for (id, name) in [(3, "Carol"), (1, "Alice"), (2, "Bob")] {
        harness.register_candidate(id, name).unwrap();
    }
    for (i, candidate_id) in [3, 1, 3, 1, 2].into_iter().enumerate() {
        let voter = identity(&format!("voter_{i}"));
        harness.register_voter(voter).unwrap();
        harness.vote(voter, T0 + i as u64, candidate_id).unwrap();
    }

    let mut read = harness.read();
    let results = harness.election.get_results(T0, &mut read).unwrap();
    assert_eq!(results.phase, ElectionPhase::Open);
    let leaders: Vec<_> = results.leaders().into_iter().map(|c| c.id).collect();
    assert_eq!(leaders, vec![3, 1]);
    assert_eq!(harness.election.list_candidate_ids(&mut read), vec![3, 1, 2]);
}
