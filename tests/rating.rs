//! Integration tests for the rating engine: worked examples, replay properties, edge cases.

use std::collections::BTreeMap;
use tourney_rating::logic::{team_deltas, MAX_RATING, MIN_RATING};
use tourney_rating::{
    compute_ratings, expected_score, Match, MatchMode, Player, PlayerId, RatedPlayer,
    RatingMethod, Settings, Team,
};

fn roster(names: &[&str]) -> BTreeMap<PlayerId, Player> {
    names
        .iter()
        .map(|n| (n.to_string(), Player::with_id(*n, *n)))
        .collect()
}

fn team(members: &[&str], placement: i32) -> Team {
    Team::new(members.iter().map(|m| m.to_string()).collect(), placement)
}

fn one_v_one(winner: &str, loser: &str) -> Match {
    Match::new(MatchMode::OneVOne, vec![team(&[winner], 1), team(&[loser], 2)])
}

fn pairwise(k: f64) -> Settings {
    Settings::default().with_method(RatingMethod::Pairwise).with_k(k)
}

fn field(k: f64) -> Settings {
    Settings::default().with_method(RatingMethod::Field).with_k(k)
}

fn unrated(ids: &[&str]) -> BTreeMap<PlayerId, RatedPlayer> {
    compute_ratings(&roster(ids), &[], &Settings::default())
}

#[test]
fn expected_score_is_half_for_equal_ratings() {
    assert_eq!(expected_score(1000.0, 1000.0), 0.5);
    assert!(expected_score(1200.0, 1000.0) > 0.5);
    let sum = expected_score(1300.0, 1100.0) + expected_score(1100.0, 1300.0);
    assert!((sum - 1.0).abs() < 1e-12);
}

#[test]
fn one_v_one_pairwise_worked_example() {
    let ratings = compute_ratings(&roster(&["a", "b"]), &[one_v_one("a", "b")], &pairwise(32.0));

    assert_eq!(ratings["a"].rating, 1016.0);
    assert_eq!(ratings["b"].rating, 984.0);
    assert_eq!(ratings["a"].history, vec![1000.0, 1016.0]);
    assert_eq!(ratings["b"].history, vec![1000.0, 984.0]);
}

#[test]
fn ffa_field_worked_example() {
    let m = Match::new(
        MatchMode::FreeForAll,
        vec![team(&["a"], 1), team(&["b"], 2), team(&["c"], 3)],
    );
    let deltas = team_deltas(&unrated(&["a", "b", "c"]), &m, &field(30.0));
    assert_eq!(deltas, vec![15.0, 0.0, -15.0]);

    let ratings = compute_ratings(&roster(&["a", "b", "c"]), &[m], &field(30.0));
    assert_eq!(ratings["a"].rating, 1015.0);
    assert_eq!(ratings["b"].rating, 1000.0);
    assert_eq!(ratings["c"].rating, 985.0);
}

#[test]
fn pairwise_deltas_sum_to_zero() {
    let players = roster(&["a", "b", "c", "d", "e"]);
    // Build up uneven ratings first so the checked match is not symmetric.
    let history = vec![one_v_one("a", "b"), one_v_one("a", "c"), one_v_one("d", "e")];
    let rated = compute_ratings(&players, &history, &pairwise(40.0));

    let m = Match::new(
        MatchMode::Custom,
        vec![
            team(&["e"], 1),
            team(&["a", "b"], 3),
            team(&["c"], 2),
            team(&["d"], 4),
        ],
    );
    let deltas = team_deltas(&rated, &m, &pairwise(40.0));
    assert_eq!(deltas.len(), 4);
    assert!(deltas.iter().sum::<f64>().abs() < 1e-9);
    // Winner gains, last place loses.
    assert!(deltas[0] > 0.0);
    assert!(deltas[3] < 0.0);
}

#[test]
fn team_delta_is_split_across_members() {
    let m = Match::new(
        MatchMode::TwoVTwo,
        vec![team(&["a", "b"], 1), team(&["c", "d"], 2)],
    );
    let ratings = compute_ratings(&roster(&["a", "b", "c", "d"]), &[m], &pairwise(32.0));
    assert_eq!(ratings["a"].rating, 1008.0);
    assert_eq!(ratings["b"].rating, 1008.0);
    assert_eq!(ratings["c"].rating, 992.0);
    assert_eq!(ratings["d"].rating, 992.0);
}

#[test]
fn recompute_is_deterministic_and_ignores_previous_settings() {
    let players = roster(&["a", "b", "c", "d"]);
    let matches = vec![
        one_v_one("a", "b"),
        Match::new(
            MatchMode::FreeForAll,
            vec![team(&["c"], 1), team(&["a"], 2), team(&["d"], 3)],
        ),
        one_v_one("b", "d"),
        Match::new(MatchMode::TwoVTwo, vec![team(&["a", "d"], 2), team(&["b", "c"], 1)]),
    ];

    let first = compute_ratings(&players, &matches, &pairwise(32.0));
    let second = compute_ratings(&players, &matches, &pairwise(32.0));
    assert_eq!(first, second);

    // Recompute under other settings, then switch back: the result must match the first run.
    let other = compute_ratings(&players, &matches, &field(100.0));
    assert_ne!(other, first);
    let again = compute_ratings(&players, &matches, &pairwise(32.0));
    assert_eq!(again, first);
}

#[test]
fn histories_have_equal_length_and_bystanders_repeat() {
    let players = roster(&["a", "b", "c"]);
    let matches = vec![one_v_one("a", "b"), one_v_one("b", "a"), one_v_one("a", "b")];
    let ratings = compute_ratings(&players, &matches, &pairwise(32.0));

    for p in ratings.values() {
        assert_eq!(p.history.len(), matches.len() + 1);
        assert_eq!(p.history[0], 1000.0);
        assert_eq!(*p.history.last().unwrap(), p.rating);
    }
    assert_eq!(ratings["c"].history, vec![1000.0; 4]);
}

#[test]
fn unknown_members_get_placeholders() {
    let players = roster(&["alice", "bob"]);
    let matches = vec![one_v_one("alice", "bob"), one_v_one("ghost-123", "alice")];
    let ratings = compute_ratings(&players, &matches, &pairwise(32.0));

    let ghost = &ratings["ghost-123"];
    assert_eq!(ghost.name, "P-ghos");
    assert!(ghost.rating > 1000.0);
    // Joined one match late: padded at the end to the common length.
    assert_eq!(ghost.history.len(), 3);
    assert_eq!(ghost.history[1], ghost.history[2]);
    assert!(ratings.values().all(|p| p.history.len() == 3));
}

#[test]
fn no_matches_leaves_initial_ratings() {
    let ratings = compute_ratings(&roster(&["a", "b"]), &[], &pairwise(32.0));
    for p in ratings.values() {
        assert_eq!(p.rating, 1000.0);
        assert_eq!(p.history, vec![1000.0]);
    }
    assert!(compute_ratings(&BTreeMap::new(), &[], &pairwise(32.0)).is_empty());
}

#[test]
fn ratings_stay_within_bounds_under_lopsided_replay() {
    let players = roster(&["top", "bottom", "mid"]);
    let matches: Vec<Match> = (0..500)
        .map(|i| {
            if i % 5 == 0 {
                one_v_one("mid", "bottom")
            } else {
                one_v_one("top", "bottom")
            }
        })
        .collect();

    for settings in [pairwise(128.0), field(128.0)] {
        let ratings = compute_ratings(&players, &matches, &settings);
        for p in ratings.values() {
            assert!(p
                .history
                .iter()
                .all(|r| (MIN_RATING..=MAX_RATING).contains(r)));
        }
    }
}

#[test]
fn out_of_range_placements_are_clamped_not_rejected() {
    // Field scores use placements directly, so absurd values produce huge deltas.
    let m = Match::new(
        MatchMode::Custom,
        vec![team(&["a"], -1000), team(&["b"], 1000)],
    );
    let ratings = compute_ratings(&roster(&["a", "b"]), &[m], &field(128.0));
    assert_eq!(ratings["a"].rating, MAX_RATING);
    assert_eq!(ratings["b"].rating, MIN_RATING);
}

#[test]
fn malformed_matches_do_not_fail() {
    let players = roster(&["a", "b", "c"]);
    let matches = vec![
        // Single team.
        Match::new(MatchMode::Custom, vec![team(&["a"], 1)]),
        // Duplicate placements.
        Match::new(MatchMode::Custom, vec![team(&["a"], 1), team(&["b"], 1), team(&["c"], 1)]),
        // Empty team.
        Match::new(MatchMode::Custom, vec![team(&[], 1), team(&["c"], 2)]),
    ];
    for settings in [pairwise(32.0), field(32.0)] {
        let ratings = compute_ratings(&players, &matches, &settings);
        assert_eq!(ratings.len(), 3);
        for p in ratings.values() {
            assert_eq!(p.history.len(), 4);
            assert!(p.rating.is_finite());
        }
        // A one-team match changes nothing.
        assert_eq!(ratings["a"].history[1], 1000.0);
    }
}

#[test]
fn player_on_two_teams_accumulates_both_shares() {
    let m = Match::new(
        MatchMode::Custom,
        vec![team(&["a"], 1), team(&["a", "b"], 2)],
    );
    let rated = unrated(&["a", "b"]);
    let deltas = team_deltas(&rated, &m, &pairwise(32.0));
    assert_eq!(deltas, vec![16.0, -16.0]);

    let ratings = compute_ratings(&roster(&["a", "b"]), &[m], &pairwise(32.0));
    assert_eq!(ratings["a"].rating, 1000.0 + 16.0 - 8.0);
    assert_eq!(ratings["b"].rating, 992.0);
}

#[test]
fn replays_in_given_order_not_by_date() {
    let players = roster(&["a", "b"]);
    let early = one_v_one("a", "b").dated("2024-01-01T00:00:00Z".parse().unwrap());
    let late = one_v_one("b", "a").dated("2024-06-01T00:00:00Z".parse().unwrap());

    let forward = compute_ratings(&players, &[early.clone(), late.clone()], &pairwise(32.0));
    let reversed = compute_ratings(&players, &[late, early], &pairwise(32.0));
    assert_ne!(forward["a"].history, reversed["a"].history);
}
