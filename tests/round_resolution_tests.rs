//! Round resolution through `GameState`.
//!
//! Each test sets up the elimination count a rule needs, plays one round,
//! and checks the resulting points.

use smallvec::SmallVec;

use king_of_diamonds::core::config::STARTING_POINTS;
use king_of_diamonds::core::{Choices, GameError, GameState, Phase, PlayerId};
use king_of_diamonds::rules::{Resolution, RoundOutcome, RoundResolver};

const NAMES: [&str; 10] = ["A", "B", "C", "D", "E", "F", "G", "H", "I", "J"];

fn p(id: u8) -> PlayerId {
    PlayerId::new(id)
}

fn game(player_count: usize, seed: u64) -> GameState {
    let mut game = GameState::new(seed);
    for name in &NAMES[..player_count] {
        game.add_player(*name).unwrap();
    }
    game.start().unwrap();
    game
}

/// Numbers for the alive players, in roster order.
fn alive_choices(game: &GameState, values: &[i64]) -> Choices {
    let alive = game.alive_ids();
    assert_eq!(alive.len(), values.len());
    Choices::from_pairs(alive.into_iter().zip(values.iter().copied())).unwrap()
}

/// Remove one point from each listed player without anyone winning.
fn drain(game: &mut GameState, victims: &[u8], rounds: i32) {
    let outcome = RoundOutcome {
        target: 0.0,
        resolution: Resolution::NoValidChoice,
        winner: None,
        tied_candidates: SmallVec::new(),
        exact_match: false,
        penalty: 0,
        invalidated_numbers: SmallVec::new(),
        duplicate_penalized: victims.iter().map(|&i| p(i)).collect(),
    };
    for _ in 0..rounds {
        game.apply_outcome(&Choices::new(), &outcome).unwrap();
    }
}

fn knock_out(game: &mut GameState, victims: &[u8]) {
    drain(game, victims, STARTING_POINTS);
}

fn points(game: &GameState) -> Vec<i32> {
    game.players().iter().map(|p| p.points).collect()
}

#[test]
fn test_closest_player_wins_and_others_lose_one() {
    let mut game = game(3, 1);
    let record = game.play_round(&alive_choices(&game, &[20, 50, 80])).unwrap();

    // mean 50, target 40
    assert!((record.outcome.target - 40.0).abs() < 1e-9);
    assert_eq!(record.outcome.winner, Some(p(1)));
    assert_eq!(points(&game), vec![9, 10, 9]);
    assert_eq!(game.round_number(), 2);
}

#[test]
fn test_tied_players_one_wins_the_other_still_loses() {
    for seed in 0..20 {
        let mut game = game(3, seed);
        // mean 25, target 20: 10 and 30 are both 10 away
        let record = game.play_round(&alive_choices(&game, &[10, 30, 35])).unwrap();
        let outcome = &record.outcome;

        assert_eq!(outcome.tied_candidates.as_slice(), &[p(0), p(1)]);
        let winner = outcome.winner.unwrap();
        let loser = if winner == p(0) { p(1) } else { p(0) };
        assert!(outcome.is_unlucky_tie(loser));

        assert_eq!(game.player(winner).unwrap().points, 10);
        assert_eq!(game.player(loser).unwrap().points, 9);
        assert_eq!(game.player(p(2)).unwrap().points, 9);
    }
}

#[test]
fn test_tie_break_is_reproducible_by_seed() {
    let winners = |seed| {
        let mut game = game(3, seed);
        (0..5)
            .map(|_| {
                let choices = alive_choices(&game, &[10, 30, 35]);
                game.play_round(&choices).unwrap().outcome.winner
            })
            .collect::<Vec<_>>()
    };

    assert_eq!(winners(9), winners(9));
}

#[test]
fn test_duplicates_ignored_before_first_elimination() {
    let mut game = game(3, 1);
    // mean 36.67, target 29.33: the shared 30 is closest and still valid
    let record = game.play_round(&alive_choices(&game, &[30, 30, 50])).unwrap();

    assert!(record.outcome.invalidated_numbers.is_empty());
    assert!(record.outcome.tied_candidates.contains(&p(0)));
    assert!(record.outcome.tied_candidates.contains(&p(1)));
    assert_eq!(game.player(p(2)).unwrap().points, 9);
}

#[test]
fn test_duplicates_invalidated_after_first_elimination() {
    let mut game = game(4, 1);
    knock_out(&mut game, &[3]);
    assert_eq!(game.eliminated_count(), 1);

    // target 29.33; 30 would win but is shared
    let record = game.play_round(&alive_choices(&game, &[30, 30, 50])).unwrap();

    assert_eq!(record.eliminated_before, 1);
    assert_eq!(record.outcome.winner, Some(p(2)));
    assert_eq!(record.outcome.invalidated_numbers.len(), 1);
    // base penalty plus duplicate penalty
    assert_eq!(points(&game)[..3], [8, 8, 10]);
}

#[test]
fn test_all_numbers_duplicated_means_no_winner() {
    let mut game = game(5, 1);
    knock_out(&mut game, &[4]);

    let record = game.play_round(&alive_choices(&game, &[20, 20, 40, 40])).unwrap();

    assert_eq!(record.outcome.resolution, Resolution::NoValidChoice);
    assert_eq!(record.outcome.winner, None);
    assert_eq!(record.outcome.penalty, 0);
    assert_eq!(points(&game)[..4], [9, 9, 9, 9]);
}

#[test]
fn test_exact_match_needs_two_eliminations_for_bonus() {
    let mut one_out = game(3, 1);
    knock_out(&mut one_out, &[2]);
    // mean 50, target 40
    let record = one_out.play_round(&alive_choices(&one_out, &[40, 60])).unwrap();
    assert!(record.outcome.exact_match);
    assert_eq!(record.outcome.penalty, 1);
    assert_eq!(one_out.player(p(1)).unwrap().points, 9);

    let mut two_out = game(4, 1);
    knock_out(&mut two_out, &[2, 3]);
    let record = two_out.play_round(&alive_choices(&two_out, &[40, 60])).unwrap();
    assert!(record.outcome.exact_match);
    assert_eq!(record.outcome.penalty, 2);
    assert_eq!(two_out.player(p(0)).unwrap().points, 10);
    assert_eq!(two_out.player(p(1)).unwrap().points, 8);
}

#[test]
fn test_near_miss_is_not_exact() {
    let mut game = game(4, 1);
    knock_out(&mut game, &[2, 3]);
    // mean 51, target 40.8
    let record = game.play_round(&alive_choices(&game, &[41, 61])).unwrap();

    assert!(!record.outcome.exact_match);
    assert_eq!(record.outcome.penalty, 1);
}

#[test]
fn test_zero_hundred_override_with_three_eliminated() {
    let mut game = game(6, 1);
    knock_out(&mut game, &[3, 4, 5]);

    // target 40 would pick 50, but the override hands it to 100
    let record = game.play_round(&alive_choices(&game, &[0, 100, 50])).unwrap();

    assert_eq!(record.outcome.resolution, Resolution::Override);
    assert_eq!(record.outcome.winner, Some(p(1)));
    assert_eq!(points(&game)[..3], [9, 10, 9]);
}

#[test]
fn test_override_skips_duplicate_penalties() {
    let mut game = game(7, 1);
    knock_out(&mut game, &[4, 5, 6]);

    let record = game.play_round(&alive_choices(&game, &[0, 100, 50, 50])).unwrap();

    assert_eq!(record.outcome.resolution, Resolution::Override);
    assert!(record.outcome.duplicate_penalized.is_empty());
    assert_eq!(points(&game)[..4], [9, 10, 9, 9]);
}

#[test]
fn test_override_needs_exactly_one_zero_and_one_hundred() {
    let mut game = game(6, 1);
    knock_out(&mut game, &[3, 4, 5]);

    // 100 is shared, so no override and 100 is invalid; 0 stands alone
    let record = game.play_round(&alive_choices(&game, &[0, 100, 100])).unwrap();

    assert_eq!(record.outcome.resolution, Resolution::Closest);
    assert_eq!(record.outcome.winner, Some(p(0)));
    assert_eq!(points(&game)[..3], [10, 8, 8]);
}

#[test]
fn test_override_inactive_below_threshold() {
    let mut game = game(5, 1);
    knock_out(&mut game, &[3, 4]);

    let record = game.play_round(&alive_choices(&game, &[0, 100, 50])).unwrap();

    assert_eq!(record.outcome.resolution, Resolution::Closest);
    assert_eq!(record.outcome.winner, Some(p(2)));
}

#[test]
fn test_last_player_standing_wins() {
    let mut game = game(2, 1);
    for round in 1..=10 {
        assert_eq!(game.round_number(), round);
        game.play_round(&alive_choices(&game, &[30, 50])).unwrap();
    }

    assert_eq!(game.phase(), Phase::Finished);
    assert_eq!(game.winner().map(|p| p.name.as_str()), Some("A"));
    assert_eq!(game.eliminated_count(), 1);
    assert_eq!(game.history().len(), 10);
    assert_eq!(game.history().back().unwrap().eliminated, vec![p(1)]);

    let choices = Choices::from_pairs([(p(0), 30)]).unwrap();
    assert_eq!(game.play_round(&choices).err(), Some(GameError::GameOver));
}

#[test]
fn test_simultaneous_elimination_leaves_no_winner() {
    let mut game = game(4, 1);
    knock_out(&mut game, &[3]);
    drain(&mut game, &[0, 1, 2], STARTING_POINTS - 1);
    assert_eq!(points(&game)[..3], [1, 1, 1]);

    let record = game.play_round(&alive_choices(&game, &[20, 20, 20])).unwrap();

    assert_eq!(record.eliminated, vec![p(0), p(1), p(2)]);
    assert_eq!(game.phase(), Phase::Finished);
    assert!(game.winner().is_none());
    assert_eq!(game.eliminated_count(), 4);
}

#[test]
fn test_eliminated_players_sit_out() {
    let mut game = game(3, 1);
    knock_out(&mut game, &[0]);

    assert_eq!(game.alive_ids(), vec![p(1), p(2)]);
    let record = game.play_round(&alive_choices(&game, &[10, 90])).unwrap();

    assert_eq!(record.choices.len(), 2);
    assert!(record.choices.iter().all(|(id, _)| *id != p(0)));
    assert_eq!(game.player(p(0)).unwrap().points, 0);
}

#[test]
#[should_panic(expected = "one number per alive player")]
fn test_missing_number_panics() {
    let mut game = game(3, 1);
    let choices = Choices::from_pairs([(p(0), 10), (p(1), 20)]).unwrap();
    let _ = game.play_round(&choices);
}

#[test]
fn test_externally_resolved_round_records_its_own_numbers() {
    let mut game = game(3, 1);
    game.play_round(&alive_choices(&game, &[20, 50, 80])).unwrap();

    // mean 53.33, target 42.67: 60 is closest
    let choices = alive_choices(&game, &[90, 10, 60]);
    let outcome = RoundResolver::resolve(&choices, game.eliminated_count(), &mut game.rng);
    let eliminated = game.apply_outcome(&choices, &outcome).unwrap();

    assert!(eliminated.is_empty());
    let record = game.history().back().unwrap();
    assert_eq!(record.round_number, 2);
    let recorded: Vec<u8> = record.choices.iter().map(|(_, c)| c.value()).collect();
    assert_eq!(recorded, vec![90, 10, 60]);
    assert_eq!(game.player(p(0)).unwrap().current_choice.map(|c| c.value()), Some(90));
    assert_eq!(points(&game), vec![8, 9, 9]);
}
