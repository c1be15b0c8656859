//! Scoring of resolved games and the championship bracket.
//!
//! A correct pick earns its assigned points, a wrong pick loses them. A game
//! with equal final scores is treated as not resolved yet: it never scores,
//! and a pick on it stays locked. Bowl games don't end in ties, so the only
//! way to observe this is a half-entered result.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use super::{Side, SlatePick};

/// points for each correctly predicted championship game participant
pub const FINALIST_POINTS: i32 = 2;
/// points for a correctly predicted national champion
pub const CHAMPION_POINTS: i32 = 5;
/// everything a bracket pick can still earn while no result is recorded
pub const BRACKET_MAX_POINTS: i32 = 2 * FINALIST_POINTS + CHAMPION_POINTS;

/// A recorded final score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinalScore {
    pub score_1: i32,
    pub score_2: i32,
}

impl FinalScore {
    pub fn winner(&self) -> Option<Side> {
        if self.score_1 > self.score_2 {
            Some(Side::Team1)
        } else if self.score_2 > self.score_1 {
            Some(Side::Team2)
        } else {
            None
        }
    }
}

/// Lifecycle of a pick. `Open` picks are editable, `Locked` picks wait for a
/// result, `Resolved` picks have earned (or lost) their points. There is no
/// way back: a tied score keeps the pick `Locked` instead of resolving it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickState {
    Open,
    Locked,
    Resolved,
}

pub fn pick_state(
    game_time: DateTime<Utc>,
    now: DateTime<Utc>,
    result: Option<&FinalScore>,
) -> PickState {
    if now < game_time {
        return PickState::Open;
    }

    match result.and_then(FinalScore::winner) {
        Some(_) => PickState::Resolved,
        None => PickState::Locked,
    }
}

/// Points a pick earns against a final score.
///
/// `None` means the pick doesn't score: the game is tied (unresolved) or the
/// pick never selected a side. Wrong picks earn negative points, not zero.
pub fn earned_points(pick: &SlatePick, result: &FinalScore) -> Option<i32> {
    let winner = result.winner()?;
    let selection = pick.selection()?;

    if selection == winner {
        Some(i32::from(pick.points))
    } else {
        Some(-i32::from(pick.points))
    }
}

/// Totals for one entry's slate.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SlateScore {
    pub current_points: i32,
    pub correct_picks: u32,
    /// the sum of the weights still in play (no result, or a tied score)
    pub remaining_points: i32,
}

/// Score a full slate against the results known so far.
///
/// Games without a result contribute zero and are excluded from the correct
/// pick count; their weights count towards `remaining_points` instead.
pub fn score_slate(picks: &[SlatePick], results: &HashMap<i64, FinalScore>) -> SlateScore {
    let mut score = SlateScore::default();

    for pick in picks {
        match results.get(&pick.game_id).and_then(|r| earned_points(pick, r)) {
            Some(earned) => {
                score.current_points += earned;
                if earned > 0 {
                    score.correct_picks += 1;
                }
            }
            None => score.remaining_points += i32::from(pick.points),
        }
    }

    score
}

/// A championship bracket prediction: the two finalists and the champion.
/// Also used for the recorded bracket outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BracketPick {
    pub school_1_id: i64,
    pub school_2_id: i64,
    pub champion_school_id: i64,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BracketScore {
    pub school_1_correct: bool,
    pub school_2_correct: bool,
    pub champion_correct: bool,
    pub points: i32,
}

/// Score a bracket pick against the recorded outcome.
///
/// Each predicted finalist counts when that school reached the championship
/// game, on either side of the bracket. Bracket points never interact with
/// the slate's bonus caps, and wrong bracket picks carry no penalty.
pub fn score_bracket(pick: &BracketPick, result: Option<&BracketPick>) -> BracketScore {
    let result = match result {
        Some(result) => result,
        None => return BracketScore::default(),
    };

    let finalists = [result.school_1_id, result.school_2_id];

    let school_1_correct = finalists.contains(&pick.school_1_id);
    let school_2_correct = finalists.contains(&pick.school_2_id);
    let champion_correct = pick.champion_school_id == result.champion_school_id;

    let mut points = 0;
    if school_1_correct {
        points += FINALIST_POINTS;
    }
    if school_2_correct {
        points += FINALIST_POINTS;
    }
    if champion_correct {
        points += CHAMPION_POINTS;
    }

    BracketScore {
        school_1_correct,
        school_2_correct,
        champion_correct,
        points,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn pick(game_id: i64, points: i16, side: Side) -> SlatePick {
        SlatePick {
            game_id,
            team_1: side == Side::Team1,
            team_2: side == Side::Team2,
            points,
            bonus_eligible: false,
        }
    }

    fn score(score_1: i32, score_2: i32) -> FinalScore {
        FinalScore { score_1, score_2 }
    }

    #[test]
    fn winning_pick_earns_its_points() {
        let five = pick(1, 5, Side::Team1);

        assert_eq!(earned_points(&five, &score(21, 14)), Some(5));
    }

    #[test]
    fn losing_pick_is_penalized() {
        let five = pick(1, 5, Side::Team1);

        assert_eq!(earned_points(&five, &score(14, 21)), Some(-5));
    }

    #[test]
    fn tied_score_does_not_resolve() {
        let five = pick(1, 5, Side::Team1);

        assert_eq!(earned_points(&five, &score(21, 21)), None);
    }

    #[test]
    fn scoring_is_idempotent() {
        let three = pick(1, 3, Side::Team2);
        let result = score(10, 24);

        let first = earned_points(&three, &result);
        let second = earned_points(&three, &result);

        assert_eq!(first, Some(3));
        assert_eq!(first, second);
    }

    #[test]
    fn unselected_pick_never_scores() {
        let unselected = SlatePick {
            game_id: 1,
            team_1: false,
            team_2: false,
            points: 1,
            bonus_eligible: false,
        };

        assert_eq!(earned_points(&unselected, &score(7, 3)), None);
    }

    #[test]
    fn slate_totals_skip_unresolved_games() {
        let picks = vec![
            pick(1, 5, Side::Team1),  // won: +5
            pick(2, 3, Side::Team2),  // lost: -3
            pick(3, 10, Side::Team1), // no result yet
            pick(4, 1, Side::Team1),  // tied, stays in play
        ];

        let mut results = HashMap::new();
        results.insert(1, score(21, 14));
        results.insert(2, score(28, 3));
        results.insert(4, score(17, 17));

        let total = score_slate(&picks, &results);

        assert_eq!(total.current_points, 2);
        assert_eq!(total.correct_picks, 1);
        assert_eq!(total.remaining_points, 11);
    }

    #[test]
    fn pick_opens_then_locks_then_resolves() {
        let kickoff = Utc.ymd(2025, 12, 31).and_hms(17, 0, 0);
        let before = kickoff - chrono::Duration::hours(1);
        let after = kickoff + chrono::Duration::hours(4);

        assert_eq!(pick_state(kickoff, before, None), PickState::Open);
        assert_eq!(pick_state(kickoff, after, None), PickState::Locked);
        assert_eq!(
            pick_state(kickoff, after, Some(&score(31, 10))),
            PickState::Resolved
        );
    }

    #[test]
    fn tied_result_stays_locked() {
        let kickoff = Utc.ymd(2025, 12, 31).and_hms(17, 0, 0);
        let after = kickoff + chrono::Duration::hours(4);

        assert_eq!(
            pick_state(kickoff, after, Some(&score(14, 14))),
            PickState::Locked
        );
    }

    #[test]
    fn bracket_scores_nothing_without_a_result() {
        let guess = BracketPick {
            school_1_id: 1,
            school_2_id: 2,
            champion_school_id: 1,
        };

        assert_eq!(score_bracket(&guess, None), BracketScore::default());
    }

    #[test]
    fn perfect_bracket_earns_nine() {
        let guess = BracketPick {
            school_1_id: 1,
            school_2_id: 2,
            champion_school_id: 2,
        };

        let scored = score_bracket(&guess, Some(&guess));

        assert!(scored.school_1_correct);
        assert!(scored.school_2_correct);
        assert!(scored.champion_correct);
        assert_eq!(scored.points, 9);
    }

    #[test]
    fn finalists_match_either_side_of_the_bracket() {
        let guess = BracketPick {
            school_1_id: 2,
            school_2_id: 1,
            champion_school_id: 3,
        };
        let outcome = BracketPick {
            school_1_id: 1,
            school_2_id: 2,
            champion_school_id: 1,
        };

        let scored = score_bracket(&guess, Some(&outcome));

        assert!(scored.school_1_correct);
        assert!(scored.school_2_correct);
        assert!(!scored.champion_correct);
        assert_eq!(scored.points, 4);
    }

    #[test]
    fn wrong_bracket_picks_carry_no_penalty() {
        let guess = BracketPick {
            school_1_id: 8,
            school_2_id: 9,
            champion_school_id: 8,
        };
        let outcome = BracketPick {
            school_1_id: 1,
            school_2_id: 2,
            champion_school_id: 1,
        };

        assert_eq!(score_bracket(&guess, Some(&outcome)).points, 0);
    }
}
