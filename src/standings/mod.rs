//! Derived contest views: standings, per-entry scorecards, per-game
//! breakdowns. Nothing in here is stored; every request recomputes from the
//! entries, picks and results as they are at that moment, which keeps the
//! views consistent with late pick edits and freshly entered scores without
//! any coordination.

pub mod models;
pub mod routes;

use std::collections::HashMap;

use crate::db;
use crate::entries::{Entry, Pick};
use crate::errors::ServiceError;
use crate::games::Game;
use crate::playoff::models::{PlayoffPick, PlayoffResult};
use crate::results::GameResult;
use crate::rules::{self, BracketPick, FinalScore, SlatePick, StandingsRow};

use models::{AnalysisRow, CompletedBracket, CompletedEntry, CompletedPick, TiebreakerRow};

fn as_slate_pick(pick: &Pick) -> SlatePick {
    SlatePick {
        game_id: pick.game_id,
        team_1: pick.team_1,
        team_2: pick.team_2,
        points: pick.points,
        // eligibility only matters for validation, scoring ignores it
        bonus_eligible: false,
    }
}

/// Score every entry and rank them.
///
/// Pure assembly over already-fetched data, so it can be exercised without
/// a database.
pub fn build_rows(
    entries: &[Entry],
    picks_by_entry: &HashMap<i64, Vec<Pick>>,
    results: &HashMap<i64, FinalScore>,
    brackets: &HashMap<i64, PlayoffPick>,
    bracket_result: Option<&BracketPick>,
) -> Vec<StandingsRow> {
    let mut rows: Vec<StandingsRow> = entries
        .iter()
        .map(|entry| {
            let slate: Vec<SlatePick> = picks_by_entry
                .get(&entry.id)
                .map(|picks| picks.iter().map(as_slate_pick).collect())
                .unwrap_or_default();

            let slate_score = rules::score_slate(&slate, results);

            let bracket = brackets.get(&entry.id);
            let bracket_score = bracket
                .map(|pick| rules::score_bracket(&pick.as_bracket(), bracket_result))
                .unwrap_or_default();

            let mut remaining_points = slate_score.remaining_points;
            if bracket.is_some() && bracket_result.is_none() {
                remaining_points += rules::scoring::BRACKET_MAX_POINTS;
            }

            let current_points = slate_score.current_points + bracket_score.points;

            StandingsRow {
                entry_id: entry.id,
                entry_name: entry.name.clone(),
                rank: 0,
                current_points,
                correct_picks: slate_score.correct_picks,
                remaining_points,
                possible_points: current_points + remaining_points,
                is_paid: entry.paid,
            }
        })
        .collect();

    rules::rank_entries(&mut rows);

    rows
}

#[tracing::instrument(skip(conn))]
pub fn standings_for_year(year: i32, conn: &db::Conn) -> Result<Vec<StandingsRow>, ServiceError> {
    let entries = Entry::find_by_year(year, conn)?;
    let picks_by_entry = Pick::find_by_year(year, conn)?;
    let results = GameResult::score_map(year, conn)?;
    let brackets = PlayoffPick::find_by_year(year, conn)?;
    let bracket_result = PlayoffResult::find_by_year(year, conn)?.map(|result| result.as_bracket());

    Ok(build_rows(
        &entries,
        &picks_by_entry,
        &results,
        &brackets,
        bracket_result.as_ref(),
    ))
}

pub fn analysis_for_year(year: i32, conn: &db::Conn) -> Result<Vec<AnalysisRow>, ServiceError> {
    let games = Game::find_by_year(year, conn)?;
    let picks_by_entry = Pick::find_by_year(year, conn)?;
    let schools = crate::schools::School::school_map(conn)?;
    let bowls = crate::bowls::Bowl::bowl_map(conn)?;

    let mut selections: HashMap<i64, (u32, u32)> = HashMap::new();
    for pick in picks_by_entry.values().flatten() {
        let entry = selections.entry(pick.game_id).or_default();
        if pick.team_1 {
            entry.0 += 1;
        }
        if pick.team_2 {
            entry.1 += 1;
        }
    }

    let school_name = |id: i64| {
        schools
            .get(&id)
            .map(|school| school.name.clone())
            .unwrap_or_default()
    };

    Ok(games
        .into_iter()
        .map(|game| {
            let (selected_1, selected_2) = selections.get(&game.id).copied().unwrap_or((0, 0));
            AnalysisRow {
                bowl_name: bowls
                    .get(&game.bowl_id)
                    .map(|bowl| bowl.name.clone())
                    .unwrap_or_default(),
                school_1_name: school_name(game.school_1_id),
                school_2_name: school_name(game.school_2_id),
                selected_1,
                selected_2,
                game_id: game.id,
            }
        })
        .collect())
}

pub fn tiebreakers_for_year(year: i32, conn: &db::Conn) -> Result<Vec<TiebreakerRow>, ServiceError> {
    let entries = Entry::find_by_year(year, conn)?;
    let games = Game::game_map(year, conn)?;
    let bowls = crate::bowls::Bowl::bowl_map(conn)?;

    Ok(entries
        .into_iter()
        .map(|entry| {
            let tiebreaker_1 = entry
                .tiebreaker_1
                .and_then(|game_id| games.get(&game_id))
                .and_then(|game| bowls.get(&game.bowl_id))
                .map(|bowl| bowl.name.clone());

            TiebreakerRow {
                entry_name: entry.name,
                tiebreaker_1,
                tiebreaker_2: entry.tiebreaker_2,
            }
        })
        .collect())
}

/// The full annotated scorecard for one entry.
pub fn completed_entry(entry_id: i64, conn: &db::Conn) -> Result<CompletedEntry, ServiceError> {
    let entry = Entry::find_by_id(entry_id, conn)?;
    let picks = Pick::find_by_entry(entry_id, conn)?;
    let now = chrono::Utc::now();

    let games = Game::game_map(entry.year, conn)?;
    let results = GameResult::score_map(entry.year, conn)?;
    let schools = crate::schools::School::school_map(conn)?;
    let bowls = crate::bowls::Bowl::bowl_map(conn)?;

    let school_name = |id: i64| {
        schools
            .get(&id)
            .map(|school| school.name.clone())
            .unwrap_or_default()
    };
    let school_logo = |id: i64| schools.get(&id).and_then(|school| school.logo_id.clone());

    let mut current_points = 0;
    let mut completed_picks = Vec::with_capacity(picks.len());

    for pick in &picks {
        let game = match games.get(&pick.game_id) {
            Some(game) => game,
            None => {
                // a pick for a removed game contributes nothing
                debug!("entry {} has a pick for unknown game {}", entry.id, pick.game_id);
                continue;
            }
        };

        let result = results.get(&pick.game_id);
        let winner = result.and_then(FinalScore::winner);
        let state = rules::pick_state(game.game_time, now, result);

        if state == rules::PickState::Locked && result.is_some() {
            debug!("game {} has a tied recorded score, leaving the pick unresolved", game.id);
        }
        let earned = result.and_then(|result| rules::earned_points(&as_slate_pick(pick), result));

        if let Some(earned) = earned {
            current_points += earned;
        }

        completed_picks.push(CompletedPick {
            game_id: game.id,
            bowl_name: bowls
                .get(&game.bowl_id)
                .map(|bowl| bowl.name.clone())
                .unwrap_or_default(),
            game_time: game.game_time,
            team_1: pick.team_1,
            team_1_name: school_name(game.school_1_id),
            team_1_logo_id: school_logo(game.school_1_id),
            team_1_won: winner.map(|side| side == crate::rules::Side::Team1),
            team_2: pick.team_2,
            team_2_name: school_name(game.school_2_id),
            team_2_logo_id: school_logo(game.school_2_id),
            team_2_won: winner.map(|side| side == crate::rules::Side::Team2),
            points: pick.points,
            earned_points: earned,
            not_played: state != rules::PickState::Resolved,
        });
    }

    let bracket_result = PlayoffResult::find_by_year(entry.year, conn)?.map(|r| r.as_bracket());

    let bracket = PlayoffPick::find_by_entry(entry_id, conn)?.map(|pick| {
        let scored = rules::score_bracket(&pick.as_bracket(), bracket_result.as_ref());
        current_points += scored.points;

        CompletedBracket {
            school_1: school_name(pick.school_1_id),
            school_1_correct: scored.school_1_correct,
            school_2: school_name(pick.school_2_id),
            school_2_correct: scored.school_2_correct,
            champion: school_name(pick.champion_school_id),
            champion_correct: scored.champion_correct,
            points: scored.points,
        }
    });

    Ok(CompletedEntry {
        entry_id: entry.id,
        entry_name: entry.name,
        current_points,
        picks: completed_picks,
        bracket,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: i64, name: &str) -> Entry {
        Entry {
            id,
            user_id: id,
            name: name.to_string(),
            email: format!("{}@example.com", name),
            year: 2025,
            tiebreaker_1: None,
            tiebreaker_2: Some(1000),
            paid: true,
            created_at: None,
            updated_at: None,
        }
    }

    fn pick(entry_id: i64, game_id: i64, team_1: bool, points: i16) -> Pick {
        Pick {
            id: entry_id * 100 + game_id,
            entry_id,
            game_id,
            picked_school_id: None,
            team_1,
            team_2: !team_1,
            points,
        }
    }

    fn score(score_1: i32, score_2: i32) -> FinalScore {
        FinalScore { score_1, score_2 }
    }

    #[test]
    fn rows_combine_slate_and_bracket_points() {
        let entries = vec![entry(1, "alpha"), entry(2, "beta")];

        let mut picks_by_entry = HashMap::new();
        // alpha: +5 and -1 on the slate
        picks_by_entry.insert(1, vec![pick(1, 1, true, 5), pick(1, 2, true, 1)]);
        // beta: +1 and +1
        picks_by_entry.insert(2, vec![pick(2, 1, false, 1), pick(2, 2, false, 1)]);

        let mut results = HashMap::new();
        results.insert(1, score(28, 14)); // team 1 won
        results.insert(2, score(3, 17)); // team 2 won

        let mut brackets = HashMap::new();
        brackets.insert(
            1,
            PlayoffPick {
                entry_id: 1,
                year: 2025,
                school_1_id: 10,
                school_2_id: 20,
                champion_school_id: 20,
            },
        );

        let outcome = BracketPick {
            school_1_id: 10,
            school_2_id: 20,
            champion_school_id: 20,
        };

        let rows = build_rows(
            &entries,
            &picks_by_entry,
            &results,
            &brackets,
            Some(&outcome),
        );

        // alpha: 5 - 1 on the slate plus a perfect bracket
        assert_eq!(rows[0].entry_name, "alpha");
        assert_eq!(rows[0].current_points, 13);
        assert_eq!(rows[0].correct_picks, 1);
        assert_eq!(rows[0].rank, 1);

        // beta: -1 + 1, no bracket pick
        assert_eq!(rows[1].entry_name, "beta");
        assert_eq!(rows[1].current_points, 0);
        assert_eq!(rows[1].correct_picks, 1);
        assert_eq!(rows[1].rank, 2);
    }

    #[test]
    fn unresolved_games_count_towards_remaining_points() {
        let entries = vec![entry(1, "alpha")];

        let mut picks_by_entry = HashMap::new();
        picks_by_entry.insert(1, vec![pick(1, 1, true, 10), pick(1, 2, true, 3)]);

        let mut results = HashMap::new();
        results.insert(2, score(21, 20));

        let rows = build_rows(
            &entries,
            &picks_by_entry,
            &results,
            &HashMap::new(),
            None,
        );

        assert_eq!(rows[0].current_points, 3);
        assert_eq!(rows[0].remaining_points, 10);
        assert_eq!(rows[0].possible_points, 13);
    }

    #[test]
    fn unscored_bracket_stays_in_play() {
        let entries = vec![entry(1, "alpha")];

        let mut brackets = HashMap::new();
        brackets.insert(
            1,
            PlayoffPick {
                entry_id: 1,
                year: 2025,
                school_1_id: 10,
                school_2_id: 20,
                champion_school_id: 10,
            },
        );

        let rows = build_rows(
            &entries,
            &HashMap::new(),
            &HashMap::new(),
            &brackets,
            None,
        );

        assert_eq!(rows[0].current_points, 0);
        assert_eq!(rows[0].remaining_points, 9);
        assert_eq!(rows[0].possible_points, 9);
    }

    #[test]
    fn entry_without_picks_gets_an_empty_row() {
        let entries = vec![entry(1, "alpha")];

        let rows = build_rows(
            &entries,
            &HashMap::new(),
            &HashMap::new(),
            &HashMap::new(),
            None,
        );

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].current_points, 0);
        assert_eq!(rows[0].rank, 1);
    }

    #[test]
    fn tied_entries_share_their_rank() {
        let entries = vec![entry(1, "alpha"), entry(2, "beta"), entry(3, "gamma")];

        let mut picks_by_entry = HashMap::new();
        picks_by_entry.insert(1, vec![pick(1, 1, true, 5)]);
        picks_by_entry.insert(2, vec![pick(2, 1, true, 5)]);
        picks_by_entry.insert(3, vec![pick(3, 1, false, 3)]);

        let mut results = HashMap::new();
        results.insert(1, score(35, 7));

        let rows = build_rows(
            &entries,
            &picks_by_entry,
            &results,
            &HashMap::new(),
            None,
        );

        assert_eq!(rows[0].rank, 1);
        assert_eq!(rows[1].rank, 1);
        assert_eq!(rows[2].rank, 3);
    }
}
