use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::auth::SessionUser;
use crate::bowls::Bowl;
use crate::config::Config;
use crate::db;
use crate::errors::ServiceError;
use crate::games::Game;
use crate::playoff::models::PlayoffPick;
use crate::rules::{self, BonusGameList, Side, SlatePick};
use crate::schema::{entries, picks};

/// One contestant's season submission.
///
/// An entry is written once, in a single transaction together with its full
/// pick slate and the bracket pick. After that only the picks for games
/// that haven't kicked off can still change.
#[derive(Debug, Serialize, Queryable, Identifiable, Clone)]
#[table_name = "entries"]
pub struct Entry {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub email: String,
    pub year: i32,
    pub tiebreaker_1: Option<i64>,
    pub tiebreaker_2: Option<i32>,
    pub paid: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Insertable)]
#[table_name = "entries"]
struct NewEntry {
    user_id: i64,
    name: String,
    email: String,
    year: i32,
    tiebreaker_1: Option<i64>,
    tiebreaker_2: Option<i32>,
}

#[derive(Debug, Serialize, Queryable, Identifiable, Clone)]
#[table_name = "picks"]
pub struct Pick {
    pub id: i64,
    pub entry_id: i64,
    pub game_id: i64,
    pub picked_school_id: Option<i64>,
    pub team_1: bool,
    pub team_2: bool,
    pub points: i16,
}

#[derive(Debug, Insertable)]
#[table_name = "picks"]
struct NewPick {
    entry_id: i64,
    game_id: i64,
    picked_school_id: Option<i64>,
    team_1: bool,
    team_2: bool,
    points: i16,
}

/// A single pick as submitted or edited by the contestant.
#[derive(Debug, Clone, Deserialize)]
pub struct PickSubmission {
    pub game_id: i64,
    pub team_1: bool,
    pub team_2: bool,
    pub points: i16,
}

/// The contestant's bracket prediction, part of the entry submission.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct BracketSubmission {
    pub school_1_id: i64,
    pub school_2_id: i64,
    pub champion_school_id: i64,
}

/// **POST /api/entries**
///
/// The whole season submission in one request: entry details, a pick for
/// every game on the slate, the tiebreakers and the bracket. Nothing is
/// saved when any part of it violates the rules.
#[derive(Debug, Deserialize)]
pub struct EntrySubmission {
    pub name: String,
    pub email: String,
    pub tiebreaker_1: Option<i64>,
    pub tiebreaker_2: Option<i32>,
    pub picks: Vec<PickSubmission>,
    pub bracket: Option<BracketSubmission>,
}

impl Entry {
    /// Validate and persist a full submission for the configured year.
    #[tracing::instrument(skip(submission, conn))]
    pub fn submit(
        user_id: i64,
        submission: EntrySubmission,
        conn: &db::Conn,
    ) -> Result<Entry, ServiceError> {
        let year = Config::contest_year();
        let bonus_games = Config::bonus_games();

        let games = Game::game_map(year, conn)?;
        let bowls = Bowl::bowl_map(conn)?;

        let picked_games: HashSet<i64> = submission.picks.iter().map(|p| p.game_id).collect();
        if picked_games.len() != submission.picks.len() {
            bad_request!("you have more than one pick for the same game");
        }

        if submission.picks.len() != games.len() {
            bad_request!("you must make a selection for each bowl game");
        }

        let slate = build_slate(&submission.picks, &games, &bowls, &bonus_games)?;

        let report = rules::validate_slate(&slate);
        if !report.is_valid() {
            // one message at a time, the way the submission form reports it
            if let Some(violation) = report.first_violation() {
                bad_request!(violation);
            }
        }

        if let Some(tiebreaker_1) = submission.tiebreaker_1 {
            if !games.contains_key(&tiebreaker_1) {
                bad_request!("the tiebreaker game is not on this year's slate");
            }
        }

        let new_entry = NewEntry {
            user_id,
            name: submission.name.clone(),
            email: submission.email.clone(),
            year,
            tiebreaker_1: submission.tiebreaker_1,
            tiebreaker_2: submission.tiebreaker_2,
        };

        let entry = conn.transaction::<Entry, diesel::result::Error, _>(|| {
            let entry: Entry = diesel::insert_into(entries::table)
                .values(&new_entry)
                .get_result(conn)?;

            let new_picks: Vec<NewPick> = submission
                .picks
                .iter()
                .map(|pick| NewPick::build(entry.id, pick, &games))
                .collect();

            diesel::insert_into(picks::table)
                .values(&new_picks)
                .execute(conn)?;

            if let Some(bracket) = submission.bracket {
                PlayoffPick::from_submission(entry.id, year, bracket).save(conn)?;
            }

            Ok(entry)
        })?;

        Ok(entry)
    }

    pub fn find_by_id(id: i64, conn: &db::Conn) -> Result<Entry, ServiceError> {
        let entry = entries::table.filter(entries::id.eq(id)).first(conn)?;

        Ok(entry)
    }

    pub fn find_by_year(year: i32, conn: &db::Conn) -> Result<Vec<Entry>, ServiceError> {
        let entries = entries::table
            .filter(entries::year.eq(year))
            .order(entries::name)
            .load::<Entry>(conn)?;

        Ok(entries)
    }

    pub fn find_by_user(user_id: i64, conn: &db::Conn) -> Result<Vec<Entry>, ServiceError> {
        let entries = entries::table
            .filter(entries::user_id.eq(user_id))
            .order(entries::year.desc())
            .load::<Entry>(conn)?;

        Ok(entries)
    }

    pub fn toggle_paid(id: i64, conn: &db::Conn) -> Result<Entry, ServiceError> {
        let entry = Entry::find_by_id(id, conn)?;

        let entry = diesel::update(&entry)
            .set(entries::paid.eq(!entry.paid))
            .get_result(conn)?;

        Ok(entry)
    }

    pub fn delete_by_id(id: i64, conn: &db::Conn) -> Result<(), ServiceError> {
        diesel::delete(entries::table.filter(entries::id.eq(id))).execute(conn)?;

        Ok(())
    }

    pub fn count(conn: &db::Conn) -> Result<i64, ServiceError> {
        let count = entries::table.count().get_result(conn)?;

        Ok(count)
    }

    /// Apply pick edits, refusing any pick whose game already kicked off.
    ///
    /// The slate that results from the edit is validated as a whole, so an
    /// edit can't sneak a sixth 3-point game past the submission checks.
    #[tracing::instrument(skip(session, updates, conn))]
    pub fn update_picks(
        entry_id: i64,
        session: &SessionUser,
        updates: Vec<PickSubmission>,
        now: DateTime<Utc>,
        conn: &db::Conn,
    ) -> Result<Vec<Pick>, ServiceError> {
        let entry = Entry::find_by_id(entry_id, conn)?;

        if entry.user_id != session.id && !session.is_admin {
            forbidden!("you can only edit your own entries");
        }

        let games = Game::game_map(entry.year, conn)?;
        let bowls = Bowl::bowl_map(conn)?;
        let bonus_games = Config::bonus_games();

        let current = Pick::find_by_entry(entry_id, conn)?;
        let mut merged: HashMap<i64, PickSubmission> = current
            .iter()
            .map(|pick| (pick.game_id, pick.as_submission()))
            .collect();

        for update in &updates {
            let game = match games.get(&update.game_id) {
                Some(game) => game,
                None => {
                    bad_request!("that game is not on this entry's slate");
                }
            };

            if game.has_started(now) {
                conflict!("picks for games that already started can no longer be changed");
            }

            if !merged.contains_key(&update.game_id) {
                bad_request!("that game is not on this entry's slate");
            }

            merged.insert(update.game_id, update.clone());
        }

        let merged: Vec<PickSubmission> = merged.into_iter().map(|(_, pick)| pick).collect();
        let slate = build_slate(&merged, &games, &bowls, &bonus_games)?;

        let report = rules::validate_slate(&slate);
        if let Some(violation) = report.first_violation() {
            bad_request!(violation);
        }

        conn.transaction::<(), diesel::result::Error, _>(|| {
            for update in &updates {
                let picked_school_id = games
                    .get(&update.game_id)
                    .and_then(|game| picked_school(game, update));

                diesel::update(
                    picks::table
                        .filter(picks::entry_id.eq(entry_id))
                        .filter(picks::game_id.eq(update.game_id)),
                )
                .set((
                    picks::team_1.eq(update.team_1),
                    picks::team_2.eq(update.team_2),
                    picks::points.eq(update.points),
                    picks::picked_school_id.eq(picked_school_id),
                ))
                .execute(conn)?;
            }

            Ok(())
        })?;

        Pick::find_by_entry(entry_id, conn)
    }
}

impl Pick {
    pub fn find_by_entry(entry_id: i64, conn: &db::Conn) -> Result<Vec<Pick>, ServiceError> {
        let picks = picks::table
            .filter(picks::entry_id.eq(entry_id))
            .order(picks::game_id)
            .load::<Pick>(conn)?;

        Ok(picks)
    }

    /// every pick of the year, grouped per entry
    pub fn find_by_year(
        year: i32,
        conn: &db::Conn,
    ) -> Result<HashMap<i64, Vec<Pick>>, ServiceError> {
        let picks = picks::table
            .inner_join(entries::table)
            .filter(entries::year.eq(year))
            .select(picks::all_columns)
            .load::<Pick>(conn)?;

        let mut grouped: HashMap<i64, Vec<Pick>> = HashMap::new();
        for pick in picks {
            grouped.entry(pick.entry_id).or_default().push(pick);
        }

        Ok(grouped)
    }

    pub fn find_by_game(game_id: i64, conn: &db::Conn) -> Result<Vec<Pick>, ServiceError> {
        let picks = picks::table
            .filter(picks::game_id.eq(game_id))
            .load::<Pick>(conn)?;

        Ok(picks)
    }

    fn as_submission(&self) -> PickSubmission {
        PickSubmission {
            game_id: self.game_id,
            team_1: self.team_1,
            team_2: self.team_2,
            points: self.points,
        }
    }
}

impl NewPick {
    fn build(entry_id: i64, pick: &PickSubmission, games: &HashMap<i64, Game>) -> NewPick {
        NewPick {
            entry_id,
            game_id: pick.game_id,
            picked_school_id: games.get(&pick.game_id).and_then(|g| picked_school(g, pick)),
            team_1: pick.team_1,
            team_2: pick.team_2,
            points: pick.points,
        }
    }
}

fn picked_school(game: &Game, pick: &PickSubmission) -> Option<i64> {
    let slate_pick = SlatePick {
        game_id: pick.game_id,
        team_1: pick.team_1,
        team_2: pick.team_2,
        points: pick.points,
        bonus_eligible: false,
    };

    match slate_pick.selection()? {
        Side::Team1 => Some(game.school_1_id),
        Side::Team2 => Some(game.school_2_id),
    }
}

/// Resolve submitted picks against the slate, flagging bonus-eligible games
/// by their bowl's name. Picks for games that don't exist are refused here,
/// before the ruleset ever sees them.
fn build_slate(
    picks: &[PickSubmission],
    games: &HashMap<i64, Game>,
    bowls: &HashMap<i64, Bowl>,
    bonus_games: &BonusGameList,
) -> Result<Vec<SlatePick>, ServiceError> {
    let mut slate = Vec::with_capacity(picks.len());

    for pick in picks {
        let game = match games.get(&pick.game_id) {
            Some(game) => game,
            None => {
                bad_request!("one of your picks is for an unknown game");
            }
        };

        let bonus_eligible = bowls
            .get(&game.bowl_id)
            .map(|bowl| bonus_games.contains(&bowl.name))
            .unwrap_or(false);

        slate.push(SlatePick {
            game_id: pick.game_id,
            team_1: pick.team_1,
            team_2: pick.team_2,
            points: pick.points,
            bonus_eligible,
        });
    }

    Ok(slate)
}

impl crate::validator::Validate<EntrySubmission> for EntrySubmission {
    fn validate(&self) -> Result<(), ServiceError> {
        if self.name.trim().is_empty() {
            bad_request!("you must enter an entry name");
        }

        if self.name.trim().len() > 40 {
            bad_request!("the entry name is too long, maximum 40 characters");
        }

        if !self.email.contains('@') {
            bad_request!("you must enter a valid e-mail address");
        }

        match self.tiebreaker_2 {
            Some(total) if total > 0 => {}
            _ => {
                bad_request!(
                    "please enter the number of total points that will be scored across all games in the bowl season"
                );
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::Validate;
    use chrono::TimeZone;

    fn submission() -> EntrySubmission {
        EntrySubmission {
            name: String::from("gridiron goblins"),
            email: String::from("goblins@example.com"),
            tiebreaker_1: None,
            tiebreaker_2: Some(1200),
            picks: Vec::new(),
            bracket: None,
        }
    }

    fn game(id: i64, bowl_id: i64) -> Game {
        Game {
            id,
            year: 2025,
            bowl_id,
            school_1_id: id * 10 + 1,
            school_2_id: id * 10 + 2,
            game_time: Utc.ymd(2025, 12, 27).and_hms(20, 0, 0),
            is_playoff: false,
            is_championship: false,
        }
    }

    fn bowl(id: i64, name: &str) -> Bowl {
        Bowl {
            id,
            name: name.to_string(),
            city: String::from("Anytown"),
            state: String::from("TX"),
            stadium_name: String::from("The Stadium"),
        }
    }

    #[test]
    fn entry_name_is_required() {
        let mut entry = submission();
        entry.name = String::from("  ");

        assert!(entry.validate().is_err());
    }

    #[test]
    fn email_must_look_like_an_email() {
        let mut entry = submission();
        entry.email = String::from("not-an-email");

        assert!(entry.validate().is_err());
    }

    #[test]
    fn total_points_tiebreaker_is_required() {
        let mut entry = submission();
        entry.tiebreaker_2 = None;

        assert!(entry.validate().is_err());

        entry.tiebreaker_2 = Some(0);
        assert!(entry.validate().is_err());
    }

    #[test]
    fn complete_submission_is_accepted() {
        assert!(submission().validate().is_ok());
    }

    #[test]
    fn slate_building_flags_bonus_games() {
        let mut games = HashMap::new();
        games.insert(1, game(1, 1));
        games.insert(2, game(2, 2));

        let mut bowls = HashMap::new();
        bowls.insert(1, bowl(1, "Rose"));
        bowls.insert(2, bowl(2, "Alamo"));

        let bonus = BonusGameList::new(vec!["Alamo"]);

        let picks = vec![
            PickSubmission {
                game_id: 1,
                team_1: true,
                team_2: false,
                points: 1,
            },
            PickSubmission {
                game_id: 2,
                team_1: false,
                team_2: true,
                points: 10,
            },
        ];

        let slate = build_slate(&picks, &games, &bowls, &bonus).unwrap();

        assert!(!slate[0].bonus_eligible);
        assert!(slate[1].bonus_eligible);
        assert!(rules::validate_slate(&slate).is_valid());
    }

    #[test]
    fn slate_building_rejects_unknown_games() {
        let games = HashMap::new();
        let bowls = HashMap::new();
        let bonus = BonusGameList::new(Vec::<String>::new());

        let picks = vec![PickSubmission {
            game_id: 99,
            team_1: true,
            team_2: false,
            points: 1,
        }];

        assert!(build_slate(&picks, &games, &bowls, &bonus).is_err());
    }

    #[test]
    fn picked_school_follows_the_selection() {
        let game = game(1, 1);

        let team_1 = PickSubmission {
            game_id: 1,
            team_1: true,
            team_2: false,
            points: 1,
        };
        let team_2 = PickSubmission {
            team_1: false,
            team_2: true,
            ..team_1.clone()
        };
        let nobody = PickSubmission {
            team_1: false,
            team_2: false,
            ..team_1.clone()
        };

        assert_eq!(picked_school(&game, &team_1), Some(game.school_1_id));
        assert_eq!(picked_school(&game, &team_2), Some(game.school_2_id));
        assert_eq!(picked_school(&game, &nobody), None);
    }
}
