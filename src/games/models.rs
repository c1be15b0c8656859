use std::collections::HashMap;

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use pickem_cache::CacheIdentifier;

use crate::db;
use crate::errors::ServiceError;
use crate::schema::games;

/// A bowl game on the season's slate.
///
/// Playoff semifinals and the championship game are part of the regular
/// slate; the flags only matter for display. Whether a game can carry the
/// 10 point weight is decided by its bowl's name, not stored here.
#[derive(Debug, Serialize, Deserialize, Queryable, Identifiable, AsChangeset, Clone)]
pub struct Game {
    pub id: i64,
    pub year: i32,
    pub bowl_id: i64,
    pub school_1_id: i64,
    pub school_2_id: i64,
    pub game_time: DateTime<Utc>,
    pub is_playoff: bool,
    pub is_championship: bool,
}

#[derive(Debug, Clone, Deserialize, Insertable)]
#[table_name = "games"]
pub struct CreateGame {
    pub year: i32,
    pub bowl_id: i64,
    pub school_1_id: i64,
    pub school_2_id: i64,
    pub game_time: DateTime<Utc>,
    #[serde(default)]
    pub is_playoff: bool,
    #[serde(default)]
    pub is_championship: bool,
}

/// **GET /api/games/today**
///
/// The games being played today, with the matchup already resolved to
/// names so the home page doesn't need three more requests.
#[derive(Debug, Serialize)]
pub struct TodaysGame {
    pub game_id: i64,
    pub bowl_name: String,
    pub game_time: DateTime<Utc>,
    pub school_1_name: String,
    pub school_2_name: String,
}

impl Game {
    pub fn create(new_game: CreateGame, conn: &db::Conn) -> Result<Game, ServiceError> {
        let game = diesel::insert_into(games::table)
            .values(&new_game)
            .get_result(conn)?;

        Ok(game)
    }

    pub fn find_by_id(id: i64, conn: &db::Conn) -> Result<Game, ServiceError> {
        let game = games::table.filter(games::id.eq(id)).first::<Game>(conn)?;

        Ok(game)
    }

    pub fn find_by_year(year: i32, conn: &db::Conn) -> Result<Vec<Game>, ServiceError> {
        let games = games::table
            .filter(games::year.eq(year))
            .order(games::game_time)
            .load::<Game>(conn)?;

        Ok(games)
    }

    /// the year's games indexed by id
    pub fn game_map(year: i32, conn: &db::Conn) -> Result<HashMap<i64, Game>, ServiceError> {
        let map = Game::find_by_year(year, conn)?
            .into_iter()
            .map(|game| (game.id, game))
            .collect();

        Ok(map)
    }

    pub fn find_today(conn: &db::Conn) -> Result<Vec<Game>, ServiceError> {
        let start_of_day = Utc::now().date().and_hms(0, 0, 0);
        let end_of_day = start_of_day + chrono::Duration::days(1);

        let games = games::table
            .filter(games::game_time.ge(start_of_day))
            .filter(games::game_time.lt(end_of_day))
            .order(games::game_time)
            .load::<Game>(conn)?;

        Ok(games)
    }

    pub fn update(&self, conn: &db::Conn) -> Result<Game, ServiceError> {
        let game = diesel::update(self).set(self).get_result(conn)?;

        Ok(game)
    }

    pub fn count(conn: &db::Conn) -> Result<i64, ServiceError> {
        let count = games::table.count().get_result(conn)?;

        Ok(count)
    }

    /// picks lock the moment the game kicks off
    pub fn has_started(&self, now: DateTime<Utc>) -> bool {
        self.game_time <= now
    }
}

impl CacheIdentifier for Game {
    fn cache_key<T: std::fmt::Display>(id: T) -> String {
        format!("game.{}", id)
    }
}

impl crate::validator::Validate<CreateGame> for CreateGame {
    fn validate(&self) -> Result<(), ServiceError> {
        if self.school_1_id == self.school_2_id {
            bad_request!("a school cannot play against itself");
        }

        if self.year < 2000 || self.year > 2100 {
            bad_request!("the game year is out of range");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::Validate;
    use chrono::TimeZone;

    fn new_game() -> CreateGame {
        CreateGame {
            year: 2025,
            bowl_id: 1,
            school_1_id: 1,
            school_2_id: 2,
            game_time: Utc.ymd(2025, 12, 27).and_hms(20, 0, 0),
            is_playoff: false,
            is_championship: false,
        }
    }

    #[test]
    fn schools_must_differ() {
        let mut game = new_game();
        game.school_2_id = game.school_1_id;

        assert!(game.validate().is_err());
    }

    #[test]
    fn plausible_game_is_accepted() {
        assert!(new_game().validate().is_ok());
    }

    #[test]
    fn implausible_year_is_rejected() {
        let mut game = new_game();
        game.year = 25;

        assert!(game.validate().is_err());
    }

    #[test]
    fn game_locks_at_kickoff() {
        let game = Game {
            id: 1,
            year: 2025,
            bowl_id: 1,
            school_1_id: 1,
            school_2_id: 2,
            game_time: Utc.ymd(2025, 12, 27).and_hms(20, 0, 0),
            is_playoff: false,
            is_championship: false,
        };

        let before = Utc.ymd(2025, 12, 27).and_hms(19, 59, 59);
        let kickoff = game.game_time;
        let after = Utc.ymd(2025, 12, 28).and_hms(1, 0, 0);

        assert!(!game.has_started(before));
        assert!(game.has_started(kickoff));
        assert!(game.has_started(after));
    }
}
