use std::collections::HashMap;

use diesel::prelude::*;
use diesel::result::Error as DBError;

use crate::db;
use crate::entries::models::BracketSubmission;
use crate::errors::ServiceError;
use crate::rules::BracketPick;
use crate::schema::{playoff_picks, playoff_results, playoff_schools};

/// A school in the playoff field for a year.
///
/// Seeds 1, 4, 5, 8, 9 and 12 make up one side of the bracket, the rest the
/// other; the SPA builds its two finalist dropdowns from that split.
#[derive(Debug, Serialize, Deserialize, Queryable, Identifiable, Clone)]
#[table_name = "playoff_schools"]
pub struct PlayoffSchool {
    pub id: i64,
    pub year: i32,
    pub school_id: i64,
    pub seed_number: i16,
}

#[derive(Debug, Deserialize, Insertable)]
#[table_name = "playoff_schools"]
pub struct NewPlayoffSchool {
    pub year: i32,
    pub school_id: i64,
    pub seed_number: i16,
}

/// An entry's championship bracket prediction.
#[derive(Debug, Serialize, Deserialize, Queryable, Insertable, AsChangeset, Clone)]
#[table_name = "playoff_picks"]
pub struct PlayoffPick {
    pub entry_id: i64,
    pub year: i32,
    pub school_1_id: i64,
    pub school_2_id: i64,
    pub champion_school_id: i64,
}

/// The actual bracket outcome for a year, entered by an admin.
#[derive(Debug, Serialize, Deserialize, Queryable, Insertable, AsChangeset, Clone)]
#[table_name = "playoff_results"]
pub struct PlayoffResult {
    pub year: i32,
    pub school_1_id: i64,
    pub school_2_id: i64,
    pub champion_school_id: i64,
}

impl PlayoffSchool {
    pub fn create(
        new_school: NewPlayoffSchool,
        conn: &db::Conn,
    ) -> Result<PlayoffSchool, ServiceError> {
        let school = diesel::insert_into(playoff_schools::table)
            .values(&new_school)
            .get_result(conn)?;

        Ok(school)
    }

    pub fn find_by_year(year: i32, conn: &db::Conn) -> Result<Vec<PlayoffSchool>, ServiceError> {
        let schools = playoff_schools::table
            .filter(playoff_schools::year.eq(year))
            .order(playoff_schools::seed_number)
            .load::<PlayoffSchool>(conn)?;

        Ok(schools)
    }
}

impl PlayoffPick {
    pub fn from_submission(entry_id: i64, year: i32, bracket: BracketSubmission) -> PlayoffPick {
        PlayoffPick {
            entry_id,
            year,
            school_1_id: bracket.school_1_id,
            school_2_id: bracket.school_2_id,
            champion_school_id: bracket.champion_school_id,
        }
    }

    /// Store the bracket pick, replacing an earlier one for the entry.
    // This has to return the actual database error, because it's used in transactions.
    pub fn save(&self, conn: &db::Conn) -> Result<PlayoffPick, DBError> {
        diesel::insert_into(playoff_picks::table)
            .values(self)
            .on_conflict(playoff_picks::entry_id)
            .do_update()
            .set(self)
            .get_result::<PlayoffPick>(conn)
    }

    pub fn find_by_entry(
        entry_id: i64,
        conn: &db::Conn,
    ) -> Result<Option<PlayoffPick>, ServiceError> {
        let pick = playoff_picks::table
            .filter(playoff_picks::entry_id.eq(entry_id))
            .first::<PlayoffPick>(conn)
            .optional()?;

        Ok(pick)
    }

    /// the year's bracket picks indexed by entry
    pub fn find_by_year(
        year: i32,
        conn: &db::Conn,
    ) -> Result<HashMap<i64, PlayoffPick>, ServiceError> {
        let picks = playoff_picks::table
            .filter(playoff_picks::year.eq(year))
            .load::<PlayoffPick>(conn)?;

        Ok(picks.into_iter().map(|pick| (pick.entry_id, pick)).collect())
    }

    pub fn as_bracket(&self) -> BracketPick {
        BracketPick {
            school_1_id: self.school_1_id,
            school_2_id: self.school_2_id,
            champion_school_id: self.champion_school_id,
        }
    }
}

impl PlayoffResult {
    pub fn upsert(result: PlayoffResult, conn: &db::Conn) -> Result<PlayoffResult, ServiceError> {
        let result = diesel::insert_into(playoff_results::table)
            .values(&result)
            .on_conflict(playoff_results::year)
            .do_update()
            .set(&result)
            .get_result(conn)?;

        Ok(result)
    }

    pub fn find_by_year(year: i32, conn: &db::Conn) -> Result<Option<PlayoffResult>, ServiceError> {
        let result = playoff_results::table
            .filter(playoff_results::year.eq(year))
            .first::<PlayoffResult>(conn)
            .optional()?;

        Ok(result)
    }

    pub fn as_bracket(&self) -> BracketPick {
        BracketPick {
            school_1_id: self.school_1_id,
            school_2_id: self.school_2_id,
            champion_school_id: self.champion_school_id,
        }
    }
}

impl crate::validator::Validate<NewPlayoffSchool> for NewPlayoffSchool {
    fn validate(&self) -> Result<(), ServiceError> {
        if self.seed_number < 1 || self.seed_number > 12 {
            bad_request!("seeds run from 1 to 12");
        }

        Ok(())
    }
}

impl crate::validator::Validate<PlayoffResult> for PlayoffResult {
    fn validate(&self) -> Result<(), ServiceError> {
        if self.school_1_id == self.school_2_id {
            bad_request!("the two finalists cannot be the same school");
        }

        let finalists = [self.school_1_id, self.school_2_id];
        if !finalists.contains(&self.champion_school_id) {
            bad_request!("the champion has to be one of the two finalists");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::Validate;

    #[test]
    fn seeds_outside_the_field_are_rejected() {
        let school = NewPlayoffSchool {
            year: 2025,
            school_id: 1,
            seed_number: 13,
        };

        assert!(school.validate().is_err());
    }

    #[test]
    fn recorded_champion_must_be_a_finalist() {
        let result = PlayoffResult {
            year: 2025,
            school_1_id: 1,
            school_2_id: 2,
            champion_school_id: 3,
        };

        assert!(result.validate().is_err());
    }

    #[test]
    fn valid_bracket_outcome_is_accepted() {
        let result = PlayoffResult {
            year: 2025,
            school_1_id: 1,
            school_2_id: 2,
            champion_school_id: 2,
        };

        assert!(result.validate().is_ok());
    }
}
