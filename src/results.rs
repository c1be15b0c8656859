use std::collections::HashMap;

use actix_identity::Identity;
use actix_web::web::{Data, Json, Path};
use actix_web::{get, post, web};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::auth;
use crate::db;
use crate::errors::ServiceError;
use crate::games::Game;
use crate::rules::{FinalScore, Side};
use crate::schema::{game_results, games};
use crate::server::Response;
use crate::validator::Validator;

/// A recorded final score for a game.
///
/// Results come from the admins, not from a feed; they overwrite freely
/// because typos happen. The winning and losing school are derived from
/// the scores and stay empty while the entered scores are equal, which
/// keeps the game unresolved for scoring.
#[derive(Debug, Serialize, Deserialize, Queryable, Clone)]
pub struct GameResult {
    pub game_id: i64,
    pub score_1: i32,
    pub score_2: i32,
    pub winning_school_id: Option<i64>,
    pub losing_school_id: Option<i64>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// **POST /api/results**
///
/// ``` shell
/// curl --location --request POST 'http://localhost:8080/api/results' \
/// --header 'Content-Type: application/json' \
/// --data-raw '{ "game_id": 12, "score_1": 21, "score_2": 14 }'
/// ```
#[derive(Debug, Deserialize)]
pub struct SubmitResult {
    pub game_id: i64,
    pub score_1: i32,
    pub score_2: i32,
}

#[derive(Debug, Insertable, AsChangeset)]
#[table_name = "game_results"]
#[changeset_options(treat_none_as_null = "true")]
struct ResultRow {
    game_id: i64,
    score_1: i32,
    score_2: i32,
    winning_school_id: Option<i64>,
    losing_school_id: Option<i64>,
    updated_at: Option<DateTime<Utc>>,
}

impl GameResult {
    /// Record a final score, replacing any earlier one for the game.
    #[tracing::instrument(skip(conn))]
    pub fn upsert(submit: SubmitResult, conn: &db::Conn) -> Result<GameResult, ServiceError> {
        let game = Game::find_by_id(submit.game_id, conn)?;

        let score = FinalScore {
            score_1: submit.score_1,
            score_2: submit.score_2,
        };

        let (winning_school_id, losing_school_id) = match score.winner() {
            Some(Side::Team1) => (Some(game.school_1_id), Some(game.school_2_id)),
            Some(Side::Team2) => (Some(game.school_2_id), Some(game.school_1_id)),
            None => (None, None),
        };

        let row = ResultRow {
            game_id: submit.game_id,
            score_1: submit.score_1,
            score_2: submit.score_2,
            winning_school_id,
            losing_school_id,
            updated_at: Some(Utc::now()),
        };

        let result = diesel::insert_into(game_results::table)
            .values(&row)
            .on_conflict(game_results::game_id)
            .do_update()
            .set(&row)
            .get_result(conn)?;

        Ok(result)
    }

    pub fn find_by_year(year: i32, conn: &db::Conn) -> Result<Vec<GameResult>, ServiceError> {
        let results = game_results::table
            .inner_join(games::table)
            .filter(games::year.eq(year))
            .select(game_results::all_columns)
            .load::<GameResult>(conn)?;

        Ok(results)
    }

    /// the year's scores indexed by game, ready for the scoring rules
    pub fn score_map(year: i32, conn: &db::Conn) -> Result<HashMap<i64, FinalScore>, ServiceError> {
        let map = GameResult::find_by_year(year, conn)?
            .into_iter()
            .map(|result| {
                (
                    result.game_id,
                    FinalScore {
                        score_1: result.score_1,
                        score_2: result.score_2,
                    },
                )
            })
            .collect();

        Ok(map)
    }

    pub fn find_by_game(game_id: i64, conn: &db::Conn) -> Result<Option<GameResult>, ServiceError> {
        let result = game_results::table
            .filter(game_results::game_id.eq(game_id))
            .first::<GameResult>(conn)
            .optional()?;

        Ok(result)
    }
}

impl crate::validator::Validate<SubmitResult> for SubmitResult {
    fn validate(&self) -> Result<(), ServiceError> {
        if self.score_1 < 0 || self.score_2 < 0 {
            bad_request!("scores cannot be negative");
        }

        if self.score_1 > 200 || self.score_2 > 200 {
            bad_request!("that score does not look like football");
        }

        Ok(())
    }
}

#[get("/results/{year}")]
async fn find_by_year(year: Path<i32>, pool: Data<db::Pool>) -> Response {
    let conn = pool.get()?;

    let results = web::block(move || GameResult::find_by_year(*year, &conn)).await?;

    http_ok_json!(results);
}

#[post("/results")]
async fn upsert(
    result: Json<Validator<SubmitResult>>,
    id: Identity,
    pool: Data<db::Pool>,
) -> Response {
    auth::verify_admin(&id)?;

    let result = result.into_inner().validate()?;
    let conn = pool.get()?;

    let result = web::block(move || GameResult::upsert(result, &conn)).await?;

    http_created_json!(result);
}

pub fn register(cfg: &mut web::ServiceConfig) {
    cfg.service(find_by_year);
    cfg.service(upsert);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::Validate;

    #[test]
    fn negative_scores_are_rejected() {
        let result = SubmitResult {
            game_id: 1,
            score_1: -3,
            score_2: 14,
        };

        assert!(result.validate().is_err());
    }

    #[test]
    fn normal_scores_are_accepted() {
        let result = SubmitResult {
            game_id: 1,
            score_1: 21,
            score_2: 14,
        };

        assert!(result.validate().is_ok());
    }

    #[test]
    fn a_shutout_is_a_valid_result() {
        let result = SubmitResult {
            game_id: 1,
            score_1: 0,
            score_2: 45,
        };

        assert!(result.validate().is_ok());
    }
}
