use actix_web::web::{Data, Path};
use actix_web::{get, web};

use crate::db;
use crate::entries::Pick;
use crate::games;
use crate::results::GameResult;
use crate::rules::{self, FinalScore};
use crate::server::Response;

use crate::standings::models::BowlPickRow;

#[get("/standings/{year}")]
async fn standings(year: Path<i32>, pool: Data<db::Pool>) -> Response {
    let conn = pool.get()?;

    let rows = web::block(move || super::standings_for_year(*year, &conn)).await?;

    http_ok_json!(rows);
}

#[get("/standings/entries/{id}")]
async fn completed_entry(entry_id: Path<i64>, pool: Data<db::Pool>) -> Response {
    let conn = pool.get()?;

    let entry = web::block(move || super::completed_entry(*entry_id, &conn)).await?;

    http_ok_json!(entry);
}

#[get("/games/{id}/picks")]
async fn bowl_picks(game_id: Path<i64>, pool: Data<db::Pool>) -> Response {
    let game = games::routes::find_cached(*game_id, &pool).await?;

    let conn = pool.get()?;
    let rows: Vec<BowlPickRow> = web::block(move || {
        let picks = Pick::find_by_game(game.id, &conn)?;
        let year_standings = super::standings_for_year(game.year, &conn)?;

        let score = GameResult::find_by_game(game.id, &conn)?.map(|result| FinalScore {
            score_1: result.score_1,
            score_2: result.score_2,
        });

        let mut rows: Vec<BowlPickRow> = picks
            .iter()
            .filter_map(|pick| {
                // the standings row carries the display name and total
                let row = year_standings.iter().find(|row| row.entry_id == pick.entry_id)?;

                let earned_points = score
                    .as_ref()
                    .and_then(|score| rules::earned_points(&super::as_slate_pick(pick), score));

                Some(BowlPickRow {
                    entry_id: pick.entry_id,
                    entry_name: row.entry_name.clone(),
                    team_1_picked: pick.team_1,
                    team_2_picked: pick.team_2,
                    points: pick.points,
                    earned_points,
                    total_points: row.current_points,
                })
            })
            .collect();

        rows.sort_by(|a, b| b.total_points.cmp(&a.total_points));

        Ok(rows)
    })
    .await?;

    http_ok_json!(rows);
}

#[get("/analysis/{year}")]
async fn analysis(year: Path<i32>, pool: Data<db::Pool>) -> Response {
    let conn = pool.get()?;

    let rows = web::block(move || super::analysis_for_year(*year, &conn)).await?;

    http_ok_json!(rows);
}

#[get("/tiebreakers/{year}")]
async fn tiebreakers(year: Path<i32>, pool: Data<db::Pool>) -> Response {
    let conn = pool.get()?;

    let rows = web::block(move || super::tiebreakers_for_year(*year, &conn)).await?;

    http_ok_json!(rows);
}

pub fn register(cfg: &mut web::ServiceConfig) {
    cfg.service(standings);
    cfg.service(completed_entry);
    cfg.service(bowl_picks);
    cfg.service(analysis);
    cfg.service(tiebreakers);
}
