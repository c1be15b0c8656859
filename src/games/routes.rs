use actix_identity::Identity;
use actix_web::web::{Data, Json, Path};
use actix_web::{get, post, put, web};
use pickem_cache::Cache;

use crate::auth;
use crate::bowls::Bowl;
use crate::db;
use crate::schools::School;
use crate::server::Response;
use crate::validator::Validator;

use crate::games::models::{CreateGame, Game, TodaysGame};

#[get("/games/today")]
async fn today(pool: Data<db::Pool>) -> Response {
    let conn = pool.get()?;

    let games: Vec<TodaysGame> = web::block(move || {
        let games = Game::find_today(&conn)?;
        let bowls = Bowl::bowl_map(&conn)?;
        let schools = School::school_map(&conn)?;

        let school_name = |id: i64| {
            schools
                .get(&id)
                .map(|school| school.name.clone())
                .unwrap_or_default()
        };

        Ok(games
            .into_iter()
            .map(|game| TodaysGame {
                bowl_name: bowls
                    .get(&game.bowl_id)
                    .map(|bowl| bowl.name.clone())
                    .unwrap_or_default(),
                game_time: game.game_time,
                school_1_name: school_name(game.school_1_id),
                school_2_name: school_name(game.school_2_id),
                game_id: game.id,
            })
            .collect())
    })
    .await?;

    http_ok_json!(games);
}

#[get("/games/{year}")]
async fn find_by_year(year: Path<i32>, pool: Data<db::Pool>) -> Response {
    let conn = pool.get()?;

    let games = web::block(move || Game::find_by_year(*year, &conn)).await?;

    http_ok_json!(games);
}

#[post("/games")]
async fn create(game: Json<Validator<CreateGame>>, id: Identity, pool: Data<db::Pool>) -> Response {
    auth::verify_admin(&id)?;

    let game = game.into_inner().validate()?;
    let conn = pool.get()?;

    let game = web::block(move || Game::create(game, &conn)).await?;

    Cache::set(&game, game.id).await;

    http_created_json!(game);
}

#[put("/games")]
async fn update(game: Json<Game>, id: Identity, pool: Data<db::Pool>) -> Response {
    auth::verify_admin(&id)?;

    let conn = pool.get()?;

    let game = web::block(move || game.update(&conn)).await?;

    // a moved kickoff changes when picks lock, refresh eagerly
    Cache::set(&game, game.id).await;

    http_ok_json!(game);
}

/// fetch a single game, read-through cached
pub async fn find_cached(game_id: i64, pool: &db::Pool) -> Result<Game, crate::errors::ServiceError> {
    if let Some(game) = Cache::get::<Game, i64>(game_id).await {
        return Ok(game);
    }

    let conn = pool.get()?;
    let game = web::block(move || Game::find_by_id(game_id, &conn)).await?;

    Cache::set(&game, game.id).await;

    Ok(game)
}

pub fn register(cfg: &mut web::ServiceConfig) {
    cfg.service(today);
    cfg.service(find_by_year);
    cfg.service(create);
    cfg.service(update);
}
