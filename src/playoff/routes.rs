use actix_identity::Identity;
use actix_web::web::{Data, Json, Path};
use actix_web::{get, post, web};

use crate::auth;
use crate::db;
use crate::server::Response;
use crate::validator::Validator;

use crate::playoff::models::{NewPlayoffSchool, PlayoffResult, PlayoffSchool};

#[get("/playoff/schools/{year}")]
async fn schools_by_year(year: Path<i32>, pool: Data<db::Pool>) -> Response {
    let conn = pool.get()?;

    let schools = web::block(move || PlayoffSchool::find_by_year(*year, &conn)).await?;

    http_ok_json!(schools);
}

#[post("/playoff/schools")]
async fn add_school(
    school: Json<Validator<NewPlayoffSchool>>,
    id: Identity,
    pool: Data<db::Pool>,
) -> Response {
    auth::verify_admin(&id)?;

    let school = school.into_inner().validate()?;
    let conn = pool.get()?;

    let school = web::block(move || PlayoffSchool::create(school, &conn)).await?;

    http_created_json!(school);
}

#[get("/playoff/results/{year}")]
async fn result_by_year(year: Path<i32>, pool: Data<db::Pool>) -> Response {
    let conn = pool.get()?;

    let result = web::block(move || PlayoffResult::find_by_year(*year, &conn)).await?;

    http_ok_json!(result);
}

#[post("/playoff/results")]
async fn record_result(
    result: Json<Validator<PlayoffResult>>,
    id: Identity,
    pool: Data<db::Pool>,
) -> Response {
    auth::verify_admin(&id)?;

    let result = result.into_inner().validate()?;
    let conn = pool.get()?;

    let result = web::block(move || PlayoffResult::upsert(result, &conn)).await?;

    http_created_json!(result);
}

pub fn register(cfg: &mut web::ServiceConfig) {
    cfg.service(schools_by_year);
    cfg.service(add_school);
    cfg.service(result_by_year);
    cfg.service(record_result);
}
