use actix_identity::Identity;
use actix_web::http::StatusCode;
use actix_web::web::{Data, Json, Path};
use actix_web::{delete, get, patch, post, web, HttpResponse};
use chrono::Utc;

use crate::auth;
use crate::config::Config;
use crate::db;
use crate::server::Response;
use crate::validator::Validator;

use crate::entries::models::{Entry, EntrySubmission, PickSubmission};

#[post("/entries")]
async fn submit(
    submission: Json<Validator<EntrySubmission>>,
    id: Identity,
    pool: Data<db::Pool>,
) -> Response {
    let user_id = auth::get_user_id(&id)?;

    if !Config::submissions_open() {
        forbidden!("entry submissions are closed for this season");
    }

    let submission = submission.into_inner().validate()?;
    let conn = pool.get()?;

    let entry = web::block(move || Entry::submit(user_id, submission, &conn)).await?;

    info!("user {} submitted entry {} ({})", user_id, entry.id, entry.name);

    http_created_json!(entry);
}

#[get("/entries/mine")]
async fn mine(id: Identity, pool: Data<db::Pool>) -> Response {
    let user_id = auth::get_user_id(&id)?;

    let conn = pool.get()?;
    let entries = web::block(move || Entry::find_by_user(user_id, &conn)).await?;

    http_ok_json!(entries);
}

#[get("/entries/{year}")]
async fn find_by_year(year: Path<i32>, id: Identity, pool: Data<db::Pool>) -> Response {
    auth::verify_admin(&id)?;

    let conn = pool.get()?;
    let entries = web::block(move || Entry::find_by_year(*year, &conn)).await?;

    http_ok_json!(entries);
}

#[post("/entries/{id}/paid")]
async fn toggle_paid(entry_id: Path<i64>, id: Identity, pool: Data<db::Pool>) -> Response {
    auth::verify_admin(&id)?;

    let conn = pool.get()?;
    let entry = web::block(move || Entry::toggle_paid(*entry_id, &conn)).await?;

    http_ok_json!(entry);
}

#[delete("/entries/{id}")]
async fn delete(entry_id: Path<i64>, id: Identity, pool: Data<db::Pool>) -> Response {
    auth::verify_admin(&id)?;

    let conn = pool.get()?;

    web::block(move || {
        let entry = Entry::find_by_id(*entry_id, &conn)?;
        warn!("deleting entry {} ({})", entry.id, entry.name);
        Entry::delete_by_id(entry.id, &conn)
    })
    .await?;

    Ok(HttpResponse::new(StatusCode::OK))
}

#[patch("/entries/{id}/picks")]
async fn update_picks(
    entry_id: Path<i64>,
    updates: Json<Vec<PickSubmission>>,
    id: Identity,
    pool: Data<db::Pool>,
) -> Response {
    let session = auth::get_user(&id)?;

    let updates = updates.into_inner();
    if updates.is_empty() {
        bad_request!("there is nothing to update");
    }

    let conn = pool.get()?;
    let picks = web::block(move || {
        Entry::update_picks(*entry_id, &session, updates, Utc::now(), &conn)
    })
    .await?;

    http_ok_json!(picks);
}

pub fn register(cfg: &mut web::ServiceConfig) {
    cfg.service(submit);
    cfg.service(mine);
    cfg.service(find_by_year);
    cfg.service(toggle_paid);
    cfg.service(delete);
    cfg.service(update_picks);
}
