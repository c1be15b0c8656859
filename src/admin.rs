use actix_identity::Identity;
use actix_web::web::{Data, Json};
use actix_web::{get, post, put, web};

use crate::auth;
use crate::config::Config;
use crate::db;
use crate::entries::Entry;
use crate::games::Game;
use crate::server::Response;
use crate::users::User;

#[derive(Serialize)]
struct Counts {
    users: i64,
    games: i64,
    entries: i64,
}

#[derive(Serialize)]
struct ServerStats {
    requests: u32,
    errors: u32,
    cache: pickem_cache::CacheStatus,
    cache_hits: u32,
    cache_misses: u32,
    active_db_connections: u32,
    idle_db_connections: u32,
}

/// **PUT /api/admin/settings**
///
/// Both fields are optional; omitted fields stay untouched.
#[derive(Debug, Deserialize)]
struct SettingsUpdate {
    contest_year: Option<i32>,
    submissions_open: Option<bool>,
}

#[get("/admin/counts")]
async fn counts(id: Identity, pool: Data<db::Pool>) -> Response {
    auth::verify_admin(&id)?;

    let conn = pool.get()?;
    let counts = web::block(move || {
        Ok(Counts {
            users: User::count(&conn)?,
            games: Game::count(&conn)?,
            entries: Entry::count(&conn)?,
        })
    })
    .await?;

    http_ok_json!(counts);
}

#[get("/admin/server/stats")]
async fn server_stats(id: Identity, pool: Data<db::Pool>) -> Response {
    auth::verify_admin(&id)?;

    let state = pool.into_inner().state();
    let requests = crate::stats::Stats::load();
    let cache_stats = pickem_cache::Stats::load();

    http_ok_json!(ServerStats {
        requests: requests.requests,
        errors: requests.errors,
        cache: pickem_cache::Cache::status().await,
        cache_hits: cache_stats.cache_hits,
        cache_misses: cache_stats.cache_misses,
        active_db_connections: state.connections,
        idle_db_connections: state.idle_connections,
    });
}

#[get("/admin/server/cache")]
async fn cache_status(id: Identity) -> Response {
    auth::verify_admin(&id)?;

    http_ok_json!(pickem_cache::Cache::status().await);
}

#[post("/admin/server/cache/disable")]
async fn disable_cache(id: Identity) -> Response {
    auth::verify_admin(&id)?;

    pickem_cache::Cache::disable().await;

    http_ok_json!(pickem_cache::Cache::status().await);
}

#[post("/admin/server/cache/enable")]
async fn enable_cache(id: Identity) -> Response {
    auth::verify_admin(&id)?;

    if let Err(err) = pickem_cache::Cache::enable().await {
        error!("unable to re-enable the cache: {}", err);
        return Err(crate::errors::ServiceError::InternalServerError);
    }

    http_ok_json!(pickem_cache::Cache::status().await);
}

#[put("/admin/settings")]
async fn update_settings(settings: Json<SettingsUpdate>, id: Identity) -> Response {
    auth::verify_admin(&id)?;

    let settings = settings.into_inner();

    if let Some(year) = settings.contest_year {
        if year < 2000 || year > 2100 {
            bad_request!("the contest year is out of range");
        }
        info!("contest year set to {}", year);
        Config::set_contest_year(year);
    }

    if let Some(open) = settings.submissions_open {
        info!("entry submissions toggled to {}", open);
        Config::set_submissions_open(open);
    }

    http_ok_json!(crate::server::current_settings());
}

pub fn register(cfg: &mut web::ServiceConfig) {
    cfg.service(counts);
    cfg.service(server_stats);
    cfg.service(cache_status);
    cfg.service(disable_cache);
    cfg.service(enable_cache);
    cfg.service(update_settings);
}
