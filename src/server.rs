use actix_cors::Cors;
use actix_identity::{CookieIdentityPolicy, IdentityService};
use actix_web::{get, middleware, web, App, HttpRequest, HttpResponse, HttpServer};
use actix_web_opentelemetry::RequestTracing;

use crate::admin;
use crate::auth;
use crate::blog;
use crate::bowls;
use crate::config::Config;
use crate::db;
use crate::entries;
use crate::errors::ServiceError;
use crate::games;
use crate::metrics;
use crate::playoff;
use crate::results;
use crate::schools;
use crate::standings;
use crate::stats;

pub type Response = Result<HttpResponse, ServiceError>;

/// two weeks, the length of the bowl season plus some slack
const SESSION_MAX_AGE_SECONDS: i64 = 60 * 60 * 24 * 14;

#[derive(Debug, Serialize)]
pub struct Settings {
    pub current_year: i32,
    pub submissions_open: bool,
}

pub fn current_settings() -> Settings {
    Settings {
        current_year: Config::contest_year(),
        submissions_open: Config::submissions_open(),
    }
}

#[get("/health")]
async fn health(_: HttpRequest) -> &'static str {
    "ok"
}

#[get("/settings")]
async fn settings(_: HttpRequest) -> Response {
    http_ok_json!(current_settings());
}

pub async fn launch(db_pool: db::Pool) -> std::io::Result<()> {
    let request_metrics = metrics::request_metrics();

    HttpServer::new(move || {
        App::new()
            .data(db_pool.clone())
            .wrap(sentry_actix::Sentry::new())
            .wrap(middleware::DefaultHeaders::new().header("X-Version", env!("CARGO_PKG_VERSION")))
            .wrap(middleware::Logger::default())
            .wrap(middleware::NormalizePath::default())
            .wrap(stats::Middleware::default())
            .wrap(RequestTracing::new())
            .wrap(request_metrics.clone())
            .wrap(IdentityService::new(
                CookieIdentityPolicy::new(Config::session_private_key().as_bytes())
                    .name("pickem-session")
                    .path("/")
                    .max_age(SESSION_MAX_AGE_SECONDS)
                    .secure(false),
            ))
            .wrap(
                Cors::default()
                    .allowed_origin(Config::cors_origin())
                    .allow_any_header()
                    .allow_any_method()
                    .supports_credentials()
                    .max_age(3600),
            )
            .data(web::JsonConfig::default().limit(262_144))
            .data(web::PayloadConfig::default().limit(262_144))
            .service(
                web::scope("/api")
                    .configure(auth::routes::register_routes)
                    .configure(schools::register)
                    .configure(bowls::register)
                    .configure(games::routes::register)
                    .configure(results::register)
                    .configure(entries::routes::register)
                    .configure(playoff::routes::register)
                    .configure(standings::routes::register)
                    .configure(blog::register)
                    .configure(admin::register)
                    .service(health)
                    .service(settings),
            )
    })
    .bind(format!("{}:{}", Config::api_host(), Config::api_port()))?
    .run()
    .await
}
