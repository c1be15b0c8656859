//!
#![warn(missing_debug_implementations, rust_2018_idioms)]

#[macro_use]
extern crate diesel;

#[macro_use]
extern crate diesel_migrations;

#[macro_use]
extern crate lazy_static;

#[macro_use]
extern crate log;

#[macro_use]
extern crate serde_derive;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::prelude::*;

use anyhow::Error;
use dotenv::dotenv;

#[macro_use]
mod macros;

mod admin;
mod auth;
mod blog;
mod bowls;
mod config;
mod db;
mod entries;
mod errors;
mod games;
mod metrics;
mod playoff;
mod results;
mod rules;
mod schema;
mod schools;
mod server;
mod standings;
mod stats;
mod users;
mod validator;

#[actix_web::main]
async fn main() -> anyhow::Result<(), Error> {
    init().await?;

    Ok(())
}

async fn init() -> anyhow::Result<(), Error> {
    dotenv().ok();

    let _sentry_guard = config::Config::sentry_dsn().map(sentry::init);

    let (tracer, _uninstall) = opentelemetry_jaeger::new_pipeline()
        .with_service_name("bowl-pickem")
        .with_agent_endpoint(config::Config::opentelemetry_endpoint())
        .install()
        .expect("unable to connect to opentelemetry agent");

    // Create a tracing layer with the configured tracer
    let opentelemetry = tracing_opentelemetry::layer().with_tracer(tracer);

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(opentelemetry)
        .try_init()
        .expect("unable to initialize the tokio tracer");

    if let Some(redis_url) = config::Config::redis_url() {
        if let Err(err) = pickem_cache::Cache::init(redis_url.to_string()).await {
            error!("unable to initialize the cache: {}", err);
        }
    }

    db::migrate(config::Config::database_url())?;
    let pool = db::build_connection_pool(config::Config::database_url())?;

    debug!("launching the actix webserver");
    server::launch(pool).await?;

    Ok(())
}
