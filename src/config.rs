use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use validator::Validate;

use crate::rules::BonusGameList;

#[derive(Deserialize, Debug, Validate)]
pub struct Config {
    database_url: String,
    api_host: Option<String>,
    api_port: Option<usize>,
    #[validate(length(min = 32))]
    session_private_key: String,
    redis_url: Option<String>,
    sentry_dsn: Option<String>,
    /// origin of the SPA that consumes this api
    cors_origin: Option<String>,
    /// the contest year new entries and standings default to,
    /// admins can move it forward at runtime without a restart
    #[serde(default = "default_contest_year")]
    contest_year: AtomicU64,
    #[serde(default = "default_submissions_open")]
    submissions_open: AtomicBool,
    /// comma separated bowl names that are eligible for the 10 point bonus
    #[serde(default = "default_bonus_bowls")]
    bonus_bowls: String,
    /// defaults to localhost, which shouldn't cause issues if you're using udp
    opentelemetry_endpoint: Option<String>,
}

fn default_contest_year() -> AtomicU64 {
    AtomicU64::new(2025)
}

fn default_submissions_open() -> AtomicBool {
    AtomicBool::new(true)
}

fn default_bonus_bowls() -> String {
    String::from("Fenway,Pinstripe,New Mexico,Pop-Tarts,Arizona,Military,Alamo,Independence")
}

lazy_static! {
    static ref CONFIG: Config = match envy::from_env::<Config>() {
        Ok(config) => {
            match config.validate() {
                Ok(()) => config,
                Err(e) => panic!("invalid environment variable: {}", e),
            }
        }
        Err(error) => panic!("Missing or incorrect environment variable: {}", error),
    };
}

impl Config {
    pub fn database_url() -> &'static str {
        CONFIG.database_url.as_ref()
    }

    pub fn api_host() -> &'static str {
        match &CONFIG.api_host {
            Some(host) => host.as_ref(),
            None => "localhost",
        }
    }

    pub fn api_port() -> usize {
        CONFIG.api_port.unwrap_or(8080)
    }

    pub fn session_private_key() -> &'static str {
        CONFIG.session_private_key.as_ref()
    }

    pub fn redis_url() -> Option<&'static str> {
        CONFIG.redis_url.as_ref().map(|url| url.as_ref())
    }

    pub fn sentry_dsn() -> Option<&'static str> {
        CONFIG.sentry_dsn.as_ref().map(|dsn| dsn.as_ref())
    }

    pub fn cors_origin() -> &'static str {
        match &CONFIG.cors_origin {
            Some(origin) => origin.as_ref(),
            None => "http://localhost:4200",
        }
    }

    pub fn contest_year() -> i32 {
        CONFIG.contest_year.load(Ordering::SeqCst) as i32
    }

    pub fn set_contest_year(year: i32) {
        CONFIG.contest_year.store(year as u64, Ordering::SeqCst)
    }

    pub fn submissions_open() -> bool {
        CONFIG.submissions_open.load(Ordering::SeqCst)
    }

    pub fn set_submissions_open(open: bool) {
        CONFIG.submissions_open.store(open, Ordering::SeqCst)
    }

    pub fn bonus_games() -> BonusGameList {
        BonusGameList::new(CONFIG.bonus_bowls.split(','))
    }

    pub fn opentelemetry_endpoint() -> &'static str {
        match &CONFIG.opentelemetry_endpoint {
            Some(endpoint) => endpoint.as_ref(),
            None => "127.0.0.1:6831",
        }
    }
}
