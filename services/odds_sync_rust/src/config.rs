use std::env;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub odds_api_key: String,
    pub bookmakers: Vec<String>,
    pub sync_interval_secs: u64,
    pub window_back_days: i64,
    pub window_ahead_days: i64,
    pub run_once: bool,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            odds_api_key: env::var("ODDS_API_KEY").unwrap_or_default(),
            bookmakers: env::var("SYNC_BOOKMAKERS")
                .unwrap_or_else(|_| "pinnacle,bet365,unibet".to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            sync_interval_secs: env::var("SYNC_INTERVAL_SECS")
                .unwrap_or_else(|_| "900".to_string())
                .parse()
                .unwrap(),
            window_back_days: env::var("SYNC_WINDOW_BACK_DAYS")
                .unwrap_or_else(|_| "3".to_string())
                .parse()
                .unwrap(),
            window_ahead_days: env::var("SYNC_WINDOW_AHEAD_DAYS")
                .unwrap_or_else(|_| "14".to_string())
                .parse()
                .unwrap(),
            run_once: env::var("SYNC_RUN_ONCE")
                .map(|v| v == "1" || v.to_lowercase() == "true")
                .unwrap_or(false),
        }
    }
}
