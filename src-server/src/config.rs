use std::{net::SocketAddr, time::Duration};

pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: String,
    pub click_secret: String,
    pub notify_url: Option<String>,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub seed_demo: bool,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let listen_addr: SocketAddr = std::env::var("RV_LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8080".to_string())
            .parse()
            .expect("Invalid RV_LISTEN_ADDR");
        let db_path =
            std::env::var("RV_DB_PATH").unwrap_or_else(|_| "./db/marketplace.db".into());
        let click_secret = std::env::var("RV_CLICK_SECRET")
            .unwrap_or_else(|_| "dev-click-secret-change-me".into());
        let notify_url = std::env::var("RV_NOTIFY_URL").ok().filter(|s| !s.is_empty());
        let cors_allow = std::env::var("RV_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|_| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_ms: u64 = std::env::var("RV_REQUEST_TIMEOUT_MS")
            .unwrap_or_else(|_| "30000".into())
            .parse()
            .unwrap_or(30000);
        let seed_demo = std::env::var("RV_SEED_DEMO")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        Self {
            listen_addr,
            db_path,
            click_secret,
            notify_url,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            seed_demo,
        }
    }
}
