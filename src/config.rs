use std::{env, time::Duration};

use secrecy::SecretString;

pub const DEFAULT_API_URL: &str = "https://learinng-hub-backend.vercel.app";
pub const DEFAULT_SESSION_TTL_SECS: u64 = 30 * 60;

#[derive(Clone, Debug)]
pub struct Config {
    pub api_url: String,
    pub api_token: Option<SecretString>,
    pub api_timeout_secs: u64,
    pub rng_seed: Option<u64>,
    pub session_ttl_secs: u64,
    pub web_server_host: String,
    pub web_server_port: u16,
    pub cors_allowed_origin: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            api_url: env::var("QUIZ_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            api_token: env::var("QUIZ_API_TOKEN")
                .ok()
                .filter(|t| !t.trim().is_empty())
                .map(SecretString::from),
            api_timeout_secs: env::var("QUIZ_API_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
            rng_seed: env::var("QUIZ_RNG_SEED").ok().and_then(|s| s.parse().ok()),
            session_ttl_secs: env::var("QUIZ_SESSION_TTL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_SESSION_TTL_SECS),
            web_server_host: env::var("WEB_SERVER_HOST")
                .unwrap_or_else(|_| "localhost".to_string()),
            web_server_port: env::var("WEB_SERVER_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            cors_allowed_origin: env::var("CORS_ALLOWED_ORIGIN")
                .ok()
                .filter(|o| !o.trim().is_empty()),
        }
    }

    pub fn api_timeout(&self) -> Duration {
        Duration::from_secs(self.api_timeout_secs)
    }

    /// How long a quiz session may sit untouched before it is dropped.
    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            api_url: "http://127.0.0.1:9".to_string(),
            api_token: None,
            api_timeout_secs: 1,
            rng_seed: Some(7),
            session_ttl_secs: 60,
            web_server_host: "127.0.0.1".to_string(),
            web_server_port: 8080,
            cors_allowed_origin: None,
        }
    }
}
