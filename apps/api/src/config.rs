use anyhow::{Context, Result};

pub const DEFAULT_MAX_RESUME_CHARS: usize = 100_000;

/// Application configuration loaded from environment variables.
/// Every variable is optional; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Upper bound on `resume_text` accepted by the HTTP handlers.
    pub max_resume_chars: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            rust_log: "info".to_string(),
            max_resume_chars: DEFAULT_MAX_RESUME_CHARS,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            max_resume_chars: match std::env::var("MAX_RESUME_CHARS") {
                Ok(raw) => raw
                    .parse::<usize>()
                    .with_context(|| format!("MAX_RESUME_CHARS must be a positive integer, got '{raw}'"))?,
                Err(_) => DEFAULT_MAX_RESUME_CHARS,
            },
        })
    }
}
