use anyhow::{Context, Result};

/// Where resumes are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Storage {
    Postgres { database_url: String },
    /// Process-local; contents are lost on restart.
    Memory,
}

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub storage: Storage,
    pub anthropic_api_key: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let storage = match std::env::var("STORAGE").ok().as_deref() {
            Some("memory") => Storage::Memory,
            Some("postgres") | None => Storage::Postgres {
                database_url: require_env("DATABASE_URL")?,
            },
            Some(other) => anyhow::bail!("STORAGE must be 'postgres' or 'memory', got '{other}'"),
        };

        Ok(Config {
            storage,
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
