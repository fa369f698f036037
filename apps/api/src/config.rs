use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::parser::ruleset::Ruleset;

const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub static_dir: PathBuf,
    pub max_upload_bytes: usize,
    /// JSON file overriding the built-in keyword lists and patterns.
    pub ruleset_path: Option<PathBuf>,
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
            static_dir: std::env::var("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("static")),
            max_upload_bytes: match std::env::var("MAX_UPLOAD_BYTES") {
                Ok(v) => v
                    .parse::<usize>()
                    .context("MAX_UPLOAD_BYTES must be a byte count")?,
                Err(_) => DEFAULT_MAX_UPLOAD_BYTES,
            },
            ruleset_path: std::env::var("RULESET_PATH").ok().map(PathBuf::from),
        })
    }

    /// Built-in ruleset, or the one read from `ruleset_path`.
    pub fn load_ruleset(&self) -> Result<Ruleset> {
        let Some(path) = &self.ruleset_path else {
            return Ok(Ruleset::default());
        };
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read ruleset file '{}'", path.display()))?;
        Ruleset::from_json(&json)
            .with_context(|| format!("Invalid ruleset file '{}'", path.display()))
    }
}
