//! Handles settings for the application. Configuration is written in
//! `settings.toml`.
//!
//! See `settings.toml` at the repository root for a commented example.
use config::{Config, ConfigError, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct App {
    /// Log level filter for the application crates (e.g. "info").
    pub level: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

#[derive(Debug, Deserialize)]
pub struct Seed {
    pub users: Option<String>,
    pub pharmacies: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub bind: Option<String>,
    pub port: u16,
    pub database: Database,
    /// Deadline for one purchase transaction, in milliseconds.
    pub purchase_timeout_ms: Option<u64>,
    pub seed: Option<Seed>,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: App,
    pub server: Server,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("settings"))
            .build()?;

        settings.try_deserialize()
    }
}
