//! Configuration management for Oruma server

use config::{builder::DefaultState, Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

/// Secret used when neither the config files nor `JWT_SECRET` provide one
pub const DEFAULT_JWT_SECRET: &str = "secret";

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// No default: the server refuses to start without a database URL.
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_expiration_days: i64,
}

impl AuthConfig {
    pub fn uses_default_secret(&self) -> bool {
        self.jwt_secret == DEFAULT_JWT_SECRET
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub logging: LoggingConfig,
}

/// Built-in defaults, overridden by the config files and the environment
fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 3000)?
        .set_default("database.max_connections", 10)?
        .set_default("database.min_connections", 1)?
        .set_default("auth.jwt_secret", DEFAULT_JWT_SECRET)?
        .set_default("auth.jwt_expiration_days", 30)?
        .set_default("logging.level", "info")?
        .set_default("logging.format", "pretty")
}

impl AppConfig {
    /// Load configuration from defaults, files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let config = defaults()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // ORUMA_SERVER__PORT, ORUMA_AUTH__JWT_EXPIRATION_DAYS, ...
            .add_source(
                Environment::with_prefix("ORUMA")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("server.port", env::var("PORT").ok())?
            .set_override_option("database.url", env::var("DATABASE_URL").ok())?
            .set_override_option("auth.jwt_secret", env::var("JWT_SECRET").ok())?
            .build()?;

        config.try_deserialize()
    }
}
