//! Configuration management

use config::{Config, ConfigBuilder, ConfigError, Environment, File, FileFormat};
use config::builder::DefaultState;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub app: AppSettings,
    pub storage: StorageSettings,
    pub database: DatabaseSettings,
    pub audit: AuditSettings,
    pub auth: AuthSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppSettings {
    pub env: String,
    pub host: String,
    pub port: u16,
    pub name: String,
    pub log_json: bool,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    Postgres,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageSettings {
    pub backend: StorageBackend,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseSettings {
    pub url: Option<String>,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AuditSink {
    Tracing,
    Database,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuditSettings {
    pub sink: AuditSink,
    pub queue_capacity: usize,
    pub batch_size: usize,
    pub batch_timeout_ms: u64,
    pub worker_count: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthSettings {
    /// When false every mutating request is admitted.
    pub enabled: bool,
    pub jwt_secret: Option<String>,
}

impl AppConfig {
    /// Layered load: defaults, `config/default`, `config/<APP_ENV>`, then `APP__*` variables.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        Self::defaults()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Defaults overlaid with a TOML document; no files or environment are read.
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        Self::defaults()?
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("app.env", "development")?
            .set_default("app.host", "127.0.0.1")?
            .set_default("app.port", 8080)?
            .set_default("app.name", "campus-server")?
            .set_default("app.log_json", true)?
            .set_default("storage.backend", "memory")?
            .set_default("database.max_connections", 10)?
            .set_default("database.acquire_timeout_secs", 3)?
            .set_default("audit.sink", "tracing")?
            .set_default("audit.queue_capacity", 10_000)?
            .set_default("audit.batch_size", 100)?
            .set_default("audit.batch_timeout_ms", 1000)?
            .set_default("audit.worker_count", 2)?
            .set_default("auth.enabled", false)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.app.host, self.app.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_select_memory_store() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.audit.sink, AuditSink::Tracing);
        assert!(!config.auth.enabled);
        assert!(config.database.url.is_none());
        assert_eq!(config.bind_address(), "127.0.0.1:8080");
    }

    #[test]
    fn test_toml_overrides_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [app]
            port = 9000

            [storage]
            backend = "postgres"

            [database]
            url = "postgres://campus@localhost/campus"

            [auth]
            enabled = true
            jwt_secret = "s3cret"
            "#,
        )
        .unwrap();

        assert_eq!(config.app.port, 9000);
        assert_eq!(config.storage.backend, StorageBackend::Postgres);
        assert_eq!(
            config.database.url.as_deref(),
            Some("postgres://campus@localhost/campus")
        );
        assert!(config.auth.enabled);
        assert_eq!(config.auth.jwt_secret.as_deref(), Some("s3cret"));
    }

    #[test]
    fn test_unknown_backend_is_rejected() {
        let result = AppConfig::from_toml(
            r#"
            [storage]
            backend = "mongodb"
            "#,
        );
        assert!(result.is_err());
    }
}
