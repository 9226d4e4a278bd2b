use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub log_dir: String,
    pub log_file: String,
    pub use_json: bool,
    pub rotation: String,
    /// Send internal error text to clients (development only)
    #[serde(default)]
    pub expose_internal_errors: bool,
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageKind,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    #[default]
    Postgres,
    /// In-process store, lost on restart
    Memory,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: 10,
            acquire_timeout_secs: 5,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AuthConfig {
    #[serde(default)]
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    /// Mount `POST /auth/create-admin`
    #[serde(default)]
    pub allow_admin_bootstrap: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            token_ttl_hours: 24,
            allow_admin_bootstrap: false,
        }
    }
}

impl AppConfig {
    /// Read `config/<env>.yaml`, apply environment overrides and validate.
    pub fn load(env: &str) -> Result<Self> {
        let config = Self::read(env)?;
        config.validate()?;
        Ok(config)
    }

    /// Like [`load`](Self::load) without validation, for tools that need
    /// only part of the configuration.
    pub fn read(env: &str) -> Result<Self> {
        let config_path = format!("config/{}.yaml", env);
        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path))?;
        let mut config = Self::from_yaml(&content)?;
        config.apply_env(|key| std::env::var(key).ok().filter(|v| !v.is_empty()));
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).context("Failed to parse config yaml")
    }

    /// `DATABASE_URL` wins over the `DB_*` parts.
    pub fn apply_env<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = var("DATABASE_URL") {
            self.database.url = url;
        } else if let Some(host) = var("DB_HOST") {
            let user = var("DB_USER").unwrap_or_else(|| "postgres".to_string());
            let password = var("DB_PASSWORD").unwrap_or_default();
            let port = var("DB_PORT").unwrap_or_else(|| "5432".to_string());
            let name = var("DB_NAME").unwrap_or_else(|| "qa_platform".to_string());
            let credentials = if password.is_empty() {
                user
            } else {
                format!("{}:{}", user, password)
            };
            self.database.url = format!("postgres://{}@{}:{}/{}", credentials, host, port, name);
        }

        if let Some(secret) = var("JWT_SECRET") {
            self.auth.jwt_secret = secret;
        }
        if let Some(port) = var("PORT").and_then(|p| p.parse().ok()) {
            self.server.port = port;
        }
    }

    /// No production-safe defaults exist for secrets or the database.
    pub fn validate(&self) -> Result<()> {
        if self.auth.jwt_secret.trim().is_empty() {
            bail!("auth.jwt_secret is empty; set it in the config file or JWT_SECRET");
        }
        if self.auth.token_ttl_hours <= 0 {
            bail!("auth.token_ttl_hours must be positive");
        }
        if self.storage == StorageKind::Postgres && self.database.url.trim().is_empty() {
            bail!("database.url is empty; set it, DATABASE_URL or DB_HOST/DB_USER/DB_PASSWORD/DB_NAME");
        }
        Ok(())
    }
}
