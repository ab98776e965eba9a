use std::path::PathBuf;

use common::QuestionDef;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    #[serde(default)]
    pub allow_origins: Vec<String>,
    #[serde(default = "default_cors_max_age")]
    pub max_age: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allow_origins: Vec::new(),
            max_age: default_cors_max_age(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct DatabaseConfig {
    /// Store URL. Absent = run without the store; submissions go out by mail.
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    /// Admin password, compared in plaintext. Falls back to a built-in
    /// constant when unset.
    #[serde(default)]
    pub admin_password: Option<String>,
    pub jwt_secret: String,
}

/// SMTP relay settings for the mail sink.
#[derive(Debug, Deserialize, Clone)]
pub struct EmailConfig {
    pub smtp_host: String,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    pub sender: String,
    pub password: String,
    /// Confirmation recipient. Defaults to the sender.
    #[serde(default)]
    pub recipient: Option<String>,
}

/// Override layers for the form description and the extra questions.
#[derive(Debug, Deserialize, Clone)]
pub struct ContentConfig {
    /// Description override, consulted before the settings file.
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_settings_file")]
    pub settings_file: PathBuf,
    #[serde(default = "default_questions_file")]
    pub questions_file: PathBuf,
    /// Inline question override, consulted before the questions file.
    #[serde(default)]
    pub questions: Option<Vec<QuestionDef>>,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            description: None,
            settings_file: default_settings_file(),
            questions_file: default_questions_file(),
            questions: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub email: Option<EmailConfig>,
    #[serde(default)]
    pub content: ContentConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("auth.jwt_secret", "gridpool-dev-secret")?
            // Load from config/config.toml
            .add_source(File::with_name("config/config").required(false))
            // Override from environment (e.g., GRIDPOOL__AUTH__ADMIN_PASSWORD)
            .add_source(Environment::with_prefix("GRIDPOOL").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}

fn default_cors_max_age() -> u64 {
    3600
}

fn default_smtp_port() -> u16 {
    587
}

fn default_settings_file() -> PathBuf {
    PathBuf::from("app_settings.json")
}

fn default_questions_file() -> PathBuf {
    PathBuf::from("questions.json")
}
