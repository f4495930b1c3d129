use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    pub allow_origins: Vec<String>,
    pub max_age: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AdminConfig {
    /// Shared secret accepted by the admin endpoints.
    pub token: String,
}

/// Settings for the external generative-text service used as the judge.
#[derive(Debug, Deserialize, Clone)]
pub struct JudgeConfig {
    /// API key sent in the query string. Required.
    pub api_key: String,
    #[serde(default = "default_judge_model")]
    pub model: String,
    #[serde(default = "default_judge_base_url")]
    pub base_url: String,
    /// Per-request timeout. Default: 45 seconds.
    #[serde(default = "default_judge_timeout_secs")]
    pub timeout_secs: u64,
    /// Total attempts per judge call. Default: 3.
    #[serde(default = "default_judge_max_attempts")]
    pub max_attempts: u32,
    /// Backoff time unit; attempt k waits `2^(k-2)` units. Default: 1000 ms.
    #[serde(default = "default_judge_backoff_unit_ms")]
    pub backoff_unit_ms: u64,
}

fn default_judge_model() -> String {
    "gemini-2.5-flash".into()
}
fn default_judge_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".into()
}
fn default_judge_timeout_secs() -> u64 {
    45
}
fn default_judge_max_attempts() -> u32 {
    3
}
fn default_judge_backoff_unit_ms() -> u64 {
    1000
}

/// Third-party problem catalog endpoints.
#[derive(Debug, Deserialize, Clone)]
pub struct CatalogConfig {
    #[serde(default = "default_catalog_list_url")]
    pub list_url: String,
    #[serde(default = "default_catalog_graphql_url")]
    pub graphql_url: String,
}

fn default_catalog_list_url() -> String {
    "https://leetcode.com/api/problems/all/".into()
}
fn default_catalog_graphql_url() -> String {
    "https://leetcode.com/graphql".into()
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            list_url: default_catalog_list_url(),
            graphql_url: default_catalog_graphql_url(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SubmissionConfig {
    /// Maximum code size in bytes. Default: 64 KiB.
    #[serde(default = "default_max_code_size")]
    pub max_code_size: usize,
    /// Length of the recent-submissions list in account stats. Default: 20.
    #[serde(default = "default_recent_limit")]
    pub recent_limit: u64,
    /// Verdicts counted as a solved problem.
    #[serde(default = "default_solved_verdicts")]
    pub solved_verdicts: Vec<String>,
}

fn default_max_code_size() -> usize {
    64 * 1024
}
fn default_recent_limit() -> u64 {
    20
}
fn default_solved_verdicts() -> Vec<String> {
    vec!["Accepted".into(), "Passed".into()]
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            max_code_size: default_max_code_size(),
            recent_limit: default_recent_limit(),
            solved_verdicts: default_solved_verdicts(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct LogConfig {
    /// `pretty` (default) or `json`.
    #[serde(default)]
    pub format: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub admin: AdminConfig,
    pub judge: JudgeConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub submission: SubmissionConfig,
    #[serde(default)]
    pub log: LogConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("server.cors.allow_origins", vec!["*"])?
            .set_default("server.cors.max_age", 3600)?
            .set_default("database.url", "sqlite://uzcode.db?mode=rwc")?
            // Load from config/config.toml
            .add_source(File::with_name("config/config").required(false))
            // Override from environment (e.g., UZCODE__JUDGE__API_KEY)
            .add_source(
                Environment::with_prefix("UZCODE")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("server.cors.allow_origins")
                    .with_list_parse_key("submission.solved_verdicts")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = s.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that would only fail later, at request time.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("judge.api_key", &self.judge.api_key),
            ("auth.jwt_secret", &self.auth.jwt_secret),
            ("admin.token", &self.admin.token),
        ];
        for (key, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::Message(format!("{key} must not be empty")));
            }
        }
        if self.judge.max_attempts == 0 {
            return Err(ConfigError::Message(
                "judge.max_attempts must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
