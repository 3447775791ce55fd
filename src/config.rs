use std::env;
use std::error::Error;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

const HOST: &str = "0.0.0.0";
const PORT: u16 = 8080;
const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const COMPLETION_MODEL: &str = "gpt-3.5-turbo-instruct";
const EMBEDDING_MODEL: &str = "text-embedding-3-small";
const AIRPORTS_CSV: &str = "data/airports.csv";
const SEARCH_BASE_URL: &str = "https://www.google.com/search";
const UPSTREAM_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, PartialEq)]
pub enum ConfigError {
    MissingVar(String),
    InvalidVar { name: String, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingVar(name) => write!(f, "{} must be set", name),
            ConfigError::InvalidVar { name, value } => {
                write!(f, "{} has an invalid value: '{}'", name, value)
            }
        }
    }
}

impl Error for ConfigError {}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub completion_model: String,
    pub embedding_model: String,
    pub airports_csv: PathBuf,
    pub search_base_url: String,
    pub upstream_timeout: Duration,
}

impl AppConfig {
    /// Reads the service configuration from the process environment.
    ///
    /// Only `OPENAI_API_KEY` is required; everything else falls back to a default.
    pub fn from_env() -> Result<Self, ConfigError> {
        let openai_api_key = env::var("OPENAI_API_KEY")
            .map_err(|_| ConfigError::MissingVar("OPENAI_API_KEY".to_string()))?;

        let port = parse_var("PORT", PORT)?;
        let timeout_secs = parse_var("UPSTREAM_TIMEOUT_SECS", UPSTREAM_TIMEOUT_SECS)?;

        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| HOST.to_string()),
            port,
            openai_api_key,
            openai_base_url: env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| OPENAI_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            completion_model: env::var("COMPLETION_MODEL")
                .unwrap_or_else(|_| COMPLETION_MODEL.to_string()),
            embedding_model: env::var("EMBEDDING_MODEL")
                .unwrap_or_else(|_| EMBEDDING_MODEL.to_string()),
            airports_csv: env::var("AIRPORTS_CSV")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(AIRPORTS_CSV)),
            search_base_url: env::var("SEARCH_BASE_URL")
                .unwrap_or_else(|_| SEARCH_BASE_URL.to_string()),
            upstream_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value.trim().parse().map_err(|_| ConfigError::InvalidVar {
            name: name.to_string(),
            value,
        }),
        Err(_) => Ok(default),
    }
}
