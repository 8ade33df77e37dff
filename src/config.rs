use anyhow::{bail, Result};
use serde::Deserialize;
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_SEARCH_URL: &str = "https://api.reporter.nih.gov/v2/projects/search";

const DEV_EMAIL_TABLE_PATH: &str = "data/PI_Emails.xlsx";
const PROD_EMAIL_TABLE_PATH: &str = "/app/data/PI_Emails.xlsx";

const DEV_ALLOWED_ORIGINS: &str = "http://localhost:3000,http://localhost:5173";
const PROD_ALLOWED_ORIGINS: &str = "https://reporter-relay.onrender.com";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub reporter: ReporterConfig,
    pub email_table: EmailTableConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    /// Mode from an `APP_ENV` value. Anything unrecognised runs as production.
    pub fn from_env_value(value: &str) -> Self {
        value.parse().unwrap_or_else(|e| {
            warn!(error = %e, "Falling back to production mode");
            Environment::Production
        })
    }

    /// Spreadsheet location used when `EMAIL_TABLE_PATH` is not set.
    pub fn default_email_table_path(self) -> PathBuf {
        match self {
            Environment::Development => PathBuf::from(DEV_EMAIL_TABLE_PATH),
            Environment::Production => PathBuf::from(PROD_EMAIL_TABLE_PATH),
        }
    }

    /// Origins allowed to call the API when `ALLOWED_ORIGINS` is not set.
    pub fn default_allowed_origins(self) -> Vec<String> {
        let raw = match self {
            Environment::Development => DEV_ALLOWED_ORIGINS,
            Environment::Production => PROD_ALLOWED_ORIGINS,
        };
        parse_origins(raw)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Production => write!(f, "production"),
        }
    }
}

impl FromStr for Environment {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            other => bail!("Unknown APP_ENV value: {}", other),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    pub environment: Environment,
    pub cors_allowed_origins: Vec<String>,
    pub static_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReporterConfig {
    pub search_url: String,
    /// No timeout is applied to the upstream call unless this is set.
    pub timeout: Option<Duration>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmailTableConfig {
    pub path: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let environment = env::var("APP_ENV")
            .map(|value| Environment::from_env_value(&value))
            .unwrap_or(Environment::Production);

        let timeout = match env::var("REPORTER_TIMEOUT_SECS") {
            Ok(secs) => Some(Duration::from_secs(secs.parse()?)),
            Err(_) => None,
        };

        Ok(Self {
            server: ServerConfig {
                port: env::var("PORT")
                    .unwrap_or_else(|_| DEFAULT_PORT.to_string())
                    .parse()?,
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                environment,
                cors_allowed_origins: env::var("ALLOWED_ORIGINS")
                    .map(|raw| parse_origins(&raw))
                    .unwrap_or_else(|_| environment.default_allowed_origins()),
                static_dir: env::var("STATIC_DIR").ok().map(PathBuf::from),
            },
            reporter: ReporterConfig {
                search_url: env::var("REPORTER_SEARCH_URL")
                    .unwrap_or_else(|_| DEFAULT_SEARCH_URL.to_string()),
                timeout,
            },
            email_table: EmailTableConfig {
                path: env::var("EMAIL_TABLE_PATH")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| environment.default_email_table_path()),
            },
        })
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
