use crate::errors::ConfigError;
use std::{env, path::PathBuf};
use tracing::warn;

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_SQLITE_PATH: &str = "fitness_local.db";
const DEV_SECRET_KEY: &str = "dev-secret-key-change-me";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreConfig {
    Sqlite {
        path: PathBuf,
    },
    MySql {
        host: String,
        user: String,
        password: String,
        database: String,
    },
}

/// Process-wide settings, read once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub port: u16,
    pub store: StoreConfig,
    pub secret_key: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };

        let store = if lookup("LOCAL_DEV").as_deref() == Some("1") {
            StoreConfig::Sqlite {
                path: lookup("SQLITE_PATH")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_SQLITE_PATH)),
            }
        } else {
            mysql_config(&lookup)?
        };

        let secret_key = match lookup("SECRET_KEY").filter(|key| !key.is_empty()) {
            Some(key) => key,
            None => {
                warn!("SECRET_KEY not set, using the development key");
                DEV_SECRET_KEY.to_string()
            }
        };

        Ok(Self {
            port,
            store,
            secret_key,
        })
    }
}

fn mysql_config(lookup: &impl Fn(&str) -> Option<String>) -> Result<StoreConfig, ConfigError> {
    let mut missing = Vec::new();
    let mut required = |key: &'static str| match lookup(key).filter(|value| !value.is_empty()) {
        Some(value) => value,
        None => {
            missing.push(key);
            String::new()
        }
    };

    let host = required("DB_HOST");
    let user = required("DB_USER");
    let password = required("DB_PASSWORD");
    let database = required("DB_NAME");

    if !missing.is_empty() {
        return Err(ConfigError::MissingDbValues(missing));
    }

    Ok(StoreConfig::MySql {
        host,
        user,
        password,
        database,
    })
}
