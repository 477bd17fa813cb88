use std::env::{self, VarError};
use std::path::PathBuf;

use crate::error::ConfigError;

const CATALOG_PATH_VAR: &str = "QUIZ_CATALOG_PATH";
const SESSION_DB_VAR: &str = "SESSION_DB_PATH";

const DEFAULT_CATALOG_PATH: &str = "quizzes.json";
const DEFAULT_SESSION_DB: &str = "db.sqlite";

#[derive(Debug, Clone)]
pub struct Config {
    pub catalog_path: PathBuf,
    pub session_db_path: String,
}

impl Config {
    /// Reads the process environment; `main` loads `.env` into it first.
    /// `TELOXIDE_TOKEN` is left to `Bot::from_env`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let catalog_path = var_or(CATALOG_PATH_VAR, DEFAULT_CATALOG_PATH)?;
        let session_db_path = var_or(SESSION_DB_VAR, DEFAULT_SESSION_DB)?;

        Ok(Self {
            catalog_path: PathBuf::from(catalog_path),
            session_db_path,
        })
    }
}

fn var_or(name: &'static str, default: &str) -> Result<String, ConfigError> {
    parse_var(name, env::var(name), default)
}

fn parse_var(
    name: &'static str,
    value: Result<String, VarError>,
    default: &str,
) -> Result<String, ConfigError> {
    match value {
        Ok(value) if value.trim().is_empty() => Err(ConfigError::Empty(name)),
        Ok(value) => Ok(value),
        Err(VarError::NotPresent) => Ok(default.to_string()),
        Err(VarError::NotUnicode(_)) => Err(ConfigError::NotUnicode(name)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_variable_falls_back_to_default() {
        let value = parse_var(CATALOG_PATH_VAR, Err(VarError::NotPresent), DEFAULT_CATALOG_PATH);
        assert_eq!(value.unwrap(), "quizzes.json");
    }

    #[test]
    fn blank_variable_is_rejected() {
        let value = parse_var(SESSION_DB_VAR, Ok("   ".to_string()), DEFAULT_SESSION_DB);
        assert!(matches!(value, Err(ConfigError::Empty(SESSION_DB_VAR))));
    }

    #[test]
    fn explicit_value_wins() {
        let value = parse_var(SESSION_DB_VAR, Ok("/var/lib/bot.sqlite".to_string()), DEFAULT_SESSION_DB);
        assert_eq!(value.unwrap(), "/var/lib/bot.sqlite");
    }
}
