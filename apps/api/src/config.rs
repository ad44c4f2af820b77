use std::fmt::Display;
use std::str::FromStr;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub auth_jwt_secret: String,
    /// Absent means the AI endpoints answer 503 instead of calling out.
    pub anthropic_api_key: Option<String>,
    pub free_generations_limit: i32,
    pub db_max_connections: u32,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            auth_jwt_secret: require_env("AUTH_JWT_SECRET")?,
            anthropic_api_key: env_opt("ANTHROPIC_API_KEY"),
            free_generations_limit: parse_value(
                "FREE_GENERATIONS_LIMIT",
                env_opt("FREE_GENERATIONS_LIMIT"),
                3,
            )?,
            db_max_connections: parse_value(
                "DB_MAX_CONNECTIONS",
                env_opt("DB_MAX_CONNECTIONS"),
                10,
            )?,
            port: parse_value("PORT", env_opt("PORT"), 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Parses an optional variable, falling back to the default when unset.
fn parse_value<T>(key: &str, raw: Option<String>, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match raw {
        Some(value) => value
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("{key} is invalid: {e}")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_value_uses_default_when_unset() {
        assert_eq!(parse_value::<u32>("DB_MAX_CONNECTIONS", None, 10).unwrap(), 10);
    }

    #[test]
    fn test_parse_value_reads_the_variable() {
        let parsed = parse_value::<u16>("PORT", Some("9090".to_string()), 8080).unwrap();
        assert_eq!(parsed, 9090);
    }

    #[test]
    fn test_parse_value_rejects_garbage() {
        let err = parse_value::<u16>("PORT", Some("ninety".to_string()), 8080).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }
}
