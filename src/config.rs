use std::{fmt::Display, str::FromStr};

use anyhow::{anyhow, bail, Context};
use jsonwebtoken::Algorithm;
use tracing::info;

const DEFAULT_DATABASE_URL: &str = "sqlite://murmur.db?mode=rwc";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_API_VERSION: &str = "/api/v1";
const DEFAULT_TOKEN_MINUTES: i64 = 60;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: String,
    pub jwt_secret: String,
    pub jwt_algorithm: Algorithm,
    pub access_token_ttl: time::Duration,
    pub api_version: String,
    pub secure_cookies: bool,
}

impl Config {
    /// Reads the process environment, after loading `.env` if one exists.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| dotenv::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let jwt_secret = lookup("JWT_SECRET")
            .filter(|s| !s.is_empty())
            .ok_or(anyhow!("JWT_SECRET must be set"))?;

        let jwt_algorithm = parse_or(&lookup, "JWT_ALGORITHM", Algorithm::HS256)?;
        if !matches!(jwt_algorithm, Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512) {
            bail!("JWT_ALGORITHM must be one of HS256, HS384, HS512");
        }

        let minutes: i64 = parse_or(&lookup, "ACCESS_TOKEN_EXPIRE_MINUTES", DEFAULT_TOKEN_MINUTES)?;
        if minutes <= 0 {
            bail!("ACCESS_TOKEN_EXPIRE_MINUTES must be positive");
        }

        let mut api_version = lookup("API_VERSION").unwrap_or(DEFAULT_API_VERSION.to_string());
        if !api_version.starts_with('/') {
            api_version.insert(0, '/');
        }
        let api_version = api_version.trim_end_matches('/').to_string();
        if api_version.is_empty() {
            bail!("API_VERSION must name a path below the root, e.g. /api/v1");
        }

        Ok(Config {
            database_url: lookup("DATABASE_URL").unwrap_or(DEFAULT_DATABASE_URL.to_string()),
            bind_addr: lookup("BIND_ADDR").unwrap_or(DEFAULT_BIND_ADDR.to_string()),
            jwt_secret,
            jwt_algorithm,
            access_token_ttl: time::Duration::minutes(minutes),
            api_version,
            secure_cookies: parse_or(&lookup, "SECURE_COOKIES", false)?,
        })
    }

    /// Path under the api prefix, e.g. `api("/messages")`.
    pub fn api(&self, path: &str) -> String {
        format!("{}{path}", self.api_version)
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow!("{e}"))
            .with_context(|| format!("invalid {key} value {raw:?}")),
        None => {
            info!("{key} not set, using default");
            Ok(default)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply() {
        let config = Config::from_lookup(lookup(&[("JWT_SECRET", "s3cret")])).unwrap();
        assert_eq!(config.jwt_algorithm, Algorithm::HS256);
        assert_eq!(config.access_token_ttl, time::Duration::minutes(60));
        assert_eq!(config.api_version, "/api/v1");
        assert_eq!(config.api("/messages"), "/api/v1/messages");
        assert!(!config.secure_cookies);
    }

    #[test]
    fn secret_is_required() {
        assert!(Config::from_lookup(lookup(&[])).is_err());
    }

    #[test]
    fn rejects_asymmetric_algorithms_and_bad_ttl() {
        let with = |key: &'static str, value: &'static str| {
            Config::from_lookup(lookup(&[("JWT_SECRET", "x"), (key, value)]))
        };
        assert!(with("JWT_ALGORITHM", "RS256").is_err());
        assert!(with("ACCESS_TOKEN_EXPIRE_MINUTES", "0").is_err());
        assert!(with("ACCESS_TOKEN_EXPIRE_MINUTES", "soon").is_err());
    }

    #[test]
    fn api_prefix_is_normalised() {
        let config = lookup(&[("JWT_SECRET", "x"), ("API_VERSION", "api/v2/")]);
        let config = Config::from_lookup(config).unwrap();
        assert_eq!(config.api_version, "/api/v2");
    }

    #[test]
    fn api_prefix_cannot_be_the_root() {
        for root in ["/", "", "//"] {
            let config = Config::from_lookup(lookup(&[("JWT_SECRET", "x"), ("API_VERSION", root)]));
            assert!(config.is_err(), "{root:?}");
        }
    }
}
