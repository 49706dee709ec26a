/*
 * Responsibility
 * - 環境変数の読み込み (PORT, APP_ENV, REQUEST_TIMEOUT_SECS, JWT_* など)
 * - 設定値のバリデーション (不足なら起動失敗)
 * - AuthSettings の組み立て
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use jsonwebtoken::Algorithm;

use crate::middleware::http::DEFAULT_REQUEST_TIMEOUT;
use crate::services::auth::{AuthSettings, DecodeOptions, KeyMaterial};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(value: Option<String>) -> Self {
        match value
            .unwrap_or_else(|| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,
    pub request_timeout: Duration,
    pub auth: AuthSettings,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env`, reading values through `lookup` instead of the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = match lookup("PORT") {
            Some(v) => v.parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => 3000,
        };

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::parse(lookup("APP_ENV"));

        let request_timeout = match lookup("REQUEST_TIMEOUT_SECS") {
            Some(v) => match v.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => return Err(ConfigError::Invalid("REQUEST_TIMEOUT_SECS")),
            },
            None => DEFAULT_REQUEST_TIMEOUT,
        };

        let key = match (lookup("JWT_SECRET"), lookup("JWT_PUBLIC_KEY_PEM")) {
            (Some(_), Some(_)) => return Err(ConfigError::Invalid("JWT_SECRET")),
            (Some(secret), None) => KeyMaterial::secret(secret),
            (None, Some(pem)) => KeyMaterial::pem(pem.replace("\\n", "\n")),
            (None, None) => return Err(ConfigError::Missing("JWT_SECRET")),
        };

        let mut auth = AuthSettings::new(key);

        if let Some(v) = lookup("JWT_ALGORITHM") {
            let algorithm =
                Algorithm::from_str(&v).map_err(|_| ConfigError::Invalid("JWT_ALGORITHM"))?;
            auth = auth.with_algorithm(algorithm);
        }
        if let Some(v) = lookup("JWT_PREFIX") {
            auth = auth.with_prefix(v);
        }
        if let Some(v) = lookup("JWT_USERNAME_FIELD") {
            auth = auth.with_username_field(v);
        }
        if let Some(v) = lookup("JWT_AUDIENCE") {
            auth = auth.with_audience(non_empty_list(&v, "JWT_AUDIENCE")?);
        }
        if let Some(v) = lookup("JWT_ISSUER") {
            auth = auth.with_issuer(non_empty_list(&v, "JWT_ISSUER")?);
        }
        if let Some(v) = lookup("JWT_QUERY_PARAM") {
            auth = auth.with_query_param(v);
        }

        let leeway = match lookup("JWT_LEEWAY_SECONDS") {
            Some(v) => v
                .parse::<u64>()
                .map_err(|_| ConfigError::Invalid("JWT_LEEWAY_SECONDS"))?,
            None => 0,
        };
        let require = lookup("JWT_REQUIRE_CLAIMS")
            .map(|v| split_list(&v))
            .unwrap_or_default();

        let auth = auth.with_options(DecodeOptions {
            leeway,
            require,
            ..DecodeOptions::default()
        });

        Ok(Self {
            addr,
            app_env,
            request_timeout,
            auth,
        })
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn non_empty_list(value: &str, key: &'static str) -> Result<Vec<String>, ConfigError> {
    let list = split_list(value);
    if list.is_empty() {
        return Err(ConfigError::Invalid(key));
    }
    Ok(list)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_with_secret() {
        let config = load(&[("JWT_SECRET", "example")]).unwrap();

        assert_eq!(config.addr.port(), 3000);
        assert_eq!(config.app_env, AppEnv::Development);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.auth.algorithm(), Algorithm::HS256);
        assert_eq!(config.auth.prefix(), "JWT");
        assert_eq!(config.auth.username_field(), "username");
        assert_eq!(config.auth.query_param(), "jwt");
        assert_eq!(config.auth.options(), &DecodeOptions::default());
    }

    #[test]
    fn key_is_required_and_exclusive() {
        assert_eq!(load(&[]).err(), Some(ConfigError::Missing("JWT_SECRET")));
        assert_eq!(
            load(&[("JWT_SECRET", "a"), ("JWT_PUBLIC_KEY_PEM", "b")]).err(),
            Some(ConfigError::Invalid("JWT_SECRET"))
        );
    }

    #[test]
    fn pem_newline_escapes_are_expanded() {
        let config = load(&[
            ("JWT_PUBLIC_KEY_PEM", "-----BEGIN PUBLIC KEY-----\\nabc"),
            ("JWT_ALGORITHM", "RS256"),
        ])
        .unwrap();

        match config.auth.key() {
            KeyMaterial::Pem(pem) => assert_eq!(pem, "-----BEGIN PUBLIC KEY-----\nabc"),
            other => panic!("unexpected key {other:?}"),
        }
        assert_eq!(config.auth.algorithm(), Algorithm::RS256);
    }

    #[test]
    fn overrides() {
        let config = load(&[
            ("JWT_SECRET", "example"),
            ("PORT", "8080"),
            ("APP_ENV", "Prod"),
            ("REQUEST_TIMEOUT_SECS", "5"),
            ("JWT_PREFIX", "Bearer"),
            ("JWT_USERNAME_FIELD", "sub"),
            ("JWT_AUDIENCE", "api, web,"),
            ("JWT_ISSUER", "https://issuer"),
            ("JWT_QUERY_PARAM", "token"),
            ("JWT_LEEWAY_SECONDS", "30"),
            ("JWT_REQUIRE_CLAIMS", "exp,sub"),
        ])
        .unwrap();

        assert_eq!(config.addr.port(), 8080);
        assert!(config.app_env.is_production());
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.auth.prefix(), "Bearer");
        assert_eq!(config.auth.username_field(), "sub");
        assert_eq!(
            config.auth.audience(),
            Some(&["api".to_string(), "web".to_string()][..])
        );
        assert_eq!(config.auth.issuer(), Some(&["https://issuer".to_string()][..]));
        assert_eq!(config.auth.query_param(), "token");
        assert_eq!(config.auth.options().leeway, 30);
        assert_eq!(config.auth.options().require, ["exp", "sub"]);
    }

    #[test]
    fn invalid_values_are_reported() {
        assert_eq!(
            load(&[("JWT_SECRET", "x"), ("JWT_ALGORITHM", "HS999")]).err(),
            Some(ConfigError::Invalid("JWT_ALGORITHM"))
        );
        assert_eq!(
            load(&[("JWT_SECRET", "x"), ("PORT", "http")]).err(),
            Some(ConfigError::Invalid("PORT"))
        );
        assert_eq!(
            load(&[("JWT_SECRET", "x"), ("JWT_LEEWAY_SECONDS", "-1")]).err(),
            Some(ConfigError::Invalid("JWT_LEEWAY_SECONDS"))
        );
        assert_eq!(
            load(&[("JWT_SECRET", "x"), ("REQUEST_TIMEOUT_SECS", "0")]).err(),
            Some(ConfigError::Invalid("REQUEST_TIMEOUT_SECS"))
        );
        assert_eq!(
            load(&[("JWT_SECRET", "x"), ("JWT_AUDIENCE", " , ")]).err(),
            Some(ConfigError::Invalid("JWT_AUDIENCE"))
        );
        assert_eq!(
            load(&[("JWT_SECRET", "x"), ("JWT_ISSUER", "")]).err(),
            Some(ConfigError::Invalid("JWT_ISSUER"))
        );
    }
}
