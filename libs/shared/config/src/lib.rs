use std::env;
use std::str::FromStr;
use tracing::warn;

pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;
pub const MAX_TOKEN_TTL_HOURS: i64 = 24 * 366;
pub const DEFAULT_IDENTITY_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub service_name: String,
    pub bind_address: String,
    pub database_url: String,
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub identity_service_url: String,
    pub identity_timeout_secs: u64,
}

impl AppConfig {
    /// Configuration for the Identity Service process.
    pub fn identity_from_env() -> Self {
        let config = Self::from_env(
            "identity-service",
            "0.0.0.0:5001",
            "sqlite://odontocare_identity.db",
        );

        if config.jwt_secret.is_empty() {
            warn!("JWT_SECRET not set - credentials cannot be issued");
        }

        config
    }

    /// Configuration for the Scheduling Service process.
    pub fn scheduling_from_env() -> Self {
        let config = Self::from_env(
            "scheduling-service",
            "0.0.0.0:5002",
            "sqlite://odontocare_scheduling.db",
        );

        if config.identity_service_url.is_empty() {
            warn!("IDENTITY_SERVICE_URL is empty - appointment creation will fail");
        }

        config
    }

    fn from_env(service_name: &str, default_bind: &str, default_database: &str) -> Self {
        let config = Self {
            service_name: service_name.to_string(),
            bind_address: env::var("BIND_ADDRESS")
                .unwrap_or_else(|_| {
                    warn!("BIND_ADDRESS not set, using default {}", default_bind);
                    default_bind.to_string()
                }),
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| {
                    warn!("DATABASE_URL not set, using default {}", default_database);
                    default_database.to_string()
                }),
            jwt_secret: env::var("JWT_SECRET")
                .unwrap_or_else(|_| {
                    warn!("JWT_SECRET not set, using empty value");
                    String::new()
                }),
            token_ttl_hours: token_ttl_from(env::var("TOKEN_TTL_HOURS").ok().as_deref()),
            identity_service_url: env::var("IDENTITY_SERVICE_URL")
                .unwrap_or_else(|_| {
                    warn!("IDENTITY_SERVICE_URL not set, using default");
                    "http://localhost:5001".to_string()
                }),
            identity_timeout_secs: parse_or_default(
                "IDENTITY_TIMEOUT_SECS",
                DEFAULT_IDENTITY_TIMEOUT_SECS,
            ),
        };

        if !config.is_configured() {
            warn!("{} not fully configured - missing environment variables", service_name);
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.database_url.is_empty()
            && !self.jwt_secret.is_empty()
            && self.token_ttl_hours > 0
    }

    /// Identity base URL without a trailing slash, ready for path joins.
    pub fn identity_base_url(&self) -> &str {
        self.identity_service_url.trim_end_matches('/')
    }
}

fn parse_or_default<T>(key: &str, default: T) -> T
where
    T: FromStr + Copy + std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("{} has invalid value {:?}, using default {}", key, raw, default);
            default
        }),
        Err(_) => default,
    }
}

/// Token lifetime in hours. Values outside `1..=MAX_TOKEN_TTL_HOURS` fall back
/// to the default.
pub fn token_ttl_from(raw: Option<&str>) -> i64 {
    let Some(raw) = raw else {
        return DEFAULT_TOKEN_TTL_HOURS;
    };

    match raw.trim().parse::<i64>() {
        Ok(hours) if (1..=MAX_TOKEN_TTL_HOURS).contains(&hours) => hours,
        _ => {
            warn!(
                "TOKEN_TTL_HOURS must be between 1 and {}, got {:?}; using default {}",
                MAX_TOKEN_TTL_HOURS, raw, DEFAULT_TOKEN_TTL_HOURS
            );
            DEFAULT_TOKEN_TTL_HOURS
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> AppConfig {
        AppConfig {
            service_name: "identity-service".to_string(),
            bind_address: "127.0.0.1:0".to_string(),
            database_url: "sqlite::memory:".to_string(),
            jwt_secret: "secret".to_string(),
            token_ttl_hours: 24,
            identity_service_url: "http://identity:5001/".to_string(),
            identity_timeout_secs: 5,
        }
    }

    #[test]
    fn test_is_configured_requires_secret() {
        let mut config = sample();
        assert!(config.is_configured());

        config.jwt_secret.clear();
        assert!(!config.is_configured());
    }

    #[test]
    fn test_identity_base_url_strips_trailing_slash() {
        assert_eq!(sample().identity_base_url(), "http://identity:5001");
    }

    #[test]
    fn test_token_ttl_falls_back_when_out_of_range() {
        assert_eq!(token_ttl_from(None), DEFAULT_TOKEN_TTL_HOURS);
        assert_eq!(token_ttl_from(Some("8")), 8);
        assert_eq!(token_ttl_from(Some(" 48 ")), 48);

        for raw in ["0", "-3", "abc", "9223372036854775807"] {
            assert_eq!(token_ttl_from(Some(raw)), DEFAULT_TOKEN_TTL_HOURS, "{}", raw);
        }
    }
}
