use crate::auth::jwt::JwtConfig;

/// A required variable is missing or a value does not parse.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set in the environment")]
    Missing(&'static str),

    #[error("{var} has an invalid value '{value}'")]
    Invalid { var: &'static str, value: String },
}

/// Server configuration loaded from environment variables.
///
/// All fields except the database URL and JWT secret have defaults suitable
/// for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `300`, long enough for a
    /// broadcast to a large guest list).
    pub request_timeout_secs: u64,
    pub database_url: String,
    /// Pool size (default: `20`).
    pub db_max_connections: u32,
    /// Request body limit for uploads (default: 15 MiB).
    pub max_upload_bytes: usize,
    /// Pause between two WhatsApp sends in milliseconds (default: `1000`).
    pub whatsapp_send_delay_ms: u64,
    /// JWT verification settings.
    pub jwt: JwtConfig,
    /// WhatsApp gateway settings.
    pub evolution: EvolutionConfig,
}

/// Evolution API connection settings.
#[derive(Debug, Clone)]
pub struct EvolutionConfig {
    pub api_url: String,
    pub api_key: String,
    /// Instance names are `{instance_prefix}-{project_id}`.
    pub instance_prefix: String,
    pub timeout_secs: u64,
}

impl ServerConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var                     | Default                 |
    /// |-----------------------------|-------------------------|
    /// | `HOST`                      | `0.0.0.0`               |
    /// | `PORT`                      | `3000`                  |
    /// | `CORS_ORIGINS`              | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`      | `300`                   |
    /// | `DATABASE_URL`              | **required**            |
    /// | `DB_MAX_CONNECTIONS`        | `20`                    |
    /// | `MAX_UPLOAD_BYTES`          | `15728640`              |
    /// | `WHATSAPP_SEND_DELAY_MS`    | `1000`                  |
    /// | `JWT_SECRET`                | **required**            |
    /// | `JWT_ACCESS_EXPIRY_MINS`    | `60`                    |
    /// | `EVOLUTION_API_URL`         | `http://localhost:8080` |
    /// | `EVOLUTION_API_KEY`         | empty                   |
    /// | `EVOLUTION_INSTANCE_PREFIX` | `sprezzia`              |
    /// | `EVOLUTION_TIMEOUT_SECS`    | `30`                    |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let cors_origins: Vec<String> = var("CORS_ORIGINS", "http://localhost:5173")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let database_url = lookup("DATABASE_URL")
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;

        Ok(Self {
            host: var("HOST", "0.0.0.0"),
            port: parse("PORT", var("PORT", "3000"))?,
            cors_origins,
            request_timeout_secs: parse("REQUEST_TIMEOUT_SECS", var("REQUEST_TIMEOUT_SECS", "300"))?,
            database_url,
            db_max_connections: parse("DB_MAX_CONNECTIONS", var("DB_MAX_CONNECTIONS", "20"))?,
            max_upload_bytes: parse("MAX_UPLOAD_BYTES", var("MAX_UPLOAD_BYTES", "15728640"))?,
            whatsapp_send_delay_ms: parse(
                "WHATSAPP_SEND_DELAY_MS",
                var("WHATSAPP_SEND_DELAY_MS", "1000"),
            )?,
            jwt: JwtConfig::from_lookup(&lookup)?,
            evolution: EvolutionConfig {
                api_url: var("EVOLUTION_API_URL", "http://localhost:8080"),
                api_key: var("EVOLUTION_API_KEY", ""),
                instance_prefix: var("EVOLUTION_INSTANCE_PREFIX", "sprezzia"),
                timeout_secs: parse("EVOLUTION_TIMEOUT_SECS", var("EVOLUTION_TIMEOUT_SECS", "30"))?,
            },
        })
    }
}

/// Parse a variable's value, reporting which variable was wrong.
pub(crate) fn parse<T: std::str::FromStr>(var: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { var, value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/sprezzia"),
            ("JWT_SECRET", "secret"),
        ]))
        .unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.request_timeout_secs, 300);
        assert_eq!(config.db_max_connections, 20);
        assert_eq!(config.whatsapp_send_delay_ms, 1000);
        assert_eq!(config.max_upload_bytes, 15 * 1024 * 1024);
        assert_eq!(config.cors_origins, ["http://localhost:5173"]);
        assert_eq!(config.evolution.instance_prefix, "sprezzia");
        assert_eq!(config.evolution.api_url, "http://localhost:8080");
    }

    #[test]
    fn cors_origins_split_and_trimmed() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/sprezzia"),
            ("JWT_SECRET", "secret"),
            ("CORS_ORIGINS", "https://a.example, https://b.example,"),
        ]))
        .unwrap();
        assert_eq!(config.cors_origins, ["https://a.example", "https://b.example"]);
    }

    #[test]
    fn missing_database_url() {
        let result = ServerConfig::from_lookup(lookup(&[("JWT_SECRET", "secret")]));
        assert_matches!(result, Err(ConfigError::Missing("DATABASE_URL")));
    }

    #[test]
    fn invalid_port() {
        let result = ServerConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/sprezzia"),
            ("JWT_SECRET", "secret"),
            ("PORT", "eighty"),
        ]));
        assert_matches!(result, Err(ConfigError::Invalid { var: "PORT", .. }));
    }
}
