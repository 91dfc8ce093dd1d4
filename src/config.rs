use crate::utils::AppError;
use std::env;
use std::str::FromStr;

/// How the registration handler reaches MongoDB
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionMode {
    /// One process-wide client; each request borrows a pooled connection
    Pooled,
    /// A fresh client per request, shut down before the request completes
    PerRequest,
}

impl FromStr for ConnectionMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pooled" => Ok(ConnectionMode::Pooled),
            "per_request" | "per-request" => Ok(ConnectionMode::PerRequest),
            other => Err(AppError::Configuration(format!(
                "MONGODB_CONNECTION_MODE must be 'pooled' or 'per_request', got '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub mongodb_uri: String,
    pub database_name: String,
    pub connection_mode: ConnectionMode,
    pub max_pool_size: u32,
    pub min_pool_size: u32,
    pub timeout_secs: u64,
    /// Redirect target after a successful registration
    pub login_path: String,
    pub cors_allowed_origins: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            mongodb_uri: "mongodb://localhost:27017".to_string(),
            database_name: "userDB".to_string(),
            connection_mode: ConnectionMode::Pooled,
            max_pool_size: 20,
            min_pool_size: 5,
            timeout_secs: 5,
            login_path: "login.jsp".to_string(),
            cors_allowed_origins: vec![
                "http://localhost:8080".to_string(),
                "http://localhost:5173".to_string(),
            ],
        }
    }
}

impl AppConfig {
    /// Reads configuration from the process environment (call `dotenv()` first)
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let connection_mode = match lookup("MONGODB_CONNECTION_MODE") {
            Some(value) => value.parse()?,
            None => defaults.connection_mode,
        };

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .map(|value| {
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or(defaults.cors_allowed_origins);

        let config = Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse_or("PORT", &lookup, defaults.port)?,
            mongodb_uri: lookup("MONGODB_URI").unwrap_or(defaults.mongodb_uri),
            database_name: lookup("MONGODB_DATABASE").unwrap_or(defaults.database_name),
            connection_mode,
            max_pool_size: parse_or("MONGODB_MAX_POOL_SIZE", &lookup, defaults.max_pool_size)?,
            min_pool_size: parse_or("MONGODB_MIN_POOL_SIZE", &lookup, defaults.min_pool_size)?,
            timeout_secs: parse_or("MONGODB_TIMEOUT_SECS", &lookup, defaults.timeout_secs)?,
            login_path: lookup("LOGIN_PATH").unwrap_or(defaults.login_path),
            cors_allowed_origins,
        };

        if config.min_pool_size > config.max_pool_size {
            return Err(AppError::Configuration(format!(
                "MONGODB_MIN_POOL_SIZE ({}) exceeds MONGODB_MAX_POOL_SIZE ({})",
                config.min_pool_size, config.max_pool_size
            )));
        }

        Ok(config)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T, F>(key: &str, lookup: &F, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| AppError::Configuration(format!("{} is invalid ('{}'): {}", key, raw, e))),
        None => Ok(default),
    }
}
