use dotenv;
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::OnceLock;
use tracing::{error, info, warn};

static CONFIG: OnceLock<HashMap<String, String>> = OnceLock::new();

/// Parameters with safe fallbacks for local development.
const DEFAULTS: &[(&str, &str)] = &[
    ("SERVER_ADDRESS", "127.0.0.1"),
    ("SERVER_PORT", "8081"),
    ("DATABASE_URL", "sqlite://authgate.db"),
    ("DB_MAX_CONNECTIONS", "5"),
    ("DB_ACQUIRE_TIMEOUT_SECONDS", "30"),
    ("ACCESS_TOKEN_TTL_MINUTES", "10"),
    ("JWT_CLOCK_SKEW_SECONDS", "0"),
    ("LOG_LEVEL", "info"),
    // Refresh token configuration
    ("REFRESH_TOKEN_TTL_DAYS", "30"),
    ("REFRESH_PURGE_INTERVAL_MINUTES", "60"),
    ("REFRESH_PURGE_RETENTION_DAYS", "30"),
];

/// Parameters with no safe default; reading one that is unset panics.
const REQUIRED: &[&str] = &["JWT_SECRET"];

pub fn init() {
    match dotenv::dotenv() {
        Ok(path) => info!("Loaded environment file: {:?}", path),
        Err(_) => warn!("No .env file found, using system environment variables"),
    }

    let mut config = HashMap::new();

    for (key, fallback) in DEFAULTS {
        let value = std::env::var(key).unwrap_or_else(|_| fallback.to_string());
        config.insert(key.to_string(), value);
    }

    for key in REQUIRED {
        match std::env::var(key) {
            Ok(value) => {
                config.insert(key.to_string(), value);
            }
            Err(_) => warn!("Required parameter '{}' is not set", key),
        }
    }

    if CONFIG.set(config).is_err() {
        error!("Configuration already initialized");
    } else {
        info!("Configuration initialized successfully");
    }
}

pub fn get(parameter: &str) -> String {
    get_optional(parameter).unwrap_or_else(|| {
        error!("Configuration parameter '{}' not found", parameter);
        panic!("Required configuration parameter '{}' is missing", parameter);
    })
}

pub fn get_optional(parameter: &str) -> Option<String> {
    CONFIG
        .get()
        .and_then(|config| config.get(parameter))
        .cloned()
}

fn get_parsed<T: FromStr>(parameter: &str, kind: &str) -> T {
    let value = get(parameter);
    value.parse::<T>().unwrap_or_else(|_| {
        error!(
            "Configuration parameter '{}' is not a valid {}: {}",
            parameter, kind, value
        );
        panic!("Configuration parameter '{}' is not a valid {}", parameter, kind);
    })
}

pub fn get_i64(parameter: &str) -> i64 {
    get_parsed(parameter, "i64")
}

pub fn get_u64(parameter: &str) -> u64 {
    get_parsed(parameter, "u64")
}
