use std::net::IpAddr;

use ipnet::IpNet;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: IpAddr,
    pub port: u16,
    pub db_max_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub max_body_size: usize,
    pub trusted_proxies: Vec<IpNet>,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source. `from_env` is the
    /// process-environment case.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key).ok_or_else(|| format!("Missing required environment variable: {key}"))
        };
        let or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let database_url = required("DATABASE_URL")?;

        let host: IpAddr = or("AUDIT_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid AUDIT_HOST: {e}"))?;

        let port: u16 = or("AUDIT_PORT", "8080")
            .parse()
            .map_err(|e| format!("Invalid AUDIT_PORT: {e}"))?;

        let db_max_connections: u32 = or("AUDIT_DB_MAX_CONNECTIONS", "10")
            .parse()
            .map_err(|e| format!("Invalid AUDIT_DB_MAX_CONNECTIONS: {e}"))?;
        if db_max_connections == 0 {
            return Err("Invalid AUDIT_DB_MAX_CONNECTIONS: must be at least 1".to_string());
        }

        let db_acquire_timeout_secs: u64 = or("AUDIT_DB_ACQUIRE_TIMEOUT_SECS", "5")
            .parse()
            .map_err(|e| format!("Invalid AUDIT_DB_ACQUIRE_TIMEOUT_SECS: {e}"))?;

        let max_body_size: usize = or("AUDIT_MAX_BODY_SIZE", "65536")
            .parse()
            .map_err(|e| format!("Invalid AUDIT_MAX_BODY_SIZE: {e}"))?;

        let trusted_proxies: Vec<IpNet> = or("AUDIT_TRUSTED_PROXIES", "")
            .split(',')
            .filter(|s| !s.trim().is_empty())
            .map(|s| {
                s.trim()
                    .parse()
                    .map_err(|e| format!("Invalid AUDIT_TRUSTED_PROXIES entry '{s}': {e}"))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let log_level = or("AUDIT_LOG_LEVEL", "info");

        Ok(Config {
            database_url,
            host,
            port,
            db_max_connections,
            db_acquire_timeout_secs,
            max_body_size,
            trusted_proxies,
            log_level,
        })
    }
}
