use std::net::IpAddr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub host: IpAddr,
    pub port: u16,
    pub max_body_size: usize,
    pub log_level: String,
    pub cache: CacheConfig,
}

/// Staleness windows and retry budget for the dashboard read path.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub students_ttl: Duration,
    pub payments_ttl: Duration,
    pub fetch_retries: u32,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            students_ttl: Duration::from_secs(5 * 60),
            payments_ttl: Duration::from_secs(3 * 60),
            fetch_retries: 2,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let database_url = env_required("DATABASE_URL")?;
        let jwt_secret = env_required("JWT_SECRET")?;

        let host: IpAddr = env_or("SIPAY_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid SIPAY_HOST: {e}"))?;

        let port: u16 = env_or("SIPAY_PORT", "3000")
            .parse()
            .map_err(|e| format!("Invalid SIPAY_PORT: {e}"))?;

        let max_body_size: usize = env_or("SIPAY_MAX_BODY_SIZE", "1048576")
            .parse()
            .map_err(|e| format!("Invalid SIPAY_MAX_BODY_SIZE: {e}"))?;

        let log_level = env_or("SIPAY_LOG_LEVEL", "info");

        let students_ttl: u64 = env_or("SIPAY_STUDENTS_TTL_SECS", "300")
            .parse()
            .map_err(|e| format!("Invalid SIPAY_STUDENTS_TTL_SECS: {e}"))?;

        let payments_ttl: u64 = env_or("SIPAY_PAYMENTS_TTL_SECS", "180")
            .parse()
            .map_err(|e| format!("Invalid SIPAY_PAYMENTS_TTL_SECS: {e}"))?;

        let fetch_retries: u32 = env_or("SIPAY_FETCH_RETRIES", "2")
            .parse()
            .map_err(|e| format!("Invalid SIPAY_FETCH_RETRIES: {e}"))?;

        Ok(Config {
            database_url,
            jwt_secret,
            host,
            port,
            max_body_size,
            log_level,
            cache: CacheConfig {
                students_ttl: Duration::from_secs(students_ttl),
                payments_ttl: Duration::from_secs(payments_ttl),
                fetch_retries,
            },
        })
    }
}

fn env_required(key: &str) -> Result<String, String> {
    std::env::var(key).map_err(|_| format!("Missing required environment variable: {key}"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
