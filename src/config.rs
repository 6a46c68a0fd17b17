// Application configuration loaded once at startup and passed into services

use std::time::Duration;

/// Runtime configuration for the reservation engine.
///
/// Built from environment variables in `main` and handed to every service
/// at construction; nothing reads the environment after startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// PostgreSQL connection string
    pub database_url: String,
    /// Secret for verifying bearer tokens
    pub jwt_secret: String,
    /// Bind host for the HTTP server
    pub host: String,
    /// Bind port for the HTTP server
    pub port: u16,
    /// When true, an invalid or exhausted discount code aborts the
    /// reservation instead of falling back to a zero discount
    pub strict_discounts: bool,
    /// Bounded wait for row locks before surfacing ResourceBusy
    pub lock_wait_timeout: Duration,
    /// How often the expiry sweeper runs
    pub sweep_interval: Duration,
}

impl AppConfig {
    /// Load configuration from the environment.
    ///
    /// `DATABASE_URL` and `JWT_SECRET` are required; everything else has a
    /// default.
    pub fn from_env() -> Result<Self, String> {
        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| "DATABASE_URL must be set in environment".to_string())?;

        let jwt_secret = std::env::var("JWT_SECRET")
            .map_err(|_| "JWT_SECRET must be set in environment".to_string())?;

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()
            .map_err(|_| "PORT must be a valid port number".to_string())?;

        let strict_discounts = std::env::var("STRICT_DISCOUNTS")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        let lock_wait_secs = std::env::var("LOCK_WAIT_TIMEOUT_SECS")
            .unwrap_or_else(|_| "5".to_string())
            .parse::<u64>()
            .map_err(|_| "LOCK_WAIT_TIMEOUT_SECS must be an integer".to_string())?;

        let sweep_secs = std::env::var("SWEEP_INTERVAL_SECS")
            .unwrap_or_else(|_| "60".to_string())
            .parse::<u64>()
            .map_err(|_| "SWEEP_INTERVAL_SECS must be an integer".to_string())?;

        Ok(Self {
            database_url,
            jwt_secret,
            host,
            port,
            strict_discounts,
            lock_wait_timeout: Duration::from_secs(lock_wait_secs),
            sweep_interval: Duration::from_secs(sweep_secs),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Environment variables are process-global, so everything touching them
    // lives in one test.
    #[test]
    fn test_from_env() {
        std::env::set_var("DATABASE_URL", "postgresql://test");
        std::env::set_var("JWT_SECRET", "test_secret");
        std::env::remove_var("HOST");
        std::env::remove_var("PORT");
        std::env::remove_var("STRICT_DISCOUNTS");
        std::env::remove_var("LOCK_WAIT_TIMEOUT_SECS");
        std::env::remove_var("SWEEP_INTERVAL_SECS");

        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert!(!config.strict_discounts);
        assert_eq!(config.lock_wait_timeout, Duration::from_secs(5));
        assert_eq!(config.sweep_interval, Duration::from_secs(60));

        std::env::set_var("STRICT_DISCOUNTS", "true");
        let config = AppConfig::from_env().unwrap();
        assert!(config.strict_discounts);
        std::env::remove_var("STRICT_DISCOUNTS");
    }
}
