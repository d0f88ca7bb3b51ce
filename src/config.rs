//! Configuration loaded from environment variables.
//!
//! Required: `DATABASE_URL`.
//! Optional: `PORT` (default 8084), `NATS_URL`, `CURRENCY` (default USD),
//! `PAYMENT_SUCCESS_RATE` (default 0.95), `PAYMENT_DELAY_MS` (default 1500).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable: {0}")]
    MissingEnvVar(&'static str),
    #[error("invalid environment variable {0}: {1}")]
    InvalidEnvVar(&'static str, String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub nats_url: Option<String>,
    pub currency: String,
    pub payment_success_rate: f64,
    pub payment_delay_ms: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url =
            std::env::var("DATABASE_URL").map_err(|_| ConfigError::MissingEnvVar("DATABASE_URL"))?;
        let port = match std::env::var("PORT") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| ConfigError::InvalidEnvVar("PORT", raw))?,
            Err(_) => 8084,
        };
        let payment_success_rate = match std::env::var("PAYMENT_SUCCESS_RATE") {
            Ok(raw) => {
                let rate: f64 = raw
                    .parse()
                    .map_err(|_| ConfigError::InvalidEnvVar("PAYMENT_SUCCESS_RATE", raw.clone()))?;
                if !(0.0..=1.0).contains(&rate) {
                    return Err(ConfigError::InvalidEnvVar("PAYMENT_SUCCESS_RATE", raw));
                }
                rate
            }
            Err(_) => 0.95,
        };
        let payment_delay_ms = match std::env::var("PAYMENT_DELAY_MS") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| ConfigError::InvalidEnvVar("PAYMENT_DELAY_MS", raw))?,
            Err(_) => 1500,
        };
        Ok(Self {
            database_url,
            port,
            nats_url: std::env::var("NATS_URL").ok(),
            currency: std::env::var("CURRENCY").unwrap_or_else(|_| "USD".to_string()),
            payment_success_rate,
            payment_delay_ms,
        })
    }
}
