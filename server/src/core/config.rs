//! Server configuration
//!
//! # Environment variables
//!
//! All settings can be overridden via environment variables:
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | WORK_DIR | /var/lib/encore | Working directory (database, logs) |
//! | HTTP_PORT | 3000 | HTTP API port |
//! | ENVIRONMENT | development | development \| staging \| production |
//! | TIMEZONE | Europe/London | Venue timezone (IANA name) |
//! | PENDING_TTL_MINUTES | 15 | How long an unpaid booking holds its slot |
//! | EXPIRY_SWEEP_INTERVAL_SECS | 60 | Expired-hold sweep cadence |
//! | LOG_DIR | (unset) | Optional daily-rolling log directory |

use chrono_tz::Tz;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    /// Working directory holding the database and logs
    pub work_dir: String,
    /// HTTP API port
    pub http_port: u16,
    /// Runtime environment: development | staging | production
    pub environment: String,
    /// Venue timezone; every wall-clock computation happens here
    pub timezone: Tz,
    /// TTL for unpaid PENDING bookings, minutes
    pub pending_ttl_minutes: i64,
    /// Cadence of the expired-hold sweep, seconds
    pub expiry_sweep_interval_secs: u64,
    /// Optional log directory for rolling file output
    pub log_dir: Option<String>,
}

impl Config {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset or unparsable
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/encore".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            timezone: std::env::var("TIMEZONE")
                .ok()
                .and_then(|tz| tz.parse().ok())
                .unwrap_or(chrono_tz::Europe::London),
            pending_ttl_minutes: std::env::var("PENDING_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(15),
            expiry_sweep_interval_secs: std::env::var("EXPIRY_SWEEP_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
            log_dir: std::env::var("LOG_DIR").ok(),
        }
    }

    /// Database directory under the working directory
    pub fn database_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("database")
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
