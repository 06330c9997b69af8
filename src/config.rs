use std::env;

use anyhow::{bail, Context, Result};
use chrono::FixedOffset;

use crate::calendar::{SystemClock, MINUTES_PER_DAY};

pub const DEFAULT_GRID_STEP_MINUTES: u32 = 30;

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub booking: BookingConfig,
    pub tenant_utc_offset_minutes: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// Settings of the scheduling core itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingConfig {
    grid_step_minutes: u32,
}

impl BookingConfig {
    pub fn new(grid_step_minutes: u32) -> Result<Self> {
        if grid_step_minutes == 0 || grid_step_minutes > MINUTES_PER_DAY {
            bail!("grid step must be between 1 and {} minutes", MINUTES_PER_DAY);
        }
        Ok(BookingConfig { grid_step_minutes })
    }

    pub fn grid_step_minutes(&self) -> u32 {
        self.grid_step_minutes
    }
}

impl Default for BookingConfig {
    fn default() -> Self {
        BookingConfig {
            grid_step_minutes: DEFAULT_GRID_STEP_MINUTES,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let host = env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()
            .context("Failed to parse SERVER_PORT")?;

        let url = env::var("DATABASE_URL").context("DATABASE_URL not found")?;
        let max_connections = match env::var("DATABASE_MAX_CONNECTIONS") {
            Ok(val) => val
                .parse()
                .context("Failed to parse DATABASE_MAX_CONNECTIONS")?,
            Err(_) => 10,
        };

        let grid_step = match env::var("SLOT_GRID_MINUTES") {
            Ok(val) => val.parse().context("Failed to parse SLOT_GRID_MINUTES")?,
            Err(_) => DEFAULT_GRID_STEP_MINUTES,
        };
        let booking = BookingConfig::new(grid_step).context("Invalid SLOT_GRID_MINUTES")?;

        let tenant_utc_offset_minutes = match env::var("TENANT_UTC_OFFSET_MINUTES") {
            Ok(val) => Some(
                val.parse()
                    .context("Failed to parse TENANT_UTC_OFFSET_MINUTES")?,
            ),
            Err(_) => None,
        };

        Ok(Config {
            server: ServerConfig { host, port },
            database: DatabaseConfig {
                url,
                max_connections,
            },
            booking,
            tenant_utc_offset_minutes,
        })
    }

    /// Clock of the tenant's single timezone; the server's local zone when unset.
    pub fn clock(&self) -> Result<SystemClock> {
        match self.tenant_utc_offset_minutes {
            Some(minutes) => {
                let offset = minutes
                    .checked_mul(60)
                    .and_then(FixedOffset::east_opt)
                    .context("TENANT_UTC_OFFSET_MINUTES out of range")?;
                Ok(SystemClock::with_offset(offset))
            }
            None => Ok(SystemClock::local()),
        }
    }
}
