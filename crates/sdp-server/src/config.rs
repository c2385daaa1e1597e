//! Configuration management

use serde::{Deserialize, Serialize};
use std::time::Duration;

// ============================================================================
// Transport Configuration Constants
// ============================================================================

/// Default MQTT broker host for local development.
pub const DEFAULT_BROKER_HOST: &str = "127.0.0.1";

/// Default MQTT broker port.
pub const DEFAULT_BROKER_PORT: u16 = 1883;

/// Default topic filter (all topics, as the sensor fleet publishes on
/// per-room topics).
pub const DEFAULT_TOPIC_FILTER: &str = "#";

/// Default MQTT client identifier.
pub const DEFAULT_CLIENT_ID: &str = "sdp-server";

/// Default MQTT keep-alive in seconds.
pub const DEFAULT_KEEP_ALIVE_SECS: u64 = 30;

// ============================================================================
// Database Configuration Constants
// ============================================================================

/// Default database URL for local development.
pub const DEFAULT_DATABASE_URL: &str = "postgresql://localhost/sdp";

/// Default maximum database connections in the pool.
pub const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 10;

/// Default minimum database connections in the pool.
pub const DEFAULT_DATABASE_MIN_CONNECTIONS: u32 = 2;

/// Default database connection timeout in seconds.
pub const DEFAULT_DATABASE_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Default database idle timeout in seconds (10 minutes).
pub const DEFAULT_DATABASE_IDLE_TIMEOUT_SECS: u64 = 600;

// ============================================================================
// Pipeline Configuration Constants
// ============================================================================

/// Default maximum readings drained per batch insert.
pub const DEFAULT_BATCH_SIZE: usize = 50;

/// Default wait between batch writer iterations in seconds.
pub const DEFAULT_FLUSH_INTERVAL_SECS: u64 = 1;

/// Default wait between retention sweeps in seconds (12 hours).
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 12 * 60 * 60;

/// Default retention window in calendar months.
pub const DEFAULT_RETENTION_MONTHS: u32 = 6;

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub transport: TransportConfig,
    pub database: DatabaseConfig,
    pub pipeline: PipelineConfig,
}

/// MQTT transport configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportConfig {
    pub broker_host: String,
    pub broker_port: u16,
    pub topic_filter: String,
    pub client_id: String,
    pub keep_alive_secs: u64,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_secs: u64,
    pub idle_timeout_secs: u64,
}

/// Pipeline tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Maximum readings drained from the queue per batch insert.
    pub batch_size: usize,
    /// Wait between batch writer iterations.
    pub flush_interval_secs: u64,
    /// Wait between retention sweeps.
    pub sweep_interval_secs: u64,
    /// Age at which persisted readings are retired, in calendar months.
    pub retention_months: u32,
}

impl Config {
    /// Load configuration from environment and defaults
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Config {
            transport: TransportConfig {
                broker_host: std::env::var("MQTT_BROKER_HOST")
                    .unwrap_or_else(|_| DEFAULT_BROKER_HOST.to_string()),
                broker_port: std::env::var("MQTT_BROKER_PORT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_BROKER_PORT),
                topic_filter: std::env::var("MQTT_TOPIC_FILTER")
                    .unwrap_or_else(|_| DEFAULT_TOPIC_FILTER.to_string()),
                client_id: std::env::var("MQTT_CLIENT_ID")
                    .unwrap_or_else(|_| DEFAULT_CLIENT_ID.to_string()),
                keep_alive_secs: std::env::var("MQTT_KEEP_ALIVE_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_KEEP_ALIVE_SECS),
            },
            database: DatabaseConfig {
                url: std::env::var("DATABASE_URL")
                    .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
                max_connections: std::env::var("DATABASE_MAX_CONNECTIONS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_DATABASE_MAX_CONNECTIONS),
                min_connections: std::env::var("DATABASE_MIN_CONNECTIONS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_DATABASE_MIN_CONNECTIONS),
                connect_timeout_secs: std::env::var("DATABASE_CONNECT_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_DATABASE_CONNECT_TIMEOUT_SECS),
                idle_timeout_secs: std::env::var("DATABASE_IDLE_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_DATABASE_IDLE_TIMEOUT_SECS),
            },
            pipeline: PipelineConfig::from_env(),
        };

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.transport.broker_host.is_empty() {
            anyhow::bail!("MQTT broker host cannot be empty");
        }

        if self.transport.broker_port == 0 {
            anyhow::bail!("MQTT broker port must be greater than 0");
        }

        if self.transport.topic_filter.is_empty() {
            anyhow::bail!("MQTT topic filter cannot be empty");
        }

        if self.database.url.is_empty() {
            anyhow::bail!("Database URL cannot be empty");
        }

        if self.database.max_connections == 0 {
            anyhow::bail!("Database max_connections must be greater than 0");
        }

        if self.database.min_connections > self.database.max_connections {
            anyhow::bail!(
                "Database min_connections ({}) cannot be greater than max_connections ({})",
                self.database.min_connections,
                self.database.max_connections
            );
        }

        self.pipeline.validate()?;

        Ok(())
    }
}

impl PipelineConfig {
    /// Load pipeline tuning from environment variables
    pub fn from_env() -> Self {
        Self {
            batch_size: std::env::var("PIPELINE_BATCH_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_BATCH_SIZE),
            flush_interval_secs: std::env::var("PIPELINE_FLUSH_INTERVAL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_FLUSH_INTERVAL_SECS),
            sweep_interval_secs: std::env::var("PIPELINE_SWEEP_INTERVAL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_SWEEP_INTERVAL_SECS),
            retention_months: std::env::var("PIPELINE_RETENTION_MONTHS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_RETENTION_MONTHS),
        }
    }

    /// Validate pipeline tuning
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.batch_size == 0 {
            anyhow::bail!("PIPELINE_BATCH_SIZE must be greater than 0");
        }
        if self.flush_interval_secs == 0 {
            anyhow::bail!("PIPELINE_FLUSH_INTERVAL_SECS must be greater than 0");
        }
        if self.sweep_interval_secs == 0 {
            anyhow::bail!("PIPELINE_SWEEP_INTERVAL_SECS must be greater than 0");
        }
        if self.retention_months == 0 {
            anyhow::bail!("PIPELINE_RETENTION_MONTHS must be greater than 0");
        }
        Ok(())
    }

    /// Get the batch writer wait as a Duration
    pub fn flush_interval(&self) -> Duration {
        Duration::from_secs(self.flush_interval_secs)
    }

    /// Get the sweeper wait as a Duration
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            transport: TransportConfig::default(),
            database: DatabaseConfig::default(),
            pipeline: PipelineConfig::default(),
        }
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            broker_host: DEFAULT_BROKER_HOST.to_string(),
            broker_port: DEFAULT_BROKER_PORT,
            topic_filter: DEFAULT_TOPIC_FILTER.to_string(),
            client_id: DEFAULT_CLIENT_ID.to_string(),
            keep_alive_secs: DEFAULT_KEEP_ALIVE_SECS,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_DATABASE_URL.to_string(),
            max_connections: DEFAULT_DATABASE_MAX_CONNECTIONS,
            min_connections: DEFAULT_DATABASE_MIN_CONNECTIONS,
            connect_timeout_secs: DEFAULT_DATABASE_CONNECT_TIMEOUT_SECS,
            idle_timeout_secs: DEFAULT_DATABASE_IDLE_TIMEOUT_SECS,
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            flush_interval_secs: DEFAULT_FLUSH_INTERVAL_SECS,
            sweep_interval_secs: DEFAULT_SWEEP_INTERVAL_SECS,
            retention_months: DEFAULT_RETENTION_MONTHS,
        }
    }
}
