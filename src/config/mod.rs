//! # Configuration Management Module
//!
//! Centralized configuration for the gateway and the badge protocol core,
//! with validation via strong typing, sensible defaults, and TOML
//! persistence.
//!
//! ## Configuration structure
//!
//! - [`GatewayConfig`] - HTTP bind address and chunk pacing
//! - [`BadgeConfig`] - panel geometry and frame queue depth
//! - [`StorageConfig`] - data persistence settings
//! - [`LoggingConfig`] - logging settings
//!
//! ## Configuration file format
//!
//! ```toml
//! [gateway]
//! bind = "0.0.0.0:8080"
//! chunk_size = 250
//! chunk_delay_ms = 10
//!
//! [badge]
//! width = 800
//! height = 480
//! queue_depth = 30
//!
//! [storage]
//! data_dir = "./data"
//!
//! [logging]
//! level = "info"
//! file = "inkbadge.log"
//! ```

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::protocol::queue::DEFAULT_QUEUE_DEPTH;
use crate::protocol::{frame_queue, FrameQueue, FrameReceiver, MAX_FRAME_PAYLOAD};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub gateway: GatewayConfig,
    pub badge: BadgeConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Socket address the HTTP server binds.
    pub bind: String,
    /// Bitmap chunk size on the radio. Clamped to the transport MTU.
    pub chunk_size: usize,
    /// Fixed inter-frame delay between chunks (ms), protecting the radio
    /// duty cycle.
    pub chunk_delay_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BadgeConfig {
    /// Panel width in pixels.
    pub width: u32,
    /// Panel height in pixels.
    pub height: u32,
    /// Frame queue depth between the receive callback and the worker.
    pub queue_depth: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
}

impl GatewayConfig {
    /// Chunk size actually used on the wire; configs asking for more than
    /// the MTU get the MTU.
    pub fn effective_chunk_size(&self) -> usize {
        self.chunk_size.clamp(1, MAX_FRAME_PAYLOAD)
    }
}

impl BadgeConfig {
    /// Size of a full-frame bitmap at one bit per pixel.
    pub fn bitmap_len(&self) -> usize {
        (self.width as usize * self.height as usize) / 8
    }

    /// Frame queue between the receive callback and the badge worker, sized
    /// from this config.
    pub fn frame_queue(&self) -> (FrameQueue, FrameReceiver) {
        frame_queue(self.queue_depth)
    }
}

impl Config {
    /// Load configuration from a file
    pub async fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| anyhow!("Failed to read config file {}: {}", path, e))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse config file {}: {}", path, e))?;

        Ok(config)
    }

    /// Create a default configuration file
    pub async fn create_default(path: &str) -> Result<()> {
        let config = Config::default();
        let content = toml::to_string_pretty(&config)
            .map_err(|e| anyhow!("Failed to serialize default config: {}", e))?;

        fs::write(path, content)
            .await
            .map_err(|e| anyhow!("Failed to write config file {}: {}", path, e))?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            gateway: GatewayConfig {
                bind: "0.0.0.0:8080".to_string(),
                chunk_size: MAX_FRAME_PAYLOAD,
                chunk_delay_ms: 10,
            },
            badge: BadgeConfig {
                width: 800,
                height: 480,
                queue_depth: DEFAULT_QUEUE_DEPTH,
            },
            storage: StorageConfig {
                data_dir: "./data".to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file: Some("inkbadge.log".to_string()),
            },
        }
    }
}
