//! Driver configuration
//!
//! Stored as TOML. A missing file means defaults; every field is optional.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::DriverError;
use crate::protocol::limits;
use crate::ring_buffer::RingBuffer;

fn default_buffer_capacity() -> usize {
    limits::BUFFER_CAPACITY
}
fn default_max_event_len() -> usize {
    limits::EVENT_MAX_LEN
}
fn default_poll_interval_ms() -> u64 {
    limits::POLL_INTERVAL_MS
}
fn default_read_chunk() -> usize {
    limits::READ_CHUNK
}

/// Complete driver configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverConfig {
    /// Ring buffer slots (one is always kept free)
    #[serde(default = "default_buffer_capacity")]
    pub buffer_capacity: usize,
    /// Longest event line, newline included
    #[serde(default = "default_max_event_len")]
    pub max_event_len: usize,
    /// How often the consumer drains the buffer
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Bytes the consumer asks for per read
    #[serde(default = "default_read_chunk")]
    pub read_chunk: usize,
    /// Send a status request as soon as the remote connects
    #[serde(default)]
    pub request_status_on_connect: bool,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            buffer_capacity: default_buffer_capacity(),
            max_event_len: default_max_event_len(),
            poll_interval_ms: default_poll_interval_ms(),
            read_chunk: default_read_chunk(),
            request_status_on_connect: false,
        }
    }
}

impl DriverConfig {
    /// Get the default config file path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("wiimote")
            .join("driver.toml")
    }

    /// Load config from a file, or return default if not found
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let config = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            toml::from_str(&content)?
        } else {
            Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Save config to a file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), DriverError> {
        if self.buffer_capacity < RingBuffer::MIN_CAPACITY {
            return Err(DriverError::Config(format!(
                "buffer_capacity must be at least {}",
                RingBuffer::MIN_CAPACITY
            )));
        }
        if self.max_event_len < 2 {
            return Err(DriverError::Config(
                "max_event_len must be at least 2".into(),
            ));
        }
        if self.read_chunk == 0 {
            return Err(DriverError::Config("read_chunk must be non-zero".into()));
        }
        if self.poll_interval_ms == 0 {
            return Err(DriverError::Config(
                "poll_interval_ms must be non-zero".into(),
            ));
        }
        Ok(())
    }
}
