//! Driver error types

use thiserror::Error;
use wiimote_transport::TransportError;

/// Errors produced by the report-mapping core
///
/// `MalformedReport` and `BufferOverflow` arise on the ingestion path and
/// are only ever logged there; they exist as values so diagnostics carry a
/// consistent shape. The rest are returned to synchronous callers.
#[derive(Error, Debug)]
pub enum DriverError {
    #[error("Malformed report: {len} byte(s), too short to decode")]
    MalformedReport { len: usize },

    #[error("Event buffer full, dropped {dropped} byte(s)")]
    BufferOverflow { dropped: usize },

    #[error("No device connected")]
    NoDevice,

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Bad read request: {0}")]
    ConsumerAccess(String),

    #[error("Unsupported control command 0x{0:04X}")]
    UnsupportedCommand(u32),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl DriverError {
    /// errno-style code, as a device node would report it
    pub fn code(&self) -> i32 {
        match self {
            DriverError::NoDevice => -19,              // ENODEV
            DriverError::Transport(e) => e.code(),
            DriverError::ConsumerAccess(_) => -14,     // EFAULT
            DriverError::UnsupportedCommand(_) => -25, // ENOTTY
            DriverError::MalformedReport { .. }
            | DriverError::BufferOverflow { .. }
            | DriverError::Config(_) => -22, // EINVAL
        }
    }
}

/// Result alias for driver operations
pub type Result<T> = std::result::Result<T, DriverError>;
