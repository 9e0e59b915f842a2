//! Transport error types

use thiserror::Error;

/// Errors that can occur during transport operations
#[derive(Error, Debug)]
pub enum TransportError {
    // Common errors
    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    #[error("Device disconnected")]
    Disconnected,

    /// The backend refused the output report with a numeric status
    #[error("Command rejected by transport (code {code})")]
    Rejected { code: i32 },

    // HID-specific errors
    #[error("HID error: {0}")]
    HidError(String),

    #[error("HID permission denied: {0}")]
    HidPermissionDenied(String),

    // Generic
    #[error("Internal error: {0}")]
    Internal(String),
}

impl TransportError {
    /// Numeric code for callers that surface errno-style values
    pub fn code(&self) -> i32 {
        match self {
            TransportError::Rejected { code } => *code,
            TransportError::DeviceNotFound(_) | TransportError::Disconnected => -19, // ENODEV
            TransportError::HidPermissionDenied(_) => -1,                           // EPERM
            TransportError::HidError(_) | TransportError::Internal(_) => -5,         // EIO
        }
    }
}

impl From<hidapi::HidError> for TransportError {
    fn from(e: hidapi::HidError) -> Self {
        let msg = e.to_string();
        if msg.contains("Permission denied") || msg.contains("EPERM") {
            TransportError::HidPermissionDenied(msg)
        } else {
            TransportError::HidError(msg)
        }
    }
}
