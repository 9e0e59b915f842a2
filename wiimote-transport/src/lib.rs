//! Transport abstraction layer for Wii Remote communication
//!
//! This crate is the seam between the report-mapping core and the host bus:
//!
//! - [`Transport`] carries outbound output reports to the remote
//! - [`ReportHandler`] receives connect/disconnect notifications and raw
//!   input reports from the remote
//!
//! Backends:
//!
//! - HID over Bluetooth (hidraw node exposed by the kernel's HID stack)
//! - Mock (in-memory, records commands; for tests and offline replay)

pub mod device_registry;
pub mod error;
pub mod mock;
pub mod printer;
pub mod types;

mod discovery;
mod hid_remote;
mod reader;

pub use device_registry::{is_wiimote, PID_WII_REMOTE, VENDOR_ID};
pub use error::TransportError;
pub use mock::MockTransport;
pub use printer::{PrinterHandler, PrinterTransport, RawDumpHandler};
pub use types::{DiscoveredDevice, TransportDeviceInfo, TransportType};

pub use discovery::HidDiscovery;
pub use hid_remote::HidRemoteTransport;

use std::sync::Arc;

/// Outbound half of the transport - all backends implement this
///
/// The core only ever originates one kind of traffic (the status request),
/// so the trait is deliberately narrow.
pub trait Transport: Send + Sync {
    /// Send a raw output report to the remote
    ///
    /// # Arguments
    /// * `data` - Full report, first byte is the report number (e.g. `0x15`)
    fn send_command(&self, data: &[u8]) -> Result<(), TransportError>;

    /// Get device information
    fn device_info(&self) -> &TransportDeviceInfo;

    /// Check if transport is still connected
    fn is_connected(&self) -> bool;
}

/// Inbound half of the transport
///
/// Invoked from the transport's reader context, never concurrently with
/// itself for one device. Implementations must not block.
pub trait ReportHandler: Send + Sync {
    /// The remote is attached and about to deliver reports
    fn on_connect(&self);

    /// The remote went away; no further reports follow
    fn on_disconnect(&self);

    /// A raw input report arrived (byte 0 is the report identifier)
    fn on_report(&self, data: &[u8]);
}

/// Type alias for a shared transport
pub type BoxedTransport = Arc<dyn Transport>;

/// Type alias for a shared report handler
pub type BoxedHandler = Arc<dyn ReportHandler>;

/// Format bytes as space-separated lowercase hex (`"31 01 08"`)
pub fn hex_line(data: &[u8]) -> String {
    data.iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_line() {
        assert_eq!(hex_line(&[0x31, 0x01, 0x08]), "31 01 08");
        assert_eq!(hex_line(&[]), "");
    }
}
