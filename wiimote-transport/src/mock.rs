//! In-memory transport
//!
//! Records every output report instead of sending it. Used by tests and by
//! the offline replay mode, where there is no remote to talk to.

use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;

use crate::error::TransportError;
use crate::types::{TransportDeviceInfo, TransportType};
use crate::{device_registry, Transport};

#[derive(Debug)]
pub struct MockTransport {
    info: TransportDeviceInfo,
    sent: Mutex<Vec<Vec<u8>>>,
    fail_with: Mutex<Option<i32>>,
    connected: AtomicBool,
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            info: TransportDeviceInfo {
                vid: device_registry::VENDOR_ID,
                pid: device_registry::PID_WII_REMOTE,
                transport_type: TransportType::Mock,
                device_path: "mock".to_string(),
                serial: None,
                product_name: Some("Nintendo RVL-CNT-01".to_string()),
            },
            sent: Mutex::new(Vec::new()),
            fail_with: Mutex::new(None),
            connected: AtomicBool::new(true),
        }
    }

    /// Make subsequent sends fail with `Rejected { code }` (`None` to clear)
    pub fn set_failure(&self, code: Option<i32>) {
        *self.fail_with.lock() = code;
    }

    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
    }

    /// Output reports sent so far, oldest first
    pub fn sent(&self) -> Vec<Vec<u8>> {
        self.sent.lock().clone()
    }
}

impl Transport for MockTransport {
    fn send_command(&self, data: &[u8]) -> Result<(), TransportError> {
        if let Some(code) = *self.fail_with.lock() {
            return Err(TransportError::Rejected { code });
        }
        self.sent.lock().push(data.to_vec());
        Ok(())
    }

    fn device_info(&self) -> &TransportDeviceInfo {
        &self.info
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_commands_in_order() {
        let mock = MockTransport::new();
        mock.send_command(&[0x15, 0x00]).unwrap();
        mock.send_command(&[0x11, 0x10]).unwrap();
        assert_eq!(mock.sent(), vec![vec![0x15, 0x00], vec![0x11, 0x10]]);
    }

    #[test]
    fn test_failure_is_not_recorded() {
        let mock = MockTransport::new();
        mock.set_failure(Some(-32));
        let err = mock.send_command(&[0x15, 0x00]).unwrap_err();
        assert!(matches!(err, TransportError::Rejected { code: -32 }));
        assert!(mock.sent().is_empty());

        mock.set_failure(None);
        assert!(mock.send_command(&[0x15, 0x00]).is_ok());
        assert_eq!(mock.sent().len(), 1);
    }

    #[test]
    fn test_device_info() {
        let mock = MockTransport::new();
        assert_eq!(mock.device_info().transport_type, TransportType::Mock);
        assert!(!mock.device_info().transport_type.is_hardware());
        assert!(mock.is_connected());
        mock.set_connected(false);
        assert!(!mock.is_connected());
    }
}
