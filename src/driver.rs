//! Driver context: ingestion, status query, and read surface
//!
//! One [`WiimoteDriver`] per remote. It owns the event ring buffer and the
//! connection state, and holds the outbound transport. The transport's
//! reader thread drives it through [`ReportHandler`]; consumers call
//! [`read`](WiimoteDriver::read) and [`request_status`](WiimoteDriver::request_status)
//! from their own threads.
//!
//! Nothing on the ingestion side returns an error: there is no caller to
//! hand it to, so problems are logged and the report is dropped.

use parking_lot::Mutex;
use tracing::{debug, error, info, warn};
use wiimote_transport::{hex_line, BoxedTransport, ReportHandler};

use crate::config::DriverConfig;
use crate::decoder::{decode_with_limit, status_line};
use crate::error::{DriverError, Result};
use crate::protocol::{cmd, control, report};
use crate::ring_buffer::RingBuffer;
use crate::state::{ConnectionState, DeviceState, StateSnapshot};

pub struct WiimoteDriver {
    config: DriverConfig,
    buffer: RingBuffer,
    state: Mutex<DeviceState>,
    transport: BoxedTransport,
}

impl WiimoteDriver {
    /// Create a driver context; the remote starts out disconnected
    pub fn new(config: DriverConfig, transport: BoxedTransport) -> Result<Self> {
        config.validate()?;
        let buffer = RingBuffer::new(config.buffer_capacity)?;
        Ok(Self {
            config,
            buffer,
            state: Mutex::new(DeviceState::default()),
            transport,
        })
    }

    // === Ingestion ===

    /// Handle one raw input report
    pub fn handle_report(&self, raw: &[u8]) {
        debug!("Received report: {}", hex_line(raw));

        if raw.len() >= report::MIN_STATUS_LEN && raw[0] == report::STATUS {
            let level = raw[1];
            {
                let mut state = self.state.lock();
                state.connected = true;
                state.battery = Some(level);
                state.status_pending = false;
            }
            info!("Battery status report: {}", level);
            self.buffer
                .write(status_line(level, self.config.max_event_len).as_bytes());
            return;
        }

        match decode_with_limit(raw, self.config.max_event_len) {
            Some(event) => {
                debug!("Mapped output: {}", event.as_str().trim_end());
                self.buffer.write(event.as_bytes());
            }
            None => {
                warn!("{}", DriverError::MalformedReport { len: raw.len() });
            }
        }
    }

    /// The transport reports the remote attached
    pub fn handle_connect(&self) {
        self.state.lock().connected = true;
        info!(
            "Wii Remote connected ({})",
            self.transport.device_info().device_path
        );

        if self.config.request_status_on_connect {
            if let Err(e) = self.request_status() {
                error!("Status request on connect failed: {}", e);
            }
        }
    }

    /// The transport reports the remote gone; buffered events stay readable
    pub fn handle_disconnect(&self) {
        {
            let mut state = self.state.lock();
            state.connected = false;
            state.status_pending = false;
        }
        info!("Wii Remote disconnected");
    }

    // === Control surface ===

    /// Ask the remote for a status report
    ///
    /// Returns once the request is sent. The battery level arrives later as
    /// a status report, which updates the state and emits `Battery: <n>`.
    pub fn request_status(&self) -> Result<()> {
        {
            let mut state = self.state.lock();
            if !state.connected {
                error!("Remote not available for status request");
                return Err(DriverError::NoDevice);
            }
            state.status_pending = true;
        }

        info!("Sending battery status request (output report 0x{:02X})", cmd::REQUEST_STATUS);
        if let Err(e) = self.transport.send_command(&cmd::STATUS_REQUEST) {
            error!("Failed to send status request: {}", e);
            self.state.lock().status_pending = false;
            return Err(e.into());
        }
        Ok(())
    }

    /// Dispatch an ioctl-style control code
    pub fn control(&self, code: u32) -> Result<()> {
        match code {
            control::REQUEST_STATUS => self.request_status(),
            other => Err(DriverError::UnsupportedCommand(other)),
        }
    }

    // === Read surface ===

    /// Take up to `max_count` buffered bytes without waiting
    pub fn read(&self, max_count: usize) -> Result<Vec<u8>> {
        if max_count == 0 {
            return Err(DriverError::ConsumerAccess(
                "zero-length read request".into(),
            ));
        }
        Ok(self.buffer.read(max_count))
    }

    /// Copy buffered bytes into `dest` without waiting
    pub fn read_into(&self, dest: &mut [u8]) -> Result<usize> {
        if dest.is_empty() {
            return Err(DriverError::ConsumerAccess(
                "zero-capacity destination".into(),
            ));
        }
        Ok(self.buffer.read_into(dest))
    }

    /// Bytes waiting to be read
    pub fn pending_bytes(&self) -> usize {
        self.buffer.len()
    }

    // === Diagnostics ===

    pub fn connection_state(&self) -> ConnectionState {
        self.state.lock().connection()
    }

    pub fn snapshot(&self) -> StateSnapshot {
        self.state.lock().snapshot()
    }
}

impl ReportHandler for WiimoteDriver {
    fn on_connect(&self) {
        self.handle_connect();
    }

    fn on_disconnect(&self) {
        self.handle_disconnect();
    }

    fn on_report(&self, data: &[u8]) {
        self.handle_report(data);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use wiimote_transport::MockTransport;

    fn driver_with(config: DriverConfig) -> (WiimoteDriver, Arc<MockTransport>) {
        let mock = Arc::new(MockTransport::new());
        let driver = WiimoteDriver::new(config, mock.clone()).unwrap();
        (driver, mock)
    }

    fn driver() -> (WiimoteDriver, Arc<MockTransport>) {
        driver_with(DriverConfig::default())
    }

    fn drain(driver: &WiimoteDriver) -> String {
        String::from_utf8(driver.read(4096).unwrap()).unwrap()
    }

    #[test]
    fn test_starts_disconnected() {
        let (driver, _) = driver();
        assert_eq!(driver.connection_state(), ConnectionState::Disconnected);
        assert_eq!(driver.pending_bytes(), 0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mock = Arc::new(MockTransport::new());
        let config = DriverConfig {
            buffer_capacity: 0,
            ..Default::default()
        };
        assert!(WiimoteDriver::new(config, mock).is_err());
    }

    #[test]
    fn test_button_report_buffered() {
        let (driver, _) = driver();
        driver.on_report(&[0x31, 0x01, 0x08]);
        assert_eq!(drain(&driver), "Report: ID=49, Dpad_LeftA\n");
    }

    #[test]
    fn test_malformed_report_dropped() {
        let (driver, _) = driver();
        driver.on_report(&[]);
        driver.on_report(&[0x31]);
        driver.on_report(&[0x31, 0x01]);
        assert_eq!(driver.pending_bytes(), 0);
    }

    #[test]
    fn test_lone_status_id_is_malformed() {
        let (driver, _) = driver();
        driver.on_connect();
        driver.on_report(&[0x20]);
        assert_eq!(driver.pending_bytes(), 0);
        assert_eq!(driver.connection_state(), ConnectionState::Connected);
    }

    #[test]
    fn test_status_report_bypasses_decoder() {
        let (driver, _) = driver();
        driver.on_connect();
        // would decode as buttons if it reached the decoder
        driver.on_report(&[0x20, 0x55, 0x1f, 0x00]);
        assert_eq!(drain(&driver), "Battery: 85\n");
        assert_eq!(driver.connection_state(), ConnectionState::BatteryKnown(85));
    }

    #[test]
    fn test_status_report_while_disconnected_marks_connected() {
        let (driver, _) = driver();
        driver.on_report(&[report::STATUS, 77]);
        assert_eq!(driver.connection_state(), ConnectionState::BatteryKnown(77));
        assert!(driver.snapshot().connected);
        assert_eq!(drain(&driver), "Battery: 77\n");
    }

    #[test]
    fn test_request_status_requires_connection() {
        let (driver, mock) = driver();
        assert!(matches!(driver.request_status(), Err(DriverError::NoDevice)));
        assert!(mock.sent().is_empty());
    }

    #[test]
    fn test_request_status_sends_fixed_command() {
        let (driver, mock) = driver();
        driver.on_connect();
        driver.request_status().unwrap();
        assert_eq!(mock.sent(), vec![vec![0x15, 0x00]]);
        assert!(driver.snapshot().status_pending);

        driver.on_report(&[0x20, 42]);
        assert!(!driver.snapshot().status_pending);
    }

    #[test]
    fn test_request_status_transport_failure() {
        let (driver, mock) = driver();
        driver.on_connect();
        mock.set_failure(Some(-32));
        let err = driver.request_status().unwrap_err();
        assert!(matches!(err, DriverError::Transport(_)));
        assert_eq!(err.code(), -32);
        assert!(!driver.snapshot().status_pending);

        // not retried, caller may re-invoke
        mock.set_failure(None);
        driver.request_status().unwrap();
        assert_eq!(mock.sent().len(), 1);
    }

    #[test]
    fn test_control_codes() {
        let (driver, mock) = driver();
        driver.on_connect();
        driver.control(control::REQUEST_STATUS).unwrap();
        assert_eq!(mock.sent(), vec![vec![0x15, 0x00]]);

        let err = driver.control(control::io(b'W', 2)).unwrap_err();
        assert!(matches!(err, DriverError::UnsupportedCommand(0x5702)));
    }

    #[test]
    fn test_reconnect_keeps_battery() {
        let (driver, _) = driver();
        driver.on_connect();
        driver.on_report(&[0x20, 60]);
        driver.on_disconnect();
        assert_eq!(driver.connection_state(), ConnectionState::Disconnected);
        assert_eq!(driver.snapshot().battery, Some(60));

        driver.on_connect();
        assert_eq!(driver.connection_state(), ConnectionState::BatteryKnown(60));
    }

    #[test]
    fn test_disconnect_clears_pending_request() {
        let (driver, _) = driver();
        driver.on_connect();
        driver.request_status().unwrap();
        driver.on_disconnect();
        assert!(!driver.snapshot().status_pending);
    }

    #[test]
    fn test_request_status_on_connect() {
        let (driver, mock) = driver_with(DriverConfig {
            request_status_on_connect: true,
            ..Default::default()
        });
        driver.on_connect();
        assert_eq!(mock.sent(), vec![vec![0x15, 0x00]]);
    }

    #[test]
    fn test_request_status_on_connect_failure_is_swallowed() {
        let (driver, mock) = driver_with(DriverConfig {
            request_status_on_connect: true,
            ..Default::default()
        });
        mock.set_failure(Some(-5));
        driver.on_connect();
        assert_eq!(driver.connection_state(), ConnectionState::Connected);
    }

    #[test]
    fn test_zero_length_reads_rejected() {
        let (driver, _) = driver();
        assert!(matches!(driver.read(0), Err(DriverError::ConsumerAccess(_))));
        let mut empty: [u8; 0] = [];
        assert!(matches!(
            driver.read_into(&mut empty),
            Err(DriverError::ConsumerAccess(_))
        ));
    }

    #[test]
    fn test_read_into() {
        let (driver, _) = driver();
        driver.on_report(&[0x30, 0x00, 0x00]);
        let mut dest = [0u8; 8];
        assert_eq!(driver.read_into(&mut dest).unwrap(), 8);
        assert_eq!(&dest, b"No butto");
        assert_eq!(drain(&driver), "ns pressed\n");
        assert_eq!(driver.read_into(&mut dest).unwrap(), 0);
    }

    #[test]
    fn test_overflow_drops_tail_of_event() {
        let (driver, _) = driver_with(DriverConfig {
            buffer_capacity: 32,
            ..Default::default()
        });
        driver.on_report(&[0x30, 0x00, 0x00]); // 19 bytes
        driver.on_report(&[0x30, 0x00, 0x00]); // only 12 fit
        assert_eq!(drain(&driver), "No buttons pressed\nNo buttons p");
    }
}
