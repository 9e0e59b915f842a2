//! HID transport for a Wii Remote paired over Bluetooth

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use hidapi::HidDevice;
use parking_lot::Mutex;
use tracing::{debug, info};

use crate::error::TransportError;
use crate::reader::{run_reader_loop, ReaderConfig};
use crate::types::TransportDeviceInfo;
use crate::{hex_line, ReportHandler, Transport};

/// HID transport for a Bluetooth Wii Remote
///
/// The hidraw node is opened twice: one handle stays here for output
/// reports, the other is moved into the reader thread by [`start`].
///
/// The reader thread only holds the handler weakly, so a handler that owns
/// this transport does not keep it alive. Dropping the transport, or
/// calling [`close`], stops the thread and delivers `on_disconnect` if the
/// handler is still around.
///
/// [`start`]: HidRemoteTransport::start
/// [`close`]: HidRemoteTransport::close
pub struct HidRemoteTransport {
    /// Output interface for commands
    output_device: Mutex<HidDevice>,
    /// Input interface, taken by the reader thread on start
    input_device: Mutex<Option<HidDevice>>,
    /// Device information
    info: TransportDeviceInfo,
    /// Set while the reader thread is running against a live device
    connected: Arc<AtomicBool>,
    /// Shutdown flag for reader thread
    shutdown: Arc<AtomicBool>,
    /// Reader thread handle
    reader: Mutex<Option<JoinHandle<()>>>,
    reader_config: ReaderConfig,
}

impl HidRemoteTransport {
    /// Create a new transport from two handles to the same hidraw node
    ///
    /// # Arguments
    /// * `output_device` - HID device used for output reports
    /// * `input_device` - HID device used for input reports
    /// * `info` - Device information
    pub fn new(output_device: HidDevice, input_device: HidDevice, info: TransportDeviceInfo) -> Self {
        Self {
            output_device: Mutex::new(output_device),
            input_device: Mutex::new(Some(input_device)),
            info,
            connected: Arc::new(AtomicBool::new(false)),
            shutdown: Arc::new(AtomicBool::new(false)),
            reader: Mutex::new(None),
            reader_config: ReaderConfig::bluetooth(),
        }
    }

    /// Spawn the reader thread, delivering reports to `handler`
    ///
    /// The caller keeps `handler` alive for as long as reports should flow;
    /// the thread stops on its own once the last strong reference is gone.
    /// Can only be called once per transport.
    pub fn start(&self, handler: &Arc<dyn ReportHandler>) -> Result<(), TransportError> {
        let input = self
            .input_device
            .lock()
            .take()
            .ok_or_else(|| TransportError::Internal("reader already started".into()))?;

        let connected = Arc::clone(&self.connected);
        let shutdown = Arc::clone(&self.shutdown);
        let config = self.reader_config.clone();
        let handler = Arc::downgrade(handler);

        let handle = std::thread::Builder::new()
            .name(format!("{}-reader", config.name))
            .spawn(move || run_reader_loop(input, handler, connected, shutdown, config))
            .map_err(|e| TransportError::Internal(format!("failed to spawn reader: {e}")))?;

        *self.reader.lock() = Some(handle);
        info!("Reader started for {}", self.info.device_path);
        Ok(())
    }

    /// Stop the reader thread and wait for its disconnect notification
    pub fn close(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
        let handle = self.reader.lock().take();
        if let Some(handle) = handle {
            if handle.thread().id() != std::thread::current().id() {
                let _ = handle.join();
            }
        }
    }
}

impl Transport for HidRemoteTransport {
    fn send_command(&self, data: &[u8]) -> Result<(), TransportError> {
        if !self.is_connected() {
            return Err(TransportError::Disconnected);
        }
        debug!("Sending output report: {}", hex_line(data));
        let device = self.output_device.lock();
        let written = device.write(data)?;
        if written != data.len() {
            return Err(TransportError::HidError(format!(
                "short write: {written} of {} bytes",
                data.len()
            )));
        }
        Ok(())
    }

    fn device_info(&self) -> &TransportDeviceInfo {
        &self.info
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}

impl Drop for HidRemoteTransport {
    fn drop(&mut self) {
        self.close();
    }
}
