//! Command handlers for the CLI application.
//!
//! - `device`: commands that talk to an attached remote once (list, state)
//! - `listen`: the streaming consumer loop
//! - `replay`: offline script replay through a mock transport

pub mod device;
pub mod listen;
pub mod replay;

use std::io::Write;
use std::sync::Arc;

use anyhow::Result;
use wiimote_driver::{DriverConfig, WiimoteDriver};
use wiimote_transport::{
    BoxedHandler, BoxedTransport, HidDiscovery, HidRemoteTransport, PrinterHandler,
    PrinterTransport, RawDumpHandler,
};

/// An opened remote with a driver bound to its reader thread
///
/// The reader thread stops when the session is closed or dropped.
pub struct Session {
    pub hid: Arc<HidRemoteTransport>,
    pub driver: Arc<WiimoteDriver>,
    /// Keeps the handler chain alive; the reader only holds it weakly
    _handler: BoxedHandler,
}

impl Session {
    /// Open the first remote, build a driver around it, and start reading.
    /// With `monitor`, both directions are wrapped with the printer.
    pub fn open(config: DriverConfig, monitor: bool) -> Result<Self> {
        Self::open_with(config, monitor, false)
    }

    /// Like [`open`](Self::open); with `raw`, every input report is also
    /// dumped as a hex line on stdout.
    pub fn open_with(config: DriverConfig, monitor: bool, raw: bool) -> Result<Self> {
        let hid = Arc::new(HidDiscovery::new().open_first()?);

        let transport: BoxedTransport = if monitor {
            PrinterTransport::wrap(hid.clone())
        } else {
            hid.clone()
        };
        let driver = Arc::new(WiimoteDriver::new(config, transport)?);

        let mut handler: BoxedHandler = driver.clone();
        if raw {
            handler = RawDumpHandler::wrap(handler, std::io::stdout());
        }
        if monitor {
            handler = PrinterHandler::wrap(handler);
        }
        hid.start(&handler)?;

        Ok(Self {
            hid,
            driver,
            _handler: handler,
        })
    }

    pub fn close(&self) {
        self.hid.close();
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.close();
    }
}

/// Drain everything buffered in the driver to `out`, `chunk` bytes per read
pub fn drain_to<W: Write>(driver: &WiimoteDriver, chunk: usize, out: &mut W) -> Result<usize> {
    let mut total = 0;
    loop {
        let bytes = driver.read(chunk)?;
        if bytes.is_empty() {
            break;
        }
        total += bytes.len();
        out.write_all(&bytes)?;
    }
    out.flush()?;
    Ok(total)
}
