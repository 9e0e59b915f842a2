//! Printer middleware for monitoring transport traffic
//!
//! Wraps a [`Transport`] and/or a [`ReportHandler`] and prints every output
//! report and input report passing through it as a hex line on stderr.
//! Stdout is left alone so the decoded event stream stays clean.
//!
//! [`RawDumpHandler`] is the exception: it writes `received report: ..`
//! lines to a caller-chosen writer, for dumping raw reports next to the
//! decoded stream.
//!
//! # Example
//!
//! ```ignore
//! use wiimote_transport::{PrinterHandler, PrinterTransport};
//!
//! let transport = PrinterTransport::wrap(transport);
//! let handler = PrinterHandler::wrap(driver);
//! ```

use std::io::Write;
use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;
use tracing::warn;

use crate::{hex_line, ReportHandler, Transport, TransportDeviceInfo, TransportError};

/// Direction of a monitored packet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Output report, host to remote
    Out,
    /// Input report, remote to host
    In,
}

impl Direction {
    fn arrow(&self) -> &'static str {
        match self {
            Direction::Out => ">>",
            Direction::In => "<<",
        }
    }
}

/// Format one monitor line: `[   1.234] >> 15 00`
pub fn format_packet(elapsed_secs: f64, direction: Direction, data: &[u8]) -> String {
    format!(
        "[{:>8.3}] {} {}",
        elapsed_secs,
        direction.arrow(),
        hex_line(data)
    )
}

/// Transport middleware that prints all output reports
pub struct PrinterTransport {
    inner: Arc<dyn Transport>,
    start: Instant,
}

impl PrinterTransport {
    /// Wrap a transport with printing middleware
    pub fn wrap(transport: Arc<dyn Transport>) -> Arc<dyn Transport> {
        Arc::new(Self {
            inner: transport,
            start: Instant::now(),
        })
    }
}

impl Transport for PrinterTransport {
    fn send_command(&self, data: &[u8]) -> Result<(), TransportError> {
        eprintln!(
            "{}",
            format_packet(self.start.elapsed().as_secs_f64(), Direction::Out, data)
        );
        let result = self.inner.send_command(data);
        if let Err(ref e) = result {
            eprintln!("           !! {e}");
        }
        result
    }

    fn device_info(&self) -> &TransportDeviceInfo {
        self.inner.device_info()
    }

    fn is_connected(&self) -> bool {
        self.inner.is_connected()
    }
}

/// Handler middleware that prints all input reports and link changes
pub struct PrinterHandler {
    inner: Arc<dyn ReportHandler>,
    start: Instant,
}

impl PrinterHandler {
    /// Wrap a report handler with printing middleware
    pub fn wrap(handler: Arc<dyn ReportHandler>) -> Arc<dyn ReportHandler> {
        Arc::new(Self {
            inner: handler,
            start: Instant::now(),
        })
    }

    fn elapsed(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}

impl ReportHandler for PrinterHandler {
    fn on_connect(&self) {
        eprintln!("[{:>8.3}] -- connected", self.elapsed());
        self.inner.on_connect();
    }

    fn on_disconnect(&self) {
        eprintln!("[{:>8.3}] -- disconnected", self.elapsed());
        self.inner.on_disconnect();
    }

    fn on_report(&self, data: &[u8]) {
        eprintln!("{}", format_packet(self.elapsed(), Direction::In, data));
        self.inner.on_report(data);
    }
}

/// Format one raw dump line: `received report: 31 01 08`
pub fn format_raw_report(data: &[u8]) -> String {
    format!("received report: {}", hex_line(data))
}

/// Handler middleware that writes every input report as a hex line
pub struct RawDumpHandler<W> {
    inner: Arc<dyn ReportHandler>,
    out: Mutex<W>,
}

impl<W: Write + Send + 'static> RawDumpHandler<W> {
    /// Wrap a report handler, dumping reports to `out` before forwarding them
    pub fn wrap(handler: Arc<dyn ReportHandler>, out: W) -> Arc<dyn ReportHandler> {
        Arc::new(Self {
            inner: handler,
            out: Mutex::new(out),
        })
    }
}

impl<W: Write + Send> ReportHandler for RawDumpHandler<W> {
    fn on_connect(&self) {
        self.inner.on_connect();
    }

    fn on_disconnect(&self) {
        self.inner.on_disconnect();
    }

    fn on_report(&self, data: &[u8]) {
        {
            let mut out = self.out.lock();
            if let Err(e) = writeln!(out, "{}", format_raw_report(data)).and_then(|_| out.flush()) {
                warn!("Raw report dump failed: {}", e);
            }
        }
        self.inner.on_report(data);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MockTransport;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct Collect {
        reports: Mutex<Vec<Vec<u8>>>,
        links: Mutex<Vec<bool>>,
    }

    impl ReportHandler for Collect {
        fn on_connect(&self) {
            self.links.lock().push(true);
        }
        fn on_disconnect(&self) {
            self.links.lock().push(false);
        }
        fn on_report(&self, data: &[u8]) {
            self.reports.lock().push(data.to_vec());
        }
    }

    #[test]
    fn test_format_packet() {
        assert_eq!(
            format_packet(1.5, Direction::Out, &[0x15, 0x00]),
            "[   1.500] >> 15 00"
        );
        assert_eq!(
            format_packet(0.0, Direction::In, &[0x20, 0x2a]),
            "[   0.000] << 20 2a"
        );
    }

    #[test]
    fn test_transport_passthrough() {
        let mock = Arc::new(MockTransport::new());
        let printer = PrinterTransport::wrap(mock.clone());
        printer.send_command(&[0x15, 0x00]).unwrap();
        assert_eq!(mock.sent(), vec![vec![0x15, 0x00]]);

        mock.set_failure(Some(-5));
        assert!(printer.send_command(&[0x15, 0x00]).is_err());
    }

    #[test]
    fn test_handler_passthrough() {
        let collect = Arc::new(Collect::default());
        let printer = PrinterHandler::wrap(collect.clone());
        printer.on_connect();
        printer.on_report(&[0x31, 0x01, 0x08]);
        printer.on_disconnect();
        assert_eq!(*collect.reports.lock(), vec![vec![0x31, 0x01, 0x08]]);
        assert_eq!(*collect.links.lock(), vec![true, false]);
    }

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_raw_dump_lines() {
        let collect = Arc::new(Collect::default());
        let buf = SharedBuf::default();
        let dump = RawDumpHandler::wrap(collect.clone(), buf.clone());

        dump.on_connect();
        dump.on_report(&[0x31, 0x01, 0x08]);
        dump.on_report(&[0x20, 0x2a]);
        dump.on_disconnect();

        let text = String::from_utf8(buf.0.lock().clone()).unwrap();
        assert_eq!(text, "received report: 31 01 08\nreceived report: 20 2a\n");
        assert_eq!(collect.reports.lock().len(), 2);
        assert_eq!(*collect.links.lock(), vec![true, false]);
    }
}
