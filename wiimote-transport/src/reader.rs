//! Reader thread for inbound input reports
//!
//! Each hardware transport owns one reader thread. The thread is the only
//! caller of its [`ReportHandler`], so handler callbacks for one device are
//! never concurrent with each other.
//!
//! The thread holds the handler weakly. A handler usually owns the
//! transport that owns this thread, and a strong reference here would keep
//! both alive forever.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use hidapi::HidDevice;
use tracing::{debug, warn};

use crate::error::TransportError;
use crate::{hex_line, ReportHandler};

/// Largest input report the remote sends (extension data modes top out at 22)
const MAX_REPORT_SIZE: usize = 32;

/// Configuration for the reader loop
#[derive(Debug, Clone)]
pub(crate) struct ReaderConfig {
    /// Read timeout in milliseconds (for checking shutdown flag when idle)
    pub read_timeout_ms: i32,
    /// Sleep duration on error before retrying
    pub error_sleep_ms: u64,
    /// Consecutive read errors after which the device is considered gone
    pub max_consecutive_errors: u32,
    /// Name prefix for debug logging and the thread name
    pub name: &'static str,
}

impl ReaderConfig {
    /// Configuration for a Bluetooth Wii Remote
    pub fn bluetooth() -> Self {
        Self {
            read_timeout_ms: 10,
            error_sleep_ms: 100,
            max_consecutive_errors: 3,
            name: "wiimote",
        }
    }
}

/// Anything the reader loop can pull input reports from
pub(crate) trait InputSource: Send {
    /// Read one report; `Ok(0)` means the timeout elapsed
    fn read_report(&mut self, buf: &mut [u8], timeout_ms: i32) -> Result<usize, TransportError>;
}

impl InputSource for HidDevice {
    fn read_report(&mut self, buf: &mut [u8], timeout_ms: i32) -> Result<usize, TransportError> {
        Ok(self.read_timeout(buf, timeout_ms)?)
    }
}

/// Reader loop for an input source
///
/// Calls `on_connect` once, `on_report` for every input report, and
/// `on_disconnect` once on exit (device error or shutdown). `connected` is
/// cleared before `on_disconnect` runs. The loop also ends, without a
/// disconnect notification, once the handler has been dropped.
pub(crate) fn run_reader_loop<S: InputSource>(
    mut input: S,
    handler: Weak<dyn ReportHandler>,
    connected: Arc<AtomicBool>,
    shutdown: Arc<AtomicBool>,
    config: ReaderConfig,
) {
    debug!("{} reader thread started", config.name);
    let mut buf = [0u8; MAX_REPORT_SIZE];
    let mut errors = 0u32;

    connected.store(true, Ordering::SeqCst);
    match handler.upgrade() {
        Some(h) => h.on_connect(),
        None => {
            connected.store(false, Ordering::SeqCst);
            debug!("{} handler gone before start", config.name);
            return;
        }
    }

    while !shutdown.load(Ordering::Relaxed) {
        // Timeout only affects how often we check shutdown flag when idle
        match input.read_report(&mut buf, config.read_timeout_ms) {
            Ok(len) if len > 0 => {
                errors = 0;
                debug!("{} received report: {}", config.name, hex_line(&buf[..len]));
                let Some(h) = handler.upgrade() else {
                    debug!("{} handler dropped, stopping", config.name);
                    break;
                };
                h.on_report(&buf[..len]);
            }
            Ok(_) => {
                if handler.strong_count() == 0 {
                    debug!("{} handler dropped, stopping", config.name);
                    break;
                }
            }
            Err(e) => {
                errors += 1;
                warn!("{} reader error ({}): {}", config.name, errors, e);
                if errors >= config.max_consecutive_errors {
                    break;
                }
                std::thread::sleep(Duration::from_millis(config.error_sleep_ms));
            }
        }
    }

    connected.store(false, Ordering::SeqCst);
    if let Some(h) = handler.upgrade() {
        h.on_disconnect();
    }
    debug!("{} reader thread exiting", config.name);
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::collections::VecDeque;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Seen {
        Connect,
        Report(Vec<u8>),
        Disconnect,
    }

    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<Seen>>,
    }

    impl ReportHandler for Recorder {
        fn on_connect(&self) {
            self.seen.lock().push(Seen::Connect);
        }
        fn on_disconnect(&self) {
            self.seen.lock().push(Seen::Disconnect);
        }
        fn on_report(&self, data: &[u8]) {
            self.seen.lock().push(Seen::Report(data.to_vec()));
        }
    }

    /// Plays back scripted reads, then errors forever
    struct Scripted(VecDeque<Result<Vec<u8>, TransportError>>);

    impl InputSource for Scripted {
        fn read_report(&mut self, buf: &mut [u8], _: i32) -> Result<usize, TransportError> {
            match self.0.pop_front() {
                Some(Ok(data)) => {
                    buf[..data.len()].copy_from_slice(&data);
                    Ok(data.len())
                }
                Some(Err(e)) => Err(e),
                None => Err(TransportError::Disconnected),
            }
        }
    }

    fn fast_config() -> ReaderConfig {
        ReaderConfig {
            error_sleep_ms: 0,
            ..ReaderConfig::bluetooth()
        }
    }

    fn flags() -> (Arc<AtomicBool>, Arc<AtomicBool>) {
        (
            Arc::new(AtomicBool::new(false)),
            Arc::new(AtomicBool::new(false)),
        )
    }

    #[test]
    fn test_delivers_reports_then_disconnects_after_errors() {
        let recorder = Arc::new(Recorder::default());
        let handler: Arc<dyn ReportHandler> = recorder.clone();
        let (connected, shutdown) = flags();
        let source = Scripted(VecDeque::from([
            Ok(vec![0x31, 0x01, 0x08]),
            Ok(vec![]),
            Err(TransportError::HidError("io".into())),
            Ok(vec![0x20, 0x2a]),
        ]));

        run_reader_loop(
            source,
            Arc::downgrade(&handler),
            connected.clone(),
            shutdown,
            fast_config(),
        );

        assert_eq!(
            *recorder.seen.lock(),
            vec![
                Seen::Connect,
                Seen::Report(vec![0x31, 0x01, 0x08]),
                Seen::Report(vec![0x20, 0x2a]),
                Seen::Disconnect,
            ]
        );
        assert!(!connected.load(Ordering::SeqCst));
    }

    #[test]
    fn test_shutdown_flag_stops_loop() {
        let recorder = Arc::new(Recorder::default());
        let handler: Arc<dyn ReportHandler> = recorder.clone();
        let (connected, shutdown) = flags();
        shutdown.store(true, Ordering::SeqCst);

        run_reader_loop(
            Scripted(VecDeque::from([Ok(vec![0x30, 0x00, 0x00])])),
            Arc::downgrade(&handler),
            connected,
            shutdown,
            fast_config(),
        );

        assert_eq!(*recorder.seen.lock(), vec![Seen::Connect, Seen::Disconnect]);
    }

    #[test]
    fn test_dropped_handler_ends_thread() {
        let handler: Arc<dyn ReportHandler> = Arc::new(Recorder::default());
        let weak = Arc::downgrade(&handler);
        let (connected, shutdown) = flags();

        // idle reads forever; only the handler going away can stop this
        struct Idle;
        impl InputSource for Idle {
            fn read_report(&mut self, _: &mut [u8], _: i32) -> Result<usize, TransportError> {
                std::thread::sleep(Duration::from_millis(1));
                Ok(0)
            }
        }

        let thread = std::thread::spawn({
            let connected = connected.clone();
            move || run_reader_loop(Idle, weak, connected, shutdown, fast_config())
        });

        while !connected.load(Ordering::SeqCst) {
            std::thread::yield_now();
        }
        drop(handler);
        thread.join().unwrap();
        assert!(!connected.load(Ordering::SeqCst));
    }

    #[test]
    fn test_handler_gone_before_start() {
        let weak = {
            let handler: Arc<dyn ReportHandler> = Arc::new(Recorder::default());
            Arc::downgrade(&handler)
        };
        let (connected, shutdown) = flags();
        run_reader_loop(
            Scripted(VecDeque::new()),
            weak,
            connected.clone(),
            shutdown,
            fast_config(),
        );
        assert!(!connected.load(Ordering::SeqCst));
    }
}
