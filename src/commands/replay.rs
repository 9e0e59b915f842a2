//! Offline replay through a mock transport

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use wiimote_driver::replay::{parse_script, run_steps};
use wiimote_driver::{DriverConfig, WiimoteDriver};
use wiimote_transport::{BoxedTransport, MockTransport, PrinterTransport};

use super::drain_to;

/// Replay a script file, printing the event stream and final state
pub fn replay(config: DriverConfig, monitor: bool, file: &Path, batch: bool) -> Result<()> {
    let script = std::fs::read_to_string(file)
        .with_context(|| format!("reading {}", file.display()))?;
    let steps = parse_script(&script)?;
    info!("Replaying {} step(s) from {}", steps.len(), file.display());

    let mock = Arc::new(MockTransport::new());
    let transport: BoxedTransport = if monitor {
        PrinterTransport::wrap(mock.clone())
    } else {
        mock.clone()
    };
    let chunk = config.read_chunk;
    let driver = WiimoteDriver::new(config, transport)?;

    let mut stdout = std::io::stdout();
    if batch {
        run_steps(&driver, &steps);
    } else {
        for step in &steps {
            run_steps(&driver, std::slice::from_ref(step));
            drain_to(&driver, chunk, &mut stdout)?;
        }
    }
    drain_to(&driver, chunk, &mut stdout)?;

    info!("{} status request(s) sent", mock.sent().len());
    eprint!("{}", driver.snapshot());
    Ok(())
}
