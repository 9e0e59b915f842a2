//! One-shot device commands: list, state

use std::time::Duration;

use anyhow::Result;
use tracing::warn;
use wiimote_driver::DriverConfig;
use wiimote_transport::HidDiscovery;

use super::Session;

/// List attached remotes
pub fn list() -> Result<()> {
    let devices = HidDiscovery::new().list_devices()?;
    if devices.is_empty() {
        println!("No Wii Remote found");
        return Ok(());
    }

    for (i, device) in devices.iter().enumerate() {
        let info = &device.info;
        println!(
            "{}: {} ({:04x}:{:04x})",
            i,
            info.product_name.as_deref().unwrap_or("Wii Remote"),
            info.vid,
            info.pid
        );
        println!("   Path:    {}", info.device_path);
        if let Some(ref serial) = info.serial {
            println!("   Address: {serial}");
        }
    }
    Ok(())
}

/// Connect, ask for a status report, and print the driver state
pub async fn state(mut config: DriverConfig, monitor: bool, wait_ms: u64) -> Result<()> {
    config.request_status_on_connect = true;
    let session = Session::open(config, monitor)?;

    tokio::time::sleep(Duration::from_millis(wait_ms)).await;
    let snapshot = session.driver.snapshot();
    session.close();

    if snapshot.status_pending {
        warn!("No status report within {} ms", wait_ms);
    }
    print!("{snapshot}");
    Ok(())
}
