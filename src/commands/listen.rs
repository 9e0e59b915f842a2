//! Streaming consumer: poll the driver and copy events to stdout

use std::time::Duration;

use anyhow::Result;
use tokio::time::{interval, Interval, MissedTickBehavior};
use tracing::{info, warn};
use wiimote_driver::DriverConfig;

use super::{drain_to, Session};

/// Wait for the next tick, or forever when there is no timer
async fn tick(timer: &mut Option<Interval>) {
    match timer {
        Some(t) => {
            t.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}

/// Stream decoded events until Ctrl-C or the remote disconnects
pub async fn listen(
    mut config: DriverConfig,
    monitor: bool,
    status: bool,
    status_every: Option<u64>,
    raw: bool,
) -> Result<()> {
    config.request_status_on_connect |= status;
    let chunk = config.read_chunk;
    let mut poll = interval(Duration::from_millis(config.poll_interval_ms));
    poll.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let session = Session::open_with(config, monitor, raw)?;
    let driver = &session.driver;

    let mut status_timer = status_every.filter(|&s| s > 0).map(|secs| {
        let mut t = interval(Duration::from_secs(secs));
        t.set_missed_tick_behavior(MissedTickBehavior::Delay);
        t
    });

    info!("Reading Wii Remote input (Ctrl-C to stop)");
    let stdout = std::io::stdout();
    let mut seen_connected = false;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = &mut ctrl_c => {
                info!("Interrupted");
                break;
            }
            _ = poll.tick() => {
                drain_to(driver, chunk, &mut stdout.lock())?;
                let connected = driver.connection_state().is_connected();
                seen_connected |= connected;
                if seen_connected && !connected {
                    warn!("Remote disconnected, stopping");
                    break;
                }
            }
            _ = tick(&mut status_timer) => {
                if let Err(e) = driver.request_status() {
                    warn!("Periodic status request failed: {}", e);
                }
            }
        }
    }

    session.close();
    drain_to(driver, chunk, &mut stdout.lock())?;
    eprint!("{}", driver.snapshot());
    Ok(())
}
