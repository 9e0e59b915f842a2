//! Offline replay of report scripts
//!
//! A script is one step per line:
//!
//! ```text
//! # comment
//! connect
//! 31 01 08        # raw report, hex bytes
//! status          # request a status report
//! 20 2a
//! disconnect
//! ```
//!
//! Hex bytes may be separated by spaces or commas and may carry a `0x`
//! prefix.

use thiserror::Error;
use tracing::warn;

use crate::driver::WiimoteDriver;

/// One scripted transport event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplayStep {
    Connect,
    Disconnect,
    /// Control-path status request
    Status,
    Report(Vec<u8>),
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("line {line}: {message}")]
pub struct ParseError {
    pub line: usize,
    pub message: String,
}

fn parse_byte(token: &str) -> Option<u8> {
    let hex = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
        .unwrap_or(token);
    u8::from_str_radix(hex, 16).ok()
}

/// Parse a replay script
pub fn parse_script(script: &str) -> Result<Vec<ReplayStep>, ParseError> {
    let mut steps = Vec::new();

    for (idx, raw_line) in script.lines().enumerate() {
        let line = raw_line.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }

        let step = match line.to_ascii_lowercase().as_str() {
            "connect" => ReplayStep::Connect,
            "disconnect" => ReplayStep::Disconnect,
            "status" => ReplayStep::Status,
            _ => {
                let bytes = line
                    .split(|c: char| c.is_whitespace() || c == ',')
                    .filter(|t| !t.is_empty())
                    .map(|t| {
                        parse_byte(t).ok_or_else(|| ParseError {
                            line: idx + 1,
                            message: format!("invalid hex byte \"{t}\""),
                        })
                    })
                    .collect::<Result<Vec<u8>, ParseError>>()?;
                ReplayStep::Report(bytes)
            }
        };
        steps.push(step);
    }

    Ok(steps)
}

/// Feed steps through the driver's transport-facing callbacks
///
/// Status request failures are logged and replay continues, the same way a
/// control-path caller would see and ignore them.
pub fn run_steps(driver: &WiimoteDriver, steps: &[ReplayStep]) {
    for step in steps {
        match step {
            ReplayStep::Connect => driver.handle_connect(),
            ReplayStep::Disconnect => driver.handle_disconnect(),
            ReplayStep::Status => {
                if let Err(e) = driver.request_status() {
                    warn!("Replay status request failed: {}", e);
                }
            }
            ReplayStep::Report(bytes) => driver.handle_report(bytes),
        }
    }
}
