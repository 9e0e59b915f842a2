//! Connection state of the remote
//!
//! The battery level is remembered across a disconnect so that a reconnect
//! reports the last known value until a fresh status report arrives.

use std::fmt;

/// Tri-state summary exposed to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connected,
    /// Connected, and a status report has delivered a battery level
    BatteryKnown(u8),
}

impl ConnectionState {
    pub fn is_connected(&self) -> bool {
        !matches!(self, ConnectionState::Disconnected)
    }
}

/// Mutable device state guarded by the driver
#[derive(Debug, Clone, Default)]
pub struct DeviceState {
    pub connected: bool,
    /// Last battery level reported by the remote
    pub battery: Option<u8>,
    /// A status request was sent and no status report has arrived since
    pub status_pending: bool,
}

impl DeviceState {
    pub fn connection(&self) -> ConnectionState {
        match (self.connected, self.battery) {
            (false, _) => ConnectionState::Disconnected,
            (true, None) => ConnectionState::Connected,
            (true, Some(level)) => ConnectionState::BatteryKnown(level),
        }
    }

    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            connected: self.connected,
            battery: self.battery,
            status_pending: self.status_pending,
        }
    }
}

/// Point-in-time copy of the device state, rendered for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateSnapshot {
    pub connected: bool,
    pub battery: Option<u8>,
    pub status_pending: bool,
}

impl fmt::Display for StateSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Wii Remote Driver State:")?;
        writeln!(
            f,
            "  Connected: {}",
            if self.connected { "Yes" } else { "No" }
        )?;
        match self.battery {
            Some(level) => writeln!(f, "  Last Battery: {level}")?,
            None => writeln!(f, "  Last Battery: -1")?,
        }
        if self.status_pending {
            writeln!(f, "  Status Request: pending")?;
        }
        Ok(())
    }
}
