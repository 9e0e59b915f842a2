//! Device registry - Wii Remote identification by VID/PID
//!
//! Only the original RVL-CNT-01 is matched. It enumerates over Bluetooth
//! with the Nintendo vendor ID.

/// Nintendo vendor ID
pub const VENDOR_ID: u16 = 0x057E;

/// Wii Remote (RVL-CNT-01) product ID
pub const PID_WII_REMOTE: u16 = 0x0306;

/// Known Wii Remote product IDs
pub const WIIMOTE_PIDS: &[u16] = &[PID_WII_REMOTE];

/// Check if a VID/PID pair is a supported Wii Remote
#[inline]
pub fn is_wiimote(vid: u16, pid: u16) -> bool {
    vid == VENDOR_ID && WIIMOTE_PIDS.contains(&pid)
}
