// Wii Remote protocol definitions
// Report identifiers, fixed commands, and output limits

/// Input report identifiers
pub mod report {
    /// Status report (battery level in byte 1)
    pub const STATUS: u8 = 0x20;
    /// Core buttons only
    pub const CORE_BUTTONS: u8 = 0x30;
    /// Core buttons + accelerometer
    pub const CORE_BUTTONS_ACCEL: u8 = 0x31;

    /// Shortest report the button decoder accepts (id + two button bytes)
    pub const MIN_BUTTON_LEN: usize = 3;
    /// Shortest status report that carries a battery byte
    pub const MIN_STATUS_LEN: usize = 2;
}

/// Output commands sent to the remote
pub mod cmd {
    /// Status request output report
    pub const REQUEST_STATUS: u8 = 0x15;

    /// Full status request, no parameters (`0x15, 0x00`)
    pub const STATUS_REQUEST: [u8; 2] = [REQUEST_STATUS, 0x00];
}

/// Control codes accepted by the control surface
///
/// Encoded the way Linux `_IO(type, nr)` does: no direction, no size.
pub mod control {
    /// ioctl type byte for the remote ('W')
    pub const MAGIC: u8 = b'W';

    /// `_IO(type, nr)`
    pub const fn io(ty: u8, nr: u8) -> u32 {
        ((ty as u32) << 8) | nr as u32
    }

    /// Trigger a status (battery) request, `_IO('W', 1)`
    pub const REQUEST_STATUS: u32 = io(MAGIC, 1);
}

/// Sizes of the event path
pub mod limits {
    /// Maximum length of one decoded event line, newline included
    pub const EVENT_MAX_LEN: usize = 256;
    /// Ring buffer capacity in bytes (one slot is kept free)
    pub const BUFFER_CAPACITY: usize = 1024;
    /// Bytes the reference consumer asks for per read
    pub const READ_CHUNK: usize = 256;
    /// Consumer poll interval
    pub const POLL_INTERVAL_MS: u64 = 100;
}
