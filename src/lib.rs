// Wii Remote report mapper - Shared Library
// Report decoding, event buffering, and status queries

pub mod config;
pub mod decoder;
pub mod driver;
pub mod error;
pub mod protocol;
pub mod replay;
pub mod ring_buffer;
pub mod state;

pub use config::DriverConfig;
pub use decoder::{decode, decode_with_limit, pressed_buttons, Button, Event};
pub use driver::WiimoteDriver;
pub use error::DriverError;
pub use ring_buffer::RingBuffer;
pub use state::{ConnectionState, StateSnapshot};

pub use protocol::{cmd, control, limits, report};
