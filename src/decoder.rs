//! Button report decoder
//!
//! Turns a raw input report into one newline-terminated text line:
//!
//! ```text
//! Report: ID=49, Dpad_LeftA
//! ```
//!
//! Byte 0 is the report identifier and is echoed verbatim. Bytes 1 and 2 are
//! the core button bitmasks. Each set bit contributes a fixed fragment, in
//! the fixed order of [`BUTTON_LAYOUT`]. The fragments carry their own
//! separators exactly as existing consumers expect them, so adjacent
//! fragments are concatenated without anything in between.

use std::fmt;

use crate::protocol::{limits, report};

/// Line emitted when a report has no button bits set
pub const NO_BUTTONS: &str = "No buttons pressed";

/// Core buttons of the remote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    DpadLeft,
    DpadRight,
    DpadDown,
    DpadUp,
    Plus,
    Minus,
    Home,
    Two,
    One,
    B,
    A,
}

impl Button {
    /// Token name as it appears in event lines
    pub fn name(&self) -> &'static str {
        match self {
            Button::DpadLeft => "Dpad_Left",
            Button::DpadRight => "Dpad_Right",
            Button::DpadDown => "Dpad_Down",
            Button::DpadUp => "Dpad_Up",
            Button::Plus => "Plus",
            Button::Minus => "Minus",
            Button::Home => "Home",
            Button::Two => "2",
            Button::One => "1",
            Button::B => "B",
            Button::A => "A",
        }
    }
}

impl fmt::Display for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where a button lives in the report and what it writes
#[derive(Debug, Clone, Copy)]
pub struct ButtonBit {
    pub button: Button,
    /// Report byte index (1 or 2)
    pub byte: usize,
    pub mask: u8,
    /// Text appended to the event line when the bit is set
    pub fragment: &'static str,
}

const fn bit(button: Button, byte: usize, mask: u8, fragment: &'static str) -> ButtonBit {
    ButtonBit {
        button,
        byte,
        mask,
        fragment,
    }
}

/// Bit layout of the core button bytes, in output order
///
/// Home sits in byte 2 bit 7 even though it is grouped with the byte 1
/// buttons on the controller. This matches what the remote actually sends.
pub static BUTTON_LAYOUT: [ButtonBit; 11] = [
    bit(Button::DpadLeft, 1, 0x01, "Dpad_Left"),
    bit(Button::DpadRight, 1, 0x02, "Dpad_Right "),
    bit(Button::DpadDown, 1, 0x04, "Dpad_Down "),
    bit(Button::DpadUp, 1, 0x08, "Dpad_Up "),
    bit(Button::Plus, 1, 0x10, "Plus "),
    bit(Button::Minus, 2, 0x10, "Minus "),
    bit(Button::Home, 2, 0x80, "Home "),
    bit(Button::Two, 2, 0x01, "2 "),
    bit(Button::One, 2, 0x02, "1 "),
    bit(Button::B, 2, 0x04, "B "),
    bit(Button::A, 2, 0x08, "A"),
];

/// One decoded, newline-terminated event line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event(String);

impl Event {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Capped line builder
///
/// Keeps one byte in reserve for the trailing newline, so a finished line
/// is never longer than `max_len`.
pub(crate) struct LineBuilder {
    buf: String,
    max_len: usize,
    full: bool,
}

impl LineBuilder {
    pub(crate) fn new(max_len: usize) -> Self {
        let max_len = max_len.max(1);
        Self {
            buf: String::with_capacity(max_len),
            max_len,
            full: false,
        }
    }

    fn room(&self) -> usize {
        self.max_len - 1 - self.buf.len()
    }

    /// Append a whole fragment, or nothing once a fragment has not fit
    pub(crate) fn push(&mut self, fragment: &str) {
        if self.full {
            return;
        }
        if fragment.len() <= self.room() {
            self.buf.push_str(fragment);
        } else {
            self.full = true;
        }
    }

    /// Append as much of `text` as fits (ASCII only)
    pub(crate) fn push_truncated(&mut self, text: &str) {
        if self.full {
            return;
        }
        let take = text.len().min(self.room());
        self.buf.push_str(&text[..take]);
        if take < text.len() {
            self.full = true;
        }
    }

    pub(crate) fn finish(mut self) -> Event {
        self.buf.push('\n');
        Event(self.buf)
    }
}

/// Layout entries whose bit is set in `raw`, in output order
fn set_bits(raw: &[u8]) -> impl Iterator<Item = &'static ButtonBit> + '_ {
    BUTTON_LAYOUT
        .iter()
        .filter(move |b| raw[b.byte] & b.mask != 0)
}

/// Buttons held in a report, or `None` if the report is too short
pub fn pressed_buttons(raw: &[u8]) -> Option<Vec<Button>> {
    if raw.len() < report::MIN_BUTTON_LEN {
        return None;
    }
    Some(set_bits(raw).map(|b| b.button).collect())
}

/// Decode a button report with the default line limit
pub fn decode(raw: &[u8]) -> Option<Event> {
    decode_with_limit(raw, limits::EVENT_MAX_LEN)
}

/// Decode a button report, capping the line (newline included) at `max_len`
///
/// Returns `None` for reports shorter than three bytes.
pub fn decode_with_limit(raw: &[u8], max_len: usize) -> Option<Event> {
    if raw.len() < report::MIN_BUTTON_LEN {
        return None;
    }

    let mut line = LineBuilder::new(max_len);
    let mut pressed = set_bits(raw).peekable();

    if pressed.peek().is_none() {
        line.push_truncated(NO_BUTTONS);
        return Some(line.finish());
    }

    line.push_truncated(&format!("Report: ID={}, ", raw[0]));
    for b in pressed {
        line.push(b.fragment);
    }
    Some(line.finish())
}

/// Format the status line for a battery report (`"Battery: 42\n"`)
pub fn status_line(level: u8, max_len: usize) -> Event {
    let mut line = LineBuilder::new(max_len);
    line.push_truncated(&format!("Battery: {level}"));
    line.finish()
}
