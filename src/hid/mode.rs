//! Fn-key mode definitions
//!
//! The HID event system exposes the function-row behavior as the integer
//! parameter `HIDFKeyMode`:
//! - `0`: media/system keys first (Apple mode)
//! - `1`: plain F1-F12 first (the other mode)

use serde::{Deserialize, Serialize};
use std::fmt;

/// Registry parameter key holding the Fn-key mode
pub const FKEY_MODE_KEY: &str = "HIDFKeyMode";

/// Raw parameter value for Apple mode
pub const RAW_APPLE_MODE: i32 = 0;

/// Raw parameter value for the standard F-key mode
pub const RAW_OTHER_MODE: i32 = 1;

/// Behavior of the keyboard's function-key row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FnMode {
    /// Mode could not be determined
    Unknown,
    /// F-keys send plain F1-F12
    Other,
    /// F-keys send media/brightness controls first
    Apple,
}

impl FnMode {
    /// Map a raw `HIDFKeyMode` value, anything unrecognized is `Unknown`
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            RAW_APPLE_MODE => FnMode::Apple,
            RAW_OTHER_MODE => FnMode::Other,
            _ => FnMode::Unknown,
        }
    }

    /// Raw `HIDFKeyMode` value to write, `None` for `Unknown`
    pub fn raw_value(&self) -> Option<i32> {
        match self {
            FnMode::Apple => Some(RAW_APPLE_MODE),
            FnMode::Other => Some(RAW_OTHER_MODE),
            FnMode::Unknown => None,
        }
    }

    /// The opposite concrete mode
    pub fn counterpart(&self) -> Self {
        match self {
            FnMode::Apple => FnMode::Other,
            FnMode::Other => FnMode::Apple,
            FnMode::Unknown => FnMode::Unknown,
        }
    }

    pub fn is_known(&self) -> bool {
        *self != FnMode::Unknown
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FnMode::Unknown => "unknown",
            FnMode::Other => "other",
            FnMode::Apple => "apple",
        }
    }
}

impl fmt::Display for FnMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
