//! FKey Mode
//!
//! Reads and switches the function-key behavior of the built-in macOS
//! keyboard through the IOKit HID system.
//!
//! # Features
//! - Query the current Fn-key mode (`apple`, `other` or `unknown`)
//! - Switch to Apple mode (media keys first) or standard F-keys
//! - Numeric status codes for callers that display failures
//! - In-memory registry for running without hardware

pub mod core;
pub mod hid;

pub use crate::core::config::Config;
pub use hid::{
    current_fn_key_state, set_fn_keys_to_apple_mode, set_fn_keys_to_other_mode, FnKeyError,
    FnKeyManager, FnMode, HidRegistry, FN_SWITCH_ERROR,
};
