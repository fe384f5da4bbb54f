//! HID module - Fn-key mode access through the HID service registry

mod device;
pub mod error;
mod fkeys;
mod memory;
pub mod mode;
pub mod registry;

#[cfg(target_os = "macos")]
mod iokit;

pub use device::KeyboardHandle;
pub use error::{FnKeyError, PropertyAccess, FN_SWITCH_ERROR, FN_SWITCH_OK};
pub use fkeys::{
    current_fn_key_state, set_fn_keys_to_apple_mode, set_fn_keys_to_other_mode, FnKeyManager,
};
pub use memory::{MemoryConnection, MemoryRegistry};
pub use mode::FnMode;
pub use registry::{HidRegistry, UnsupportedRegistry, DEFAULT_SERVICE_CLASS};

#[cfg(target_os = "macos")]
pub use iokit::{IoKitConnection, IoKitRegistry};
