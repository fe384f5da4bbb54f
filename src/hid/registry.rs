//! HID service registry abstraction
//!
//! The device layer only needs four things from the platform: find-and-open a
//! service by class name, read and write a named integer parameter on the
//! open connection, and close it again.

use super::error::FnKeyError;

/// Class name of the HID event system service that owns `HIDFKeyMode`
pub const DEFAULT_SERVICE_CLASS: &str = "IOHIDSystem";

/// Access to a live HID service registry
pub trait HidRegistry: Send + Sync {
    /// Open client connection to a matched service
    type Connection;

    /// Find the first service of `class_name` and open a connection to it.
    ///
    /// Returns `NotFound` when no service matches and `OpenFailed` when the
    /// open is refused. The matched service object must not outlive this call.
    fn open_service(&self, class_name: &str) -> Result<Self::Connection, FnKeyError>;

    /// Read an integer parameter, `Err` carries the underlying return code
    fn get_parameter(&self, conn: &Self::Connection, key: &str) -> Result<i32, i32>;

    /// Write an integer parameter, `Err` carries the underlying return code
    fn set_parameter(&self, conn: &Self::Connection, key: &str, value: i32) -> Result<(), i32>;

    /// Release a connection returned by `open_service`
    fn close(&self, conn: Self::Connection);
}

/// Registry for platforms without an IOKit HID system: nothing ever matches
#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedRegistry;

impl HidRegistry for UnsupportedRegistry {
    type Connection = ();

    fn open_service(&self, class_name: &str) -> Result<(), FnKeyError> {
        Err(FnKeyError::NotFound {
            class: class_name.to_string(),
        })
    }

    fn get_parameter(&self, _conn: &(), _key: &str) -> Result<i32, i32> {
        Err(0)
    }

    fn set_parameter(&self, _conn: &(), _key: &str, _value: i32) -> Result<(), i32> {
        Err(0)
    }

    fn close(&self, _conn: ()) {}
}
