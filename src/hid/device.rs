//! Keyboard service discovery and Fn-key mode access

use super::error::{FnKeyError, PropertyAccess, IO_RETURN_NOT_OPEN};
use super::mode::{FnMode, FKEY_MODE_KEY};
use super::registry::HidRegistry;
use tracing::{debug, trace};

/// Open connection to the matched keyboard service.
///
/// The connection is closed exactly once, when the handle is dropped.
pub struct KeyboardHandle<'a, R: HidRegistry> {
    registry: &'a R,
    /// `Some` until the handle is dropped
    conn: Option<R::Connection>,
}

impl<'a, R: HidRegistry> KeyboardHandle<'a, R> {
    /// Locate the first service of `class_name` and open a connection to it
    pub fn acquire(registry: &'a R, class_name: &str) -> Result<Self, FnKeyError> {
        let conn = registry.open_service(class_name).map_err(|e| {
            debug!("Failed to acquire {} connection: {}", class_name, e);
            e
        })?;
        trace!("Acquired {} connection", class_name);

        Ok(Self {
            registry,
            conn: Some(conn),
        })
    }

    /// Read the current mode.
    ///
    /// An unrecognized raw value is not an error and yields `Unknown`.
    pub fn get_mode(&self) -> Result<FnMode, FnKeyError> {
        let raw = self
            .connection()
            .and_then(|conn| self.registry.get_parameter(conn, FKEY_MODE_KEY))
            .map_err(|code| FnKeyError::PropertyError {
                access: PropertyAccess::Read,
                code,
            })?;

        let mode = FnMode::from_raw(raw);
        if !mode.is_known() {
            debug!("Unexpected {} value: {}", FKEY_MODE_KEY, raw);
        }
        Ok(mode)
    }

    /// Write `target`, which must be `Apple` or `Other`
    pub fn set_mode(&self, target: FnMode) -> Result<(), FnKeyError> {
        let raw = target.raw_value().ok_or(FnKeyError::InvalidArgument)?;

        self.connection()
            .and_then(|conn| self.registry.set_parameter(conn, FKEY_MODE_KEY, raw))
            .map_err(|code| FnKeyError::PropertyError {
                access: PropertyAccess::Write,
                code,
            })?;

        debug!("Set {} to {} ({})", FKEY_MODE_KEY, raw, target);
        Ok(())
    }

    fn connection(&self) -> Result<&R::Connection, i32> {
        self.conn.as_ref().ok_or(IO_RETURN_NOT_OPEN)
    }
}

impl<R: HidRegistry> Drop for KeyboardHandle<'_, R> {
    fn drop(&mut self) {
        if let Some(conn) = self.conn.take() {
            self.registry.close(conn);
            trace!("Released keyboard connection");
        }
    }
}
