//! Fn-key mode entry points
//!
//! Every call acquires its own keyboard connection, performs one property
//! operation and releases the connection before returning. All managers in
//! the process share one device lock, so at most one connection is open at a
//! time.

use super::device::KeyboardHandle;
use super::error::{status_of, FnKeyError};
use super::mode::FnMode;
use super::registry::{HidRegistry, DEFAULT_SERVICE_CLASS};
use once_cell::sync::Lazy;
use parking_lot::{const_mutex, Mutex};
use tracing::debug;

#[cfg(target_os = "macos")]
use super::iokit::IoKitRegistry as PlatformRegistry;
#[cfg(not(target_os = "macos"))]
use super::registry::UnsupportedRegistry as PlatformRegistry;

/// Held across acquire -> operate -> release by every manager
static DEVICE_LOCK: Mutex<()> = const_mutex(());

/// Manager for reading and switching the Fn-key mode through a registry
pub struct FnKeyManager<R: HidRegistry> {
    registry: R,
    /// Class name of the service to open
    service_class: String,
}

impl<R: HidRegistry> FnKeyManager<R> {
    /// Create a manager targeting the default `IOHIDSystem` service
    pub fn new(registry: R) -> Self {
        Self::with_service_class(registry, DEFAULT_SERVICE_CLASS)
    }

    /// Create a manager targeting services of `service_class`
    pub fn with_service_class(registry: R, service_class: impl Into<String>) -> Self {
        Self {
            registry,
            service_class: service_class.into(),
        }
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    pub fn service_class(&self) -> &str {
        &self.service_class
    }

    /// Switch to `target`.
    ///
    /// `Unknown` is rejected before the registry is touched.
    pub fn set_mode(&self, target: FnMode) -> Result<(), FnKeyError> {
        if !target.is_known() {
            return Err(FnKeyError::InvalidArgument);
        }

        let _guard = DEVICE_LOCK.lock();
        let handle = KeyboardHandle::acquire(&self.registry, &self.service_class)?;
        handle.set_mode(target)
    }

    /// Read the current mode, keeping the failure reason
    pub fn read_mode(&self) -> Result<FnMode, FnKeyError> {
        let _guard = DEVICE_LOCK.lock();
        let handle = KeyboardHandle::acquire(&self.registry, &self.service_class)?;
        handle.get_mode()
    }

    /// Switch to the counterpart of the current mode and return the new mode.
    ///
    /// Read and write are separate calls, another process may change the
    /// mode in between.
    pub fn toggle(&self) -> Result<FnMode, FnKeyError> {
        let target = self.read_mode()?.counterpart();
        self.set_mode(target)?;
        Ok(target)
    }

    /// Switch to standard F-keys, `0` on success
    pub fn set_fn_keys_to_other_mode(&self) -> u32 {
        self.set_mode_status(FnMode::Other)
    }

    /// Switch to media keys first, `0` on success
    pub fn set_fn_keys_to_apple_mode(&self) -> u32 {
        self.set_mode_status(FnMode::Apple)
    }

    /// Best-effort query, every failure is reported as `Unknown`
    pub fn current_fn_key_state(&self) -> FnMode {
        self.read_mode().unwrap_or_else(|e| {
            debug!("Fn-key mode query failed: {}", e);
            FnMode::Unknown
        })
    }

    fn set_mode_status(&self, target: FnMode) -> u32 {
        let result = self.set_mode(target);
        if let Err(e) = &result {
            debug!("Switching Fn keys to {} failed: {}", target, e);
        }
        status_of(&result)
    }
}

static SYSTEM_MANAGER: Lazy<FnKeyManager<PlatformRegistry>> =
    Lazy::new(|| FnKeyManager::new(PlatformRegistry::default()));

/// Switch the built-in keyboard to standard F-keys.
///
/// Returns `0` on success, `FN_SWITCH_ERROR` when the switch could not be
/// attempted, or the underlying IOKit return code.
pub fn set_fn_keys_to_other_mode() -> u32 {
    SYSTEM_MANAGER.set_fn_keys_to_other_mode()
}

/// Switch the built-in keyboard to media keys first. Same status encoding as
/// [`set_fn_keys_to_other_mode`].
pub fn set_fn_keys_to_apple_mode() -> u32 {
    SYSTEM_MANAGER.set_fn_keys_to_apple_mode()
}

/// Current Fn-key mode of the built-in keyboard, `Unknown` on any failure
pub fn current_fn_key_state() -> FnMode {
    SYSTEM_MANAGER.current_fn_key_state()
}
