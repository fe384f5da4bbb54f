//! Fn-key error types and the numeric status channel

use std::fmt;
use thiserror::Error;

/// Reserved status for "switch attempted but the mode could not be changed".
///
/// Callers match on this value, so it is kept separate from raw kernel
/// return codes. It is a convention of the numeric API, not a device value.
pub const FN_SWITCH_ERROR: u32 = 200;

/// Status reported for a successful switch
pub const FN_SWITCH_OK: u32 = 0;

/// `kIOReturnError`
pub const IO_RETURN_ERROR: i32 = 0xE00002BCu32 as i32;

/// `kIOReturnNotPrivileged`
pub const IO_RETURN_NOT_PRIVILEGED: i32 = 0xE00002C1u32 as i32;

/// `kIOReturnUnsupported`
pub const IO_RETURN_UNSUPPORTED: i32 = 0xE00002C7u32 as i32;

/// `kIOReturnNotOpen`
pub const IO_RETURN_NOT_OPEN: i32 = 0xE00002CDu32 as i32;

/// Direction of a failed property access
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyAccess {
    Read,
    Write,
}

impl fmt::Display for PropertyAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyAccess::Read => f.write_str("Parameter read not possible (E4)"),
            PropertyAccess::Write => f.write_str("Parameter set not possible (E3)"),
        }
    }
}

/// Errors that can occur while locating the keyboard service or accessing its mode
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FnKeyError {
    #[error("Master port creation failed (E1): 0x{code:08X}")]
    Registry { code: i32 },

    #[error("No {class} service in the registry (E5)")]
    NotFound { class: String },

    #[error("Service opening failed (E2): 0x{code:08X}")]
    OpenFailed { code: i32 },

    #[error("{access}: 0x{code:08X}")]
    PropertyError { access: PropertyAccess, code: i32 },

    #[error("Invalid mode requested (E6)")]
    InvalidArgument,
}

impl FnKeyError {
    /// Underlying kernel return code, if the failure carried one
    pub fn raw_code(&self) -> Option<i32> {
        match self {
            FnKeyError::Registry { code }
            | FnKeyError::OpenFailed { code }
            | FnKeyError::PropertyError { code, .. } => Some(*code),
            FnKeyError::NotFound { .. } | FnKeyError::InvalidArgument => None,
        }
    }

    /// Collapse into the unsigned status reported by the set operations
    pub fn status_code(&self) -> u32 {
        match self.raw_code() {
            Some(code) if code != 0 => code as u32,
            _ => FN_SWITCH_ERROR,
        }
    }
}

/// Translate a typed result into the numeric status channel
pub fn status_of(result: &Result<(), FnKeyError>) -> u32 {
    match result {
        Ok(()) => FN_SWITCH_OK,
        Err(e) => e.status_code(),
    }
}
