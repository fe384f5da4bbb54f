//! macOS IOKit-backed HID registry
//!
//! Matches services by class name, opens a `kIOHIDParamConnectType`
//! connection and reads/writes HID parameters through it.

use super::error::{FnKeyError, IO_RETURN_ERROR, IO_RETURN_UNSUPPORTED};
use super::registry::HidRegistry;
use core_foundation::base::{CFType, TCFType};
use core_foundation::number::CFNumber;
use core_foundation::string::CFString;
use core_foundation_sys::base::CFTypeRef;
use core_foundation_sys::string::CFStringRef;
use io_kit_sys::types::{io_connect_t, io_iterator_t, io_service_t};
use io_kit_sys::*;
use mach2::kern_return::{kern_return_t, KERN_SUCCESS};
use mach2::port::{mach_port_t, MACH_PORT_NULL};
use mach2::traps::mach_task_self;
use std::ffi::CString;
use std::ptr;
use tracing::{debug, trace};

/// Connect type for the HID event system parameter interface
const IOHID_PARAM_CONNECT_TYPE: u32 = 1;

/// Open connection to an IOKit service
#[derive(Debug)]
pub struct IoKitConnection(io_connect_t);

/// The live IOKit service registry
#[derive(Debug, Default, Clone, Copy)]
pub struct IoKitRegistry;

impl IoKitRegistry {
    pub fn new() -> Self {
        Self
    }

    /// First service of `class_name`, or `None` when nothing matches.
    ///
    /// The returned object must be released with `IOObjectRelease`.
    unsafe fn first_matching_service(
        &self,
        class_name: &str,
    ) -> Result<Option<io_service_t>, FnKeyError> {
        let mut master_port: mach_port_t = MACH_PORT_NULL;
        let kr = IOMasterPort(MACH_PORT_NULL, &mut master_port);
        if kr != KERN_SUCCESS {
            return Err(FnKeyError::Registry { code: kr });
        }

        let name = CString::new(class_name).map_err(|_| FnKeyError::InvalidArgument)?;
        let matching_dict = IOServiceMatching(name.as_ptr());
        if matching_dict.is_null() {
            return Err(FnKeyError::Registry {
                code: IO_RETURN_ERROR,
            });
        }

        // Consumes the matching dictionary
        let mut iterator: io_iterator_t = 0;
        let kr = IOServiceGetMatchingServices(master_port, matching_dict as _, &mut iterator);
        if kr != KERN_SUCCESS {
            return Err(FnKeyError::Registry { code: kr });
        }

        let service = IOIteratorNext(iterator);
        IOObjectRelease(iterator);

        if service == 0 {
            Ok(None)
        } else {
            Ok(Some(service))
        }
    }
}

impl HidRegistry for IoKitRegistry {
    type Connection = IoKitConnection;

    fn open_service(&self, class_name: &str) -> Result<IoKitConnection, FnKeyError> {
        unsafe {
            let service = self
                .first_matching_service(class_name)?
                .ok_or_else(|| FnKeyError::NotFound {
                    class: class_name.to_string(),
                })?;

            let mut connect: io_connect_t = 0;
            let kr = IOServiceOpen(
                service,
                mach_task_self(),
                IOHID_PARAM_CONNECT_TYPE,
                &mut connect,
            );
            IOObjectRelease(service);

            if kr != KERN_SUCCESS {
                debug!("IOServiceOpen({}) failed: 0x{:08X}", class_name, kr);
                return Err(FnKeyError::OpenFailed { code: kr });
            }

            trace!("Opened {} connection {}", class_name, connect);
            Ok(IoKitConnection(connect))
        }
    }

    fn get_parameter(&self, conn: &IoKitConnection, key: &str) -> Result<i32, i32> {
        let key = CFString::new(key);
        let mut value: CFTypeRef = ptr::null();

        unsafe {
            let kr = IOHIDCopyCFTypeParameter(conn.0, key.as_concrete_TypeRef(), &mut value);
            if kr != KERN_SUCCESS {
                return Err(kr);
            }
            if value.is_null() {
                return Err(IO_RETURN_UNSUPPORTED);
            }

            // Copy rule: we own the returned reference
            let value = CFType::wrap_under_create_rule(value);
            value
                .downcast::<CFNumber>()
                .and_then(|number| number.to_i32())
                .ok_or(IO_RETURN_UNSUPPORTED)
        }
    }

    fn set_parameter(&self, conn: &IoKitConnection, key: &str, value: i32) -> Result<(), i32> {
        let key = CFString::new(key);
        let number = CFNumber::from(value);

        let kr = unsafe {
            IOHIDSetCFTypeParameter(conn.0, key.as_concrete_TypeRef(), number.as_CFTypeRef())
        };
        if kr != KERN_SUCCESS {
            return Err(kr);
        }
        Ok(())
    }

    fn close(&self, conn: IoKitConnection) {
        let kr = unsafe { IOServiceClose(conn.0) };
        if kr != KERN_SUCCESS {
            debug!("IOServiceClose failed: 0x{:08X}", kr);
        }
    }
}

// IOHIDLib parameter calls not covered by io-kit-sys
#[link(name = "IOKit", kind = "framework")]
extern "C" {
    fn IOHIDCopyCFTypeParameter(
        connect: io_connect_t,
        key: CFStringRef,
        parameter: *mut CFTypeRef,
    ) -> kern_return_t;

    fn IOHIDSetCFTypeParameter(
        connect: io_connect_t,
        key: CFStringRef,
        parameter: CFTypeRef,
    ) -> kern_return_t;
}
