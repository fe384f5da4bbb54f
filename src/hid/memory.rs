//! In-memory HID registry
//!
//! Stands in for the HID system when no hardware is available (tests and the
//! `mock-hid` feature). Counts every open/close so callers can check that
//! connections are balanced.

use super::error::{FnKeyError, IO_RETURN_NOT_OPEN, IO_RETURN_UNSUPPORTED};
use super::mode::{FnMode, FKEY_MODE_KEY};
use super::registry::{HidRegistry, DEFAULT_SERVICE_CLASS};
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Connection to the in-memory service
#[derive(Debug)]
pub struct MemoryConnection {
    id: usize,
}

#[derive(Debug, Default)]
struct MemoryState {
    /// Current `HIDFKeyMode` value, `None` when the property is absent
    raw: Option<i32>,
    open_ids: HashSet<usize>,
    open_error: Option<i32>,
    read_error: Option<i32>,
    write_error: Option<i32>,
}

/// Registry holding a single keyboard service with an `HIDFKeyMode` property
#[derive(Debug)]
pub struct MemoryRegistry {
    /// Class of the service, `None` for an empty registry
    class_name: Option<String>,
    state: Mutex<MemoryState>,
    next_id: AtomicUsize,
    opens: AtomicUsize,
    closes: AtomicUsize,
    unbalanced_closes: AtomicUsize,
    reads: AtomicUsize,
    writes: AtomicUsize,
}

impl Default for MemoryRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryRegistry {
    /// Registry with one `IOHIDSystem` service and no mode property yet
    pub fn new() -> Self {
        Self::with_class(Some(DEFAULT_SERVICE_CLASS))
    }

    /// Registry whose service currently reports `mode`
    pub fn with_mode(mode: FnMode) -> Self {
        let registry = Self::new();
        registry.set_raw(mode.raw_value());
        registry
    }

    /// Registry without any keyboard service
    pub fn empty() -> Self {
        Self::with_class(None)
    }

    fn with_class(class_name: Option<&str>) -> Self {
        Self {
            class_name: class_name.map(str::to_string),
            state: Mutex::new(MemoryState::default()),
            next_id: AtomicUsize::new(1),
            opens: AtomicUsize::new(0),
            closes: AtomicUsize::new(0),
            unbalanced_closes: AtomicUsize::new(0),
            reads: AtomicUsize::new(0),
            writes: AtomicUsize::new(0),
        }
    }

    /// Overwrite the stored property value
    pub fn set_raw(&self, raw: Option<i32>) {
        self.state.lock().raw = raw;
    }

    pub fn raw(&self) -> Option<i32> {
        self.state.lock().raw
    }

    /// Refuse opens with `code` until cleared with `None`
    pub fn fail_open_with(&self, code: Option<i32>) {
        self.state.lock().open_error = code;
    }

    /// Fail parameter reads with `code` until cleared with `None`
    pub fn fail_reads_with(&self, code: Option<i32>) {
        self.state.lock().read_error = code;
    }

    /// Fail parameter writes with `code` until cleared with `None`
    pub fn fail_writes_with(&self, code: Option<i32>) {
        self.state.lock().write_error = code;
    }

    /// Successful opens so far
    pub fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    /// Closes so far
    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    /// Closes of connections that were not open
    pub fn unbalanced_closes(&self) -> usize {
        self.unbalanced_closes.load(Ordering::SeqCst)
    }

    /// Connections currently open
    pub fn open_connections(&self) -> usize {
        self.state.lock().open_ids.len()
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl HidRegistry for MemoryRegistry {
    type Connection = MemoryConnection;

    fn open_service(&self, class_name: &str) -> Result<MemoryConnection, FnKeyError> {
        if self.class_name.as_deref() != Some(class_name) {
            return Err(FnKeyError::NotFound {
                class: class_name.to_string(),
            });
        }

        let mut state = self.state.lock();
        if let Some(code) = state.open_error {
            return Err(FnKeyError::OpenFailed { code });
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        state.open_ids.insert(id);
        self.opens.fetch_add(1, Ordering::SeqCst);
        Ok(MemoryConnection { id })
    }

    fn get_parameter(&self, conn: &MemoryConnection, key: &str) -> Result<i32, i32> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let state = self.state.lock();
        if !state.open_ids.contains(&conn.id) {
            return Err(IO_RETURN_NOT_OPEN);
        }
        if let Some(code) = state.read_error {
            return Err(code);
        }
        if key != FKEY_MODE_KEY {
            return Err(IO_RETURN_UNSUPPORTED);
        }
        state.raw.ok_or(IO_RETURN_UNSUPPORTED)
    }

    fn set_parameter(&self, conn: &MemoryConnection, key: &str, value: i32) -> Result<(), i32> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.lock();
        if !state.open_ids.contains(&conn.id) {
            return Err(IO_RETURN_NOT_OPEN);
        }
        if let Some(code) = state.write_error {
            return Err(code);
        }
        if key != FKEY_MODE_KEY {
            return Err(IO_RETURN_UNSUPPORTED);
        }
        state.raw = Some(value);
        Ok(())
    }

    fn close(&self, conn: MemoryConnection) {
        self.closes.fetch_add(1, Ordering::SeqCst);
        if !self.state.lock().open_ids.remove(&conn.id) {
            self.unbalanced_closes.fetch_add(1, Ordering::SeqCst);
        }
    }
}
