//! Per-runtime identity and foreign-object accounting.
//!
//! The engine-side class that carries host callables is rquickjs's native
//! function class, which the engine registers once per runtime the first time
//! a Rust closure is turned into a function. Every embedded runtime also gets
//! its own [`ForeignClass`] descriptor, keyed by a process-unique
//! [`RuntimeId`], which counts the foreign objects still alive in it.

use std::cell::Cell;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_RUNTIME_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of one embedded runtime instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RuntimeId(u64);

impl RuntimeId {
    /// Allocates a fresh, never reused identity.
    pub(crate) fn next() -> Self {
        RuntimeId(NEXT_RUNTIME_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for RuntimeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rt#{}", self.0)
    }
}

/// Class descriptor shared by every foreign object of one runtime.
///
/// It keeps count of the foreign objects that have been created but not yet
/// finalized, which is how lifetime accounting is observed from the host.
#[derive(Debug)]
pub struct ForeignClass {
    runtime: RuntimeId,
    live: Cell<usize>,
}

impl ForeignClass {
    pub(crate) fn new(runtime: RuntimeId) -> Self {
        Self {
            runtime,
            live: Cell::new(0),
        }
    }

    /// Runtime this descriptor belongs to.
    pub fn runtime(&self) -> RuntimeId {
        self.runtime
    }

    /// Number of foreign objects not yet finalized.
    pub fn live(&self) -> usize {
        self.live.get()
    }

    pub(crate) fn retain(&self) {
        self.live.set(self.live.get() + 1);
    }

    pub(crate) fn release(&self) {
        debug_assert!(self.live.get() > 0, "foreign object released twice");
        self.live.set(self.live.get().saturating_sub(1));
    }
}
