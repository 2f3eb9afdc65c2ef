//! Heap shared between evaluator threads
//!
//! Each operation takes the lock once, so every ref/deref/setref/free is a
//! single critical section over the whole heap.

use std::sync::Arc;

use parking_lot::Mutex;

use super::{Heap, HeapConfig, HeapError, HeapStats};
use crate::runtime::value::{RefVal, Value};

/// Cloneable handle to a mutex-guarded [`Heap`]
#[derive(Debug, Clone, Default)]
pub struct SharedHeap {
    inner: Arc<Mutex<Heap>>,
}

impl SharedHeap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: HeapConfig) -> Self {
        Self::from(Heap::with_config(config))
    }

    pub fn ref_value(
        &self,
        val: Value,
    ) -> RefVal {
        self.inner.lock().ref_value(val)
    }

    pub fn deref(
        &self,
        loc: RefVal,
    ) -> Result<Value, HeapError> {
        self.inner.lock().deref(loc)
    }

    pub fn setref(
        &self,
        loc: RefVal,
        val: Value,
    ) -> Result<Value, HeapError> {
        self.inner.lock().setref(loc, val)
    }

    pub fn free(
        &self,
        loc: RefVal,
    ) -> Result<RefVal, HeapError> {
        self.inner.lock().free(loc)
    }

    pub fn stats(&self) -> HeapStats {
        self.inner.lock().stats()
    }

    /// Run `f` with the heap locked, for multi-step updates that must not
    /// interleave with other threads.
    pub fn with<R>(
        &self,
        f: impl FnOnce(&mut Heap) -> R,
    ) -> R {
        f(&mut self.inner.lock())
    }
}

impl From<Heap> for SharedHeap {
    fn from(heap: Heap) -> Self {
        Self {
            inner: Arc::new(Mutex::new(heap)),
        }
    }
}
