//! Heap of mutable reference cells
//!
//! The heap stores `Value`s in numbered slots and hands out `RefVal`
//! handles naming them. Memory is only reclaimed through an explicit
//! `free`; there is no collector.
//!
//! # Allocation
//! - Freed locations are reused first, oldest-freed first (FIFO)
//! - Otherwise the high-water cursor advances, doubling the backing
//!   store when it runs out
//!
//! # Reference validity
//! Every slot carries an explicit state, so using a location that was never
//! handed out, or one that has been freed, yields a [`HeapError`] instead of
//! stale data. Freeing twice is rejected and does not re-enter the pool.

mod error;
mod shared;

pub use error::HeapError;
pub use shared::SharedHeap;

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::runtime::value::{RefVal, Value};

/// Heap configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeapConfig {
    /// Slots committed up front (at least one is always committed)
    #[serde(default = "default_initial_capacity")]
    pub initial_capacity: usize,
    /// Log every ref/setref/free at trace level
    #[serde(default)]
    pub trace_allocations: bool,
}

fn default_initial_capacity() -> usize {
    16
}

impl Default for HeapConfig {
    fn default() -> Self {
        Self {
            initial_capacity: default_initial_capacity(),
            trace_allocations: false,
        }
    }
}

#[derive(Debug)]
enum Slot {
    /// Never handed out
    Vacant,
    Live(Value),
    /// Handed out, then freed; waiting in the pool
    Freed,
}

/// Heap statistics snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HeapStats {
    /// Committed slots
    pub capacity: usize,
    /// Slots currently holding a value
    pub live: usize,
    /// Freed slots awaiting reuse
    pub free_pool: usize,
    /// Slots ever handed out by the cursor
    pub high_water: usize,
    pub total_allocations: usize,
    pub total_frees: usize,
    /// Times the backing store doubled
    pub grow_count: usize,
}

/// Store of reference cells addressed by `RefVal`
#[derive(Debug)]
pub struct Heap {
    /// Backing store; its length is the committed capacity
    slots: Vec<Slot>,
    /// Freed locations, oldest first
    free_pool: VecDeque<usize>,
    /// Next never-used location
    cursor: usize,
    config: HeapConfig,
    total_allocations: usize,
    total_frees: usize,
    grow_count: usize,
}

impl Heap {
    /// Create a heap with the default configuration
    pub fn new() -> Self {
        Self::with_config(HeapConfig::default())
    }

    pub fn with_config(config: HeapConfig) -> Self {
        let capacity = config.initial_capacity.max(1);
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || Slot::Vacant);
        Self {
            slots,
            free_pool: VecDeque::new(),
            cursor: 0,
            config,
            total_allocations: 0,
            total_frees: 0,
            grow_count: 0,
        }
    }

    pub fn config(&self) -> &HeapConfig {
        &self.config
    }

    /// Allocate a slot holding `val` and return its reference.
    ///
    /// Never fails: the backing store grows as needed.
    pub fn ref_value(
        &mut self,
        val: Value,
    ) -> RefVal {
        let loc = match self.free_pool.pop_front() {
            Some(loc) => loc,
            None => {
                if self.cursor == self.slots.len() {
                    self.grow();
                }
                let loc = self.cursor;
                self.cursor += 1;
                loc
            }
        };

        self.slots[loc] = Slot::Live(val);
        self.total_allocations += 1;
        if self.config.trace_allocations {
            trace!(loc, "ref");
        }
        RefVal::new(loc)
    }

    /// Read the value stored at `loc`.
    pub fn deref(
        &self,
        loc: RefVal,
    ) -> Result<Value, HeapError> {
        match self.slots.get(loc.loc()) {
            Some(Slot::Live(val)) => Ok(val.clone()),
            _ => Err(self.violation(loc)),
        }
    }

    /// Overwrite the value at `loc`, returning the new value.
    pub fn setref(
        &mut self,
        loc: RefVal,
        val: Value,
    ) -> Result<Value, HeapError> {
        if !self.is_live(loc) {
            return Err(self.violation(loc));
        }
        self.slots[loc.loc()] = Slot::Live(val.clone());
        if self.config.trace_allocations {
            trace!(loc = loc.loc(), "setref");
        }
        Ok(val)
    }

    /// Release the slot at `loc` for reuse, returning `loc`.
    pub fn free(
        &mut self,
        loc: RefVal,
    ) -> Result<RefVal, HeapError> {
        match self.slots.get(loc.loc()) {
            Some(Slot::Live(_)) => {}
            Some(Slot::Freed) => {
                let err = HeapError::DoubleFree { loc: loc.loc() };
                warn!(%err, "heap contract violation");
                return Err(err);
            }
            _ => return Err(self.violation(loc)),
        }
        self.slots[loc.loc()] = Slot::Freed;

        self.free_pool.push_back(loc.loc());
        self.total_frees += 1;
        if self.config.trace_allocations {
            trace!(loc = loc.loc(), "free");
        }
        Ok(loc)
    }

    /// Whether `loc` currently names a live slot
    pub fn is_live(
        &self,
        loc: RefVal,
    ) -> bool {
        matches!(self.slots.get(loc.loc()), Some(Slot::Live(_)))
    }

    /// Committed slots
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Slots currently holding a value
    pub fn live_count(&self) -> usize {
        self.cursor - self.free_pool.len()
    }

    pub fn stats(&self) -> HeapStats {
        HeapStats {
            capacity: self.capacity(),
            live: self.live_count(),
            free_pool: self.free_pool.len(),
            high_water: self.cursor,
            total_allocations: self.total_allocations,
            total_frees: self.total_frees,
            grow_count: self.grow_count,
        }
    }

    fn grow(&mut self) {
        let old = self.slots.len();
        let new = (old * 2).max(1);
        self.slots.resize_with(new, || Slot::Vacant);
        self.grow_count += 1;
        debug!(old, new, "heap capacity doubled");
    }

    fn violation(
        &self,
        loc: RefVal,
    ) -> HeapError {
        let err = match self.slots.get(loc.loc()) {
            Some(Slot::Freed) => HeapError::Freed { loc: loc.loc() },
            _ => HeapError::Unallocated { loc: loc.loc() },
        };
        warn!(%err, "heap contract violation");
        err
    }
}

impl Default for Heap {
    fn default() -> Self {
        Self::new()
    }
}
