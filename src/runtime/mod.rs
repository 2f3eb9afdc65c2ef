//! Runtime system
//!
//! This module contains the value model and the heap of reference cells.

pub mod memory;
pub mod value;
