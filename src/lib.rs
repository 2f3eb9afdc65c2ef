//! FuncLang runtime core
//!
//! The mutable store and value representation of the FuncLang interpreter.
//!
//! - [`runtime::value`]: every datum a program can produce, with structural
//!   equality and canonical rendering
//! - [`runtime::memory`]: the heap of reference cells behind `ref`,
//!   `deref`, `set!` and `free`
//!
//! Parsing, evaluation and environments live with the evaluator; this crate
//! only holds environments and expressions as opaque handles.
//!
//! # Example
//!
//! ```
//! use funclang::{Heap, Value};
//!
//! let mut heap = Heap::new();
//! let cell = heap.ref_value(Value::list([Value::num(1.0), Value::num(2.0)]));
//! assert_eq!(heap.deref(cell).unwrap().to_string(), "(1 2)");
//!
//! heap.setref(cell, Value::num(4.5)).unwrap();
//! assert_eq!(heap.deref(cell).unwrap().to_string(), "4.5");
//! ```

#![doc(html_root_url = "https://docs.rs/funclang")]
#![warn(rust_2018_idioms)]

pub mod runtime;
pub mod util;

// Re-exports
pub use anyhow::{Context, Result};
pub use runtime::memory::{Heap, HeapConfig, HeapError, HeapStats, SharedHeap};
pub use runtime::value::{
    DebugFormatter, EmptyEnv, Env, Environment, ExprFormatter, Expr, Expression, FunVal, RefVal,
    Value, ValueType,
};

use std::path::Path;

use tracing::debug;

use crate::util::config::RuntimeConfig;

/// Language version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Language name
pub const NAME: &str = "FuncLang";

/// Set up logging and build a heap from a configuration
pub fn init(config: &RuntimeConfig) -> Heap {
    util::logger::init_with_level(config.log.level);
    debug!(
        initial_capacity = config.heap.initial_capacity,
        "{} {} runtime ready", NAME, VERSION
    );
    Heap::with_config(config.heap.clone())
}

/// Load a TOML configuration file, then [`init`] from it
pub fn init_from_file(path: &Path) -> Result<Heap> {
    let config = RuntimeConfig::load(path)
        .with_context(|| format!("Failed to load config: {}", path.display()))?;
    Ok(init(&config))
}
