//! Heap contract violations

use thiserror::Error;

/// Raised when the evaluator uses a reference outside the heap contract.
///
/// These are programming errors in the caller, not language-level errors;
/// FuncLang programs see failures as `Value::DynamicError` instead.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum HeapError {
    #[error("invalid reference loc:{loc}: location was never allocated")]
    Unallocated { loc: usize },

    #[error("invalid reference loc:{loc}: location has been freed")]
    Freed { loc: usize },

    #[error("invalid reference loc:{loc}: location freed twice")]
    DoubleFree { loc: usize },
}

impl HeapError {
    /// The offending location
    pub fn loc(&self) -> usize {
        match self {
            HeapError::Unallocated { loc }
            | HeapError::Freed { loc }
            | HeapError::DoubleFree { loc } => *loc,
        }
    }
}
