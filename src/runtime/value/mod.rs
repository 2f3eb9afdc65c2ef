//! Core runtime types for FuncLang
//!
//! This module provides the value types shared by the heap and the
//! evaluator.

pub mod closure;
pub mod runtime_value;

pub use closure::{DebugFormatter, EmptyEnv, Env, Environment, ExprFormatter, Expr, Expression, FunVal};
pub use runtime_value::*;

#[cfg(test)]
mod tests;
