//! Tests for core value types


use std::any::Any;
use std::sync::Arc;

use crate::runtime::value::{Environment, ExprFormatter, Expression};

/// Source text standing in for an evaluator AST node
#[derive(Debug)]
pub(crate) struct Src(pub &'static str);

impl Expression for Src {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Environment with a name, so formatters can show which one they saw
#[derive(Debug)]
pub(crate) struct NamedEnv(pub &'static str);

impl Environment for NamedEnv {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Formatter that prints `Src` nodes verbatim
pub(crate) struct SrcFormatter;

impl ExprFormatter for SrcFormatter {
    fn format(
        &self,
        expr: &dyn Expression,
        _env: &dyn Environment,
    ) -> String {
        expr.as_any()
            .downcast_ref::<Src>()
            .map(|src| src.0.to_string())
            .unwrap_or_else(|| "<expr>".to_string())
    }
}

pub(crate) fn src(text: &'static str) -> Arc<dyn Expression> {
    Arc::new(Src(text))
}
