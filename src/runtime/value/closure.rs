//! Closure values and the evaluator-facing seams they depend on
//!
//! A closure pairs a body expression with its formals and the environment
//! that was active when it was created. The value layer never looks inside
//! either: environments and expressions are opaque handles owned by the
//! evaluator, and rendering a closure goes through an injected
//! [`ExprFormatter`].

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// An evaluation environment captured by a closure.
///
/// The runtime core only stores and hands back the handle. Evaluators
/// recover their concrete type through [`Environment::as_any`].
pub trait Environment: fmt::Debug + Send + Sync {
    fn as_any(&self) -> &dyn Any;
}

/// An AST expression held by a closure (its body, or a default argument).
pub trait Expression: fmt::Debug + Send + Sync {
    fn as_any(&self) -> &dyn Any;
}

/// Shared handle to a captured environment
pub type Env = Arc<dyn Environment>;

/// Shared handle to an expression node
pub type Expr = Arc<dyn Expression>;

/// Renders expressions back to source text against an environment.
///
/// This is the collaboration point with the evaluator's printer: closures
/// render their body and default argument through it.
pub trait ExprFormatter {
    fn format(
        &self,
        expr: &dyn Expression,
        env: &dyn Environment,
    ) -> String;
}

/// Fallback formatter that renders expressions through their `Debug` impl.
///
/// Used by `Display for Value` when no evaluator formatter is at hand.
#[derive(Debug, Clone, Copy, Default)]
pub struct DebugFormatter;

impl ExprFormatter for DebugFormatter {
    fn format(
        &self,
        expr: &dyn Expression,
        _env: &dyn Environment,
    ) -> String {
        format!("{:?}", expr)
    }
}

/// The empty top-level environment
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyEnv;

impl Environment for EmptyEnv {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[derive(Debug)]
struct Closure {
    env: Env,
    formals: Vec<String>,
    body: Expr,
    opt_last_exp: Option<Expr>,
}

/// Function value (closure with captured environment)
///
/// Cloning a `FunVal` shares the same closure. Two `FunVal`s are equal only
/// when they share one allocation; identical code and environment are not
/// enough.
#[derive(Debug, Clone)]
pub struct FunVal(Arc<Closure>);

impl FunVal {
    /// Create a closure.
    ///
    /// `opt_last_exp` computes a default for the final formal when a call
    /// leaves it out.
    pub fn new(
        env: Env,
        formals: Vec<String>,
        body: Expr,
        opt_last_exp: Option<Expr>,
    ) -> Self {
        Self(Arc::new(Closure {
            env,
            formals,
            body,
            opt_last_exp,
        }))
    }

    pub fn env(&self) -> &Env {
        &self.0.env
    }

    pub fn formals(&self) -> &[String] {
        &self.0.formals
    }

    pub fn body(&self) -> &Expr {
        &self.0.body
    }

    pub fn opt_last_exp(&self) -> Option<&Expr> {
        self.0.opt_last_exp.as_ref()
    }

    /// Identity comparison
    pub fn ptr_eq(
        &self,
        other: &FunVal,
    ) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Render as `(lambda ( a b ) body)`.
    ///
    /// With a default expression the last formal becomes `( b = default )`:
    /// `(lambda ( a ( b = default )) body)`. A default with no formals to
    /// attach to is not rendered.
    pub fn tostring(
        &self,
        formatter: &dyn ExprFormatter,
    ) -> String {
        let env = self.0.env.as_ref();
        let mut out = String::from("(lambda ( ");

        match (&self.0.opt_last_exp, self.0.formals.split_last()) {
            (Some(default), Some((last, init))) => {
                for formal in init {
                    out.push_str(formal);
                    out.push(' ');
                }
                out.push_str("( ");
                out.push_str(last);
                out.push_str(" = ");
                out.push_str(&formatter.format(default.as_ref(), env));
                out.push_str(" )");
            }
            _ => {
                for formal in &self.0.formals {
                    out.push_str(formal);
                    out.push(' ');
                }
            }
        }

        out.push_str(") ");
        out.push_str(&formatter.format(self.0.body.as_ref(), env));
        out.push(')');
        out
    }
}
