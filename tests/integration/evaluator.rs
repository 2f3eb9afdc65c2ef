//! A toy evaluator-side AST, environment and printer
//!
//! Stands in for the real front end so closures can be built and rendered
//! the way the interpreter does it.

use std::any::Any;
use std::sync::Arc;

use funclang::runtime::value::format_num;
use funclang::{Env, Environment, ExprFormatter, Expression, Value};

#[derive(Debug)]
pub enum Ast {
    Num(f64),
    Var(String),
    Call(String, Vec<Ast>),
}

impl Expression for Ast {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Environment as a chain of frames
#[derive(Debug)]
pub struct Frame {
    pub bindings: Vec<(String, Value)>,
    pub parent: Option<Env>,
}

impl Environment for Frame {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub fn global() -> Env {
    Arc::new(Frame {
        bindings: Vec::new(),
        parent: None,
    })
}

pub fn var(name: &str) -> Ast {
    Ast::Var(name.to_string())
}

pub fn call(
    op: &str,
    args: Vec<Ast>,
) -> Ast {
    Ast::Call(op.to_string(), args)
}

/// Prints the AST in surface syntax
pub struct Printer;

impl Printer {
    fn print(
        &self,
        ast: &Ast,
    ) -> String {
        match ast {
            Ast::Num(n) => format_num(*n),
            Ast::Var(name) => name.clone(),
            Ast::Call(op, args) => {
                let mut out = format!("({}", op);
                for arg in args {
                    out.push(' ');
                    out.push_str(&self.print(arg));
                }
                out.push(')');
                out
            }
        }
    }
}

impl ExprFormatter for Printer {
    fn format(
        &self,
        expr: &dyn Expression,
        _env: &dyn Environment,
    ) -> String {
        match expr.as_any().downcast_ref::<Ast>() {
            Some(ast) => self.print(ast),
            None => "<unknown>".to_string(),
        }
    }
}
