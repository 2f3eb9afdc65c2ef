//! Rendering values that mix lists, closures and heap references

use std::sync::Arc;

use funclang::{Expr, FunVal, Heap, Value};

use crate::evaluator::{call, global, var, Ast, Printer};

#[test]
fn test_closure_with_printer() {
    let f = FunVal::new(
        global(),
        vec!["x".into(), "y".into()],
        Arc::new(call("+", vec![var("x"), var("y")])),
        None,
    );
    assert_eq!(Value::Fun(f).tostring(&Printer), "(lambda ( x y ) (+ x y))");
}

#[test]
fn test_closure_with_default_argument() {
    let f = FunVal::new(
        global(),
        vec!["base".into(), "step".into()],
        Arc::new(call("+", vec![var("base"), var("step")])),
        Some(Arc::new(Ast::Num(1.0)) as Expr),
    );
    assert_eq!(
        f.tostring(&Printer),
        "(lambda ( base ( step = 1 )) (+ base step))"
    );
}

#[test]
fn test_list_of_closures_from_heap() {
    let mut heap = Heap::new();
    let id = FunVal::new(global(), vec!["x".into()], Arc::new(var("x")), None);
    let list = Value::list([Value::Fun(id.clone()), Value::Fun(id), Value::num(0.5)]);
    let cell = heap.ref_value(list);

    let stored = heap.deref(cell).unwrap();
    assert_eq!(
        stored.display(&Printer).to_string(),
        "((lambda ( x ) x) (lambda ( x ) x) 0.5)"
    );
    // both entries share one closure, so the lists compare equal
    assert!(stored.equals(&heap.deref(cell).unwrap()));
}

#[test]
fn test_distinct_closures_make_lists_unequal() {
    let make = || FunVal::new(global(), vec!["x".into()], Arc::new(var("x")), None);
    let a = Value::list([Value::Fun(make())]);
    let b = Value::list([Value::Fun(make())]);
    assert!(!a.equals(&b));
    assert_eq!(a.tostring(&Printer), b.tostring(&Printer));
}

#[test]
fn test_association_list() {
    let entry = |k: &str, v: f64| Value::pair(Value::string(k), Value::num(v));
    let alist = Value::list([entry("a", 1.0), entry("b", 2.5)]);
    assert_eq!(alist.to_string(), "((a 1) (b 2.5))");
}
