//! Heap cells driven the way the evaluator drives them

use std::path::Path;

use funclang::util::config::RuntimeConfig;
use funclang::{Heap, HeapError, Value};

#[test]
fn test_counter_cell() {
    let mut heap = Heap::new();
    let counter = heap.ref_value(Value::num(0.0));

    for _ in 0..10 {
        let current = heap.deref(counter).unwrap().as_num().unwrap();
        heap.setref(counter, Value::num(current + 1.0)).unwrap();
    }

    assert_eq!(heap.deref(counter).unwrap().to_string(), "10");
}

#[test]
fn test_refs_stored_in_cells() {
    let mut heap = Heap::new();
    let inner = heap.ref_value(Value::string("payload"));
    let outer = heap.ref_value(Value::Ref(inner));

    let through = heap.deref(outer).unwrap().as_ref_val().unwrap();
    assert_eq!(through, inner);
    assert_eq!(heap.deref(through).unwrap().to_string(), "payload");
    assert_eq!(
        heap.deref(outer).unwrap().to_string(),
        format!("loc:{}", inner.loc())
    );
}

#[test]
fn test_dynamic_errors_flow_through_heap() {
    let mut heap = Heap::new();
    let r = heap.ref_value(Value::error("division by zero"));
    let stored = heap.deref(r).unwrap();
    assert!(stored.is_error());
    assert!(stored.equals(&Value::error("another message")));
    assert_eq!(stored.to_string(), "division by zero");
}

#[test]
fn test_free_then_reuse_then_stale_handle() {
    let mut heap = Heap::new();
    let a = heap.ref_value(Value::num(1.0));
    heap.free(a).unwrap();
    let b = heap.ref_value(Value::num(2.0));

    // same location: the old handle now observes the new cell
    assert_eq!(a, b);
    assert!(heap.deref(a).unwrap().equals(&Value::num(2.0)));

    heap.free(b).unwrap();
    assert_eq!(heap.deref(a).unwrap_err(), HeapError::Freed { loc: a.loc() });
}

#[test]
fn test_init_from_config() {
    let config = RuntimeConfig::from_toml_str("[heap]\ninitial_capacity = 3\n").unwrap();
    let mut heap = funclang::init(&config);
    assert_eq!(heap.capacity(), 3);
    for i in 0..4 {
        heap.ref_value(Value::num(i as f64));
    }
    assert_eq!(heap.capacity(), 6);
}

#[test]
fn test_init_from_missing_file() {
    let heap = funclang::init_from_file(Path::new("/nonexistent/funclang.toml")).unwrap();
    assert_eq!(heap.capacity(), 16);
}
