//! Runtime value type system for FuncLang
//!
//! This module implements `Value`, the representation of every datum a
//! FuncLang program can produce at runtime:
//! - Atoms: numbers, booleans, strings, unit, the empty list
//! - Pairs, whose `Null`-terminated chains form proper lists
//! - Closures (see [`super::closure`])
//! - Heap references, which name a heap slot without owning it
//! - Dynamic errors, carried as ordinary values
//!
//! Values are immutable. Shared payloads sit behind `Arc`, so cloning is
//! cheap and a pair chain can never loop back on itself.

use std::fmt;
use std::mem;
use std::sync::Arc;

use super::closure::{DebugFormatter, ExprFormatter, FunVal};

/// Heap reference handle
///
/// Identifies a heap slot by location. It confers no ownership: once the
/// slot is freed the handle is stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RefVal(usize);

impl RefVal {
    pub fn new(loc: usize) -> Self {
        Self(loc)
    }

    pub fn loc(&self) -> usize {
        self.0
    }
}

impl fmt::Display for RefVal {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "loc:{}", self.0)
    }
}

/// A cons cell
#[derive(Debug)]
pub struct Pair {
    fst: Value,
    snd: Value,
}

impl Pair {
    pub fn fst(&self) -> &Value {
        &self.fst
    }

    pub fn snd(&self) -> &Value {
        &self.snd
    }

    /// Whether the chain starting here ends in `Null`.
    pub fn is_list(&self) -> bool {
        let mut next = &self.snd;
        loop {
            match next {
                Value::Null => return true,
                Value::Pair(pair) => next = &pair.snd,
                _ => return false,
            }
        }
    }

    /// Iterate the `fst` of every pair in the chain starting here.
    ///
    /// A non-`Null` tail that is not a pair is not yielded.
    pub fn iter(&self) -> ListIter<'_> {
        ListIter { next: Some(self) }
    }
}

impl Drop for Pair {
    // Unlink nested cells onto a work stack so that dropping a deep
    // structure, through either component, does not recurse per level.
    fn drop(&mut self) {
        let mut pending: Vec<Arc<Pair>> = Vec::new();
        detach_pair(&mut self.fst, &mut pending);
        detach_pair(&mut self.snd, &mut pending);

        while let Some(pair) = pending.pop() {
            // shared cells stay alive; only the last owner unlinks
            if let Ok(mut cell) = Arc::try_unwrap(pair) {
                detach_pair(&mut cell.fst, &mut pending);
                detach_pair(&mut cell.snd, &mut pending);
            }
        }
    }
}

fn detach_pair(
    value: &mut Value,
    pending: &mut Vec<Arc<Pair>>,
) {
    if matches!(value, Value::Pair(_)) {
        if let Value::Pair(pair) = mem::replace(value, Value::Null) {
            pending.push(pair);
        }
    }
}

/// Iterator over the elements of a pair chain
pub struct ListIter<'a> {
    next: Option<&'a Pair>,
}

impl<'a> Iterator for ListIter<'a> {
    type Item = &'a Value;

    fn next(&mut self) -> Option<Self::Item> {
        let pair = self.next.take()?;
        if let Value::Pair(tail) = &pair.snd {
            self.next = Some(&**tail);
        }
        Some(&pair.fst)
    }
}

/// Value type enumeration for type queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Ref,
    Fun,
    Num,
    Bool,
    Str,
    Pair,
    Null,
    Unit,
    DynamicError,
}

impl ValueType {
    pub fn name(&self) -> &'static str {
        match self {
            ValueType::Ref => "ref",
            ValueType::Fun => "function",
            ValueType::Num => "number",
            ValueType::Bool => "boolean",
            ValueType::Str => "string",
            ValueType::Pair => "pair",
            ValueType::Null => "null",
            ValueType::Unit => "unit",
            ValueType::DynamicError => "error",
        }
    }
}

/// Runtime value - unified representation of all FuncLang values
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// Reference to a heap slot
    Ref(RefVal),

    /// Function closure
    Fun(FunVal),

    /// Double-precision number
    Num(f64),

    /// Boolean
    Bool(bool),

    /// String (shared, rendered raw)
    Str(Arc<str>),

    /// Cons cell
    Pair(Arc<Pair>),

    /// The empty list
    Null,

    /// No meaningful value
    #[default]
    Unit,

    /// A runtime error observed by the program; the message is diagnostic
    /// only and takes no part in equality
    DynamicError(Arc<str>),
}

// ============================================================================
// Constructors
// ============================================================================

impl Value {
    pub fn num(v: f64) -> Self {
        Value::Num(v)
    }

    pub fn bool(v: bool) -> Self {
        Value::Bool(v)
    }

    pub fn string(s: impl Into<Arc<str>>) -> Self {
        Value::Str(s.into())
    }

    pub fn pair(
        fst: Value,
        snd: Value,
    ) -> Self {
        Value::Pair(Arc::new(Pair { fst, snd }))
    }

    pub fn error(message: impl Into<Arc<str>>) -> Self {
        Value::DynamicError(message.into())
    }

    /// Build a `Null`-terminated list from the given elements.
    pub fn list<I>(items: I) -> Self
    where
        I: IntoIterator<Item = Value>,
        I::IntoIter: DoubleEndedIterator,
    {
        items
            .into_iter()
            .rev()
            .fold(Value::Null, |tail, head| Value::pair(head, tail))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Num(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(Arc::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(Arc::from(s))
    }
}

impl From<RefVal> for Value {
    fn from(r: RefVal) -> Self {
        Value::Ref(r)
    }
}

impl From<FunVal> for Value {
    fn from(f: FunVal) -> Self {
        Value::Fun(f)
    }
}

// ============================================================================
// Type Query Methods
// ============================================================================

impl Value {
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Ref(_) => ValueType::Ref,
            Value::Fun(_) => ValueType::Fun,
            Value::Num(_) => ValueType::Num,
            Value::Bool(_) => ValueType::Bool,
            Value::Str(_) => ValueType::Str,
            Value::Pair(_) => ValueType::Pair,
            Value::Null => ValueType::Null,
            Value::Unit => ValueType::Unit,
            Value::DynamicError(_) => ValueType::DynamicError,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.value_type().name()
    }

    pub fn as_num(&self) -> Option<f64> {
        match self {
            Value::Num(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(&**s),
            _ => None,
        }
    }

    pub fn as_pair(&self) -> Option<&Pair> {
        match self {
            Value::Pair(p) => Some(&**p),
            _ => None,
        }
    }

    pub fn as_ref_val(&self) -> Option<RefVal> {
        match self {
            Value::Ref(r) => Some(*r),
            _ => None,
        }
    }

    pub fn as_fun(&self) -> Option<&FunVal> {
        match self {
            Value::Fun(f) => Some(f),
            _ => None,
        }
    }

    /// Error message, if this is a dynamic error
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Value::DynamicError(msg) => Some(&**msg),
            _ => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Value::DynamicError(_))
    }

    /// `Null`, or a pair chain ending in `Null`
    pub fn is_list(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Pair(p) => p.is_list(),
            _ => false,
        }
    }

    /// Elements of a list-shaped chain.
    ///
    /// Empty for `Null`, for non-pairs, and for improper chains such as
    /// `(1 . 2)`; use [`Pair::iter`] to walk the heads of an improper chain.
    pub fn list_iter(&self) -> ListIter<'_> {
        ListIter {
            next: self.as_pair().filter(|pair| pair.is_list()),
        }
    }
}

// ============================================================================
// Structural Equality
// ============================================================================

impl Value {
    /// Structural equality.
    ///
    /// Different variants are never equal. Pairs compare both components,
    /// closures compare by identity, dynamic errors all compare equal. Pair
    /// chains are walked with an explicit stack.
    pub fn equals(
        &self,
        other: &Value,
    ) -> bool {
        let mut pending: Vec<(&Value, &Value)> = vec![(self, other)];

        while let Some((a, b)) = pending.pop() {
            let same = match (a, b) {
                (Value::Ref(x), Value::Ref(y)) => x == y,
                (Value::Fun(x), Value::Fun(y)) => x.ptr_eq(y),
                (Value::Num(x), Value::Num(y)) => x == y,
                (Value::Bool(x), Value::Bool(y)) => x == y,
                (Value::Str(x), Value::Str(y)) => Arc::ptr_eq(x, y) || x == y,
                (Value::Pair(x), Value::Pair(y)) => {
                    if !Arc::ptr_eq(x, y) {
                        pending.push((&x.snd, &y.snd));
                        pending.push((&x.fst, &y.fst));
                    }
                    true
                }
                (Value::Null, Value::Null) => true,
                (Value::Unit, Value::Unit) => true,
                (Value::DynamicError(_), Value::DynamicError(_)) => true,
                (
                    Value::Ref(_)
                    | Value::Fun(_)
                    | Value::Num(_)
                    | Value::Bool(_)
                    | Value::Str(_)
                    | Value::Pair(_)
                    | Value::Null
                    | Value::Unit
                    | Value::DynamicError(_),
                    _,
                ) => false,
            };
            if !same {
                return false;
            }
        }

        true
    }
}

impl PartialEq for Value {
    fn eq(
        &self,
        other: &Self,
    ) -> bool {
        self.equals(other)
    }
}

// ============================================================================
// Rendering
// ============================================================================

/// Render a number: integral values print without a fractional part.
pub fn format_num(v: f64) -> String {
    if v.is_nan() {
        return "NaN".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if v.fract() == 0.0 && v >= i64::MIN as f64 && v < i64::MAX as f64 {
        return (v as i64).to_string();
    }
    v.to_string()
}

enum Piece<'a> {
    Text(&'static str),
    Value(&'a Value),
    // a pair already known not to be list-shaped
    Improper(&'a Pair),
}

impl Value {
    /// Canonical textual rendering.
    ///
    /// Closures delegate their body and default argument to `formatter`.
    pub fn tostring(
        &self,
        formatter: &dyn ExprFormatter,
    ) -> String {
        let mut out = String::new();
        let mut pending = vec![Piece::Value(self)];

        while let Some(piece) = pending.pop() {
            let pair = match piece {
                Piece::Text(text) => {
                    out.push_str(text);
                    continue;
                }
                Piece::Improper(pair) => {
                    push_improper(&mut pending, pair);
                    continue;
                }
                Piece::Value(value) => match value {
                    Value::Pair(pair) => pair,
                    Value::Ref(r) => {
                        out.push_str(&r.to_string());
                        continue;
                    }
                    Value::Fun(fun) => {
                        out.push_str(&fun.tostring(formatter));
                        continue;
                    }
                    Value::Num(v) => {
                        out.push_str(&format_num(*v));
                        continue;
                    }
                    Value::Bool(b) => {
                        out.push_str(if *b { "#t" } else { "#f" });
                        continue;
                    }
                    Value::Str(s) => {
                        out.push_str(s);
                        continue;
                    }
                    Value::Null => {
                        out.push_str("()");
                        continue;
                    }
                    Value::Unit => continue,
                    Value::DynamicError(msg) => {
                        out.push_str(msg);
                        continue;
                    }
                },
            };

            if pair.is_list() {
                let items: Vec<&Value> = pair.iter().collect();
                pending.push(Piece::Text(")"));
                for (i, item) in items.into_iter().enumerate().rev() {
                    pending.push(Piece::Value(item));
                    if i > 0 {
                        pending.push(Piece::Text(" "));
                    }
                }
                pending.push(Piece::Text("("));
            } else {
                push_improper(&mut pending, pair);
            }
        }

        out
    }

    /// `Display` adapter that renders closures through `formatter`.
    pub fn display<'a>(
        &'a self,
        formatter: &'a dyn ExprFormatter,
    ) -> ValueDisplay<'a> {
        ValueDisplay {
            value: self,
            formatter,
        }
    }
}

// Render `(fst snd)`. The tail of an improper pair is improper too, so a
// pair in `snd` skips the list-shape walk.
fn push_improper<'a>(
    pending: &mut Vec<Piece<'a>>,
    pair: &'a Pair,
) {
    pending.push(Piece::Text(")"));
    match &pair.snd {
        Value::Pair(tail) => pending.push(Piece::Improper(tail)),
        other => pending.push(Piece::Value(other)),
    }
    pending.push(Piece::Text(" "));
    pending.push(Piece::Value(&pair.fst));
    pending.push(Piece::Text("("));
}

/// See [`Value::display`]
pub struct ValueDisplay<'a> {
    value: &'a Value,
    formatter: &'a dyn ExprFormatter,
}

impl fmt::Display for ValueDisplay<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(&self.value.tostring(self.formatter))
    }
}

impl fmt::Display for Value {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(&self.tostring(&DebugFormatter))
    }
}
