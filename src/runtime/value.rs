//! JavaScript value types
//!
//! This module defines the runtime representation of JavaScript values and the
//! coercions between them. Conversions that may reach an object's
//! `valueOf`/`toString` return a [`Task`]; the purely primitive ones are plain
//! functions.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::messages;

use super::context::EvalContext;
use super::object::ObjectRef;
use super::task::Task;

static NEXT_SYMBOL_ID: AtomicU64 = AtomicU64::new(1);

/// A unique identity token, optionally described
#[derive(Clone)]
pub struct Symbol {
    id: u64,
    description: Option<Rc<str>>,
}

impl Symbol {
    /// Mint a symbol that is distinct from every other symbol
    pub fn new(description: Option<&str>) -> Self {
        Self {
            id: NEXT_SYMBOL_ID.fetch_add(1, Ordering::Relaxed),
            description: description.map(Rc::from),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// `Symbol.prototype.toString` rendering
    pub fn descriptive_string(&self) -> String {
        format!("Symbol({})", self.description().unwrap_or(""))
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Symbol {}

impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.descriptive_string(), self.id)
    }
}

/// A property key: a string or a symbol
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PropertyKey {
    String(String),
    Symbol(Symbol),
}

impl PropertyKey {
    /// Key for an already primitive value (ToPropertyKey without the ToPrimitive step)
    pub fn from_primitive(value: &Value) -> PropertyKey {
        match value {
            Value::Symbol(sym) => PropertyKey::Symbol(sym.clone()),
            Value::String(s) => PropertyKey::String(s.clone()),
            other => PropertyKey::String(other.to_string_primitive().unwrap_or_default()),
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            PropertyKey::String(s) => Value::String(s.clone()),
            PropertyKey::Symbol(sym) => Value::Symbol(sym.clone()),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyKey::String(s) => Some(s),
            PropertyKey::Symbol(_) => None,
        }
    }

    pub fn is_symbol(&self) -> bool {
        matches!(self, PropertyKey::Symbol(_))
    }
}

impl From<&str> for PropertyKey {
    fn from(s: &str) -> Self {
        PropertyKey::String(s.to_string())
    }
}

impl From<String> for PropertyKey {
    fn from(s: String) -> Self {
        PropertyKey::String(s)
    }
}

impl From<Symbol> for PropertyKey {
    fn from(sym: Symbol) -> Self {
        PropertyKey::Symbol(sym)
    }
}

impl fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyKey::String(s) => f.write_str(s),
            PropertyKey::Symbol(sym) => write!(f, "[{}]", sym.descriptive_string()),
        }
    }
}

/// Hint passed to ToPrimitive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PreferredType {
    #[default]
    Default,
    Number,
    String,
}

impl PreferredType {
    /// Parse the `"string"`/`"number"` hint spelling; anything else is the default hint
    pub fn from_hint(hint: Option<&str>) -> Self {
        match hint {
            Some("string") => PreferredType::String,
            Some("number") => PreferredType::Number,
            _ => PreferredType::Default,
        }
    }

    /// Conversion methods to try, in order
    pub fn method_order(self) -> [&'static str; 2] {
        match self {
            PreferredType::String => ["toString", "valueOf"],
            PreferredType::Number | PreferredType::Default => ["valueOf", "toString"],
        }
    }
}

/// A JavaScript value
#[derive(Clone, Default)]
pub enum Value {
    /// undefined
    #[default]
    Undefined,
    /// null
    Null,
    /// Boolean value
    Boolean(bool),
    /// Number (IEEE 754 double)
    Number(f64),
    /// String
    String(String),
    /// Symbol
    Symbol(Symbol),
    /// Object (includes arrays, functions, etc.)
    Object(ObjectRef),
}

impl Value {
    /// Check if value is undefined
    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    /// Check if value is null
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Check if value is nullish (null or undefined)
    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Whether the value has the call capability
    pub fn is_callable(&self) -> bool {
        self.as_object().is_some_and(ObjectRef::is_callable)
    }

    /// The ECMAScript language type, which drives coercion branching
    pub fn spec_type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Symbol(_) => "symbol",
            Value::Object(_) => "object",
        }
    }

    /// Get the typeof string
    pub fn type_of(&self) -> &'static str {
        match self {
            Value::Null => "object", // Historical quirk
            Value::Object(obj) => obj.type_of(),
            other => other.spec_type_name(),
        }
    }

    /// Convert to boolean (truthiness)
    pub fn truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Boolean(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::String(s) => !s.is_empty(),
            Value::Symbol(_) | Value::Object(_) => true,
        }
    }

    /// ToNumber of a primitive. `None` for symbols (a TypeError) and objects
    /// (which need ToPrimitive first).
    pub fn to_number_primitive(&self) -> Option<f64> {
        match self {
            Value::Undefined => Some(f64::NAN),
            Value::Null => Some(0.0),
            Value::Boolean(b) => Some(if *b { 1.0 } else { 0.0 }),
            Value::Number(n) => Some(*n),
            Value::String(s) => Some(string_to_number(s)),
            Value::Symbol(_) | Value::Object(_) => None,
        }
    }

    /// ToString of a primitive. `None` for symbols and objects.
    pub fn to_string_primitive(&self) -> Option<String> {
        match self {
            Value::Undefined => Some("undefined".to_string()),
            Value::Null => Some("null".to_string()),
            Value::Boolean(b) => Some(b.to_string()),
            Value::Number(n) => Some(number_to_string(*n)),
            Value::String(s) => Some(s.clone()),
            Value::Symbol(_) | Value::Object(_) => None,
        }
    }

    /// ToPrimitive: identity for primitives
    pub fn to_primitive(&self, hint: PreferredType, ctx: &EvalContext) -> Task {
        match self {
            Value::Object(obj) => obj.to_primitive(hint, ctx),
            primitive => Task::normal(primitive.clone()),
        }
    }

    /// ToNumber, yielding a `Number`
    pub fn to_number_value(&self, ctx: &EvalContext) -> Task {
        match self {
            Value::Object(obj) => obj.to_number_value(ctx),
            primitive => match primitive.to_number_primitive() {
                Some(n) => Task::normal(Value::Number(n)),
                None => ctx.throw_type_error(messages::CANNOT_CONVERT_SYMBOL_TO_NUMBER),
            },
        }
    }

    /// ToString, yielding a `String`
    pub fn to_string_value(&self, ctx: &EvalContext) -> Task {
        match self {
            Value::Object(obj) => obj.to_string_value(ctx),
            primitive => match primitive.to_string_primitive() {
                Some(s) => Task::normal(Value::String(s)),
                None => ctx.throw_type_error(messages::CANNOT_CONVERT_SYMBOL_TO_STRING),
            },
        }
    }

    /// ToObject: primitives are boxed by the realm
    pub fn to_object_value(&self, ctx: &EvalContext) -> Task {
        match self {
            Value::Object(obj) => obj.to_object_value(),
            Value::Undefined | Value::Null => {
                ctx.throw_type_error(messages::CANNOT_CONVERT_NULLISH_TO_OBJECT)
            }
            primitive => Task::normal(ctx.realm().box_primitive(primitive).into()),
        }
    }

    /// ToPropertyKey, yielding a `String` or a `Symbol`
    pub fn to_property_key(&self, ctx: &EvalContext) -> Task {
        let ctx2 = ctx.clone();
        self.to_primitive(PreferredType::String, ctx)
            .and_then(move |prim| match prim {
                Value::Symbol(_) => Task::normal(prim),
                other => other.to_string_value(&ctx2),
            })
    }

    /// Binary `+`: both sides go through ToPrimitive, left first
    pub fn add(&self, other: &Value, ctx: &EvalContext) -> Task {
        let right = other.clone();
        let ctx2 = ctx.clone();
        self.to_primitive(PreferredType::Default, ctx)
            .and_then(move |lprim| {
                let ctx3 = ctx2.clone();
                right
                    .to_primitive(PreferredType::Default, &ctx2)
                    .and_then(move |rprim| add_primitives(&lprim, &rprim, &ctx3))
            })
    }

    /// Abstract (loose) equality, yielding a `Boolean`
    pub fn loose_equals(&self, other: &Value, ctx: &EvalContext) -> Task {
        match (self, other) {
            (Value::Object(obj), prim) | (prim, Value::Object(obj)) => obj.loose_equals(prim, ctx),
            _ => Task::normal(Value::Boolean(loose_equals_primitives(self, other))),
        }
    }

    /// Strict equality (===)
    pub fn strict_equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) => true,
            (Value::Null, Value::Null) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => {
                if a.is_nan() || b.is_nan() {
                    false
                } else {
                    a == b
                }
            }
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            _ => false,
        }
    }

    /// Diagnostic rendering; never runs user code
    pub fn debug_string(&self) -> String {
        match self {
            Value::String(s) => format!("{:?}", s),
            Value::Symbol(sym) => sym.descriptive_string(),
            Value::Object(obj) => obj.debug_string(),
            primitive => primitive.to_string_primitive().unwrap_or_default(),
        }
    }
}

/// `+` on two primitives
fn add_primitives(left: &Value, right: &Value, ctx: &EvalContext) -> Task {
    if left.is_string() || right.is_string() {
        return match (left.to_string_primitive(), right.to_string_primitive()) {
            (Some(l), Some(r)) => Task::normal(Value::String(l + &r)),
            _ => ctx.throw_type_error(messages::CANNOT_CONVERT_SYMBOL_TO_STRING),
        };
    }
    match (left.to_number_primitive(), right.to_number_primitive()) {
        (Some(l), Some(r)) => Task::normal(Value::Number(l + r)),
        _ => ctx.throw_type_error(messages::CANNOT_CONVERT_SYMBOL_TO_NUMBER),
    }
}

/// Abstract equality between two primitives
fn loose_equals_primitives(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Undefined | Value::Null, Value::Undefined | Value::Null) => true,
        (Value::Undefined | Value::Null, _) | (_, Value::Undefined | Value::Null) => false,
        (Value::Number(n), Value::String(s)) | (Value::String(s), Value::Number(n)) => {
            *n == string_to_number(s)
        }
        (Value::Boolean(b), other) | (other, Value::Boolean(b))
            if !matches!(other, Value::Boolean(_)) =>
        {
            let n = Value::Number(if *b { 1.0 } else { 0.0 });
            loose_equals_primitives(&n, other)
        }
        _ => left.strict_equals(right),
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.strict_equals(other)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "undefined"),
            Value::Null => write!(f, "null"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", number_to_string(*n)),
            Value::String(s) => write!(f, "\"{}\"", s),
            Value::Symbol(sym) => write!(f, "{:?}", sym),
            Value::Object(obj) => {
                if obj.is_callable() {
                    write!(f, "[Function: {}]", obj.function_name().unwrap_or_default())
                } else {
                    write!(f, "[{}]", obj.class_name())
                }
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Symbol(sym) => f.write_str(&sym.descriptive_string()),
            Value::Object(obj) => write!(f, "[object {}]", obj.class_name()),
            primitive => f.write_str(&primitive.to_string_primitive().unwrap_or_default()),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Symbol> for Value {
    fn from(sym: Symbol) -> Self {
        Value::Symbol(sym)
    }
}

impl From<ObjectRef> for Value {
    fn from(obj: ObjectRef) -> Self {
        Value::Object(obj)
    }
}

/// Number::toString with radix 10
pub fn number_to_string(n: f64) -> String {
    if n == 0.0 {
        // covers -0
        return "0".to_string();
    }
    let mut buffer = ryu_js::Buffer::new();
    buffer.format(n).to_string()
}

/// StringToNumber
pub fn string_to_number(s: &str) -> f64 {
    let trimmed = s.trim_matches(is_js_whitespace);
    if trimmed.is_empty() {
        return 0.0;
    }
    match trimmed {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    if let Some(n) = parse_radix_literal(trimmed) {
        return n;
    }
    // lexical accepts spellings like "inf" and "nan" that JS rejects
    let decimal_only = trimmed
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-'));
    if !decimal_only {
        return f64::NAN;
    }
    lexical_core::parse::<f64>(trimmed.as_bytes()).unwrap_or(f64::NAN)
}

fn is_js_whitespace(c: char) -> bool {
    c.is_whitespace() || c == '\u{feff}'
}

/// `0x`, `0o` and `0b` literals
fn parse_radix_literal(s: &str) -> Option<f64> {
    let mut chars = s.chars();
    if chars.next() != Some('0') {
        return None;
    }
    let radix = match chars.next() {
        Some('x' | 'X') => 16,
        Some('o' | 'O') => 8,
        Some('b' | 'B') => 2,
        _ => return None,
    };
    let digits = chars.as_str();
    if digits.is_empty() {
        return Some(f64::NAN);
    }
    let parsed = digits.chars().try_fold(0.0_f64, |acc, c| {
        c.to_digit(radix)
            .map(|d| acc * f64::from(radix) + f64::from(d))
    });
    Some(parsed.unwrap_or(f64::NAN))
}
