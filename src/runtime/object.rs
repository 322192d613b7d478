//! Object values and the object protocol
//!
//! An [`ObjectRef`] is a shared handle to an [`Object`]: its own property
//! table, its prototype link and its extensibility flag. Lookups walk the
//! prototype chain explicitly, own slots shadowing inherited ones. Writes never
//! touch an ancestor: they update an own slot or create one on the receiver.
//!
//! Every operation that can reach user code (accessors, `valueOf`/`toString`)
//! returns a [`Task`] for the [`Driver`](super::Driver) to run.

use std::cell::RefCell;
use std::fmt;
use std::iter::FusedIterator;
use std::rc::Rc;

use indexmap::IndexMap;
use rustc_hash::{FxBuildHasher, FxHashSet};

use crate::error::{messages, Result};

use super::completion::Completion;
use super::context::EvalContext;
use super::driver::Driver;
use super::native::NativeObject;
use super::property::PropertyDescriptor;
use super::realm::Realm;
use super::reference::Reference;
use super::task::{NativeFn, Task};
use super::value::{PreferredType, PropertyKey, Value};

/// Own property table, in insertion order
pub type PropertyMap = IndexMap<PropertyKey, PropertyDescriptor, FxBuildHasher>;

/// A callable object's native behaviour
#[derive(Clone)]
pub struct NativeFunction {
    pub name: String,
    pub behavior: NativeFn,
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NativeFunction({})", self.name)
    }
}

/// Object specializations
#[derive(Debug, Clone)]
pub enum ObjectKind {
    /// Ordinary object
    Ordinary,
    /// Array object; elements live in the property table
    Array,
    /// Callable object
    Function(NativeFunction),
    /// Error object
    Error,
    /// Wrapper around a boxed primitive
    Primitive(Value),
}

/// JavaScript object
pub struct Object {
    kind: ObjectKind,
    properties: PropertyMap,
    prototype: Option<ObjectRef>,
    extensible: bool,
    well_known_name: Option<String>,
}

impl Object {
    fn new(kind: ObjectKind, prototype: Option<ObjectRef>) -> Self {
        Self {
            kind,
            properties: PropertyMap::default(),
            prototype,
            extensible: true,
            well_known_name: None,
        }
    }
}

/// Shared handle to an [`Object`]; equality is identity
#[derive(Clone)]
pub struct ObjectRef(Rc<RefCell<Object>>);

impl ObjectRef {
    pub fn new(kind: ObjectKind, prototype: Option<ObjectRef>) -> Self {
        ObjectRef(Rc::new(RefCell::new(Object::new(kind, prototype))))
    }

    /// An ordinary object with an explicit prototype (or none)
    pub fn with_prototype(prototype: Option<ObjectRef>) -> Self {
        Self::new(ObjectKind::Ordinary, prototype)
    }

    /// An ordinary object inheriting from the realm's `Object.prototype`
    pub fn in_realm(realm: &Realm) -> Self {
        Self::with_prototype(Some(realm.object_prototype().clone()))
    }

    pub fn ptr_eq(&self, other: &ObjectRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    fn as_ptr(&self) -> *const RefCell<Object> {
        Rc::as_ptr(&self.0)
    }

    // ---------------------------------------------------------------------
    // Classification
    // ---------------------------------------------------------------------

    /// The class tag (`"Object"`, `"Array"`, ...)
    pub fn class_name(&self) -> &'static str {
        match &self.0.borrow().kind {
            ObjectKind::Ordinary => "Object",
            ObjectKind::Array => "Array",
            ObjectKind::Function(_) => "Function",
            ObjectKind::Error => "Error",
            ObjectKind::Primitive(Value::Boolean(_)) => "Boolean",
            ObjectKind::Primitive(Value::Number(_)) => "Number",
            ObjectKind::Primitive(Value::String(_)) => "String",
            ObjectKind::Primitive(Value::Symbol(_)) => "Symbol",
            ObjectKind::Primitive(_) => "Object",
        }
    }

    pub fn is_callable(&self) -> bool {
        matches!(self.0.borrow().kind, ObjectKind::Function(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self.0.borrow().kind, ObjectKind::Array)
    }

    /// `"function"` when callable, `"object"` otherwise
    pub fn type_of(&self) -> &'static str {
        if self.is_callable() {
            "function"
        } else {
            "object"
        }
    }

    pub fn native_function(&self) -> Option<NativeFunction> {
        match &self.0.borrow().kind {
            ObjectKind::Function(func) => Some(func.clone()),
            _ => None,
        }
    }

    pub fn function_name(&self) -> Option<String> {
        self.native_function().map(|func| func.name)
    }

    /// The boxed primitive of a wrapper object
    pub fn primitive_value(&self) -> Option<Value> {
        match &self.0.borrow().kind {
            ObjectKind::Primitive(value) => Some(value.clone()),
            _ => None,
        }
    }

    /// Diagnostic name such as `"ObjectPrototype"`
    pub fn well_known_name(&self) -> Option<String> {
        self.0.borrow().well_known_name.clone()
    }

    pub fn set_well_known_name(&self, name: impl Into<String>) {
        self.0.borrow_mut().well_known_name = Some(name.into());
    }

    // ---------------------------------------------------------------------
    // Own property table
    // ---------------------------------------------------------------------

    pub fn get_own(&self, key: &PropertyKey) -> Option<PropertyDescriptor> {
        self.0.borrow().properties.get(key).cloned()
    }

    pub fn has_own_property(&self, key: impl Into<PropertyKey>) -> bool {
        self.0.borrow().properties.contains_key(&key.into())
    }

    /// Install a slot as is, replacing any existing one in place. Bypasses
    /// extensibility and attribute checks.
    pub fn define_own_property(&self, key: impl Into<PropertyKey>, desc: PropertyDescriptor) {
        self.0.borrow_mut().properties.insert(key.into(), desc);
    }

    /// `define_own_property` for a plain writable/enumerable/configurable value
    pub fn raw_set_property(&self, key: impl Into<PropertyKey>, value: Value) {
        self.define_own_property(key, PropertyDescriptor::data(value));
    }

    pub fn own_keys(&self) -> Vec<PropertyKey> {
        self.0.borrow().properties.keys().cloned().collect()
    }

    pub fn is_extensible(&self) -> bool {
        self.0.borrow().extensible
    }

    pub fn prevent_extensions(&self) {
        self.0.borrow_mut().extensible = false;
    }

    /// Replace the value of an existing data slot (or create a default one),
    /// ignoring `writable`. Used by the native bridge's trapdoors.
    pub(crate) fn overwrite_data(&self, key: PropertyKey, value: Value) -> bool {
        let mut obj = self.0.borrow_mut();
        if let Some(desc) = obj.properties.get_mut(&key) {
            desc.overwrite_value(value);
            return true;
        }
        if !obj.extensible {
            return false;
        }
        obj.properties.insert(key, PropertyDescriptor::data(value));
        true
    }

    // ---------------------------------------------------------------------
    // Prototype chain
    // ---------------------------------------------------------------------

    pub fn get_prototype(&self) -> Option<ObjectRef> {
        self.0.borrow().prototype.clone()
    }

    /// Rebind the inherited-lookup relation. `None` clears it.
    pub fn set_prototype(&self, prototype: Option<ObjectRef>) {
        tracing::debug!(
            class = self.class_name(),
            prototype = prototype.as_ref().map(ObjectRef::class_name),
            "set prototype"
        );
        self.0.borrow_mut().prototype = prototype;
    }

    /// `set_prototype` from a language value: `null`/`undefined` clear the
    /// link, an object becomes the new prototype. Other primitives are
    /// rejected and leave the link untouched.
    pub fn set_prototype_value(&self, prototype: &Value) -> bool {
        match prototype {
            Value::Undefined | Value::Null => {
                self.set_prototype(None);
                true
            }
            Value::Object(proto) => {
                self.set_prototype(Some(proto.clone()));
                true
            }
            _ => false,
        }
    }

    /// Drop every own property, then rebind the prototype
    pub fn erase_and_set_prototype(&self, prototype: Option<ObjectRef>) {
        self.0.borrow_mut().properties.clear();
        self.set_prototype(prototype);
    }

    /// The ancestors of this object, nearest first, stopping at the first
    /// repeated link
    pub fn prototype_chain(&self) -> PrototypeChain {
        PrototypeChain::new(self.get_prototype())
    }

    /// Find the slot for `key`: own first, then each ancestor
    pub fn lookup(&self, key: &PropertyKey) -> Option<(ObjectRef, PropertyDescriptor)> {
        PrototypeChain::new(Some(self.clone()))
            .find_map(|obj| obj.get_own(key).map(|desc| (obj, desc)))
    }

    // ---------------------------------------------------------------------
    // Property protocol
    // ---------------------------------------------------------------------

    /// Resolve `key` to a reference handle. `receiver` defaults to this object.
    pub fn reference(&self, key: impl Into<PropertyKey>, receiver: Option<Value>) -> Reference {
        let key = key.into();
        let exists = self.lookup(&key).is_some();
        let receiver = receiver.unwrap_or_else(|| Value::Object(self.clone()));
        Reference::new(self.clone(), key, receiver, exists)
    }

    /// Read `key` with this object as receiver. Absent keys read as `undefined`.
    pub fn get(&self, key: impl Into<PropertyKey>, ctx: &EvalContext) -> Task {
        self.get_with_receiver(key, &Value::Object(self.clone()), ctx)
    }

    /// Read `key`, binding accessors to `receiver`
    pub fn get_with_receiver(
        &self,
        key: impl Into<PropertyKey>,
        receiver: &Value,
        ctx: &EvalContext,
    ) -> Task {
        match self.lookup(&key.into()) {
            Some((_, desc)) => desc.get_value(receiver, ctx),
            None => Task::undefined(),
        }
    }

    /// Write `key`; a newly created slot is enumerable
    pub fn set(&self, key: impl Into<PropertyKey>, value: Value, ctx: &EvalContext) -> Task {
        self.set_with(key, value, ctx, true)
    }

    /// Write `key`, yielding `true` when the write took effect.
    ///
    /// An own slot handles the write itself. Otherwise an extensible object
    /// gets a new writable, configurable data slot with the given
    /// `enumerable` attribute, even when an ancestor has the key. A
    /// non-extensible object ignores the write.
    pub fn set_with(
        &self,
        key: impl Into<PropertyKey>,
        value: Value,
        ctx: &EvalContext,
        enumerable: bool,
    ) -> Task {
        let key = key.into();
        let receiver = Value::Object(self.clone());
        let name = key.to_string();
        let mut obj = self.0.borrow_mut();
        if let Some(desc) = obj.properties.get_mut(&key) {
            return desc.set_value(&name, &receiver, value, ctx);
        }
        if !obj.extensible {
            tracing::trace!(key = %name, "write to non-extensible object ignored");
            return Task::normal(Value::Boolean(false));
        }
        tracing::trace!(key = %name, enumerable, "creating property");
        let mut desc = PropertyDescriptor::data(Value::Undefined);
        desc.set_enumerable(enumerable);
        let task = desc.set_value(&name, &receiver, value, ctx);
        obj.properties.insert(key, desc);
        task
    }

    /// Write `key` and drive any setter to completion on a private driver
    pub fn set_immediate(
        &self,
        key: impl Into<PropertyKey>,
        value: Value,
        ctx: &EvalContext,
    ) -> Result<Completion> {
        Driver::new().run(self.set(key, value, ctx))
    }

    /// Whether `key` resolves anywhere on the chain
    pub fn has(&self, key: impl Into<PropertyKey>) -> bool {
        self.lookup(&key.into()).is_some()
    }

    /// Remove an own slot.
    ///
    /// Absent and merely inherited keys report `true`. A non-configurable
    /// slot stays; the result is `false`, or a TypeError under strict `ctx`.
    pub fn delete(&self, key: impl Into<PropertyKey>, ctx: &EvalContext) -> Completion {
        let key = key.into();
        let mut obj = self.0.borrow_mut();
        let deletable = match obj.properties.get(&key) {
            None => return Completion::Normal(Value::Boolean(true)),
            Some(desc) => desc.can_delete(),
        };
        if deletable {
            obj.properties.shift_remove(&key);
            return Completion::Normal(Value::Boolean(true));
        }
        drop(obj);
        if ctx.is_strict() {
            tracing::debug!(%key, "strict delete of non-configurable property");
            ctx.type_error(messages::cannot_delete_property(&key.to_string()))
        } else {
            Completion::Normal(Value::Boolean(false))
        }
    }

    /// The `in` operator: ToPropertyKey on `key`, then [`has`](Self::has)
    pub fn in_operator(&self, key: &Value, ctx: &EvalContext) -> Task {
        let obj = self.clone();
        key.to_property_key(ctx)
            .map(move |key| Value::Boolean(obj.has(PropertyKey::from_primitive(&key))))
    }

    /// Own enumerable keys, as of now
    pub fn observable_properties(&self) -> ObservableProperties {
        let keys: Vec<PropertyKey> = self
            .0
            .borrow()
            .properties
            .iter()
            .filter(|(_, desc)| desc.enumerable())
            .map(|(key, _)| key.clone())
            .collect();
        ObservableProperties {
            keys: keys.into_iter(),
        }
    }

    // ---------------------------------------------------------------------
    // instanceof
    // ---------------------------------------------------------------------

    /// `this instanceof other`
    pub fn instance_of(&self, other: &ObjectRef, ctx: &EvalContext) -> Task {
        other.constructor_of(&Value::Object(self.clone()), ctx)
    }

    /// Whether `what` has this object's `prototype` property on its chain.
    ///
    /// The walk stops with `false` at the end of the chain or at the first
    /// prototype seen twice.
    pub fn constructor_of(&self, what: &Value, ctx: &EvalContext) -> Task {
        let what = what.clone();
        self.get("prototype", ctx).map(move |target| {
            let (Value::Object(start), Value::Object(target)) = (what, target) else {
                return Value::Boolean(false);
            };
            let found = start.prototype_chain().any(|proto| proto.ptr_eq(&target));
            Value::Boolean(found)
        })
    }

    // ---------------------------------------------------------------------
    // Coercions
    // ---------------------------------------------------------------------

    /// OrdinaryToPrimitive: try `valueOf`/`toString` in hint order; the first
    /// non-object result wins. A throwing candidate aborts the conversion.
    pub fn to_primitive(&self, hint: PreferredType, ctx: &EvalContext) -> Task {
        try_conversion_methods(self.clone(), hint.method_order(), 0, ctx.clone())
    }

    pub fn to_number_value(&self, ctx: &EvalContext) -> Task {
        let ctx2 = ctx.clone();
        self.to_primitive(PreferredType::Number, ctx)
            .and_then(move |prim| prim.to_number_value(&ctx2))
    }

    pub fn to_string_value(&self, ctx: &EvalContext) -> Task {
        let ctx2 = ctx.clone();
        self.to_primitive(PreferredType::String, ctx)
            .and_then(move |prim| prim.to_string_value(&ctx2))
    }

    /// Objects are their own ToObject
    pub fn to_object_value(&self) -> Task {
        Task::normal(Value::Object(self.clone()))
    }

    /// `this + other`
    pub fn add(&self, other: &Value, ctx: &EvalContext) -> Task {
        Value::Object(self.clone()).add(other, ctx)
    }

    /// The object side of `==`.
    ///
    /// Against a primitive, this object is converted with a `"string"` hint
    /// when `other` is a string and a `"number"` hint otherwise, then compared
    /// again. Against another object, this object is still converted with a
    /// `"string"` hint (a throw propagates) but the answer is identity.
    /// `undefined` and `null` never equal an object and convert nothing.
    pub fn loose_equals(&self, other: &Value, ctx: &EvalContext) -> Task {
        match other {
            Value::Object(obj) => {
                let same = self.ptr_eq(obj);
                self.to_primitive(PreferredType::String, ctx)
                    .and_then(move |_| Task::normal(Value::Boolean(same)))
            }
            Value::Undefined | Value::Null => Task::normal(Value::Boolean(false)),
            primitive => {
                let hint = if primitive.is_string() {
                    PreferredType::String
                } else {
                    PreferredType::Number
                };
                let other = primitive.clone();
                let ctx2 = ctx.clone();
                self.to_primitive(hint, ctx)
                    .and_then(move |prim| prim.loose_equals(&other, &ctx2))
            }
        }
    }

    // ---------------------------------------------------------------------
    // Host bridging
    // ---------------------------------------------------------------------

    /// Live host-side view of this object
    pub fn to_native(&self) -> NativeObject {
        NativeObject::new(self.clone())
    }

    /// Class tag, well-known name, prototype summary and own slots.
    /// Object-valued slots are shown as markers, never expanded.
    pub fn debug_string(&self) -> String {
        let obj = self.0.borrow();
        let mut out = format!("{{ [{}]", self.class_name());
        if let Some(name) = &obj.well_known_name {
            out.push_str(&format!(" ({})", name));
        }
        let mut entries = Vec::with_capacity(obj.properties.len() + 1);
        if let Some(proto) = &obj.prototype {
            let summary = proto
                .well_known_name()
                .unwrap_or_else(|| proto.class_name().to_string());
            entries.push(format!("[[Prototype]]: {}", summary));
        }
        for (key, desc) in &obj.properties {
            let rendered = match desc.value() {
                None => "[Getter/Setter]".to_string(),
                Some(Value::Object(value)) if value.is_callable() => "[Function]".to_string(),
                Some(Value::Object(_)) => "[Object]".to_string(),
                Some(value) => value.debug_string(),
            };
            entries.push(format!("{}: {}", key, rendered));
        }
        if !entries.is_empty() {
            out.push(' ');
            out.push_str(&entries.join(", "));
        }
        out.push_str(" }");
        out
    }
}

/// One step of OrdinaryToPrimitive
fn try_conversion_methods(
    obj: ObjectRef,
    names: [&'static str; 2],
    index: usize,
    ctx: EvalContext,
) -> Task {
    let Some(name) = names.get(index).copied() else {
        tracing::debug!(class = obj.class_name(), "no conversion method produced a primitive");
        return ctx.throw_type_error(messages::CANNOT_CONVERT_TO_PRIMITIVE);
    };
    let this = Value::Object(obj.clone());
    obj.get(name, &ctx).and_then(move |method| {
        if !method.is_callable() {
            return try_conversion_methods(obj, names, index + 1, ctx);
        }
        let next_ctx = ctx.clone();
        Task::call(method, this, Vec::new(), &ctx).then(move |completion| match completion {
            Completion::Normal(result) | Completion::Return(result) if !result.is_object() => {
                Task::normal(result)
            }
            thrown @ Completion::Throw(_) => Task::Ready(thrown),
            _ => try_conversion_methods(obj, names, index + 1, next_ctx),
        })
    })
}

impl PartialEq for ObjectRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for ObjectRef {}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectRef([{}] @ {:p})", self.class_name(), self.as_ptr())
    }
}

/// Iterator over a prototype chain with a cycle guard
pub struct PrototypeChain {
    next: Option<ObjectRef>,
    visited: FxHashSet<*const RefCell<Object>>,
    cycle_detected: bool,
}

impl PrototypeChain {
    /// Walk from `start` (inclusive) through its prototypes
    pub fn new(start: Option<ObjectRef>) -> Self {
        Self {
            next: start,
            visited: FxHashSet::default(),
            cycle_detected: false,
        }
    }

    /// Whether the walk ended on a repeated link rather than a `null` prototype
    pub fn cycle_detected(&self) -> bool {
        self.cycle_detected
    }
}

impl Iterator for PrototypeChain {
    type Item = ObjectRef;

    fn next(&mut self) -> Option<ObjectRef> {
        let current = self.next.take()?;
        if !self.visited.insert(current.as_ptr()) {
            tracing::trace!(class = current.class_name(), "prototype cycle detected");
            self.cycle_detected = true;
            return None;
        }
        self.next = current.get_prototype();
        Some(current)
    }
}

impl FusedIterator for PrototypeChain {}

/// Single-pass sequence of an object's enumerable own keys, fixed when the
/// sequence is created
#[derive(Debug)]
pub struct ObservableProperties {
    keys: std::vec::IntoIter<PropertyKey>,
}

impl Iterator for ObservableProperties {
    type Item = Value;

    fn next(&mut self) -> Option<Value> {
        self.keys.next().map(|key| key.to_value())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.keys.size_hint()
    }
}

impl ExactSizeIterator for ObservableProperties {}

impl FusedIterator for ObservableProperties {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::{PropertyFlags, Realm};

    fn ctx() -> EvalContext {
        EvalContext::new(Realm::new())
    }

    fn ready_value(task: Task) -> Value {
        match task.into_ready() {
            Ok(Completion::Normal(v)) => v,
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_read_after_write() {
        let ctx = ctx();
        let obj = ObjectRef::with_prototype(None);
        let written = ready_value(obj.set("x", Value::Number(4.0), &ctx));
        assert_eq!(written, Value::Boolean(true));
        assert_eq!(ready_value(obj.get("x", &ctx)), Value::Number(4.0));
        assert_eq!(ready_value(obj.get("missing", &ctx)), Value::Undefined);
    }

    #[test]
    fn test_inherited_lookup_and_shadowing() {
        let ctx = ctx();
        let proto = ObjectRef::with_prototype(None);
        proto.raw_set_property("shared", Value::from("proto"));
        let child = ObjectRef::with_prototype(Some(proto.clone()));

        assert_eq!(ready_value(child.get("shared", &ctx)), Value::from("proto"));
        assert!(child.has("shared"));
        assert!(!child.has_own_property("shared"));

        // writes land on the receiver, never on the ancestor
        ready_value(child.set("shared", Value::from("own"), &ctx));
        assert_eq!(ready_value(child.get("shared", &ctx)), Value::from("own"));
        assert_eq!(ready_value(proto.get("shared", &ctx)), Value::from("proto"));

        child.set_prototype(None);
        assert!(child.get_prototype().is_none());
    }

    #[test]
    fn test_non_extensible_set_is_noop() {
        let ctx = ctx();
        let obj = ObjectRef::with_prototype(None);
        obj.raw_set_property("kept", Value::Number(1.0));
        obj.prevent_extensions();

        assert_eq!(ready_value(obj.set("fresh", Value::Number(2.0), &ctx)), Value::Boolean(false));
        assert!(!obj.has_own_property("fresh"));
        assert_eq!(ready_value(obj.set("kept", Value::Number(3.0), &ctx)), Value::Boolean(true));
        assert_eq!(ready_value(obj.get("kept", &ctx)), Value::Number(3.0));
    }

    #[test]
    fn test_set_with_enumerable_attribute() {
        let ctx = ctx();
        let obj = ObjectRef::with_prototype(None);
        ready_value(obj.set_with("hidden", Value::Null, &ctx, false));
        let desc = obj.get_own(&"hidden".into()).unwrap();
        assert!(!desc.enumerable());
        assert!(desc.writable());
        assert!(desc.configurable());
    }

    #[test]
    fn test_delete_rules() {
        let realm = Realm::new();
        let sloppy = EvalContext::new(realm.clone());
        let strict = EvalContext::strict(realm);
        let obj = ObjectRef::with_prototype(None);
        obj.raw_set_property("gone", Value::Number(1.0));
        obj.define_own_property(
            "fixed",
            PropertyDescriptor::data_with_flags(Value::Number(2.0), PropertyFlags::ENUMERABLE),
        );

        assert!(matches!(obj.delete("gone", &sloppy), Completion::Normal(Value::Boolean(true))));
        assert!(!obj.has_own_property("gone"));
        assert!(matches!(obj.delete("fixed", &sloppy), Completion::Normal(Value::Boolean(false))));
        assert!(obj.delete("fixed", &strict).is_throw());
        assert!(obj.has_own_property("fixed"));
        assert!(matches!(obj.delete("never", &strict), Completion::Normal(Value::Boolean(true))));
    }

    #[test]
    fn test_prototype_chain_stops_on_cycle() {
        let a = ObjectRef::with_prototype(None);
        let b = ObjectRef::with_prototype(Some(a.clone()));
        a.set_prototype(Some(b.clone()));

        let mut chain = PrototypeChain::new(Some(a.clone()));
        assert_eq!(chain.by_ref().count(), 2);
        assert!(chain.cycle_detected());
        assert!(!a.has("nowhere"));
    }

    #[test]
    fn test_observable_properties_snapshot() {
        let ctx = ctx();
        let obj = ObjectRef::with_prototype(None);
        ready_value(obj.set("a", Value::Number(1.0), &ctx));
        ready_value(obj.set_with("b", Value::Number(2.0), &ctx, false));
        ready_value(obj.set("c", Value::Number(3.0), &ctx));

        let keys = obj.observable_properties();
        ready_value(obj.set("d", Value::Number(4.0), &ctx));
        let keys: Vec<Value> = keys.collect();
        assert_eq!(keys, vec![Value::from("a"), Value::from("c")]);
    }

    #[test]
    fn test_erase_and_set_prototype_drops_own_slots() {
        let proto = ObjectRef::with_prototype(None);
        let obj = ObjectRef::with_prototype(None);
        obj.raw_set_property("x", Value::Number(1.0));
        obj.erase_and_set_prototype(Some(proto.clone()));
        assert!(!obj.has_own_property("x"));
        assert_eq!(obj.get_prototype(), Some(proto));
    }

    #[test]
    fn test_set_prototype_value() {
        let proto = ObjectRef::with_prototype(None);
        let obj = ObjectRef::with_prototype(None);
        assert!(obj.set_prototype_value(&Value::Object(proto.clone())));
        assert_eq!(obj.get_prototype(), Some(proto));
        assert!(!obj.set_prototype_value(&Value::Number(1.0)));
        assert!(obj.get_prototype().is_some());
        assert!(obj.set_prototype_value(&Value::Null));
        assert!(obj.get_prototype().is_none());
    }

    #[test]
    fn test_debug_string() {
        let realm = Realm::new();
        let obj = ObjectRef::in_realm(&realm);
        obj.set_well_known_name("Sample");
        obj.raw_set_property("n", Value::Number(1.0));
        obj.raw_set_property("o", Value::Object(ObjectRef::with_prototype(None)));
        obj.define_own_property("acc", PropertyDescriptor::accessor(None, None));
        assert_eq!(
            obj.debug_string(),
            "{ [Object] (Sample) [[Prototype]]: ObjectPrototype, n: 1, o: [Object], acc: [Getter/Setter] }"
        );
    }

    #[test]
    fn test_reference_handle() {
        let ctx = ctx();
        let obj = ObjectRef::with_prototype(None);
        obj.raw_set_property("x", Value::Number(1.0));

        let present = obj.reference("x", None);
        assert!(present.is_variable());
        let absent = obj.reference("y", None);
        assert!(!absent.is_variable());
        assert_eq!(ready_value(absent.get_value(&ctx)), Value::Undefined);

        // setValue on a missing slot degenerates to set
        ready_value(absent.set_value(Value::Number(2.0), &ctx));
        assert_eq!(ready_value(obj.get("y", &ctx)), Value::Number(2.0));
    }
}
