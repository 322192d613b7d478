//! Realm intrinsics
//!
//! The handful of built-in objects the object model itself depends on:
//! `Object.prototype` (with `valueOf`/`toString`, so ordinary objects convert
//! to primitives), `Function.prototype`, `Array.prototype` and the `Array`
//! constructor, one prototype per [`ErrorKind`], and the wrapper prototypes
//! used when a primitive is boxed.

use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::error::ErrorKind;

use super::context::EvalContext;
use super::object::{NativeFunction, ObjectKind, ObjectRef};
use super::property::{PropertyDescriptor, PropertyFlags};
use super::task::Task;
use super::value::Value;

/// Attributes of built-in methods and intrinsic data slots
const HIDDEN: PropertyFlags = PropertyFlags::WRITABLE.union(PropertyFlags::CONFIGURABLE);

pub struct Realm {
    object_prototype: ObjectRef,
    function_prototype: ObjectRef,
    array_prototype: ObjectRef,
    array_constructor: ObjectRef,
    error_prototypes: FxHashMap<ErrorKind, ObjectRef>,
    boolean_prototype: ObjectRef,
    number_prototype: ObjectRef,
    string_prototype: ObjectRef,
    symbol_prototype: ObjectRef,
}

impl Realm {
    pub fn new() -> Rc<Realm> {
        let object_prototype = ObjectRef::with_prototype(None);
        object_prototype.set_well_known_name("ObjectPrototype");

        let function_prototype = ObjectRef::new(
            ObjectKind::Function(NativeFunction {
                name: String::new(),
                behavior: Rc::new(|_, _, _| Task::undefined()),
            }),
            Some(object_prototype.clone()),
        );
        function_prototype.set_well_known_name("FunctionPrototype");

        let builder = Builder {
            function_prototype: function_prototype.clone(),
        };
        builder.method(&object_prototype, "valueOf", |this, _, ctx| {
            this.to_object_value(ctx)
        });
        builder.method(&object_prototype, "toString", object_to_string);

        let array_prototype = ObjectRef::new(ObjectKind::Array, Some(object_prototype.clone()));
        array_prototype.set_well_known_name("ArrayPrototype");
        array_prototype.define_own_property(
            "length",
            PropertyDescriptor::data_with_flags(Value::Number(0.0), PropertyFlags::WRITABLE),
        );
        let array_constructor = builder.array_constructor(&array_prototype);

        let mut error_prototypes = FxHashMap::default();
        let base_error = builder.error_prototype(ErrorKind::GenericError, &object_prototype);
        builder.method(&base_error, "toString", error_to_string);
        for kind in ErrorKind::ALL {
            let proto = if kind == ErrorKind::GenericError {
                base_error.clone()
            } else {
                builder.error_prototype(kind, &base_error)
            };
            error_prototypes.insert(kind, proto);
        }

        let boolean_prototype = builder.wrapper_prototype(
            "Boolean",
            Value::Boolean(false),
            &object_prototype,
            |v| matches!(v, Value::Boolean(_)),
        );
        let number_prototype = builder.wrapper_prototype(
            "Number",
            Value::Number(0.0),
            &object_prototype,
            |v| matches!(v, Value::Number(_)),
        );
        let string_prototype = builder.wrapper_prototype(
            "String",
            Value::String(String::new()),
            &object_prototype,
            |v| matches!(v, Value::String(_)),
        );
        let symbol_prototype = ObjectRef::with_prototype(Some(object_prototype.clone()));
        symbol_prototype.set_well_known_name("SymbolPrototype");
        builder.method(&symbol_prototype, "valueOf", |this, _, ctx| {
            match unwrap_this(this, |v| matches!(v, Value::Symbol(_))) {
                Some(sym) => Task::normal(sym),
                None => ctx.throw_type_error(requires_this("Symbol", "valueOf")),
            }
        });
        builder.method(&symbol_prototype, "toString", |this, _, ctx| {
            match unwrap_this(this, |v| matches!(v, Value::Symbol(_))) {
                Some(Value::Symbol(sym)) => Task::normal(Value::String(sym.descriptive_string())),
                _ => ctx.throw_type_error(requires_this("Symbol", "toString")),
            }
        });

        tracing::debug!(error_kinds = error_prototypes.len(), "realm initialized");

        Rc::new(Realm {
            object_prototype,
            function_prototype,
            array_prototype,
            array_constructor,
            error_prototypes,
            boolean_prototype,
            number_prototype,
            string_prototype,
            symbol_prototype,
        })
    }

    pub fn object_prototype(&self) -> &ObjectRef {
        &self.object_prototype
    }

    pub fn function_prototype(&self) -> &ObjectRef {
        &self.function_prototype
    }

    pub fn array_prototype(&self) -> &ObjectRef {
        &self.array_prototype
    }

    /// The `Array` constructor; its `prototype` slot is [`array_prototype`](Self::array_prototype)
    pub fn array_constructor(&self) -> &ObjectRef {
        &self.array_constructor
    }

    pub fn error_prototype(&self, kind: ErrorKind) -> &ObjectRef {
        // every kind is installed by `new`
        &self.error_prototypes[&kind]
    }

    /// An ordinary object inheriting from `Object.prototype`
    pub fn new_object(&self) -> ObjectRef {
        ObjectRef::in_realm(self)
    }

    /// A callable object running `f` with `(this, args, ctx)`
    pub fn new_native_function<F>(&self, name: &str, f: F) -> ObjectRef
    where
        F: Fn(&Value, &[Value], &EvalContext) -> Task + 'static,
    {
        native_function(&self.function_prototype, name, f)
    }

    /// An error object of `kind` with a non-enumerable `message`
    pub fn make_error(&self, kind: ErrorKind, message: impl Into<String>) -> ObjectRef {
        let message = message.into();
        tracing::trace!(%kind, %message, "creating error object");
        let error = ObjectRef::new(ObjectKind::Error, Some(self.error_prototype(kind).clone()));
        error.define_own_property(
            "message",
            PropertyDescriptor::data_with_flags(Value::String(message), HIDDEN),
        );
        error
    }

    pub fn make_type_error(&self, message: impl Into<String>) -> ObjectRef {
        self.make_error(ErrorKind::TypeError, message)
    }

    /// Wrap a primitive in an object of the matching class. Objects are
    /// returned as is; `undefined` and `null` have no wrapper and yield a
    /// plain object.
    pub fn box_primitive(&self, value: &Value) -> ObjectRef {
        let proto = match value {
            Value::Object(obj) => return obj.clone(),
            Value::Undefined | Value::Null => return self.new_object(),
            Value::Boolean(_) => &self.boolean_prototype,
            Value::Number(_) => &self.number_prototype,
            Value::String(_) => &self.string_prototype,
            Value::Symbol(_) => &self.symbol_prototype,
        };
        let wrapper = ObjectRef::new(ObjectKind::Primitive(value.clone()), Some(proto.clone()));
        if let Value::String(s) = value {
            wrapper.define_own_property(
                "length",
                PropertyDescriptor::data_with_flags(
                    Value::Number(s.encode_utf16().count() as f64),
                    PropertyFlags::empty(),
                ),
            );
        }
        wrapper
    }

    /// An array holding `values` at indices `"0"`, `"1"`, ...
    pub fn make_array(&self, values: Vec<Value>) -> ObjectRef {
        let array = ObjectRef::new(ObjectKind::Array, Some(self.array_prototype.clone()));
        let length = values.len();
        for (index, value) in values.into_iter().enumerate() {
            array.raw_set_property(index.to_string(), value);
        }
        array.define_own_property(
            "length",
            PropertyDescriptor::data_with_flags(Value::Number(length as f64), PropertyFlags::WRITABLE),
        );
        array
    }
}

impl fmt::Debug for Realm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Realm").finish_non_exhaustive()
    }
}

/// Helper for wiring intrinsics before the realm exists
struct Builder {
    function_prototype: ObjectRef,
}

impl Builder {
    fn method<F>(&self, target: &ObjectRef, name: &str, f: F)
    where
        F: Fn(&Value, &[Value], &EvalContext) -> Task + 'static,
    {
        let func = native_function(&self.function_prototype, name, f);
        target.define_own_property(name, PropertyDescriptor::data_with_flags(func.into(), HIDDEN));
    }

    fn error_prototype(&self, kind: ErrorKind, parent: &ObjectRef) -> ObjectRef {
        let proto = ObjectRef::new(ObjectKind::Error, Some(parent.clone()));
        proto.set_well_known_name(format!("{}Prototype", kind.name()));
        proto.define_own_property(
            "name",
            PropertyDescriptor::data_with_flags(Value::from(kind.name()), HIDDEN),
        );
        proto.define_own_property(
            "message",
            PropertyDescriptor::data_with_flags(Value::from(""), HIDDEN),
        );
        proto
    }

    /// `Boolean.prototype` and friends: a wrapper of `default` whose
    /// `valueOf` unwraps and whose `toString` stringifies the unwrapped value
    fn wrapper_prototype(
        &self,
        class: &'static str,
        default: Value,
        object_prototype: &ObjectRef,
        accepts: fn(&Value) -> bool,
    ) -> ObjectRef {
        let proto = ObjectRef::new(ObjectKind::Primitive(default), Some(object_prototype.clone()));
        proto.set_well_known_name(format!("{}Prototype", class));
        self.method(&proto, "valueOf", move |this, _, ctx| match unwrap_this(this, accepts) {
            Some(prim) => Task::normal(prim),
            None => ctx.throw_type_error(requires_this(class, "valueOf")),
        });
        self.method(&proto, "toString", move |this, _, ctx| match unwrap_this(this, accepts) {
            Some(prim) => prim.to_string_value(ctx),
            None => ctx.throw_type_error(requires_this(class, "toString")),
        });
        proto
    }

    fn array_constructor(&self, array_prototype: &ObjectRef) -> ObjectRef {
        let ctor = native_function(&self.function_prototype, "Array", |_, args, ctx| {
            match args {
                [Value::Number(n)] => {
                    let len = *n;
                    if len < 0.0 || len.fract() != 0.0 || len > f64::from(u32::MAX) {
                        return Task::Ready(ctx.error(ErrorKind::RangeError, "Invalid array length"));
                    }
                    let array = ctx.realm().make_array(Vec::new());
                    array.define_own_property(
                        "length",
                        PropertyDescriptor::data_with_flags(Value::Number(len), PropertyFlags::WRITABLE),
                    );
                    Task::normal(array.into())
                }
                _ => Task::normal(ctx.realm().make_array(args.to_vec()).into()),
            }
        });
        ctor.define_own_property(
            "prototype",
            PropertyDescriptor::data_with_flags(array_prototype.clone().into(), PropertyFlags::empty()),
        );
        array_prototype.define_own_property(
            "constructor",
            PropertyDescriptor::data_with_flags(ctor.clone().into(), HIDDEN),
        );
        self.method(&ctor, "isArray", |_, args, _| {
            let is_array = args
                .first()
                .and_then(Value::as_object)
                .is_some_and(ObjectRef::is_array);
            Task::normal(Value::Boolean(is_array))
        });
        ctor
    }
}

fn native_function<F>(function_prototype: &ObjectRef, name: &str, f: F) -> ObjectRef
where
    F: Fn(&Value, &[Value], &EvalContext) -> Task + 'static,
{
    let func = ObjectRef::new(
        ObjectKind::Function(NativeFunction {
            name: name.to_string(),
            behavior: Rc::new(f),
        }),
        Some(function_prototype.clone()),
    );
    func.define_own_property(
        "name",
        PropertyDescriptor::data_with_flags(Value::from(name), PropertyFlags::CONFIGURABLE),
    );
    func
}

/// The primitive behind `this`, if it is (or wraps) one `accepts` allows
fn unwrap_this(this: &Value, accepts: fn(&Value) -> bool) -> Option<Value> {
    let prim = match this {
        Value::Object(obj) => obj.primitive_value()?,
        prim => prim.clone(),
    };
    accepts(&prim).then_some(prim)
}

fn requires_this(class: &str, method: &str) -> String {
    format!(
        "{}.prototype.{} requires that 'this' be a {}",
        class, method, class
    )
}

/// `Object.prototype.toString`
fn object_to_string(this: &Value, _args: &[Value], ctx: &EvalContext) -> Task {
    match this {
        Value::Undefined => Task::normal(Value::from("[object Undefined]")),
        Value::Null => Task::normal(Value::from("[object Null]")),
        other => other.to_object_value(ctx).map(|obj| {
            let class = obj.as_object().map_or("Object", ObjectRef::class_name);
            Value::String(format!("[object {}]", class))
        }),
    }
}

/// `Error.prototype.toString`: `name: message`, dropping whichever is empty
fn error_to_string(this: &Value, _args: &[Value], ctx: &EvalContext) -> Task {
    let Value::Object(obj) = this else {
        return ctx.throw_type_error("Error.prototype.toString requires that 'this' be an Object");
    };
    let obj = obj.clone();
    let ctx = ctx.clone();
    string_or(&obj, "name", "Error", &ctx).and_then(move |name| {
        string_or(&obj, "message", "", &ctx).map(move |message| {
            let name = name.as_str().unwrap_or_default();
            let message = message.as_str().unwrap_or_default();
            let rendered = match (name.is_empty(), message.is_empty()) {
                (true, _) => message.to_string(),
                (false, true) => name.to_string(),
                (false, false) => format!("{}: {}", name, message),
            };
            Value::String(rendered)
        })
    })
}

/// Read `key` as a string, `fallback` when it is `undefined`
fn string_or(obj: &ObjectRef, key: &'static str, fallback: &'static str, ctx: &EvalContext) -> Task {
    let ctx2 = ctx.clone();
    obj.get(key, ctx).and_then(move |value| {
        if value.is_undefined() {
            Task::normal(Value::from(fallback))
        } else {
            value.to_string_value(&ctx2)
        }
    })
}
