//! Property descriptors
//!
//! A property slot is either a data slot (`value` + `writable`) or an accessor
//! slot (`get`/`set` functions), never both. `enumerable` and `configurable`
//! apply to both shapes.

use std::fmt;

use bitflags::bitflags;

use crate::error::messages;

use super::completion::Completion;
use super::context::EvalContext;
use super::object::ObjectRef;
use super::task::Task;
use super::value::Value;

bitflags! {
    /// Attribute flags of a property slot
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PropertyFlags: u8 {
        /// Data slots only: `setValue` may replace the value
        const WRITABLE = 0b001;
        /// Listed by `observableProperties`
        const ENUMERABLE = 0b010;
        /// The slot may be deleted
        const CONFIGURABLE = 0b100;
    }
}

impl Default for PropertyFlags {
    /// What an implicit assignment creates
    fn default() -> Self {
        PropertyFlags::all()
    }
}

/// The two mutually exclusive slot shapes
#[derive(Clone)]
pub enum Slot {
    Data(Value),
    Accessor {
        getter: Option<ObjectRef>,
        setter: Option<ObjectRef>,
    },
}

/// A single property slot
#[derive(Clone)]
pub struct PropertyDescriptor {
    slot: Slot,
    flags: PropertyFlags,
}

impl PropertyDescriptor {
    /// A writable, enumerable, configurable data slot
    pub fn data(value: Value) -> Self {
        Self {
            slot: Slot::Data(value),
            flags: PropertyFlags::default(),
        }
    }

    pub fn data_with_flags(value: Value, flags: PropertyFlags) -> Self {
        Self {
            slot: Slot::Data(value),
            flags,
        }
    }

    /// An enumerable, configurable accessor slot. `WRITABLE` has no meaning
    /// for accessors and is dropped.
    pub fn accessor(getter: Option<ObjectRef>, setter: Option<ObjectRef>) -> Self {
        Self {
            slot: Slot::Accessor { getter, setter },
            flags: PropertyFlags::ENUMERABLE | PropertyFlags::CONFIGURABLE,
        }
    }

    pub fn with_flags(mut self, flags: PropertyFlags) -> Self {
        self.flags = match self.slot {
            Slot::Data(_) => flags,
            Slot::Accessor { .. } => flags - PropertyFlags::WRITABLE,
        };
        self
    }

    pub fn slot(&self) -> &Slot {
        &self.slot
    }

    pub fn flags(&self) -> PropertyFlags {
        self.flags
    }

    pub fn is_data(&self) -> bool {
        matches!(self.slot, Slot::Data(_))
    }

    pub fn is_accessor(&self) -> bool {
        matches!(self.slot, Slot::Accessor { .. })
    }

    pub fn writable(&self) -> bool {
        self.flags.contains(PropertyFlags::WRITABLE)
    }

    pub fn enumerable(&self) -> bool {
        self.flags.contains(PropertyFlags::ENUMERABLE)
    }

    pub fn configurable(&self) -> bool {
        self.flags.contains(PropertyFlags::CONFIGURABLE)
    }

    pub fn set_enumerable(&mut self, enumerable: bool) {
        self.flags.set(PropertyFlags::ENUMERABLE, enumerable);
    }

    pub fn set_configurable(&mut self, configurable: bool) {
        self.flags.set(PropertyFlags::CONFIGURABLE, configurable);
    }

    pub fn set_writable(&mut self, writable: bool) {
        if self.is_data() {
            self.flags.set(PropertyFlags::WRITABLE, writable);
        }
    }

    /// The stored value of a data slot
    pub fn value(&self) -> Option<&Value> {
        match &self.slot {
            Slot::Data(value) => Some(value),
            Slot::Accessor { .. } => None,
        }
    }

    pub fn getter(&self) -> Option<&ObjectRef> {
        match &self.slot {
            Slot::Accessor { getter, .. } => getter.as_ref(),
            Slot::Data(_) => None,
        }
    }

    pub fn setter(&self) -> Option<&ObjectRef> {
        match &self.slot {
            Slot::Accessor { setter, .. } => setter.as_ref(),
            Slot::Data(_) => None,
        }
    }

    /// Replace the stored value without consulting `writable`
    pub(crate) fn overwrite_value(&mut self, value: Value) {
        self.slot = Slot::Data(value);
    }

    /// Read the slot on behalf of `receiver`.
    ///
    /// Data slots answer immediately (`writable` does not gate reads). An
    /// accessor suspends on its getter bound to `receiver`; a missing getter
    /// reads as `undefined`.
    pub fn get_value(&self, receiver: &Value, ctx: &EvalContext) -> Task {
        match &self.slot {
            Slot::Data(value) => Task::normal(value.clone()),
            Slot::Accessor { getter: Some(getter), .. } => {
                Task::call(getter.clone().into(), receiver.clone(), Vec::new(), ctx)
                    .then(|completion| Task::Ready(completion.normalize_call_result()))
            }
            Slot::Accessor { getter: None, .. } => Task::undefined(),
        }
    }

    /// Write the slot on behalf of `receiver`, yielding `true` when the
    /// write took effect.
    ///
    /// A read-only data slot, or an accessor without setter, is a silent
    /// `false` unless `ctx` is strict, where it throws a TypeError. `name` is
    /// only used for the error message.
    pub fn set_value(
        &mut self,
        name: &str,
        receiver: &Value,
        value: Value,
        ctx: &EvalContext,
    ) -> Task {
        match &mut self.slot {
            Slot::Data(slot_value) => {
                if !self.flags.contains(PropertyFlags::WRITABLE) {
                    return reject(ctx, || messages::read_only_property(name));
                }
                *slot_value = value;
                Task::normal(Value::Boolean(true))
            }
            Slot::Accessor { setter: Some(setter), .. } => {
                Task::call(setter.clone().into(), receiver.clone(), vec![value], ctx).then(
                    |completion| match completion.normalize_call_result() {
                        Completion::Normal(_) => Task::normal(Value::Boolean(true)),
                        abrupt => Task::Ready(abrupt),
                    },
                )
            }
            Slot::Accessor { setter: None, .. } => {
                reject(ctx, || messages::getter_only_property(name))
            }
        }
    }

    /// Whether `delete` may remove this slot
    pub fn can_delete(&self) -> bool {
        self.configurable()
    }
}

/// Silent `false` in sloppy mode, TypeError in strict mode
fn reject(ctx: &EvalContext, message: impl FnOnce() -> String) -> Task {
    if ctx.is_strict() {
        let message = message();
        tracing::debug!(%message, "strict write rejected");
        ctx.throw_type_error(message)
    } else {
        Task::normal(Value::Boolean(false))
    }
}

impl fmt::Debug for PropertyDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.slot {
            Slot::Data(value) => f
                .debug_struct("PropertyDescriptor")
                .field("value", value)
                .field("flags", &self.flags)
                .finish(),
            Slot::Accessor { getter, setter } => f
                .debug_struct("PropertyDescriptor")
                .field("get", &getter.is_some())
                .field("set", &setter.is_some())
                .field("flags", &self.flags)
                .finish(),
        }
    }
}
