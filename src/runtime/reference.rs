//! Reference handles
//!
//! A [`Reference`] pairs a base object with a key and the receiver accessors
//! should see. It lets an evaluator resolve `obj.key` once and later read,
//! write or delete through the handle.

use super::completion::Completion;
use super::context::EvalContext;
use super::object::ObjectRef;
use super::task::Task;
use super::value::{PropertyKey, Value};

#[derive(Debug, Clone)]
pub struct Reference {
    base: ObjectRef,
    key: PropertyKey,
    receiver: Value,
    exists: bool,
}

impl Reference {
    pub(crate) fn new(base: ObjectRef, key: PropertyKey, receiver: Value, exists: bool) -> Self {
        Self {
            base,
            key,
            receiver,
            exists,
        }
    }

    /// Whether the key resolved to a slot (own or inherited) when the
    /// reference was made
    pub fn is_variable(&self) -> bool {
        self.exists
    }

    pub fn base(&self) -> &ObjectRef {
        &self.base
    }

    pub fn key(&self) -> &PropertyKey {
        &self.key
    }

    pub fn receiver(&self) -> &Value {
        &self.receiver
    }

    /// Read through the reference; accessors are bound to the receiver. A
    /// reference that never resolved reads as `undefined`, even if the slot
    /// has been created since.
    pub fn get_value(&self, ctx: &EvalContext) -> Task {
        if !self.exists {
            return Task::undefined();
        }
        self.base
            .get_with_receiver(self.key.clone(), &self.receiver, ctx)
    }

    /// Write through the reference; same rules as [`ObjectRef::set`]
    pub fn set_value(&self, value: Value, ctx: &EvalContext) -> Task {
        self.base.set(self.key.clone(), value, ctx)
    }

    /// Delete the slot on the base. A reference that never resolved reports
    /// `false`.
    pub fn delete(&self, ctx: &EvalContext) -> Completion {
        if !self.exists {
            return Completion::Normal(Value::Boolean(false));
        }
        self.base.delete(self.key.clone(), ctx)
    }
}
