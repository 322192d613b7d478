//! Evaluation context threaded through every suspendable operation

use std::fmt;
use std::rc::Rc;

use crate::error::{messages, ErrorKind};

use super::completion::Completion;
use super::realm::Realm;
use super::task::Task;

/// The strictness flag and the realm an operation runs in.
///
/// Cheap to clone: one `Rc` and a flag.
#[derive(Clone)]
pub struct EvalContext {
    realm: Rc<Realm>,
    strict: bool,
}

impl EvalContext {
    /// A non-strict context over `realm`
    pub fn new(realm: Rc<Realm>) -> Self {
        Self { realm, strict: false }
    }

    pub fn strict(realm: Rc<Realm>) -> Self {
        Self { realm, strict: true }
    }

    /// Same realm, different strictness
    pub fn with_strict(&self, strict: bool) -> Self {
        Self {
            realm: self.realm.clone(),
            strict,
        }
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub fn realm(&self) -> &Rc<Realm> {
        &self.realm
    }

    /// A Throw completion carrying a fresh error object of `kind`
    pub fn error(&self, kind: ErrorKind, message: impl Into<String>) -> Completion {
        Completion::Throw(self.realm.make_error(kind, message).into())
    }

    pub fn type_error(&self, message: impl Into<String>) -> Completion {
        self.error(ErrorKind::TypeError, message)
    }

    /// `type_error` as an already finished task
    pub fn throw_type_error(&self, message: impl Into<String>) -> Task {
        Task::Ready(self.type_error(message))
    }

    pub fn stack_overflow(&self) -> Completion {
        self.error(ErrorKind::RangeError, messages::MAXIMUM_CALL_STACK)
    }
}

impl fmt::Debug for EvalContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EvalContext")
            .field("strict", &self.strict)
            .finish_non_exhaustive()
    }
}
