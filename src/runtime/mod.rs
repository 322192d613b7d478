//! Runtime core for jscore
//!
//! This module provides the value and object model (values, property
//! descriptors, completion records, the object protocol) and the machinery
//! that runs suspendable operations against it.

mod completion;
mod context;
mod driver;
mod native;
mod object;
mod property;
mod realm;
mod reference;
mod task;
mod value;

pub use completion::{Completion, CompletionType};
pub use context::EvalContext;
pub use driver::{Driver, DriverConfig, DriverStats, StepResult, DEFAULT_MAX_CALL_DEPTH};
pub use native::{NativeObject, NativeValue};
pub use object::{
    NativeFunction, Object, ObjectKind, ObjectRef, ObservableProperties, PropertyMap,
    PrototypeChain,
};
pub use property::{PropertyDescriptor, PropertyFlags, Slot};
pub use realm::Realm;
pub use reference::Reference;
pub use task::{Continuation, NativeFn, PendingCall, Task};
pub use value::{number_to_string, string_to_number, PreferredType, PropertyKey, Symbol, Value};

use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::error::{Error, ErrorKind, Result};

/// Runtime configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Evaluate in strict mode
    pub strict: bool,
    pub driver: DriverConfig,
}

impl RuntimeConfig {
    /// Parse a configuration from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn with_driver(mut self, driver: DriverConfig) -> Self {
        self.driver = driver;
        self
    }
}

/// A realm, an evaluation context over it and a driver
pub struct Runtime {
    realm: Rc<Realm>,
    context: EvalContext,
    driver: Driver,
    config: RuntimeConfig,
}

impl Runtime {
    /// Create a new non-strict runtime
    pub fn new() -> Self {
        Self::with_config(RuntimeConfig::default())
    }

    pub fn with_config(config: RuntimeConfig) -> Self {
        let realm = Realm::new();
        let context = EvalContext::new(realm.clone()).with_strict(config.strict);
        tracing::debug!(strict = config.strict, "runtime created");
        Self {
            realm,
            context,
            driver: Driver::with_config(config.driver.clone()),
            config,
        }
    }

    pub fn realm(&self) -> &Rc<Realm> {
        &self.realm
    }

    /// The context tasks for this runtime should be built with
    pub fn context(&self) -> &EvalContext {
        &self.context
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn stats(&self) -> DriverStats {
        self.driver.stats()
    }

    /// An ordinary object inheriting from `Object.prototype`
    pub fn new_object(&self) -> ObjectRef {
        self.realm.new_object()
    }

    /// Drive `task` to completion
    pub fn run(&mut self, task: Task) -> Result<Completion> {
        self.driver.run(task)
    }

    /// Drive `task` to completion and unwrap its value. A throw becomes
    /// [`Error::Uncaught`]; any other abrupt completion is reported as
    /// [`Error::AbruptCompletion`].
    pub fn eval(&mut self, task: Task) -> Result<Value> {
        match self.run(task)? {
            Completion::Normal(value) => Ok(value),
            Completion::Throw(thrown) => Err(uncaught(&thrown)),
            abrupt => Err(Error::AbruptCompletion(abrupt.completion_type())),
        }
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

/// Host error for a thrown value. Error objects are read without running
/// user code: only data slots for `name` and `message` are consulted.
fn uncaught(thrown: &Value) -> Error {
    let Value::Object(obj) = thrown else {
        return Error::uncaught(ErrorKind::GenericError, thrown.debug_string());
    };
    let native = obj.to_native();
    let kind = match native.get("name") {
        NativeValue::String(name) => ErrorKind::from_name(&name).unwrap_or(ErrorKind::GenericError),
        _ => ErrorKind::GenericError,
    };
    let message = match native.get("message") {
        NativeValue::String(message) => message,
        _ => String::new(),
    };
    tracing::debug!(%kind, %message, "uncaught exception");
    Error::uncaught(kind, message)
}
