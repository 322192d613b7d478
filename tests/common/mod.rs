//! Shared test helpers for integration tests

use std::cell::RefCell;
use std::rc::Rc;

use jscore::{Completion, ObjectRef, Runtime, RuntimeConfig, Task, Value};

/// Install a tracing subscriber once; honours `RUST_LOG`
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A fresh non-strict runtime
pub fn runtime() -> Runtime {
    init_tracing();
    Runtime::new()
}

/// A fresh strict-mode runtime
#[allow(dead_code)]
pub fn strict_runtime() -> Runtime {
    init_tracing();
    Runtime::with_config(RuntimeConfig::default().strict(true))
}

/// Run `task` and return the value of its normal completion
#[allow(dead_code)]
pub fn eval(runtime: &mut Runtime, task: Task) -> Value {
    match runtime.run(task).expect("driver failed") {
        Completion::Normal(value) => value,
        other => panic!("expected a normal completion, got {}", other),
    }
}

/// Run `task` and return the thrown value
#[allow(dead_code)]
pub fn eval_throw(runtime: &mut Runtime, task: Task) -> Value {
    match runtime.run(task).expect("driver failed") {
        Completion::Throw(value) => value,
        other => panic!("expected a throw, got {}", other),
    }
}

/// A native function returning a constant, counting its calls
#[allow(dead_code)]
pub fn constant_fn(runtime: &Runtime, name: &str, result: Value) -> (ObjectRef, Rc<RefCell<u32>>) {
    let calls = Rc::new(RefCell::new(0));
    let counter = calls.clone();
    let func = runtime.realm().new_native_function(name, move |_, _, _| {
        *counter.borrow_mut() += 1;
        Task::normal(result.clone())
    });
    (func, calls)
}

/// A native function that throws a fresh TypeError with `message`
#[allow(dead_code)]
pub fn throwing_fn(runtime: &Runtime, message: &'static str) -> ObjectRef {
    runtime
        .realm()
        .new_native_function("thrower", move |_, _, ctx| ctx.throw_type_error(message))
}

/// The `message` data slot of a thrown error object
#[allow(dead_code)]
pub fn error_message(thrown: &Value) -> String {
    match thrown {
        Value::Object(obj) => match obj.to_native().get("message") {
            jscore::runtime::NativeValue::String(message) => message,
            other => panic!("error without a string message: {:?}", other),
        },
        other => panic!("expected an error object, got {:?}", other),
    }
}

/// The `name` of a thrown error object, read through its prototype
#[allow(dead_code)]
pub fn error_name(thrown: &Value) -> String {
    match thrown {
        Value::Object(obj) => match obj.to_native().get("name") {
            jscore::runtime::NativeValue::String(name) => name,
            other => panic!("error without a string name: {:?}", other),
        },
        other => panic!("expected an error object, got {:?}", other),
    }
}
