//! jscore: the value and object core of a JavaScript engine
//!
//! jscore models ECMAScript values (primitives and objects), property
//! descriptors, completion records and the object protocol (lookup along the
//! prototype chain, writes, deletes, `instanceof`, type coercions). Every
//! operation that may run user code, such as an accessor or a `valueOf`
//! candidate, returns a [`Task`] that a [`Driver`] advances one call at a
//! time, so an evaluator embedding the core keeps control at every call site.
//!
//! # Quick Start
//!
//! ```no_run
//! use jscore::{Runtime, Value};
//!
//! fn main() -> jscore::Result<()> {
//!     let mut runtime = Runtime::new();
//!     let point = runtime.new_object();
//!     let ctx = runtime.context().clone();
//!     runtime.run(point.set("x", Value::Number(3.0), &ctx))?;
//!     let x = runtime.eval(point.get("x", &ctx))?;
//!     println!("x = {:?}", x);
//!     Ok(())
//! }
//! ```
//!
//! # Module Overview
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`runtime`] | values, descriptors, completions, objects, realm, driver |
//! | [`error`](Error) | host-facing errors and message templates |

pub mod error;
pub mod prelude;
pub mod runtime;

pub use error::{Error, ErrorKind, Result};
pub use runtime::{
    Completion, CompletionType, Driver, DriverConfig, EvalContext, ObjectRef, PreferredType,
    PropertyDescriptor, PropertyFlags, PropertyKey, Realm, Runtime, RuntimeConfig, Task, Value,
};

/// Version of jscore
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
