//! Prelude module for convenient imports
//!
//! ```no_run
//! use jscore::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let mut runtime = Runtime::new();
//!     let obj = runtime.new_object();
//!     let ctx = runtime.context().clone();
//!     let text = runtime.eval(Value::from(obj).to_string_value(&ctx))?;
//!     println!("{:?}", text);
//!     Ok(())
//! }
//! ```

// Runtime facade
pub use crate::runtime::{Runtime, RuntimeConfig};

// Values and objects
pub use crate::runtime::{ObjectKind, ObjectRef, PropertyKey, Symbol, Value};

// Descriptors and completions
pub use crate::runtime::{Completion, CompletionType, PropertyDescriptor, PropertyFlags};

// Suspension
pub use crate::runtime::{Driver, DriverConfig, EvalContext, StepResult, Task};

// Host bridge
pub use crate::runtime::{NativeObject, NativeValue};

// Error handling
pub use crate::error::{Error, ErrorKind, Result};
