//! Error types for the jscore object model
//!
//! Language-level failures (a `TypeError` thrown by `toPrimitive`, a strict
//! delete of a non-configurable slot) never show up here: they travel as
//! [`Completion::Throw`](crate::runtime::Completion) values. This module only
//! covers faults the embedding host has to deal with.

use std::fmt;
use thiserror::Error;

use crate::runtime::CompletionType;

/// Main error type for jscore
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)]
pub enum Error {
    /// A task finished with a Throw completion nobody handled
    #[error("Uncaught {kind}: {message}")]
    Uncaught { kind: ErrorKind, message: String },

    /// A task finished with a Return/Break/Continue that escaped to the host
    #[error("InternalError: {0:?} completion escaped to the host")]
    AbruptCompletion(CompletionType),

    /// A task was started while the driver was still running another one
    #[error("InternalError: driver is already running a task")]
    DriverBusy,

    /// Malformed runtime configuration
    #[error("ConfigError: {0}")]
    ConfigError(String),

    /// Resource limit exceeded
    #[error("ResourceLimitError: {kind}: {message}")]
    ResourceLimitError {
        kind: ResourceLimitKind,
        message: String,
    },
}

/// Resource limit kinds enforced by the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceLimitKind {
    /// Driver step budget exceeded
    OperationLimit,
}

impl fmt::Display for ResourceLimitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceLimitKind::OperationLimit => write!(f, "OperationLimit"),
        }
    }
}

/// JavaScript error kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(clippy::enum_variant_names)]
pub enum ErrorKind {
    /// TypeError - wrong type for operation
    TypeError,
    /// ReferenceError - undefined variable
    ReferenceError,
    /// RangeError - value out of range
    RangeError,
    /// SyntaxError - invalid syntax at runtime (e.g., eval)
    SyntaxError,
    /// EvalError - error in eval()
    EvalError,
    /// URIError - malformed URI
    UriError,
    /// Generic Error - user-thrown Error objects
    GenericError,
    /// InternalError - internal engine error
    InternalError,
}

impl ErrorKind {
    /// All kinds the realm installs a prototype for
    pub const ALL: [ErrorKind; 8] = [
        ErrorKind::GenericError,
        ErrorKind::TypeError,
        ErrorKind::ReferenceError,
        ErrorKind::RangeError,
        ErrorKind::SyntaxError,
        ErrorKind::EvalError,
        ErrorKind::UriError,
        ErrorKind::InternalError,
    ];

    /// The constructor name, which is also the `name` property of its prototype
    pub fn name(self) -> &'static str {
        match self {
            ErrorKind::TypeError => "TypeError",
            ErrorKind::ReferenceError => "ReferenceError",
            ErrorKind::RangeError => "RangeError",
            ErrorKind::SyntaxError => "SyntaxError",
            ErrorKind::EvalError => "EvalError",
            ErrorKind::UriError => "URIError",
            ErrorKind::GenericError => "Error",
            ErrorKind::InternalError => "InternalError",
        }
    }

    /// Map an error `name` back to its kind
    pub fn from_name(name: &str) -> Option<ErrorKind> {
        ErrorKind::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Error {
    /// Create an uncaught-exception error
    pub fn uncaught(kind: ErrorKind, message: impl Into<String>) -> Self {
        Error::Uncaught {
            kind,
            message: message.into(),
        }
    }

    /// Create a step limit exceeded error
    pub fn operation_limit_exceeded(steps: u64, limit: u64) -> Self {
        Error::ResourceLimitError {
            kind: ResourceLimitKind::OperationLimit,
            message: format!(
                "Step limit exceeded: {} steps executed, limit was {}",
                steps, limit
            ),
        }
    }

    /// The JavaScript error kind, if this error stands for one
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Error::Uncaught { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::ConfigError(err.to_string())
    }
}

/// Result type alias for jscore
pub type Result<T> = std::result::Result<T, Error>;

/// Standardized error message templates
///
/// These constants provide consistent error messages following JavaScript conventions.
pub mod messages {
    pub const NOT_A_FUNCTION: &str = "is not a function";
    pub const CANNOT_CONVERT_TO_PRIMITIVE: &str = "Cannot convert object to primitive value";
    pub const CANNOT_CONVERT_SYMBOL_TO_NUMBER: &str = "Cannot convert a Symbol value to a number";
    pub const CANNOT_CONVERT_SYMBOL_TO_STRING: &str = "Cannot convert a Symbol value to a string";
    pub const CANNOT_CONVERT_NULLISH_TO_OBJECT: &str = "Cannot convert undefined or null to object";
    pub const CANNOT_DELETE_NON_CONFIGURABLE: &str = "Can't delete nonconfigurable object";
    pub const MAXIMUM_CALL_STACK: &str = "Maximum call stack size exceeded";

    /// Format a "X is not a function" error message
    pub fn not_a_function(name: &str) -> String {
        format!("{} {}", name, NOT_A_FUNCTION)
    }

    /// Format a "Cannot delete property 'X'" error message
    pub fn cannot_delete_property(prop: &str) -> String {
        format!("Cannot delete property '{}': {}", prop, CANNOT_DELETE_NON_CONFIGURABLE)
    }

    /// Format a "Cannot assign to read only property 'X'" error message
    pub fn read_only_property(prop: &str) -> String {
        format!("Cannot assign to read only property '{}' of object", prop)
    }

    /// Format a "Cannot set property 'X' which has only a getter" error message
    pub fn getter_only_property(prop: &str) -> String {
        format!("Cannot set property {} which has only a getter", prop)
    }
}
