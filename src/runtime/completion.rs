//! Completion records
//!
//! Every suspendable operation ends in a [`Completion`]. Anything that is not
//! `Normal` is abrupt and must be forwarded untouched by every layer that does
//! not specifically handle it.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::value::Value;

/// The tag of a completion record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompletionType {
    Normal,
    Return,
    Break,
    Continue,
    Throw,
}

impl fmt::Display for CompletionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CompletionType::Normal => "normal",
            CompletionType::Return => "return",
            CompletionType::Break => "break",
            CompletionType::Continue => "continue",
            CompletionType::Throw => "throw",
        };
        f.write_str(name)
    }
}

/// Completion record for control flow
#[derive(Debug, Clone)]
pub enum Completion {
    Normal(Value),
    Return(Value),
    Break(Option<String>),
    Continue(Option<String>),
    /// Any value is throwable; the payload is never wrapped
    Throw(Value),
}

impl Completion {
    /// A normal completion carrying `undefined`
    pub fn empty() -> Self {
        Completion::Normal(Value::Undefined)
    }

    pub fn completion_type(&self) -> CompletionType {
        match self {
            Completion::Normal(_) => CompletionType::Normal,
            Completion::Return(_) => CompletionType::Return,
            Completion::Break(_) => CompletionType::Break,
            Completion::Continue(_) => CompletionType::Continue,
            Completion::Throw(_) => CompletionType::Throw,
        }
    }

    pub fn is_normal(&self) -> bool {
        matches!(self, Completion::Normal(_))
    }

    pub fn is_abrupt(&self) -> bool {
        !self.is_normal()
    }

    pub fn is_throw(&self) -> bool {
        matches!(self, Completion::Throw(_))
    }

    /// The carried value, for the tags that carry one
    pub fn value(&self) -> Option<&Value> {
        match self {
            Completion::Normal(v) | Completion::Return(v) | Completion::Throw(v) => Some(v),
            Completion::Break(_) | Completion::Continue(_) => None,
        }
    }

    /// The target label of a Break/Continue
    pub fn target(&self) -> Option<&str> {
        match self {
            Completion::Break(label) | Completion::Continue(label) => label.as_deref(),
            _ => None,
        }
    }

    /// Consume the record, yielding its value (`undefined` for Break/Continue)
    pub fn into_value(self) -> Value {
        match self {
            Completion::Normal(v) | Completion::Return(v) | Completion::Throw(v) => v,
            Completion::Break(_) | Completion::Continue(_) => Value::Undefined,
        }
    }

    /// `Normal` becomes `Ok`; every abrupt completion is handed back as `Err`
    pub fn into_result(self) -> Result<Value, Completion> {
        match self {
            Completion::Normal(v) => Ok(v),
            other => Err(other),
        }
    }

    /// Classify the outcome of a call: a function body's `Return` is the
    /// call's normal result, everything else is kept as is.
    pub fn normalize_call_result(self) -> Completion {
        match self {
            Completion::Return(v) => Completion::Normal(v),
            other => other,
        }
    }
}

impl From<Value> for Completion {
    fn from(value: Value) -> Self {
        Completion::Normal(value)
    }
}

impl fmt::Display for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Completion::Break(Some(label)) | Completion::Continue(Some(label)) => {
                write!(f, "{} {}", self.completion_type(), label)
            }
            Completion::Break(None) | Completion::Continue(None) => {
                write!(f, "{}", self.completion_type())
            }
            Completion::Normal(v) | Completion::Return(v) | Completion::Throw(v) => {
                write!(f, "{}({})", self.completion_type(), v.debug_string())
            }
        }
    }
}
