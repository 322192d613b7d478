//! Suspendable computations
//!
//! Any object-model operation that might run user code (an accessor, a
//! `valueOf`/`toString` candidate, a constructor) returns a [`Task`] instead
//! of calling into that code directly. A task is either already finished, or
//! it is a [`PendingCall`]: "call this callee, then feed its completion to
//! this continuation". The [`Driver`](super::Driver) owns the loop that
//! performs the calls, so control goes back to the host at every call site.
//!
//! Plain data-property reads and writes build `Task::Ready` and never suspend.

use std::fmt;
use std::rc::Rc;

use super::completion::Completion;
use super::context::EvalContext;
use super::value::Value;

/// The one calling convention of the core: `(this, args, ctx) -> Task`.
///
/// A native body may itself return [`Task::Call`] to re-enter user code.
pub type NativeFn = Rc<dyn Fn(&Value, &[Value], &EvalContext) -> Task>;

/// What to do with the completion of a pending call
pub type Continuation = Box<dyn FnOnce(Completion) -> Task>;

/// A call waiting for the driver to perform it
pub struct PendingCall {
    /// The value being called; non-callables are rejected by the driver
    pub callee: Value,
    /// Receiver bound as `this`
    pub this: Value,
    pub args: Vec<Value>,
    pub ctx: EvalContext,
    pub(crate) then: Continuation,
}

impl PendingCall {
    /// Feed the completion of the call into the continuation
    pub fn resume(self, completion: Completion) -> Task {
        (self.then)(completion)
    }
}

impl fmt::Debug for PendingCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingCall")
            .field("callee", &self.callee)
            .field("this", &self.this)
            .field("args", &self.args)
            .field("strict", &self.ctx.is_strict())
            .finish_non_exhaustive()
    }
}

/// A resumable computation producing a [`Completion`]
#[derive(Debug)]
pub enum Task {
    /// Finished, nothing left to run
    Ready(Completion),
    /// Suspended at a call site
    Call(PendingCall),
}

impl Task {
    pub fn normal(value: Value) -> Task {
        Task::Ready(Completion::Normal(value))
    }

    pub fn throw(value: Value) -> Task {
        Task::Ready(Completion::Throw(value))
    }

    pub fn undefined() -> Task {
        Task::normal(Value::Undefined)
    }

    /// Suspend on a call of `callee` with `this` and `args`
    pub fn call(callee: Value, this: Value, args: Vec<Value>, ctx: &EvalContext) -> Task {
        Task::Call(PendingCall {
            callee,
            this,
            args,
            ctx: ctx.clone(),
            then: Box::new(Task::Ready),
        })
    }

    /// Continue with the raw completion, whatever its tag
    pub fn then<F>(self, f: F) -> Task
    where
        F: FnOnce(Completion) -> Task + 'static,
    {
        match self {
            Task::Ready(completion) => f(completion),
            Task::Call(mut call) => {
                let prev = call.then;
                call.then = Box::new(move |completion| prev(completion).then(f));
                Task::Call(call)
            }
        }
    }

    /// Continue with the value of a normal completion. Abrupt completions
    /// skip `f` and are forwarded unchanged.
    pub fn and_then<F>(self, f: F) -> Task
    where
        F: FnOnce(Value) -> Task + 'static,
    {
        self.then(move |completion| match completion {
            Completion::Normal(value) => f(value),
            abrupt => Task::Ready(abrupt),
        })
    }

    pub fn map<F>(self, f: F) -> Task
    where
        F: FnOnce(Value) -> Value + 'static,
    {
        self.and_then(move |value| Task::normal(f(value)))
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Task::Ready(_))
    }

    /// The completion if the task finished without suspending
    pub fn into_ready(self) -> Result<Completion, Task> {
        match self {
            Task::Ready(completion) => Ok(completion),
            suspended => Err(suspended),
        }
    }
}

impl From<Completion> for Task {
    fn from(completion: Completion) -> Self {
        Task::Ready(completion)
    }
}
