//! Task driver
//!
//! The driver performs the calls a [`Task`] suspends on. It keeps the
//! continuations of in-flight calls on an explicit stack, so nested accessor
//! and conversion calls do not consume host stack, and the host can advance
//! a task one call at a time with [`Driver::step`].

use serde::{Deserialize, Serialize};

use crate::error::{messages, Error, Result};

use super::completion::Completion;
use super::task::{Continuation, PendingCall, Task};
use super::value::Value;

/// Default maximum number of nested in-flight calls
pub const DEFAULT_MAX_CALL_DEPTH: usize = 10_000;

/// Driver limits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Nested calls beyond this depth complete with a RangeError throw
    pub max_call_depth: usize,
    /// Steps allowed for a single [`Driver::run`]; `None` means unlimited
    pub max_steps: Option<u64>,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            max_steps: None,
        }
    }
}

impl DriverConfig {
    pub fn with_max_call_depth(mut self, depth: usize) -> Self {
        self.max_call_depth = depth;
        self
    }

    pub fn with_max_steps(mut self, steps: u64) -> Self {
        self.max_steps = Some(steps);
        self
    }
}

/// Counters accumulated over the driver's lifetime
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DriverStats {
    pub steps: u64,
    pub calls: u64,
    pub completed_tasks: u64,
    pub max_depth_seen: usize,
}

/// Outcome of a single [`Driver::step`]
#[derive(Debug)]
pub enum StepResult {
    /// More work is pending
    Continue,
    /// The task finished
    Complete(Completion),
    /// Nothing to run
    Idle,
}

pub struct Driver {
    config: DriverConfig,
    current: Option<Task>,
    continuations: Vec<Continuation>,
    stats: DriverStats,
}

impl Default for Driver {
    fn default() -> Self {
        Self::new()
    }
}

impl Driver {
    pub fn new() -> Self {
        Self::with_config(DriverConfig::default())
    }

    pub fn with_config(config: DriverConfig) -> Self {
        Self {
            config,
            current: None,
            continuations: Vec::new(),
            stats: DriverStats::default(),
        }
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    pub fn stats(&self) -> DriverStats {
        self.stats
    }

    pub fn is_idle(&self) -> bool {
        self.current.is_none()
    }

    /// Number of calls currently in flight
    pub fn call_depth(&self) -> usize {
        self.continuations.len()
    }

    /// Load `task` for stepping
    pub fn start(&mut self, task: Task) -> Result<()> {
        if !self.is_idle() {
            return Err(Error::DriverBusy);
        }
        self.current = Some(task);
        Ok(())
    }

    /// Drop the loaded task and every pending continuation
    pub fn abort(&mut self) {
        if !self.is_idle() {
            tracing::debug!(depth = self.call_depth(), "aborting task");
        }
        self.current = None;
        self.continuations.clear();
    }

    /// Advance the loaded task by one call or one continuation
    pub fn step(&mut self) -> StepResult {
        let Some(task) = self.current.take() else {
            return StepResult::Idle;
        };
        self.stats.steps += 1;
        match task {
            Task::Ready(completion) => match self.continuations.pop() {
                Some(then) => {
                    self.current = Some(then(completion));
                    StepResult::Continue
                }
                None => {
                    self.stats.completed_tasks += 1;
                    tracing::debug!(
                        completion = %completion.completion_type(),
                        steps = self.stats.steps,
                        "task complete"
                    );
                    StepResult::Complete(completion)
                }
            },
            Task::Call(call) => {
                self.current = Some(self.perform(call));
                StepResult::Continue
            }
        }
    }

    /// Run `task` until it completes
    pub fn run(&mut self, task: Task) -> Result<Completion> {
        self.start(task)?;
        let mut steps: u64 = 0;
        loop {
            match self.step() {
                StepResult::Continue => {}
                StepResult::Complete(completion) => return Ok(completion),
                StepResult::Idle => return Ok(Completion::empty()),
            }
            steps += 1;
            if let Some(limit) = self.config.max_steps {
                if steps > limit {
                    tracing::warn!(steps, limit, "step limit exceeded");
                    self.abort();
                    return Err(Error::operation_limit_exceeded(steps, limit));
                }
            }
        }
    }

    fn perform(&mut self, call: PendingCall) -> Task {
        let PendingCall {
            callee,
            this,
            args,
            ctx,
            then,
        } = call;
        self.stats.calls += 1;
        self.continuations.push(then);
        let depth = self.continuations.len();
        self.stats.max_depth_seen = self.stats.max_depth_seen.max(depth);

        if depth > self.config.max_call_depth {
            tracing::warn!(depth, limit = self.config.max_call_depth, "call depth exceeded");
            return Task::Ready(ctx.stack_overflow());
        }

        let Some(func) = callee.as_object().and_then(|obj| obj.native_function()) else {
            tracing::debug!(callee = ?callee, "call of a non-callable value");
            return ctx.throw_type_error(messages::not_a_function(&callee_name(&callee)));
        };
        tracing::trace!(function = %func.name, depth, "call");
        (func.behavior)(&this, &args, &ctx)
    }
}

/// How a non-callable callee is named in the TypeError message
fn callee_name(callee: &Value) -> String {
    match callee {
        Value::Object(obj) => obj
            .well_known_name()
            .unwrap_or_else(|| format!("[object {}]", obj.class_name())),
        other => other.debug_string(),
    }
}
