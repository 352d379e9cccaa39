//! Services the session consumes but does not own.
//!
//! The host (interactive shell or `compose`) supplies concrete values; tests
//! supply fakes.

use crate::error::Result;

/// Source of the task index assigned at `start`.
pub trait Counter {
    fn current(&self) -> u32;
}

/// Receiver of compiled scripts, keyed by task name. Last write wins.
pub trait TaskSink {
    fn add(&mut self, key: &str, script: &str);
}

/// Blocking prompt primitives supplied by the shell.
pub trait Operator {
    /// Ask a yes/no question.
    fn confirm(&mut self, prompt: &str) -> Result<bool>;

    /// Ask for one line of free text.
    fn input(&mut self, prompt: &str) -> Result<String>;
}

/// Monotonic task counter owned by the host.
///
/// The session only reads it; the host advances it once a task completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskCounter {
    value: u32,
}

impl TaskCounter {
    pub fn starting_at(value: u32) -> Self {
        Self { value }
    }

    pub fn advance(&mut self) {
        self.value = self.value.saturating_add(1);
    }
}

impl Counter for TaskCounter {
    fn current(&self) -> u32 {
        self.value
    }
}
