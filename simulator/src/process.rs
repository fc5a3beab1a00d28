//! # Process state
//!
//! One robot, one process: a program counter, an operand stack, and a
//! stopped flag. Spawned one per entry point at load time (§4.7).

use crate::error::RuntimeError;
use std::fmt;

/// A process's operand stack. Values are signed so NOT's bitwise
/// complement and SUB's subtraction can go negative, matching the
/// original's use of arbitrary-precision Python ints for stack values.
#[derive(Debug, Default, Clone)]
pub struct Stack {
    values: Vec<i64>,
}

impl Stack {
    pub fn new() -> Self {
        Self { values: Vec::new() }
    }

    pub fn push(&mut self, value: i64) {
        self.values.push(value);
    }

    pub fn pop(&mut self, process_id: usize, pc: usize) -> Result<i64, RuntimeError> {
        self.values
            .pop()
            .ok_or(RuntimeError::StackUnderflowError { process_id, pc })
    }

    pub fn peek(&self) -> Option<i64> {
        self.values.last().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessState {
    Running,
    Stopped,
}

/// One robot's execution state: a program counter into the shared code
/// segment, its own operand stack, and a run/stop flag (§3 "Process").
#[derive(Debug, Clone)]
pub struct Process {
    pub id: usize,
    pub pc: usize,
    pub stack: Stack,
    pub state: ProcessState,
    halted_at_tick: Option<u64>,
}

impl Process {
    pub fn new(id: usize, pc: usize) -> Self {
        Self {
            id,
            pc,
            stack: Stack::new(),
            state: ProcessState::Running,
            halted_at_tick: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.state == ProcessState::Running
    }

    pub fn halt(&mut self, tick: u64) {
        self.state = ProcessState::Stopped;
        self.halted_at_tick = Some(tick);
    }
}

impl fmt::Display for Process {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.halted_at_tick {
            Some(tick) => write!(f, "[proc{}] halted after {tick} ticks", self.id)?,
            None => write!(f, "[proc{}] running at pc={:04x}", self.id, self.pc)?,
        }
        if let Some(top) = self.stack.peek() {
            write!(f, ", stack top: {top}")?;
        }
        Ok(())
    }
}
