//! # Runtime errors
//!
//! Every stage of the VM (loader, executor, bit-byte I/O) reports failures
//! through [`RuntimeError`]. A runtime error aborts only the process that
//! raised it — other live processes keep running, the same way one
//! process halting doesn't affect its siblings.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    /// The image's magic bytes weren't `"JED?"`.
    BadMagicError,
    /// The image's version wasn't the one this VM supports.
    UnsupportedVersionError { major: u8, minor: u8 },
    /// A STACK op popped an empty stack.
    StackUnderflowError { process_id: usize, pc: usize },
    /// A process's program counter fell outside the code segment.
    PCOutOfRangeError { process_id: usize, pc: usize },
    /// A byte that was neither PUSH nor one of the table opcodes.
    UnknownOpcodeError {
        process_id: usize,
        pc: usize,
        opcode: u8,
    },
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeError::BadMagicError => write!(f, "not a robots bytecode image (bad magic)"),
            RuntimeError::UnsupportedVersionError { major, minor } => {
                write!(f, "unsupported bytecode version {major}.{minor}")
            }
            RuntimeError::StackUnderflowError { process_id, pc } => {
                write!(f, "[proc{process_id}] stack underflow at pc={pc:04x}")
            }
            RuntimeError::PCOutOfRangeError { process_id, pc } => {
                write!(f, "[proc{process_id}] pc={pc:04x} out of range")
            }
            RuntimeError::UnknownOpcodeError {
                process_id,
                pc,
                opcode,
            } => {
                write!(
                    f,
                    "[proc{process_id}] unknown opcode 0x{opcode:02x} at pc={pc:04x}"
                )
            }
        }
    }
}

impl std::error::Error for RuntimeError {}
