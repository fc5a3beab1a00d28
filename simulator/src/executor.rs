//! # VM executor
//!
//! Round-robin dispatch over the live process list: one instruction per
//! process per sweep, until none remain running (§4.8, §5).

use crate::bitio;
use crate::error::RuntimeError;
use crate::loader::{self, Image};
use crate::process::Process;
use robots::format::{self, Opcode, StackOp};

/// Truncated-toward-zero division/remainder, adjusted toward negative
/// infinity — matches Python's `//` and `%`, which the original compiler
/// assumes when it maps stack values directly onto Python ints.
fn floor_div(a: i64, b: i64) -> i64 {
    let q = a / b;
    let r = a % b;
    if r != 0 && (r < 0) != (b < 0) {
        q - 1
    } else {
        q
    }
}

fn floor_mod(a: i64, b: i64) -> i64 {
    let r = a % b;
    if r != 0 && (r < 0) != (b < 0) {
        r + b
    } else {
        r
    }
}

/// Owns the loaded image and drives execution to completion.
pub struct VirtualMachine {
    code: Vec<u8>,
    /// Absolute image offset `code[0]` corresponds to. Jump operands
    /// embedded in `code` were back-patched by the compiler against
    /// absolute image offsets (§4.5), so a decoded jump target must have
    /// this subtracted before it's usable as a `code`-relative `pc` — the
    /// same rebasing already applied to each process's entry-point `pc`.
    code_offset: usize,
    memory: Vec<u8>,
    mem_stride: u8,
    processes: Vec<Process>,
    ticks: u64,
}

impl VirtualMachine {
    /// Validate and load a bytecode image, spawning its processes (§4.7).
    pub fn load(bytecode: &[u8]) -> Result<Self, RuntimeError> {
        let Image {
            code,
            code_offset,
            memory,
            mem_stride,
            processes,
        } = loader::load(bytecode)?;
        Ok(Self {
            code,
            code_offset,
            memory,
            mem_stride,
            processes,
            ticks: 0,
        })
    }

    /// Total instructions dispatched across all processes so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn processes(&self) -> &[Process] {
        &self.processes
    }

    /// Run until every process has halted. A process that raises a
    /// runtime error is marked stopped and excluded from further
    /// scheduling; the others keep running (§7 propagation policy).
    pub fn run(&mut self) -> Vec<RuntimeError> {
        let mut faults = Vec::new();
        while self.processes.iter().any(Process::is_running) {
            for index in 0..self.processes.len() {
                if !self.processes[index].is_running() {
                    continue;
                }
                if let Err(err) = self.step(index) {
                    self.processes[index].halt(self.ticks);
                    faults.push(err);
                }
            }
        }
        faults
    }

    fn step(&mut self, index: usize) -> Result<(), RuntimeError> {
        self.ticks += 1;
        let id = self.processes[index].id;
        let pc = self.processes[index].pc;

        let byte = *self
            .code
            .get(pc)
            .ok_or(RuntimeError::PCOutOfRangeError { process_id: id, pc })?;

        if format::is_push(byte) {
            let low8 = *self
                .code
                .get(pc + 1)
                .ok_or(RuntimeError::PCOutOfRangeError { process_id: id, pc })?;
            let addr = (((byte & 0x7f) as usize) << 8) | low8 as usize;
            self.processes[index].stack.push(self.memory[addr] as i64);
            self.processes[index].pc += 1;
        } else {
            let op = (byte >> 4) & 0xf;
            let arg = byte & 0xf;
            self.dispatch(index, op, arg)?;
        }

        self.processes[index].pc += 1;
        Ok(())
    }

    fn dispatch(&mut self, index: usize, op: u8, arg: u8) -> Result<(), RuntimeError> {
        match op {
            op if op == Opcode::Halt as u8 => {
                self.processes[index].halt(self.ticks);
            }
            op if op == Opcode::Load as u8 => {
                bitio::load_byte(&mut self.processes[index], &self.memory, self.mem_stride)?;
            }
            op if op == Opcode::Store as u8 => {
                bitio::store_byte(&mut self.processes[index], &mut self.memory, self.mem_stride)?;
            }
            op if op == Opcode::Stack as u8 => {
                self.stack_op(index, arg)?;
            }
            op if op == Opcode::Jmp as u8 => {
                let target = self.jump_target(index, arg)?;
                self.processes[index].pc = target - 1;
            }
            op if op == Opcode::Jz as u8 => {
                let target = self.jump_target(index, arg)?;
                let process = &mut self.processes[index];
                let top = process.stack.pop(process.id, process.pc)?;
                if top == 0 {
                    process.pc = target - 1;
                }
            }
            _ => {
                let process = &self.processes[index];
                return Err(RuntimeError::UnknownOpcodeError {
                    process_id: process.id,
                    pc: process.pc,
                    opcode: (op << 4) | arg,
                });
            }
        }
        Ok(())
    }

    /// Short form (`arg < 0xf`): the target is `arg` itself — a 4-bit
    /// literal never emitted by the current compiler, so it is its own
    /// `code`-relative offset by construction (§9). Long form (`arg ==
    /// 0xf`): the target is the next byte, holding the *absolute* image
    /// offset the compiler's back-patch pass wrote (`src/linker/layout.rs`'s
    /// `resolve_jump_operands`, against the same `label_offsets` used for
    /// the header) — it must be rebased by `code_offset` the same way each
    /// process's entry-point `pc` already is, or it indexes past the end of
    /// `self.code` (which starts at 0, not at the operand's absolute
    /// offset). `pc` must advance past the operand byte whether or not the
    /// jump is taken (JZ's fallthrough case).
    fn jump_target(&mut self, index: usize, arg: u8) -> Result<usize, RuntimeError> {
        if arg != format::JUMP_LONG_ARG {
            return Ok(arg as usize);
        }
        let process = &mut self.processes[index];
        process.pc += 1;
        let target = *self.code.get(process.pc).ok_or(RuntimeError::PCOutOfRangeError {
            process_id: process.id,
            pc: process.pc,
        })?;
        (target as usize)
            .checked_sub(self.code_offset)
            .ok_or(RuntimeError::PCOutOfRangeError {
                process_id: process.id,
                pc: process.pc,
            })
    }

    fn stack_op(&mut self, index: usize, arg: u8) -> Result<(), RuntimeError> {
        let id = self.processes[index].id;
        let pc = self.processes[index].pc;
        let stack = &mut self.processes[index].stack;

        match arg {
            a if a == StackOp::Not as u8 => {
                let v = stack.pop(id, pc)?;
                stack.push(!v);
            }
            a if a == StackOp::Pop as u8 => {
                stack.pop(id, pc)?;
            }
            a if a == StackOp::Dup as u8 => {
                let v = stack.pop(id, pc)?;
                stack.push(v);
                stack.push(v);
            }
            a if a == StackOp::Swap as u8 => {
                let a = stack.pop(id, pc)?;
                let b = stack.pop(id, pc)?;
                stack.push(a);
                stack.push(b);
            }
            _ => {
                let a = stack.pop(id, pc)?;
                let b = stack.pop(id, pc)?;
                let result = match arg {
                    a if a == StackOp::Sub as u8 => b - a,
                    a if a == StackOp::Add as u8 => b + a,
                    a if a == StackOp::Mul as u8 => b * a,
                    a if a == StackOp::Div as u8 => floor_div(b, a),
                    a if a == StackOp::Mod as u8 => floor_mod(b, a),
                    a if a == StackOp::And as u8 => b & a,
                    a if a == StackOp::Or as u8 => b | a,
                    _ => {
                        return Err(RuntimeError::UnknownOpcodeError {
                            process_id: id,
                            pc,
                            opcode: (Opcode::Stack as u8) << 4 | arg,
                        })
                    }
                };
                stack.push(result);
            }
        }
        Ok(())
    }
}
