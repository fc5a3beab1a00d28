//! # VM loader
//!
//! Validates the image header, initializes memory from the data segment,
//! and spawns one process per entry point (§4.7).

use crate::error::RuntimeError;
use crate::process::Process;
use robots::format;

/// A loaded image ready to execute: the code segment (the header and data
/// segment are only needed at load time), the memory buffer, its stride,
/// and the processes spawned from the header's entry points.
///
/// `code` is a header-stripped slice, indexed from 0. `code_offset` is the
/// absolute image offset its index 0 corresponds to — every jump operand
/// embedded in `code` was back-patched by the compiler against absolute
/// image offsets (§4.5), so the executor must subtract `code_offset` from
/// a decoded jump target before using it as a `code`-relative `pc`, the
/// same rebasing the entry-point PCs below already get.
pub struct Image {
    pub code: Vec<u8>,
    pub code_offset: usize,
    pub memory: Vec<u8>,
    pub mem_stride: u8,
    pub processes: Vec<Process>,
}

/// Parse and validate `bytecode`, returning a ready-to-run [`Image`].
pub fn load(bytecode: &[u8]) -> Result<Image, RuntimeError> {
    if bytecode.len() < format::HDR_ENTRY_POINTS || bytecode[0..4] != format::MAGIC {
        return Err(RuntimeError::BadMagicError);
    }
    if bytecode[format::HDR_VERSION..format::HDR_VERSION + 2] != format::VERSION {
        return Err(RuntimeError::UnsupportedVersionError {
            major: bytecode[format::HDR_VERSION],
            minor: bytecode[format::HDR_VERSION + 1],
        });
    }

    let mem_length = u16::from_be_bytes([
        bytecode[format::HDR_MEM_LENGTH],
        bytecode[format::HDR_MEM_LENGTH + 1],
    ]) as usize;
    let mem_stride = bytecode[format::HDR_MEM_STRIDE];
    let data_offset = bytecode[format::HDR_DATA_OFFSET] as usize;
    let entry_count = bytecode[format::HDR_ENTRY_COUNT] as usize;

    let code_offset = format::HDR_ENTRY_POINTS + entry_count;
    let code = bytecode[code_offset..data_offset].to_vec();

    let mut memory = vec![0u8; mem_length];
    let mut i = data_offset;
    while i + 3 <= bytecode.len() {
        let addr = u16::from_be_bytes([bytecode[i], bytecode[i + 1]]) as usize;
        memory[addr] = bytecode[i + 2];
        i += 3;
    }

    let mut processes = Vec::with_capacity(entry_count);
    for id in 0..entry_count {
        let entry_offset = bytecode[format::HDR_ENTRY_POINTS + id] as usize;
        processes.push(Process::new(id, entry_offset - code_offset));
    }

    Ok(Image {
        code,
        code_offset,
        memory,
        mem_stride,
        processes,
    })
}
