//! # Layout & link
//!
//! Depth-first emission of reachable blocks into the final code segment,
//! followed by two back-patch passes over the header and the jump
//! operands (§4.5).

use crate::format::{self, is_long_jump, is_push};
use crate::grid::Grid;
use std::collections::HashSet;

/// Offsets are single bytes throughout the header and jump operands (§6);
/// the original compiler gets this for free from Python's `bytearray`
/// assignment truncating to the low 8 bits, so images are implicitly
/// capped at 256 bytes of header-plus-code. We make the same truncation
/// explicit here rather than invent an error kind the format doesn't have.
fn truncate_offset(offset: usize) -> u8 {
    (offset & 0xff) as u8
}

/// Walk outward from `entry_points`, appending each reachable block to the
/// code segment exactly once and recording where it landed.
///
/// The original implementation checks `seen` only when deciding whether to
/// *enqueue* a target, not when popping one off the work stack — so the
/// same label can be pushed twice (once by each of two callers) before
/// either copy is processed, and gets emitted twice. We track `visited`
/// and mark it at push time instead, which is the standard fix and keeps
/// every reachable label's offset single-valued.
fn emit_reachable_blocks(entry_points: &[usize], paths: &[Vec<u8>], code_offset: usize) -> (Vec<u8>, Vec<usize>) {
    let mut code = Vec::new();
    let mut label_offsets = vec![0usize; paths.len()];
    let mut visited: HashSet<usize> = HashSet::new();
    let mut stack: Vec<usize> = Vec::new();

    for &entry in entry_points {
        if visited.insert(entry) {
            stack.push(entry);
        }
    }

    let mut offset = code_offset;
    while let Some(index) = stack.pop() {
        label_offsets[index] = offset;
        let path = &paths[index];

        let mut i = 0;
        while i < path.len() {
            if is_push(path[i]) {
                i += 2;
                continue;
            }
            if is_long_jump(path[i]) {
                let target = path[i + 1] as usize;
                if visited.insert(target) {
                    stack.push(target);
                }
            }
            i += 1;
        }

        code.extend_from_slice(path);
        offset += path.len();
    }

    (code, label_offsets)
}

/// Rewrite every long-form jump operand in `code` from a label index to
/// the label's resolved image offset.
fn resolve_jump_operands(code: &mut [u8], label_offsets: &[usize]) {
    let mut i = 0;
    while i < code.len() {
        if is_push(code[i]) {
            i += 2;
            continue;
        }
        if is_long_jump(code[i]) {
            let target = code[i + 1] as usize;
            code[i + 1] = truncate_offset(label_offsets[target]);
        }
        i += 1;
    }
}

fn build_header(entry_points_len: usize) -> Vec<u8> {
    let mut header = Vec::with_capacity(11 + entry_points_len);
    header.extend_from_slice(&format::MAGIC);
    header.extend_from_slice(&format::VERSION);
    header.extend_from_slice(&[0, 0]); // memLength, patched below
    header.push(0); // memStride, patched below
    header.push(0); // dataOffset, patched below
    header.push(entry_points_len as u8); // entryCount
    header.extend(std::iter::repeat(0u8).take(entry_points_len)); // entryOffsets
    header
}

fn build_data_segment(mem_inits: &[(u16, u8)]) -> Vec<u8> {
    let mut data = Vec::with_capacity(mem_inits.len() * 3);
    for &(addr, value) in mem_inits {
        data.push((addr >> 8) as u8);
        data.push((addr & 0xff) as u8);
        data.push(value);
    }
    data
}

/// Lay out and link the coalesced blocks into a complete bytecode image
/// (§4.5, §4.6): header, reachable code, then the data segment.
pub fn link(grid: &Grid, paths: &[Vec<u8>], entry_points: &[usize]) -> Vec<u8> {
    let mut header = build_header(entry_points.len());
    let code_offset = header.len();

    let (mut code, label_offsets) = emit_reachable_blocks(entry_points, paths, code_offset);
    resolve_jump_operands(&mut code, &label_offsets);

    let mem_length = (grid.width * grid.height) as u16;
    header[format::HDR_MEM_LENGTH..format::HDR_MEM_LENGTH + 2]
        .copy_from_slice(&mem_length.to_be_bytes());
    header[format::HDR_MEM_STRIDE] = grid.width as u8;

    let data_offset = code_offset + code.len();
    header[format::HDR_DATA_OFFSET] = truncate_offset(data_offset);

    for (slot, &entry) in entry_points.iter().enumerate() {
        header[format::HDR_ENTRY_POINTS + slot] = truncate_offset(label_offsets[entry]);
    }

    let data = build_data_segment(&grid.mem_inits);

    let mut image = header;
    image.extend(code);
    image.extend(data);
    image
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{grid, linker, pathwalk};

    #[test]
    fn halt_immediately_produces_minimal_image() {
        let g = grid::load("E@").unwrap();
        let (mut labels, entries) = pathwalk::find_path_heads(&g).unwrap();
        let mut paths = pathwalk::parse_paths(&g, &mut labels).unwrap();
        linker::coalesce_all(&labels, &mut paths);

        let image = link(&g, &paths, &entries);

        assert_eq!(&image[0..4], b"JED?");
        assert_eq!(&image[4..6], &[1, 0]);
        assert_eq!(image[format::HDR_ENTRY_COUNT], 1);
        let entry_offset = image[format::HDR_ENTRY_POINTS] as usize;
        assert_eq!(image[entry_offset], crate::format::make_byte(crate::format::Opcode::Halt as u8, 0));
    }

    #[test]
    fn data_segment_follows_declared_offset() {
        let g = grid::load("E 3@").unwrap();
        let (mut labels, entries) = pathwalk::find_path_heads(&g).unwrap();
        let mut paths = pathwalk::parse_paths(&g, &mut labels).unwrap();
        linker::coalesce_all(&labels, &mut paths);

        let image = link(&g, &paths, &entries);

        let data_offset = image[format::HDR_DATA_OFFSET] as usize;
        assert_eq!(&image[data_offset..], &[0, 2, 3]);
    }

    #[test]
    fn mem_length_and_stride_match_grid_dimensions() {
        let g = grid::load("E@\nE@").unwrap();
        let (mut labels, entries) = pathwalk::find_path_heads(&g).unwrap();
        let mut paths = pathwalk::parse_paths(&g, &mut labels).unwrap();
        linker::coalesce_all(&labels, &mut paths);

        let image = link(&g, &paths, &entries);

        let mem_length = u16::from_be_bytes([image[format::HDR_MEM_LENGTH], image[format::HDR_MEM_LENGTH + 1]]);
        assert_eq!(mem_length, 4);
        assert_eq!(image[format::HDR_MEM_STRIDE], 2);
        assert_eq!(image[format::HDR_ENTRY_COUNT], 2);
    }
}
