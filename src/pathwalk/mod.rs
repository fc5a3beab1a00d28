//! # Path discoverer
//!
//! Enumerates every label (entry points, turns, conditionals) and walks
//! each one's path to emit a per-label instruction block (§4.3). This is
//! the compiler's "first pass": it builds the label table the linker will
//! later coalesce and lay out, the same way the teacher's first pass
//! builds a symbol table the encoder later consumes.


use crate::error::CompileError;
use crate::format::{make_byte, Opcode, JUMP_LONG_ARG};
use crate::grid::Grid;
use crate::label::{direction_of, Label, LabelTable, Vector};
use crate::lexer::TokenKind;

const MAX_LABELS: usize = 255;

/// Scan the grid row-major, creating a label for every START, TURN, and
/// COND token (§4.3). Returns the label table and the indices of the
/// START labels, in scan order — these become the VM's entry points.
pub fn find_path_heads(grid: &Grid) -> Result<(LabelTable, Vec<usize>), CompileError> {
    let mut labels = LabelTable::new();
    let mut entry_points = Vec::new();

    for y in 0..grid.height {
        for x in 0..grid.width {
            let token = grid.token_at(x as i32, y as i32);
            let location = Vector::new(x as i32, y as i32);
            match token.kind {
                TokenKind::Start => {
                    let index = labels.push(Label::new(location, direction_of(token.ch), 1));
                    entry_points.push(index);
                }
                TokenKind::Turn => {
                    labels.push(Label::new(location, direction_of(token.ch), 0));
                }
                TokenKind::Cond => {
                    // The "<"-direction (non-zero) branch starts unreferenced;
                    // the ">"-direction (zero) branch is pre-bumped to 1 so
                    // coalescing never inlines it away before the compiled
                    // JZ to it bumps it again. This matches
                    // original_source/robots-bytecode.py's find_path_heads
                    // (dir_vec["<"] refcount 0, dir_vec[">"] refcount 1),
                    // which is the opposite of spec.md §4.3's prose ("the
                    // non-zero side starts with refcount 1") — the zero
                    // branch is the one pinned against coalescing, not the
                    // non-zero one (§9).
                    labels.push(Label::new(location, direction_of('<'), 0));
                    labels.push(Label::new(location, direction_of('>'), 1));
                }
                _ => {}
            }
            if labels.len() > MAX_LABELS {
                return Err(CompileError::TooManyLabelsError);
            }
        }
    }

    Ok((labels, entry_points))
}

/// Emit a long-form jump's two-byte operand and bump the target label's
/// refcount (§4.3 "Side effect: Increase refcount of target label").
fn jump_target_bytes(
    op: Opcode,
    location: Vector,
    direction: Vector,
    labels: &mut LabelTable,
) -> Result<[u8; 2], CompileError> {
    let index = labels
        .find_index(location, direction)
        .ok_or(CompileError::LabelNotFoundError)?;
    labels.bump(index);
    Ok([make_byte(op as u8, JUMP_LONG_ARG), index as u8])
}

/// Walk every label's path, one instruction stream at a time, until a
/// terminator (HALT, JMP, or JZ-JMP pair) is emitted (§4.3).
pub fn parse_paths(grid: &Grid, labels: &mut LabelTable) -> Result<Vec<Vec<u8>>, CompileError> {
    let mut paths = Vec::with_capacity(labels.len());
    for index in 0..labels.len() {
        let label = *labels.get(index);
        paths.push(walk_path(grid, label, labels)?);
    }
    Ok(paths)
}

fn walk_path(grid: &Grid, label: Label, labels: &mut LabelTable) -> Result<Vec<u8>, CompileError> {
    let mut location = label.location.plus(label.direction);
    let mut path = Vec::new();

    loop {
        let token = grid.token_at(location.x, location.y);

        match token.kind {
            TokenKind::Halt => {
                path.push(make_byte(Opcode::Halt as u8, 0));
                break;
            }
            TokenKind::Turn | TokenKind::Start => {
                let dir = direction_of(token.ch);
                path.extend(jump_target_bytes(Opcode::Jmp, location, dir, labels)?);
                break;
            }
            TokenKind::Cond => {
                let zero_branch = direction_of('>');
                let nonzero_branch = direction_of('<');
                path.extend(jump_target_bytes(
                    Opcode::Jz,
                    location,
                    zero_branch,
                    labels,
                )?);
                path.extend(jump_target_bytes(
                    Opcode::Jmp,
                    location,
                    nonzero_branch,
                    labels,
                )?);
                break;
            }
            TokenKind::Digit => {
                let addr = location.x as u32 + location.y as u32 * grid.width as u32;
                if addr >= 1 << 15 {
                    return Err(CompileError::AddressTooLargeError {
                        addr,
                        pos: crate::error::GridPos {
                            row: location.y as usize,
                            col: location.x as usize,
                        },
                    });
                }
                path.push(crate::format::PUSH_NIBBLE << 4 | ((addr >> 8) & 0x7f) as u8);
                path.push((addr & 0xff) as u8);
            }
            TokenKind::StackOp => {
                path.push(make_byte(
                    crate::format::Opcode::Stack as u8,
                    token.stack_op() as u8,
                ));
            }
            TokenKind::ReadByte => path.push(make_byte(crate::format::Opcode::Load as u8, 0)),
            TokenKind::WriteByte => path.push(make_byte(crate::format::Opcode::Store as u8, 0)),
            TokenKind::Nop => {}
            TokenKind::Comment => unreachable!("comments never survive grid loading"),
        }

        location = location.plus(label.direction);
    }

    Ok(path)
}
