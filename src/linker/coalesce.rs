//! # Coalescer
//!
//! Shrinks the image by inlining blocks that have exactly one incoming
//! edge, so jump chains collapse into straight-line code (§4.4).

use crate::format::is_push;
use crate::label::LabelTable;

/// Recursively inline `paths[index]`'s singly-referenced jump targets in
/// place, returning the (now possibly longer) block. Self-targeting jumps
/// are left alone regardless of refcount — inlining a block into itself
/// would recurse forever (§9 "cyclic block references").
fn maximally_extend(index: usize, labels: &LabelTable, paths: &mut Vec<Vec<u8>>) -> Vec<u8> {
    let mut path = std::mem::take(&mut paths[index]);

    let mut i = 0;
    while i < path.len() {
        if is_push(path[i]) {
            i += 2;
            continue;
        }
        if crate::format::is_long_jump(path[i]) {
            let target = path[i + 1] as usize;
            if target != index && labels.get(target).refcount < 2 {
                let inlined = maximally_extend(target, labels, paths);
                path.splice(i..i + 2, inlined);
                // Don't skip past the spliced bytes: the scan continues
                // one byte at a time and will correctly walk through the
                // freshly inlined content, including any PUSH/jump bytes
                // it contains.
            }
        }
        i += 1;
    }

    paths[index] = path.clone();
    path
}

/// Coalesce every label's block. Idempotent: running this twice over the
/// same `paths` leaves every block unchanged, since a block with no
/// remaining singly-referenced jump targets has nothing left to inline.
pub fn coalesce_all(labels: &LabelTable, paths: &mut Vec<Vec<u8>>) {
    for index in 0..labels.len() {
        maximally_extend(index, labels, paths);
    }
}
