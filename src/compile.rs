//! # Compiler pipeline
//!
//! Strings the grid loader, path discoverer, and linker together into the
//! single entry point the CLI (and tests) call.

use crate::error::CompileError;
use crate::{grid, linker, pathwalk};

/// Compile `source` (a robots grid program) into a bytecode image ready
/// to hand to `robots-vm`.
pub fn compile(source: &str) -> Result<Vec<u8>, CompileError> {
    let g = grid::load(source)?;
    let (mut labels, entry_points) = pathwalk::find_path_heads(&g)?;
    let mut paths = pathwalk::parse_paths(&g, &mut labels)?;
    linker::coalesce_all(&labels, &mut paths);
    Ok(linker::link(&g, &paths, &entry_points))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn halt_immediately_round_trips_through_the_whole_pipeline() {
        let image = compile("E@").unwrap();
        assert_eq!(&image[0..4], b"JED?");
        assert_eq!(image[crate::format::HDR_ENTRY_COUNT], 1);
    }

    #[test]
    fn unknown_character_propagates_as_a_lex_error() {
        let err = compile("E^\nQ ").unwrap_err();
        assert!(matches!(err, CompileError::LexError { ch: 'Q', .. }));
    }

    #[test]
    fn two_entry_points_are_both_recorded() {
        let image = compile("E@\nE@").unwrap();
        assert_eq!(image[crate::format::HDR_ENTRY_COUNT], 2);
    }
}
