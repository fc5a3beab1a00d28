use robots::compile;
use robots::format::{self, Opcode};

/// Scenario 1: halt immediately.
#[test]
fn halt_immediately() {
    let image = compile("E@").unwrap();
    let code_offset = format::HDR_ENTRY_POINTS + image[format::HDR_ENTRY_COUNT] as usize;
    let entry_offset = image[format::HDR_ENTRY_POINTS] as usize;
    assert_eq!(entry_offset, code_offset);
    assert_eq!(image[code_offset], format::make_byte(Opcode::Halt as u8, 0));
}

/// Scenario 2: push-then-halt seeds memory and compiles to PUSH, HALT.
#[test]
fn push_then_halt() {
    let image = compile("E 3@").unwrap();
    let data_offset = image[format::HDR_DATA_OFFSET] as usize;
    assert_eq!(&image[data_offset..], &[0, 2, 3]);

    let code_offset = format::HDR_ENTRY_POINTS + 1;
    assert_eq!(image[code_offset] & 0x80, 0x80);
    assert_eq!(image[code_offset + 2], format::make_byte(Opcode::Halt as u8, 0));
}

/// Scenario 3: turning paths eventually resolve to a halt.
#[test]
fn turn_and_halt() {
    let image = compile("E>@").unwrap();
    let code_offset = format::HDR_ENTRY_POINTS + 1;
    let entry_offset = image[format::HDR_ENTRY_POINTS] as usize;
    assert_eq!(entry_offset, code_offset);
    // However much coalescing collapsed the chain, the process must reach a halt.
    assert!(image[code_offset..].contains(&format::make_byte(Opcode::Halt as u8, 0)));
}

/// Scenario 4: a conditional's entry path opens with JZ — the zero branch
/// is pinned against coalescing so it always stays a real jump, even
/// though the non-zero branch may get inlined away if only one path
/// leads to it.
#[test]
fn conditional_opens_with_jz() {
    let image = compile(" S \n@_@").unwrap();
    let code_offset = format::HDR_ENTRY_POINTS + 1;
    let entry_offset = image[format::HDR_ENTRY_POINTS] as usize;
    assert_eq!(entry_offset, code_offset);
    assert_eq!(image[code_offset], format::JZ_LONG_BYTE);
    assert!(image[code_offset..].contains(&format::make_byte(Opcode::Halt as u8, 0)));
}

/// Malformed grids abort compilation with the offending row.
#[test]
fn ragged_grid_is_rejected() {
    let err = compile("E@\n@").unwrap_err();
    assert_eq!(
        err,
        robots::error::CompileError::MalformedGridError { row: 1 }
    );
}

/// Two disjoint entry points both appear in the header.
#[test]
fn two_entry_points() {
    let image = compile("E@\n@W").unwrap();
    assert_eq!(image[format::HDR_ENTRY_COUNT], 2);
}
