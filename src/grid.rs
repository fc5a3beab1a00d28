//! # Grid loader
//!
//! Parses source text into a rectangular token grid, truncating each row at
//! an optional `;` comment, and seeds the memory-initializer map from DIGIT
//! tokens found during the scan.
//!
//! Exposed over `&str` rather than a file path — mirroring the original
//! implementation's own "riffing off... multiple input methods (pipe,
//! file, etc.)" framing — so the compiler binary is just a thin
//! file-reading wrapper around [`load`].

use crate::error::{CompileError, GridPos};
use crate::lexer::{lex_char, Token, TokenKind};

/// A rectangular field of lexed tokens, plus the memory values DIGIT tokens
/// seed into the data segment.
pub struct Grid {
    pub width: usize,
    pub height: usize,
    tokens: Vec<Token>,
    /// `(linear address, value)`, in the order DIGIT tokens were scanned.
    pub mem_inits: Vec<(u16, u8)>,
}

impl Grid {
    /// Row-major token lookup. Panics if `(x, y)` is outside the grid —
    /// callers (the path walker) only ever step to cells a well-formed
    /// program can reach; walking off the edge is the program's own bug,
    /// the same way an infinite loop is (§5 resource model).
    pub fn token_at(&self, x: i32, y: i32) -> Token {
        let (x, y) = (x as usize, y as usize);
        self.tokens[y * self.width + x]
    }
}

/// Parse `source` into a [`Grid`], lexing every character and seeding
/// memory initializers from DIGIT tokens (§4.2).
pub fn load(source: &str) -> Result<Grid, CompileError> {
    let lines: Vec<&str> = source.lines().collect();
    if lines.is_empty() {
        return Ok(Grid {
            width: 0,
            height: 0,
            tokens: Vec::new(),
            mem_inits: Vec::new(),
        });
    }

    // Pass 1: lex each row up to its comment tail, and determine the
    // declared width from the first row.
    let mut rows: Vec<Vec<Token>> = Vec::with_capacity(lines.len());
    let mut width = None;
    for (row_idx, line) in lines.iter().enumerate() {
        let mut row = Vec::new();
        for (col_idx, ch) in line.chars().enumerate() {
            let pos = GridPos {
                row: row_idx,
                col: col_idx,
            };
            let token = lex_char(ch, pos)?;
            if token.kind == TokenKind::Comment {
                break;
            }
            row.push(token);
        }
        let declared_width = *width.get_or_insert(row.len());
        if row.len() != declared_width {
            return Err(CompileError::MalformedGridError { row: row_idx });
        }
        rows.push(row);
    }

    let width = width.unwrap_or(0);
    let height = rows.len();
    let mut tokens = vec![
        Token {
            kind: TokenKind::Nop,
            ch: ' '
        };
        width * height
    ];
    for (y, row) in rows.into_iter().enumerate() {
        for (x, token) in row.into_iter().enumerate() {
            tokens[y * width + x] = token;
        }
    }

    let mem_inits = scan_mem_inits(width, height, &tokens)?;
    Ok(Grid {
        width,
        height,
        tokens,
        mem_inits,
    })
}

/// Scan the grid for DIGIT tokens, recording `addr -> value` in scan order
/// (§4.2, §3 memory initializers).
fn scan_mem_inits(
    width: usize,
    height: usize,
    tokens: &[Token],
) -> Result<Vec<(u16, u8)>, CompileError> {
    let mut mem_inits = Vec::new();
    for y in 0..height {
        for x in 0..width {
            let token = tokens[y * width + x];
            if token.kind == TokenKind::Digit {
                let addr = x as u32 + (y * width) as u32;
                if addr >= 1 << 15 {
                    return Err(CompileError::AddressTooLargeError {
                        addr,
                        pos: GridPos { row: y, col: x },
                    });
                }
                mem_inits.push((addr as u16, token.digit_value()));
            }
        }
    }
    Ok(mem_inits)
}
