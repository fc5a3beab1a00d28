//! # robots
//!
//! A compiler for the robots 2-D grid esoteric language: one or more
//! cursors ("robots") walk a rectangular grid of tokens, compiling down
//! to a compact, relocatable bytecode image that `robots-vm` can load and
//! run.
//!
//! ## Pipeline
//!
//! 1. **Lexer** - classifies grid characters into tokens
//! 2. **Grid loader** - assembles rows into a rectangular token field
//! 3. **Path discoverer** - enumerates labels and walks each one's block
//! 4. **Linker** - coalesces singly-referenced blocks, lays out and
//!    relocates the reachable ones, and writes the final image
//!
//! ## Example
//!
//! ```rust
//! use robots::compile;
//!
//! let image = compile("E@").unwrap();
//! assert_eq!(&image[0..4], b"JED?");
//! ```

pub mod compile;
pub mod diagnostics;
pub mod error;
pub mod format;
pub mod grid;
pub mod label;
pub mod lexer;
pub mod linker;
pub mod pathwalk;

pub use compile::compile;
