//! # Linker
//!
//! The compiler's second pass: coalesces singly-referenced blocks, then
//! lays them out into a linked, relocated bytecode image (§4.4-§4.6).
//! Named after the teacher's `encoder` stage, which plays the same role
//! of turning an intermediate representation into final bytes.

mod coalesce;
mod layout;

pub use coalesce::coalesce_all;
pub use layout::link;
