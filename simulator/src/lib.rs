//! # robots-vm
//!
//! Executes bytecode images produced by the `robots` compiler: one
//! process per entry point, round-robin scheduled, each with its own
//! operand stack against a shared flat memory buffer.
//!
//! ## Example
//!
//! ```rust
//! use robots_vm::VirtualMachine;
//!
//! let image = robots::compile("E@").unwrap();
//! let mut vm = VirtualMachine::load(&image).unwrap();
//! let faults = vm.run();
//! assert!(faults.is_empty());
//! ```

pub mod bitio;
pub mod error;
pub mod executor;
pub mod loader;
pub mod process;

pub use executor::VirtualMachine;
