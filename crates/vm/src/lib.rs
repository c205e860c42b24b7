//! Universal Machine: executes 32-bit word programs.
//!
//! The machine has:
//! - Eight 32-bit registers, zero at start
//! - A segmented heap: word arrays addressed by handle, with handle 0
//!   holding the running program
//! - A finger (program counter) into segment 0
//!
//! # Usage
//!
//! ```
//! use um_common::{Instruction, Program, Register};
//! use um_vm::run;
//!
//! let r0 = Register::new(0).unwrap();
//! let r2 = Register::new(2).unwrap();
//! let program = Program::from_instructions(&[
//!     Instruction::orthography(r0, 65).unwrap(),
//!     Instruction::orthography(r2, 1).unwrap(),
//!     Instruction::Output { c: r0 },
//!     Instruction::Halt,
//! ])
//! .unwrap();
//!
//! let mut output = Vec::new();
//! let outcome = run(program, std::io::empty(), &mut output).unwrap();
//! assert_eq!(output, b"A");
//! assert_eq!(outcome.steps, 4);
//! ```

pub mod error;
mod execute;
pub mod machine;
pub mod memory;
pub mod registers;

pub use error::{FaultCategory, FaultKind, MemoryError, RuntimeError};
pub use machine::{Flow, Machine, Outcome, State};
pub use memory::{Handle, Memory};
pub use registers::Registers;

use std::io::{Read, Write};

use um_common::Program;

/// Execute a program to completion.
///
/// This is the primary entry point for the machine. It loads `program`
/// into segment 0, then fetches and executes from finger 0 until HALT.
///
/// # Errors
///
/// Returns [`RuntimeError`] on the first fault (invalid opcode, bad
/// memory access, division by zero, output above 255, end of input).
pub fn run<R: Read, W: Write>(
    program: Program,
    input: R,
    output: W,
) -> Result<Outcome, RuntimeError> {
    Machine::new(program, input, output).run()
}
