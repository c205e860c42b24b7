//! Universal Machine common types and instruction encoding.
//!
//! This crate provides the foundational data structures shared by the
//! execution engine and the offline tools:
//!
//! - [`Word`]: the 32-bit unsigned machine word
//! - [`Register`]: a validated 3-bit register index
//! - [`Opcode`]: the 14 opcodes
//! - [`Instruction`]: decoded instruction with encode/decode
//! - [`Operation`]: lenient decode that keeps invalid words as data
//! - [`Program`]: a big-endian program image
//! - [`DecodeError`], [`EncodeError`]
//!
//! # Dependencies
//!
//! This crate uses `thiserror` (compile-time proc-macro, zero runtime cost)
//! and has no other dependencies.

pub mod error;
pub mod instruction;
pub mod opcode;
pub mod program;
pub mod register;

/// The machine word. All registers and memory cells hold one.
pub type Word = u32;

// Re-export commonly used types at the crate root.
pub use error::{DecodeError, EncodeError};
pub use instruction::{Instruction, Operation, IMMEDIATE_MAX};
pub use opcode::Opcode;
pub use program::Program;
pub use register::{Register, ALL_REGISTERS, REGISTER_COUNT};
