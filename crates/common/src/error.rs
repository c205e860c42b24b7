//! Decode and encode errors for Universal Machine words.

use thiserror::Error;

/// Errors that occur while turning bytes or words into instructions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The top four bits of the word are 14 or 15.
    #[error("invalid opcode {opcode} (instruction {word:#010x})")]
    InvalidOpcode { opcode: u8, word: u32 },

    /// Program image length is not a multiple of 4.
    #[error("invalid program image length: {0} (must be multiple of 4)")]
    InvalidLength(usize),
}

/// Errors that occur while building or encoding instructions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// Register indices are 3 bits wide.
    #[error("register index {0} out of range (max 7)")]
    RegisterOutOfRange(u8),

    /// Orthography immediates are 25 bits wide.
    #[error("immediate {0:#x} does not fit in 25 bits (max 0x1ffffff)")]
    ImmediateOutOfRange(u32),
}
