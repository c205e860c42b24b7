//! Opcode definitions for the Universal Machine instruction set.
//!
//! The opcode lives in the top four bits of every instruction word. Only
//! values 0 through 13 are defined; 14 and 15 never execute.

use crate::error::DecodeError;
use crate::Word;

/// Identifies the operation to perform.
///
/// The `#[repr(u8)]` attribute pins each variant to its 4-bit code.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    /// If C is non-zero, A gets B.
    ConditionalMove = 0,
    /// A gets the word at offset C of segment B.
    ArrayIndex = 1,
    /// Offset B of segment A gets C.
    ArrayAmendment = 2,
    /// A gets B + C, wrapping.
    Addition = 3,
    /// A gets B * C, wrapping.
    Multiplication = 4,
    /// A gets B / C, unsigned. Zero divisor is fatal.
    Division = 5,
    /// A gets !(B & C).
    NotAnd = 6,
    /// Stop the machine.
    Halt = 7,
    /// B gets the handle of a new zero-filled segment of C words.
    Allocation = 8,
    /// Free the segment whose handle is in C.
    Abandonment = 9,
    /// Write C as a single byte. Values above 255 are fatal.
    Output = 10,
    /// C gets the next input byte. End of input is fatal.
    Input = 11,
    /// Copy segment B into segment 0, then jump to offset C.
    LoadProgram = 12,
    /// A gets a 25-bit immediate. Uses its own layout.
    Orthography = 13,
}

/// All valid opcodes, in code order.
pub const ALL_OPCODES: [Opcode; 14] = [
    Opcode::ConditionalMove,
    Opcode::ArrayIndex,
    Opcode::ArrayAmendment,
    Opcode::Addition,
    Opcode::Multiplication,
    Opcode::Division,
    Opcode::NotAnd,
    Opcode::Halt,
    Opcode::Allocation,
    Opcode::Abandonment,
    Opcode::Output,
    Opcode::Input,
    Opcode::LoadProgram,
    Opcode::Orthography,
];

impl Opcode {
    /// Look up an opcode by its 4-bit code.
    pub fn from_code(code: u8) -> Option<Self> {
        ALL_OPCODES.get(code as usize).copied()
    }

    /// Extract the opcode from the top four bits of an instruction word.
    pub fn from_word(word: Word) -> Result<Self, DecodeError> {
        let code = (word >> 28) as u8;
        Self::from_code(code).ok_or(DecodeError::InvalidOpcode { opcode: code, word })
    }

    /// The 4-bit code of this opcode.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Returns the mnemonic used in canonical instruction text.
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Opcode::ConditionalMove => "CMOV",
            Opcode::ArrayIndex => "INDEX",
            Opcode::ArrayAmendment => "AMEND",
            Opcode::Addition => "ADD",
            Opcode::Multiplication => "MUL",
            Opcode::Division => "DIV",
            Opcode::NotAnd => "NAND",
            Opcode::Halt => "HALT",
            Opcode::Allocation => "ALLOC",
            Opcode::Abandonment => "FREE",
            Opcode::Output => "OUT",
            Opcode::Input => "IN",
            Opcode::LoadProgram => "LOADPROG",
            Opcode::Orthography => "ORTH",
        }
    }
}
