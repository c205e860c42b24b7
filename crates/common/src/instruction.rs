//! Instruction encoding and decoding for the Universal Machine.
//!
//! Every instruction is one 32-bit word. Opcodes 0 through 12 share the
//! standard layout:
//! ```text
//! bits 31-28: opcode
//! bits 27-9:  unused
//! bits 8-6:   register A
//! bits 5-3:   register B
//! bits 2-0:   register C
//! ```
//! Opcode 13 (orthography) loads an immediate instead:
//! ```text
//! bits 31-28: opcode (13)
//! bits 27-25: register A
//! bits 24-0:  unsigned immediate
//! ```

use std::fmt;

use crate::error::{DecodeError, EncodeError};
use crate::opcode::Opcode;
use crate::register::Register;
use crate::Word;

/// Largest value an orthography immediate can hold.
pub const IMMEDIATE_MAX: Word = 0x01FF_FFFF;

/// A single decoded instruction.
///
/// Each variant carries only the registers its opcode reads or writes.
/// Unused register fields are ignored by [`Instruction::decode`] and
/// written as zero by [`Instruction::encode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Instruction {
    ConditionalMove { a: Register, b: Register, c: Register },
    ArrayIndex { a: Register, b: Register, c: Register },
    ArrayAmendment { a: Register, b: Register, c: Register },
    Addition { a: Register, b: Register, c: Register },
    Multiplication { a: Register, b: Register, c: Register },
    Division { a: Register, b: Register, c: Register },
    NotAnd { a: Register, b: Register, c: Register },
    Halt,
    Allocation { b: Register, c: Register },
    Abandonment { c: Register },
    Output { c: Register },
    Input { c: Register },
    LoadProgram { b: Register, c: Register },
    Orthography { a: Register, value: Word },
}

impl Instruction {
    /// Build an orthography instruction, rejecting immediates wider than 25 bits.
    pub fn orthography(a: Register, value: Word) -> Result<Self, EncodeError> {
        if value > IMMEDIATE_MAX {
            return Err(EncodeError::ImmediateOutOfRange(value));
        }
        Ok(Instruction::Orthography { a, value })
    }

    /// Decode a word into an instruction.
    ///
    /// Fails only when the opcode is 14 or 15.
    pub fn decode(word: Word) -> Result<Self, DecodeError> {
        let opcode = Opcode::from_word(word)?;
        let a = Register::from_bits(word >> 6);
        let b = Register::from_bits(word >> 3);
        let c = Register::from_bits(word);

        Ok(match opcode {
            Opcode::ConditionalMove => Instruction::ConditionalMove { a, b, c },
            Opcode::ArrayIndex => Instruction::ArrayIndex { a, b, c },
            Opcode::ArrayAmendment => Instruction::ArrayAmendment { a, b, c },
            Opcode::Addition => Instruction::Addition { a, b, c },
            Opcode::Multiplication => Instruction::Multiplication { a, b, c },
            Opcode::Division => Instruction::Division { a, b, c },
            Opcode::NotAnd => Instruction::NotAnd { a, b, c },
            Opcode::Halt => Instruction::Halt,
            Opcode::Allocation => Instruction::Allocation { b, c },
            Opcode::Abandonment => Instruction::Abandonment { c },
            Opcode::Output => Instruction::Output { c },
            Opcode::Input => Instruction::Input { c },
            Opcode::LoadProgram => Instruction::LoadProgram { b, c },
            Opcode::Orthography => Instruction::Orthography {
                a: Register::from_bits(word >> 25),
                value: word & IMMEDIATE_MAX,
            },
        })
    }

    /// Encode this instruction to a word.
    pub fn encode(&self) -> Result<Word, EncodeError> {
        let r0 = Register::R0;
        let word = match *self {
            Instruction::ConditionalMove { a, b, c }
            | Instruction::ArrayIndex { a, b, c }
            | Instruction::ArrayAmendment { a, b, c }
            | Instruction::Addition { a, b, c }
            | Instruction::Multiplication { a, b, c }
            | Instruction::Division { a, b, c }
            | Instruction::NotAnd { a, b, c } => standard(self.opcode(), a, b, c),
            Instruction::Halt => standard(Opcode::Halt, r0, r0, r0),
            Instruction::Allocation { b, c } | Instruction::LoadProgram { b, c } => {
                standard(self.opcode(), r0, b, c)
            }
            Instruction::Abandonment { c } | Instruction::Output { c } | Instruction::Input { c } => {
                standard(self.opcode(), r0, r0, c)
            }
            Instruction::Orthography { a, value } => {
                if value > IMMEDIATE_MAX {
                    return Err(EncodeError::ImmediateOutOfRange(value));
                }
                opcode_bits(Opcode::Orthography) | ((a.id() as Word) << 25) | value
            }
        };
        Ok(word)
    }

    /// The opcode of this instruction.
    pub fn opcode(&self) -> Opcode {
        match self {
            Instruction::ConditionalMove { .. } => Opcode::ConditionalMove,
            Instruction::ArrayIndex { .. } => Opcode::ArrayIndex,
            Instruction::ArrayAmendment { .. } => Opcode::ArrayAmendment,
            Instruction::Addition { .. } => Opcode::Addition,
            Instruction::Multiplication { .. } => Opcode::Multiplication,
            Instruction::Division { .. } => Opcode::Division,
            Instruction::NotAnd { .. } => Opcode::NotAnd,
            Instruction::Halt => Opcode::Halt,
            Instruction::Allocation { .. } => Opcode::Allocation,
            Instruction::Abandonment { .. } => Opcode::Abandonment,
            Instruction::Output { .. } => Opcode::Output,
            Instruction::Input { .. } => Opcode::Input,
            Instruction::LoadProgram { .. } => Opcode::LoadProgram,
            Instruction::Orthography { .. } => Opcode::Orthography,
        }
    }
}

fn opcode_bits(opcode: Opcode) -> Word {
    (opcode.code() as Word) << 28
}

fn standard(opcode: Opcode, a: Register, b: Register, c: Register) -> Word {
    opcode_bits(opcode) | ((a.id() as Word) << 6) | ((b.id() as Word) << 3) | c.id() as Word
}

/// Canonical text: mnemonic followed by the operands the opcode uses.
impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = self.opcode().mnemonic();
        match *self {
            Instruction::ConditionalMove { a, b, c }
            | Instruction::ArrayIndex { a, b, c }
            | Instruction::ArrayAmendment { a, b, c }
            | Instruction::Addition { a, b, c }
            | Instruction::Multiplication { a, b, c }
            | Instruction::Division { a, b, c }
            | Instruction::NotAnd { a, b, c } => write!(f, "{m} {a} {b} {c}"),
            Instruction::Halt => write!(f, "{m}"),
            Instruction::Allocation { b, c } | Instruction::LoadProgram { b, c } => {
                write!(f, "{m} {b} {c}")
            }
            Instruction::Abandonment { c } | Instruction::Output { c } | Instruction::Input { c } => {
                write!(f, "{m} {c}")
            }
            Instruction::Orthography { a, value } => write!(f, "{m} {a} {value}"),
        }
    }
}

/// Lenient decode result for offline tooling.
///
/// Words with opcode 14 or 15 may be inert data embedded in a program, so
/// tools that walk a whole image keep them as [`Operation::Data`] instead
/// of failing. The execution engine never uses this path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Instruction(Instruction),
    Data(Word),
}

impl Operation {
    /// Decode a word, keeping undecodable words as data.
    pub fn decode(word: Word) -> Self {
        match Instruction::decode(word) {
            Ok(instr) => Operation::Instruction(instr),
            Err(_) => Operation::Data(word),
        }
    }
}
