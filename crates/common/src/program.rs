//! Program images.
//!
//! An image is a flat sequence of 32-bit words stored big-endian with no
//! header. Several images can be concatenated into one before execution.

use crate::error::{DecodeError, EncodeError};
use crate::instruction::Instruction;
use crate::Word;

/// A program image: the initial contents of segment 0.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    /// The image words, in execution order.
    pub words: Vec<Word>,
}

impl Program {
    /// Create a program from raw words.
    pub fn new(words: Vec<Word>) -> Self {
        Self { words }
    }

    /// Encode a list of instructions into a program.
    pub fn from_instructions(instructions: &[Instruction]) -> Result<Self, EncodeError> {
        let words = instructions
            .iter()
            .map(Instruction::encode)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { words })
    }

    /// Decode a big-endian byte stream into a program.
    ///
    /// The byte slice length must be a multiple of 4. Words are not checked
    /// for valid opcodes; an image may carry data as well as code.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        if bytes.len() % 4 != 0 {
            return Err(DecodeError::InvalidLength(bytes.len()));
        }

        let words = bytes
            .chunks_exact(4)
            .map(|chunk| Word::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect();

        Ok(Self { words })
    }

    /// Serialize the program to big-endian bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.words.len() * 4);
        for word in &self.words {
            bytes.extend_from_slice(&word.to_be_bytes());
        }
        bytes
    }

    /// Concatenate programs, in order, into a single uber-program.
    pub fn concat<I>(programs: I) -> Self
    where
        I: IntoIterator<Item = Program>,
    {
        let mut words = Vec::new();
        for program in programs {
            words.extend(program.words);
        }
        Self { words }
    }

    /// Number of words in the image.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Returns true if the image has no words.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Consume the program, returning its words.
    pub fn into_words(self) -> Vec<Word> {
        self.words
    }
}

impl From<Vec<Word>> for Program {
    fn from(words: Vec<Word>) -> Self {
        Self::new(words)
    }
}
