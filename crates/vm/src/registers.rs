//! The register file.

use std::ops::{Index, IndexMut};

use um_common::{Register, Word, REGISTER_COUNT};

/// Eight general-purpose registers, all zero at machine start.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registers([Word; REGISTER_COUNT]);

impl Registers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of all eight registers, `R0` first.
    pub fn as_array(&self) -> [Word; REGISTER_COUNT] {
        self.0
    }
}

impl Index<Register> for Registers {
    type Output = Word;

    fn index(&self, register: Register) -> &Word {
        &self.0[register.index()]
    }
}

impl IndexMut<Register> for Registers {
    fn index_mut(&mut self, register: Register) -> &mut Word {
        &mut self.0[register.index()]
    }
}
