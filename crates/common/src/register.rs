//! Register indices.

use std::fmt;

use crate::error::EncodeError;

/// Index of one of the 8 general-purpose registers.
///
/// Always in `0..=7`; the only way to build one from an arbitrary number is
/// [`Register::new`], which rejects anything wider than 3 bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Register(u8);

/// Number of general-purpose registers.
pub const REGISTER_COUNT: usize = 8;

/// All registers, `R0` through `R7`.
pub const ALL_REGISTERS: [Register; REGISTER_COUNT] = [
    Register(0),
    Register(1),
    Register(2),
    Register(3),
    Register(4),
    Register(5),
    Register(6),
    Register(7),
];

impl Register {
    pub const R0: Register = Register(0);

    /// Build a register index, rejecting values above 7.
    pub fn new(id: u8) -> Result<Self, EncodeError> {
        if (id as usize) < REGISTER_COUNT {
            Ok(Register(id))
        } else {
            Err(EncodeError::RegisterOutOfRange(id))
        }
    }

    /// Take the low 3 bits of `bits` as a register index.
    pub(crate) fn from_bits(bits: u32) -> Self {
        Register((bits & 0x7) as u8)
    }

    /// The index as a `usize`, for indexing register storage.
    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn id(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_accepts_three_bit_values() {
        for id in 0..8u8 {
            assert_eq!(Register::new(id).map(Register::id), Ok(id));
        }
    }

    #[test]
    fn new_rejects_wider_values() {
        assert_eq!(Register::new(8), Err(EncodeError::RegisterOutOfRange(8)));
        assert_eq!(
            Register::new(255),
            Err(EncodeError::RegisterOutOfRange(255))
        );
    }

    #[test]
    fn from_bits_masks_to_three_bits() {
        assert_eq!(Register::from_bits(0b1111_1010), Register(2));
    }

    #[test]
    fn display() {
        assert_eq!(ALL_REGISTERS[5].to_string(), "R5");
    }
}
