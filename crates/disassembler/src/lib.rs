//! Universal Machine disassembler: binary image to readable listing.
//!
//! Built on the same decode function the machine uses, but lenient:
//! words with opcode 14 or 15 are listed as data instead of failing.
//!
//! # Usage
//!
//! ```
//! use um_common::Program;
//! use um_disassembler::disassemble;
//!
//! let program = Program::from_bytes(&[0xD0, 0x00, 0x00, 0x41, 0x70, 0x00, 0x00, 0x00]).unwrap();
//! assert_eq!(
//!     disassemble(&program),
//!     "   0\t0xd0000041\tR0 <- 65 'A'\n   1\t0x70000000\t=== HALT ===\n"
//! );
//! ```

mod disassembler;

pub use disassembler::{disassemble, pretty};
