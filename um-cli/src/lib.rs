//! Support code for the `um` command-line tool.

pub mod switch;

pub use switch::SwitchSink;

use um_common::Program;

/// Number of bytes the codex prints before its dump begins.
pub const CODEX_INTRO_BYTES: usize = 195;

/// Build the codex input: the decryption key, a newline, then `p` to pick
/// the "dump UM data" menu entry.
pub fn codex_input(key: &str) -> Vec<u8> {
    let mut input = key.trim_end_matches(['\r', '\n']).as_bytes().to_vec();
    input.extend_from_slice(b"\np");
    input
}

/// Join program images, in order, into one uber-program.
pub fn uber_program(images: &[Vec<u8>]) -> Result<Program, um_common::DecodeError> {
    let programs = images
        .iter()
        .map(|bytes| Program::from_bytes(bytes))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Program::concat(programs))
}
