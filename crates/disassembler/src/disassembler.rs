//! Disassembler: turns a program image into a readable listing.
//!
//! One line per word: index, raw word in hex, and a pseudo-code rendering.
//! Words that do not decode are shown as data, since images routinely
//! embed tables next to code.

use std::fmt::Write;

use um_common::{Instruction, Operation, Program, Word};

/// Disassemble a program into a listing, one newline-terminated line per word.
pub fn disassemble(program: &Program) -> String {
    let mut listing = String::new();
    for (i, &word) in program.words.iter().enumerate() {
        let _ = writeln!(
            listing,
            "{i:>4}\t0x{word:08x}\t{}",
            pretty(&Operation::decode(word))
        );
    }
    listing
}

/// Render one operation as pseudo-code.
pub fn pretty(operation: &Operation) -> String {
    let instr = match operation {
        Operation::Instruction(instr) => instr,
        Operation::Data(word) => return format!("DATA? 0x{word:08x}"),
    };

    match *instr {
        Instruction::ConditionalMove { a, b, .. } if a == b => "NOOP".to_string(),
        Instruction::ConditionalMove { a, b, c } => format!("if ({c} != 0) {a} <- {b}"),
        Instruction::ArrayIndex { a, b, c } => format!("{a} <- mem[{b}][{c}]"),
        Instruction::ArrayAmendment { a, b, c } => format!("mem[{a}][{b}] <- {c}"),
        Instruction::Addition { a, b, c } => format!("{a} <- {b} + {c}"),
        Instruction::Multiplication { a, b, c } => format!("{a} <- {b} * {c}"),
        Instruction::Division { a, b, c } => format!("{a} <- {b} / {c}"),
        Instruction::NotAnd { a, b, c } => format!("{a} <- ~({b} & {c})"),
        Instruction::Halt => "=== HALT ===".to_string(),
        Instruction::Allocation { b, c } => format!("{b} <- @allocate(size = {c})"),
        Instruction::Abandonment { c } => format!("free(mem[{c}])"),
        Instruction::Output { c } => format!("print({c})"),
        Instruction::Input { c } => format!("{c} <- read()"),
        Instruction::LoadProgram { b, c } => format!("loadProgram(mem[{b}]); finger <- {c}"),
        Instruction::Orthography { a, value } => format!("{a} <- {value}{}", char_hint(value)),
    }
}

/// Quoted character for immediates that look like text, else empty.
fn char_hint(value: Word) -> String {
    let Ok(byte) = u8::try_from(value) else {
        return String::new();
    };
    match byte {
        b'\n' => " '\\n'".to_string(),
        b'\t' => " '\\t'".to_string(),
        b'\r' => " '\\r'".to_string(),
        0x08 => " '\\b'".to_string(),
        0x20..=0xFF => format!(" '{}'", byte as char),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use um_common::{Register, ALL_REGISTERS};

    fn r(id: usize) -> Register {
        ALL_REGISTERS[id]
    }

    fn show(instr: Instruction) -> String {
        pretty(&Operation::Instruction(instr))
    }

    #[test]
    fn empty_program() {
        assert_eq!(disassemble(&Program::new(vec![])), "");
    }

    #[test]
    fn conditional_move() {
        assert_eq!(
            show(Instruction::ConditionalMove {
                a: r(2),
                b: r(4),
                c: r(6)
            }),
            "if (R6 != 0) R2 <- R4"
        );
    }

    #[test]
    fn conditional_move_onto_itself_is_noop() {
        assert_eq!(
            show(Instruction::ConditionalMove {
                a: r(3),
                b: r(3),
                c: r(1)
            }),
            "NOOP"
        );
    }

    #[test]
    fn memory_forms() {
        assert_eq!(
            show(Instruction::ArrayIndex {
                a: r(1),
                b: r(2),
                c: r(3)
            }),
            "R1 <- mem[R2][R3]"
        );
        assert_eq!(
            show(Instruction::ArrayAmendment {
                a: r(2),
                b: r(3),
                c: r(4)
            }),
            "mem[R2][R3] <- R4"
        );
        assert_eq!(
            show(Instruction::Allocation { b: r(3), c: r(1) }),
            "R3 <- @allocate(size = R1)"
        );
        assert_eq!(show(Instruction::Abandonment { c: r(6) }), "free(mem[R6])");
        assert_eq!(
            show(Instruction::LoadProgram { b: r(1), c: r(2) }),
            "loadProgram(mem[R1]); finger <- R2"
        );
    }

    #[test]
    fn arithmetic_forms() {
        let (a, b, c) = (r(3), r(4), r(5));
        assert_eq!(show(Instruction::Addition { a, b, c }), "R3 <- R4 + R5");
        assert_eq!(show(Instruction::Multiplication { a, b, c }), "R3 <- R4 * R5");
        assert_eq!(show(Instruction::Division { a, b, c }), "R3 <- R4 / R5");
        assert_eq!(show(Instruction::NotAnd { a, b, c }), "R3 <- ~(R4 & R5)");
    }

    #[test]
    fn io_and_halt() {
        assert_eq!(show(Instruction::Output { c: r(4) }), "print(R4)");
        assert_eq!(show(Instruction::Input { c: r(7) }), "R7 <- read()");
        assert_eq!(show(Instruction::Halt), "=== HALT ===");
    }

    #[test]
    fn orthography_char_hints() {
        let orth = |value| show(Instruction::Orthography { a: r(5), value });
        assert_eq!(orth(65), "R5 <- 65 'A'");
        assert_eq!(orth(10), "R5 <- 10 '\\n'");
        assert_eq!(orth(9), "R5 <- 9 '\\t'");
        assert_eq!(orth(13), "R5 <- 13 '\\r'");
        assert_eq!(orth(8), "R5 <- 8 '\\b'");
        assert_eq!(orth(0xE9), "R5 <- 233 'é'");
        assert_eq!(orth(0), "R5 <- 0");
        assert_eq!(orth(256), "R5 <- 256");
        assert_eq!(orth(0x1FF_FFFF), "R5 <- 33554431");
    }

    #[test]
    fn data_words() {
        assert_eq!(pretty(&Operation::Data(0xE123_4567)), "DATA? 0xe1234567");
    }

    #[test]
    fn listing_format() {
        let program = Program::new(vec![0xD000_0041, 0xA000_0000, 0x7000_0000, 0xFFFF_FFFF]);
        assert_eq!(
            disassemble(&program),
            "   0\t0xd0000041\tR0 <- 65 'A'\n\
             \x20  1\t0xa0000000\tprint(R0)\n\
             \x20  2\t0x70000000\t=== HALT ===\n\
             \x20  3\t0xffffffff\tDATA? 0xffffffff\n"
        );
    }

    #[test]
    fn listing_keeps_raw_word() {
        // Unused operand bits are shown as stored, not re-encoded.
        let program = Program::new(vec![0x7000_00FF]);
        assert_eq!(disassemble(&program), "   0\t0x700000ff\t=== HALT ===\n");
    }
}
