//! Opcode dispatch for the Universal Machine.

use std::io::{self, Read, Write};

use log::debug;
use um_common::{Instruction, Register, Word};

use crate::error::FaultKind;
use crate::machine::{Flow, Machine};

impl<R: Read, W: Write> Machine<R, W> {
    /// Apply one decoded instruction and report where to go next.
    ///
    /// On error nothing past the failing operation has been committed.
    pub(crate) fn execute(&mut self, instr: Instruction) -> Result<Flow, FaultKind> {
        match instr {
            Instruction::ConditionalMove { a, b, c } => {
                if self.registers[c] != 0 {
                    self.registers[a] = self.registers[b];
                }
            }
            Instruction::ArrayIndex { a, b, c } => {
                self.registers[a] = self.memory.read(self.registers[b], self.registers[c])?;
            }
            Instruction::ArrayAmendment { a, b, c } => {
                self.memory
                    .write(self.registers[a], self.registers[b], self.registers[c])?;
            }
            Instruction::Addition { a, b, c } => {
                self.registers[a] = self.registers[b].wrapping_add(self.registers[c]);
            }
            Instruction::Multiplication { a, b, c } => {
                self.registers[a] = self.registers[b].wrapping_mul(self.registers[c]);
            }
            Instruction::Division { a, b, c } => self.exec_division(a, b, c)?,
            Instruction::NotAnd { a, b, c } => {
                self.registers[a] = !(self.registers[b] & self.registers[c]);
            }
            Instruction::Halt => return self.exec_halt(),
            Instruction::Allocation { b, c } => {
                self.registers[b] = self.memory.allocate(self.registers[c])?;
            }
            Instruction::Abandonment { c } => self.memory.free(self.registers[c])?,
            Instruction::Output { c } => self.exec_output(c)?,
            Instruction::Input { c } => self.exec_input(c)?,
            Instruction::LoadProgram { b, c } => return self.exec_load_program(b, c),
            Instruction::Orthography { a, value } => self.registers[a] = value,
        }
        Ok(Flow::Continue(self.finger.wrapping_add(1)))
    }

    fn exec_halt(&mut self) -> Result<Flow, FaultKind> {
        self.output.flush().map_err(io_fault)?;
        Ok(Flow::Halt)
    }

    fn exec_division(&mut self, a: Register, b: Register, c: Register) -> Result<(), FaultKind> {
        let divisor = self.registers[c];
        if divisor == 0 {
            return Err(FaultKind::DivisionByZero);
        }
        self.registers[a] = self.registers[b] / divisor;
        Ok(())
    }

    /// Write one byte and flush so prompts show up before the next read.
    fn exec_output(&mut self, c: Register) -> Result<(), FaultKind> {
        let value = self.registers[c];
        let byte = u8::try_from(value).map_err(|_| FaultKind::OutputOutOfRange(value))?;
        self.output.write_all(&[byte]).map_err(io_fault)?;
        self.output.flush().map_err(io_fault)
    }

    fn exec_input(&mut self, c: Register) -> Result<(), FaultKind> {
        let mut buf = [0u8; 1];
        match self.input.read_exact(&mut buf) {
            Ok(()) => {
                self.registers[c] = buf[0] as Word;
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Err(FaultKind::EndOfInput),
            Err(e) => Err(io_fault(e)),
        }
    }

    /// Handle 0 only moves the finger; any other handle replaces the program first.
    fn exec_load_program(&mut self, b: Register, c: Register) -> Result<Flow, FaultKind> {
        let handle = self.registers[b];
        if handle != 0 {
            self.memory.replace_program(handle)?;
            debug!(
                "program replaced from segment {handle} ({} words), finger {}",
                self.memory.program().len(),
                self.registers[c]
            );
        }
        Ok(Flow::Continue(self.registers[c]))
    }
}

fn io_fault(e: io::Error) -> FaultKind {
    FaultKind::Io(e.kind())
}
