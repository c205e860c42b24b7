//! Machine state and the fetch-decode-execute loop.

use std::io::{Read, Write};

use log::debug;
use um_common::{Instruction, Program, Word};

use crate::error::{FaultKind, RuntimeError};
use crate::memory::Memory;
use crate::registers::Registers;

/// Lifecycle of a machine. `Halted` and `Failed` are terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum State {
    Running,
    Halted,
    Failed(RuntimeError),
}

/// Control flow after one instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Keep going from this finger.
    Continue(Word),
    /// The program executed HALT.
    Halt,
}

/// Summary of a run that ended in HALT.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    /// Instructions executed, HALT included.
    pub steps: u64,
}

/// The Universal Machine.
///
/// Input and output are injected; the machine never touches process-wide
/// streams on its own.
pub struct Machine<R, W> {
    pub(crate) registers: Registers,
    pub(crate) memory: Memory,
    /// Offset in segment 0 of the instruction being (or about to be) executed.
    pub(crate) finger: Word,
    pub(crate) input: R,
    pub(crate) output: W,
    pub(crate) state: State,
    pub(crate) steps: u64,
}

impl<R: Read, W: Write> Machine<R, W> {
    /// Create a machine with `program` loaded as segment 0.
    pub fn new(program: Program, input: R, output: W) -> Self {
        Self {
            registers: Registers::new(),
            memory: Memory::new(program.into_words()),
            finger: 0,
            input,
            output,
            state: State::Running,
            steps: 0,
        }
    }

    /// Limit the size of segments the program may allocate. An ALLOC over
    /// the limit faults with [`crate::MemoryError::AllocationFailed`].
    pub fn with_max_segment_words(mut self, words: usize) -> Self {
        self.memory = self.memory.with_max_segment_words(words);
        self
    }

    /// Run until HALT or a fault.
    pub fn run(&mut self) -> Result<Outcome, RuntimeError> {
        debug!(
            "machine started ({} program words)",
            self.memory.program().len()
        );
        loop {
            if let Flow::Halt = self.step()? {
                return Ok(Outcome { steps: self.steps });
            }
        }
    }

    /// Execute exactly one instruction.
    ///
    /// Faults move the machine to [`State::Failed`]; every later call
    /// reports [`FaultKind::NotRunning`].
    pub fn step(&mut self) -> Result<Flow, RuntimeError> {
        if self.state != State::Running {
            return Err(self.fault(FaultKind::NotRunning));
        }

        let result = self.fetch().and_then(|instr| self.execute(instr));
        match result {
            Ok(Flow::Continue(next)) => {
                self.steps += 1;
                self.finger = next;
                Ok(Flow::Continue(next))
            }
            Ok(Flow::Halt) => {
                self.steps += 1;
                self.state = State::Halted;
                debug!(
                    "machine halted after {} steps ({} live segments)",
                    self.steps,
                    self.memory.live_segments()
                );
                Ok(Flow::Halt)
            }
            Err(kind) => {
                let err = self.fault(kind);
                debug!("machine failed after {} steps: {err}", self.steps);
                self.state = State::Failed(err.clone());
                Err(err)
            }
        }
    }

    /// Decode the word under the finger. Segment 0 is re-read every cycle
    /// because LOAD PROGRAM may have replaced it.
    fn fetch(&self) -> Result<Instruction, FaultKind> {
        let word = self.memory.read(0, self.finger)?;
        Ok(Instruction::decode(word)?)
    }

    fn fault(&self, kind: FaultKind) -> RuntimeError {
        RuntimeError {
            at: self.finger,
            registers: self.registers.as_array(),
            kind,
        }
    }

    pub fn registers(&self) -> &Registers {
        &self.registers
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn finger(&self) -> Word {
        self.finger
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    /// Instructions executed so far.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn output(&self) -> &W {
        &self.output
    }
}
