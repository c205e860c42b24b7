//! Runtime errors for the Universal Machine.
//!
//! Every fault is fatal. A [`RuntimeError`] records where the machine was
//! (`at`, the finger of the faulting instruction) and a snapshot of the
//! registers when it stopped.

use std::fmt;
use std::io;

use thiserror::Error;
use um_common::{DecodeError, Word, REGISTER_COUNT};

use crate::memory::Handle;

/// Errors raised by the segmented memory.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MemoryError {
    /// Read, write or copy through a handle that maps to no segment.
    #[error("segment {0} is not allocated")]
    Unallocated(Handle),

    /// Offset past the end of a live segment.
    #[error("offset {offset} out of bounds for segment {handle} (length {len})")]
    OutOfBounds {
        handle: Handle,
        offset: Word,
        len: usize,
    },

    /// Segment 0 holds the running program and is never freed.
    #[error("cannot free segment 0")]
    FreeProgramSegment,

    /// Free of a handle that was already returned to the pool.
    #[error("segment {0} is already free")]
    AlreadyFree(Handle),

    /// Free of a handle the allocator never handed out.
    #[error("segment {0} was never allocated")]
    NeverAllocated(Handle),

    /// The host could not provide a segment of the requested size, or the
    /// size is over the configured per-segment limit.
    #[error("cannot allocate a segment of {capacity} words")]
    AllocationFailed { capacity: Word },
}

/// Error taxonomy used when reporting faults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultCategory {
    Decode,
    Memory,
    Arithmetic,
    Io,
    State,
}

impl fmt::Display for FaultCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FaultCategory::Decode => "DecodeError",
            FaultCategory::Memory => "MemoryError",
            FaultCategory::Arithmetic => "ArithmeticError",
            FaultCategory::Io => "IOError",
            FaultCategory::State => "StateError",
        };
        f.write_str(name)
    }
}

/// What went wrong.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FaultKind {
    /// Fetched word has opcode 14 or 15.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Bad handle, bad offset or bad free.
    #[error(transparent)]
    Memory(#[from] MemoryError),

    /// Division with a zero divisor.
    #[error("division by zero")]
    DivisionByZero,

    /// Output register holds a value that is not a byte.
    #[error("output value {0} exceeds 255")]
    OutputOutOfRange(Word),

    /// Input requested after the source was exhausted.
    #[error("unexpected end of input")]
    EndOfInput,

    /// The injected input source or output sink failed.
    #[error("I/O failure: {0}")]
    Io(io::ErrorKind),

    /// Step requested on a machine that already halted or failed.
    #[error("machine is not running")]
    NotRunning,
}

impl FaultKind {
    pub fn category(&self) -> FaultCategory {
        match self {
            FaultKind::Decode(_) => FaultCategory::Decode,
            FaultKind::Memory(_) => FaultCategory::Memory,
            FaultKind::DivisionByZero => FaultCategory::Arithmetic,
            FaultKind::OutputOutOfRange(_) | FaultKind::EndOfInput | FaultKind::Io(_) => {
                FaultCategory::Io
            }
            FaultKind::NotRunning => FaultCategory::State,
        }
    }
}

/// A fatal machine fault.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at finger {at}")]
pub struct RuntimeError {
    /// Finger of the instruction that faulted.
    pub at: Word,
    /// Register contents when the fault was raised.
    pub registers: [Word; REGISTER_COUNT],
    /// The fault itself.
    pub kind: FaultKind,
}

impl RuntimeError {
    pub fn category(&self) -> FaultCategory {
        self.kind.category()
    }
}
