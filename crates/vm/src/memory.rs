//! Segmented memory: an arena of word arrays addressed by handle.
//!
//! Handle 0 is the running program. Freed handles go to a FIFO pool and
//! are handed out again oldest-first before any fresh handle is minted.
//! Programs observe handle values, so the reuse order is part of the
//! machine's contract.

use std::collections::VecDeque;

use log::trace;
use um_common::Word;

use crate::error::MemoryError;

/// Identifies a segment.
pub type Handle = Word;

/// The machine's heap.
#[derive(Debug, Clone)]
pub struct Memory {
    /// Slot `h` holds segment `h`, or `None` once freed. Slot 0 is always `Some`.
    segments: Vec<Option<Vec<Word>>>,
    /// Freed handles, oldest first.
    free: VecDeque<Handle>,
    /// Largest segment ALLOC may create, in words.
    max_segment_words: usize,
}

impl Memory {
    /// Create a memory whose segment 0 holds `program`.
    pub fn new(program: Vec<Word>) -> Self {
        Self {
            segments: vec![Some(program)],
            free: VecDeque::new(),
            max_segment_words: usize::MAX,
        }
    }

    /// Cap the size of segments created by [`Memory::allocate`].
    /// The program segment is not subject to the limit.
    pub fn with_max_segment_words(mut self, words: usize) -> Self {
        self.max_segment_words = words;
        self
    }

    /// Borrow a live segment.
    pub fn segment(&self, handle: Handle) -> Result<&[Word], MemoryError> {
        self.segments
            .get(handle as usize)
            .and_then(Option::as_deref)
            .ok_or(MemoryError::Unallocated(handle))
    }

    fn segment_mut(&mut self, handle: Handle) -> Result<&mut [Word], MemoryError> {
        self.segments
            .get_mut(handle as usize)
            .and_then(Option::as_deref_mut)
            .ok_or(MemoryError::Unallocated(handle))
    }

    /// The current program image (segment 0).
    pub fn program(&self) -> &[Word] {
        self.segment(0).unwrap_or(&[])
    }

    /// Read one word.
    pub fn read(&self, handle: Handle, offset: Word) -> Result<Word, MemoryError> {
        let segment = self.segment(handle)?;
        segment
            .get(offset as usize)
            .copied()
            .ok_or(MemoryError::OutOfBounds {
                handle,
                offset,
                len: segment.len(),
            })
    }

    /// Write one word.
    pub fn write(&mut self, handle: Handle, offset: Word, value: Word) -> Result<(), MemoryError> {
        let segment = self.segment_mut(handle)?;
        let len = segment.len();
        let cell = segment
            .get_mut(offset as usize)
            .ok_or(MemoryError::OutOfBounds {
                handle,
                offset,
                len,
            })?;
        *cell = value;
        Ok(())
    }

    /// Create a zero-filled segment of `capacity` words and return its handle.
    ///
    /// Reuses the oldest freed handle if there is one, otherwise mints the
    /// next never-used handle. A size the host cannot back fails with
    /// [`MemoryError::AllocationFailed`] and leaves memory unchanged.
    pub fn allocate(&mut self, capacity: Word) -> Result<Handle, MemoryError> {
        let len = capacity as usize;
        if len > self.max_segment_words {
            return Err(MemoryError::AllocationFailed { capacity });
        }
        let mut segment = Vec::new();
        segment
            .try_reserve_exact(len)
            .map_err(|_| MemoryError::AllocationFailed { capacity })?;
        segment.resize(len, 0);

        let handle = match self.free.pop_front() {
            Some(handle) => {
                self.segments[handle as usize] = Some(segment);
                handle
            }
            None => {
                self.segments.push(Some(segment));
                (self.segments.len() - 1) as Handle
            }
        };
        trace!("allocated segment {handle} ({capacity} words)");
        Ok(handle)
    }

    /// Release a segment and return its handle to the pool.
    pub fn free(&mut self, handle: Handle) -> Result<(), MemoryError> {
        if handle == 0 {
            return Err(MemoryError::FreeProgramSegment);
        }
        let slot = self
            .segments
            .get_mut(handle as usize)
            .ok_or(MemoryError::NeverAllocated(handle))?;
        if slot.take().is_none() {
            return Err(MemoryError::AlreadyFree(handle));
        }
        self.free.push_back(handle);
        trace!("freed segment {handle}");
        Ok(())
    }

    /// Replace segment 0 with a copy of segment `handle`.
    ///
    /// Handle 0 leaves memory untouched.
    pub fn replace_program(&mut self, handle: Handle) -> Result<(), MemoryError> {
        if handle == 0 {
            return Ok(());
        }
        let copy = self.segment(handle)?.to_vec();
        trace!("segment 0 replaced by copy of segment {handle} ({} words)", copy.len());
        self.segments[0] = Some(copy);
        Ok(())
    }

    /// Number of live segments, segment 0 included.
    pub fn live_segments(&self) -> usize {
        self.segments.iter().filter(|s| s.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_initial_program() {
        let memory = Memory::new(vec![0, 1, 4, 9]);
        assert_eq!(memory.program(), &[0, 1, 4, 9]);
        assert_eq!(memory.read(0, 3), Ok(9));
    }

    #[test]
    fn empty_program_is_allowed() {
        let memory = Memory::new(vec![]);
        assert_eq!(memory.program(), &[] as &[Word]);
        assert_eq!(
            memory.read(0, 0),
            Err(MemoryError::OutOfBounds {
                handle: 0,
                offset: 0,
                len: 0
            })
        );
    }

    #[test]
    fn allocate_empty_segment() {
        let mut memory = Memory::new(vec![]);
        let handle = memory.allocate(0).unwrap();
        assert_ne!(handle, 0);
        assert_eq!(memory.segment(handle), Ok(&[] as &[Word]));
    }

    #[test]
    fn allocate_is_zero_filled_and_bounds_checked() {
        let mut memory = Memory::new(vec![]);
        let handle = memory.allocate(4).unwrap();
        assert_eq!(memory.segment(handle), Ok(&[0, 0, 0, 0][..]));

        for (i, v) in [42, 43, 44, 45].into_iter().enumerate() {
            memory.write(handle, i as Word, v).unwrap();
        }
        assert_eq!(memory.segment(handle), Ok(&[42, 43, 44, 45][..]));

        assert_eq!(
            memory.read(handle, 4),
            Err(MemoryError::OutOfBounds {
                handle,
                offset: 4,
                len: 4
            })
        );
        assert_eq!(
            memory.write(handle, Word::MAX, 1),
            Err(MemoryError::OutOfBounds {
                handle,
                offset: Word::MAX,
                len: 4
            })
        );
    }

    #[test]
    fn fresh_handles_are_monotonic() {
        let mut memory = Memory::new(vec![]);
        assert_eq!(memory.allocate(1).unwrap(), 1);
        assert_eq!(memory.allocate(1).unwrap(), 2);
        assert_eq!(memory.allocate(1).unwrap(), 3);
    }

    #[test]
    fn freed_segment_is_unreadable() {
        let mut memory = Memory::new(vec![]);
        let handle = memory.allocate(4).unwrap();
        memory.free(handle).unwrap();
        assert_eq!(memory.read(handle, 0), Err(MemoryError::Unallocated(handle)));
        assert_eq!(memory.write(handle, 0, 1), Err(MemoryError::Unallocated(handle)));
    }

    #[test]
    fn free_reuse_is_fifo() {
        let mut memory = Memory::new(vec![]);
        let handles: Vec<Handle> = (0..4).map(|_| memory.allocate(1).unwrap()).collect();
        assert_eq!(handles, vec![1, 2, 3, 4]);

        memory.free(3).unwrap();
        memory.free(1).unwrap();
        memory.free(4).unwrap();

        assert_eq!(memory.allocate(2).unwrap(), 3);
        assert_eq!(memory.allocate(2).unwrap(), 1);
        assert_eq!(memory.allocate(2).unwrap(), 4);
        // Pool drained, so a fresh handle follows the highest ever minted.
        assert_eq!(memory.allocate(2).unwrap(), 5);
    }

    #[test]
    fn reused_handle_gets_fresh_zeroed_segment() {
        let mut memory = Memory::new(vec![]);
        let handle = memory.allocate(2).unwrap();
        memory.write(handle, 1, 77).unwrap();
        memory.free(handle).unwrap();

        let again = memory.allocate(3).unwrap();
        assert_eq!(again, handle);
        assert_eq!(memory.segment(again), Ok(&[0, 0, 0][..]));
    }

    #[test]
    fn free_zero_fails() {
        let mut memory = Memory::new(vec![1]);
        assert_eq!(memory.free(0), Err(MemoryError::FreeProgramSegment));
        assert_eq!(memory.program(), &[1]);
    }

    #[test]
    fn double_free_fails() {
        let mut memory = Memory::new(vec![]);
        let handle = memory.allocate(1).unwrap();
        memory.free(handle).unwrap();
        assert_eq!(memory.free(handle), Err(MemoryError::AlreadyFree(handle)));
    }

    #[test]
    fn free_never_allocated_fails() {
        let mut memory = Memory::new(vec![]);
        assert_eq!(memory.free(1), Err(MemoryError::NeverAllocated(1)));
        memory.allocate(1).unwrap();
        assert_eq!(memory.free(7), Err(MemoryError::NeverAllocated(7)));
    }

    #[test]
    fn failed_free_does_not_pollute_pool() {
        let mut memory = Memory::new(vec![]);
        let handle = memory.allocate(1).unwrap();
        memory.free(handle).unwrap();
        let _ = memory.free(handle);
        let _ = memory.free(0);
        assert_eq!(memory.allocate(1).unwrap(), handle);
        assert_eq!(memory.allocate(1).unwrap(), 2);
    }

    #[test]
    fn replace_program_copies_contents_and_size() {
        let mut memory = Memory::new(vec![]);
        let handle = memory.allocate(4).unwrap();
        for i in 0..4 {
            memory.write(handle, i, i * i).unwrap();
        }

        memory.replace_program(handle).unwrap();
        assert_eq!(memory.program(), &[0, 1, 4, 9]);

        // The copy is independent of its source.
        memory.write(handle, 0, 42).unwrap();
        memory.write(handle, 1, 2048).unwrap();
        assert_eq!(memory.program(), &[0, 1, 4, 9]);
        assert_eq!(memory.segment(handle), Ok(&[42, 2048, 4, 9][..]));
    }

    #[test]
    fn replace_program_can_shrink() {
        let mut memory = Memory::new(vec![7; 10]);
        let handle = memory.allocate(2).unwrap();
        memory.replace_program(handle).unwrap();
        assert_eq!(memory.program(), &[0, 0]);
    }

    #[test]
    fn replace_program_from_zero_is_noop() {
        let mut memory = Memory::new(vec![5, 6]);
        memory.replace_program(0).unwrap();
        assert_eq!(memory.program(), &[5, 6]);
    }

    #[test]
    fn replace_program_from_unallocated_fails() {
        let mut memory = Memory::new(vec![5, 6]);
        assert_eq!(memory.replace_program(3), Err(MemoryError::Unallocated(3)));
        assert_eq!(memory.program(), &[5, 6]);
    }

    #[test]
    fn allocation_over_limit_fails_cleanly() {
        let mut memory = Memory::new(vec![]).with_max_segment_words(1 << 20);
        assert_eq!(
            memory.allocate(Word::MAX),
            Err(MemoryError::AllocationFailed { capacity: Word::MAX })
        );
        assert_eq!(memory.live_segments(), 1);
        // Nothing was minted, so the next handle is still 1.
        assert_eq!(memory.allocate(1 << 20).unwrap(), 1);
    }

    #[test]
    fn failed_allocation_keeps_freed_handle_pooled() {
        let mut memory = Memory::new(vec![]).with_max_segment_words(8);
        let handle = memory.allocate(8).unwrap();
        memory.free(handle).unwrap();
        assert!(memory.allocate(9).is_err());
        assert_eq!(memory.allocate(2).unwrap(), handle);
    }

    #[test]
    fn live_segments_counts_program() {
        let mut memory = Memory::new(vec![]);
        assert_eq!(memory.live_segments(), 1);
        let a = memory.allocate(1).unwrap();
        memory.allocate(1).unwrap();
        assert_eq!(memory.live_segments(), 3);
        memory.free(a).unwrap();
        assert_eq!(memory.live_segments(), 2);
    }
}
