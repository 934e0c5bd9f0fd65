use tracing::debug;

use crate::segmented::types::{Chunk, SegmentError};

/// What one chunk did to a [`ChunkAssembler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkOutcome {
    /// Filled an empty slot.
    Accepted,
    /// Slot was already filled; it now holds the latest data.
    Duplicate,
    /// Total changed, so the previous transfer was dropped first.
    Restarted,
    /// Every slot is filled.
    Complete,
}

/// Slot table for one ordered transfer.
#[derive(Debug, Default, Clone)]
pub struct ChunkAssembler {
    slots: Vec<Option<String>>,
    filled: usize,
}

impl ChunkAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.slots.clear();
        self.filled = 0;
    }

    /// `None` until the first chunk arrives.
    #[inline]
    pub fn total(&self) -> Option<usize> {
        (!self.slots.is_empty()).then_some(self.slots.len())
    }

    #[inline]
    pub fn received(&self) -> usize {
        self.filled
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        !self.slots.is_empty() && self.filled == self.slots.len()
    }

    pub fn progress(&self) -> f64 {
        match self.slots.len() {
            0 => 0.0,
            n => self.filled as f64 / n as f64,
        }
    }

    /// 1-based indexes not yet seen.
    pub fn missing(&self) -> Vec<usize> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_none())
            .map(|(i, _)| i + 1)
            .collect()
    }

    pub fn insert(&mut self, chunk: Chunk) -> Result<ChunkOutcome, SegmentError> {
        chunk.validate()?;

        let mut restarted = false;
        match self.total() {
            None => self.slots.resize(chunk.total, None),
            Some(total) if total != chunk.total => {
                debug!(old_total = total, new_total = chunk.total, "chunk total changed, restarting");
                self.reset();
                self.slots.resize(chunk.total, None);
                restarted = true;
            }
            Some(_) => {}
        }

        let slot = &mut self.slots[chunk.index - 1];
        let fresh = slot.is_none();
        *slot = Some(chunk.data);
        if fresh {
            self.filled += 1;
        }

        Ok(if self.is_complete() && fresh {
            ChunkOutcome::Complete
        } else if restarted {
            ChunkOutcome::Restarted
        } else if fresh {
            ChunkOutcome::Accepted
        } else {
            ChunkOutcome::Duplicate
        })
    }

    /// Concatenation in ascending index order, once complete.
    pub fn assemble(&self) -> Option<String> {
        if !self.is_complete() {
            return None;
        }
        Some(self.slots.iter().flatten().map(String::as_str).collect())
    }
}
