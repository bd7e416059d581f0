//! The block-chain table: one node per physical block, each holding the
//! index of its successor in whatever file chain currently owns it.
//! A block that belongs to no chain has its link set to `NO_BLOCK`.

use crate::config::{MAX_BLOCKS, NO_BLOCK};
use crate::error::{FsError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainTable {
    next: [i16; MAX_BLOCKS],
}

impl ChainTable {
    /// A fresh table: no block chained to any other.
    pub fn new() -> Self {
        Self {
            next: [NO_BLOCK; MAX_BLOCKS],
        }
    }

    /// Rebuilds a table from persisted links. A link must name a content
    /// block or the end-of-chain sentinel; the metadata block is never
    /// part of a chain.
    pub(crate) fn from_links(next: [i16; MAX_BLOCKS]) -> Result<Self> {
        for link in next {
            if link != NO_BLOCK && !(1..MAX_BLOCKS as i16).contains(&link) {
                return Err(FsError::InvalidVolume);
            }
        }
        Ok(Self { next })
    }

    /// Threads `next` after `block` in a chain.
    pub fn link(&mut self, block: usize, next: usize) -> Result<()> {
        if block >= MAX_BLOCKS || next >= MAX_BLOCKS {
            return Err(FsError::OutOfBounds);
        }
        self.next[block] = next as i16;
        Ok(())
    }

    /// Makes `block` the end of its chain (or a free-standing block).
    pub fn unlink(&mut self, block: usize) {
        if block < MAX_BLOCKS {
            self.next[block] = NO_BLOCK;
        }
    }

    pub fn next_of(&self, block: usize) -> Result<i16> {
        if block >= MAX_BLOCKS {
            return Err(FsError::OutOfBounds);
        }
        Ok(self.next[block])
    }

    pub(crate) fn links(&self) -> &[i16; MAX_BLOCKS] {
        &self.next
    }

    /// Counts the blocks in the chain starting at `head`. An in-range
    /// walk longer than the volume can only mean a cycle.
    pub fn len_from(&self, head: i16) -> Result<usize> {
        let mut cursor = head;
        let mut len = 0;
        while cursor != NO_BLOCK {
            if !(0..MAX_BLOCKS as i16).contains(&cursor) || len >= MAX_BLOCKS {
                return Err(FsError::CorruptChain);
            }
            len += 1;
            cursor = self.next[cursor as usize];
        }
        Ok(len)
    }
}
