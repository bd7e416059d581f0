//! Free-block accounting: one flag per block, `true` meaning free.
//! Block 0 backs the metadata region and is never handed out.

use crate::block_dev::BlockDevice;
use crate::chain::ChainTable;
use crate::config::{BLOCK_SIZE, MAX_BLOCKS, META_BLOCK, NO_BLOCK};
use crate::error::{FsError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FreeMap {
    free: [bool; MAX_BLOCKS],
}

impl FreeMap {
    /// A fresh map: every block free except the metadata block.
    pub fn new() -> Self {
        let mut free = [true; MAX_BLOCKS];
        free[META_BLOCK] = false;
        Self { free }
    }

    /// Rebuilds a map from persisted flags. The metadata block marked
    /// free can only mean a mangled volume.
    pub(crate) fn from_flags(free: [bool; MAX_BLOCKS]) -> Result<Self> {
        if free[META_BLOCK] {
            return Err(FsError::InvalidVolume);
        }
        Ok(Self { free })
    }

    pub fn is_free(&self, block: usize) -> bool {
        block < MAX_BLOCKS && self.free[block]
    }

    pub fn free_count(&self) -> usize {
        self.free.iter().filter(|&&f| f).count()
    }

    pub(crate) fn flags(&self) -> &[bool; MAX_BLOCKS] {
        &self.free
    }

    /// First-fit scan for `n` free blocks, returned in increasing index
    /// order. Never partially allocates: either all `n` are reserved or
    /// the map is left untouched.
    pub fn allocate(&mut self, n: usize) -> Result<Vec<usize>> {
        let picked: Vec<usize> = (0..MAX_BLOCKS).filter(|&b| self.free[b]).take(n).collect();
        if picked.len() < n {
            return Err(FsError::InsufficientSpace);
        }
        for &b in &picked {
            self.free[b] = false;
        }
        Ok(picked)
    }

    pub(crate) fn set_free(&mut self, block: usize) {
        if block < MAX_BLOCKS && block != META_BLOCK {
            self.free[block] = true;
        }
    }
}

impl Default for FreeMap {
    fn default() -> Self {
        Self::new()
    }
}

/// Walks the chain starting at `head`, returning each visited block to
/// the free map, zeroing its on-store content and resetting its chain
/// link. A head of `NO_BLOCK` is a no-op.
pub fn release_chain(
    device: &impl BlockDevice,
    freemap: &mut FreeMap,
    chains: &mut ChainTable,
    head: i16,
) -> Result<()> {
    let zero = [0u8; BLOCK_SIZE];
    let mut cursor = head;
    let mut visited = 0;
    while cursor != NO_BLOCK {
        if !(0..MAX_BLOCKS as i16).contains(&cursor)
            || cursor as usize == META_BLOCK
            || visited >= MAX_BLOCKS
        {
            return Err(FsError::CorruptChain);
        }
        let block = cursor as usize;
        cursor = chains.next_of(block)?;
        device.write_block(block, &zero)?;
        chains.unlink(block);
        freemap.set_free(block);
        visited += 1;
    }
    Ok(())
}
