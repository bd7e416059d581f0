//! The single-volume file store: composes the file table, chain table
//! and free map over a block device.

use std::sync::Arc;

use crate::bitmap::{FreeMap, release_chain};
use crate::block_dev::BlockDevice;
use crate::chain::ChainTable;
use crate::config::{BLOCK_SIZE, MAX_BLOCKS, NO_BLOCK};
use crate::error::{FsError, Result};
use crate::ftable::FileTable;
use crate::meta;

/// One mounted volume. Methods do no locking of their own; wrap an
/// instance in [`crate::FsManager`] (or a lock of your choosing) before
/// sharing it across threads.
pub struct FileSystem<D: BlockDevice> {
    device: Arc<D>,
    ftable: FileTable,
    chains: ChainTable,
    freemap: FreeMap,
}

impl<D: BlockDevice> FileSystem<D> {
    /// Mounts the volume, loading existing metadata or formatting the
    /// volume if its metadata block is still all zeroes.
    pub fn mount(device: Arc<D>) -> Result<Self> {
        if device.num_blocks() != MAX_BLOCKS || device.block_size() != BLOCK_SIZE {
            return Err(FsError::InvalidVolume);
        }
        let (ftable, chains, freemap) = meta::load_or_init(&*device)?;
        Ok(Self {
            device,
            ftable,
            chains,
            freemap,
        })
    }

    /// Creates an empty file. No blocks are allocated until a write.
    pub fn create_file(&mut self, name: &str) -> Result<()> {
        self.ftable.create(name)?;
        self.save()
    }

    /// Replaces the full content of `name` with `content`.
    ///
    /// Capacity is validated before any state changes, counting the
    /// file's own chain as reclaimable, so an oversized write leaves
    /// the tables untouched.
    pub fn write_file(&mut self, name: &str, content: &[u8]) -> Result<()> {
        let slot = self.ftable.slot_of(name)?;
        let needed = content.len().div_ceil(BLOCK_SIZE);
        let old_head = self.ftable.entry(slot).first_block;
        let reclaimable = self.chains.len_from(old_head)?;
        if needed > self.freemap.free_count() + reclaimable {
            return Err(FsError::InsufficientSpace);
        }

        // Full-file overwrite: the old chain goes back to the free map
        // before fresh blocks are taken.
        release_chain(&*self.device, &mut self.freemap, &mut self.chains, old_head)?;
        {
            let entry = self.ftable.entry_mut(slot);
            entry.size = 0;
            entry.first_block = NO_BLOCK;
        }

        let blocks = self.freemap.allocate(needed)?;
        if let Err(err) = self.write_chain(&blocks, content) {
            log::warn!("write of '{name}' failed mid-chain, rolling back: {err}");
            for &b in &blocks {
                let _ = self.device.write_block(b, &[0u8; BLOCK_SIZE]);
                self.chains.unlink(b);
                self.freemap.set_free(b);
            }
            self.save()?;
            return Err(err);
        }

        let entry = self.ftable.entry_mut(slot);
        entry.size = content.len() as u16;
        entry.first_block = blocks.first().map(|&b| b as i16).unwrap_or(NO_BLOCK);
        self.save()
    }

    /// Writes `content` into `blocks` in order, a block-size chunk each
    /// (the last one short), and threads the chain links.
    fn write_chain(&mut self, blocks: &[usize], content: &[u8]) -> Result<()> {
        let mut buf = [0u8; BLOCK_SIZE];
        for (&block, chunk) in blocks.iter().zip(content.chunks(BLOCK_SIZE)) {
            buf.fill(0);
            buf[..chunk.len()].copy_from_slice(chunk);
            self.device.write_block(block, &buf)?;
        }
        for pair in blocks.windows(2) {
            self.chains.link(pair[0], pair[1])?;
        }
        // The last block's link is already NO_BLOCK: released and fresh
        // blocks alike carry the sentinel.
        Ok(())
    }

    /// Returns the full content of `name`, exactly `size` bytes.
    pub fn read_file(&self, name: &str) -> Result<Vec<u8>> {
        let entry = *self.ftable.find(name)?;
        if entry.size == 0 {
            return Ok(Vec::new());
        }
        let mut out = Vec::with_capacity(entry.size as usize);
        let mut buf = [0u8; BLOCK_SIZE];
        let mut remaining = entry.size as usize;
        let mut cursor = entry.first_block;
        while remaining > 0 {
            if !(1..MAX_BLOCKS as i16).contains(&cursor) {
                // Chain ended (or went astray) before `size` bytes.
                return Err(FsError::CorruptChain);
            }
            let block = cursor as usize;
            self.device.read_block(block, &mut buf)?;
            let take = remaining.min(BLOCK_SIZE);
            out.extend_from_slice(&buf[..take]);
            remaining -= take;
            cursor = self.chains.next_of(block)?;
        }
        Ok(out)
    }

    /// Removes `name`, returning its blocks (zeroed) to the free map.
    pub fn delete_file(&mut self, name: &str) -> Result<()> {
        let entry = self.ftable.remove(name)?;
        release_chain(
            &*self.device,
            &mut self.freemap,
            &mut self.chains,
            entry.first_block,
        )?;
        self.save()
    }

    /// Live filenames in table-slot order.
    pub fn list_files(&self) -> Vec<String> {
        self.ftable.list()
    }

    pub fn free_blocks(&self) -> usize {
        self.freemap.free_count()
    }

    pub fn device(&self) -> Arc<D> {
        Arc::clone(&self.device)
    }

    fn save(&mut self) -> Result<()> {
        meta::save(&*self.device, &self.ftable, &self.chains, &self.freemap)
    }
}
