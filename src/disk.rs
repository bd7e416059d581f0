//! File-backed block device. The file is the volume: `num_blocks`
//! blocks of `BLOCK_SIZE` bytes, addressed by seek.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use crate::block_dev::BlockDevice;
use crate::config::BLOCK_SIZE;
use crate::error::{FsError, Result};

pub struct FileDisk {
    inner: Mutex<File>,
    num_blocks: usize,
}

impl FileDisk {
    /// Opens the backing volume file, creating it zero-filled if absent.
    /// `total_size` must be a whole number of blocks; an existing file
    /// whose length differs from `total_size` is rejected.
    pub fn open(path: &Path, total_size: usize) -> Result<Self> {
        if total_size == 0 || total_size % BLOCK_SIZE != 0 {
            return Err(FsError::InvalidVolume);
        }
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(path)?;
        let len = file.metadata()?.len();
        if len == 0 {
            file.set_len(total_size as u64)?;
        } else if len != total_size as u64 {
            return Err(FsError::InvalidVolume);
        }
        Ok(Self {
            inner: Mutex::new(file),
            num_blocks: total_size / BLOCK_SIZE,
        })
    }

    fn lock(&self) -> MutexGuard<'_, File> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl BlockDevice for FileDisk {
    fn num_blocks(&self) -> usize {
        self.num_blocks
    }

    fn read_block(&self, block_id: usize, buf: &mut [u8]) -> Result<()> {
        if block_id >= self.num_blocks || buf.len() != BLOCK_SIZE {
            return Err(FsError::OutOfBounds);
        }
        let mut file = self.lock();
        file.seek(SeekFrom::Start((block_id * BLOCK_SIZE) as u64))?;
        file.read_exact(buf)?;
        Ok(())
    }

    fn write_block(&self, block_id: usize, buf: &[u8]) -> Result<()> {
        if block_id >= self.num_blocks || buf.len() != BLOCK_SIZE {
            return Err(FsError::OutOfBounds);
        }
        let mut file = self.lock();
        file.seek(SeekFrom::Start((block_id * BLOCK_SIZE) as u64))?;
        file.write_all(buf)?;
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        self.lock().flush()?;
        Ok(())
    }
}
