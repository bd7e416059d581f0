//! The process-wide manager: one mounted volume behind a reader/writer
//! lock. List and read take the shared lock; create, write and delete
//! take the exclusive lock. The whole table set is one critical section.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::block_dev::BlockDevice;
use crate::config::{BLOCK_SIZE, MAX_BLOCKS};
use crate::disk::FileDisk;
use crate::error::{FsError, Result};
use crate::fs::FileSystem;

static INSTANCE_LIVE: AtomicBool = AtomicBool::new(false);

/// At most one manager may be live per process; a second construction
/// fails with `AlreadyInitialized` until the first is dropped.
pub struct FsManager<D: BlockDevice> {
    inner: RwLock<FileSystem<D>>,
}

impl FsManager<FileDisk> {
    /// Opens (creating if needed) the backing volume file and mounts it.
    /// `total_size` must match the fixed volume geometry.
    pub fn open(path: &Path, total_size: usize) -> Result<Self> {
        if total_size != MAX_BLOCKS * BLOCK_SIZE {
            return Err(FsError::InvalidVolume);
        }
        let disk = FileDisk::open(path, total_size)?;
        Self::with_device(Arc::new(disk))
    }
}

impl<D: BlockDevice> FsManager<D> {
    /// Mounts an already constructed block device. Mainly for tests and
    /// embedders that bring their own device.
    pub fn with_device(device: Arc<D>) -> Result<Self> {
        claim_instance()?;
        match FileSystem::mount(device) {
            Ok(fs) => Ok(Self {
                inner: RwLock::new(fs),
            }),
            Err(err) => {
                release_instance();
                Err(err)
            }
        }
    }

    pub fn create_file(&self, name: &str) -> Result<()> {
        self.write_guard().create_file(name)
    }

    pub fn write_file(&self, name: &str, content: &[u8]) -> Result<()> {
        self.write_guard().write_file(name, content)
    }

    pub fn read_file(&self, name: &str) -> Result<Vec<u8>> {
        self.read_guard().read_file(name)
    }

    pub fn delete_file(&self, name: &str) -> Result<()> {
        self.write_guard().delete_file(name)
    }

    pub fn list_files(&self) -> Vec<String> {
        self.read_guard().list_files()
    }

    pub fn free_blocks(&self) -> usize {
        self.read_guard().free_blocks()
    }

    // A poisoned lock means a panic elsewhere, not a broken table set;
    // keep serving rather than propagating the panic.
    fn read_guard(&self) -> RwLockReadGuard<'_, FileSystem<D>> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_guard(&self) -> RwLockWriteGuard<'_, FileSystem<D>> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl<D: BlockDevice> Drop for FsManager<D> {
    fn drop(&mut self) {
        release_instance();
    }
}

fn claim_instance() -> Result<()> {
    if INSTANCE_LIVE
        .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
        .is_err()
    {
        return Err(FsError::AlreadyInitialized);
    }
    Ok(())
}

fn release_instance() {
    INSTANCE_LIVE.store(false, Ordering::Release);
}
