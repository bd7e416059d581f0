//! Common utilities for tests

use std::sync::Mutex;

use pion::{BLOCK_SIZE, BlockDevice, Error, MAX_BLOCKS, Result};

pub const ORANGE: &str = "\x1b[38;5;214m";
pub const RESET: &str = "\x1b[0m";

/// Provides a macro for logging messages during tests.
/// e.g. log!("placeholder") -> println!("[test] placeholder");
#[macro_export]
macro_rules! log {
    ($msg:expr, $($arg:tt)*) => {
        println!("{}[test] {}{}", crate::common::ORANGE, format!($msg, $($arg)*), crate::common::RESET)
    };
    ($msg:expr) => {
        println!("{}[test] {}{}", crate::common::ORANGE, $msg, crate::common::RESET)
    };
}

/// An in-memory volume with the fixed pion geometry.
pub struct RamDisk {
    blocks: Mutex<Vec<[u8; BLOCK_SIZE]>>,
}

impl RamDisk {
    pub fn new() -> Self {
        Self {
            blocks: Mutex::new(vec![[0u8; BLOCK_SIZE]; MAX_BLOCKS]),
        }
    }

    /// A disk whose metadata block is pre-filled with `byte`.
    pub fn with_meta_filled(byte: u8) -> Self {
        let disk = Self::new();
        disk.blocks.lock().unwrap()[0] = [byte; BLOCK_SIZE];
        disk
    }
}

impl BlockDevice for RamDisk {
    fn num_blocks(&self) -> usize {
        MAX_BLOCKS
    }

    fn read_block(&self, block_id: usize, buf: &mut [u8]) -> Result<()> {
        if block_id >= MAX_BLOCKS || buf.len() != BLOCK_SIZE {
            return Err(Error::OutOfBounds);
        }
        buf.copy_from_slice(&self.blocks.lock().unwrap()[block_id]);
        Ok(())
    }

    fn write_block(&self, block_id: usize, buf: &[u8]) -> Result<()> {
        if block_id >= MAX_BLOCKS || buf.len() != BLOCK_SIZE {
            return Err(Error::OutOfBounds);
        }
        self.blocks.lock().unwrap()[block_id].copy_from_slice(buf);
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        Ok(())
    }
}
