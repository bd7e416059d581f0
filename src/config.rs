//! Fixed geometry of a pion volume.
//!
//! The whole volume is `MAX_BLOCKS * BLOCK_SIZE` bytes. Block 0 holds the
//! serialized metadata tables; file content lives in blocks 1..MAX_BLOCKS.

pub const BLOCK_SIZE: usize = 128;
pub const MAX_BLOCKS: usize = 10;
pub const MAX_FILES: usize = 5;
pub const MAX_NAME_LEN: usize = 11;

pub const META_BLOCK: usize = 0;
pub const VOLUME_SIZE: usize = MAX_BLOCKS * BLOCK_SIZE;

/// Sentinel for "no block": end of a chain, or the head of an empty file.
pub const NO_BLOCK: i16 = -1;

// Serialized metadata layout inside block 0. Fixed-width and position
// dependent: the file table, then the chain table, then the free map,
// then the volume marker in the last three bytes of the block.
pub const FENTRY_SIZE: usize = MAX_NAME_LEN + 2 + 2;
pub const FTABLE_OFFSET: usize = 0;
pub const CHAIN_OFFSET: usize = FTABLE_OFFSET + MAX_FILES * FENTRY_SIZE;
pub const FREEMAP_OFFSET: usize = CHAIN_OFFSET + MAX_BLOCKS * 4;
pub const MARKER_OFFSET: usize = FREEMAP_OFFSET + MAX_BLOCKS;

pub const MAGIC: u16 = 0xB10C;
pub const META_VERSION: u8 = 1;

const _: () = assert!(MARKER_OFFSET + 3 == BLOCK_SIZE);
