//! Pion is a tiny single-volume file store served over a line-oriented
//! TCP protocol. No directories, no permissions, no timestamps; every
//! write replaces the full file content.
//!
//! Volume layout:
//! - Block 0: metadata region (file table, chain table, free map, marker)
//! - Blocks 1..MAX_BLOCKS: file content, threaded into per-file chains
//!
//! Pion's layers (from bottom to top):
//! 1. Block device: fixed-size randomly-addressable blocks.    | FileDisk provided, trait open to users
//! 2. Tables: free map, block-chain table, file table.         | Plain in-memory state
//! 3. Metadata persistence: whole-table save/load in block 0.  | Rewritten on every mutation
//! 4. FileSystem: create/write/read/delete/list orchestration. | No locking of its own
//! 5. FsManager: reader/writer lock, one instance per process. | The entry point for callers
//! 6. Line protocol: CREATE/LIST/WRITE/READ/DELETE/QUIT.       | Served by the pion binary

mod bitmap;
mod block_dev;
mod chain;
mod config;
mod disk;
mod error;
mod fs;
mod ftable;
mod manager;
mod meta;
mod server;

pub use bitmap::{FreeMap, release_chain};
pub use block_dev::BlockDevice;
pub use chain::ChainTable;
pub use config::*;
pub use disk::FileDisk;
pub use error::FsError as Error;
pub use error::{FsError, Result};
pub use fs::FileSystem;
pub use ftable::{FEntry, FileTable};
pub use manager::FsManager;
pub use server::{Reply, handle_line};
