//! Metadata persistence.
//!
//! Block 0 holds every table, serialized wholesale at fixed offsets:
//! MAX_FILES file entries (11-byte zero-padded name, u16 size, i16 first
//! block), then MAX_BLOCKS chain links (i16 widened to i32), then one
//! free flag per block, then a 3-byte marker (magic + layout version).
//! All integers little-endian. Every mutating operation rewrites the
//! whole block.

use crate::bitmap::FreeMap;
use crate::block_dev::BlockDevice;
use crate::chain::ChainTable;
use crate::config::*;
use crate::error::{FsError, Result};
use crate::ftable::{FEntry, FileTable};

/// Serializes all three tables into the metadata block and flushes.
pub fn save(
    device: &impl BlockDevice,
    ftable: &FileTable,
    chains: &ChainTable,
    freemap: &FreeMap,
) -> Result<()> {
    let mut buf = [0u8; BLOCK_SIZE];

    let mut off = FTABLE_OFFSET;
    for slot in ftable.slots() {
        match slot {
            Some(entry) => {
                buf[off..off + MAX_NAME_LEN].copy_from_slice(entry.raw_name());
                buf[off + MAX_NAME_LEN..off + MAX_NAME_LEN + 2]
                    .copy_from_slice(&entry.size.to_le_bytes());
                buf[off + MAX_NAME_LEN + 2..off + FENTRY_SIZE]
                    .copy_from_slice(&entry.first_block.to_le_bytes());
            }
            // Empty slot: blank name, size 0, no first block.
            None => {
                buf[off + MAX_NAME_LEN + 2..off + FENTRY_SIZE]
                    .copy_from_slice(&NO_BLOCK.to_le_bytes());
            }
        }
        off += FENTRY_SIZE;
    }

    for (i, &link) in chains.links().iter().enumerate() {
        let off = CHAIN_OFFSET + i * 4;
        buf[off..off + 4].copy_from_slice(&(link as i32).to_le_bytes());
    }

    for (i, &free) in freemap.flags().iter().enumerate() {
        buf[FREEMAP_OFFSET + i] = free as u8;
    }

    buf[MARKER_OFFSET..MARKER_OFFSET + 2].copy_from_slice(&MAGIC.to_le_bytes());
    buf[MARKER_OFFSET + 2] = META_VERSION;

    device.write_block(META_BLOCK, &buf)?;
    device.flush()
}

/// Inverse of [`save`]: reconstructs the tables from the metadata block.
pub fn load(device: &impl BlockDevice) -> Result<(FileTable, ChainTable, FreeMap)> {
    let mut buf = [0u8; BLOCK_SIZE];
    device.read_block(META_BLOCK, &mut buf)?;
    if !marker_present(&buf) {
        return Err(FsError::InvalidVolume);
    }
    parse(&buf)
}

/// Loads existing metadata if the volume marker is present, or formats
/// the volume if the metadata block is still all zeroes. A nonzero
/// block without the marker is not something we wrote; reject it.
pub fn load_or_init(device: &impl BlockDevice) -> Result<(FileTable, ChainTable, FreeMap)> {
    let mut buf = [0u8; BLOCK_SIZE];
    device.read_block(META_BLOCK, &mut buf)?;

    if marker_present(&buf) {
        log::debug!("volume marker found, loading metadata");
        return parse(&buf);
    }
    if buf.iter().all(|&b| b == 0) {
        log::info!("blank volume, formatting fresh metadata");
        let ftable = FileTable::new();
        let chains = ChainTable::new();
        let freemap = FreeMap::new();
        save(device, &ftable, &chains, &freemap)?;
        return Ok((ftable, chains, freemap));
    }
    Err(FsError::InvalidVolume)
}

fn marker_present(buf: &[u8; BLOCK_SIZE]) -> bool {
    let magic = u16::from_le_bytes([buf[MARKER_OFFSET], buf[MARKER_OFFSET + 1]]);
    magic == MAGIC && buf[MARKER_OFFSET + 2] == META_VERSION
}

fn parse(buf: &[u8; BLOCK_SIZE]) -> Result<(FileTable, ChainTable, FreeMap)> {
    let mut slots = [None; MAX_FILES];
    for (i, slot) in slots.iter_mut().enumerate() {
        let off = FTABLE_OFFSET + i * FENTRY_SIZE;
        let mut name = [0u8; MAX_NAME_LEN];
        name.copy_from_slice(&buf[off..off + MAX_NAME_LEN]);
        if name.iter().all(|&b| b == 0) {
            continue;
        }
        let size = u16::from_le_bytes([buf[off + MAX_NAME_LEN], buf[off + MAX_NAME_LEN + 1]]);
        let first_block =
            i16::from_le_bytes([buf[off + MAX_NAME_LEN + 2], buf[off + MAX_NAME_LEN + 3]]);
        *slot = Some(FEntry::from_raw(name, size, first_block)?);
    }

    let mut links = [NO_BLOCK; MAX_BLOCKS];
    for (i, link) in links.iter_mut().enumerate() {
        let off = CHAIN_OFFSET + i * 4;
        let wide = i32::from_le_bytes([buf[off], buf[off + 1], buf[off + 2], buf[off + 3]]);
        if wide != NO_BLOCK as i32 && !(0..MAX_BLOCKS as i32).contains(&wide) {
            return Err(FsError::InvalidVolume);
        }
        *link = wide as i16;
    }

    let mut flags = [false; MAX_BLOCKS];
    for (i, flag) in flags.iter_mut().enumerate() {
        *flag = buf[FREEMAP_OFFSET + i] != 0;
    }

    Ok((
        FileTable::from_slots(slots),
        ChainTable::from_links(links)?,
        FreeMap::from_flags(flags)?,
    ))
}
