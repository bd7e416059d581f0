#![allow(unused)]

mod common;

use std::sync::Arc;

use common::RamDisk;
use pion::{
    BLOCK_SIZE, BlockDevice, CHAIN_OFFSET, Error, FREEMAP_OFFSET, FileSystem, MAGIC, MARKER_OFFSET,
    MAX_BLOCKS, MAX_NAME_LEN, META_VERSION, NO_BLOCK,
};
use rand::RngCore;

fn meta_block(device: &RamDisk) -> [u8; BLOCK_SIZE] {
    let mut buf = [0u8; BLOCK_SIZE];
    device.read_block(0, &mut buf).unwrap();
    buf
}

#[test]
fn remount_reproduces_state() {
    let rd = Arc::new(RamDisk::new());
    let mut data = vec![0u8; 300];
    rand::thread_rng().fill_bytes(&mut data);

    {
        let mut fs = FileSystem::mount(Arc::clone(&rd)).unwrap();
        fs.create_file("a").unwrap();
        fs.create_file("b").unwrap();
        fs.write_file("a", &data).unwrap();
    }

    // No operation is replayed: the second mount only reads block 0.
    let mut fs = FileSystem::mount(Arc::clone(&rd)).unwrap();
    log!("remounted, files: {:?}", fs.list_files());
    assert_eq!(fs.list_files(), vec!["a", "b"]);
    assert_eq!(fs.read_file("a").unwrap(), data);
    assert_eq!(fs.read_file("b").unwrap(), Vec::<u8>::new());
    assert_eq!(fs.free_blocks(), MAX_BLOCKS - 1 - 3);

    // The remounted volume keeps working.
    fs.write_file("b", b"hello").unwrap();
    assert_eq!(fs.read_file("b").unwrap(), b"hello");
}

#[test]
fn fresh_volume_gets_formatted() {
    let rd = Arc::new(RamDisk::new());
    let fs = FileSystem::mount(Arc::clone(&rd)).unwrap();
    assert!(fs.list_files().is_empty());
    assert_eq!(fs.free_blocks(), MAX_BLOCKS - 1);

    let buf = meta_block(&rd);
    assert_eq!(
        u16::from_le_bytes([buf[MARKER_OFFSET], buf[MARKER_OFFSET + 1]]),
        MAGIC
    );
    assert_eq!(buf[MARKER_OFFSET + 2], META_VERSION);
    // Block 0 reserved, all others free.
    assert_eq!(buf[FREEMAP_OFFSET], 0);
    for i in 1..MAX_BLOCKS {
        assert_eq!(buf[FREEMAP_OFFSET + i], 1);
    }
}

#[test]
fn metadata_layout_matches_contract() {
    let rd = Arc::new(RamDisk::new());
    let mut fs = FileSystem::mount(Arc::clone(&rd)).unwrap();
    fs.create_file("log").unwrap();
    fs.write_file("log", &[0x42u8; 200]).unwrap(); // blocks 1 and 2

    let buf = meta_block(&rd);

    // Slot 0: zero-padded name, little-endian size, first block.
    assert_eq!(&buf[0..3], b"log");
    assert!(buf[3..MAX_NAME_LEN].iter().all(|&b| b == 0));
    assert_eq!(u16::from_le_bytes([buf[11], buf[12]]), 200);
    assert_eq!(i16::from_le_bytes([buf[13], buf[14]]), 1);

    // Chain: block 1 -> block 2 -> end, each link a 4-byte value.
    let link = |i: usize| {
        let off = CHAIN_OFFSET + i * 4;
        i32::from_le_bytes([buf[off], buf[off + 1], buf[off + 2], buf[off + 3]])
    };
    assert_eq!(link(1), 2);
    assert_eq!(link(2), -1);
    assert_eq!(link(3), -1);

    // Free flags: blocks 1 and 2 taken.
    assert_eq!(buf[FREEMAP_OFFSET + 1], 0);
    assert_eq!(buf[FREEMAP_OFFSET + 2], 0);
    assert_eq!(buf[FREEMAP_OFFSET + 3], 1);
}

#[test]
fn empty_slot_encoding() {
    let rd = Arc::new(RamDisk::new());
    let mut fs = FileSystem::mount(Arc::clone(&rd)).unwrap();
    fs.create_file("gone").unwrap();
    fs.delete_file("gone").unwrap();

    let buf = meta_block(&rd);
    // Cleared slot: blank name, size 0, first block -1.
    assert!(buf[0..MAX_NAME_LEN + 2].iter().all(|&b| b == 0));
    assert_eq!(i16::from_le_bytes([buf[13], buf[14]]), NO_BLOCK);
}

#[test]
fn garbage_metadata_rejected() {
    // Nonzero block 0 without the marker was not written by us.
    let rd = Arc::new(RamDisk::with_meta_filled(0xAB));
    assert!(matches!(
        FileSystem::mount(rd),
        Err(Error::InvalidVolume)
    ));
}

#[test]
fn deleted_content_is_zeroed_on_store() {
    let rd = Arc::new(RamDisk::new());
    let mut fs = FileSystem::mount(Arc::clone(&rd)).unwrap();
    fs.create_file("secret").unwrap();
    fs.write_file("secret", &[0x5Au8; 256]).unwrap();
    fs.delete_file("secret").unwrap();

    let mut buf = [0u8; BLOCK_SIZE];
    for block in 1..MAX_BLOCKS {
        rd.read_block(block, &mut buf).unwrap();
        assert!(buf.iter().all(|&b| b == 0), "block {} not zeroed", block);
    }
}
