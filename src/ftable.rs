//! The file table: a fixed-capacity mapping from filename to inode
//! (byte size and first block of the content chain).

use crate::config::{MAX_BLOCKS, MAX_FILES, MAX_NAME_LEN, NO_BLOCK};
use crate::error::{FsError, Result};

/// One inode. The name is zero-padded to its fixed width; a valid name
/// is 1..=MAX_NAME_LEN bytes of UTF-8 with no NUL byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FEntry {
    name: [u8; MAX_NAME_LEN],
    pub size: u16,
    pub first_block: i16,
}

impl FEntry {
    pub fn new(name: &str) -> Result<Self> {
        let bytes = name.as_bytes();
        if bytes.is_empty() || bytes.len() > MAX_NAME_LEN || bytes.contains(&0) {
            return Err(FsError::InvalidName);
        }
        let mut padded = [0u8; MAX_NAME_LEN];
        padded[..bytes.len()].copy_from_slice(bytes);
        Ok(Self {
            name: padded,
            size: 0,
            first_block: NO_BLOCK,
        })
    }

    /// Rebuilds an entry from persisted fields, rejecting non-UTF-8
    /// names and out-of-range block references.
    pub(crate) fn from_raw(name: [u8; MAX_NAME_LEN], size: u16, first_block: i16) -> Result<Self> {
        if core::str::from_utf8(trim_zero(&name)).is_err() {
            return Err(FsError::InvalidVolume);
        }
        if first_block != NO_BLOCK && !(1..MAX_BLOCKS as i16).contains(&first_block) {
            return Err(FsError::InvalidVolume);
        }
        Ok(Self {
            name,
            size,
            first_block,
        })
    }

    pub fn name(&self) -> String {
        String::from_utf8_lossy(trim_zero(&self.name)).into_owned()
    }

    pub(crate) fn raw_name(&self) -> &[u8; MAX_NAME_LEN] {
        &self.name
    }

    fn matches(&self, name: &str) -> bool {
        trim_zero(&self.name) == name.as_bytes()
    }
}

fn trim_zero(name: &[u8]) -> &[u8] {
    let mut end = name.len();
    while end > 0 && name[end - 1] == 0 {
        end -= 1;
    }
    &name[..end]
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTable {
    slots: [Option<FEntry>; MAX_FILES],
}

impl FileTable {
    pub fn new() -> Self {
        Self {
            slots: [None; MAX_FILES],
        }
    }

    pub(crate) fn from_slots(slots: [Option<FEntry>; MAX_FILES]) -> Self {
        Self { slots }
    }

    /// Inserts a fresh empty-file entry into the first empty slot.
    pub fn create(&mut self, name: &str) -> Result<usize> {
        let entry = FEntry::new(name)?;
        if self.slots.iter().flatten().any(|e| e.matches(name)) {
            return Err(FsError::DuplicateName);
        }
        let slot = self
            .slots
            .iter()
            .position(|s| s.is_none())
            .ok_or(FsError::TableFull)?;
        self.slots[slot] = Some(entry);
        Ok(slot)
    }

    pub fn find(&self, name: &str) -> Result<&FEntry> {
        self.slots
            .iter()
            .flatten()
            .find(|e| e.matches(name))
            .ok_or(FsError::NotFound)
    }

    pub(crate) fn slot_of(&self, name: &str) -> Result<usize> {
        self.slots
            .iter()
            .position(|s| s.as_ref().is_some_and(|e| e.matches(name)))
            .ok_or(FsError::NotFound)
    }

    pub(crate) fn entry(&self, slot: usize) -> &FEntry {
        self.slots[slot].as_ref().expect("live slot")
    }

    pub(crate) fn entry_mut(&mut self, slot: usize) -> &mut FEntry {
        self.slots[slot].as_mut().expect("live slot")
    }

    /// Clears the slot holding `name`, returning the removed entry.
    /// Other slots are not compacted.
    pub fn remove(&mut self, name: &str) -> Result<FEntry> {
        let slot = self.slot_of(name)?;
        Ok(self.slots[slot].take().expect("live slot"))
    }

    /// Live filenames in table-slot order, not sorted.
    pub fn list(&self) -> Vec<String> {
        self.slots.iter().flatten().map(|e| e.name()).collect()
    }

    pub(crate) fn slots(&self) -> &[Option<FEntry>; MAX_FILES] {
        &self.slots
    }
}

impl Default for FileTable {
    fn default() -> Self {
        Self::new()
    }
}
