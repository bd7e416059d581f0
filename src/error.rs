use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsError {
    DuplicateName,
    NotFound,
    TableFull,
    InsufficientSpace,
    CorruptChain,
    AlreadyInitialized,
    InvalidName,
    InvalidVolume,
    OutOfBounds,
    StoreIo(std::io::ErrorKind),
}

pub type Result<T> = core::result::Result<T, FsError>;

impl fmt::Display for FsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FsError::DuplicateName => write!(f, "File already exists."),
            FsError::NotFound => write!(f, "File not found."),
            FsError::TableFull => write!(f, "No free file entries available."),
            FsError::InsufficientSpace => write!(f, "Not enough free blocks."),
            FsError::CorruptChain => write!(f, "Block chain is corrupt."),
            FsError::AlreadyInitialized => {
                write!(f, "File system manager is already initialized.")
            }
            FsError::InvalidName => write!(f, "Invalid file name."),
            FsError::InvalidVolume => write!(f, "Not a valid volume."),
            FsError::OutOfBounds => write!(f, "Block index out of bounds."),
            FsError::StoreIo(kind) => write!(f, "Store I/O failure: {kind}."),
        }
    }
}

impl std::error::Error for FsError {}

impl From<std::io::Error> for FsError {
    fn from(err: std::io::Error) -> Self {
        FsError::StoreIo(err.kind())
    }
}
