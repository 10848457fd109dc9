//! Error types for the UUID rewriter.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while locating or patching the UUID load command.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to open file '{path}': {source}")]
    FileOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write output file '{path}': {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to copy '{src}' to '{out}': {source}")]
    Copy {
        src: PathBuf,
        out: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error at offset {offset:#x}: {source}")]
    RecordIo {
        offset: u64,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid Mach-O magic: {0:#x}")]
    InvalidMagic(u32),

    #[error("truncated record at offset {offset:#x}: need {needed} bytes, have {available}")]
    TruncatedRecord {
        offset: u64,
        needed: usize,
        available: u64,
    },

    #[error("access of {len} bytes at offset {offset:#x} exceeds file length {file_len:#x}")]
    OutOfBounds { offset: u64, len: usize, file_len: u64 },

    #[error("access of {len} bytes at record offset {offset:#x} overruns cmdsize {cmdsize}")]
    RecordOverrun { offset: u64, len: usize, cmdsize: u32 },

    #[error("load command at offset {offset:#x} declares invalid cmdsize {cmdsize}")]
    InvalidCommandSize { offset: u64, cmdsize: u32 },

    #[error("no load command has been read yet")]
    NoCurrentRecord,
}

/// A specialized Result type for rewrite operations.
pub type Result<T> = std::result::Result<T, Error>;
