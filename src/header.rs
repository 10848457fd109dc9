//! Mach-O file header summary.
//!
//! Only the leading header is parsed: enough to learn the image's bitness,
//! byte order and load command count. Everything past the header is walked
//! with [`crate::stream::RecordStream`].

use memmap2::Mmap;
use object::endian::U32;
use object::macho::{self, MachHeader32, MachHeader64};
use object::read::macho::MachHeader;
use object::Endianness;
use std::fs::File;
use std::mem;
use std::path::Path;

use crate::error::{Error, Result};

/// Header layout variant, selected once from the magic value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderKind {
    /// `mach_header`
    Mach32,
    /// `mach_header_64`, which carries a trailing reserved word.
    Mach64,
}

impl HeaderKind {
    /// Classifies a magic value read as big-endian from offset 0.
    pub fn from_magic(magic: u32) -> Option<Self> {
        match magic {
            macho::MH_MAGIC | macho::MH_CIGAM => Some(HeaderKind::Mach32),
            macho::MH_MAGIC_64 | macho::MH_CIGAM_64 => Some(HeaderKind::Mach64),
            _ => None,
        }
    }

    /// File offset of the first load command.
    pub fn command_offset(self) -> u64 {
        let mut offset = mem::size_of::<MachHeader32<Endianness>>();
        if self == HeaderKind::Mach64 {
            offset += mem::size_of::<U32<Endianness>>();
        }
        offset as u64
    }
}

/// The parsed fields of a Mach-O header that the rewriter needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageHeader {
    pub kind: HeaderKind,
    pub endian: Endianness,
    pub cputype: u32,
    pub filetype: u32,
    pub ncmds: u32,
    pub sizeofcmds: u32,
}

impl ImageHeader {
    /// Parses the header at the start of `data`.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let magic_bytes: [u8; 4] = data
            .get(..4)
            .and_then(|bytes| bytes.try_into().ok())
            .ok_or(Error::TruncatedRecord {
                offset: 0,
                needed: 4,
                available: data.len() as u64,
            })?;
        let magic = u32::from_be_bytes(magic_bytes);
        let kind = HeaderKind::from_magic(magic).ok_or(Error::InvalidMagic(magic))?;

        match kind {
            HeaderKind::Mach32 => {
                Self::from_header(kind, parse_fixed::<MachHeader32<Endianness>>(data)?)
            }
            HeaderKind::Mach64 => {
                Self::from_header(kind, parse_fixed::<MachHeader64<Endianness>>(data)?)
            }
        }
    }

    /// Memory-maps `path` and parses its header.
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|source| Error::FileOpen {
            path: path.to_path_buf(),
            source,
        })?;
        let mmap = unsafe { Mmap::map(&file)? };
        Self::parse(&mmap)
    }

    /// File offset of the first load command.
    pub fn command_offset(&self) -> u64 {
        self.kind.command_offset()
    }

    fn from_header<H>(kind: HeaderKind, header: &H) -> Result<Self>
    where
        H: MachHeader<Endian = Endianness>,
    {
        let endian = header
            .endian()
            .map_err(|_| Error::InvalidMagic(header.magic()))?;
        Ok(Self {
            kind,
            endian,
            cputype: header.cputype(endian),
            filetype: header.filetype(endian),
            ncmds: header.ncmds(endian),
            sizeofcmds: header.sizeofcmds(endian),
        })
    }
}

fn parse_fixed<H: MachHeader>(data: &[u8]) -> Result<&H> {
    H::parse(data, 0).map_err(|_| Error::TruncatedRecord {
        offset: 0,
        needed: mem::size_of::<H>(),
        available: data.len() as u64,
    })
}
