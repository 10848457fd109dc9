//! Load command cursor.
//!
//! `RecordStream` walks the self-describing load command records that follow
//! the Mach-O header. Each call to [`RecordStream::next`] decodes one
//! `load_command` header and advances by its declared `cmdsize`. The caller
//! inspects the tag and, if it cares about that record, reads or overwrites a
//! typed view of it with [`RecordStream::read_at`] / [`RecordStream::write_at`].
//!
//! Record payloads are `object::macho` Pod structs whose integer fields are
//! stored in the image's byte order, so a single `Endianness` value threads
//! through every decode and encode.

use object::endian::U32;
use object::macho::LoadCommand;
use object::pod::{bytes_of, bytes_of_mut, Pod};
use object::Endianness;
use std::io::{Read, Seek, SeekFrom, Write};
use std::mem;

use crate::error::{Error, Result};

/// Decoded `load_command` header, plus where it was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandHeader {
    /// The `LC_*` tag.
    pub cmd: u32,
    /// Total size of the record in bytes, header included.
    pub cmdsize: u32,
    /// Absolute file offset of the record.
    pub offset: u64,
}

/// A cursor over load command records in a seekable handle.
///
/// The handle's length is measured once on construction; no access ever
/// reaches past it, and the handle is never truncated or extended.
pub struct RecordStream<F> {
    handle: F,
    endian: Endianness,
    file_len: u64,
    next: u64,
    current: Option<CommandHeader>,
}

impl<F: Read + Seek> RecordStream<F> {
    /// Creates a cursor whose first record starts at `start`.
    pub fn new(mut handle: F, start: u64, endian: Endianness) -> Result<Self> {
        let file_len = handle.seek(SeekFrom::End(0))?;
        Ok(Self {
            handle,
            endian,
            file_len,
            next: start,
            current: None,
        })
    }

    /// The record most recently returned by [`RecordStream::next`].
    pub fn current(&self) -> Option<CommandHeader> {
        self.current
    }

    pub fn into_inner(self) -> F {
        self.handle
    }

    /// Reads the command header at the cursor and advances past the record.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Result<CommandHeader> {
        let offset = self.next;
        let mut raw = LoadCommand {
            cmd: U32::new(self.endian, 0),
            cmdsize: U32::new(self.endian, 0),
        };
        let needed = mem::size_of_val(&raw);
        if self.check_bounds(offset, needed).is_err() {
            return Err(Error::TruncatedRecord {
                offset,
                needed,
                available: self.file_len.saturating_sub(offset),
            });
        }
        self.read_exact_at(offset, bytes_of_mut(&mut raw))?;

        let header = CommandHeader {
            cmd: raw.cmd.get(self.endian),
            cmdsize: raw.cmdsize.get(self.endian),
            offset,
        };
        if (header.cmdsize as usize) < needed {
            return Err(Error::InvalidCommandSize {
                offset,
                cmdsize: header.cmdsize,
            });
        }

        self.next = offset + u64::from(header.cmdsize);
        self.current = Some(header);
        Ok(header)
    }

    /// Reads a `T` at `offset` bytes into the current record.
    ///
    /// Does not move the cursor.
    pub fn read_at<T: Pod>(&mut self, offset: u64, out: &mut T) -> Result<()> {
        let pos = self.locate(offset, mem::size_of::<T>())?;
        self.read_exact_at(pos, bytes_of_mut(out))
    }

    fn read_exact_at(&mut self, pos: u64, buf: &mut [u8]) -> Result<()> {
        self.handle
            .seek(SeekFrom::Start(pos))
            .and_then(|_| self.handle.read_exact(buf))
            .map_err(|source| Error::RecordIo {
                offset: pos,
                source,
            })
    }

    /// Resolves a record-relative access to an absolute file offset, checking
    /// it against both the record's `cmdsize` and the file's length.
    fn locate(&self, offset: u64, len: usize) -> Result<u64> {
        let record = self.current.ok_or(Error::NoCurrentRecord)?;
        match offset.checked_add(len as u64) {
            Some(end) if end <= u64::from(record.cmdsize) => {}
            _ => {
                return Err(Error::RecordOverrun {
                    offset,
                    len,
                    cmdsize: record.cmdsize,
                })
            }
        }
        let pos = record.offset + offset;
        self.check_bounds(pos, len)?;
        Ok(pos)
    }

    fn check_bounds(&self, offset: u64, len: usize) -> Result<()> {
        match offset.checked_add(len as u64) {
            Some(end) if end <= self.file_len => Ok(()),
            _ => Err(Error::OutOfBounds {
                offset,
                len,
                file_len: self.file_len,
            }),
        }
    }
}

impl<F: Read + Write + Seek> RecordStream<F> {
    /// Overwrites the bytes at `offset` into the current record with `value`.
    ///
    /// Does not move the cursor.
    pub fn write_at<T: Pod>(&mut self, offset: u64, value: &T) -> Result<()> {
        let pos = self.locate(offset, mem::size_of::<T>())?;
        self.handle
            .seek(SeekFrom::Start(pos))
            .and_then(|_| self.handle.write_all(bytes_of(value)))
            .map_err(|source| Error::RecordIo {
                offset: pos,
                source,
            })
    }
}
