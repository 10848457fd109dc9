//! Synthetic Mach-O images for integration tests.

use object::endian::{BigEndian, U32};
use object::macho::{self, LoadCommand, MachHeader32, MachHeader64, UuidCommand};
use object::pod::bytes_of;
use object::Endianness;

pub struct ImageBuilder {
    endian: Endianness,
    is_64: bool,
    commands: Vec<Vec<u8>>,
    trailer: Vec<u8>,
}

impl ImageBuilder {
    pub fn new(endian: Endianness, is_64: bool) -> Self {
        Self {
            endian,
            is_64,
            commands: Vec::new(),
            trailer: Vec::new(),
        }
    }

    /// Appends an opaque command of `cmdsize` bytes, padded with `fill`.
    pub fn command(mut self, cmd: u32, cmdsize: u32, fill: u8) -> Self {
        let mut bytes = bytes_of(&LoadCommand {
            cmd: U32::new(self.endian, cmd),
            cmdsize: U32::new(self.endian, cmdsize),
        })
        .to_vec();
        bytes.resize(cmdsize as usize, fill);
        self.commands.push(bytes);
        self
    }

    pub fn uuid(mut self, uuid: [u8; 16]) -> Self {
        let cmd = UuidCommand {
            cmd: U32::new(self.endian, macho::LC_UUID),
            cmdsize: U32::new(self.endian, 24),
            uuid,
        };
        self.commands.push(bytes_of(&cmd).to_vec());
        self
    }

    /// Bytes appended after the load commands, standing in for segment data.
    pub fn trailer(mut self, bytes: &[u8]) -> Self {
        self.trailer.extend_from_slice(bytes);
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let e = self.endian;
        let ncmds = self.commands.len() as u32;
        let sizeofcmds = self.commands.iter().map(Vec::len).sum::<usize>() as u32;
        let magic = match (self.is_64, e) {
            (true, Endianness::Big) => macho::MH_MAGIC_64,
            (true, Endianness::Little) => macho::MH_CIGAM_64,
            (false, Endianness::Big) => macho::MH_MAGIC,
            (false, Endianness::Little) => macho::MH_CIGAM,
        };

        let mut buffer = if self.is_64 {
            bytes_of(&MachHeader64 {
                magic: U32::new(BigEndian, magic),
                cputype: U32::new(e, macho::CPU_TYPE_ARM64),
                cpusubtype: U32::new(e, 0),
                filetype: U32::new(e, macho::MH_EXECUTE),
                ncmds: U32::new(e, ncmds),
                sizeofcmds: U32::new(e, sizeofcmds),
                flags: U32::new(e, macho::MH_PIE),
                reserved: U32::new(e, 0),
            })
            .to_vec()
        } else {
            bytes_of(&MachHeader32 {
                magic: U32::new(BigEndian, magic),
                cputype: U32::new(e, macho::CPU_TYPE_X86),
                cpusubtype: U32::new(e, 0),
                filetype: U32::new(e, macho::MH_EXECUTE),
                ncmds: U32::new(e, ncmds),
                sizeofcmds: U32::new(e, sizeofcmds),
                flags: U32::new(e, 0),
            })
            .to_vec()
        };
        for cmd in &self.commands {
            buffer.extend_from_slice(cmd);
        }
        buffer.extend_from_slice(&self.trailer);
        buffer
    }
}
