//! `LC_UUID` rewriting.
//!
//! Newer Apple linkers derive the `LC_UUID` payload from more than the linked
//! content (object timestamps and paths leak in), which breaks reproducible
//! builds. The functions here copy a linked image and replace that payload with
//! one derived from the build id.

use object::endian::U32;
use object::macho::{UuidCommand, LC_UUID};
use object::Endianness;
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, Write};
use std::path::Path;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::header::ImageHeader;
use crate::ident::{uuid_from_build_id, UUID_LEN};
use crate::stream::RecordStream;

/// Copies the image at `src` to `out`, replacing the `LC_UUID` payload with one
/// derived from `build_id`.
///
/// `out` is created (or truncated) with mode `0o755`. Returns the UUID that was
/// written, or `None` if the image has no `LC_UUID` command, in which case the
/// output is a verbatim copy. On error the output may be partially written;
/// it is not removed.
pub fn rewrite_uuid(
    src: &Path,
    header: &ImageHeader,
    out: &Path,
    build_id: &str,
) -> Result<Option<[u8; UUID_LEN]>> {
    let mut input = File::open(src).map_err(|source| Error::FileOpen {
        path: src.to_path_buf(),
        source,
    })?;
    let mut output = create_output(out)?;

    let copied = io::copy(&mut input, &mut output).map_err(|source| Error::Copy {
        src: src.to_path_buf(),
        out: out.to_path_buf(),
        source,
    })?;
    debug!("Copied {} bytes from {} to {}", copied, src.display(), out.display());

    patch_uuid(&mut output, header, build_id)
}

/// Scans the load commands of the image in `handle` and overwrites the first
/// `LC_UUID` payload in place. The handle's length never changes.
///
/// Only the first `LC_UUID` is patched; any later one is left as is.
pub fn patch_uuid<F: Read + Write + Seek>(
    handle: F,
    header: &ImageHeader,
    build_id: &str,
) -> Result<Option<[u8; UUID_LEN]>> {
    let endian = header.endian;
    let mut stream = RecordStream::new(handle, header.command_offset(), endian)?;

    for index in 0..header.ncmds {
        let cmd = stream.next()?;
        debug!(
            "Load command {}: cmd {:#x}, cmdsize {}, offset {:#x}",
            index, cmd.cmd, cmd.cmdsize, cmd.offset
        );
        if cmd.cmd != LC_UUID {
            continue;
        }

        let mut uuid_cmd = empty_uuid_command(endian);
        stream.read_at(0, &mut uuid_cmd)?;
        let previous = uuid_cmd.uuid;
        let uuid = uuid_from_build_id(build_id);
        uuid_cmd.uuid = uuid;
        stream.write_at(0, &uuid_cmd)?;

        info!(
            "Rewrote LC_UUID at offset {:#x}: {} -> {}",
            cmd.offset,
            Uuid::from_bytes(previous),
            Uuid::from_bytes(uuid)
        );
        return Ok(Some(uuid));
    }

    warn!("No LC_UUID among {} load commands; image left unchanged", header.ncmds);
    Ok(None)
}

/// Returns the payload of the first `LC_UUID` command, without modifying
/// anything.
pub fn read_uuid<F: Read + Seek>(
    handle: F,
    header: &ImageHeader,
) -> Result<Option<[u8; UUID_LEN]>> {
    let endian = header.endian;
    let mut stream = RecordStream::new(handle, header.command_offset(), endian)?;

    for _ in 0..header.ncmds {
        if stream.next()?.cmd == LC_UUID {
            let mut uuid_cmd = empty_uuid_command(endian);
            stream.read_at(0, &mut uuid_cmd)?;
            return Ok(Some(uuid_cmd.uuid));
        }
    }
    Ok(None)
}

fn empty_uuid_command(endian: Endianness) -> UuidCommand<Endianness> {
    UuidCommand {
        cmd: U32::new(endian, 0),
        cmdsize: U32::new(endian, 0),
        uuid: [0; UUID_LEN],
    }
}

fn create_output(path: &Path) -> Result<File> {
    let mut options = OpenOptions::new();
    options.read(true).write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o755);
    }

    let file = options.open(path).map_err(|source| Error::FileOpen {
        path: path.to_path_buf(),
        source,
    })?;

    // `mode` only applies when the file is created; fix up a truncated one.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(std::fs::Permissions::from_mode(0o755))
            .map_err(|source| Error::FileWrite {
                path: path.to_path_buf(),
                source,
            })?;
    }

    Ok(file)
}
