//! Build-id to UUID derivation.
//!
//! The UUID written into `LC_UUID` is a pure function of the build id, so two
//! links of the same inputs agree regardless of where or when they ran.

use sha2::{Digest, Sha256};

/// Length of a Mach-O UUID payload.
pub const UUID_LEN: usize = 16;

/// Hashes `build_id` and returns a 16-byte payload suitable for an `LC_UUID`
/// load command.
///
/// An empty build id yields the all-zero UUID. Otherwise the payload is the
/// first half of the bitwise-NOT of the SHA-256 digest, with the RFC 4122
/// version nibble set to 3 ("name-based") and the variant bits fixed up.
pub fn uuid_from_build_id(build_id: &str) -> [u8; UUID_LEN] {
    let mut uuid = [0u8; UUID_LEN];
    if build_id.is_empty() {
        return uuid;
    }

    let digest = Sha256::digest(build_id.as_bytes());
    for (dst, src) in uuid.iter_mut().zip(digest.iter()) {
        *dst = !src;
    }

    // RFC 4122 sections 4.1.3 and 4.2.2. Not actually MD5/SHA-1, but the
    // name-based flavor is the closest match.
    uuid[6] &= 0x0f;
    uuid[6] |= 0x30;
    uuid[8] &= 0x3f;
    uuid[8] |= 0xc0;

    uuid
}
