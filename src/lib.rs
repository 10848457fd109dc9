//! Deterministic `LC_UUID` rewriting for linked Mach-O images.
//!
//! An external linker stamps its own UUID into the image it produces. This
//! library replaces that value with one derived from a build id, so repeated
//! builds of the same inputs produce bit-identical binaries.
//! It is organized into several modules:
//! - `ident`: build-id to UUID derivation.
//! - `header`: Mach-O header summary (bitness, byte order, command count).
//! - `stream`: cursor over load command records.
//! - `rewrite`: copy-then-patch orchestration.
//! - `config`: CLI configuration.

pub mod config;
pub mod error;
pub mod header;
pub mod ident;
pub mod rewrite;
pub mod stream;

pub use error::{Error, Result};
pub use header::{HeaderKind, ImageHeader};
pub use ident::uuid_from_build_id;
pub use rewrite::{patch_uuid, read_uuid, rewrite_uuid};
pub use stream::{CommandHeader, RecordStream};
