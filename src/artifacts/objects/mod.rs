//! Object types and operations
//!
//! All content is stored as objects identified by SHA-1 digests:
//!
//! - **Blob**: File content (raw bytes)
//! - **Commit**: Snapshot with metadata (message, timestamp, parent commits, tracked files)
//!
//! All objects implement serialization/deserialization for the framed format:
//! `<type> <size>\0<content>`

pub mod blob;
pub mod commit;
pub mod object;
pub mod object_id;
pub mod object_type;

/// Length of a SHA-1 hash in hexadecimal format
pub const OBJECT_ID_LENGTH: usize = 40;

/// Length of the abbreviated form printed for merge parents
pub const SHORT_OBJECT_ID_LENGTH: usize = 7;
