//! Working tree status inspection
//!
//! Compares the working directory against the staging area and the head commit.
//!
//! ## Components
//!
//! - `file_change`: per-file presence flags and the change kinds reported to the user
//! - `status_info`: classification of every known file into the status sections

pub mod file_change;
pub mod status_info;
