//! Data structures and algorithms
//!
//! - `branch`: Branch names and commit ID resolution
//! - `checkout`: Commit switch planning and untracked-file safety checks
//! - `core`: Output handling (pager wrapper)
//! - `merge`: Ancestry engine, merge policy and conflict synthesis
//! - `objects`: Object types (blob, commit)
//! - `status`: Working tree status inspection

pub mod branch;
pub mod checkout;
pub mod core;
pub mod merge;
pub mod objects;
pub mod status;
