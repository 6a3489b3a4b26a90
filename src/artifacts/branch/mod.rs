//! Branch names and commit references
//!
//! - [`branch_name`]: validated branch names
//! - [`revision`]: resolution of full or abbreviated commit IDs

pub mod branch_name;
pub mod revision;

/// Names matching this pattern are rejected (same rules as git ref names)
pub const INVALID_BRANCH_NAME_REGEX: &str =
    r"^\.|\/\.|\.\.|^\/|\/$|\.lock$|@\{|[\x00-\x20\*:\?\[\\~\^\x7f]";

/// Branch created by `init`
pub const DEFAULT_BRANCH: &str = "master";

/// Shortest abbreviation accepted for a commit ID
pub const MIN_COMMIT_PREFIX_LENGTH: usize = 4;
