//! Three-way merge
//!
//! - [`split_point`]: ancestry queries over the commit graph (reachability,
//!   ancestor checks, the split point used as merge base)
//! - [`policy`]: per-file classification from the split, head and target digests
//! - [`conflict`]: synthesis of conflicted file contents
//!
//! ## Debug Logging
//!
//! Traversal and classification steps are traced to stderr when the crate is
//! built with the `debug_merge` feature:
//!
//! ```toml
//! [features]
//! debug_merge = []
//! ```

/// Macro for debug logging that is enabled with the debug_merge feature flag
///
/// # Usage
/// ```rust,ignore
/// debug_log!("Processing commit {}", commit_id);
/// ```
macro_rules! debug_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "debug_merge")]
        {
            eprintln!($($arg)*);
        }
    };
}

pub mod conflict;
pub mod policy;
pub mod split_point;
