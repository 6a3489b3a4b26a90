//! Core repository components
//!
//! - `database`: Content-addressed object store for blobs and commits
//! - `index`: Staging area for pending additions and removals
//! - `refs`: Branch registry and the current branch
//! - `repository`: Repository state shared by all commands
//! - `workspace`: Working directory file system operations

pub mod database;
pub mod index;
pub mod refs;
pub mod repository;
pub mod workspace;
