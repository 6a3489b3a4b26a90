//! A small local version-control system
//!
//! - `areas`: persistent repository state (object store, staging area, branch
//!   registry, working directory)
//! - `artifacts`: domain types and algorithms (objects, branches, checkout,
//!   merge, status)
//! - `commands`: one method on [`areas::repository::Repository`] per command
//! - `errors`: the user-facing failure kinds

pub mod areas;
pub mod artifacts;
pub mod commands;
pub mod errors;
