//! Command implementations
//!
//! Every user-facing command is an `impl Repository` block in its own file
//! under `porcelain`. Commands load the repository state they need, check all
//! preconditions, store new objects and only then persist the staging area and
//! branch registry.

pub mod porcelain;
