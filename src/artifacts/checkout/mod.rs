//! Commit switching
//!
//! Moving the working directory from one commit to another happens in two
//! steps. First every precondition is checked (see [`conflict`]) and the file
//! system operations are planned (see [`migration`]); only then are they
//! applied to the workspace. A refused switch therefore never touches a file.

pub mod conflict;
pub mod migration;
