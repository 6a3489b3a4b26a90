//! Porcelain commands (user-facing operations)
//!
//! ## Commands
//!
//! - `init`: Create a repository with its initial commit
//! - `add` / `rm`: Stage files for addition or removal
//! - `commit`: Record the staged changes
//! - `log` / `global-log`: Show commit history
//! - `find`: Look up commits by message
//! - `status`: Show branches, staged changes and working tree state
//! - `checkout`: Switch branches or restore files
//! - `branch` / `rm-branch`: Create or delete branches
//! - `reset`: Move the current branch to a commit
//! - `merge`: Three-way merge of another branch

pub mod add;
pub mod branch;
pub mod checkout;
pub mod commit;
pub mod find;
pub mod init;
pub mod log;
pub mod merge;
pub mod reset;
pub mod rm;
pub mod status;
