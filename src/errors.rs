//! Domain errors
//!
//! Every user-facing failure of a command is one variant of [`GitletError`].
//! The `Display` text of each variant is the fixed message printed by the CLI,
//! so callers and tests can rely on both the variant (the stable kind) and the
//! wording.
//!
//! Lower level failures (I/O, decompression, malformed objects) travel as
//! `anyhow::Error` with context attached; domain errors are wrapped into
//! `anyhow::Error` as well and recovered with `downcast_ref::<GitletError>()`.

use crate::artifacts::objects::object_id::ObjectId;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GitletError {
    #[error("Not in an initialized Gitlet directory.")]
    NotInitialized,

    #[error("A Gitlet version-control system already exists in the current directory.")]
    AlreadyInitialized,

    #[error("File does not exist.")]
    FileNotFound(String),

    #[error("Please enter a commit message.")]
    InvalidMessage,

    #[error("No changes added to the commit.")]
    EmptyStagingArea,

    #[error("No reason to remove the file.")]
    NothingToRemove(String),

    #[error("No commit with that id exists.")]
    NoSuchCommit(String),

    #[error("Commit id {0} is ambiguous.")]
    AmbiguousCommitId(String),

    #[error("File does not exist in that commit.")]
    FileNotInCommit(String),

    #[error("No such branch exists.")]
    NoSuchBranch(String),

    #[error("No need to checkout the current branch.")]
    AlreadyOnBranch(String),

    #[error("A branch with that name already exists.")]
    BranchAlreadyExists(String),

    #[error("A branch with that name does not exist.")]
    BranchNotFound(String),

    #[error("Cannot remove the current branch.")]
    CannotRemoveCurrentBranch(String),

    #[error("Invalid branch name: {0}")]
    InvalidBranchName(String),

    #[error("There is an untracked file in the way; delete it, or add and commit it first.")]
    UntrackedFileConflict(Vec<String>),

    #[error("You have uncommitted changes.")]
    UncommittedChanges,

    #[error("Cannot merge a branch with itself.")]
    MergeWithSelf,

    #[error("No common ancestor between {0} and {1}.")]
    NoCommonAncestor(ObjectId, ObjectId),

    #[error("Found no commit with that message.")]
    NoCommitWithMessage,

    #[error("Object {0} not found in the object store.")]
    ObjectNotFound(ObjectId),

    #[error("Invalid object: {0}")]
    InvalidObject(String),
}

impl GitletError {
    /// Whether the failure points at repository corruption rather than user input
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            GitletError::ObjectNotFound(_) | GitletError::InvalidObject(_)
        )
    }
}
