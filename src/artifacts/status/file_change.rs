use bitflags::bitflags;
use colored::Colorize;
use std::fmt;

bitflags! {
    /// Where a file name currently appears
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FileState: u8 {
        const NONE = 0b0000;
        /// Tracked by the head commit
        const IN_HEAD = 0b0001;
        /// Staged for addition
        const STAGED = 0b0010;
        /// Staged for removal
        const REMOVED = 0b0100;
        /// Present in the working directory
        const IN_WORKSPACE = 0b1000;
    }
}

/// A working file change that is not staged for commit
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum WorkspaceChangeType {
    Modified,
    Deleted,
}

impl From<&WorkspaceChangeType> for &str {
    fn from(change: &WorkspaceChangeType) -> Self {
        match change {
            WorkspaceChangeType::Modified => "modified",
            WorkspaceChangeType::Deleted => "deleted",
        }
    }
}

impl fmt::Display for WorkspaceChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label: &str = self.into();
        write!(f, " ({})", label.red())
    }
}
