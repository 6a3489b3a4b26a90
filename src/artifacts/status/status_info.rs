use crate::areas::index::Index;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object::Object;
use crate::artifacts::status::file_change::{FileState, WorkspaceChangeType};
use bytes::Bytes;
use std::collections::{BTreeMap, BTreeSet};

pub type FileSet = BTreeSet<String>;
pub type ChangeSet = BTreeMap<String, WorkspaceChangeType>;

/// Content of the working files, keyed by name
pub type WorkingFiles = BTreeMap<String, Bytes>;

/// Files grouped into the sections printed by `status`, each sorted by name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusInfo {
    pub(crate) staged_files: FileSet,
    pub(crate) removed_files: FileSet,
    pub(crate) workspace_changeset: ChangeSet,
    pub(crate) untracked_files: FileSet,
}

impl StatusInfo {
    pub fn new(head: &Commit, index: &Index, working: &WorkingFiles) -> anyhow::Result<Self> {
        let mut status = StatusInfo {
            staged_files: index.additions().keys().cloned().collect(),
            removed_files: index.removals().clone(),
            ..Default::default()
        };

        let names = head
            .files()
            .into_iter()
            .chain(index.additions().keys().map(String::as_str))
            .chain(index.removals().iter().map(String::as_str))
            .chain(working.keys().map(String::as_str))
            .collect::<BTreeSet<_>>();

        for name in names {
            let state = Self::file_state(name, head, index, working);
            let content = working.get(name);

            if let Some(change) = Self::workspace_change(name, state, head, index, content)? {
                status.workspace_changeset.insert(name.to_string(), change);
            }

            if Self::is_untracked(state) {
                status.untracked_files.insert(name.to_string());
            }
        }

        Ok(status)
    }

    fn file_state(name: &str, head: &Commit, index: &Index, working: &WorkingFiles) -> FileState {
        let mut state = FileState::NONE;

        if head.has_file(name) {
            state |= FileState::IN_HEAD;
        }
        if index.staged_addition(name).is_some() {
            state |= FileState::STAGED;
        }
        if index.is_staged_for_removal(name) {
            state |= FileState::REMOVED;
        }
        if working.contains_key(name) {
            state |= FileState::IN_WORKSPACE;
        }

        state
    }

    fn workspace_change(
        name: &str,
        state: FileState,
        head: &Commit,
        index: &Index,
        content: Option<&Bytes>,
    ) -> anyhow::Result<Option<WorkspaceChangeType>> {
        if state.contains(FileState::STAGED) {
            return Ok(match (content, index.staged_addition(name)) {
                (None, _) => Some(WorkspaceChangeType::Deleted),
                (Some(content), Some(staged)) if content != staged => {
                    Some(WorkspaceChangeType::Modified)
                }
                _ => None,
            });
        }

        if !state.contains(FileState::IN_HEAD) || state.contains(FileState::REMOVED) {
            return Ok(None);
        }

        match content {
            None => Ok(Some(WorkspaceChangeType::Deleted)),
            Some(content) => {
                let oid = Blob::new(content.clone()).object_id()?;
                if head.file_digest(name) == Some(&oid) {
                    Ok(None)
                } else {
                    Ok(Some(WorkspaceChangeType::Modified))
                }
            }
        }
    }

    fn is_untracked(state: FileState) -> bool {
        state.contains(FileState::IN_WORKSPACE)
            && !state.contains(FileState::STAGED)
            && (!state.contains(FileState::IN_HEAD) || state.contains(FileState::REMOVED))
    }

    pub fn staged_files(&self) -> &FileSet {
        &self.staged_files
    }

    pub fn removed_files(&self) -> &FileSet {
        &self.removed_files
    }

    pub fn workspace_changeset(&self) -> &ChangeSet {
        &self.workspace_changeset
    }

    pub fn untracked_files(&self) -> &FileSet {
        &self.untracked_files
    }
}
