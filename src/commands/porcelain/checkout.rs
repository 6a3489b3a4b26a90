use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::branch::revision::Revision;
use crate::artifacts::checkout::conflict::ensure_no_untracked_files;
use crate::artifacts::checkout::migration::Migration;
use crate::artifacts::objects::commit::Commit;
use crate::errors::GitletError;

impl Repository {
    /// Switch to another branch, materializing its tip commit
    pub fn checkout_branch(&mut self, branch_name: &str) -> anyhow::Result<()> {
        self.rehydrate()?;

        let branch_name = BranchName::try_parse(branch_name.to_string())
            .map_err(|_| GitletError::NoSuchBranch(branch_name.to_string()))?;
        if !self.refs().exists(&branch_name) {
            return Err(GitletError::NoSuchBranch(branch_name.to_string()).into());
        }
        if self.refs().is_current_branch(&branch_name) {
            return Err(GitletError::AlreadyOnBranch(branch_name.to_string()).into());
        }

        let head = self.head_commit()?;
        let target = self
            .database()
            .load_commit(self.refs().read_ref(&branch_name)?)?;

        self.switch_to_commit(&head, &target)?;
        self.refs_mut().set_head(branch_name)?;

        self.persist()
    }

    /// Restore one file from head or from the given commit
    ///
    /// Neither the staging area nor any branch pointer changes.
    pub fn checkout_file(&mut self, revision: Option<&str>, file: &str) -> anyhow::Result<()> {
        self.rehydrate()?;

        let commit = match revision {
            Some(revision) => {
                let commit_oid = Revision::try_parse(revision)?.resolve(self.database())?;
                self.database().load_commit(&commit_oid)?
            }
            None => self.head_commit()?,
        };

        let blob_oid = commit
            .file_digest(file)
            .ok_or_else(|| GitletError::FileNotInCommit(file.to_string()))?;
        let content = self.database().load_blob(blob_oid)?;

        self.workspace().write_file(file, &content)
    }

    /// Make the working directory an exact copy of `target` and clear the staging area
    ///
    /// Refuses with `UntrackedFileConflict`, before touching any file, when a
    /// working file is not tracked by `head`.
    pub(crate) fn switch_to_commit(&mut self, head: &Commit, target: &Commit) -> anyhow::Result<()> {
        let working_files = self.workspace().list_files()?;
        ensure_no_untracked_files(&working_files, head)?;

        {
            let migration = Migration::plan(self.database(), &working_files, target);
            self.workspace().apply_migration(&migration)?;
        }

        self.index_mut().clear();

        Ok(())
    }
}
