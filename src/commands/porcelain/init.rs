use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::commit::Commit;
use crate::errors::GitletError;
use anyhow::Context;
use std::fs;

impl Repository {
    pub fn init(&mut self) -> anyhow::Result<()> {
        if self.is_initialized() {
            return Err(GitletError::AlreadyInitialized.into());
        }

        fs::create_dir_all(self.database().objects_path())
            .context("Failed to create .gitlet/objects directory")?;
        self.index()
            .initialize()
            .context("Failed to create .gitlet/staging directory")?;

        let root_oid = self
            .database()
            .store(&Commit::root())
            .context("Failed to store the initial commit")?;

        self.refs_mut()
            .initialize(BranchName::default_branch(), root_oid);
        self.persist()
    }
}
