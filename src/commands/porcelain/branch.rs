use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::errors::GitletError;

impl Repository {
    /// Create a branch pointing at the head commit; head stays where it is
    pub fn branch(&mut self, branch_name: &str) -> anyhow::Result<()> {
        self.rehydrate()?;

        let branch_name = BranchName::try_parse(branch_name.to_string())?;
        let source_oid = self.head_oid()?;
        self.refs_mut().create_branch(branch_name, source_oid)?;

        self.persist()
    }

    /// Delete a branch pointer, never the commits it pointed to
    pub fn rm_branch(&mut self, branch_name: &str) -> anyhow::Result<()> {
        self.rehydrate()?;

        let branch_name = BranchName::try_parse(branch_name.to_string())
            .map_err(|_| GitletError::BranchNotFound(branch_name.to_string()))?;
        self.refs_mut().delete_branch(&branch_name)?;

        self.persist()
    }
}
