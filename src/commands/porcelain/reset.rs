use crate::areas::repository::Repository;
use crate::artifacts::branch::revision::Revision;

impl Repository {
    /// Move the current branch to any commit and materialize it
    pub fn reset(&mut self, revision: &str) -> anyhow::Result<()> {
        self.rehydrate()?;

        let target_oid = Revision::try_parse(revision)?.resolve(self.database())?;
        let target = self.database().load_commit(&target_oid)?;
        let head = self.head_commit()?;

        self.switch_to_commit(&head, &target)?;
        self.refs_mut().update_head(target_oid);

        self.persist()
    }
}
