use crate::areas::repository::Repository;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::{Commit, commit_timestamp};
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::GitletError;

impl Repository {
    pub fn commit(&mut self, message: &str) -> anyhow::Result<()> {
        self.rehydrate()?;

        if self.index().is_empty() {
            return Err(GitletError::EmptyStagingArea.into());
        }
        if message.is_empty() {
            return Err(GitletError::InvalidMessage.into());
        }

        let head_oid = self.head_oid()?;
        self.write_commit(vec![head_oid], message.to_string())?;

        self.persist()
    }

    /// Fold the staging area into a new child of the head commit
    ///
    /// Blobs and the commit are stored before the current branch is advanced
    /// and the staging area cleared; both are only persisted by the caller.
    pub(crate) fn write_commit(
        &mut self,
        parents: Vec<ObjectId>,
        message: String,
    ) -> anyhow::Result<ObjectId> {
        let mut snapshot = self.head_commit()?.snapshot();

        for (name, content) in self.index().additions() {
            let blob_oid = self.database().store(&Blob::new(content.clone()))?;
            snapshot.insert(name.clone(), blob_oid);
        }
        for name in self.index().removals() {
            snapshot.remove(name);
        }

        let commit = Commit::new(message, parents, commit_timestamp(), snapshot)?;
        let commit_oid = self.database().store(&commit)?;

        self.index_mut().clear();
        self.refs_mut().update_head(commit_oid.clone());

        Ok(commit_oid)
    }
}
