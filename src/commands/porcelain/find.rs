use crate::areas::repository::Repository;
use crate::errors::GitletError;
use std::io::Write;

impl Repository {
    /// Print the ID of every commit whose message contains `message`
    pub fn find(&mut self, message: &str) -> anyhow::Result<()> {
        self.rehydrate()?;

        let matches = self
            .database()
            .list_commits()?
            .into_iter()
            .filter(|(_, commit)| commit.message().contains(message))
            .map(|(commit_oid, _)| commit_oid)
            .collect::<Vec<_>>();

        if matches.is_empty() {
            return Err(GitletError::NoCommitWithMessage.into());
        }

        for commit_oid in matches {
            writeln!(self.writer(), "{commit_oid}")?;
        }

        Ok(())
    }
}
