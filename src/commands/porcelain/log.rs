use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use colored::Colorize;
use std::io::Write;

impl Repository {
    /// Walk the first-parent chain from head
    pub fn log(&mut self) -> anyhow::Result<()> {
        self.rehydrate()?;

        let mut curr_commit_oid = Some(self.head_oid()?);

        while let Some(commit_oid) = curr_commit_oid {
            let commit = self.database().load_commit(&commit_oid)?;
            self.display_commit(&commit_oid, &commit)?;

            curr_commit_oid = commit.parent().cloned();
        }

        Ok(())
    }

    /// Every commit ever made, in no particular branch order
    pub fn global_log(&mut self) -> anyhow::Result<()> {
        self.rehydrate()?;

        for (commit_oid, commit) in self.database().list_commits()? {
            self.display_commit(&commit_oid, &commit)?;
        }

        Ok(())
    }

    fn display_commit(&self, commit_oid: &ObjectId, commit: &Commit) -> anyhow::Result<()> {
        let mut writer = self.writer();

        writeln!(writer, "===")?;
        writeln!(writer, "{}", format!("commit {commit_oid}").yellow())?;
        if let [first, second] = commit.parents() {
            writeln!(
                writer,
                "Merge: {} {}",
                first.to_short_oid(),
                second.to_short_oid()
            )?;
        }
        writeln!(writer, "Date: {}", commit.readable_timestamp())?;
        writeln!(writer, "{}", commit.message())?;
        writeln!(writer)?;

        Ok(())
    }
}
