use crate::areas::repository::Repository;
use crate::artifacts::status::status_info::{StatusInfo, WorkingFiles};
use colored::Colorize;
use std::io::Write;

impl Repository {
    pub fn status(&mut self) -> anyhow::Result<()> {
        self.rehydrate()?;

        let head = self.head_commit()?;
        let working = self
            .workspace()
            .list_files()?
            .into_iter()
            .map(|name| {
                let content = self.workspace().read_file(&name)?;
                Ok((name, content))
            })
            .collect::<anyhow::Result<WorkingFiles>>()?;
        let status = StatusInfo::new(&head, self.index(), &working)?;

        let mut writer = self.writer();

        writeln!(writer, "=== Branches ===")?;
        for branch_name in self.refs().list_branches() {
            if self.refs().is_current_branch(branch_name) {
                writeln!(writer, "*{}", branch_name.to_string().green())?;
            } else {
                writeln!(writer, "{branch_name}")?;
            }
        }
        writeln!(writer)?;

        writeln!(writer, "=== Staged Files ===")?;
        for file in status.staged_files() {
            writeln!(writer, "{}", file.green())?;
        }
        writeln!(writer)?;

        writeln!(writer, "=== Removed Files ===")?;
        for file in status.removed_files() {
            writeln!(writer, "{}", file.green())?;
        }
        writeln!(writer)?;

        writeln!(writer, "=== Modifications Not Staged For Commit ===")?;
        for (file, change) in status.workspace_changeset() {
            writeln!(writer, "{file}{change}")?;
        }
        writeln!(writer)?;

        writeln!(writer, "=== Untracked Files ===")?;
        for file in status.untracked_files() {
            writeln!(writer, "{}", file.red())?;
        }
        writeln!(writer)?;

        Ok(())
    }
}
