use crate::artifacts::checkout::migration::{ActionType, Migration};
use crate::artifacts::objects::commit::is_trackable_name;
use crate::errors::GitletError;
use anyhow::Context;
use bytes::Bytes;
use std::io::Write;
use std::path::Path;
use walkdir::WalkDir;

/// The working directory
///
/// Only plain files directly inside the working directory take part in version
/// control; subdirectories and the `.gitlet` directory are ignored.
#[derive(Debug)]
pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn new(path: Box<Path>) -> Self {
        Workspace { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Names of the plain files in the working directory, sorted
    pub fn list_files(&self) -> anyhow::Result<Vec<String>> {
        if !self.path.is_dir() {
            anyhow::bail!("The working directory does not exist: {:?}", self.path);
        }

        let mut files = WalkDir::new(&self.path)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.file_name().to_string_lossy().to_string())
            .filter(|name| is_trackable_name(name))
            .collect::<Vec<_>>();
        files.sort();

        Ok(files)
    }

    pub fn exists(&self, name: &str) -> bool {
        self.path.join(name).is_file()
    }

    /// Read a working file, failing with `FileNotFound` when it is absent
    ///
    /// Names that cannot be tracked (paths, line breaks) are reported as absent.
    pub fn read_file(&self, name: &str) -> anyhow::Result<Bytes> {
        let file_path = self.path.join(name);

        if !is_trackable_name(name) || !file_path.is_file() {
            return Err(GitletError::FileNotFound(name.to_string()).into());
        }

        let content = std::fs::read(&file_path)
            .with_context(|| format!("Failed to read file: {:?}", file_path))?;

        Ok(content.into())
    }

    pub fn write_file(&self, name: &str, data: &[u8]) -> anyhow::Result<()> {
        let file_path = self.path.join(name);

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&file_path)
            .with_context(|| format!("Failed to open file: {:?}", file_path))?;

        file.write_all(data)
            .with_context(|| format!("Failed to write to file: {:?}", file_path))
    }

    /// Delete a working file; deleting an absent file is a no-op
    pub fn remove_file(&self, name: &str) -> anyhow::Result<()> {
        let file_path = self.path.join(name);

        if file_path.is_file() {
            std::fs::remove_file(&file_path)
                .with_context(|| format!("Failed to remove file: {:?}", file_path))?;
        }

        Ok(())
    }

    // Deletions are applied before writes so that a failed write never leaves
    // stale files from the previous commit behind.
    pub fn apply_migration(&self, migration: &Migration) -> anyhow::Result<()> {
        self.apply_migration_action_set(migration, ActionType::Delete)?;
        self.apply_migration_action_set(migration, ActionType::Modify)?;
        self.apply_migration_action_set(migration, ActionType::Add)?;

        Ok(())
    }

    fn apply_migration_action_set(
        &self,
        migration: &Migration,
        action: ActionType,
    ) -> anyhow::Result<()> {
        migration
            .actions()
            .get(&action)
            .ok_or_else(|| anyhow::anyhow!("Invalid action type"))?
            .iter()
            .try_for_each(|(name, oid)| match (&action, oid) {
                (ActionType::Delete, None) => self.remove_file(name),
                (ActionType::Add | ActionType::Modify, Some(oid)) => {
                    let data = migration.load_blob_data(oid)?;
                    self.write_file(name, &data)
                }
                _ => Err(anyhow::anyhow!("Invalid action and entry combination")),
            })
    }
}
