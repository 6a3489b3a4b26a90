//! Staging area
//!
//! The staging area holds the changes that the next commit will fold into the
//! head commit's snapshot. It consists of two disjoint sets:
//!
//! - `additions`: file name to the pending bytes of that file. The bytes are not
//!   content-addressed until commit time, so un-staging never leaves garbage in
//!   the object store.
//! - `removals`: names of head-tracked files that the next commit drops.
//!
//! ## On-disk Layout
//!
//! - `staging/add/<name>`: pending bytes, one file per staged addition
//! - `staging/remove/<name>`: empty marker, one file per staged removal
//!
//! The sets are loaded fully into memory by [`Index::rehydrate`] and written back
//! by [`Index::write_updates`] only if they changed.

use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::{Commit, is_trackable_name};
use crate::artifacts::objects::object::Object;
use crate::errors::GitletError;
use anyhow::Context;
use bytes::Bytes;
use file_guard::Lock;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use walkdir::WalkDir;

const ADDITIONS_DIR: &str = "add";
const REMOVALS_DIR: &str = "remove";
const LOCK_FILE: &str = "lock";

/// What `rm` did to a file, so the caller can update the working directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Removal {
    /// A pending addition was discarded
    pub unstaged: bool,
    /// The file is tracked by head and is now staged for removal
    pub staged: bool,
}

#[derive(Debug, Clone)]
pub struct Index {
    /// Path to the staging directory (typically `.gitlet/staging`)
    path: Box<Path>,
    additions: BTreeMap<String, Bytes>,
    removals: BTreeSet<String>,
    /// Flag indicating if the staging area has been modified since loading
    changed: bool,
}

impl Index {
    pub fn new(path: Box<Path>) -> Self {
        Index {
            path,
            additions: BTreeMap::new(),
            removals: BTreeSet::new(),
            changed: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the staging directories
    pub fn initialize(&self) -> anyhow::Result<()> {
        std::fs::create_dir_all(self.path.join(ADDITIONS_DIR))
            .context("Failed to create staging directory")?;
        std::fs::create_dir_all(self.path.join(REMOVALS_DIR))
            .context("Failed to create staging directory")?;

        Ok(())
    }

    /// Load the staging area from disk
    ///
    /// # Locking
    ///
    /// Acquires a shared lock on the staging lock file during reading.
    pub fn rehydrate(&mut self) -> anyhow::Result<()> {
        self.additions.clear();
        self.removals.clear();
        self.changed = false;

        if !self.path.exists() {
            return Ok(());
        }

        let mut lock_file = self.open_lock_file()?;
        let _lock = file_guard::lock(&mut lock_file, Lock::Shared, 0, 1)?;

        for name in Self::list_names(&self.path.join(ADDITIONS_DIR)) {
            let path = self.path.join(ADDITIONS_DIR).join(&name);
            let content = std::fs::read(&path)
                .with_context(|| format!("Failed to read staged file {:?}", path))?;
            self.additions.insert(name, content.into());
        }

        self.removals = Self::list_names(&self.path.join(REMOVALS_DIR))
            .into_iter()
            .collect();

        Ok(())
    }

    /// Persist the staging area if it changed
    ///
    /// # Locking
    ///
    /// Acquires an exclusive lock on the staging lock file during writing.
    pub fn write_updates(&mut self) -> anyhow::Result<()> {
        if !self.changed {
            return Ok(());
        }

        self.initialize()?;
        let mut lock_file = self.open_lock_file()?;
        let _lock = file_guard::lock(&mut lock_file, Lock::Exclusive, 0, 1)?;

        let additions_dir = self.path.join(ADDITIONS_DIR);
        for name in Self::list_names(&additions_dir) {
            if !self.additions.contains_key(&name) {
                std::fs::remove_file(additions_dir.join(&name))?;
            }
        }
        for (name, content) in &self.additions {
            std::fs::write(additions_dir.join(name), content)
                .with_context(|| format!("Failed to stage file {name}"))?;
        }

        let removals_dir = self.path.join(REMOVALS_DIR);
        for name in Self::list_names(&removals_dir) {
            if !self.removals.contains(&name) {
                std::fs::remove_file(removals_dir.join(&name))?;
            }
        }
        for name in &self.removals {
            std::fs::write(removals_dir.join(name), b"")
                .with_context(|| format!("Failed to stage removal of {name}"))?;
        }

        self.changed = false;

        Ok(())
    }

    fn open_lock_file(&self) -> anyhow::Result<std::fs::File> {
        std::fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(self.path.join(LOCK_FILE))
            .context("Failed to open staging lock file")
    }

    fn list_names(dir: &Path) -> Vec<String> {
        WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.file_name().to_string_lossy().to_string())
            .collect()
    }

    /// Stage a working file for addition
    ///
    /// When the content matches the version tracked by head, the file has been
    /// reverted: any pending change for it is dropped instead.
    pub fn stage_add(&mut self, name: &str, content: Bytes, head: &Commit) -> anyhow::Result<()> {
        if !is_trackable_name(name) {
            return Err(GitletError::FileNotFound(name.to_string()).into());
        }

        let oid = Blob::new(content.clone()).object_id()?;

        self.removals.remove(name);
        if head.file_digest(name) == Some(&oid) {
            self.additions.remove(name);
        } else {
            self.additions.insert(name.to_string(), content);
        }
        self.changed = true;

        Ok(())
    }

    /// Stage a file for removal
    ///
    /// Fails with `NothingToRemove` unless the file is staged for addition or
    /// tracked by head. The caller deletes the working copy when `staged` is set.
    pub fn stage_remove(&mut self, name: &str, head: &Commit) -> anyhow::Result<Removal> {
        let unstaged = self.additions.contains_key(name);
        let staged = head.has_file(name);

        if !unstaged && !staged {
            return Err(GitletError::NothingToRemove(name.to_string()).into());
        }

        self.additions.remove(name);
        if staged {
            self.removals.insert(name.to_string());
        }
        self.changed = true;

        Ok(Removal { unstaged, staged })
    }

    /// Stage already computed content, bypassing the comparison with head
    ///
    /// Used by merge for target versions and synthesized conflict files.
    pub fn stage_content(&mut self, name: &str, content: Bytes) {
        self.removals.remove(name);
        self.additions.insert(name.to_string(), content);
        self.changed = true;
    }

    /// Stage a removal without the checks of [`Index::stage_remove`]
    pub fn stage_deletion(&mut self, name: &str) {
        self.additions.remove(name);
        self.removals.insert(name.to_string());
        self.changed = true;
    }

    pub fn clear(&mut self) {
        if !self.is_empty() {
            self.additions.clear();
            self.removals.clear();
            self.changed = true;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.additions.is_empty() && self.removals.is_empty()
    }

    pub fn staged_addition(&self, name: &str) -> Option<&Bytes> {
        self.additions.get(name)
    }

    pub fn is_staged_for_removal(&self, name: &str) -> bool {
        self.removals.contains(name)
    }

    pub fn additions(&self) -> &BTreeMap<String, Bytes> {
        &self.additions
    }

    pub fn removals(&self) -> &BTreeSet<String> {
        &self.removals
    }
}
