//! Branch registry
//!
//! Branches are named pointers to commits. The registry keeps the full mapping
//! from branch name to tip commit plus the name of the current branch (head).
//!
//! ## File Format
//!
//! - `branches`: one `<oid> <branch-name>` line per branch, sorted by name
//! - `HEAD`: the current branch name as plain text
//!
//! Both files are loaded by [`Refs::rehydrate`] and written back by
//! [`Refs::write_updates`] only if something changed during the command.

use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::GitletError;
use anyhow::Context;
use file_guard::Lock;
use std::collections::BTreeMap;
use std::io::Write;
use std::ops::DerefMut;
use std::path::Path;

/// Name of the file holding the current branch name
pub const HEAD_REF_NAME: &str = "HEAD";

/// Name of the registry file
pub const BRANCHES_FILE_NAME: &str = "branches";

#[derive(Debug)]
pub struct Refs {
    /// Path to the metadata directory (typically `.gitlet`)
    path: Box<Path>,
    branches: BTreeMap<BranchName, ObjectId>,
    head: BranchName,
    /// Flag indicating if the registry has been modified since loading
    changed: bool,
}

impl Refs {
    pub fn new(path: Box<Path>) -> Self {
        Refs {
            path,
            branches: BTreeMap::new(),
            head: BranchName::default_branch(),
            changed: false,
        }
    }

    /// Start a fresh registry with a single branch pointing at `oid`
    pub fn initialize(&mut self, head: BranchName, oid: ObjectId) {
        self.branches = BTreeMap::from([(head.clone(), oid)]);
        self.head = head;
        self.changed = true;
    }

    /// Load the registry and head from disk
    ///
    /// # Locking
    ///
    /// Acquires a shared lock on the registry file during reading.
    pub fn rehydrate(&mut self) -> anyhow::Result<()> {
        let branches_path = self.branches_path();
        let mut branches_file = std::fs::File::open(&branches_path)
            .with_context(|| format!("failed to open branch registry at {:?}", branches_path))?;
        let _lock = file_guard::lock(&mut branches_file, Lock::Shared, 0, 1)?;

        let content = std::fs::read_to_string(&branches_path)?;
        self.branches = content
            .lines()
            .filter(|line| !line.is_empty())
            .map(Self::parse_branch_line)
            .collect::<anyhow::Result<_>>()?;

        let head_path = self.head_path();
        let head = std::fs::read_to_string(&head_path)
            .with_context(|| format!("failed to read HEAD at {:?}", head_path))?;
        self.head = BranchName::try_parse(head.trim().to_string())?;

        if !self.branches.contains_key(&self.head) {
            return Err(GitletError::InvalidObject(format!(
                "HEAD names unknown branch {}",
                self.head
            ))
            .into());
        }

        self.changed = false;

        Ok(())
    }

    fn parse_branch_line(line: &str) -> anyhow::Result<(BranchName, ObjectId)> {
        let (oid, name) = line
            .split_once(' ')
            .with_context(|| format!("malformed branch registry line {line:?}"))?;

        Ok((
            BranchName::try_parse(name.to_string())?,
            ObjectId::try_parse(oid.to_string())?,
        ))
    }

    /// Persist the registry and head if they changed
    ///
    /// # Locking
    ///
    /// Acquires an exclusive lock on each file during its update.
    pub fn write_updates(&mut self) -> anyhow::Result<()> {
        if !self.changed {
            return Ok(());
        }

        let registry = self
            .branches
            .iter()
            .map(|(name, oid)| format!("{oid} {name}\n"))
            .collect::<String>();

        self.update_ref_file(&self.branches_path(), registry)?;
        self.update_ref_file(&self.head_path(), self.head.to_string())?;
        self.changed = false;

        Ok(())
    }

    fn update_ref_file(&self, path: &Path, raw_ref: String) -> anyhow::Result<()> {
        let mut ref_file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .with_context(|| format!("failed to open ref file at {:?}", path))?;
        let mut lock = file_guard::lock(&mut ref_file, Lock::Exclusive, 0, 1)?;
        lock.deref_mut().write_all(raw_ref.as_bytes())?;

        Ok(())
    }

    pub fn head(&self) -> &BranchName {
        &self.head
    }

    /// Tip of the current branch
    pub fn head_oid(&self) -> anyhow::Result<&ObjectId> {
        self.read_ref(&self.head)
    }

    pub fn is_current_branch(&self, name: &BranchName) -> bool {
        &self.head == name
    }

    pub fn exists(&self, name: &BranchName) -> bool {
        self.branches.contains_key(name)
    }

    pub fn read_ref(&self, name: &BranchName) -> anyhow::Result<&ObjectId> {
        self.branches
            .get(name)
            .ok_or_else(|| GitletError::BranchNotFound(name.to_string()).into())
    }

    /// Branches sorted by name
    pub fn list_branches(&self) -> impl Iterator<Item = &BranchName> {
        self.branches.keys()
    }

    pub fn create_branch(&mut self, name: BranchName, oid: ObjectId) -> anyhow::Result<()> {
        if self.branches.contains_key(&name) {
            return Err(GitletError::BranchAlreadyExists(name.to_string()).into());
        }

        self.branches.insert(name, oid);
        self.changed = true;

        Ok(())
    }

    /// Delete a branch pointer; the commits it pointed to are kept
    pub fn delete_branch(&mut self, name: &BranchName) -> anyhow::Result<ObjectId> {
        if !self.branches.contains_key(name) {
            return Err(GitletError::BranchNotFound(name.to_string()).into());
        }
        if self.is_current_branch(name) {
            return Err(GitletError::CannotRemoveCurrentBranch(name.to_string()).into());
        }

        self.changed = true;
        self.branches
            .remove(name)
            .ok_or_else(|| GitletError::BranchNotFound(name.to_string()).into())
    }

    /// Advance the current branch to `oid`
    pub fn update_head(&mut self, oid: ObjectId) {
        self.branches.insert(self.head.clone(), oid);
        self.changed = true;
    }

    /// Make an existing branch the current one
    pub fn set_head(&mut self, name: BranchName) -> anyhow::Result<()> {
        if !self.branches.contains_key(&name) {
            return Err(GitletError::NoSuchBranch(name.to_string()).into());
        }

        self.head = name;
        self.changed = true;

        Ok(())
    }

    pub fn head_path(&self) -> Box<Path> {
        self.path.join(HEAD_REF_NAME).into_boxed_path()
    }

    pub fn branches_path(&self) -> Box<Path> {
        self.path.join(BRANCHES_FILE_NAME).into_boxed_path()
    }
}
