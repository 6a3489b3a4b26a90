//! Commit switch planning
//!
//! A [`Migration`] lists the file system operations that turn the working
//! directory into an exact materialization of a destination commit:
//!
//! - every plain working file the destination does not track is deleted
//! - every file the destination tracks is written from its blob, either as a
//!   new file (`Add`) or over an existing one (`Modify`)
//!
//! The plan is applied by [`Workspace::apply_migration`](crate::areas::workspace::Workspace::apply_migration).

use crate::areas::database::Database;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use bytes::Bytes;
use std::collections::HashMap;

/// Type of file system action required for a switch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionType {
    /// Create new file
    Add,
    /// Delete file
    Delete,
    /// Overwrite existing file
    Modify,
}

/// Planned actions grouped by type, each with the blob to write (none for deletions)
pub type ActionsSet = HashMap<ActionType, Vec<(String, Option<ObjectId>)>>;

pub struct Migration<'r> {
    database: &'r Database,
    actions: ActionsSet,
}

impl<'r> Migration<'r> {
    /// Plan the switch from the current working files to `target`
    pub fn plan(database: &'r Database, working_files: &[String], target: &Commit) -> Self {
        let mut actions = HashMap::from([
            (ActionType::Add, Vec::new()),
            (ActionType::Delete, Vec::new()),
            (ActionType::Modify, Vec::new()),
        ]);

        for name in working_files {
            if !target.has_file(name) {
                Self::record(&mut actions, ActionType::Delete, name, None);
            }
        }

        for (name, oid) in target.tracked() {
            let action = if working_files.contains(name) {
                ActionType::Modify
            } else {
                ActionType::Add
            };
            Self::record(&mut actions, action, name, Some(oid.clone()));
        }

        Migration { database, actions }
    }

    fn record(actions: &mut ActionsSet, action: ActionType, name: &str, oid: Option<ObjectId>) {
        actions
            .entry(action)
            .or_default()
            .push((name.to_string(), oid));
    }

    pub fn actions(&self) -> &ActionsSet {
        &self.actions
    }

    pub fn load_blob_data(&self, oid: &ObjectId) -> anyhow::Result<Bytes> {
        self.database.load_blob(oid)
    }
}
