use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::checkout::conflict::{ensure_no_untracked_files, ensure_not_overwritten};
use crate::artifacts::merge::conflict::conflict_content;
use crate::artifacts::merge::policy::{MergeAction, classify};
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::GitletError;
use bytes::Bytes;
use std::collections::{BTreeMap, BTreeSet};

/// What a successful merge did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The target tip is already an ancestor of head; nothing changed
    AlreadyUpToDate,
    /// Head was an ancestor of the target tip and now points at it
    FastForward,
    /// A merge commit was created
    Merged { conflicts: bool },
}

/// How the histories of head and target relate
enum MergeKind {
    AlreadyUpToDate,
    FastForward(Commit),
    ThreeWay {
        target: Commit,
        actions: BTreeMap<String, MergeAction>,
    },
}

impl Repository {
    /// Merge the given branch into the current one
    ///
    /// Preconditions are checked in this order: a clean staging area, no
    /// untracked file the merge would overwrite, an existing target branch
    /// that is not the current one.
    pub fn merge(&mut self, target: &str) -> anyhow::Result<MergeOutcome> {
        self.rehydrate()?;

        if !self.index().is_empty() {
            return Err(GitletError::UncommittedChanges.into());
        }

        let head_oid = self.head_oid()?;
        let head = self.database().load_commit(&head_oid)?;
        let target_branch = BranchName::try_parse(target.to_string())
            .ok()
            .filter(|branch_name| self.refs().exists(branch_name));

        let plan = match &target_branch {
            Some(branch_name) => {
                let target_oid = self.refs().read_ref(branch_name)?.clone();
                let kind = self.plan_merge(&head_oid, &head, &target_oid)?;
                self.ensure_merge_not_blocked(&head, &kind)?;
                Some((target_oid, kind))
            }
            None => None,
        };

        let (Some(target_branch), Some((target_oid, kind))) = (target_branch, plan) else {
            return Err(GitletError::BranchNotFound(target.to_string()).into());
        };
        if self.refs().is_current_branch(&target_branch) {
            return Err(GitletError::MergeWithSelf.into());
        }

        let outcome = match kind {
            MergeKind::AlreadyUpToDate => MergeOutcome::AlreadyUpToDate,
            MergeKind::FastForward(target) => {
                self.switch_to_commit(&head, &target)?;
                self.refs_mut().update_head(target_oid);
                MergeOutcome::FastForward
            }
            MergeKind::ThreeWay { target, actions } => {
                let conflicts = self.apply_merge_actions(&head, &target, &actions)?;
                let message = format!("Merged {} into {}.", target_branch, self.refs().head());
                self.write_commit(vec![head_oid, target_oid], message)?;
                MergeOutcome::Merged { conflicts }
            }
        };

        self.persist()?;

        Ok(outcome)
    }

    fn plan_merge(
        &self,
        head_oid: &ObjectId,
        head: &Commit,
        target_oid: &ObjectId,
    ) -> anyhow::Result<MergeKind> {
        let split_oid = self.split_point_finder().split_point(head_oid, target_oid)?;

        if &split_oid == target_oid {
            return Ok(MergeKind::AlreadyUpToDate);
        }

        let target = self.database().load_commit(target_oid)?;
        if &split_oid == head_oid {
            return Ok(MergeKind::FastForward(target));
        }

        let split = self.database().load_commit(&split_oid)?;
        let actions = split
            .files()
            .into_iter()
            .chain(head.files())
            .chain(target.files())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(|name| {
                let action = classify(
                    split.file_digest(name),
                    head.file_digest(name),
                    target.file_digest(name),
                );
                (name.to_string(), action)
            })
            .filter(|(_, action)| *action != MergeAction::Keep)
            .collect();

        Ok(MergeKind::ThreeWay { target, actions })
    }

    fn ensure_merge_not_blocked(&self, head: &Commit, kind: &MergeKind) -> anyhow::Result<()> {
        let working_files = self.workspace().list_files()?;

        match kind {
            MergeKind::AlreadyUpToDate => Ok(()),
            MergeKind::FastForward(_) => ensure_no_untracked_files(&working_files, head),
            MergeKind::ThreeWay { actions, .. } => ensure_not_overwritten(
                &working_files,
                head,
                actions
                    .iter()
                    .filter(|(_, action)| {
                        matches!(action, MergeAction::TakeTarget | MergeAction::Conflict)
                    })
                    .map(|(name, _)| name.as_str()),
            ),
        }
    }

    /// Update the working directory and stage every merge result
    ///
    /// Returns whether any file was in conflict.
    fn apply_merge_actions(
        &mut self,
        head: &Commit,
        target: &Commit,
        actions: &BTreeMap<String, MergeAction>,
    ) -> anyhow::Result<bool> {
        let mut conflicts = false;

        for (name, action) in actions {
            match action {
                MergeAction::Keep => {}
                MergeAction::TakeTarget => {
                    let content = self.load_version(target, name)?.unwrap_or_default();
                    self.workspace().write_file(name, &content)?;
                    self.index_mut().stage_content(name, content);
                }
                MergeAction::Remove => {
                    self.workspace().remove_file(name)?;
                    self.index_mut().stage_deletion(name);
                }
                MergeAction::Conflict => {
                    let head_content = self.load_version(head, name)?;
                    let target_content = self.load_version(target, name)?;
                    let content =
                        conflict_content(head_content.as_deref(), target_content.as_deref());

                    self.workspace().write_file(name, &content)?;
                    self.index_mut().stage_content(name, content);
                    conflicts = true;
                }
            }
        }

        Ok(conflicts)
    }

    fn load_version(&self, commit: &Commit, name: &str) -> anyhow::Result<Option<Bytes>> {
        commit
            .file_digest(name)
            .map(|oid| self.database().load_blob(oid))
            .transpose()
    }
}
