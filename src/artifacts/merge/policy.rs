//! Merge policy
//!
//! Every file tracked by the split point, the current head or the target tip is
//! classified by its three digests (`None` when the commit does not track it):
//!
//! - head and target agree: `Keep`
//! - head unchanged since split, target changed: `TakeTarget`, or `Remove`
//!   when the target deleted the file
//! - head changed, target unchanged: `Keep`
//! - both changed, differently: `Conflict`
//!
//! "Absent at split, absent in head, present in target" is the unchanged/changed
//! row and therefore takes the target's new file.

use crate::artifacts::objects::object_id::ObjectId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeAction {
    /// Head's version (or absence) stands
    Keep,
    /// Write and stage the target's version
    TakeTarget,
    /// Delete the working file and stage its removal
    Remove,
    /// Write and stage a file holding both versions between conflict markers
    Conflict,
}

pub fn classify(
    split: Option<&ObjectId>,
    head: Option<&ObjectId>,
    target: Option<&ObjectId>,
) -> MergeAction {
    let action = if head == target {
        MergeAction::Keep
    } else if split == head {
        match target {
            Some(_) => MergeAction::TakeTarget,
            None => MergeAction::Remove,
        }
    } else if split == target {
        MergeAction::Keep
    } else {
        MergeAction::Conflict
    };

    debug_log!(
        "classify split={:?} head={:?} target={:?} -> {:?}",
        split,
        head,
        target,
        action
    );

    action
}
