//! Commit ID resolution
//!
//! Commands that take a commit (`checkout <commit> -- <file>`, `reset`) accept
//! either the full 40-character ID or an abbreviation of at least
//! [`MIN_COMMIT_PREFIX_LENGTH`] hex characters. Every failure to name exactly
//! one stored commit is reported as a user error, never as a missing object.

use crate::areas::database::Database;
use crate::artifacts::branch::MIN_COMMIT_PREFIX_LENGTH;
use crate::artifacts::objects::OBJECT_ID_LENGTH;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::GitletError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Revision {
    /// A full commit ID
    Full(ObjectId),
    /// A unique-prefix abbreviation of a commit ID
    Abbreviated(String),
}

impl Revision {
    pub fn try_parse(revision: &str) -> anyhow::Result<Self> {
        let revision = revision.to_ascii_lowercase();

        if revision.len() == OBJECT_ID_LENGTH
            && let Ok(oid) = ObjectId::try_parse(revision.clone())
        {
            return Ok(Revision::Full(oid));
        }

        if revision.len() >= MIN_COMMIT_PREFIX_LENGTH && ObjectId::is_valid_prefix(&revision) {
            Ok(Revision::Abbreviated(revision))
        } else {
            Err(GitletError::NoSuchCommit(revision).into())
        }
    }

    /// Resolve to the ID of a stored commit
    pub fn resolve(&self, database: &Database) -> anyhow::Result<ObjectId> {
        match self {
            Revision::Full(oid) => {
                if Self::is_commit(oid, database) {
                    Ok(oid.clone())
                } else {
                    Err(GitletError::NoSuchCommit(oid.to_string()).into())
                }
            }
            Revision::Abbreviated(prefix) => {
                let mut commits = database
                    .find_objects_by_prefix(prefix)?
                    .into_iter()
                    .filter(|oid| Self::is_commit(oid, database))
                    .collect::<Vec<_>>();

                match commits.len() {
                    0 => Err(GitletError::NoSuchCommit(prefix.clone()).into()),
                    1 => Ok(commits.remove(0)),
                    _ => Err(GitletError::AmbiguousCommitId(prefix.clone()).into()),
                }
            }
        }
    }

    fn is_commit(oid: &ObjectId, database: &Database) -> bool {
        database.exists(oid)
            && database
                .get_object_type(oid)
                .map(|object_type| object_type == ObjectType::Commit)
                .unwrap_or(false)
    }
}
