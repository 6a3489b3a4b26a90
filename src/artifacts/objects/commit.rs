//! Commit object
//!
//! Commits are immutable snapshots of the tracked files. Each one holds:
//! - Zero (root), one or two (merge) parent commit IDs, in order
//! - The creation timestamp
//! - The full mapping from tracked file name to blob ID (not a delta)
//! - The commit message
//!
//! ## Format
//!
//! On disk:
//! ```text
//! commit <size>\0
//! parent <parent-sha>
//! date <unix-seconds> <timezone>
//! file <blob-sha> <file-name>
//!
//! <commit message>
//! ```
//!
//! The timestamp is part of the hashed bytes, so two commits only share an
//! ID when message, timestamp, parents and snapshot all agree.

use crate::artifacts::objects::object::{Object, Packable, Unpackable, frame};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::GitletError;
use anyhow::Context;
use bytes::Bytes;
use chrono::{DateTime, FixedOffset, TimeZone};
use std::collections::{BTreeMap, BTreeSet};
use std::io::BufRead;

/// Maximum number of parents a commit may record (a merge commit)
pub const MAX_PARENTS: usize = 2;

/// Message of the root commit created by `init`
pub const ROOT_COMMIT_MESSAGE: &str = "initial commit";

/// Environment variable pinning the timestamp of new commits
pub const COMMIT_DATE_ENV: &str = "GITLET_COMMIT_DATE";

/// Tracked file name to blob ID
pub type Snapshot = BTreeMap<String, ObjectId>;

/// Whether `name` can be tracked: a plain file name directly in the working directory
///
/// Names are stored one per line in the commit payload, so line breaks and NUL
/// are excluded along with path separators and the metadata directory.
pub fn is_trackable_name(name: &str) -> bool {
    !name.is_empty()
        && !matches!(name, "." | ".." | ".gitlet")
        && !name.contains(['/', '\n', '\r', '\0'])
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Commit {
    /// Parent commit IDs (empty for the root commit, two for merge commits)
    parents: Vec<ObjectId>,
    timestamp: DateTime<FixedOffset>,
    /// Every file tracked by this commit
    tracked: Snapshot,
    message: String,
}

impl Commit {
    /// Create a new commit
    ///
    /// Fails with `InvalidMessage` for an empty message and with `InvalidObject`
    /// when more than two parents are given or a tracked name is not trackable.
    pub fn new(
        message: String,
        parents: Vec<ObjectId>,
        timestamp: DateTime<FixedOffset>,
        tracked: Snapshot,
    ) -> anyhow::Result<Self> {
        if message.is_empty() {
            return Err(GitletError::InvalidMessage.into());
        }

        if parents.len() > MAX_PARENTS {
            return Err(GitletError::InvalidObject(format!(
                "commit has {} parents, at most {MAX_PARENTS} allowed",
                parents.len()
            ))
            .into());
        }

        if let Some(name) = tracked.keys().find(|name| !is_trackable_name(name)) {
            return Err(
                GitletError::InvalidObject(format!("commit tracks invalid file name {name:?}"))
                    .into(),
            );
        }

        Ok(Commit {
            parents,
            timestamp,
            tracked,
            message,
        })
    }

    /// The parentless commit every repository starts from
    ///
    /// Uses the Unix epoch as timestamp so that all repositories share it.
    pub fn root() -> Self {
        Commit {
            parents: Vec::new(),
            timestamp: epoch(),
            tracked: Snapshot::new(),
            message: ROOT_COMMIT_MESSAGE.to_string(),
        }
    }

    /// Copy of the tracked mapping, the starting point of a child commit
    pub fn snapshot(&self) -> Snapshot {
        self.tracked.clone()
    }

    pub fn has_file(&self, name: &str) -> bool {
        self.tracked.contains_key(name)
    }

    pub fn file_digest(&self, name: &str) -> Option<&ObjectId> {
        self.tracked.get(name)
    }

    pub fn files(&self) -> BTreeSet<&str> {
        self.tracked.keys().map(String::as_str).collect()
    }

    pub fn tracked(&self) -> &Snapshot {
        &self.tracked
    }

    pub fn parents(&self) -> &[ObjectId] {
        &self.parents
    }

    /// First parent, the one `log` follows
    pub fn parent(&self) -> Option<&ObjectId> {
        self.parents.first()
    }

    pub fn is_merge(&self) -> bool {
        self.parents.len() == MAX_PARENTS
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn timestamp(&self) -> DateTime<FixedOffset> {
        self.timestamp
    }

    /// Timestamp in the form "Thu Jan 1 00:00:00 1970 +0000"
    pub fn readable_timestamp(&self) -> String {
        self.timestamp
            .format("%a %b %-d %H:%M:%S %Y %z")
            .to_string()
    }
}

/// Timestamp for a new commit
///
/// Reads `GITLET_COMMIT_DATE` (RFC 2822 or `%Y-%m-%d %H:%M:%S %z`) and falls back
/// to the current local time.
pub fn commit_timestamp() -> DateTime<FixedOffset> {
    std::env::var(COMMIT_DATE_ENV)
        .ok()
        .and_then(|date_str| {
            DateTime::parse_from_rfc2822(&date_str)
                .or_else(|_| DateTime::parse_from_str(&date_str, "%Y-%m-%d %H:%M:%S %z"))
                .ok()
        })
        .unwrap_or_else(|| chrono::Local::now().fixed_offset())
}

fn epoch() -> DateTime<FixedOffset> {
    DateTime::<chrono::Utc>::UNIX_EPOCH.fixed_offset()
}

fn parse_timezone(timezone: &str) -> anyhow::Result<FixedOffset> {
    let (sign, digits) = match timezone.split_at_checked(1) {
        Some(("+", digits)) => (1, digits),
        Some(("-", digits)) => (-1, digits),
        _ => anyhow::bail!("Invalid timezone: {timezone}"),
    };

    if digits.len() != 4 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        anyhow::bail!("Invalid timezone: {timezone}");
    }

    let hours = digits[..2].parse::<i32>()?;
    let minutes = digits[2..].parse::<i32>()?;

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
        .with_context(|| format!("Invalid timezone: {timezone}"))
}

fn parse_date(value: &str) -> anyhow::Result<DateTime<FixedOffset>> {
    let (seconds, timezone) = value
        .split_once(' ')
        .context("Invalid commit object: malformed date line")?;
    let seconds = seconds.parse::<i64>().context("Invalid timestamp")?;
    let timezone = parse_timezone(timezone)?;

    timezone
        .timestamp_opt(seconds, 0)
        .single()
        .context("Invalid timestamp")
}

impl Packable for Commit {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut lines = vec![];

        for parent in &self.parents {
            lines.push(format!("parent {parent}"));
        }
        lines.push(format!(
            "date {} {}",
            self.timestamp.timestamp(),
            self.timestamp.format("%z")
        ));
        for (name, oid) in &self.tracked {
            lines.push(format!("file {oid} {name}"));
        }
        lines.push(String::new());
        lines.push(self.message.clone());

        Ok(frame(self.object_type(), lines.join("\n").as_bytes()))
    }
}

impl Unpackable for Commit {
    fn deserialize(reader: impl BufRead) -> anyhow::Result<Self> {
        let content = reader
            .bytes()
            .collect::<Result<Vec<u8>, std::io::Error>>()?;
        let content = String::from_utf8(content)?;

        let (header, message) = content
            .split_once("\n\n")
            .context("Invalid commit object: missing message separator")?;

        let mut parents = Vec::new();
        let mut timestamp = None;
        let mut tracked = Snapshot::new();

        for line in header.lines() {
            if let Some(parent) = line.strip_prefix("parent ") {
                parents.push(ObjectId::try_parse(parent.to_string())?);
            } else if let Some(date) = line.strip_prefix("date ") {
                timestamp = Some(parse_date(date)?);
            } else if let Some(entry) = line.strip_prefix("file ") {
                let (oid, name) = entry
                    .split_once(' ')
                    .context("Invalid commit object: malformed file line")?;
                tracked.insert(name.to_string(), ObjectId::try_parse(oid.to_string())?);
            } else {
                anyhow::bail!("Invalid commit object: unexpected line {line:?}");
            }
        }

        let timestamp = timestamp.context("Invalid commit object: missing date line")?;

        Self::new(message.to_string(), parents, timestamp, tracked)
    }
}

impl Object for Commit {
    fn object_type(&self) -> ObjectType {
        ObjectType::Commit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::io::Cursor;

    fn oid(c: char) -> ObjectId {
        ObjectId::try_parse(c.to_string().repeat(40)).unwrap()
    }

    fn fixed_time() -> DateTime<FixedOffset> {
        DateTime::parse_from_str("2023-01-01 12:00:00 +0200", "%Y-%m-%d %H:%M:%S %z").unwrap()
    }

    fn payload(commit: &Commit) -> Vec<u8> {
        let bytes = commit.serialize().unwrap();
        let start = bytes.iter().position(|b| *b == 0).unwrap() + 1;
        bytes[start..].to_vec()
    }

    #[test]
    fn test_empty_message_is_rejected() {
        let error = Commit::new(String::new(), vec![], fixed_time(), Snapshot::new()).unwrap_err();

        assert_eq!(
            error.downcast_ref::<GitletError>(),
            Some(&GitletError::InvalidMessage)
        );
    }

    #[test]
    fn test_three_parents_are_rejected() {
        let result = Commit::new(
            "octopus".to_string(),
            vec![oid('a'), oid('b'), oid('c')],
            fixed_time(),
            Snapshot::new(),
        );

        assert!(result.is_err());
    }

    #[test]
    fn test_root_commit_is_deterministic() {
        let first = Commit::root();
        let second = Commit::root();

        assert_eq!(first.object_id().unwrap(), second.object_id().unwrap());
        assert_eq!(first.readable_timestamp(), "Thu Jan 1 00:00:00 1970 +0000");
        assert!(first.parents().is_empty());
    }

    #[test]
    fn test_timestamp_participates_in_the_id() {
        let first = Commit::new("m".into(), vec![oid('a')], fixed_time(), Snapshot::new()).unwrap();
        let second = Commit::new(
            "m".into(),
            vec![oid('a')],
            fixed_time() + chrono::Duration::seconds(1),
            Snapshot::new(),
        )
        .unwrap();

        assert_ne!(first.object_id().unwrap(), second.object_id().unwrap());
    }

    #[test]
    fn test_merge_commit_survives_deserialize() {
        let tracked = Snapshot::from([
            ("a b.txt".to_string(), oid('1')),
            ("z.txt".to_string(), oid('2')),
        ]);
        let commit = Commit::new(
            "Merged feature into master.\nsecond line".into(),
            vec![oid('a'), oid('b')],
            fixed_time(),
            tracked,
        )
        .unwrap();

        let parsed = Commit::deserialize(Cursor::new(payload(&commit))).unwrap();

        assert_eq!(parsed, commit);
        assert!(parsed.is_merge());
        assert_eq!(parsed.parent(), Some(&oid('a')));
        assert_eq!(parsed.file_digest("a b.txt"), Some(&oid('1')));
        assert_eq!(parsed.object_id().unwrap(), commit.object_id().unwrap());
    }

    #[test]
    fn test_snapshot_is_a_full_copy() {
        let tracked = Snapshot::from([("x.txt".to_string(), oid('1'))]);
        let commit = Commit::new("first".into(), vec![oid('a')], fixed_time(), tracked).unwrap();

        let mut snapshot = commit.snapshot();
        snapshot.remove("x.txt");

        assert!(commit.has_file("x.txt"));
        assert_eq!(commit.files(), BTreeSet::from(["x.txt"]));
    }

    #[test]
    fn test_timezone_parsing() {
        assert_eq!(parse_timezone("+0530").unwrap().local_minus_utc(), 19800);
        assert_eq!(parse_timezone("-0800").unwrap().local_minus_utc(), -28800);
        assert!(parse_timezone("0800").is_err());
        assert!(parse_timezone("+é12").is_err());
        assert!(parse_timezone("+08:0").is_err());
    }

    #[rstest]
    #[case::line_break("a\nb")]
    #[case::carriage_return("a\r")]
    #[case::nul("a\0b")]
    #[case::path("sub/x.txt")]
    #[case::parent_dir("..")]
    #[case::metadata_dir(".gitlet")]
    #[case::empty("")]
    fn test_untrackable_names_are_rejected(#[case] name: &str) {
        assert!(!is_trackable_name(name));

        let tracked = Snapshot::from([(name.to_string(), oid('1'))]);
        let error = Commit::new("first".into(), vec![oid('a')], fixed_time(), tracked).unwrap_err();

        assert!(matches!(
            error.downcast_ref::<GitletError>(),
            Some(GitletError::InvalidObject(_))
        ));
    }

    #[test]
    fn test_ordinary_names_are_trackable() {
        assert!(is_trackable_name("a b.txt"));
        assert!(is_trackable_name(".hidden"));
        assert!(is_trackable_name("ünïcode.md"));
    }
}
