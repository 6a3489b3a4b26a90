//! Content-addressed object store
//!
//! Blobs and commits are keyed by the SHA-1 digest of their framed bytes and
//! stored zlib-compressed under `objects/<2 hex>/<38 hex>`. Writing is
//! idempotent: storing an object whose digest already exists is a no-op.

use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object::{Object, ObjectBox, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::GitletError;
use anyhow::Context;
use bytes::Bytes;
use fake::rand;
use std::io::{BufRead, Cursor, Read, Write};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug)]
pub struct Database {
    path: Box<Path>,
}

impl Database {
    pub fn new(path: Box<Path>) -> Self {
        Database { path }
    }

    pub fn objects_path(&self) -> &Path {
        &self.path
    }

    /// Store an object unless it already exists and return its ID
    pub fn store(&self, object: &impl Object) -> anyhow::Result<ObjectId> {
        let object_id = object.object_id()?;
        let object_path = self.path.join(object_id.to_path());

        // write the object to disk unless it already exists
        // otherwise, create the object directory
        if !object_path.exists() {
            std::fs::create_dir_all(
                object_path
                    .parent()
                    .context(format!("Invalid object path {}", object_path.display()))?,
            )
            .context(format!(
                "Unable to create object directory {}",
                object_path.display()
            ))?;

            self.write_object(object_path, object.serialize()?)?;
        }

        Ok(object_id)
    }

    pub fn exists(&self, object_id: &ObjectId) -> bool {
        self.path.join(object_id.to_path()).is_file()
    }

    /// Raw framed bytes of an object
    ///
    /// A missing object is the fatal `ObjectNotFound` condition.
    pub fn load(&self, object_id: &ObjectId) -> anyhow::Result<Bytes> {
        if !self.exists(object_id) {
            return Err(GitletError::ObjectNotFound(object_id.clone()).into());
        }

        self.read_object(self.path.join(object_id.to_path()))
    }

    pub fn parse_object(&self, object_id: &ObjectId) -> anyhow::Result<ObjectBox> {
        let (object_type, object_reader) = self.parse_object_as_bytes(object_id)?;

        match object_type {
            ObjectType::Blob => Ok(ObjectBox::Blob(Box::new(Blob::deserialize(object_reader)?))),
            ObjectType::Commit => Ok(ObjectBox::Commit(Box::new(Commit::deserialize(
                object_reader,
            )?))),
        }
    }

    pub fn parse_object_as_blob(&self, object_id: &ObjectId) -> anyhow::Result<Option<Blob>> {
        match self.parse_object(object_id)? {
            ObjectBox::Blob(blob) => Ok(Some(*blob)),
            _ => Ok(None),
        }
    }

    pub fn parse_object_as_commit(&self, object_id: &ObjectId) -> anyhow::Result<Option<Commit>> {
        match self.parse_object(object_id)? {
            ObjectBox::Commit(commit) => Ok(Some(*commit)),
            _ => Ok(None),
        }
    }

    /// Load a commit the repository itself references
    ///
    /// Both a missing object and an object of the wrong type indicate a broken
    /// store, so neither is reported as a user error.
    pub fn load_commit(&self, object_id: &ObjectId) -> anyhow::Result<Commit> {
        self.parse_object_as_commit(object_id)?.ok_or_else(|| {
            GitletError::InvalidObject(format!("{object_id} is not a commit")).into()
        })
    }

    /// Load the content of a blob referenced by a commit or the staging area
    pub fn load_blob(&self, object_id: &ObjectId) -> anyhow::Result<Bytes> {
        self.parse_object_as_blob(object_id)?
            .map(Blob::into_content)
            .ok_or_else(|| GitletError::InvalidObject(format!("{object_id} is not a blob")).into())
    }

    pub fn get_object_type(&self, object_id: &ObjectId) -> anyhow::Result<ObjectType> {
        let (object_type, _) = self.parse_object_as_bytes(object_id)?;
        Ok(object_type)
    }

    fn parse_object_as_bytes(
        &self,
        object_id: &ObjectId,
    ) -> anyhow::Result<(ObjectType, impl BufRead)> {
        let object_content = self.load(object_id)?;
        let mut object_reader = Cursor::new(object_content);

        let object_type = ObjectType::parse_object_type(&mut object_reader)
            .with_context(|| format!("Corrupt object {object_id}"))?;

        Ok((object_type, object_reader))
    }

    fn read_object(&self, object_path: PathBuf) -> anyhow::Result<Bytes> {
        let object_content = std::fs::read(&object_path).context(format!(
            "Unable to read object file {}",
            object_path.display()
        ))?;

        Self::decompress(object_content.into())
    }

    fn write_object(&self, object_path: PathBuf, object_content: Bytes) -> anyhow::Result<()> {
        let object_dir = object_path
            .parent()
            .context(format!("Invalid object path {}", object_path.display()))?;
        let temp_object_path = object_dir.join(Self::generate_temp_name());

        let object_content = Self::compress(object_content)?;

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&temp_object_path)
            .context(format!(
                "Unable to open object file {}",
                temp_object_path.display()
            ))?;

        file.write_all(&object_content).context(format!(
            "Unable to write object file {}",
            temp_object_path.display()
        ))?;
        file.sync_all()?;

        // rename the temp file to the object file to make it atomic
        std::fs::rename(&temp_object_path, &object_path).context(format!(
            "Unable to rename object file to {}",
            object_path.display()
        ))?;

        Ok(())
    }

    fn compress(data: Bytes) -> anyhow::Result<Bytes> {
        let mut encoder =
            flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        encoder
            .write_all(&data)
            .context("Unable to compress object content")?;

        encoder
            .finish()
            .map(|compressed_content| compressed_content.into())
            .context("Unable to finish compressing object content")
    }

    fn decompress(data: Bytes) -> anyhow::Result<Bytes> {
        let mut decoder = flate2::read::ZlibDecoder::new(&*data);
        let mut decompressed_content = Vec::new();
        decoder
            .read_to_end(&mut decompressed_content)
            .context("Unable to decompress object content")?;

        Ok(decompressed_content.into())
    }

    fn generate_temp_name() -> String {
        format!("tmp-obj-{}", rand::random::<u32>())
    }

    /// Every object ID currently in the store
    fn list_objects(&self) -> Vec<ObjectId> {
        WalkDir::new(&self.path)
            .min_depth(2)
            .max_depth(2)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| {
                let dir_name = entry.path().parent()?.file_name()?.to_string_lossy().to_string();
                let file_name = entry.file_name().to_string_lossy().to_string();
                ObjectId::try_parse(format!("{dir_name}{file_name}")).ok()
            })
            .collect()
    }

    /// Every commit in the store, newest first (ties broken by ID)
    pub fn list_commits(&self) -> anyhow::Result<Vec<(ObjectId, Commit)>> {
        let mut commits = self
            .list_objects()
            .into_iter()
            .map(|oid| {
                self.parse_object_as_commit(&oid)
                    .map(|commit| commit.map(|commit| (oid, commit)))
            })
            .filter_map(Result::transpose)
            .collect::<anyhow::Result<Vec<_>>>()?;

        commits.sort_by(|(left_oid, left), (right_oid, right)| {
            right
                .timestamp()
                .cmp(&left.timestamp())
                .then_with(|| left_oid.cmp(right_oid))
        });

        Ok(commits)
    }

    /// Find all objects whose OID starts with the given prefix.
    ///
    /// Used to resolve abbreviated commit ids to their full form.
    ///
    /// # Performance
    ///
    /// - For prefixes of 2+ characters, only searches the specific directory
    /// - For prefixes of 0-1 characters, must search all directories (slower)
    pub fn find_objects_by_prefix(&self, prefix: &str) -> anyhow::Result<Vec<ObjectId>> {
        let prefix = prefix.to_ascii_lowercase();

        if prefix.len() < 2 {
            return Ok(self
                .list_objects()
                .into_iter()
                .filter(|oid| oid.as_ref().starts_with(&prefix))
                .collect());
        }

        let mut matches = Vec::new();
        let (dir_name, file_prefix) = prefix.split_at(2);
        let dir_path = self.path.join(dir_name);

        if dir_path.is_dir() {
            for entry in std::fs::read_dir(&dir_path)? {
                let file_name = entry?.file_name();
                let file_name = file_name.to_string_lossy();

                if file_name.starts_with(file_prefix)
                    && let Ok(oid) = ObjectId::try_parse(format!("{dir_name}{file_name}"))
                {
                    matches.push(oid);
                }
            }
        }

        matches.sort();
        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::objects::commit::Snapshot;
    use assert_fs::TempDir;
    use rstest::{fixture, rstest};

    #[fixture]
    fn database_dir() -> TempDir {
        TempDir::new().expect("Failed to create temp dir")
    }

    fn database(dir: &TempDir) -> Database {
        Database::new(dir.path().join("objects").into_boxed_path())
    }

    #[rstest]
    fn test_store_is_idempotent(database_dir: TempDir) {
        let database = database(&database_dir);
        let blob = Blob::new(Bytes::from_static(b"same bytes"));

        let first = database.store(&blob).unwrap();
        let second = database.store(&blob).unwrap();

        assert_eq!(first, second);
        assert!(database.exists(&first));
        assert_eq!(database.list_objects(), vec![first]);
    }

    #[rstest]
    fn test_objects_are_sharded_by_prefix(database_dir: TempDir) {
        let database = database(&database_dir);
        let oid = database.store(&Blob::new(Bytes::from_static(b"x"))).unwrap();

        let (dir, file) = oid.as_ref().split_at(2);
        assert!(database_dir.path().join("objects").join(dir).join(file).is_file());
    }

    #[rstest]
    fn test_blob_round_trip(database_dir: TempDir) {
        let database = database(&database_dir);
        let oid = database.store(&Blob::new(Bytes::from_static(b"\x00binary\xff"))).unwrap();

        assert_eq!(&database.load_blob(&oid).unwrap()[..], b"\x00binary\xff");
        assert_eq!(database.get_object_type(&oid).unwrap(), ObjectType::Blob);
    }

    #[rstest]
    fn test_missing_object_is_fatal(database_dir: TempDir) {
        let database = database(&database_dir);
        let oid = ObjectId::try_parse("0".repeat(40)).unwrap();

        let error = database.load(&oid).unwrap_err();

        assert_eq!(
            error.downcast_ref::<GitletError>(),
            Some(&GitletError::ObjectNotFound(oid))
        );
    }

    #[rstest]
    fn test_blob_is_not_a_commit(database_dir: TempDir) {
        let database = database(&database_dir);
        let oid = database.store(&Blob::new(Bytes::from_static(b"x"))).unwrap();

        assert!(database.parse_object_as_commit(&oid).unwrap().is_none());
        assert!(database.load_commit(&oid).is_err());
    }

    #[rstest]
    fn test_list_commits_skips_blobs_and_sorts_newest_first(database_dir: TempDir) {
        let database = database(&database_dir);
        let root = Commit::root();
        let root_oid = database.store(&root).unwrap();
        let child = Commit::new(
            "child".into(),
            vec![root_oid.clone()],
            chrono::DateTime::parse_from_rfc2822("Sun, 1 Jan 2023 12:00:00 +0000").unwrap(),
            Snapshot::new(),
        )
        .unwrap();
        let child_oid = database.store(&child).unwrap();
        database.store(&Blob::new(Bytes::from_static(b"x"))).unwrap();

        let commits = database
            .list_commits()
            .unwrap()
            .into_iter()
            .map(|(oid, _)| oid)
            .collect::<Vec<_>>();

        assert_eq!(commits, vec![child_oid, root_oid]);
    }

    #[rstest]
    fn test_find_objects_by_prefix(database_dir: TempDir) {
        let database = database(&database_dir);
        let oid = database.store(&Commit::root()).unwrap();

        assert_eq!(
            database.find_objects_by_prefix(&oid.as_ref()[..6]).unwrap(),
            vec![oid.clone()]
        );
        assert_eq!(
            database.find_objects_by_prefix(&oid.as_ref()[..1]).unwrap(),
            vec![oid]
        );
        assert!(database.find_objects_by_prefix("zz").unwrap().is_empty());
    }
}
