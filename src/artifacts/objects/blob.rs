//! Blob object
//!
//! Blobs store the content of one version of one tracked file. They hold only
//! the raw bytes; the file name lives in the commit that tracks the blob.
//!
//! ## Format
//!
//! On disk: `blob <size>\0<content>`

use crate::artifacts::objects::object::{Object, Packable, Unpackable, frame};
use crate::artifacts::objects::object_type::ObjectType;
use bytes::Bytes;
use derive_new::new;
use std::io::BufRead;

/// Blob object representing file content
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct Blob {
    content: Bytes,
}

impl Blob {
    pub fn content(&self) -> &Bytes {
        &self.content
    }

    pub fn into_content(self) -> Bytes {
        self.content
    }
}

impl Packable for Blob {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        Ok(frame(self.object_type(), &self.content))
    }
}

impl Unpackable for Blob {
    fn deserialize(reader: impl BufRead) -> anyhow::Result<Self> {
        // the header has already been read
        let content = reader
            .bytes()
            .collect::<Result<Vec<u8>, std::io::Error>>()?;

        Ok(Self::new(content.into()))
    }
}

impl Object for Blob {
    fn object_type(&self) -> ObjectType {
        ObjectType::Blob
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_identical_content_shares_an_id() {
        let first = Blob::new(Bytes::from_static(b"hello\n"));
        let second = Blob::new(Bytes::from_static(b"hello\n"));

        assert_eq!(first.object_id().unwrap(), second.object_id().unwrap());
    }

    #[test]
    fn test_blob_id_matches_git_hash_object() {
        // `printf 'hello\n' | git hash-object --stdin`
        let blob = Blob::new(Bytes::from_static(b"hello\n"));

        assert_eq!(
            blob.object_id().unwrap().as_ref(),
            "ce013625030ba8dba906f756967f9e9ca394464a"
        );
    }

    #[test]
    fn test_binary_content_survives_deserialize() {
        let content = Bytes::from_static(&[0, 159, 146, 150, 255]);

        let blob = Blob::deserialize(Cursor::new(content.to_vec())).unwrap();

        assert_eq!(blob.content(), &content);
    }
}
