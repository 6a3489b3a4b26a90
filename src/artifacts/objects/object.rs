use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Result;
use bytes::Bytes;
use sha1::{Digest, Sha1};
use std::io::BufRead;

pub trait Packable {
    fn serialize(&self) -> Result<Bytes>;
}

pub trait Unpackable {
    fn deserialize(reader: impl BufRead) -> Result<Self>
    where
        Self: Sized;
}

pub trait Object: Packable {
    fn object_type(&self) -> ObjectType;

    fn object_id(&self) -> Result<ObjectId> {
        let content = self.serialize()?;
        Ok(hash_bytes(&content))
    }
}

/// SHA-1 digest of an exact byte sequence
pub fn hash_bytes(content: &[u8]) -> ObjectId {
    let mut hasher = Sha1::new();
    hasher.update(content);

    // a SHA-1 digest rendered as lowercase hex is always a valid id
    ObjectId::try_parse(format!("{:x}", hasher.finalize())).unwrap_or_default()
}

/// Frame a payload as `<type> <len>\0<payload>`
pub fn frame(object_type: ObjectType, payload: &[u8]) -> Bytes {
    let header = format!("{} {}\0", object_type.as_str(), payload.len());

    let mut framed = Vec::with_capacity(header.len() + payload.len());
    framed.extend_from_slice(header.as_bytes());
    framed.extend_from_slice(payload);

    Bytes::from(framed)
}

pub enum ObjectBox {
    Blob(Box<Blob>),
    Commit(Box<Commit>),
}
