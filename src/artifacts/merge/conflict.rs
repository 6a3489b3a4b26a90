use bytes::{BufMut, Bytes, BytesMut};

const HEAD_MARKER: &[u8] = b"<<<<<<< HEAD\n";
const SEPARATOR_MARKER: &[u8] = b"=======\n";
const END_MARKER: &[u8] = b">>>>>>>\n";

/// Build the content of a conflicted file
///
/// An absent side contributes no bytes. Contents are inserted verbatim, so a
/// side without a trailing newline runs into the following marker.
pub fn conflict_content(head: Option<&[u8]>, target: Option<&[u8]>) -> Bytes {
    let head = head.unwrap_or_default();
    let target = target.unwrap_or_default();

    let mut content = BytesMut::with_capacity(
        HEAD_MARKER.len() + head.len() + SEPARATOR_MARKER.len() + target.len() + END_MARKER.len(),
    );
    content.put_slice(HEAD_MARKER);
    content.put_slice(head);
    content.put_slice(SEPARATOR_MARKER);
    content.put_slice(target);
    content.put_slice(END_MARKER);

    content.freeze()
}
