use crate::artifacts::objects::commit::Commit;
use crate::errors::GitletError;

/// Working files that the given commit does not track
pub fn untracked_files<'w>(working_files: &'w [String], head: &Commit) -> Vec<&'w str> {
    working_files
        .iter()
        .map(String::as_str)
        .filter(|name| !head.has_file(name))
        .collect()
}

/// Refuse to switch commits while any working file is untracked by head
///
/// A full switch deletes every file the destination does not track and
/// overwrites the rest, so untracked content would be lost either way.
pub fn ensure_no_untracked_files(working_files: &[String], head: &Commit) -> anyhow::Result<()> {
    let untracked = untracked_files(working_files, head);

    if untracked.is_empty() {
        Ok(())
    } else {
        Err(GitletError::UntrackedFileConflict(
            untracked.into_iter().map(str::to_string).collect(),
        )
        .into())
    }
}

/// Refuse to write over untracked working files
///
/// Unlike [`ensure_no_untracked_files`], only the files named in `overwritten`
/// are considered.
pub fn ensure_not_overwritten<'a>(
    working_files: &[String],
    head: &Commit,
    overwritten: impl IntoIterator<Item = &'a str>,
) -> anyhow::Result<()> {
    let untracked = untracked_files(working_files, head);
    let in_the_way = overwritten
        .into_iter()
        .filter(|name| untracked.contains(name))
        .map(str::to_string)
        .collect::<Vec<_>>();

    if in_the_way.is_empty() {
        Ok(())
    } else {
        Err(GitletError::UntrackedFileConflict(in_the_way).into())
    }
}
