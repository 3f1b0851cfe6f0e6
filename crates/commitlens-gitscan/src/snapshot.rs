//! Snapshot reader: file content as it existed at one commit.
//!
//! A missing path is a first-class `None`, never an error; only a missing
//! or unreadable commit object surfaces as a failure. Reads are
//! side-effect-free and safe to issue concurrently against the same
//! repository object store.

use std::path::Path;

use commitlens_core::CommitlensError;
use git2::{ErrorCode, ObjectType, Oid, Repository};

/// Read the raw bytes of `path` as of `commit_id`.
///
/// Returns `Ok(None)` when the file does not exist at that snapshot, or
/// when the path resolves to something other than a blob (a directory or a
/// submodule).
///
/// # Errors
///
/// Returns [`CommitlensError::Git`] if `commit_id` is malformed or the
/// commit object cannot be read from the store.
///
/// # Examples
///
/// ```no_run
/// use git2::Repository;
/// use commitlens_gitscan::snapshot::read_blob;
///
/// let repo = Repository::discover(".").unwrap();
/// let head = repo.head().unwrap().target().unwrap().to_string();
/// let bytes = read_blob(&repo, &head, "Cargo.toml").unwrap();
/// assert!(bytes.is_some());
/// ```
pub fn read_blob(
    repo: &Repository,
    commit_id: &str,
    path: &str,
) -> Result<Option<Vec<u8>>, CommitlensError> {
    let oid = Oid::from_str(commit_id)
        .map_err(|e| CommitlensError::Git(format!("invalid commit id '{commit_id}': {e}")))?;
    let commit = repo
        .find_commit(oid)
        .map_err(|e| CommitlensError::Git(format!("failed to find commit {commit_id}: {e}")))?;
    let tree = commit
        .tree()
        .map_err(|e| CommitlensError::Git(format!("failed to get tree: {e}")))?;

    let entry = match tree.get_path(Path::new(path)) {
        Ok(entry) => entry,
        Err(e) if e.code() == ErrorCode::NotFound => return Ok(None),
        Err(e) => return Err(CommitlensError::Git(format!("failed to look up '{path}': {e}"))),
    };

    if entry.kind() != Some(ObjectType::Blob) {
        return Ok(None);
    }

    let blob = repo
        .find_blob(entry.id())
        .map_err(|e| CommitlensError::Git(format!("failed to read blob for '{path}': {e}")))?;
    Ok(Some(blob.content().to_vec()))
}

/// Read `path` as of `commit_id` as text.
///
/// Invalid UTF-8 sequences are replaced rather than rejected, matching the
/// lossy decode the structural parser expects; binary content simply fails
/// to parse downstream.
///
/// # Errors
///
/// Same failure modes as [`read_blob`].
pub fn read_text(
    repo: &Repository,
    commit_id: &str,
    path: &str,
) -> Result<Option<String>, CommitlensError> {
    Ok(read_blob(repo, commit_id, path)?.map(|bytes| String::from_utf8_lossy(&bytes).into_owned()))
}
