//! Per-file line statistics for one commit against its first parent.
//!
//! Walks both tree snapshots path-by-path instead of materializing a
//! textual diff: line counts come from comparing newline-delimited segment
//! counts between the before and after blob, which keeps whole-file
//! creation and deletion a degenerate case of the same formula.

use std::collections::BTreeMap;

use commitlens_core::CommitlensError;
use git2::{ObjectType, Oid, Repository, Tree, TreeWalkMode, TreeWalkResult};

use crate::history::CommitMeta;

/// Added/removed line counts for one touched path.
///
/// A binary or non-text file that cannot be line-diffed reports `0/0`
/// rather than failing.
///
/// # Examples
///
/// ```
/// use commitlens_gitscan::stats::FileStat;
///
/// let stat = FileStat {
///     path: "src/app.ts".into(),
///     added: 3,
///     removed: 1,
/// };
/// assert_eq!(stat.added, 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStat {
    /// File path relative to the repository root.
    pub path: String,
    /// Non-negative line growth relative to the first parent.
    pub added: u64,
    /// Non-negative line shrinkage relative to the first parent.
    pub removed: u64,
}

/// Compute per-file statistics for `commit` against its first parent.
///
/// Root commits are diffed against the empty tree, so every file counts as
/// fully added. Paths whose content is unchanged are excluded; the returned
/// order is path-sorted, which is the selector's "natural" scan order.
///
/// # Errors
///
/// Returns [`CommitlensError::Git`] if the commit or either tree cannot be
/// read from the object store.
///
/// # Examples
///
/// ```no_run
/// use git2::Repository;
/// use commitlens_gitscan::history::{list_history, HistoryOptions};
/// use commitlens_gitscan::stats::file_stats;
///
/// let repo = Repository::discover(".").unwrap();
/// let commits = list_history(&repo, &HistoryOptions::default()).unwrap();
/// let stats = file_stats(&repo, &commits[0]).unwrap();
/// for s in &stats {
///     println!("{}: +{} -{}", s.path, s.added, s.removed);
/// }
/// ```
pub fn file_stats(
    repo: &Repository,
    commit: &CommitMeta,
) -> Result<Vec<FileStat>, CommitlensError> {
    let after_tree = tree_of(repo, &commit.hash)?;
    let before_tree = match commit.parents.first() {
        Some(parent) => Some(tree_of(repo, parent)?),
        None => None,
    };

    let after_blobs = collect_blobs(&after_tree);
    let before_blobs = match &before_tree {
        Some(tree) => collect_blobs(tree),
        None => BTreeMap::new(),
    };

    // Union of both sides in path order.
    let mut paths: Vec<&String> = before_blobs.keys().chain(after_blobs.keys()).collect();
    paths.sort();
    paths.dedup();

    let mut stats = Vec::new();
    for path in paths {
        let before_oid = before_blobs.get(path).copied();
        let after_oid = after_blobs.get(path).copied();

        // Content unchanged: same object on both sides.
        if before_oid.is_some() && before_oid == after_oid {
            continue;
        }

        let (before_lines, before_binary) = blob_lines(repo, before_oid)?;
        let (after_lines, after_binary) = blob_lines(repo, after_oid)?;

        let (added, removed) = if before_binary || after_binary {
            (0, 0)
        } else {
            (
                after_lines.saturating_sub(before_lines),
                before_lines.saturating_sub(after_lines),
            )
        };

        stats.push(FileStat {
            path: path.clone(),
            added,
            removed,
        });
    }

    Ok(stats)
}

fn tree_of<'repo>(repo: &'repo Repository, commit_id: &str) -> Result<Tree<'repo>, CommitlensError> {
    let oid = Oid::from_str(commit_id)
        .map_err(|e| CommitlensError::Git(format!("invalid commit id '{commit_id}': {e}")))?;
    let commit = repo
        .find_commit(oid)
        .map_err(|e| CommitlensError::Git(format!("failed to find commit {commit_id}: {e}")))?;
    commit
        .tree()
        .map_err(|e| CommitlensError::Git(format!("failed to get tree: {e}")))
}

/// Collect every blob in `tree`, keyed by full path.
fn collect_blobs(tree: &Tree<'_>) -> BTreeMap<String, Oid> {
    let mut blobs = BTreeMap::new();
    let _ = tree.walk(TreeWalkMode::PreOrder, |root, entry| {
        if entry.kind() == Some(ObjectType::Blob) {
            if let Some(name) = entry.name() {
                blobs.insert(format!("{root}{name}"), entry.id());
            }
        }
        TreeWalkResult::Ok
    });
    blobs
}

/// Newline-delimited segment count for one side of the comparison.
///
/// Absent text is the empty string (one segment), so whole-file creation
/// and deletion fall out of the same subtraction. The boolean reports
/// whether the blob looked binary.
fn blob_lines(repo: &Repository, oid: Option<Oid>) -> Result<(u64, bool), CommitlensError> {
    let Some(oid) = oid else {
        return Ok((segment_count(""), false));
    };
    let blob = repo
        .find_blob(oid)
        .map_err(|e| CommitlensError::Git(format!("failed to read blob {oid}: {e}")))?;
    if blob.is_binary() {
        return Ok((0, true));
    }
    let text = String::from_utf8_lossy(blob.content()).into_owned();
    Ok((segment_count(&text), false))
}

fn segment_count(text: &str) -> u64 {
    text.split('\n').count() as u64
}
