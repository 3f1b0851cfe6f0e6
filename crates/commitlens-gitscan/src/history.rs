//! Commit listing via a git2 revwalk.
//!
//! Produces [`CommitMeta`] records in reverse-chronological order (newest
//! first), each carrying its parent links so downstream stages can diff
//! against the designated first parent.

use commitlens_core::CommitlensError;
use git2::{Repository, Sort};

/// Metadata for one commit in the walked history.
///
/// Immutable once read; the analysis run owns the full list for its
/// lifetime and per-commit stages only borrow entries.
///
/// # Examples
///
/// ```
/// use commitlens_gitscan::history::CommitMeta;
///
/// let meta = CommitMeta {
///     hash: "a".repeat(40),
///     parents: vec![],
///     author: "alice".into(),
///     timestamp: 1_700_000_000,
///     message: "initial commit".into(),
/// };
/// assert!(meta.parents.is_empty(), "root commit has no parents");
/// ```
#[derive(Debug, Clone)]
pub struct CommitMeta {
    /// Full commit hash.
    pub hash: String,
    /// Parent hashes in order; empty for a root commit, more than one for
    /// a merge. The first entry is the diff baseline.
    pub parents: Vec<String>,
    /// Author name.
    pub author: String,
    /// Unix timestamp of the commit.
    pub timestamp: i64,
    /// First line of the commit message.
    pub message: String,
}

/// Options for history listing.
///
/// # Examples
///
/// ```
/// use commitlens_gitscan::history::HistoryOptions;
///
/// let opts = HistoryOptions::default();
/// assert!(opts.branch.is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct HistoryOptions {
    /// Branch to walk (default: HEAD).
    pub branch: Option<String>,
}

/// List the repository's commit history, newest first.
///
/// The full history is returned; callers that only analyze the most recent
/// N commits still use the untruncated length as the reported history size.
///
/// # Errors
///
/// Returns [`CommitlensError::Git`] if the revwalk cannot be created or the
/// requested branch does not resolve.
///
/// # Examples
///
/// ```no_run
/// use git2::Repository;
/// use commitlens_gitscan::history::{list_history, HistoryOptions};
///
/// let repo = Repository::discover(".").unwrap();
/// let commits = list_history(&repo, &HistoryOptions::default()).unwrap();
/// for c in commits.iter().take(5) {
///     println!("{} {}", &c.hash[..7], c.message);
/// }
/// ```
pub fn list_history(
    repo: &Repository,
    options: &HistoryOptions,
) -> Result<Vec<CommitMeta>, CommitlensError> {
    let mut revwalk = repo
        .revwalk()
        .map_err(|e| CommitlensError::Git(format!("failed to create revwalk: {e}")))?;

    revwalk.set_sorting(Sort::TIME).ok();

    if let Some(ref branch) = options.branch {
        let reference = repo
            .resolve_reference_from_short_name(branch)
            .map_err(|e| CommitlensError::Git(format!("failed to resolve branch '{branch}': {e}")))?;
        let oid = reference
            .target()
            .ok_or_else(|| CommitlensError::Git("branch has no target".into()))?;
        revwalk
            .push(oid)
            .map_err(|e| CommitlensError::Git(format!("failed to push oid: {e}")))?;
    } else {
        revwalk
            .push_head()
            .map_err(|e| CommitlensError::Git(format!("failed to push HEAD: {e}")))?;
    }

    let mut commits = Vec::new();
    for oid_result in revwalk {
        let oid = oid_result.map_err(|e| CommitlensError::Git(format!("revwalk error: {e}")))?;

        let commit = repo
            .find_commit(oid)
            .map_err(|e| CommitlensError::Git(format!("failed to find commit: {e}")))?;

        let author = commit.author();
        commits.push(CommitMeta {
            hash: oid.to_string(),
            parents: commit.parent_ids().map(|p| p.to_string()).collect(),
            author: author.name().unwrap_or("unknown").to_string(),
            timestamp: commit.time().seconds(),
            message: commit
                .message()
                .unwrap_or("")
                .lines()
                .next()
                .unwrap_or("")
                .to_string(),
        });
    }

    Ok(commits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{commit_files, init_repo};

    #[test]
    fn lists_commits_newest_first_with_parent_links() {
        let dir = tempfile::tempdir().unwrap();
        let repo = init_repo(dir.path());
        let first = commit_files(&repo, &[("a.txt", "one\n")], &[], "first", 1000);
        let second = commit_files(&repo, &[("a.txt", "one\ntwo\n")], &[], "second", 2000);

        let commits = list_history(&repo, &HistoryOptions::default()).unwrap();
        assert_eq!(commits.len(), 2);
        assert_eq!(commits[0].hash, second);
        assert_eq!(commits[1].hash, first);

        // Root commit has no parents, the second points back at the first
        assert!(commits[1].parents.is_empty());
        assert_eq!(commits[0].parents, vec![first]);
        assert_eq!(commits[0].author, "Alice");
        assert_eq!(commits[0].message, "second");
    }

    #[test]
    fn message_is_first_line_only() {
        let dir = tempfile::tempdir().unwrap();
        let repo = init_repo(dir.path());
        commit_files(
            &repo,
            &[("a.txt", "x\n")],
            &[],
            "subject line\n\nlong body\nmore body",
            1000,
        );

        let commits = list_history(&repo, &HistoryOptions::default()).unwrap();
        assert_eq!(commits[0].message, "subject line");
    }

    #[test]
    fn unknown_branch_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let repo = init_repo(dir.path());
        commit_files(&repo, &[("a.txt", "x\n")], &[], "first", 1000);

        let opts = HistoryOptions {
            branch: Some("no-such-branch".into()),
        };
        assert!(list_history(&repo, &opts).is_err());
    }
}
