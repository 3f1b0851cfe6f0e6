//! Read-only git history access: commit listing, snapshot reads, and
//! per-file line statistics.
//!
//! Every function in this crate takes an already-opened [`git2::Repository`]
//! as an explicit read-only capability and never writes to the object store.

pub mod history;
pub mod snapshot;
pub mod stats;

#[cfg(test)]
pub(crate) mod fixtures {
    use std::path::Path;

    use git2::{IndexAddOption, Repository, Signature, Time};

    /// Initialize a throwaway repository in `dir`.
    pub fn init_repo(dir: &Path) -> Repository {
        Repository::init(dir).unwrap()
    }

    /// Write `files` into the work tree, stage everything (including
    /// removals in `remove`), and commit with a deterministic author and
    /// the given timestamp. Returns the new commit's full hash.
    pub fn commit_files(
        repo: &Repository,
        files: &[(&str, &str)],
        remove: &[&str],
        message: &str,
        timestamp: i64,
    ) -> String {
        let workdir = repo.workdir().unwrap();
        for (path, content) in files {
            let full = workdir.join(path);
            if let Some(parent) = full.parent() {
                std::fs::create_dir_all(parent).unwrap();
            }
            std::fs::write(&full, content).unwrap();
        }
        for path in remove {
            let full = workdir.join(path);
            if full.exists() {
                std::fs::remove_file(&full).unwrap();
            }
        }

        let mut index = repo.index().unwrap();
        for path in remove {
            index.remove_path(Path::new(path)).unwrap();
        }
        index
            .add_all(["*"].iter(), IndexAddOption::DEFAULT, None)
            .unwrap();
        index.write().unwrap();
        let tree_id = index.write_tree().unwrap();
        let tree = repo.find_tree(tree_id).unwrap();

        let sig = Signature::new("Alice", "alice@example.com", &Time::new(timestamp, 0)).unwrap();
        let parent = repo
            .head()
            .ok()
            .and_then(|head| head.target())
            .map(|oid| repo.find_commit(oid).unwrap());
        let parents: Vec<&git2::Commit> = parent.iter().collect();

        repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .unwrap()
            .to_string()
    }
}
