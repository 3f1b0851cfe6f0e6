//! Primary-file selection and path predicates.
//!
//! One file per commit drives structural analysis. Eligibility is a fixed
//! allow-list of JS/TS-family extensions; among eligible files the first
//! one (in the stats' path order) that resolves at either snapshot wins.

use std::path::Path;

use commitlens_core::CommitlensError;
use commitlens_gitscan::snapshot::read_blob;
use commitlens_gitscan::stats::FileStat;
use git2::Repository;

/// Extensions eligible for structural analysis.
pub const ANALYZABLE_EXTENSIONS: [&str; 8] =
    ["ts", "tsx", "js", "jsx", "mts", "cts", "mjs", "cjs"];

/// Whether `path` has an extension on the structural-analysis allow-list.
///
/// # Examples
///
/// ```
/// use commitlens_classify::select::is_analyzable;
///
/// assert!(is_analyzable("src/app.ts"));
/// assert!(is_analyzable("components/Button.tsx"));
/// assert!(!is_analyzable("main.py"));
/// assert!(!is_analyzable("notes.ts.bak"));
/// ```
pub fn is_analyzable(path: &str) -> bool {
    Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ANALYZABLE_EXTENSIONS.contains(&ext))
}

/// Whether `path` looks like documentation: a markdown file, or any path
/// containing a case-insensitive `readme` token.
///
/// # Examples
///
/// ```
/// use commitlens_classify::select::is_doc_path;
///
/// assert!(is_doc_path("docs/guide.md"));
/// assert!(is_doc_path("README"));
/// assert!(is_doc_path("packages/ui/ReadMe.txt"));
/// assert!(!is_doc_path("src/app.ts"));
/// ```
pub fn is_doc_path(path: &str) -> bool {
    let lower = path.to_lowercase();
    lower.ends_with(".md") || lower.contains("readme")
}

/// Pick the primary file for structural analysis.
///
/// Scans `candidates` in order and returns the first one that exists at
/// either the commit snapshot or the parent snapshot. Candidates that
/// resolve at neither side (e.g. stat entries left behind by unreconciled
/// renames) are skipped; `None` means the commit degrades to line-level
/// classification.
///
/// # Errors
///
/// Returns [`CommitlensError::Git`] if the object store fails while
/// probing; a missing path is not an error.
pub fn select_primary<'a>(
    repo: &Repository,
    commit_id: &str,
    parent_id: Option<&str>,
    candidates: &[&'a FileStat],
) -> Result<Option<&'a FileStat>, CommitlensError> {
    for candidate in candidates {
        if read_blob(repo, commit_id, &candidate.path)?.is_some() {
            return Ok(Some(candidate));
        }
        if let Some(parent) = parent_id {
            if read_blob(repo, parent, &candidate.path)?.is_some() {
                return Ok(Some(candidate));
            }
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analyzable_extensions_cover_the_js_ts_family() {
        for path in [
            "a.ts", "a.tsx", "a.js", "a.jsx", "a.mts", "a.cts", "a.mjs", "a.cjs",
        ] {
            assert!(is_analyzable(path), "{path} should be analyzable");
        }
        for path in ["a.py", "a.rs", "a.md", "a.json", "Makefile", "a"] {
            assert!(!is_analyzable(path), "{path} should not be analyzable");
        }
    }

    #[test]
    fn doc_predicate_matches_markdown_and_readme_tokens() {
        assert!(is_doc_path("README.md"));
        assert!(is_doc_path("readme"));
        assert!(is_doc_path("docs/API.md"));
        assert!(is_doc_path("sub/README.rst"));
        assert!(is_doc_path("GUIDE.MD"));
        assert!(!is_doc_path("src/index.ts"));
        assert!(!is_doc_path("assets/logo.png"));
    }

    #[test]
    fn markdown_named_readme_still_counts_once() {
        // Both halves of the predicate can match; the result is still true.
        assert!(is_doc_path("docs/readme.md"));
    }
}
