//! The per-commit analysis pipeline and the history-walker orchestrator.
//!
//! Each commit's analysis is a pure function of the immutable object store:
//! stats → primary file → before/after signals → delta → classification.
//! The orchestrator decides sequential vs. worker-pool execution; either
//! way the result sequence preserves the commit list order.

use std::fmt;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::SecondsFormat;
use commitlens_astlens::{extract_signal, Dialect, ParseOutcome};
use commitlens_core::{AnalysisConfig, Classification, CommitlensError, Label};
use commitlens_gitscan::history::{list_history, CommitMeta, HistoryOptions};
use commitlens_gitscan::snapshot::read_text;
use commitlens_gitscan::stats::{file_stats, FileStat};
use git2::Repository;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::delta::reduce;
use crate::rules::{classify, CommitSignals};
use crate::select::{is_analyzable, is_doc_path, select_primary};

/// Options for one analysis run.
///
/// # Examples
///
/// ```
/// use commitlens_classify::AnalysisOptions;
///
/// let opts = AnalysisOptions::default();
/// assert_eq!(opts.limit, 100);
/// assert!(opts.parallel);
/// ```
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    /// Analyze at most this many of the most recent commits.
    pub limit: usize,
    /// Cap on source text fed to the structural parser; larger snapshots
    /// degrade to a zero signal.
    pub max_parse_bytes: usize,
    /// Run the per-commit pipeline across a rayon worker pool.
    pub parallel: bool,
    /// Branch to walk instead of HEAD.
    pub branch: Option<String>,
    /// Cooperative abort flag, checked before each commit's pipeline.
    pub abort: Option<Arc<AtomicBool>>,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self::from_config(&AnalysisConfig::default())
    }
}

impl AnalysisOptions {
    /// Build options from a loaded [`AnalysisConfig`].
    ///
    /// # Examples
    ///
    /// ```
    /// use commitlens_classify::AnalysisOptions;
    /// use commitlens_core::AnalysisConfig;
    ///
    /// let config = AnalysisConfig {
    ///     limit: 10,
    ///     ..AnalysisConfig::default()
    /// };
    /// let opts = AnalysisOptions::from_config(&config);
    /// assert_eq!(opts.limit, 10);
    /// ```
    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self {
            limit: config.limit,
            max_parse_bytes: config.max_parse_bytes,
            parallel: config.parallel,
            branch: config.branch.clone(),
            abort: None,
        }
    }
}

/// One analyzed commit in the output sequence.
///
/// # Examples
///
/// ```
/// use commitlens_classify::CommitRecord;
/// use commitlens_core::Label;
///
/// let record = CommitRecord {
///     hash: "abc123".into(),
///     message: "add feature".into(),
///     date: "2024-01-02T03:04:05Z".into(),
///     label: Label::Major,
///     score: 5,
///     reasons: vec!["Public API changed".into()],
///     only_docs_changed: false,
///     structural_analysis_applied: true,
/// };
/// assert_eq!(record.label, Label::Major);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitRecord {
    /// Full commit hash.
    pub hash: String,
    /// First line of the commit message.
    pub message: String,
    /// Commit timestamp, RFC 3339.
    pub date: String,
    /// Major or minor verdict.
    pub label: Label,
    /// Accumulated rule weight.
    pub score: u32,
    /// One entry per triggered rule, in rule order.
    pub reasons: Vec<String>,
    /// Every touched path was markdown or readme-named.
    pub only_docs_changed: bool,
    /// False when the commit was classified from line counts alone.
    pub structural_analysis_applied: bool,
}

/// The ordered result of one analysis run.
///
/// `commits` is truncated to the run's limit; `total_commits` is the full
/// (never limited) history length.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    /// Full history length, independent of the limit.
    pub total_commits: usize,
    /// Analyzed commits, newest first, in commit-list order.
    pub commits: Vec<CommitRecord>,
}

/// Analyze the most recent commits of the repository at `repo_path`.
///
/// Walks history newest-first, runs the per-commit pipeline on the first
/// `limit` commits, and returns records in the same order. A commit that
/// cannot be analyzed (bad object, unreadable tree) degrades to a
/// line-count-free record rather than aborting the run; only a repository
/// that cannot be opened or listed at all is fatal.
///
/// # Errors
///
/// Returns [`CommitlensError::Git`] if the repository cannot be discovered
/// or its history cannot be listed.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use commitlens_classify::{analyze, AnalysisOptions};
///
/// let report = analyze(Path::new("."), &AnalysisOptions::default()).unwrap();
/// for record in &report.commits {
///     println!("{} {} ({})", &record.hash[..7], record.label, record.score);
/// }
/// ```
pub fn analyze(repo_path: &Path, options: &AnalysisOptions) -> Result<AnalysisReport, CommitlensError> {
    let repo = Repository::discover(repo_path).map_err(|e| {
        CommitlensError::Git(format!(
            "failed to open repository at {}: {e}",
            repo_path.display()
        ))
    })?;

    let history_options = HistoryOptions {
        branch: options.branch.clone(),
    };
    let commits = list_history(&repo, &history_options)?;
    let total_commits = commits.len();
    let window = &commits[..total_commits.min(options.limit)];

    let records = if options.parallel {
        analyze_parallel(&repo, window, options)?
    } else {
        let mut records = Vec::with_capacity(window.len());
        for commit in window {
            if aborted(options) {
                break;
            }
            records.push(analyze_commit(&repo, commit, options));
        }
        records
    };

    Ok(AnalysisReport {
        total_commits,
        commits: records,
    })
}

/// Run the per-commit pipeline for one commit.
///
/// Never fails: a store error while analyzing this commit degrades it to
/// the lowest-signal outcome (zero deltas, `structural_analysis_applied =
/// false`) so one ill-formed object cannot block the rest of the history.
pub fn analyze_commit(
    repo: &Repository,
    commit: &CommitMeta,
    options: &AnalysisOptions,
) -> CommitRecord {
    let signals = signals_for_commit(repo, commit, options).unwrap_or_else(|e| {
        log::warn!("degrading commit {}: {e}", short_hash(&commit.hash));
        CommitSignals::default()
    });

    let Classification {
        label,
        score,
        reasons,
    } = classify(&signals);

    CommitRecord {
        hash: commit.hash.clone(),
        message: commit.message.clone(),
        date: format_date(commit.timestamp),
        label,
        score,
        reasons,
        only_docs_changed: signals.only_docs_changed,
        structural_analysis_applied: signals.structural_analysis_applied,
    }
}

/// Compute the aggregated signals for one commit.
///
/// # Errors
///
/// Returns [`CommitlensError::Git`] on object-store failures; missing
/// files and parse failures are absorbed into the signals instead.
pub fn signals_for_commit(
    repo: &Repository,
    commit: &CommitMeta,
    options: &AnalysisOptions,
) -> Result<CommitSignals, CommitlensError> {
    let stats = file_stats(repo, commit)?;
    let loc_added: u64 = stats.iter().map(|s| s.added).sum();
    let loc_removed: u64 = stats.iter().map(|s| s.removed).sum();
    let files_changed = stats.len();

    let line_level = |only_docs_changed: bool| CommitSignals {
        loc_added,
        loc_removed,
        files_changed,
        only_docs_changed,
        ..CommitSignals::default()
    };

    let candidates: Vec<&FileStat> = stats.iter().filter(|s| is_analyzable(&s.path)).collect();
    if candidates.is_empty() {
        let only_docs = stats.iter().all(|s| is_doc_path(&s.path));
        return Ok(line_level(only_docs));
    }

    let parent = commit.parents.first().map(String::as_str);
    let Some(primary) = select_primary(repo, &commit.hash, parent, &candidates)? else {
        return Ok(line_level(false));
    };

    let before = match parent {
        Some(parent) => read_text(repo, parent, &primary.path)?,
        None => None,
    };
    let after = read_text(repo, &commit.hash, &primary.path)?;

    let dialect = Path::new(&primary.path)
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(Dialect::from_extension);

    let before_signal = before
        .as_deref()
        .map(|text| parse_capped(text, dialect, options.max_parse_bytes).signal());
    let after_signal = after
        .as_deref()
        .map(|text| parse_capped(text, dialect, options.max_parse_bytes).signal());

    let delta = reduce(before_signal, after_signal);

    Ok(CommitSignals {
        loc_added,
        loc_removed,
        functions_delta: delta.functions,
        exports_delta: delta.exports,
        classes_delta: delta.classes,
        branches_delta: delta.branches,
        files_changed,
        only_docs_changed: false,
        structural_analysis_applied: true,
    })
}

fn parse_capped(text: &str, dialect: Option<Dialect>, max_bytes: usize) -> ParseOutcome {
    match dialect {
        Some(dialect) if text.len() <= max_bytes => extract_signal(text, dialect),
        _ => ParseOutcome::Failed,
    }
}

fn analyze_parallel(
    repo: &Repository,
    window: &[CommitMeta],
    options: &AnalysisOptions,
) -> Result<Vec<CommitRecord>, CommitlensError> {
    let git_dir = repo.path().to_path_buf();

    // Each worker holds its own repository handle; ordered collect keeps
    // the commit-list order.
    let results: Result<Vec<Option<CommitRecord>>, CommitlensError> = window
        .par_iter()
        .map_init(
            || Repository::open(&git_dir),
            |worker, commit| match worker {
                Ok(repo) => {
                    if aborted(options) {
                        return Ok(None);
                    }
                    Ok(Some(analyze_commit(repo, commit, options)))
                }
                Err(e) => Err(CommitlensError::Git(format!(
                    "failed to reopen repository: {e}"
                ))),
            },
        )
        .collect();

    Ok(results?.into_iter().flatten().collect())
}

fn aborted(options: &AnalysisOptions) -> bool {
    options
        .abort
        .as_ref()
        .is_some_and(|flag| flag.load(Ordering::Relaxed))
}

fn format_date(timestamp: i64) -> String {
    chrono::DateTime::from_timestamp(timestamp, 0)
        .unwrap_or(chrono::DateTime::UNIX_EPOCH)
        .to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn short_hash(hash: &str) -> &str {
    &hash[..hash.len().min(8)]
}

impl AnalysisReport {
    fn label_counts(&self) -> (usize, usize) {
        let major = self
            .commits
            .iter()
            .filter(|c| c.label == Label::Major)
            .count();
        (major, self.commits.len() - major)
    }

    fn has_degraded(&self) -> bool {
        self.commits.iter().any(|c| !c.structural_analysis_applied)
    }

    /// Render the report as a markdown string.
    ///
    /// # Examples
    ///
    /// ```
    /// use commitlens_classify::AnalysisReport;
    ///
    /// let report = AnalysisReport { total_commits: 0, commits: vec![] };
    /// let md = report.to_markdown();
    /// assert!(md.contains("# Commit Classification"));
    /// ```
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        out.push_str("# Commit Classification\n\n");

        if !self.commits.is_empty() {
            out.push_str("| Commit | Date | Label | Score | Message | Reasons |\n");
            out.push_str("|--------|------|-------|-------|---------|---------|\n");
            for record in &self.commits {
                let marker = if record.structural_analysis_applied {
                    ""
                } else {
                    "\\*"
                };
                out.push_str(&format!(
                    "| {} | {} | {}{} | {} | {} | {} |\n",
                    short_hash(&record.hash),
                    record.date.get(..10).unwrap_or(&record.date),
                    record.label,
                    marker,
                    record.score,
                    record.message,
                    record.reasons.join("; "),
                ));
            }
            out.push('\n');
        }

        let (major, minor) = self.label_counts();
        out.push_str(&format!(
            "**Summary:** {} of {} commits analyzed ({} major, {} minor)\n",
            self.commits.len(),
            self.total_commits,
            major,
            minor,
        ));
        if self.has_degraded() {
            out.push_str("\n\\* classified from line counts only\n");
        }
        out
    }
}

impl fmt::Display for AnalysisReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Commit Classification")?;
        writeln!(f, "=====================")?;

        if !self.commits.is_empty() {
            writeln!(
                f,
                "{:<10} {:<12} {:<7} {:>5}  {}",
                "Commit", "Date", "Label", "Score", "Message"
            )?;
            writeln!(f, "{}", "-".repeat(70))?;
            for record in &self.commits {
                let marker = if record.structural_analysis_applied {
                    ""
                } else {
                    "*"
                };
                writeln!(
                    f,
                    "{:<10} {:<12} {:<7} {:>5}  {}",
                    short_hash(&record.hash),
                    record.date.get(..10).unwrap_or(&record.date),
                    format!("{}{marker}", record.label),
                    record.score,
                    record.message,
                )?;
                if !record.reasons.is_empty() {
                    writeln!(f, "{:>37}  {}", "", record.reasons.join("; "))?;
                }
            }
        }

        let (major, minor) = self.label_counts();
        writeln!(
            f,
            "\nSummary: {} of {} commits analyzed ({} major, {} minor)",
            self.commits.len(),
            self.total_commits,
            major,
            minor,
        )?;
        if self.has_degraded() {
            writeln!(f, "* classified from line counts only")?;
        }
        Ok(())
    }
}
