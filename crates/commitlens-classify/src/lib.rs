//! Commit classification: primary-file selection, structural deltas, the
//! heuristic rule engine, and the per-commit analysis pipeline.
//!
//! The pipeline combines line-level statistics from `commitlens-gitscan`
//! with before/after structural signals from `commitlens-astlens` and
//! reduces them to a deterministic major/minor verdict per commit.

pub mod delta;
pub mod pipeline;
pub mod rules;
pub mod select;

pub use delta::StructuralDelta;
pub use pipeline::{analyze, analyze_commit, AnalysisOptions, AnalysisReport, CommitRecord};
pub use rules::{classify, CommitSignals, LARGE_CHANGE_LINES, MAJOR_THRESHOLD};
