use std::path::Path;
use std::process::Command;

use git2::{IndexAddOption, Repository, Signature, Time};

fn commit_files(repo: &Repository, files: &[(&str, &str)], message: &str, timestamp: i64) {
    let workdir = repo.workdir().unwrap();
    for (path, content) in files {
        let full = workdir.join(path);
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&full, content).unwrap();
    }

    let mut index = repo.index().unwrap();
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
        .unwrap();
}

fn fixture_repo(dir: &Path) {
    let repo = Repository::init(dir).unwrap();
    commit_files(&repo, &[("README.md", "# demo\n")], "initial docs", 1_700_000_000);
    commit_files(
        &repo,
        &[(
            "src/x.ts",
            "export function shout(msg: string): string {\n    return msg.toUpperCase();\n}\n",
        )],
        "add shout helper",
        1_700_000_100,
    );
    commit_files(
        &repo,
        &[("README.md", "# demo\n\nUsage notes.\n")],
        "expand readme",
        1_700_000_200,
    );
}

#[test]
fn analyze_labels_commits_in_order() {
    let dir = tempfile::tempdir().unwrap();
    fixture_repo(dir.path());

    let output = Command::new(env!("CARGO_BIN_EXE_commitlens"))
        .arg("analyze")
        .arg(dir.path())
        .args(["--format", "json"])
        .output()
        .unwrap();

    assert!(
        output.status.success(),
        "commitlens analyze failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["totalCommits"], 3);

    let commits = report["commits"].as_array().unwrap();
    assert_eq!(commits.len(), 3);

    // Newest first: docs tweak, then the export, then the root docs commit
    let docs = &commits[0];
    assert_eq!(docs["message"], "expand readme");
    assert_eq!(docs["label"], "minor");
    assert_eq!(docs["score"], 0);
    assert_eq!(docs["onlyDocsChanged"], true);
    assert_eq!(docs["structuralAnalysisApplied"], false);

    let export = &commits[1];
    assert_eq!(export["message"], "add shout helper");
    assert_eq!(export["label"], "major");
    assert_eq!(export["score"], 5);
    assert_eq!(
        export["reasons"],
        serde_json::json!(["Public API changed", "New functions introduced"])
    );
    assert_eq!(export["structuralAnalysisApplied"], true);

    let root = &commits[2];
    assert_eq!(root["message"], "initial docs");
    assert_eq!(root["label"], "minor");
    assert_eq!(root["onlyDocsChanged"], true);
}

#[test]
fn analyze_respects_limit() {
    let dir = tempfile::tempdir().unwrap();
    fixture_repo(dir.path());

    let output = Command::new(env!("CARGO_BIN_EXE_commitlens"))
        .arg("analyze")
        .arg(dir.path())
        .args(["--limit", "1", "--format", "json"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["totalCommits"], 3);
    assert_eq!(report["commits"].as_array().unwrap().len(), 1);
    assert_eq!(report["commits"][0]["message"], "expand readme");
}

#[test]
fn analyze_text_output_marks_degraded_rows() {
    let dir = tempfile::tempdir().unwrap();
    fixture_repo(dir.path());

    let output = Command::new(env!("CARGO_BIN_EXE_commitlens"))
        .arg("analyze")
        .arg(dir.path())
        .output()
        .unwrap();

    assert!(output.status.success());
    let text = String::from_utf8_lossy(&output.stdout);
    assert!(text.contains("Commit Classification"));
    assert!(text.contains("major"));
    assert!(text.contains("minor*"));
    assert!(text.contains("classified from line counts only"));
    assert!(text.contains("3 of 3 commits analyzed"));
}

#[test]
fn analyze_fails_cleanly_outside_a_repository() {
    let dir = tempfile::tempdir().unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_commitlens"))
        .arg("analyze")
        .arg(dir.path())
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("git error"), "stderr: {stderr}");
}
