use chrono::Utc;
use std::path::{Path, PathBuf};

use crate::artifact::ArtifactStore;
use crate::config::AppConfig;
use crate::error::Result;
use crate::github::{GitHubClient, Host};
use crate::report;
use crate::snapshot::Snapshot;

/// Run one report cycle: fetch, classify, render, then print or persist.
///
/// Fail-open: API trouble degrades to empty sections, both documents are
/// always produced.
pub async fn run(config: &AppConfig, test_mode: bool) -> Result<()> {
    let client = GitHubClient::new(&config.github)?;
    let artifacts = ArtifactStore::new(&config.artifacts);

    let snapshot = Snapshot::collect(&client, &artifacts, Utc::now()).await;

    let brief = report::brief::render(&snapshot);
    let approvals = report::approvals::render(&snapshot);

    let brief_filename = format!("BRIEF-{}.md", snapshot.date_stamp);
    let approvals_filename = format!("APPROVALS-{}.md", snapshot.date_stamp);

    if test_mode {
        print_test_output(&brief_filename, &brief);
        println!("\n");
        print_test_output(&approvals_filename, &approvals);
        return Ok(());
    }

    let brief_path = write_report(&config.output.brief_dir, &brief_filename, &brief)?;
    let approvals_path =
        write_report(&config.output.approvals_dir, &approvals_filename, &approvals)?;

    tracing::info!(path = %brief_path.display(), "brief written");
    tracing::info!(path = %approvals_path.display(), "approvals queue written");

    // key=value lines consumed by the downstream automation pipeline
    println!("brief_file={}", brief_path.display());
    println!("approvals_file={}", approvals_path.display());

    Ok(())
}

fn print_test_output(filename: &str, content: &str) {
    let banner = "=".repeat(60);
    println!("{banner}");
    println!("TEST MODE: {filename}");
    println!("{banner}");
    println!("{content}");
}

/// Whole-file overwrite into the report directory, creating it if needed.
fn write_report(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(filename);
    std::fs::write(&path, content)?;
    Ok(path)
}
