use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use regex::Regex;
use std::path::{Path, PathBuf};

use crate::config::ArtifactConfig;

const CREATED_AT_FORMAT: &str = "%Y-%m-%d %H:%M UTC";
const STALE_AFTER_DAYS: i64 = 7;

/// Verdict recorded by the external Trae review process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Approve,
    Reject,
    RequestChanges,
    EmergencyOverride,
    Unknown,
}

impl Verdict {
    fn parse(token: &str) -> Self {
        match token {
            "APPROVE" => Verdict::Approve,
            "REJECT" => Verdict::Reject,
            "REQUEST_CHANGES" => Verdict::RequestChanges,
            "EMERGENCY_OVERRIDE" => Verdict::EmergencyOverride,
            _ => Verdict::Unknown,
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let token = match self {
            Verdict::Approve => "APPROVE",
            Verdict::Reject => "REJECT",
            Verdict::RequestChanges => "REQUEST_CHANGES",
            Verdict::EmergencyOverride => "EMERGENCY_OVERRIDE",
            Verdict::Unknown => "UNKNOWN",
        };
        f.write_str(token)
    }
}

/// A parsed Trae review artifact file.
#[derive(Debug, Clone)]
pub struct ReviewArtifact {
    pub pr_number: Option<u64>,
    pub verdict: Verdict,
    pub created_at: Option<String>,
    pub path: PathBuf,
}

impl ReviewArtifact {
    /// An artifact is stale when its `created_at` is strictly older than seven
    /// days before `now`. Timestamps that fail to parse are not stale.
    pub fn is_stale(&self, now: DateTime<Utc>) -> bool {
        let Some(created_at) = &self.created_at else {
            return false;
        };
        match NaiveDateTime::parse_from_str(created_at, CREATED_AT_FORMAT) {
            Ok(created) => created.and_utc() < now - Duration::days(STALE_AFTER_DAYS),
            Err(_) => false,
        }
    }
}

/// Reads Trae review artifacts from the configured directory.
///
/// Artifact files are named `TRAE-<suffix>-<pr_number>.yml`; the
/// lexicographically last match is taken as the latest review for a PR.
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(config: &ArtifactConfig) -> Self {
        Self {
            dir: config.dir.clone(),
        }
    }

    /// Latest artifact for a pull request, or `None`. A missing directory,
    /// no matching file, or an unreadable file all mean "no artifact".
    pub fn latest_for_pr(&self, pr_number: u64) -> Option<ReviewArtifact> {
        if !self.dir.exists() {
            return None;
        }

        let suffix = format!("-{pr_number}.yml");
        let mut matches: Vec<PathBuf> = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries
                .filter_map(|e| e.ok())
                .map(|e| e.path())
                .filter(|p| {
                    p.file_name()
                        .and_then(|n| n.to_str())
                        .map(|n| n.starts_with("TRAE-") && n.ends_with(&suffix))
                        .unwrap_or(false)
                })
                .collect(),
            Err(e) => {
                tracing::error!(dir = %self.dir.display(), error = %e, "failed to list artifact dir");
                return None;
            }
        };

        matches.sort();
        let latest = matches.last()?;
        parse_artifact(latest)
    }
}

/// Extract the three artifact fields from loosely structured text.
fn parse_artifact(path: &Path) -> Option<ReviewArtifact> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "failed to read artifact");
            return None;
        }
    };

    let pr_re = Regex::new(r#"pr_number:\s*["']?(\d+)["']?"#).ok()?;
    let verdict_re = Regex::new(r#"verdict:\s*["']?([^"'\s\n]+)["']?"#).ok()?;
    let created_re = Regex::new(r#"created_at:\s*["']?([^"'\n]+)["']?"#).ok()?;

    let pr_number = pr_re
        .captures(&content)
        .and_then(|c| c[1].parse::<u64>().ok());
    let verdict = verdict_re
        .captures(&content)
        .map(|c| Verdict::parse(&c[1]))
        .unwrap_or(Verdict::Unknown);
    let created_at = created_re
        .captures(&content)
        .map(|c| c[1].trim().to_string());

    Some(ReviewArtifact {
        pr_number,
        verdict,
        created_at,
        path: path.to_path_buf(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::fs;

    fn store(dir: &Path) -> ArtifactStore {
        ArtifactStore::new(&ArtifactConfig {
            dir: dir.to_path_buf(),
        })
    }

    #[test]
    fn missing_directory_is_no_artifact() {
        let store = store(Path::new("/nonexistent/flightdeck-artifacts"));
        assert!(store.latest_for_pr(42).is_none());
    }

    #[test]
    fn no_matching_file_is_no_artifact() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("TRAE-001-99.yml"), "verdict: APPROVE").unwrap();
        let store = store(tmp.path());
        assert!(store.latest_for_pr(42).is_none());
    }

    #[test]
    fn parses_fields_from_loose_text() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(
            tmp.path().join("TRAE-001-42.yml"),
            "pr_number: \"42\"\nverdict: REQUEST_CHANGES\ncreated_at: 2026-08-20 09:00 UTC\n",
        )
        .unwrap();

        let artifact = store(tmp.path()).latest_for_pr(42).unwrap();
        assert_eq!(artifact.pr_number, Some(42));
        assert_eq!(artifact.verdict, Verdict::RequestChanges);
        assert_eq!(artifact.created_at.as_deref(), Some("2026-08-20 09:00 UTC"));
    }

    #[test]
    fn picks_lexicographically_last_match() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("TRAE-001-42.yml"), "verdict: REJECT").unwrap();
        fs::write(tmp.path().join("TRAE-002-42.yml"), "verdict: APPROVE").unwrap();

        let artifact = store(tmp.path()).latest_for_pr(42).unwrap();
        assert_eq!(artifact.verdict, Verdict::Approve);
    }

    #[test]
    fn unknown_verdict_token() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("TRAE-001-7.yml"), "verdict: MAYBE").unwrap();

        let artifact = store(tmp.path()).latest_for_pr(7).unwrap();
        assert_eq!(artifact.verdict, Verdict::Unknown);
    }

    fn artifact_created(created_at: Option<&str>) -> ReviewArtifact {
        ReviewArtifact {
            pr_number: Some(1),
            verdict: Verdict::Approve,
            created_at: created_at.map(|s| s.to_string()),
            path: PathBuf::from("TRAE-001-1.yml"),
        }
    }

    #[test]
    fn stale_when_older_than_seven_days() {
        let now = Utc.with_ymd_and_hms(2026, 8, 26, 12, 0, 0).unwrap();
        let artifact = artifact_created(Some("2026-08-16 12:00 UTC"));
        assert!(artifact.is_stale(now));
    }

    #[test]
    fn boundary_is_not_stale() {
        // Exactly seven days old: strict less-than, so not stale.
        let now = Utc.with_ymd_and_hms(2026, 8, 26, 12, 0, 0).unwrap();
        let artifact = artifact_created(Some("2026-08-19 12:00 UTC"));
        assert!(!artifact.is_stale(now));
    }

    #[test]
    fn unparseable_timestamp_is_not_stale() {
        let now = Utc.with_ymd_and_hms(2026, 8, 26, 12, 0, 0).unwrap();
        assert!(!artifact_created(Some("last tuesday")).is_stale(now));
        assert!(!artifact_created(None).is_stale(now));
    }
}
