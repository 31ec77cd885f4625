use chrono::{DateTime, Utc};

use crate::artifact::{ArtifactStore, ReviewArtifact};
use crate::github::types::{CiStatus, Issue, ProjectItem, PullRequest};
use crate::github::Host;
use crate::risk::{self, RiskTier};

pub const STATUS_WAITING: &str = "Waiting for Approval";
pub const STATUS_BLOCKED: &str = "Blocked";
pub const STATUS_IN_REVIEW: &str = "In Review (PR Open)";

/// A pull request with everything the reports need about it: risk tier,
/// latest review artifact, CI state, and changed files. Fetched once per run
/// so both report builders work from the same data.
#[derive(Debug, Clone)]
pub struct PrContext {
    pub pr: PullRequest,
    pub tier: RiskTier,
    pub artifact: Option<ReviewArtifact>,
    pub ci: CiStatus,
    pub changed_files: Vec<String>,
}

impl PrContext {
    pub fn needs_review(&self) -> bool {
        self.tier.requires_review()
    }
}

/// Point-in-time capture of everything both reports render from.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub generated_at: DateTime<Utc>,
    pub date_stamp: String,
    pub prs: Vec<PrContext>,
    pub issues: Vec<Issue>,
    pub project_items: Vec<ProjectItem>,
}

impl Snapshot {
    /// Fetch all report inputs, strictly sequentially. Individual failures
    /// have already degraded to empty results inside the host.
    pub async fn collect(host: &dyn Host, artifacts: &ArtifactStore, now: DateTime<Utc>) -> Self {
        let prs = host.open_pull_requests().await;
        let issues = host.open_issues().await;
        let project_items = host.project_items().await;

        tracing::info!(
            prs = prs.len(),
            issues = issues.len(),
            project_items = project_items.len(),
            "fetched report inputs"
        );

        let mut contexts = Vec::with_capacity(prs.len());
        for pr in prs {
            let artifact = artifacts.latest_for_pr(pr.number);
            let ci = host.ci_status(pr.number).await;
            let changed_files = host.pull_request_files(pr.number).await;
            let tier = risk::classify(
                &pr.label_names(),
                pr.body.as_deref().unwrap_or(""),
                artifact.as_ref().map(|a| a.verdict),
                &changed_files,
            );
            contexts.push(PrContext {
                pr,
                tier,
                artifact,
                ci,
                changed_files,
            });
        }

        Self {
            generated_at: now,
            date_stamp: now.format("%Y%m%d").to_string(),
            prs: contexts,
            issues,
            project_items,
        }
    }

    /// T1/T2 pull requests, the ones gated on Trae review.
    pub fn trae_queue(&self) -> Vec<&PrContext> {
        self.prs.iter().filter(|c| c.needs_review()).collect()
    }

    pub fn failing_ci(&self) -> Vec<&PrContext> {
        self.prs.iter().filter(|c| !c.ci.passing).collect()
    }

    pub fn waiting_for_approval(&self) -> Vec<&ProjectItem> {
        self.items_with_status(STATUS_WAITING)
    }

    pub fn blocked(&self) -> Vec<&ProjectItem> {
        self.items_with_status(STATUS_BLOCKED)
    }

    pub fn in_review(&self) -> Vec<&ProjectItem> {
        self.items_with_status(STATUS_IN_REVIEW)
    }

    fn items_with_status(&self, status: &str) -> Vec<&ProjectItem> {
        self.project_items
            .iter()
            .filter(|i| i.has_status(status))
            .collect()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::artifact::Verdict;
    use crate::github::types::{Account, Label};
    use chrono::TimeZone;
    use std::path::PathBuf;

    pub fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 26, 12, 0, 0).unwrap()
    }

    pub fn pull_request(number: u64, title: &str, labels: &[&str]) -> PullRequest {
        PullRequest {
            number,
            title: title.to_string(),
            user: Some(Account {
                login: "octocat".to_string(),
            }),
            created_at: now() - chrono::Duration::days(1),
            html_url: format!("https://github.com/acme/repo/pull/{number}"),
            labels: labels
                .iter()
                .map(|l| Label {
                    name: l.to_string(),
                })
                .collect(),
            body: None,
        }
    }

    pub fn issue(number: u64, title: &str) -> Issue {
        Issue {
            number,
            title: title.to_string(),
            user: Some(Account {
                login: "octocat".to_string(),
            }),
            created_at: now() - chrono::Duration::days(2),
            html_url: format!("https://github.com/acme/repo/issues/{number}"),
            labels: Vec::new(),
            pull_request: None,
        }
    }

    pub fn project_item(number: u64, title: &str, status: &str) -> ProjectItem {
        ProjectItem {
            number,
            title: title.to_string(),
            state: "OPEN".to_string(),
            url: format!("https://github.com/acme/repo/issues/{number}"),
            status: Some(status.to_string()),
        }
    }

    pub fn artifact(pr_number: u64, verdict: Verdict, created_at: Option<&str>) -> ReviewArtifact {
        ReviewArtifact {
            pr_number: Some(pr_number),
            verdict,
            created_at: created_at.map(|s| s.to_string()),
            path: PathBuf::from(format!("TRAE-001-{pr_number}.yml")),
        }
    }

    pub fn context(pr: PullRequest, tier: crate::risk::RiskTier) -> PrContext {
        PrContext {
            pr,
            tier,
            artifact: None,
            ci: CiStatus {
                passing: true,
                summary: "✅ PASS (total: 1, passed: 1)".to_string(),
            },
            changed_files: Vec::new(),
        }
    }

    pub fn empty_snapshot() -> Snapshot {
        Snapshot {
            generated_at: now(),
            date_stamp: "20260826".to_string(),
            prs: Vec::new(),
            issues: Vec::new(),
            project_items: Vec::new(),
        }
    }
}
