use crate::artifact::Verdict;
use crate::report::{GENERATED_FORMAT, SYSTEM_NAME};
use crate::snapshot::{PrContext, Snapshot};

/// Render the Daily Brief. Pure function of the snapshot; every section
/// renders an explicit "none" line when empty so the document shape is
/// stable across runs.
pub fn render(snapshot: &Snapshot) -> String {
    let mut doc: Vec<String> = Vec::new();

    doc.push(format!("# Daily Brief — {}", snapshot.date_stamp));
    doc.push(String::new());
    doc.push(format!(
        "**Generated**: {}",
        snapshot.generated_at.format(GENERATED_FORMAT)
    ));
    doc.push(format!("**System**: {SYSTEM_NAME}"));
    doc.push(String::new());

    render_summary(&mut doc, snapshot);

    doc.push("---".to_string());
    doc.push(String::new());
    render_trae_required(&mut doc, snapshot);

    doc.push("---".to_string());
    doc.push(String::new());
    render_open_prs(&mut doc, snapshot);

    doc.push("---".to_string());
    doc.push(String::new());
    render_project_items(&mut doc, snapshot);

    doc.push("---".to_string());
    doc.push(String::new());
    render_open_issues(&mut doc, snapshot);

    doc.push("---".to_string());
    doc.push(String::new());
    doc.push("*End of Daily Brief*".to_string());

    doc.join("\n")
}

fn render_summary(doc: &mut Vec<String>, snapshot: &Snapshot) {
    doc.push("## Executive Summary".to_string());
    doc.push(String::new());
    doc.push(format!("- **Open PRs**: {}", snapshot.prs.len()));
    doc.push(format!("- **Open Issues**: {}", snapshot.issues.len()));
    doc.push(format!("- **Project Items**: {}", snapshot.project_items.len()));
    doc.push(String::new());
    doc.push(format!(
        "- **Waiting for Approval**: {}",
        snapshot.waiting_for_approval().len()
    ));
    doc.push(format!("- **Blocked Items**: {}", snapshot.blocked().len()));
    doc.push(format!("- **In Review**: {}", snapshot.in_review().len()));
    doc.push(String::new());
}

fn render_trae_required(doc: &mut Vec<String>, snapshot: &Snapshot) {
    doc.push("## Trae Required".to_string());
    doc.push(String::new());

    let queue = snapshot.trae_queue();
    if queue.is_empty() {
        doc.push("No T1-T2 PRs requiring Trae review.".to_string());
        doc.push(String::new());
        return;
    }

    for ctx in queue {
        doc.push(format!("### PR #{}: {}", ctx.pr.number, ctx.pr.title));
        doc.push(format!("- **Risk Tier**: {}", ctx.tier));
        doc.push(format!("- **Link**: {}", ctx.pr.html_url));

        match &ctx.artifact {
            None => {
                doc.push("- **Trae Verdict**: MISSING".to_string());
                doc.push("- **Action Required**: Trae review needed before merge".to_string());
            }
            Some(artifact) => {
                doc.push(format!("- **Trae Verdict**: {}", artifact.verdict));
                if let Some(created_at) = &artifact.created_at {
                    let staleness = if artifact.is_stale(snapshot.generated_at) {
                        " (STALE - >7 days old)"
                    } else {
                        ""
                    };
                    doc.push(format!("- **Created**: {created_at}{staleness}"));
                }
                doc.push(format!("- **Artifact**: `{}`", artifact.path.display()));
                if matches!(artifact.verdict, Verdict::Reject | Verdict::RequestChanges) {
                    doc.push("- **Action Required**: Address Trae's findings".to_string());
                }
            }
        }
        doc.push(String::new());
    }
}

fn render_open_prs(doc: &mut Vec<String>, snapshot: &Snapshot) {
    doc.push("## Open Pull Requests".to_string());
    doc.push(String::new());

    if snapshot.prs.is_empty() {
        doc.push("No open pull requests.".to_string());
        doc.push(String::new());
        return;
    }

    for ctx in &snapshot.prs {
        render_pr_entry(doc, ctx);
    }
}

fn render_pr_entry(doc: &mut Vec<String>, ctx: &PrContext) {
    doc.push(format!("### PR #{}: {}", ctx.pr.number, ctx.pr.title));
    doc.push(format!("- **Link**: {}", ctx.pr.html_url));
    doc.push(format!("- **Author**: {}", ctx.pr.author()));
    doc.push(format!(
        "- **Created**: {}",
        ctx.pr.created_at.format("%Y-%m-%d")
    ));
    doc.push(format!("- **Risk Tier**: {}", ctx.tier));
    doc.push(format!("- **CI Check**: {}", ctx.ci.summary));
    if ctx.ci.passing {
        doc.push("- **Status**: 🟢 Ready for review".to_string());
    } else {
        doc.push("- **Status**: 🔴 CI failing - needs attention".to_string());
    }

    let labels = ctx.pr.label_names();
    if !labels.is_empty() {
        doc.push(format!("- **Labels**: {}", labels.join(", ")));
    }
    doc.push(String::new());
}

fn render_project_items(doc: &mut Vec<String>, snapshot: &Snapshot) {
    doc.push("## GitHub Project Items (SDLC)".to_string());
    doc.push(String::new());

    let groups = [
        ("Waiting for Approval", snapshot.waiting_for_approval()),
        ("Blocked Items", snapshot.blocked()),
        ("In Review (PR Open)", snapshot.in_review()),
    ];

    let all_empty = groups.iter().all(|(_, items)| items.is_empty());
    for (heading, items) in &groups {
        if items.is_empty() {
            continue;
        }
        doc.push(format!("### {heading}"));
        for item in items {
            doc.push(format!("- **Issue #{}**: {}", item.number, item.title));
            doc.push(format!("  Link: {}", item.url));
        }
        doc.push(String::new());
    }

    if all_empty {
        doc.push("No items in Waiting for Approval, Blocked, or In Review status.".to_string());
        doc.push(String::new());
    }
}

fn render_open_issues(doc: &mut Vec<String>, snapshot: &Snapshot) {
    doc.push("## Open Issues".to_string());
    doc.push(String::new());

    if snapshot.issues.is_empty() {
        doc.push("No open issues.".to_string());
        doc.push(String::new());
        return;
    }

    // Ten most recent only
    for issue in snapshot.issues.iter().take(10) {
        doc.push(format!("### Issue #{}: {}", issue.number, issue.title));
        doc.push(format!("- **Link**: {}", issue.html_url));
        doc.push(format!("- **Author**: {}", issue.author()));
        doc.push(format!(
            "- **Created**: {}",
            issue.created_at.format("%Y-%m-%d")
        ));

        let labels = issue.label_names();
        if !labels.is_empty() {
            doc.push(format!("- **Labels**: {}", labels.join(", ")));
        }
        doc.push(String::new());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::Verdict;
    use crate::risk::RiskTier;
    use crate::snapshot::testing::*;
    use crate::snapshot::{STATUS_BLOCKED, STATUS_WAITING};

    #[test]
    fn empty_snapshot_keeps_document_shape() {
        let brief = render(&empty_snapshot());

        assert!(brief.contains("# Daily Brief — 20260826"));
        assert!(brief.contains("No T1-T2 PRs requiring Trae review."));
        assert!(brief.contains("No open pull requests."));
        assert!(brief.contains("No items in Waiting for Approval, Blocked, or In Review status."));
        assert!(brief.contains("No open issues."));
        assert!(brief.contains("*End of Daily Brief*"));
    }

    #[test]
    fn t2_pr_without_artifact_shows_missing_verdict() {
        let mut snapshot = empty_snapshot();
        let mut ctx = context(pull_request(42, "Rework auth", &["t2"]), RiskTier::T2);
        ctx.ci.passing = false;
        snapshot.prs = vec![ctx];

        let brief = render(&snapshot);
        assert!(brief.contains("## Trae Required"));
        assert!(brief.contains("### PR #42: Rework auth"));
        assert!(brief.contains("- **Trae Verdict**: MISSING"));
        assert!(brief.contains("- **Status**: 🔴 CI failing - needs attention"));
    }

    #[test]
    fn stale_approval_is_annotated() {
        let mut snapshot = empty_snapshot();
        let mut ctx = context(pull_request(7, "Old change", &["t1"]), RiskTier::T1);
        // 10 days before the snapshot's generated_at
        ctx.artifact = Some(artifact(7, Verdict::Approve, Some("2026-08-16 12:00 UTC")));
        snapshot.prs = vec![ctx];

        let brief = render(&snapshot);
        assert!(brief.contains("- **Trae Verdict**: APPROVE"));
        assert!(brief.contains("2026-08-16 12:00 UTC (STALE - >7 days old)"));
    }

    #[test]
    fn t3_prs_stay_out_of_trae_section() {
        let mut snapshot = empty_snapshot();
        snapshot.prs = vec![context(pull_request(9, "Docs", &[]), RiskTier::T3)];

        let brief = render(&snapshot);
        assert!(brief.contains("No T1-T2 PRs requiring Trae review."));
        assert!(brief.contains("### PR #9: Docs"));
    }

    #[test]
    fn project_items_are_grouped_by_status() {
        let mut snapshot = empty_snapshot();
        snapshot.project_items = vec![
            project_item(10, "Ship feature", STATUS_WAITING),
            project_item(11, "Fix infra", STATUS_BLOCKED),
        ];

        let brief = render(&snapshot);
        assert!(brief.contains("### Waiting for Approval"));
        assert!(brief.contains("- **Issue #10**: Ship feature"));
        assert!(brief.contains("### Blocked Items"));
        assert!(brief.contains("- **Issue #11**: Fix infra"));
    }

    #[test]
    fn issues_capped_at_ten() {
        let mut snapshot = empty_snapshot();
        snapshot.issues = (1..=15).map(|n| issue(n, "Issue")).collect();

        let brief = render(&snapshot);
        assert!(brief.contains("### Issue #10: Issue"));
        assert!(!brief.contains("### Issue #11: Issue"));
    }
}
