use crate::artifact::Verdict;
use crate::report::{GENERATED_FORMAT, SYSTEM_NAME};
use crate::snapshot::{PrContext, Snapshot};

/// Render the Approvals Queue: four numbered decision sections and a summary
/// counting the decision groups that need founder action.
pub fn render(snapshot: &Snapshot) -> String {
    let mut doc: Vec<String> = Vec::new();

    doc.push(format!("# Approvals Queue — {}", snapshot.date_stamp));
    doc.push(String::new());
    doc.push(format!(
        "**Generated**: {}",
        snapshot.generated_at.format(GENERATED_FORMAT)
    ));
    doc.push(format!("**System**: {SYSTEM_NAME}"));
    doc.push(String::new());
    doc.push("> INSTRUCTIONS FOR FOUNDER (Board Member):".to_string());
    doc.push("> ".to_string());
    doc.push("> Review each decision item below. Respond with:".to_string());
    doc.push("> - **YES** to approve the item".to_string());
    doc.push("> - **NO** to reject or request defer".to_string());
    doc.push(
        "> - **EMERGENCY_OVERRIDE** to bypass standard approval (document reason)".to_string(),
    );
    doc.push(String::new());
    doc.push("---".to_string());
    doc.push(String::new());

    let has_trae_decisions = render_trae_section(&mut doc, snapshot);
    let waiting = snapshot.waiting_for_approval();
    let blocked = snapshot.blocked();
    let failing = snapshot.failing_ci();

    render_waiting_section(&mut doc, &waiting);
    render_blocked_section(&mut doc, &blocked);
    render_failing_ci_section(&mut doc, &failing);

    // Summary
    doc.push("---".to_string());
    doc.push(String::new());
    doc.push("## Summary".to_string());
    doc.push(String::new());

    let decision_count = usize::from(has_trae_decisions)
        + waiting.len()
        + blocked.len()
        + usize::from(!failing.is_empty());
    doc.push(format!("Total Decisions Required: {decision_count}"));
    if decision_count == 0 {
        doc.push(String::new());
        doc.push(
            "✅ **No founder actions required today** - System operating autonomously."
                .to_string(),
        );
    }
    doc.push(String::new());
    doc.push("*End of Approvals Queue*".to_string());

    doc.join("\n")
}

fn render_trae_section(doc: &mut Vec<String>, snapshot: &Snapshot) -> bool {
    doc.push("## 1. Trae Review Required".to_string());
    doc.push(String::new());
    doc.push("These T1-T2 PRs require Trae external review before merge:".to_string());
    doc.push(String::new());

    let queue = snapshot.trae_queue();
    for ctx in &queue {
        doc.push(format!("### PR #{}: {}", ctx.pr.number, ctx.pr.title));
        doc.push(String::new());
        render_trae_decision(doc, ctx, snapshot);
        doc.push("---".to_string());
        doc.push(String::new());
    }

    if queue.is_empty() {
        doc.push("✅ No T1-T2 PRs requiring Trae review.".to_string());
        doc.push(String::new());
        false
    } else {
        true
    }
}

fn render_trae_decision(doc: &mut Vec<String>, ctx: &PrContext, snapshot: &Snapshot) {
    let Some(artifact) = &ctx.artifact else {
        doc.push("**Status**: 🔴 MISSING TRAE REVIEW".to_string());
        doc.push(format!("- **Risk Tier**: {}", ctx.tier));
        doc.push(format!("- **Link**: {}", ctx.pr.html_url));
        doc.push(String::new());
        doc.push("**FOUNDER DECISION REQUIRED**:".to_string());
        doc.push(
            "- [ ] **APPROVE** - Authorize Trae review for this PR (factory will invoke)"
                .to_string(),
        );
        doc.push("- [ ] **DEFER** - Defer this PR until next cycle".to_string());
        doc.push(String::new());
        return;
    };

    let is_stale = artifact.is_stale(snapshot.generated_at);
    let created_at = artifact.created_at.as_deref().unwrap_or("");

    if artifact.verdict == Verdict::Approve && !is_stale {
        doc.push("**Status**: 🟢 TRAE APPROVED".to_string());
        doc.push(format!("- **Risk Tier**: {}", ctx.tier));
        doc.push(format!("- **Link**: {}", ctx.pr.html_url));
        doc.push(format!("- **Verdict**: {}", artifact.verdict));
        doc.push(format!("- **Created**: {created_at}"));
        doc.push(String::new());
        doc.push("**FOUNDER DECISION REQUIRED**:".to_string());
        doc.push("- [ ] **APPROVE MERGE** - Trae approved, authorize merge".to_string());
        doc.push("- [ ] **DEFER** - Defer this PR until next cycle".to_string());
    } else if artifact.verdict == Verdict::EmergencyOverride {
        doc.push("**Status**: ⚠️ EMERGENCY OVERRIDE INVOKED".to_string());
        doc.push(format!("- **Risk Tier**: {}", ctx.tier));
        doc.push(format!("- **Link**: {}", ctx.pr.html_url));
        doc.push(format!("- **Verdict**: {}", artifact.verdict));
        doc.push(format!("- **Created**: {created_at}"));
        doc.push(String::new());
        doc.push("**FOUNDER DECISION REQUIRED**:".to_string());
        doc.push("- [ ] **APPROVE MERGE** - Accept emergency override".to_string());
        doc.push("- [ ] **REJECT** - Do not accept emergency override".to_string());
    } else {
        // Rejected, changes requested, unknown, or a stale approval.
        doc.push(format!("**Status**: 🔴 TRAE {}", artifact.verdict));
        doc.push(format!("- **Risk Tier**: {}", ctx.tier));
        doc.push(format!("- **Link**: {}", ctx.pr.html_url));
        doc.push(format!("- **Verdict**: {}", artifact.verdict));
        if !created_at.is_empty() {
            let staleness = if is_stale { " (STALE)" } else { "" };
            doc.push(format!("- **Created**: {created_at}{staleness}"));
        }
        doc.push(String::new());
        doc.push("**FOUNDER DECISION REQUIRED**:".to_string());
        doc.push("- [ ] **REQUEST RE-REVIEW** - Factory will re-invoke Trae".to_string());
        doc.push("- [ ] **DEFER** - Defer this PR until next cycle".to_string());
    }
    doc.push(String::new());
}

fn render_waiting_section(doc: &mut Vec<String>, waiting: &[&crate::github::ProjectItem]) {
    doc.push("## 2. Founder Decisions Needed (Waiting for Approval)".to_string());
    doc.push(String::new());

    if waiting.is_empty() {
        doc.push("✅ No items waiting for approval.".to_string());
        doc.push(String::new());
        return;
    }

    for item in waiting {
        doc.push(format!("### Issue #{}: {}", item.number, item.title));
        doc.push(String::new());
        doc.push(format!("- **Link**: {}", item.url));
        doc.push(format!("- **State**: {}", item.state));
        doc.push(String::new());
        doc.push("**FOUNDER DECISION REQUIRED**:".to_string());
        doc.push("- [ ] **APPROVE** - Authorize proceeding with this work".to_string());
        doc.push("- [ ] **DEFER** - Defer until next cycle".to_string());
        doc.push("- [ ] **EMERGENCY_OVERRIDE** - Force proceed (document reason)".to_string());
        doc.push(String::new());
        doc.push("---".to_string());
        doc.push(String::new());
    }
}

fn render_blocked_section(doc: &mut Vec<String>, blocked: &[&crate::github::ProjectItem]) {
    doc.push("## 3. Blocked Items (Needs Resolution)".to_string());
    doc.push(String::new());

    if blocked.is_empty() {
        doc.push("✅ No blocked items.".to_string());
        doc.push(String::new());
        return;
    }

    for item in blocked {
        doc.push(format!("### Issue #{}: {}", item.number, item.title));
        doc.push(String::new());
        doc.push(format!("- **Link**: {}", item.url));
        doc.push(format!("- **State**: {}", item.state));
        doc.push(String::new());
        doc.push("**FOUNDER DECISION REQUIRED**:".to_string());
        doc.push("- [ ] **UNBLOCK** - Approve unblocking this item".to_string());
        doc.push("- [ ] **DEFER** - Keep blocked for now".to_string());
        doc.push(String::new());
        doc.push("---".to_string());
        doc.push(String::new());
    }
}

fn render_failing_ci_section(doc: &mut Vec<String>, failing: &[&PrContext]) {
    doc.push("## 4. CI Failing Pull Requests".to_string());
    doc.push(String::new());

    if failing.is_empty() {
        doc.push("✅ No CI failures.".to_string());
        doc.push(String::new());
        return;
    }

    for ctx in failing {
        doc.push(format!("### PR #{}: {}", ctx.pr.number, ctx.pr.title));
        doc.push(String::new());
        doc.push(format!("- **Link**: {}", ctx.pr.html_url));
        doc.push(format!("- **Author**: {}", ctx.pr.author()));
        doc.push(String::new());
        doc.push("**FOUNDER DECISION REQUIRED**:".to_string());
        doc.push("- [ ] **APPROVE RETRY** - Retry CI after fix".to_string());
        doc.push("- [ ] **DEFER** - Let author fix first".to_string());
        doc.push(String::new());
        doc.push("---".to_string());
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
    fn all_clear_run_reports_zero_decisions() {
        let queue = render(&empty_snapshot());

        assert!(queue.contains("✅ No T1-T2 PRs requiring Trae review."));
        assert!(queue.contains("✅ No items waiting for approval."));
        assert!(queue.contains("✅ No blocked items."));
        assert!(queue.contains("✅ No CI failures."));
        assert!(queue.contains("Total Decisions Required: 0"));
        assert!(queue.contains("**No founder actions required today**"));
    }

    #[test]
    fn decision_count_formula() {
        let mut snapshot = empty_snapshot();
        // One T2 PR without artifact (1 trae group), failing CI (1 group),
        // two waiting items and one blocked item.
        let mut ctx = context(pull_request(42, "Rework auth", &["t2"]), RiskTier::T2);
        ctx.ci.passing = false;
        snapshot.prs = vec![ctx];
        snapshot.project_items = vec![
            project_item(10, "a", STATUS_WAITING),
            project_item(11, "b", STATUS_WAITING),
            project_item(12, "c", STATUS_BLOCKED),
        ];

        let queue = render(&snapshot);
        assert!(queue.contains("Total Decisions Required: 5"));
        assert!(!queue.contains("No founder actions required"));
    }

    #[test]
    fn missing_artifact_renders_missing_branch() {
        let mut snapshot = empty_snapshot();
        snapshot.prs = vec![context(pull_request(42, "Rework auth", &["t2"]), RiskTier::T2)];

        let queue = render(&snapshot);
        assert!(queue.contains("**Status**: 🔴 MISSING TRAE REVIEW"));
        assert!(queue.contains("- [ ] **APPROVE** - Authorize Trae review for this PR"));
    }

    #[test]
    fn fresh_approval_renders_approved_branch() {
        let mut snapshot = empty_snapshot();
        let mut ctx = context(pull_request(7, "Gate change", &["t1"]), RiskTier::T1);
        ctx.artifact = Some(artifact(7, Verdict::Approve, Some("2026-08-25 12:00 UTC")));
        snapshot.prs = vec![ctx];

        let queue = render(&snapshot);
        assert!(queue.contains("**Status**: 🟢 TRAE APPROVED"));
        assert!(queue.contains("- [ ] **APPROVE MERGE** - Trae approved, authorize merge"));
    }

    #[test]
    fn stale_approval_falls_through_to_non_fresh_branch() {
        let mut snapshot = empty_snapshot();
        let mut ctx = context(pull_request(7, "Old change", &["t1"]), RiskTier::T1);
        // 10 days before generated_at
        ctx.artifact = Some(artifact(7, Verdict::Approve, Some("2026-08-16 12:00 UTC")));
        snapshot.prs = vec![ctx];

        let queue = render(&snapshot);
        assert!(queue.contains("**Status**: 🔴 TRAE APPROVE"));
        assert!(!queue.contains("🟢 TRAE APPROVED"));
        assert!(queue.contains("- **Created**: 2026-08-16 12:00 UTC (STALE)"));
        assert!(queue.contains("- [ ] **REQUEST RE-REVIEW** - Factory will re-invoke Trae"));
    }

    #[test]
    fn emergency_override_renders_override_branch() {
        let mut snapshot = empty_snapshot();
        let mut ctx = context(pull_request(8, "Hotfix", &["t1"]), RiskTier::T1);
        ctx.artifact = Some(artifact(
            8,
            Verdict::EmergencyOverride,
            Some("2026-08-25 12:00 UTC"),
        ));
        snapshot.prs = vec![ctx];

        let queue = render(&snapshot);
        assert!(queue.contains("**Status**: ⚠️ EMERGENCY OVERRIDE INVOKED"));
        assert!(queue.contains("- [ ] **REJECT** - Do not accept emergency override"));
    }

    #[test]
    fn failing_ci_pr_listed_in_section_four() {
        let mut snapshot = empty_snapshot();
        let mut ctx = context(pull_request(42, "Rework auth", &["t2"]), RiskTier::T2);
        ctx.ci.passing = false;
        snapshot.prs = vec![ctx];

        let queue = render(&snapshot);
        assert!(queue.contains("## 4. CI Failing Pull Requests"));
        assert!(queue.contains("### PR #42: Rework auth"));
        assert!(queue.contains("- [ ] **APPROVE RETRY** - Retry CI after fix"));
    }
}
