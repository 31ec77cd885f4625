use crate::artifact::Verdict;

/// Coarse severity classification of a pull request, T1 highest risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskTier {
    T1,
    T2,
    T3,
    T4,
}

impl RiskTier {
    /// T1 and T2 changes require an external Trae review before merge.
    pub fn requires_review(&self) -> bool {
        matches!(self, RiskTier::T1 | RiskTier::T2)
    }
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tier = match self {
            RiskTier::T1 => "T1",
            RiskTier::T2 => "T2",
            RiskTier::T3 => "T3",
            RiskTier::T4 => "T4",
        };
        f.write_str(tier)
    }
}

/// Directory prefixes whose changes are automatically highest-risk.
const PROTECTED_PATHS: [&str; 5] = [
    "GOVERNANCE",
    "AGENTS",
    "COCKPIT",
    ".github/workflows",
    "STATE",
];

/// Classify a pull request's risk tier. Ordered decision rule, first match
/// wins: labels, then body markers, then artifact verdict, then protected
/// paths, then the T3 default.
pub fn classify(
    labels: &[&str],
    body: &str,
    verdict: Option<Verdict>,
    changed_files: &[String],
) -> RiskTier {
    let labels: Vec<String> = labels.iter().map(|l| l.to_lowercase()).collect();
    let has_label = |names: &[&str]| labels.iter().any(|l| names.contains(&l.as_str()));

    if has_label(&["tier-1", "critical", "t1"]) {
        return RiskTier::T1;
    }
    if has_label(&["tier-2", "high-risk", "t2"]) {
        return RiskTier::T2;
    }
    if has_label(&["tier-3", "t3"]) {
        return RiskTier::T3;
    }
    if has_label(&["tier-4", "t4"]) {
        return RiskTier::T4;
    }

    let body = body.to_lowercase();
    if body.contains("tier 1") || body.contains("t1") || body.contains("critical") {
        return RiskTier::T1;
    }
    if body.contains("tier 2") || body.contains("t2") || body.contains("high risk") {
        return RiskTier::T2;
    }
    if body.contains("tier 3") || body.contains("t3") {
        return RiskTier::T3;
    }
    if body.contains("tier 4") || body.contains("t4") {
        return RiskTier::T4;
    }

    // Fallback heuristic: a reviewed PR is assumed T2 when nothing else says.
    if matches!(verdict, Some(Verdict::Approve) | Some(Verdict::EmergencyOverride)) {
        return RiskTier::T2;
    }

    let touches_protected = changed_files
        .iter()
        .any(|f| PROTECTED_PATHS.iter().any(|p| f.contains(p)));
    if touches_protected {
        return RiskTier::T1;
    }

    RiskTier::T3
}
