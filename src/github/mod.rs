pub mod client;
pub mod types;

pub use client::GitHubClient;
pub use types::{CiStatus, Issue, ProjectItem, PullRequest};

use async_trait::async_trait;

/// Fetch surface of the hosting API.
///
/// The orchestrator only sees this trait, so report generation can be driven
/// by a stub host in tests.
#[async_trait]
pub trait Host: Send + Sync {
    /// Open pull requests, newest first. Empty on any API failure.
    async fn open_pull_requests(&self) -> Vec<PullRequest>;

    /// Open issues, newest first, pull requests filtered out. Empty on failure.
    async fn open_issues(&self) -> Vec<Issue>;

    /// Paths changed by a pull request. Empty on failure.
    async fn pull_request_files(&self, pr_number: u64) -> Vec<String>;

    /// Aggregate CI state for a pull request's head commit.
    async fn ci_status(&self, pr_number: u64) -> CiStatus;

    /// Items on the configured project board. Empty without a token.
    async fn project_items(&self) -> Vec<ProjectItem>;
}
