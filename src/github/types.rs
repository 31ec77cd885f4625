use chrono::{DateTime, Utc};
use serde::Deserialize;

/// An open pull request as returned by the REST listing endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    pub title: String,
    #[serde(default)]
    pub user: Option<Account>,
    pub created_at: DateTime<Utc>,
    pub html_url: String,
    #[serde(default)]
    pub labels: Vec<Label>,
    #[serde(default)]
    pub body: Option<String>,
}

impl PullRequest {
    pub fn author(&self) -> &str {
        self.user.as_ref().map(|u| u.login.as_str()).unwrap_or("unknown")
    }

    pub fn label_names(&self) -> Vec<&str> {
        self.labels.iter().map(|l| l.name.as_str()).collect()
    }
}

/// An open issue. The issues listing endpoint also returns pull requests;
/// those entries carry a `pull_request` key and are filtered out by the client.
#[derive(Debug, Clone, Deserialize)]
pub struct Issue {
    pub number: u64,
    pub title: String,
    #[serde(default)]
    pub user: Option<Account>,
    pub created_at: DateTime<Utc>,
    pub html_url: String,
    #[serde(default)]
    pub labels: Vec<Label>,
    #[serde(default)]
    pub pull_request: Option<serde_json::Value>,
}

impl Issue {
    pub fn author(&self) -> &str {
        self.user.as_ref().map(|u| u.login.as_str()).unwrap_or("unknown")
    }

    pub fn label_names(&self) -> Vec<&str> {
        self.labels.iter().map(|l| l.name.as_str()).collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Account {
    pub login: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Label {
    pub name: String,
}

/// A project-board entry joined against its "Status" single-select field.
#[derive(Debug, Clone)]
pub struct ProjectItem {
    pub number: u64,
    pub title: String,
    pub state: String,
    pub url: String,
    pub status: Option<String>,
}

impl ProjectItem {
    pub fn has_status(&self, status: &str) -> bool {
        self.status.as_deref() == Some(status)
    }
}

/// Aggregate CI state for a pull request's head commit.
#[derive(Debug, Clone)]
pub struct CiStatus {
    pub passing: bool,
    pub summary: String,
}

impl CiStatus {
    pub fn unknown(reason: &str) -> Self {
        Self {
            passing: false,
            summary: reason.to_string(),
        }
    }
}
