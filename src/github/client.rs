use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

use crate::config::GitHubConfig;
use crate::error::{AppError, Result};
use crate::github::types::{CiStatus, Issue, ProjectItem, PullRequest};
use crate::github::Host;

const ACCEPT_HEADER: &str = "application/vnd.github+json";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// GraphQL query for project-board items and their single-select status field.
const PROJECT_ITEMS_QUERY: &str = r#"
query($owner: String!, $repo: String!) {
  repository(owner: $owner, name: $repo) {
    projectsV2(first: 10) {
      nodes {
        number
        title
        items(first: 100) {
          nodes {
            id
            content {
              ... on Issue {
                number
                title
                state
                url
              }
            }
            fieldValues(first: 10) {
              nodes {
                ... on ProjectV2ItemFieldSingleSelectValue {
                  name
                  field {
                    ... on ProjectV2FieldCommon {
                      name
                    }
                  }
                }
              }
            }
          }
        }
      }
    }
  }
}
"#;

pub struct GitHubClient {
    client: Client,
    config: GitHubConfig,
}

impl GitHubClient {
    pub fn new(config: &GitHubConfig) -> Result<Self> {
        if config.token.is_none() {
            tracing::warn!("no GitHub token configured, using unauthenticated API (rate limited)");
        }
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(AppError::Http)?;
        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    fn repo_path(&self, rest: &str) -> String {
        format!(
            "/repos/{}/{}{}",
            self.config.owner, self.config.repo, rest
        )
    }

    /// Single-attempt GET against the REST API. No retry, no backoff.
    async fn rest_get(&self, path: &str) -> Result<Value> {
        let url = format!("{}{}", self.config.api_url, path);
        let mut request = self.client.get(&url).header("Accept", ACCEPT_HEADER);
        if let Some(token) = &self.config.token {
            request = request.header("Authorization", format!("token {token}"));
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Api(format!("GET {path} returned {status}")));
        }

        Ok(response.json::<Value>().await?)
    }

    /// Single-attempt POST against the GraphQL endpoint.
    async fn graphql(&self, query: &str, variables: Value) -> Result<Value> {
        let url = format!("{}/graphql", self.config.api_url);
        let mut request = self
            .client
            .post(&url)
            .header("Accept", ACCEPT_HEADER)
            .json(&json!({ "query": query, "variables": variables }));
        if let Some(token) = &self.config.token {
            request = request.header("Authorization", format!("token {token}"));
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Api(format!("GraphQL returned {status}")));
        }

        Ok(response.json::<Value>().await?)
    }

    async fn head_sha(&self, pr_number: u64) -> Result<String> {
        let path = self.repo_path(&format!("/git/refs/pull/{pr_number}/head"));
        let data = self.rest_get(&path).await?;
        data["object"]["sha"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| AppError::Api(format!("no head SHA for PR #{pr_number}")))
    }

    fn parse_project_items(&self, data: &Value) -> Vec<ProjectItem> {
        let empty = Vec::new();
        let projects = data["data"]["repository"]["projectsV2"]["nodes"]
            .as_array()
            .unwrap_or(&empty);

        let project = projects
            .iter()
            .find(|p| p["number"].as_u64() == Some(self.config.project_number));
        let Some(project) = project else {
            tracing::warn!(
                project_number = self.config.project_number,
                "project not found on repository"
            );
            return Vec::new();
        };

        let mut items = Vec::new();
        for node in project["items"]["nodes"].as_array().unwrap_or(&empty) {
            let content = &node["content"];
            let Some(number) = content["number"].as_u64() else {
                continue;
            };

            // Join against the "Status" single-select field.
            let status = node["fieldValues"]["nodes"]
                .as_array()
                .unwrap_or(&empty)
                .iter()
                .find(|fv| fv["field"]["name"].as_str() == Some("Status"))
                .and_then(|fv| fv["name"].as_str())
                .map(|s| s.to_string());

            items.push(ProjectItem {
                number,
                title: content["title"].as_str().unwrap_or("").to_string(),
                state: content["state"].as_str().unwrap_or("").to_string(),
                url: content["url"].as_str().unwrap_or("").to_string(),
                status,
            });
        }
        items
    }
}

#[async_trait]
impl Host for GitHubClient {
    async fn open_pull_requests(&self) -> Vec<PullRequest> {
        let path =
            self.repo_path("/pulls?state=open&sort=created&direction=desc&per_page=100");
        let result: Result<Vec<PullRequest>> = async {
            let data = self.rest_get(&path).await?;
            Ok(serde_json::from_value(data)?)
        }
        .await;

        match result {
            Ok(prs) => prs,
            Err(e) => {
                tracing::error!(error = %e, "failed to fetch open pull requests");
                Vec::new()
            }
        }
    }

    async fn open_issues(&self) -> Vec<Issue> {
        let path =
            self.repo_path("/issues?state=open&sort=created&direction=desc&per_page=100");
        let result: Result<Vec<Issue>> = async {
            let data = self.rest_get(&path).await?;
            Ok(serde_json::from_value(data)?)
        }
        .await;

        match result {
            // The issues endpoint also lists pull requests; drop them.
            Ok(issues) => issues
                .into_iter()
                .filter(|i| i.pull_request.is_none())
                .collect(),
            Err(e) => {
                tracing::error!(error = %e, "failed to fetch open issues");
                Vec::new()
            }
        }
    }

    async fn pull_request_files(&self, pr_number: u64) -> Vec<String> {
        let path = self.repo_path(&format!("/pulls/{pr_number}/files?per_page=100"));
        match self.rest_get(&path).await {
            Ok(Value::Array(entries)) => entries
                .iter()
                .filter_map(|e| e["filename"].as_str())
                .map(|s| s.to_string())
                .collect(),
            Ok(_) => Vec::new(),
            Err(e) => {
                tracing::error!(pr = pr_number, error = %e, "failed to fetch changed files");
                Vec::new()
            }
        }
    }

    async fn ci_status(&self, pr_number: u64) -> CiStatus {
        let sha = match self.head_sha(pr_number).await {
            Ok(sha) => sha,
            Err(e) => {
                tracing::error!(pr = pr_number, error = %e, "failed to resolve head SHA");
                return CiStatus::unknown("No SHA");
            }
        };

        let path = self.repo_path(&format!("/commits/{sha}/status"));
        let data = match self.rest_get(&path).await {
            Ok(data) => data,
            Err(e) => {
                tracing::error!(pr = pr_number, error = %e, "failed to fetch commit status");
                return CiStatus::unknown("Unknown");
            }
        };

        let state = data["state"].as_str().unwrap_or("unknown");
        let total_count = data["total_count"].as_u64().unwrap_or(0);
        let empty = Vec::new();
        let statuses = data["statuses"].as_array().unwrap_or(&empty);

        let passed = statuses
            .iter()
            .filter(|s| s["state"].as_str() == Some("success"))
            .count();
        let failed = statuses
            .iter()
            .filter(|s| matches!(s["state"].as_str(), Some("failure") | Some("error")))
            .count();
        let pending = statuses
            .iter()
            .filter(|s| matches!(s["state"].as_str(), Some("pending") | Some("in_progress")))
            .count();

        let passing = state == "success" && failed == 0;
        let mut summary = format!("✅ PASS (total: {total_count}, passed: {passed}");
        if failed > 0 {
            summary.push_str(&format!(", ❌ failed: {failed}"));
        }
        if pending > 0 {
            summary.push_str(&format!(", ⏳ pending: {pending}"));
        }
        summary.push(')');

        CiStatus { passing, summary }
    }

    async fn project_items(&self) -> Vec<ProjectItem> {
        if self.config.token.is_none() {
            tracing::warn!("no token, skipping project items query");
            return Vec::new();
        }

        let variables = json!({
            "owner": self.config.owner,
            "repo": self.config.repo,
        });
        match self.graphql(PROJECT_ITEMS_QUERY, variables).await {
            Ok(data) => self.parse_project_items(&data),
            Err(e) => {
                tracing::error!(error = %e, "failed to fetch project items");
                Vec::new()
            }
        }
    }
}
