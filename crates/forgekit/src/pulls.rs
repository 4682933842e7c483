//! Pull request listing and idempotent submission

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::client::ForgeClient;
use crate::error::{Error, Result};
use crate::DEFAULT_BRANCH;

/// One side of a pull request
#[derive(Debug, Clone)]
pub struct PullBranch {
    /// Owner of the repository the branch lives in
    pub owner: String,

    /// Repository name; a side without one borrows the other side's repo
    pub repo: Option<String>,

    /// Branch name (defaults to "master")
    pub branch: Option<String>,
}

impl PullBranch {
    /// Branch under `owner` with no explicit repo or branch name
    pub fn new(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: None,
            branch: None,
        }
    }

    /// Set the repository name
    pub fn with_repo(mut self, repo: impl Into<String>) -> Self {
        self.repo = Some(repo.into());
        self
    }

    /// Set the branch name
    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }

    /// Render as the service's `owner:branch` head label
    fn head_label(&self) -> String {
        format!(
            "{}:{}",
            self.owner,
            self.branch.as_deref().unwrap_or(DEFAULT_BRANCH)
        )
    }
}

/// A pull request to submit
#[derive(Debug, Clone)]
pub struct NewPull {
    /// Pull request title
    pub title: String,

    /// Pull request description (defaults to empty)
    pub body: Option<String>,

    /// Issue to attach the pull request to
    pub issue: Option<u64>,
}

impl NewPull {
    /// Create a pull request submission with only a title
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: None,
            issue: None,
        }
    }

    /// Set the description
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Attach the pull request to an issue
    pub fn with_issue(mut self, issue: u64) -> Self {
        self.issue = Some(issue);
        self
    }
}

/// An open pull request
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequest {
    /// Pull request number within the repository
    pub number: u64,

    /// Title
    pub title: String,

    /// Description, when one was given
    pub body: Option<String>,

    /// State (e.g., "open")
    pub state: String,

    /// Browser URL of the pull request
    pub html_url: String,
}

#[derive(Serialize)]
struct CreatePullBody<'a> {
    base: &'a str,
    head: &'a str,
    title: &'a str,
    body: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    issue: Option<String>,
}

impl ForgeClient {
    /// List open pull requests, optionally filtered by base branch and head
    ///
    /// The head filter is rendered as `owner:branch`, its branch defaulting
    /// to "master".
    pub async fn list_pulls(
        &self,
        owner: &str,
        repo: &str,
        base: Option<&str>,
        head: Option<&PullBranch>,
    ) -> Result<Vec<PullRequest>> {
        let path = format!("repos/{}/{}/pulls", owner, repo);
        let head_label = head.map(|h| h.head_label());

        let mut query: Vec<(&str, &str)> = Vec::new();
        if let Some(base) = base {
            query.push(("base", base));
        }
        if let Some(label) = head_label.as_deref() {
            query.push(("head", label));
        }
        self.transport.get_with_query(&path, &query).await
    }

    /// Submit a pull request, idempotently
    ///
    /// `from` names the proposing branch, `to` the receiving one. The pull
    /// request lives in `to.owner`'s repository; `to.repo` falls back to
    /// `from.repo` (one of the two must be set) and both branches default
    /// to "master". An existing open pull request for the same
    /// (base, head) pair is returned unmodified; only absent a match is
    /// one creation call made.
    pub async fn pull(
        &self,
        from: &PullBranch,
        to: &PullBranch,
        pull: NewPull,
    ) -> Result<PullRequest> {
        let repo = to
            .repo
            .as_deref()
            .or(from.repo.as_deref())
            .ok_or_else(|| Error::invalid_request("pull requires a repo on at least one side"))?;
        let base = to.branch.as_deref().unwrap_or(DEFAULT_BRANCH);
        let head = from.head_label();

        let existing = self
            .list_pulls(&to.owner, repo, Some(base), Some(from))
            .await?;
        if let Some(found) = existing.into_iter().next() {
            debug!(
                "Pull request #{} already open for {} -> {}",
                found.number, head, base
            );
            return Ok(found);
        }

        let path = format!("repos/{}/{}/pulls", to.owner, repo);
        let body = CreatePullBody {
            base,
            head: &head,
            title: &pull.title,
            body: pull.body.as_deref().unwrap_or(""),
            issue: pull.issue.map(|n| n.to_string()),
        };
        info!(
            "Opening pull request {} -> {} on {}/{}",
            head, base, to.owner, repo
        );
        self.transport.post(&path, &body).await
    }
}
