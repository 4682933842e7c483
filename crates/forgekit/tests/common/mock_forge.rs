//! Mock server helpers for forge API testing
//!
//! Provides client factories wired to a wiremock server and builders for
//! the wire shapes the forge API responds with.

use forgekit::{ForgeClient, ForgeConfig, PollPolicy};
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::constants::*;

/// Client wired to a mock server, polling fast and forking as FORK_OWNER
pub fn test_client(api_url: &str) -> ForgeClient {
    test_client_with_poll(api_url, PollPolicy::new(10))
}

/// Client wired to a mock server with an explicit fork polling policy
pub fn test_client_with_poll(api_url: &str, fork_poll: PollPolicy) -> ForgeClient {
    let config = ForgeConfig {
        api_url: api_url.to_string(),
        username: Some(FORK_OWNER.to_string()),
        fork_poll,
        ..Default::default()
    };
    ForgeClient::new(config).expect("client should build")
}

/// Wire shape of a ref response
pub fn ref_json(reference: &str, sha: &str) -> Value {
    json!({
        "ref": format!("refs/{}", reference),
        "url": format!("https://forge.test/git/refs/{}", reference),
        "object": {
            "sha": sha,
            "type": "commit",
            "url": format!("https://forge.test/git/commits/{}", sha)
        }
    })
}

/// Wire shape of a commit response
pub fn commit_json(sha: &str, tree_sha: &str, parent: Option<&str>) -> Value {
    let parents = match parent {
        Some(parent) => json!([{"sha": parent, "url": "https://forge.test/git/commits"}]),
        None => json!([]),
    };
    json!({
        "sha": sha,
        "message": "a commit message",
        "tree": {"sha": tree_sha, "url": "https://forge.test/git/trees"},
        "parents": parents
    })
}

/// Wire shape of a tree response
pub fn tree_json(sha: &str) -> Value {
    json!({
        "sha": sha,
        "url": "https://forge.test/git/trees",
        "tree": [],
        "truncated": false
    })
}

/// Wire shape of a blob creation receipt
pub fn blob_json(sha: &str) -> Value {
    json!({"sha": sha, "url": "https://forge.test/git/blobs"})
}

/// Wire shape of a pull request
pub fn pull_json(number: u64, title: &str) -> Value {
    json!({
        "number": number,
        "title": title,
        "body": "",
        "state": "open",
        "html_url": format!("https://forge.test/pull/{}", number)
    })
}

/// Mount a HEAD existence probe returning `status`
pub async fn mock_repo_head(server: &MockServer, owner: &str, repo: &str, status: u16) {
    Mock::given(method("HEAD"))
        .and(path(format!("/repos/{}/{}", owner, repo)))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

/// Mount a branch tip lookup
pub async fn mock_branch_ref(
    server: &MockServer,
    owner: &str,
    repo: &str,
    branch: &str,
    sha: &str,
) {
    Mock::given(method("GET"))
        .and(path(format!(
            "/repos/{}/{}/git/refs/heads/{}",
            owner, repo, branch
        )))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(ref_json(&format!("heads/{}", branch), sha)),
        )
        .mount(server)
        .await;
}

/// Mount a branch tip lookup that misses
pub async fn mock_branch_missing(server: &MockServer, owner: &str, repo: &str, branch: &str) {
    Mock::given(method("GET"))
        .and(path(format!(
            "/repos/{}/{}/git/refs/heads/{}",
            owner, repo, branch
        )))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "Not Found"})))
        .mount(server)
        .await;
}
