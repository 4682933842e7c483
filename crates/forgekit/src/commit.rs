//! Multi-file commit construction
//!
//! A commit is built bottom-up from git plumbing objects: one blob per
//! file update, a tree layered on the current branch tree, a commit object
//! parented on the observed branch tip, and finally a ref update moving
//! the branch to the new commit.

use base64::Engine as _;
use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::client::ForgeClient;
use crate::error::{Error, Result};
use crate::refs::GitRef;
use crate::DEFAULT_BRANCH;

const DEFAULT_FILE_MODE: &str = "100644";
const DEFAULT_OBJECT_TYPE: &str = "blob";

/// File content for a blob, deciding the wire encoding by representation
#[derive(Debug, Clone)]
pub enum FileContent {
    /// UTF-8 text, submitted unmodified
    Text(String),
    /// Raw bytes, base64-encoded on the wire
    Binary(Vec<u8>),
}

impl FileContent {
    fn encoding(&self) -> &'static str {
        match self {
            FileContent::Text(_) => "utf-8",
            FileContent::Binary(_) => "base64",
        }
    }

    fn wire_content(&self) -> String {
        match self {
            FileContent::Text(text) => text.clone(),
            FileContent::Binary(bytes) => base64::engine::general_purpose::STANDARD.encode(bytes),
        }
    }
}

impl From<&str> for FileContent {
    fn from(text: &str) -> Self {
        FileContent::Text(text.to_string())
    }
}

impl From<String> for FileContent {
    fn from(text: String) -> Self {
        FileContent::Text(text)
    }
}

impl From<&[u8]> for FileContent {
    fn from(bytes: &[u8]) -> Self {
        FileContent::Binary(bytes.to_vec())
    }
}

impl From<Vec<u8>> for FileContent {
    fn from(bytes: Vec<u8>) -> Self {
        FileContent::Binary(bytes)
    }
}

/// A single file change within a commit
#[derive(Debug, Clone)]
pub struct FileUpdate {
    /// Path within the repository; backslash separators are normalized to
    /// `/` and one leading `/` is stripped
    pub path: String,

    /// New file content
    pub content: FileContent,

    /// File mode (defaults to "100644")
    pub mode: Option<String>,

    /// Object type (defaults to "blob")
    pub object_type: Option<String>,
}

impl FileUpdate {
    /// Create a file update with the default mode and type
    pub fn new(path: impl Into<String>, content: impl Into<FileContent>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            mode: None,
            object_type: None,
        }
    }
}

/// Commit author identity
#[derive(Debug, Clone, Serialize)]
pub struct CommitAuthor {
    /// Author name
    pub name: String,

    /// Author email
    pub email: String,

    /// ISO 8601 timestamp; the service fills in the current time when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl CommitAuthor {
    /// Author identity without an explicit date
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            date: None,
        }
    }
}

/// A commit to construct on a branch
#[derive(Debug, Clone)]
pub struct NewCommit {
    /// Branch to advance (defaults to "master")
    pub branch: Option<String>,

    /// Commit message
    pub message: String,

    /// Files to create or replace
    pub updates: Vec<FileUpdate>,

    /// Author identity; the service derives one from authentication when
    /// absent
    pub author: Option<CommitAuthor>,
}

impl NewCommit {
    /// Create a commit for the default branch with no explicit author
    pub fn new(message: impl Into<String>, updates: Vec<FileUpdate>) -> Self {
        Self {
            branch: None,
            message: message.into(),
            updates,
            author: None,
        }
    }

    /// Set the branch to advance
    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }

    /// Set the author identity
    pub fn with_author(mut self, author: CommitAuthor) -> Self {
        self.author = Some(author);
        self
    }
}

/// Options controlling how the branch ref is moved
#[derive(Debug, Clone, Copy, Default)]
pub struct CommitOptions {
    /// Move the ref even when the update is not a fast-forward
    pub force: bool,
}

/// Blob creation receipt
#[derive(Debug, Clone, Deserialize)]
pub struct Blob {
    /// SHA of the created blob
    pub sha: String,

    /// API URL of the blob
    pub url: Option<String>,
}

/// SHA pointer to another git object
#[derive(Debug, Clone, Deserialize)]
pub struct ShaRef {
    /// Object SHA
    pub sha: String,

    /// API URL of the object
    pub url: Option<String>,
}

/// A commit object
#[derive(Debug, Clone, Deserialize)]
pub struct GitCommit {
    /// Commit SHA
    pub sha: String,

    /// Commit message
    pub message: String,

    /// Tree the commit snapshots
    pub tree: ShaRef,

    /// Parent commits
    #[serde(default)]
    pub parents: Vec<ShaRef>,
}

/// A tree object listing
#[derive(Debug, Clone, Deserialize)]
pub struct Tree {
    /// SHA of the tree
    pub sha: String,

    /// API URL of the tree
    pub url: Option<String>,

    /// Entries of the tree
    #[serde(default)]
    pub tree: Vec<TreeEntry>,

    /// Whether the listing was truncated by the service
    #[serde(default)]
    pub truncated: bool,
}

/// One entry within a tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeEntry {
    /// Path relative to the repository root
    pub path: String,

    /// File mode (e.g., "100644")
    pub mode: String,

    /// Object type (e.g., "blob")
    #[serde(rename = "type")]
    pub entry_type: String,

    /// SHA of the referenced object
    pub sha: String,
}

impl TreeEntry {
    /// Blob entry with the default file mode
    pub fn blob(path: impl Into<String>, sha: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            mode: DEFAULT_FILE_MODE.to_string(),
            entry_type: DEFAULT_OBJECT_TYPE.to_string(),
            sha: sha.into(),
        }
    }
}

#[derive(Serialize)]
struct CreateBlobBody {
    content: String,
    encoding: &'static str,
}

#[derive(Serialize)]
struct CreateTreeBody<'a> {
    tree: &'a [TreeEntry],
    #[serde(skip_serializing_if = "Option::is_none")]
    base_tree: Option<&'a str>,
}

#[derive(Serialize)]
struct CreateCommitBody<'a> {
    message: &'a str,
    tree: &'a str,
    parents: Vec<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    author: Option<&'a CommitAuthor>,
}

/// Normalize a repository file path: backslash separators become `/` and
/// one leading `/` is stripped
fn normalize_path(path: &str) -> String {
    let path = path.replace('\\', "/");
    match path.strip_prefix('/') {
        Some(stripped) => stripped.to_string(),
        None => path,
    }
}

impl ForgeClient {
    /// Create a blob from file content
    ///
    /// Text is submitted unmodified as UTF-8; binary content is
    /// base64-encoded on the wire.
    pub async fn create_blob(
        &self,
        owner: &str,
        repo: &str,
        content: &FileContent,
    ) -> Result<Blob> {
        let path = format!("repos/{}/{}/git/blobs", owner, repo);
        let body = CreateBlobBody {
            content: content.wire_content(),
            encoding: content.encoding(),
        };
        self.transport.post(&path, &body).await
    }

    /// Read a commit object
    pub async fn get_commit(&self, owner: &str, repo: &str, sha: &str) -> Result<GitCommit> {
        let path = format!("repos/{}/{}/git/commits/{}", owner, repo, sha);
        self.transport.get(&path).await
    }

    /// Read a tree object
    pub async fn get_tree(&self, owner: &str, repo: &str, sha: &str) -> Result<Tree> {
        let path = format!("repos/{}/{}/git/trees/{}", owner, repo, sha);
        self.transport.get(&path).await
    }

    /// Create a tree, optionally layered on a base tree
    ///
    /// Entries not named in `entries` are inherited from `base_tree` when
    /// one is given.
    pub async fn create_tree(
        &self,
        owner: &str,
        repo: &str,
        entries: &[TreeEntry],
        base_tree: Option<&str>,
    ) -> Result<Tree> {
        let path = format!("repos/{}/{}/git/trees", owner, repo);
        let body = CreateTreeBody {
            tree: entries,
            base_tree,
        };
        self.transport.post(&path, &body).await
    }

    async fn create_commit(
        &self,
        owner: &str,
        repo: &str,
        message: &str,
        tree: &str,
        parent: &str,
        author: Option<&CommitAuthor>,
    ) -> Result<GitCommit> {
        let path = format!("repos/{}/{}/git/commits", owner, repo);
        let body = CreateCommitBody {
            message,
            tree,
            parents: vec![parent],
            author,
        };
        self.transport.post(&path, &body).await
    }

    /// Commit a set of file updates to a branch
    ///
    /// Builds one blob per update while concurrently resolving the branch
    /// tip and its tree, layers a new tree on that base, creates a commit
    /// whose sole parent is the observed tip, then moves the branch ref to
    /// the new commit.
    ///
    /// The tip is observed once at the start; nothing is locked. If a
    /// concurrent writer moves the branch before the final ref update, a
    /// non-force update fails with [`Error::RefUpdateRejected`] and the
    /// branch is left unchanged. Objects created before the failure are
    /// unreachable and left to the service's garbage collection.
    pub async fn commit(
        &self,
        owner: &str,
        repo: &str,
        commit: NewCommit,
        options: CommitOptions,
    ) -> Result<GitRef> {
        let branch = commit.branch.as_deref().unwrap_or(DEFAULT_BRANCH);

        let blobs = try_join_all(
            commit
                .updates
                .iter()
                .map(|update| self.create_blob(owner, repo, &update.content)),
        );
        let base = async {
            let tip = self.branch_sha(owner, repo, branch).await?;
            let base_commit = self.get_commit(owner, repo, &tip).await?;
            Ok::<_, Error>((tip, base_commit.tree.sha))
        };
        let (blobs, (parent, base_tree)) = tokio::try_join!(blobs, base)?;

        let entries: Vec<TreeEntry> = commit
            .updates
            .iter()
            .zip(&blobs)
            .map(|(update, blob)| TreeEntry {
                path: normalize_path(&update.path),
                mode: update
                    .mode
                    .clone()
                    .unwrap_or_else(|| DEFAULT_FILE_MODE.to_string()),
                entry_type: update
                    .object_type
                    .clone()
                    .unwrap_or_else(|| DEFAULT_OBJECT_TYPE.to_string()),
                sha: blob.sha.clone(),
            })
            .collect();

        let tree = self
            .create_tree(owner, repo, &entries, Some(&base_tree))
            .await?;
        let created = self
            .create_commit(
                owner,
                repo,
                &commit.message,
                &tree.sha,
                &parent,
                commit.author.as_ref(),
            )
            .await?;
        info!(
            "Advancing {} on {}/{} to {} (parent {})",
            branch, owner, repo, created.sha, parent
        );
        self.update_ref(
            owner,
            repo,
            &format!("heads/{}", branch),
            &created.sha,
            options.force,
        )
        .await
    }
}
