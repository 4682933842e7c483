//! Ref reads, writes, and branch synchronization

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::client::ForgeClient;
use crate::error::{Error, Result};

/// Named pointer to a git object
///
/// The name and URL are absent on descriptors fabricated locally for a
/// branch already at the requested tip.
#[derive(Debug, Clone, Deserialize)]
pub struct GitRef {
    /// Fully qualified ref name (e.g., "refs/heads/feature")
    #[serde(rename = "ref")]
    pub name: Option<String>,

    /// API URL of the ref
    pub url: Option<String>,

    /// Object the ref points at
    pub object: RefObject,
}

/// Object a ref points at
#[derive(Debug, Clone, Deserialize)]
pub struct RefObject {
    /// Commit SHA
    pub sha: String,

    /// Object type (e.g., "commit")
    #[serde(rename = "type")]
    pub object_type: Option<String>,

    /// API URL of the object
    pub url: Option<String>,
}

impl GitRef {
    /// SHA of the object this ref points at
    pub fn sha(&self) -> &str {
        &self.object.sha
    }

    /// Descriptor for a tip known without a ref read-back
    pub(crate) fn from_sha(sha: impl Into<String>) -> Self {
        Self {
            name: None,
            url: None,
            object: RefObject {
                sha: sha.into(),
                object_type: None,
                url: None,
            },
        }
    }
}

#[derive(Serialize)]
struct CreateRefBody<'a> {
    #[serde(rename = "ref")]
    reference: String,
    sha: &'a str,
}

#[derive(Serialize)]
struct UpdateRefBody<'a> {
    sha: &'a str,
    force: bool,
}

impl ForgeClient {
    /// Read a ref (e.g., "heads/feature")
    pub async fn get_ref(&self, owner: &str, repo: &str, reference: &str) -> Result<GitRef> {
        let path = format!("repos/{}/{}/git/refs/{}", owner, repo, reference);
        self.transport.get(&path).await
    }

    /// Create a ref pointing at an existing commit
    ///
    /// `reference` is given without the "refs/" prefix, as in
    /// "heads/feature". Fails if the ref already exists.
    pub async fn create_ref(
        &self,
        owner: &str,
        repo: &str,
        reference: &str,
        sha: &str,
    ) -> Result<GitRef> {
        let path = format!("repos/{}/{}/git/refs", owner, repo);
        let body = CreateRefBody {
            reference: format!("refs/{}", reference),
            sha,
        };
        debug!("Creating ref {} at {} on {}/{}", reference, sha, owner, repo);
        self.transport.post(&path, &body).await
    }

    /// Move a ref to a new commit
    ///
    /// A non-force update is refused by the service unless it is a
    /// fast-forward; the refusal surfaces as [`Error::RefUpdateRejected`]
    /// and the ref keeps its previous tip.
    pub async fn update_ref(
        &self,
        owner: &str,
        repo: &str,
        reference: &str,
        sha: &str,
        force: bool,
    ) -> Result<GitRef> {
        let path = format!("repos/{}/{}/git/refs/{}", owner, repo, reference);
        let body = UpdateRefBody { sha, force };
        debug!("Updating ref {} to {} on {}/{}", reference, sha, owner, repo);
        match self.transport.patch(&path, &body).await {
            Err(Error::Api {
                status: 422,
                message,
            }) => {
                warn!("Ref update rejected for {} on {}/{}", reference, owner, repo);
                Err(Error::ref_update_rejected(reference, message))
            }
            result => result,
        }
    }

    /// Resolve a branch name to its tip commit SHA
    pub async fn branch_sha(&self, owner: &str, repo: &str, branch: &str) -> Result<String> {
        let git_ref = self
            .get_ref(owner, repo, &format!("heads/{}", branch))
            .await?;
        Ok(git_ref.object.sha)
    }

    /// Create branch `to` from the tip of branch `from`
    ///
    /// Both tips are resolved concurrently. An absent `to` is created at
    /// `from`'s tip; a `to` already at that tip is a no-op returning a
    /// descriptor with no writes; a `to` pointing elsewhere fails with
    /// [`Error::BranchDiffers`] and writes nothing. A missing `to` branch
    /// is the only non-erroneous miss; any other failure resolving it
    /// propagates.
    pub async fn branch(&self, owner: &str, repo: &str, from: &str, to: &str) -> Result<GitRef> {
        let (from_sha, to_sha) = tokio::join!(
            self.branch_sha(owner, repo, from),
            self.branch_sha(owner, repo, to),
        );
        let from_sha = from_sha?;
        let to_sha = match to_sha {
            Ok(sha) => Some(sha),
            Err(err) if err.is_not_found() => None,
            Err(err) => return Err(err),
        };

        match to_sha {
            Some(sha) if sha == from_sha => {
                debug!("Branch {} already at {}", to, from_sha);
                Ok(GitRef::from_sha(from_sha))
            }
            Some(_) => {
                warn!("Branch {} exists and differs from {}", to, from);
                Err(Error::branch_differs(from, to))
            }
            None => {
                info!("Creating branch {} from {} on {}/{}", to, from, owner, repo);
                self.create_ref(owner, repo, &format!("heads/{}", to), &from_sha)
                    .await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_ref_deserialization() {
        let git_ref: GitRef = serde_json::from_str(
            r#"{
                "ref": "refs/heads/feature",
                "url": "https://api.github.com/repos/octocat/hello/git/refs/heads/feature",
                "object": {
                    "sha": "aa218f56b14c9653891f9e74264a383fa43fefbd",
                    "type": "commit",
                    "url": "https://api.github.com/repos/octocat/hello/git/commits/aa218f56b14c9653891f9e74264a383fa43fefbd"
                }
            }"#,
        )
        .unwrap();

        assert_eq!(git_ref.name.as_deref(), Some("refs/heads/feature"));
        assert_eq!(git_ref.sha(), "aa218f56b14c9653891f9e74264a383fa43fefbd");
        assert_eq!(git_ref.object.object_type.as_deref(), Some("commit"));
    }

    #[test]
    fn test_from_sha_descriptor() {
        let git_ref = GitRef::from_sha("aa218f56b14c9653891f9e74264a383fa43fefbd");
        assert_eq!(git_ref.name, None);
        assert_eq!(git_ref.sha(), "aa218f56b14c9653891f9e74264a383fa43fefbd");
    }

    #[test]
    fn test_create_ref_body_shape() {
        let body = CreateRefBody {
            reference: "refs/heads/feature".to_string(),
            sha: "aa218f56b14c9653891f9e74264a383fa43fefbd",
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["ref"], "refs/heads/feature");
        assert_eq!(json["sha"], "aa218f56b14c9653891f9e74264a383fa43fefbd");
    }
}
