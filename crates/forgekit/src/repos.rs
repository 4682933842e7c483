//! Repository existence checks and fork orchestration

use std::time::Duration;

use forgekit_core::poll::{poll_until, PollError};
use tracing::{debug, info};

use crate::client::ForgeClient;
use crate::error::{Error, Result};

impl ForgeClient {
    /// Check whether a repository is reachable
    ///
    /// Returns `Ok(false)` only on a definitive miss. Auth, network, and
    /// rate-limit failures propagate as errors so that "does not exist" is
    /// never conflated with "could not determine".
    pub async fn exists(&self, owner: &str, repo: &str) -> Result<bool> {
        let path = format!("repos/{}/{}", owner, repo);
        match self.transport.head(&path).await {
            Ok(()) => Ok(true),
            Err(err) if err.is_not_found() => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// Fork a repository into the authenticated user's namespace and wait
    /// until the fork is visible
    ///
    /// `(owner, repo)` names the upstream; the fork lands under
    /// `ForgeConfig::username`. Returns immediately if the fork already
    /// exists. Forking is asynchronous server-side, so after requesting the
    /// fork this polls the fork's existence per `ForgeConfig::fork_poll`
    /// until it appears, the configured attempt bound is reached
    /// ([`Error::WaitExhausted`]), or the client's cancellation token fires
    /// ([`Error::Cancelled`]). Only the existence probe is retried, never
    /// the fork request itself.
    pub async fn fork(&self, owner: &str, repo: &str) -> Result<()> {
        let username = self
            .config
            .username
            .clone()
            .ok_or_else(|| Error::invalid_request("fork requires a configured username"))?;

        if self.exists(&username, repo).await? {
            debug!("Fork {}/{} already exists", username, repo);
            return Ok(());
        }

        self.create_fork(owner, repo).await?;
        info!(
            "Requested fork of {}/{}, waiting for {}/{} to appear",
            owner, repo, username, repo
        );

        let result = poll_until(&self.config.fork_poll, self.cancel_token(), || {
            self.exists(&username, repo)
        })
        .await;

        match result {
            Ok(()) => {
                info!("Fork {}/{} is ready", username, repo);
                Ok(())
            }
            Err(PollError::Probe(err)) => Err(err),
            Err(PollError::Exhausted { attempts, .. }) => Err(Error::wait_exhausted(
                format!("fork of {}/{}", owner, repo),
                attempts,
            )),
            Err(PollError::Cancelled { .. }) => {
                Err(Error::cancelled(format!("fork of {}/{}", owner, repo)))
            }
        }
    }

    /// Request fork creation; the service copies the repository
    /// asynchronously and the response carries no completion signal
    async fn create_fork(&self, owner: &str, repo: &str) -> Result<()> {
        let path = format!("repos/{}/{}/forks", owner, repo);
        let timeout = Duration::from_millis(self.config.fork_timeout_ms);
        self.transport.post_empty(&path, timeout).await
    }
}
