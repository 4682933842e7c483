//! Forge client construction and shared state

use forgekit_core::ForgeConfig;
use tokio_util::sync::CancellationToken;

use crate::error::Result;
use crate::transport::Transport;

/// Async client for a hosted forge API
///
/// One instance per configuration. Operations borrow the client immutably
/// and may run concurrently; the client holds no per-operation state. Wait
/// loops (fork visibility) stop cooperatively when the token returned by
/// [`cancellation_token`](Self::cancellation_token) is cancelled.
pub struct ForgeClient {
    pub(crate) transport: Transport,
    pub(crate) config: ForgeConfig,
    cancel: CancellationToken,
}

impl ForgeClient {
    /// Create a new client from configuration
    pub fn new(config: ForgeConfig) -> Result<Self> {
        let transport = Transport::new(&config)?;
        Ok(Self {
            transport,
            config,
            cancel: CancellationToken::new(),
        })
    }

    /// The configuration this client was built with
    pub fn config(&self) -> &ForgeConfig {
        &self.config
    }

    /// Token that stops the client's wait loops when cancelled
    ///
    /// The returned token is a handle to shared state; cancelling any clone
    /// stops the loops. An in-flight request still runs to completion.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub(crate) fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }
}
