//! Async client for git-plumbing mutations against a hosted forge API
//!
//! Provides:
//! - Repository existence checks and fork-and-wait orchestration
//! - Ref reads, creates, and fast-forward updates
//! - Conflict-aware branch creation from an existing branch tip
//! - Multi-file commit construction (blobs, tree, commit, ref update)
//! - Idempotent pull request submission
//!
//! Operations compose without locks: mutations observe the branch tip
//! once, act, and let a non-force ref update fail when a concurrent
//! writer moved the tip in between.

pub mod client;
pub mod commit;
pub mod error;
pub mod pulls;
pub mod refs;
pub mod repos;
mod transport;

pub use client::ForgeClient;
pub use commit::{
    Blob, CommitAuthor, CommitOptions, FileContent, FileUpdate, GitCommit, NewCommit, ShaRef,
    Tree, TreeEntry,
};
pub use error::{Error, Result};
pub use forgekit_core::{ForgeConfig, PollPolicy};
pub use pulls::{NewPull, PullBranch, PullRequest};
pub use refs::{GitRef, RefObject};

/// Branch assumed when a caller does not name one
pub const DEFAULT_BRANCH: &str = "master";
