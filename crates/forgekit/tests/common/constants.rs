//! Shared constants for test infrastructure
//!
//! Centralized repository coordinates, branch names, and commit SHAs to
//! eliminate duplication across test files.

// Repository coordinates
pub const UPSTREAM_OWNER: &str = "upstream";
pub const FORK_OWNER: &str = "octocat";
pub const REPO: &str = "widgets";

// Branch names
pub const MASTER: &str = "master";
pub const FEATURE: &str = "feature";

// Commit SHAs
pub const SHA_MASTER_TIP: &str = "aa218f56b14c9653891f9e74264a383fa43fefbd";
pub const SHA_FEATURE_TIP: &str = "bb3b2a9c4f8e7d6c5b4a3928171605f4e3d2c1b0";
pub const SHA_BASE_TREE: &str = "cc44cdabc193dabf2c8b1a9ff67a2ab06b41f0a9";
pub const SHA_NEW_TREE: &str = "dd5a89210fbbe36b34da74cda07a710ed7466b3b";
pub const SHA_NEW_COMMIT: &str = "ee6f5d1e21b40ace27b4a26a6e8f16f1d2b530a5";
pub const SHA_BLOB_A: &str = "f1d2d2f924e986ac86fdf7b36c94bcdf32beec15";
pub const SHA_BLOB_B: &str = "e69de29bb2d1d6434b8b29ae775ad8c2e48c5391";
