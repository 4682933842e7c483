//! Common test infrastructure for forgekit tests
//!
//! This module provides shared constants and helper functions to reduce
//! duplication across test files.
//!
//! # Usage
//!
//! In your test file, add:
//! ```ignore
//! mod common;
//! use common::*;
//! ```
//!
//! # Modules
//!
//! - `constants`: Repository coordinates, branch names, commit SHAs
//! - `mock_forge`: Wiremock setup helpers and client factories

// Allow unused code in test infrastructure - not every test file uses every helper
#![allow(dead_code)]
#![allow(unused_imports)]

pub mod constants;
pub mod mock_forge;

// Re-export all public items for convenience
pub use constants::*;
pub use mock_forge::*;
