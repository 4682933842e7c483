//! # forgekit-core
//!
//! Core library for the forgekit client providing:
//! - Client configuration types (`ForgeConfig`)
//! - Poll execution engine with policy-based configuration

pub mod config;
pub mod poll;

pub use config::ForgeConfig;
pub use poll::{poll_until, PollError, PollPolicy};
