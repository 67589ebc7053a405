//! satrec library crate.
//!
//! A controller for long-running, detached stream-capture processes:
//! it launches transcoders, tracks them in a durable registry, and
//! reconciles that registry against the OS process table so its view
//! stays correct across controller restarts and crashes.

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod reconciler;
pub mod recorder;
pub mod registry;
pub mod scheduler;
pub mod storage;

#[cfg(test)]
pub(crate) mod testutil;

pub use error::{Error, Result};
