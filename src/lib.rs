//! wavbatch - batch WAV conversion with per-directory merging
//!
//! This library crate exposes the pipeline for the binary and for
//! integration testing.

pub mod config;
pub mod error;
pub mod events;
pub mod grouper;
pub mod limiter;
pub mod pipeline;
pub mod stages;

#[cfg(test)]
mod test_fixtures;

pub use error::{Error, Result};
