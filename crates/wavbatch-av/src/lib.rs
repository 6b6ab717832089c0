//! # wavbatch-av
//!
//! External tool plumbing for wavbatch.
//!
//! This crate provides:
//! - Detection of the external tools (`ffmpeg`, `ffprobe`)
//! - An async [`ToolCommand`] builder with an optional timeout
//! - [`Staging`] files so outputs only appear at their final path once complete
//! - The [`MediaEngine`] capability and its ffmpeg implementation, [`FfmpegEngine`]
//!
//! ## Features
//!
//! - `tracing` - Enable tracing support
//!
//! ## Example
//!
//! ```no_run
//! use wavbatch_av::{EncodeOptions, FfmpegEngine, MediaEngine};
//! use std::path::Path;
//!
//! # async fn example() -> wavbatch_av::Result<()> {
//! let engine = FfmpegEngine::locate(None)?;
//! engine
//!     .encode(
//!         Path::new("audio/a/y.m4v"),
//!         Path::new("wav/a/y.wav"),
//!         EncodeOptions { strip_video: true },
//!     )
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod actions;
mod command;
mod engine;
mod error;
pub mod staging;
pub mod tools;

// Re-exports
pub use actions::FfmpegEngine;
pub use command::{ToolCommand, ToolOutput};
pub use engine::{EncodeOptions, MediaEngine};
pub use error::{Error, Result};
pub use staging::Staging;
pub use tools::{check_tool, check_tools, require_tool, ToolInfo};
