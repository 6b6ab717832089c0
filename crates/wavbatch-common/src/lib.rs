//! wavbatch-common: shared media types and path helpers.
//!
//! This crate holds the pieces used by both the scheduler and the tool
//! adapters:
//!
//! - **Media types**: [`MediaFile`] and [`SourceKind`]
//! - **Path utilities**: extension classification and the mirrored
//!   input-to-output path mapping
//!
//! # Examples
//!
//! ```
//! use std::path::Path;
//! use wavbatch_common::paths::{intermediate_path, is_video_container};
//!
//! assert!(is_video_container(Path::new("lecture.m4v")));
//! assert_eq!(
//!     intermediate_path(Path::new("wav/a"), Path::new("audio/a/x.mp3")),
//!     Some(Path::new("wav/a/x.wav").to_path_buf())
//! );
//! ```

pub mod paths;
pub mod types;

pub use types::*;
