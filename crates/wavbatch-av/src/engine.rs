//! The media capability the scheduler drives.

use crate::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Per-file options for [`MediaEngine::encode`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Discard any video stream in the source.
    pub strip_video: bool,
}

/// Encode and merge operations on media files.
///
/// Implementations must be atomic with respect to `dest`: on success exactly
/// one complete file exists at `dest`, on failure nothing new does.
#[async_trait]
pub trait MediaEngine: Send + Sync {
    /// Convert `source` into the intermediate format at `dest`.
    async fn encode(&self, source: &Path, dest: &Path, options: EncodeOptions) -> Result<()>;

    /// Concatenate `sources`, in order, into a single file at `dest`.
    async fn merge(&self, sources: &[PathBuf], dest: &Path) -> Result<()>;
}
