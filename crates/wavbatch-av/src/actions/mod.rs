//! ffmpeg-backed media actions.
//!
//! - Converting a source file to WAV, optionally dropping video
//! - Concatenating WAV files into one

mod concat;
mod encode;

pub use concat::{concat_args, concat_wav};
pub use encode::{encode_args, encode_to_wav};

use crate::engine::{EncodeOptions, MediaEngine};
use crate::tools::get_tool_path;
use crate::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// [`MediaEngine`] backed by the ffmpeg CLI.
#[derive(Debug, Clone)]
pub struct FfmpegEngine {
    ffmpeg: PathBuf,
    timeout: Option<Duration>,
}

impl FfmpegEngine {
    /// Create an engine for a known ffmpeg binary.
    pub fn new(ffmpeg: PathBuf) -> Self {
        Self {
            ffmpeg,
            timeout: None,
        }
    }

    /// Locate ffmpeg, preferring a configured path over `PATH`.
    pub fn locate(configured: Option<&Path>) -> Result<Self> {
        Ok(Self::new(get_tool_path("ffmpeg", configured)?))
    }

    /// Kill any single ffmpeg invocation that runs longer than `timeout`.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn ffmpeg(&self) -> &Path {
        &self.ffmpeg
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

#[async_trait]
impl MediaEngine for FfmpegEngine {
    async fn encode(&self, source: &Path, dest: &Path, options: EncodeOptions) -> Result<()> {
        encode_to_wav(self, source, dest, options).await
    }

    async fn merge(&self, sources: &[PathBuf], dest: &Path) -> Result<()> {
        concat_wav(self, sources, dest).await
    }
}
