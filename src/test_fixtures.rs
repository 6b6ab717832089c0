//! Test doubles shared by unit tests.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use wavbatch_av::{EncodeOptions, MediaEngine};

/// In-process [`MediaEngine`] that writes marker files and records calls.
#[derive(Default)]
pub struct FakeEngine {
    pub encodes: Mutex<Vec<(PathBuf, PathBuf, EncodeOptions)>>,
    pub merges: Mutex<Vec<(Vec<PathBuf>, PathBuf)>>,
    /// Fail any call whose source or destination file name equals this.
    pub fail_on: Option<String>,
}

impl FakeEngine {
    pub fn failing_on(name: &str) -> Self {
        Self {
            fail_on: Some(name.to_string()),
            ..Self::default()
        }
    }

    fn should_fail(&self, path: &Path) -> bool {
        match (&self.fail_on, path.file_name()) {
            (Some(target), Some(name)) => name.to_string_lossy() == *target,
            _ => false,
        }
    }
}

#[async_trait]
impl MediaEngine for FakeEngine {
    async fn encode(
        &self,
        source: &Path,
        dest: &Path,
        options: EncodeOptions,
    ) -> wavbatch_av::Result<()> {
        self.encodes
            .lock()
            .push((source.to_path_buf(), dest.to_path_buf(), options));
        if self.should_fail(source) {
            return Err(wavbatch_av::Error::tool_failed("ffmpeg", "invalid data"));
        }
        tokio::fs::write(dest, format!("[{}]", source.display())).await?;
        Ok(())
    }

    async fn merge(&self, sources: &[PathBuf], dest: &Path) -> wavbatch_av::Result<()> {
        self.merges.lock().push((sources.to_vec(), dest.to_path_buf()));
        if self.should_fail(dest) {
            return Err(wavbatch_av::Error::tool_failed("ffmpeg", "concat failed"));
        }
        let mut merged = Vec::new();
        for source in sources {
            merged.extend(tokio::fs::read(source).await?);
        }
        tokio::fs::write(dest, merged).await?;
        Ok(())
    }
}
