//! Shared helpers for integration tests.
//!
//! Provides [`MediaTree`], a temporary input/output tree, and
//! [`RecordingEngine`], an in-process [`MediaEngine`] that writes marker
//! files instead of running ffmpeg and records every call.

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tempfile::TempDir;
use walkdir::WalkDir;
use wavbatch::config::Config;
use wavbatch_av::{EncodeOptions, MediaEngine};

/// A temporary `audio/` input root next to a `wav/` output root.
pub struct MediaTree {
    pub dir: TempDir,
    pub input: PathBuf,
    pub output: PathBuf,
}

impl MediaTree {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("audio");
        let output = dir.path().join("wav");
        std::fs::create_dir_all(&input).unwrap();
        Self { dir, input, output }
    }

    /// Create a source file at `relative` under the input root.
    pub fn add_source(&self, relative: &str) -> PathBuf {
        let path = self.input.join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, relative).unwrap();
        path
    }

    /// Create a file at `relative` under the output root.
    pub fn add_output(&self, relative: &str, contents: &str) -> PathBuf {
        let path = self.output.join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, contents).unwrap();
        path
    }

    pub fn out(&self, relative: &str) -> PathBuf {
        self.output.join(relative)
    }

    /// Every file under the output root, relative to it.
    pub fn output_files(&self) -> BTreeSet<String> {
        if !self.output.exists() {
            return BTreeSet::new();
        }
        WalkDir::new(&self.output)
            .into_iter()
            .map(|e| e.unwrap())
            .filter(|e| e.file_type().is_file())
            .map(|e| {
                e.path()
                    .strip_prefix(&self.output)
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect()
    }

    pub fn config(&self) -> Config {
        let mut config = Config::default();
        config.paths.input = self.input.clone();
        config.paths.output = self.output.clone();
        config.jobs.concurrency = 4;
        config
    }
}

/// Fake engine: encode writes `[source path]`, merge concatenates inputs.
#[derive(Default)]
pub struct RecordingEngine {
    pub encodes: Mutex<Vec<(PathBuf, EncodeOptions)>>,
    pub merges: Mutex<Vec<(Vec<PathBuf>, PathBuf)>>,
    /// Source or merge-output file names that fail immediately.
    pub fail_on: Vec<String>,
    /// How long successful calls take.
    pub delay: Duration,
    running: AtomicUsize,
    pub peak: AtomicUsize,
}

impl RecordingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn failing_on(mut self, name: &str) -> Self {
        self.fail_on.push(name.to_string());
        self
    }

    pub fn encode_count(&self) -> usize {
        self.encodes.lock().len()
    }

    pub fn merge_count(&self) -> usize {
        self.merges.lock().len()
    }

    fn fails(&self, path: &Path) -> bool {
        path.file_name()
            .map(|n| self.fail_on.iter().any(|f| n.to_string_lossy() == *f))
            .unwrap_or(false)
    }

    async fn busy(&self) {
        let now = self.running.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.running.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl MediaEngine for RecordingEngine {
    async fn encode(
        &self,
        source: &Path,
        dest: &Path,
        options: EncodeOptions,
    ) -> wavbatch_av::Result<()> {
        self.encodes.lock().push((source.to_path_buf(), options));
        if self.fails(source) {
            return Err(wavbatch_av::Error::tool_failed(
                "ffmpeg",
                "Invalid data found when processing input",
            ));
        }
        self.busy().await;
        tokio::fs::write(dest, format!("[{}]", source.display())).await?;
        Ok(())
    }

    async fn merge(&self, sources: &[PathBuf], dest: &Path) -> wavbatch_av::Result<()> {
        self.merges.lock().push((sources.to_vec(), dest.to_path_buf()));
        if self.fails(dest) {
            return Err(wavbatch_av::Error::tool_failed("ffmpeg", "concat failed"));
        }
        self.busy().await;
        let mut merged = Vec::new();
        for source in sources {
            merged.extend(tokio::fs::read(source).await?);
        }
        tokio::fs::write(dest, merged).await?;
        Ok(())
    }
}
