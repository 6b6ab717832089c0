use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub merge: MergeConfig,

    #[serde(default)]
    pub jobs: JobsConfig,

    #[serde(default)]
    pub scan: ScanConfig,

    #[serde(default)]
    pub tools: ToolsConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PathsConfig {
    /// Root of the tree to convert
    #[serde(default = "default_input")]
    pub input: PathBuf,

    /// Root of the mirrored WAV tree
    #[serde(default = "default_output")]
    pub output: PathBuf,
}

fn default_input() -> PathBuf {
    PathBuf::from("./audio")
}
fn default_output() -> PathBuf {
    PathBuf::from("./wav")
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            input: default_input(),
            output: default_output(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MergeConfig {
    /// Merge each output directory into a single file after conversion (default: true)
    #[serde(default = "default_merge_enabled")]
    pub enabled: bool,
}

fn default_merge_enabled() -> bool {
    true
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            enabled: default_merge_enabled(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JobsConfig {
    /// Maximum number of ffmpeg processes running at once (default: logical CPUs)
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Kill a single encode/merge after this many seconds (default: no limit)
    #[serde(default)]
    pub task_timeout_secs: Option<u64>,
}

fn default_concurrency() -> usize {
    num_cpus::get()
}

impl Default for JobsConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            task_timeout_secs: None,
        }
    }
}

impl JobsConfig {
    /// Concurrency ceiling; a zero that slipped past validation counts as one.
    pub fn limit(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.concurrency).unwrap_or(NonZeroUsize::MIN)
    }

    pub fn task_timeout(&self) -> Option<Duration> {
        self.task_timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScanConfig {
    /// Source file extensions to convert, without the dot
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

fn default_extensions() -> Vec<String> {
    wavbatch_common::paths::default_source_extensions()
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ToolsConfig {
    /// Explicit ffmpeg binary; looked up on PATH when unset
    #[serde(default)]
    pub ffmpeg: Option<PathBuf>,
}
