//! Core media types shared across wavbatch crates.

use crate::paths;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// What kind of source a media file is, as far as conversion cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Audio-only source.
    Audio,
    /// Video container; only its audio is kept.
    VideoContainer,
}

/// A discovered source file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MediaFile {
    pub path: PathBuf,
    pub kind: SourceKind,
}

impl MediaFile {
    /// Classify a source path by its extension.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let kind = if paths::is_video_container(&path) {
            SourceKind::VideoContainer
        } else {
            SourceKind::Audio
        };
        Self { path, kind }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the encoder must drop the video stream.
    pub fn strip_video(&self) -> bool {
        self.kind == SourceKind::VideoContainer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_file_classification() {
        let audio = MediaFile::new("audio/a/x.mp3");
        assert_eq!(audio.kind, SourceKind::Audio);
        assert!(!audio.strip_video());

        let video = MediaFile::new("audio/a/y.M4V");
        assert_eq!(video.kind, SourceKind::VideoContainer);
        assert!(video.strip_video());
    }

    #[test]
    fn test_serialization() {
        let file = MediaFile::new("audio/a/y.m4v");
        let json = serde_json::to_string(&file).unwrap();
        assert!(json.contains("\"video_container\""));

        let back: MediaFile = serde_json::from_str(&json).unwrap();
        assert_eq!(back, file);
    }
}
