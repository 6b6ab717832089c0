//! Path utilities for classifying media files and mapping them into the
//! output tree.
//!
//! The output tree mirrors the input tree: a source at
//! `<input>/<rel>/<name>.<ext>` converts to `<output>/<rel>/<name>.wav`, and
//! every converted file in `<output>/<rel>` is later merged into
//! `<output>/<rel>/<basename of rel>.wav`.

use std::path::{Path, PathBuf};

/// Extension of the intermediate format produced by conversion.
pub const INTERMEDIATE_EXTENSION: &str = "wav";

/// Source extensions picked up when no explicit list is configured.
const DEFAULT_SOURCE_EXTENSIONS: &[&str] = &["mp3", "m4v"];

/// Container extensions that may carry a video stream which must be dropped.
const VIDEO_CONTAINER_EXTENSIONS: &[&str] = &[
    "m4v", "mp4", "mkv", "mov", "avi", "webm", "flv", "wmv", "ts",
];

/// Get the default list of eligible source extensions.
///
/// # Examples
///
/// ```
/// use wavbatch_common::paths::default_source_extensions;
///
/// let extensions = default_source_extensions();
/// assert!(extensions.contains(&"mp3"));
/// assert!(extensions.contains(&"m4v"));
/// ```
#[must_use]
pub fn default_source_extensions() -> &'static [&'static str] {
    DEFAULT_SOURCE_EXTENSIONS
}

/// Lowercased extension of a path, if it has one.
pub fn extension_lowercase(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}

/// Check if a path has one of the given extensions (case-insensitive).
///
/// Entries in `extensions` are compared without a leading dot and are
/// expected to be lowercase.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use wavbatch_common::paths::has_extension;
///
/// assert!(has_extension(Path::new("song.MP3"), &["mp3"]));
/// assert!(!has_extension(Path::new("notes.txt"), &["mp3"]));
/// ```
pub fn has_extension<S: AsRef<str>>(path: &Path, extensions: &[S]) -> bool {
    extension_lowercase(path)
        .map(|ext| extensions.iter().any(|e| e.as_ref() == ext))
        .unwrap_or(false)
}

/// Check if a path is a container whose video stream must be discarded.
pub fn is_video_container(path: &Path) -> bool {
    has_extension(path, VIDEO_CONTAINER_EXTENSIONS)
}

/// Check if a path is an intermediate (converted) file.
///
/// The match is exact: only the lowercase `.wav` extension written by the
/// conversion stage counts.
pub fn is_intermediate_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext == INTERMEDIATE_EXTENSION)
        .unwrap_or(false)
}

/// Compute the output directory a source file belongs to.
///
/// The file's parent directory relative to `input_root` is re-rooted onto
/// `output_root`. Returns `None` when `file` does not live under
/// `input_root`.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use wavbatch_common::paths::mirror_dir;
///
/// let group = mirror_dir(Path::new("audio"), Path::new("wav"), Path::new("audio/a/x.mp3"));
/// assert_eq!(group.as_deref(), Some(Path::new("wav/a")));
/// ```
pub fn mirror_dir(input_root: &Path, output_root: &Path, file: &Path) -> Option<PathBuf> {
    let relative = file.strip_prefix(input_root).ok()?;
    match relative.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => Some(output_root.join(parent)),
        _ => Some(output_root.to_path_buf()),
    }
}

/// Destination of a converted source inside its group directory.
///
/// Keeps the source's file stem and swaps the extension for the
/// intermediate one.
pub fn intermediate_path(group_dir: &Path, source: &Path) -> Option<PathBuf> {
    let stem = source.file_stem()?;
    let mut name = stem.to_os_string();
    name.push(".");
    name.push(INTERMEDIATE_EXTENSION);
    Some(group_dir.join(name))
}

/// Path of the merged output for a group directory: `<dir>/<dir name>.wav`.
///
/// Returns `None` for directories without a final component (`/`, `..`).
pub fn merge_output_path(group_dir: &Path) -> Option<PathBuf> {
    let base = group_dir.file_name()?;
    let mut name = base.to_os_string();
    name.push(".");
    name.push(INTERMEDIATE_EXTENSION);
    Some(group_dir.join(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_extension() {
        assert!(has_extension(Path::new("a/b/song.mp3"), &["mp3", "m4v"]));
        assert!(has_extension(Path::new("clip.M4V"), &["mp3", "m4v"]));
        assert!(!has_extension(Path::new("cover.jpg"), &["mp3", "m4v"]));
        assert!(!has_extension(Path::new("no_extension"), &["mp3"]));
        assert!(!has_extension(Path::new(".mp3"), &["mp3"]));
    }

    #[test]
    fn test_is_video_container() {
        assert!(is_video_container(Path::new("talk.m4v")));
        assert!(is_video_container(Path::new("talk.MP4")));
        assert!(!is_video_container(Path::new("song.mp3")));
        assert!(!is_video_container(Path::new("song.wav")));
    }

    #[test]
    fn test_is_intermediate_file() {
        assert!(is_intermediate_file(Path::new("wav/a/x.wav")));
        assert!(!is_intermediate_file(Path::new("wav/a/x.WAV")));
        assert!(!is_intermediate_file(Path::new("wav/a/x.mp3")));
        assert!(!is_intermediate_file(Path::new("wav/a/.x.wav.part")));
    }

    #[test]
    fn test_mirror_dir() {
        let input = Path::new("audio");
        let output = Path::new("wav");

        assert_eq!(
            mirror_dir(input, output, Path::new("audio/a/x.mp3")),
            Some(PathBuf::from("wav/a"))
        );
        assert_eq!(
            mirror_dir(input, output, Path::new("audio/a/b/c/y.m4v")),
            Some(PathBuf::from("wav/a/b/c"))
        );
        // Files directly under the input root map to the output root.
        assert_eq!(
            mirror_dir(input, output, Path::new("audio/top.mp3")),
            Some(PathBuf::from("wav"))
        );
        assert_eq!(mirror_dir(input, output, Path::new("elsewhere/x.mp3")), None);
    }

    #[test]
    fn test_intermediate_path() {
        assert_eq!(
            intermediate_path(Path::new("wav/a"), Path::new("audio/a/y.m4v")),
            Some(PathBuf::from("wav/a/y.wav"))
        );
        assert_eq!(
            intermediate_path(Path::new("wav/a"), Path::new("audio/a/track.01.mp3")),
            Some(PathBuf::from("wav/a/track.01.wav"))
        );
    }

    #[test]
    fn test_merge_output_path() {
        assert_eq!(
            merge_output_path(Path::new("wav/a")),
            Some(PathBuf::from("wav/a/a.wav"))
        );
        assert_eq!(
            merge_output_path(Path::new("/data/wav/Side B")),
            Some(PathBuf::from("/data/wav/Side B/Side B.wav"))
        );
        assert_eq!(merge_output_path(Path::new("/")), None);
    }
}
