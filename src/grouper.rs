//! Discovery of source files, grouped by the output directory they land in.

use crate::error::{Error, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;
use wavbatch_common::paths::{has_extension, mirror_dir};
use wavbatch_common::MediaFile;

/// Output directory -> sources converted into it.
///
/// Keys are ordered, and files within a group are ordered by file name, so
/// task lists built from the map are deterministic.
pub type GroupMap = BTreeMap<PathBuf, Vec<MediaFile>>;

/// Walk `input_root` and group every eligible file by its mirrored output
/// directory under `output_root`.
///
/// Files whose extension is not in `extensions` are ignored, and directories
/// without eligible descendants never appear as keys. Any read error aborts
/// the walk.
pub fn discover<S: AsRef<str>>(
    input_root: &Path,
    output_root: &Path,
    extensions: &[S],
) -> Result<GroupMap> {
    info!("Scanning directory: {:?}", input_root);
    let mut groups = GroupMap::new();
    let mut ignored = 0usize;

    for entry in WalkDir::new(input_root)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|source| Error::Traversal {
            path: source
                .path()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| input_root.to_path_buf()),
            source,
        })?;

        if !entry.file_type().is_file() {
            continue;
        }

        let file_path = entry.path();
        if !has_extension(file_path, extensions) {
            ignored += 1;
            continue;
        }

        // Every walked entry lives under the root, so mirroring cannot fail.
        let Some(group) = mirror_dir(input_root, output_root, file_path) else {
            continue;
        };

        debug!("Found {:?} -> {:?}", file_path, group);
        groups
            .entry(group)
            .or_default()
            .push(MediaFile::new(entry.into_path()));
    }

    info!(
        "Scan complete: {} files in {} groups ({} ignored)",
        file_count(&groups),
        groups.len(),
        ignored
    );
    Ok(groups)
}

/// Total number of sources across all groups.
pub fn file_count(groups: &GroupMap) -> usize {
    groups.values().map(Vec::len).sum()
}
