//! Staged outputs with atomic finalization.
//!
//! Tools write into a hidden sibling of the destination
//! (`.<name>.XXXXXX.part`) and the file is renamed into place only once the
//! tool has succeeded. A crashed or failed run therefore never leaves a
//! partial file at the destination path, which later runs would otherwise
//! treat as already done.

use crate::{Error, Result};
use std::path::{Path, PathBuf};
use tempfile::TempPath;

/// Suffix of in-progress staging files.
pub const STAGING_SUFFIX: &str = ".part";

/// A staging file for one output.
///
/// Dropping a `Staging` without committing removes the partial file.
///
/// # Example
///
/// ```no_run
/// use wavbatch_av::Staging;
///
/// let staging = Staging::new("/out/a/x.wav")?;
/// // Let a tool write to staging.path() ...
/// staging.commit()?;
/// # Ok::<(), wavbatch_av::Error>(())
/// ```
#[derive(Debug)]
pub struct Staging {
    temp_path: TempPath,
    destination: PathBuf,
}

impl Staging {
    /// Create a staging file next to `destination`.
    ///
    /// The destination's parent directory must already exist.
    pub fn new<P: AsRef<Path>>(destination: P) -> Result<Self> {
        let destination = destination.as_ref();
        let file_name = destination
            .file_name()
            .ok_or_else(|| Error::InvalidInput(format!("invalid output path: {:?}", destination)))?;
        let parent = match destination.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };

        let mut prefix = std::ffi::OsString::from(".");
        prefix.push(file_name);
        prefix.push(".");

        let temp_path = tempfile::Builder::new()
            .prefix(&prefix)
            .suffix(STAGING_SUFFIX)
            .tempfile_in(parent)
            .map_err(|e| Error::Staging(format!("failed to create staging file in {:?}: {}", parent, e)))?
            .into_temp_path();

        Ok(Self {
            temp_path,
            destination: destination.to_path_buf(),
        })
    }

    /// Path the tool should write to.
    pub fn path(&self) -> &Path {
        &self.temp_path
    }

    /// Final destination path.
    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Atomically move the staged output to its destination.
    pub fn commit(self) -> Result<PathBuf> {
        let written = std::fs::metadata(&self.temp_path)
            .map(|m| m.len())
            .unwrap_or(0);
        if written == 0 {
            return Err(Error::Staging(format!(
                "tool produced no output for {:?}",
                self.destination
            )));
        }

        self.temp_path.persist(&self.destination).map_err(|e| {
            Error::Staging(format!(
                "failed to move output to {:?}: {}",
                self.destination, e.error
            ))
        })?;

        Ok(self.destination)
    }
}
