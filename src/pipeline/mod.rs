//! Two-stage run: convert every source, then merge every group.

pub mod executor;

pub use executor::Pipeline;

use crate::stages::TaskOutcome;
use serde::Serialize;

/// Counts for one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub files: usize,
    pub groups: usize,
    pub converted: usize,
    pub skipped: usize,
    pub merged: usize,
    pub deleted: usize,
    pub merge_ran: bool,
}

impl RunSummary {
    pub fn record(&mut self, outcome: &TaskOutcome) {
        match outcome {
            TaskOutcome::Converted { .. } => self.converted += 1,
            TaskOutcome::Merged { deleted, .. } => {
                self.merged += 1;
                self.deleted += deleted;
            }
            TaskOutcome::Skipped { .. } => self.skipped += 1,
            TaskOutcome::NothingToMerge => {}
        }
    }

    /// True when the run did no new work.
    pub fn is_noop(&self) -> bool {
        self.converted == 0 && self.merged == 0 && self.deleted == 0
    }
}

impl std::fmt::Display for RunSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} files in {} groups: {} converted, {} skipped",
            self.files, self.groups, self.converted, self.skipped
        )?;
        if self.merge_ran {
            write!(f, ", {} merged, {} deleted", self.merged, self.deleted)?;
        }
        Ok(())
    }
}
