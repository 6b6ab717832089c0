//! The two pipeline stages and the task values they schedule.
//!
//! Stage builders turn a [`GroupMap`](crate::grouper::GroupMap) into a list of
//! [`Operation`]s. An operation is plain data describing one unit of work; the
//! limiter runs it by calling [`Operation::execute`].

pub mod convert;
pub mod merge;

pub use convert::{build_conversion_tasks, ConvertJob};
pub use merge::{build_merge_tasks, MergeJob};

use crate::error::Result;
use crate::events::{EventSink, StageKind};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use wavbatch_av::MediaEngine;

/// One schedulable unit of work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Convert(ConvertJob),
    Merge(MergeJob),
}

impl Operation {
    pub fn stage(&self) -> StageKind {
        match self {
            Operation::Convert(_) => StageKind::Convert,
            Operation::Merge(_) => StageKind::Merge,
        }
    }

    /// The file or directory this operation writes.
    pub fn target(&self) -> &Path {
        match self {
            Operation::Convert(job) => &job.dest,
            Operation::Merge(job) => &job.group,
        }
    }

    pub async fn execute(self, ctx: StageContext) -> Result<TaskOutcome> {
        match self {
            Operation::Convert(job) => convert::run(job, &ctx).await,
            Operation::Merge(job) => merge::run(job, &ctx).await,
        }
    }
}

/// What a finished task did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    Converted { output: PathBuf },
    Merged { output: PathBuf, deleted: usize },
    Skipped { path: PathBuf },
    NothingToMerge,
}

/// Collaborators shared by every task in a stage.
#[derive(Clone)]
pub struct StageContext {
    pub engine: Arc<dyn MediaEngine>,
    pub events: EventSink,
}

impl StageContext {
    pub fn new(engine: Arc<dyn MediaEngine>, events: EventSink) -> Self {
        Self { engine, events }
    }
}
