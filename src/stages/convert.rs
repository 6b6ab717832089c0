//! Conversion stage: one task per source file.

use super::{Operation, StageContext, TaskOutcome};
use crate::error::{Error, Result};
use crate::events::{PipelineEvent, StageKind};
use crate::grouper::GroupMap;
use std::path::PathBuf;
use wavbatch_av::EncodeOptions;
use wavbatch_common::paths::{intermediate_path, merge_output_path};
use wavbatch_common::MediaFile;

/// Convert one source into its group directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertJob {
    pub source: MediaFile,
    pub dest: PathBuf,
    /// Set when the group was already merged before this run started, in
    /// which case the source was converted, merged and cleaned up earlier.
    pub merged: Option<PathBuf>,
}

/// Build one conversion task per (group, file) pair, in map order.
///
/// With `merge` set, groups whose merge output exists right now are marked as
/// done. The check happens here, once, so an output written later in the same
/// run (a source named after its directory) never suppresses its siblings.
pub fn build_conversion_tasks(groups: &GroupMap, merge: bool) -> Vec<Operation> {
    groups
        .iter()
        .flat_map(|(group, files)| {
            let merged = merge
                .then(|| merge_output_path(group))
                .flatten()
                .filter(|output| output.is_file());
            files.iter().filter_map(move |file| match intermediate_path(group, file.path()) {
                Some(dest) => Some(Operation::Convert(ConvertJob {
                    source: file.clone(),
                    dest,
                    merged: merged.clone(),
                })),
                None => {
                    tracing::warn!("Cannot derive an output name for {:?}", file.path());
                    None
                }
            })
        })
        .collect()
}

pub(super) async fn run(job: ConvertJob, ctx: &StageContext) -> Result<TaskOutcome> {
    let result = convert(&job, ctx).await;
    if let Err(e) = &result {
        ctx.events.emit(PipelineEvent::Error {
            stage: StageKind::Convert,
            path: job.source.path.clone(),
            message: e.to_string(),
        });
    }
    result
}

async fn convert(job: &ConvertJob, ctx: &StageContext) -> Result<TaskOutcome> {
    let source = job.source.path();

    for done in std::iter::once(&job.dest).chain(job.merged.as_ref()) {
        let exists = tokio::fs::try_exists(done)
            .await
            .map_err(|e| Error::conversion(source, e))?;
        if exists {
            ctx.events.emit(PipelineEvent::Skipped {
                stage: StageKind::Convert,
                path: done.clone(),
            });
            return Ok(TaskOutcome::Skipped { path: done.clone() });
        }
    }

    if let Some(parent) = job.dest.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| Error::conversion(source, e))?;
    }

    let options = EncodeOptions {
        strip_video: job.source.strip_video(),
    };
    ctx.engine
        .encode(source, &job.dest, options)
        .await
        .map_err(|e| Error::conversion(source, e))?;

    ctx.events.emit(PipelineEvent::Converted {
        source: source.to_path_buf(),
        output: job.dest.clone(),
    });
    Ok(TaskOutcome::Converted {
        output: job.dest.clone(),
    })
}
