//! Merge stage: one task per output group.
//!
//! A merge re-reads the group directory rather than trusting the
//! [`GroupMap`], so WAV files converted on earlier runs are merged too.

use super::{Operation, StageContext, TaskOutcome};
use crate::error::{Error, Result};
use crate::events::{PipelineEvent, StageKind};
use crate::grouper::GroupMap;
use std::path::{Path, PathBuf};
use wavbatch_common::paths::{is_intermediate_file, merge_output_path};

/// Merge every WAV in one group directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeJob {
    pub group: PathBuf,
}

/// Build one merge task per group, in map order.
pub fn build_merge_tasks(groups: &GroupMap) -> Vec<Operation> {
    groups
        .keys()
        .map(|group| {
            Operation::Merge(MergeJob {
                group: group.clone(),
            })
        })
        .collect()
}

pub(super) async fn run(job: MergeJob, ctx: &StageContext) -> Result<TaskOutcome> {
    let result = merge(&job, ctx).await;
    if let Err(e) = &result {
        ctx.events.emit(PipelineEvent::Error {
            stage: StageKind::Merge,
            path: job.group.clone(),
            message: e.to_string(),
        });
    }
    result
}

async fn merge(job: &MergeJob, ctx: &StageContext) -> Result<TaskOutcome> {
    let group = &job.group;

    let found = list_intermediates(group)
        .await
        .map_err(|e| Error::merge(group, e))?;
    if found.is_empty() {
        tracing::debug!("Nothing to merge in {:?}", group);
        return Ok(TaskOutcome::NothingToMerge);
    }

    let output = merge_output_path(group).ok_or_else(|| {
        Error::merge(
            group,
            wavbatch_av::Error::InvalidInput(format!("cannot name merge output for {:?}", group)),
        )
    })?;

    let exists = tokio::fs::try_exists(&output)
        .await
        .map_err(|e| Error::merge(group, e))?;
    if exists {
        ctx.events.emit(PipelineEvent::Skipped {
            stage: StageKind::Merge,
            path: output.clone(),
        });
        return Ok(TaskOutcome::Skipped { path: output });
    }

    let inputs: Vec<PathBuf> = found.into_iter().filter(|p| *p != output).collect();

    ctx.engine
        .merge(&inputs, &output)
        .await
        .map_err(|e| Error::merge(group, e))?;

    ctx.events.emit(PipelineEvent::Concatenated {
        group: group.clone(),
        output: output.clone(),
        inputs: inputs.len(),
    });

    for input in &inputs {
        tokio::fs::remove_file(input)
            .await
            .map_err(|e| Error::merge(group, e))?;
        ctx.events.emit(PipelineEvent::Deleted {
            path: input.clone(),
        });
    }

    Ok(TaskOutcome::Merged {
        output,
        deleted: inputs.len(),
    })
}

/// WAV files directly inside `dir`, sorted by name. A missing directory has none.
async fn list_intermediates(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e),
    };

    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if entry.file_type().await?.is_file() && is_intermediate_file(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventSink;
    use crate::test_fixtures::FakeEngine;
    use std::sync::Arc;
    use tempfile::tempdir;

    fn write(path: &Path, contents: &str) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, contents).unwrap();
    }

    fn drain(rx: &mut tokio::sync::broadcast::Receiver<PipelineEvent>) -> Vec<PipelineEvent> {
        std::iter::from_fn(|| rx.try_recv().ok()).collect()
    }

    #[test]
    fn test_build_merge_tasks() {
        let mut groups = GroupMap::new();
        groups.insert(PathBuf::from("wav/b"), vec![]);
        groups.insert(PathBuf::from("wav/a"), vec![]);

        let tasks = build_merge_tasks(&groups);
        assert_eq!(
            tasks,
            [
                Operation::Merge(MergeJob {
                    group: PathBuf::from("wav/a")
                }),
                Operation::Merge(MergeJob {
                    group: PathBuf::from("wav/b")
                }),
            ]
        );
    }

    #[tokio::test]
    async fn test_merges_and_deletes_inputs() {
        let dir = tempdir().unwrap();
        let group = dir.path().join("wav/a");
        write(&group.join("x.wav"), "x");
        write(&group.join("y.wav"), "y");
        write(&group.join("notes.txt"), "keep me");

        let engine = Arc::new(FakeEngine::default());
        let events = EventSink::new(16);
        let mut rx = events.subscribe();
        let ctx = StageContext::new(engine.clone(), events);

        let outcome = run(MergeJob { group: group.clone() }, &ctx).await.unwrap();

        let output = group.join("a.wav");
        assert_eq!(
            outcome,
            TaskOutcome::Merged {
                output: output.clone(),
                deleted: 2
            }
        );
        assert_eq!(std::fs::read_to_string(&output).unwrap(), "xy");
        assert!(!group.join("x.wav").exists());
        assert!(!group.join("y.wav").exists());
        assert!(group.join("notes.txt").exists());

        let merges = engine.merges.lock();
        assert_eq!(merges[0].0, [group.join("x.wav"), group.join("y.wav")]);

        let events = drain(&mut rx);
        assert!(matches!(events[0], PipelineEvent::Concatenated { inputs: 2, .. }));
        assert_eq!(
            events[1..],
            [
                PipelineEvent::Deleted {
                    path: group.join("x.wav")
                },
                PipelineEvent::Deleted {
                    path: group.join("y.wav")
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_empty_group_is_trivial_success() {
        let dir = tempdir().unwrap();
        let group = dir.path().join("wav/a");
        std::fs::create_dir_all(&group).unwrap();

        let engine = Arc::new(FakeEngine::default());
        let ctx = StageContext::new(engine.clone(), EventSink::default());

        let outcome = run(MergeJob { group }, &ctx).await.unwrap();
        assert_eq!(outcome, TaskOutcome::NothingToMerge);
        assert!(engine.merges.lock().is_empty());
    }

    #[tokio::test]
    async fn test_missing_group_directory_is_trivial_success() {
        let dir = tempdir().unwrap();
        let ctx = StageContext::new(Arc::new(FakeEngine::default()), EventSink::default());

        let outcome = run(
            MergeJob {
                group: dir.path().join("never-created"),
            },
            &ctx,
        )
        .await
        .unwrap();
        assert_eq!(outcome, TaskOutcome::NothingToMerge);
    }

    #[tokio::test]
    async fn test_skips_when_merge_output_exists() {
        let dir = tempdir().unwrap();
        let group = dir.path().join("wav/a");
        write(&group.join("a.wav"), "merged");
        write(&group.join("late.wav"), "late");

        let engine = Arc::new(FakeEngine::default());
        let ctx = StageContext::new(engine.clone(), EventSink::default());

        let outcome = run(MergeJob { group: group.clone() }, &ctx).await.unwrap();

        assert_eq!(
            outcome,
            TaskOutcome::Skipped {
                path: group.join("a.wav")
            }
        );
        assert!(engine.merges.lock().is_empty());
        assert!(group.join("late.wav").exists());
    }

    #[tokio::test]
    async fn test_merge_failure_deletes_nothing() {
        let dir = tempdir().unwrap();
        let group = dir.path().join("wav/a");
        write(&group.join("x.wav"), "x");
        write(&group.join("y.wav"), "y");

        let ctx = StageContext::new(
            Arc::new(FakeEngine::failing_on("a.wav")),
            EventSink::default(),
        );

        let err = run(MergeJob { group: group.clone() }, &ctx).await.unwrap_err();

        assert!(matches!(err, Error::Merge { group: ref g, .. } if *g == group));
        assert!(group.join("x.wav").exists());
        assert!(group.join("y.wav").exists());
        assert!(!group.join("a.wav").exists());
    }

    #[tokio::test]
    async fn test_ignores_staging_leftovers() {
        let dir = tempdir().unwrap();
        let group = dir.path().join("wav/a");
        write(&group.join("x.wav"), "x");
        write(&group.join(".y.wav.k3j2h1.part"), "partial");

        let files = list_intermediates(&group).await.unwrap();
        assert_eq!(files, [group.join("x.wav")]);
    }
}
