use super::RunSummary;
use crate::config::Config;
use crate::error::Result;
use crate::events::{EventSink, StageKind};
use crate::grouper::{self, GroupMap};
use crate::limiter::ConcurrencyLimiter;
use crate::stages::{
    build_conversion_tasks, build_merge_tasks, Operation, StageContext, TaskOutcome,
};
use std::sync::Arc;
use wavbatch_av::MediaEngine;

/// Drives discovery, conversion and merging for one configuration.
pub struct Pipeline {
    config: Arc<Config>,
    context: StageContext,
    limiter: ConcurrencyLimiter,
}

impl Pipeline {
    pub fn new(config: Arc<Config>, engine: Arc<dyn MediaEngine>) -> Self {
        let limiter = ConcurrencyLimiter::new(config.jobs.limit());
        Self {
            config,
            context: StageContext::new(engine, EventSink::default()),
            limiter,
        }
    }

    /// Event stream for this pipeline's tasks.
    pub fn events(&self) -> &EventSink {
        &self.context.events
    }

    /// Walk the input tree on a blocking thread.
    pub async fn discover(&self) -> Result<GroupMap> {
        let input = self.config.paths.input.clone();
        let output = self.config.paths.output.clone();
        let extensions = self.config.scan.extensions.clone();

        tokio::task::spawn_blocking(move || grouper::discover(&input, &output, &extensions))
            .await?
    }

    /// Convert every discovered source, then merge every group if enabled.
    ///
    /// A conversion failure stops the run before any merge starts. Either
    /// stage's error is returned only after its in-flight siblings finish.
    pub async fn run(&self) -> Result<RunSummary> {
        let groups = self.discover().await?;

        let mut summary = RunSummary {
            files: grouper::file_count(&groups),
            groups: groups.len(),
            ..Default::default()
        };

        let conversions = build_conversion_tasks(&groups, self.config.merge.enabled);
        tracing::info!(
            "Converting {} files with up to {} concurrent jobs",
            conversions.len(),
            self.limiter.limit()
        );
        for outcome in self.run_stage(StageKind::Convert, conversions).await? {
            summary.record(&outcome);
        }
        tracing::info!("All conversions completed.");

        if self.config.merge.enabled {
            let merges = build_merge_tasks(&groups);
            tracing::info!("Merging {} groups", merges.len());
            for outcome in self.run_stage(StageKind::Merge, merges).await? {
                summary.record(&outcome);
            }
            summary.merge_ran = true;
            tracing::info!("All concatenations completed.");
        } else {
            tracing::info!("Merge stage disabled, leaving converted files in place");
        }

        Ok(summary)
    }

    async fn run_stage(
        &self,
        stage: StageKind,
        operations: Vec<Operation>,
    ) -> Result<Vec<TaskOutcome>> {
        let context = self.context.clone();
        let result = self
            .limiter
            .run(operations, |op| op.execute(context.clone()))
            .await;

        if let Err(e) = &result {
            tracing::error!("{} stage failed: {}", stage, e);
            tracing::info!("Waiting for running {} tasks to finish", stage);
            self.limiter.drain().await;
        }
        result
    }
}
