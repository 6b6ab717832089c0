//! Observable run events.
//!
//! Every skip, conversion, merge and deletion is logged through `tracing`
//! and broadcast to subscribers.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::sync::broadcast;

/// Stage a task belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageKind {
    Convert,
    Merge,
}

impl std::fmt::Display for StageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StageKind::Convert => write!(f, "convert"),
            StageKind::Merge => write!(f, "merge"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PipelineEvent {
    /// Output already existed, nothing was done.
    Skipped { stage: StageKind, path: PathBuf },
    /// A source was converted.
    Converted { source: PathBuf, output: PathBuf },
    /// A group's files were merged into one output.
    Concatenated {
        group: PathBuf,
        output: PathBuf,
        inputs: usize,
    },
    /// A merged input was removed.
    Deleted { path: PathBuf },
    /// A task failed.
    Error {
        stage: StageKind,
        path: PathBuf,
        message: String,
    },
}

/// Fan-out point for [`PipelineEvent`]s.
#[derive(Debug, Clone)]
pub struct EventSink {
    tx: broadcast::Sender<PipelineEvent>,
}

impl EventSink {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PipelineEvent> {
        self.tx.subscribe()
    }

    /// Log the event and broadcast it to all subscribers.
    pub fn emit(&self, event: PipelineEvent) {
        match &event {
            PipelineEvent::Skipped { stage, path } => {
                tracing::info!(%stage, path = %path.display(), "Skipping (already exists)");
            }
            PipelineEvent::Converted { source, output } => {
                tracing::info!(
                    source = %source.display(),
                    output = %output.display(),
                    "Converted"
                );
            }
            PipelineEvent::Concatenated {
                group,
                output,
                inputs,
            } => {
                tracing::info!(
                    group = %group.display(),
                    output = %output.display(),
                    inputs,
                    "Concatenated"
                );
            }
            PipelineEvent::Deleted { path } => {
                tracing::info!(path = %path.display(), "Deleted");
            }
            PipelineEvent::Error {
                stage,
                path,
                message,
            } => {
                tracing::error!(%stage, path = %path.display(), "{}", message);
            }
        }

        if self.tx.send(event).is_err() {
            tracing::trace!("No subscribers for event");
        }
    }
}

impl Default for EventSink {
    fn default() -> Self {
        Self::new(1024)
    }
}
