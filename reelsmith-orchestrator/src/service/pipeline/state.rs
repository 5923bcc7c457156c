//! Pipeline state machine
//!
//! ```text
//!   Submitting ──→ Polling ──→ Fetching ──→ Publishing ──→ Completed
//!       │             │           │             │
//!       └─────────────┴───────────┴─────────────┴──→ Failed
//! ```
//!
//! `advance` is pure: it maps the current stage and the outcome of running
//! it to the next stage plus the ledger patch that transition writes.

use reelsmith_core::dto::job::JobPatch;

use super::error::PipelineError;

/// Stored artifact of a completed job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedArtifact {
    pub handle: String,
    pub storage_path: String,
    pub public_url: String,
}

/// Where a job currently is in the pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
    Submitting,
    Polling {
        handle: String,
    },
    Fetching {
        handle: String,
        artifact_ref: Option<String>,
    },
    Publishing {
        handle: String,
        artifact: Vec<u8>,
    },
    Completed(PublishedArtifact),
    Failed(PipelineError),
}

impl Stage {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Stage::Completed(_) | Stage::Failed(_))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Stage::Submitting => "submitting",
            Stage::Polling { .. } => "polling",
            Stage::Fetching { .. } => "fetching",
            Stage::Publishing { .. } => "publishing",
            Stage::Completed(_) => "completed",
            Stage::Failed(_) => "failed",
        }
    }
}

/// Result of running one stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageOutcome {
    Submitted {
        handle: String,
    },
    Polled {
        artifact_ref: Option<String>,
    },
    Fetched {
        artifact: Vec<u8>,
    },
    Published {
        storage_path: String,
        public_url: String,
    },
    Failed(PipelineError),
}

impl StageOutcome {
    fn name(&self) -> &'static str {
        match self {
            StageOutcome::Submitted { .. } => "submitted",
            StageOutcome::Polled { .. } => "polled",
            StageOutcome::Fetched { .. } => "fetched",
            StageOutcome::Published { .. } => "published",
            StageOutcome::Failed(_) => "failed",
        }
    }
}

/// Next stage and the ledger write that goes with it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub next: Stage,
    pub patch: Option<JobPatch>,
}

impl Transition {
    fn to(next: Stage, patch: Option<JobPatch>) -> Self {
        Self { next, patch }
    }

    fn fail(error: PipelineError) -> Self {
        let patch = JobPatch::failed(error.detail());
        Self::to(Stage::Failed(error), Some(patch))
    }
}

/// Compute the transition for `outcome` observed in `stage`
pub fn advance(stage: Stage, outcome: StageOutcome) -> Transition {
    if stage.is_terminal() {
        return Transition::to(stage, None);
    }

    match (stage, outcome) {
        (_, StageOutcome::Failed(error)) => Transition::fail(error),

        (Stage::Submitting, StageOutcome::Submitted { handle }) => {
            let patch = JobPatch::generating(handle.clone());
            Transition::to(Stage::Polling { handle }, Some(patch))
        }

        // Status stays `generating` until the artifact is in hand
        (Stage::Polling { handle }, StageOutcome::Polled { artifact_ref }) => Transition::to(
            Stage::Fetching {
                handle,
                artifact_ref,
            },
            None,
        ),

        (Stage::Fetching { handle, .. }, StageOutcome::Fetched { artifact }) => Transition::to(
            Stage::Publishing { handle, artifact },
            Some(JobPatch::uploading()),
        ),

        (
            Stage::Publishing { handle, .. },
            StageOutcome::Published {
                storage_path,
                public_url,
            },
        ) => {
            let patch = JobPatch::completed(storage_path.clone(), public_url.clone());
            Transition::to(
                Stage::Completed(PublishedArtifact {
                    handle,
                    storage_path,
                    public_url,
                }),
                Some(patch),
            )
        }

        (stage, outcome) => Transition::fail(PipelineError::InvalidTransition(format!(
            "'{}' outcome in '{}' stage",
            outcome.name(),
            stage.name()
        ))),
    }
}
