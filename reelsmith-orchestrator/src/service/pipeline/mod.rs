//! Generation Pipeline Service
//!
//! Drives one video job from submission to a terminal ledger state:
//! submit to the provider, poll until it settles, fetch the artifact,
//! publish it to object storage. Every stage runs through the pure
//! `state::advance` transition, which also decides the ledger write.
//!
//! Jobs are independent; the pipeline holds no per-job state between calls
//! and may be shared across tasks.

mod error;
mod fetch;
mod poll;
mod publish;
mod state;
mod submit;

pub use error::{PipelineError, PipelineFailure};
pub use publish::storage_path;
pub use state::{PublishedArtifact, Stage, StageOutcome, Transition, advance};

use reelsmith_core::domain::job::JobStatus;
use reelsmith_core::domain::render::RenderParams;
use reelsmith_core::dto::generation::{GenerateVideo, GenerationSucceeded};
use reelsmith_core::dto::job::JobPatch;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::repository::{GenerationProvider, JobLedger, ObjectStorage, VideoRequest};

/// Defaults and time budgets of the pipeline
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub video_model: String,
    pub render_defaults: RenderParams,
    pub poll_interval: Duration,
    pub poll_timeout: Duration,
    pub fetch_retry_interval: Duration,
    pub fetch_timeout: Duration,
    /// MIME type recorded with stored videos
    pub content_type: String,
    pub file_extension: String,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            video_model: "sora-2".to_string(),
            render_defaults: RenderParams::default(),
            poll_interval: Duration::from_secs(2),
            poll_timeout: Duration::from_secs(180),
            fetch_retry_interval: Duration::from_secs(5),
            fetch_timeout: Duration::from_secs(60),
            content_type: "video/mp4".to_string(),
            file_extension: "mp4".to_string(),
        }
    }
}

/// A validated request with its ledger row already created
#[derive(Debug, Clone)]
pub struct AcceptedJob {
    pub id: Uuid,
    pub request: VideoRequest,
}

/// Video generation pipeline
pub struct GenerationPipeline {
    ledger: Arc<dyn JobLedger>,
    provider: Arc<dyn GenerationProvider>,
    storage: Arc<dyn ObjectStorage>,
    settings: PipelineSettings,
}

impl GenerationPipeline {
    pub fn new(
        ledger: Arc<dyn JobLedger>,
        provider: Arc<dyn GenerationProvider>,
        storage: Arc<dyn ObjectStorage>,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            ledger,
            provider,
            storage,
            settings,
        }
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// Run a generation to completion
    pub async fn run(
        &self,
        request: GenerateVideo,
    ) -> Result<GenerationSucceeded, PipelineFailure> {
        let job = self.accept(request).await?;
        self.drive(job).await
    }

    /// Validate `request`, resolve its render parameters and create the
    /// queued ledger row
    ///
    /// Invalid requests are rejected before any row exists.
    pub async fn accept(&self, request: GenerateVideo) -> Result<AcceptedJob, PipelineFailure> {
        let new_job = request
            .to_new_job()
            .map_err(|msg| PipelineFailure::new(None, PipelineError::InvalidRequest(msg)))?;

        let params = RenderParams::resolve(
            request.size.as_deref(),
            request.seconds,
            &self.settings.render_defaults,
        );
        if request.size.as_deref().is_some_and(|s| s != params.size)
            || request.seconds.is_some_and(|s| s != params.seconds)
        {
            warn!(
                "Unsupported render parameters (size {:?}, seconds {:?}), using {} / {}s",
                request.size, request.seconds, params.size, params.seconds
            );
        }

        let video_request = VideoRequest {
            model: self.settings.video_model.clone(),
            prompt: new_job.video_prompt.clone(),
            size: params.size,
            seconds: params.seconds.to_string(),
        };

        let id = self.ledger.insert(new_job).await.map_err(|err| {
            error!("Failed to create ledger row: {:#}", err);
            PipelineFailure::new(None, PipelineError::Ledger(format!("{:#}", err)))
        })?;

        info!("Job {}: queued", id);

        Ok(AcceptedJob {
            id,
            request: video_request,
        })
    }

    /// Drive an accepted job until it is completed or failed
    pub async fn drive(&self, job: AcceptedJob) -> Result<GenerationSucceeded, PipelineFailure> {
        let AcceptedJob {
            id: job_id,
            request,
        } = job;
        let mut stage = Stage::Submitting;

        loop {
            let outcome = self.execute(job_id, &request, &mut stage).await;

            let from = stage.name();
            let Transition { next, patch } = advance(stage, outcome);
            debug!("Job {}: {} -> {}", job_id, from, next.name());
            stage = next;

            if let Some(patch) = patch {
                if let Err(err) = self.record(job_id, patch).await {
                    return Err(PipelineFailure::new(Some(job_id), err));
                }
            }

            match stage {
                Stage::Completed(artifact) => {
                    info!("Job {}: completed at {}", job_id, artifact.public_url);
                    return Ok(GenerationSucceeded {
                        db_id: job_id,
                        status: JobStatus::Completed,
                        video_url: artifact.public_url,
                        provider_job_id: artifact.handle,
                        storage_path: artifact.storage_path,
                    });
                }
                Stage::Failed(err) => {
                    warn!("Job {}: failed: {}", job_id, err);
                    return Err(PipelineFailure::new(Some(job_id), err));
                }
                running => stage = running,
            }
        }
    }

    /// Run the work of `stage`
    async fn execute(&self, job_id: Uuid, request: &VideoRequest, stage: &mut Stage) -> StageOutcome {
        let settings = &self.settings;

        let result = match stage {
            Stage::Submitting => submit::submit(&*self.provider, job_id, request)
                .await
                .map(|handle| StageOutcome::Submitted { handle }),

            Stage::Polling { handle } => poll::poll_until_settled(
                &*self.provider,
                job_id,
                handle.as_str(),
                settings.poll_interval,
                settings.poll_timeout,
            )
            .await
            .map(|artifact_ref| StageOutcome::Polled { artifact_ref }),

            Stage::Fetching {
                handle,
                artifact_ref,
            } => fetch::fetch_artifact(
                &*self.provider,
                job_id,
                handle.as_str(),
                artifact_ref.as_deref(),
                settings.fetch_retry_interval,
                settings.fetch_timeout,
            )
            .await
            .map(|artifact| StageOutcome::Fetched { artifact }),

            Stage::Publishing { handle, artifact } => {
                // The bytes move into the upload; the stage is replaced right after
                let artifact = std::mem::take(artifact);
                publish::publish(
                    &*self.storage,
                    job_id,
                    handle.as_str(),
                    artifact,
                    &settings.content_type,
                    &settings.file_extension,
                )
                .await
                .map(|(storage_path, public_url)| StageOutcome::Published {
                    storage_path,
                    public_url,
                })
            }

            Stage::Completed(_) | Stage::Failed(_) => Err(PipelineError::InvalidTransition(
                "terminal stage has no work".to_string(),
            )),
        };

        result.unwrap_or_else(StageOutcome::Failed)
    }

    /// Write `patch` to the ledger
    ///
    /// Progress writes that fail are logged and the job keeps going; the
    /// terminal write decides the outcome. A rejected completion turns the
    /// job into a ledger failure.
    async fn record(&self, job_id: Uuid, patch: JobPatch) -> Result<(), PipelineError> {
        let status = patch.status;

        let Err(err) = self.ledger.update(job_id, patch).await else {
            return Ok(());
        };

        match status {
            JobStatus::Completed => {
                error!("Job {}: failed to record completion: {:#}", job_id, err);
                let failure = PipelineError::Ledger(format!("{:#}", err));
                if let Err(err) = self
                    .ledger
                    .update(job_id, JobPatch::failed(failure.detail()))
                    .await
                {
                    error!("Job {}: failed to record failure: {:#}", job_id, err);
                }
                Err(failure)
            }
            JobStatus::Failed => {
                error!("Job {}: failed to record failure: {:#}", job_id, err);
                Ok(())
            }
            _ => {
                warn!(
                    "Job {}: failed to record '{}' status: {:#}",
                    job_id, status, err
                );
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{CreatedVideo, ProviderError};
    use async_trait::async_trait;
    use reelsmith_core::domain::provider::{PollSnapshot, RemoteStatus};
    use reelsmith_core::domain::region::Region;
    use reelsmith_core::dto::job::NewJob;
    use std::collections::{HashMap, VecDeque};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    // =========================================================================
    // Fakes
    // =========================================================================

    #[derive(Debug, Clone)]
    struct FakeRow {
        status: JobStatus,
        provider_job_id: Option<String>,
        storage_path: Option<String>,
        video_url: Option<String>,
        error_message: Option<String>,
        terminal_writes: usize,
    }

    /// In-memory ledger enforcing the forward-only status order
    #[derive(Default)]
    struct FakeLedger {
        rows: Mutex<HashMap<Uuid, FakeRow>>,
        reject: Option<JobStatus>,
    }

    impl FakeLedger {
        fn rejecting(status: JobStatus) -> Self {
            Self {
                reject: Some(status),
                ..Self::default()
            }
        }

        fn row(&self, id: Uuid) -> FakeRow {
            self.rows.lock().unwrap().get(&id).cloned().unwrap()
        }

        fn len(&self) -> usize {
            self.rows.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl JobLedger for FakeLedger {
        async fn insert(&self, _job: NewJob) -> anyhow::Result<Uuid> {
            let id = Uuid::new_v4();
            self.rows.lock().unwrap().insert(
                id,
                FakeRow {
                    status: JobStatus::Queued,
                    provider_job_id: None,
                    storage_path: None,
                    video_url: None,
                    error_message: None,
                    terminal_writes: 0,
                },
            );
            Ok(id)
        }

        async fn update(&self, job_id: Uuid, patch: JobPatch) -> anyhow::Result<()> {
            if self.reject == Some(patch.status) {
                anyhow::bail!("ledger unavailable");
            }

            let mut rows = self.rows.lock().unwrap();
            let row = rows
                .get_mut(&job_id)
                .ok_or_else(|| anyhow::anyhow!("no row {}", job_id))?;

            if !row.status.can_transition_to(patch.status) {
                anyhow::bail!("cannot move from {} to {}", row.status, patch.status);
            }

            row.status = patch.status;
            if patch.status.is_terminal() {
                row.terminal_writes += 1;
            }
            if patch.provider_job_id.is_some() {
                row.provider_job_id = patch.provider_job_id;
            }
            if patch.storage_path.is_some() {
                row.storage_path = patch.storage_path;
            }
            if patch.video_url.is_some() {
                row.video_url = patch.video_url;
            }
            if patch.error_message.is_some() {
                row.error_message = patch.error_message;
            }
            Ok(())
        }
    }

    /// Provider answering from scripted queues
    ///
    /// Empty queues mean: still in progress, not downloadable yet.
    #[derive(Default)]
    struct FakeProvider {
        created: Mutex<Option<Result<CreatedVideo, ProviderError>>>,
        statuses: Mutex<VecDeque<Result<PollSnapshot, ProviderError>>>,
        contents: Mutex<VecDeque<Result<Vec<u8>, ProviderError>>>,
        downloads: Mutex<VecDeque<Result<Vec<u8>, ProviderError>>>,
        requests: Mutex<Vec<VideoRequest>>,
        status_calls: AtomicUsize,
        content_calls: AtomicUsize,
        download_calls: AtomicUsize,
    }

    impl FakeProvider {
        fn create_returns(self, result: Result<CreatedVideo, ProviderError>) -> Self {
            *self.created.lock().unwrap() = Some(result);
            self
        }

        fn statuses(self, statuses: Vec<Result<PollSnapshot, ProviderError>>) -> Self {
            self.statuses.lock().unwrap().extend(statuses);
            self
        }

        fn contents(self, contents: Vec<Result<Vec<u8>, ProviderError>>) -> Self {
            self.contents.lock().unwrap().extend(contents);
            self
        }

        fn downloads(self, downloads: Vec<Result<Vec<u8>, ProviderError>>) -> Self {
            self.downloads.lock().unwrap().extend(downloads);
            self
        }

        fn calls(counter: &AtomicUsize) -> usize {
            counter.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl GenerationProvider for FakeProvider {
        async fn create(&self, request: &VideoRequest) -> Result<CreatedVideo, ProviderError> {
            self.requests.lock().unwrap().push(request.clone());
            self.created.lock().unwrap().take().unwrap_or_else(|| {
                Ok(CreatedVideo {
                    handle: Some("video_123".to_string()),
                })
            })
        }

        async fn status(&self, _handle: &str) -> Result<PollSnapshot, ProviderError> {
            self.status_calls.fetch_add(1, Ordering::SeqCst);
            self.statuses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(snapshot("in_progress", None)))
        }

        async fn content(&self, _handle: &str) -> Result<Vec<u8>, ProviderError> {
            self.content_calls.fetch_add(1, Ordering::SeqCst);
            self.contents
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(ProviderError::api_error(404, "Video is not ready")))
        }

        async fn download(&self, _url: &str) -> Result<Vec<u8>, ProviderError> {
            self.download_calls.fetch_add(1, Ordering::SeqCst);
            self.downloads
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(ProviderError::api_error(404, "Not Found")))
        }
    }

    #[derive(Default)]
    struct FakeStorage {
        objects: Mutex<HashMap<String, Vec<u8>>>,
        puts: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl ObjectStorage for FakeStorage {
        async fn put(&self, path: &str, bytes: Vec<u8>, _content_type: &str) -> anyhow::Result<()> {
            self.puts.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                anyhow::bail!("bucket not found");
            }
            self.objects
                .lock()
                .unwrap()
                .insert(path.to_string(), bytes);
            Ok(())
        }

        fn public_url(&self, path: &str) -> anyhow::Result<String> {
            Ok(format!("https://storage.test/public/videos/{}", path))
        }

        async fn remove(&self, path: &str) -> anyhow::Result<()> {
            self.objects.lock().unwrap().remove(path);
            Ok(())
        }
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn snapshot(status: &str, url: Option<&str>) -> PollSnapshot {
        PollSnapshot {
            status: RemoteStatus::from_provider(status),
            artifact_ref: url.map(str::to_string),
            error_message: None,
        }
    }

    fn request() -> GenerateVideo {
        GenerateVideo {
            title: Some("Weeknight Pasta".to_string()),
            recipe_text: "Boil pasta, toss with pesto.".to_string(),
            people: "two friends".to_string(),
            region: Some(Region::Europe),
            video_prompt: "A cozy kitchen, two friends plating pesto pasta".to_string(),
            ..GenerateVideo::default()
        }
    }

    struct Harness {
        ledger: Arc<FakeLedger>,
        provider: Arc<FakeProvider>,
        storage: Arc<FakeStorage>,
        pipeline: GenerationPipeline,
    }

    fn harness(ledger: FakeLedger, provider: FakeProvider, storage: FakeStorage) -> Harness {
        let ledger = Arc::new(ledger);
        let provider = Arc::new(provider);
        let storage = Arc::new(storage);
        let pipeline = GenerationPipeline::new(
            ledger.clone(),
            provider.clone(),
            storage.clone(),
            PipelineSettings::default(),
        );
        Harness {
            ledger,
            provider,
            storage,
            pipeline,
        }
    }

    fn failed_job(failure: &PipelineFailure) -> Uuid {
        failure.job_id.unwrap()
    }

    // =========================================================================
    // Tests
    // =========================================================================

    #[tokio::test(start_paused = true)]
    async fn test_happy_path_completes_and_records_location() {
        let provider = FakeProvider::default()
            .statuses(vec![
                Ok(snapshot("queued", None)),
                Ok(snapshot("in_progress", None)),
                Ok(snapshot("completed", Some("https://cdn.test/v.mp4"))),
            ])
            .contents(vec![Ok(vec![0, 0, 0, 24])]);
        let h = harness(FakeLedger::default(), provider, FakeStorage::default());

        let success = h.pipeline.run(request()).await.unwrap();

        assert_eq!(success.status, JobStatus::Completed);
        assert_eq!(success.provider_job_id, "video_123");
        assert_eq!(
            success.storage_path,
            format!("{}/video_123.mp4", success.db_id)
        );
        assert!(success.video_url.ends_with(&success.storage_path));

        // Exactly one status query per provider response
        assert_eq!(FakeProvider::calls(&h.provider.status_calls), 3);
        assert_eq!(FakeProvider::calls(&h.provider.download_calls), 0);

        let row = h.ledger.row(success.db_id);
        assert_eq!(row.status, JobStatus::Completed);
        assert_eq!(row.provider_job_id.as_deref(), Some("video_123"));
        assert_eq!(row.video_url.as_deref(), Some(success.video_url.as_str()));
        assert_eq!(row.terminal_writes, 1);
        assert_eq!(
            h.storage.objects.lock().unwrap().get(&success.storage_path),
            Some(&vec![0, 0, 0, 24])
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_request_creates_no_row() {
        let h = harness(
            FakeLedger::default(),
            FakeProvider::default(),
            FakeStorage::default(),
        );
        let mut req = request();
        req.people = "   ".to_string();

        let failure = h.pipeline.run(req).await.unwrap_err();

        assert!(matches!(failure.error, PipelineError::InvalidRequest(_)));
        assert!(failure.job_id.is_none());
        assert_eq!(h.ledger.len(), 0);
        assert!(h.provider.requests.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_submission_rejection_fails_without_polling() {
        let body = "{\"error\":{\"message\":\"Your prompt was rejected\"}}";
        let provider =
            FakeProvider::default().create_returns(Err(ProviderError::api_error(400, body)));
        let h = harness(FakeLedger::default(), provider, FakeStorage::default());

        let failure = h.pipeline.run(request()).await.unwrap_err();

        assert_eq!(failure.to_string(), body);
        assert_eq!(FakeProvider::calls(&h.provider.status_calls), 0);

        let row = h.ledger.row(failed_job(&failure));
        assert_eq!(row.status, JobStatus::Failed);
        assert_eq!(row.error_message.as_deref(), Some(body));
        assert_eq!(row.terminal_writes, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_handle_is_a_failure() {
        let provider = FakeProvider::default().create_returns(Ok(CreatedVideo { handle: None }));
        let h = harness(FakeLedger::default(), provider, FakeStorage::default());

        let failure = h.pipeline.run(request()).await.unwrap_err();

        assert_eq!(failure.error, PipelineError::MissingHandle);
        assert_eq!(FakeProvider::calls(&h.provider.status_calls), 0);
        assert_eq!(h.ledger.row(failed_job(&failure)).status, JobStatus::Failed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_provider_reported_failure_carries_message() {
        let failed = PollSnapshot {
            error_message: Some("moderation_blocked".to_string()),
            ..snapshot("failed", None)
        };
        let provider = FakeProvider::default().statuses(vec![Ok(failed)]);
        let h = harness(FakeLedger::default(), provider, FakeStorage::default());

        let failure = h.pipeline.run(request()).await.unwrap_err();

        assert_eq!(
            failure.error,
            PipelineError::GenerationFailed {
                message: "moderation_blocked".to_string()
            }
        );
        let row = h.ledger.row(failed_job(&failure));
        assert_eq!(row.status, JobStatus::Failed);
        assert_eq!(row.provider_job_id.as_deref(), Some("video_123"));
        assert_eq!(FakeProvider::calls(&h.provider.content_calls), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_transport_error_fails_immediately() {
        let provider = FakeProvider::default().statuses(vec![
            Ok(snapshot("in_progress", None)),
            Err(ProviderError::Transport("connection reset".to_string())),
        ]);
        let h = harness(FakeLedger::default(), provider, FakeStorage::default());

        let failure = h.pipeline.run(request()).await.unwrap_err();

        assert!(matches!(
            failure.error,
            PipelineError::Poll { status: None, .. }
        ));
        assert_eq!(FakeProvider::calls(&h.provider.status_calls), 2);
        assert_eq!(h.ledger.row(failed_job(&failure)).status, JobStatus::Failed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_budget_exhaustion_times_out() {
        // Empty status queue: the provider never leaves `in_progress`
        let h = harness(
            FakeLedger::default(),
            FakeProvider::default(),
            FakeStorage::default(),
        );
        let started = tokio::time::Instant::now();

        let failure = h.pipeline.run(request()).await.unwrap_err();

        assert_eq!(
            failure.error,
            PipelineError::PollTimeout {
                budget: Duration::from_secs(180)
            }
        );
        assert!(failure.error.is_timeout());
        assert!(started.elapsed() >= Duration::from_secs(180));
        assert!(started.elapsed() < Duration::from_secs(185));
        assert_eq!(FakeProvider::calls(&h.provider.content_calls), 0);

        let row = h.ledger.row(failed_job(&failure));
        assert_eq!(row.status, JobStatus::Failed);
        assert!(row.error_message.unwrap().contains("timed out"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_retries_content_endpoint_until_ready() {
        let provider = FakeProvider::default()
            .statuses(vec![Ok(snapshot("completed", None))])
            .contents(vec![
                Err(ProviderError::api_error(404, "not ready")),
                Err(ProviderError::api_error(404, "not ready")),
                Ok(vec![7; 16]),
            ]);
        let h = harness(FakeLedger::default(), provider, FakeStorage::default());

        let success = h.pipeline.run(request()).await.unwrap();

        assert_eq!(success.status, JobStatus::Completed);
        assert_eq!(FakeProvider::calls(&h.provider.content_calls), 3);
        // No direct URL was reported, so the fallback is never tried
        assert_eq!(FakeProvider::calls(&h.provider.download_calls), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_falls_back_to_direct_url() {
        let provider = FakeProvider::default()
            .statuses(vec![Ok(snapshot(
                "completed",
                Some("https://cdn.test/video_123.mp4"),
            ))])
            .contents(vec![Err(ProviderError::api_error(404, "not ready"))])
            .downloads(vec![Ok(vec![1, 2, 3])]);
        let h = harness(FakeLedger::default(), provider, FakeStorage::default());

        let success = h.pipeline.run(request()).await.unwrap();

        assert_eq!(FakeProvider::calls(&h.provider.content_calls), 1);
        assert_eq!(FakeProvider::calls(&h.provider.download_calls), 1);
        assert_eq!(
            h.storage.objects.lock().unwrap().get(&success.storage_path),
            Some(&vec![1, 2, 3])
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_exhaustion_reports_not_ready() {
        let provider = FakeProvider::default().statuses(vec![Ok(snapshot("completed", None))]);
        let h = harness(FakeLedger::default(), provider, FakeStorage::default());

        let failure = h.pipeline.run(request()).await.unwrap_err();

        match &failure.error {
            PipelineError::ArtifactNotReady {
                attempts,
                last_error,
            } => {
                assert!(*attempts > 1);
                assert_eq!(last_error, "Video is not ready");
            }
            other => panic!("expected ArtifactNotReady, got {:?}", other),
        }
        assert!(failure.error.is_timeout());
        assert_eq!(h.storage.puts.load(Ordering::SeqCst), 0);

        let row = h.ledger.row(failed_job(&failure));
        assert_eq!(row.status, JobStatus::Failed);
        assert_eq!(row.terminal_writes, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_exhaustion_with_fallback_url_reports_not_ready() {
        let provider = FakeProvider::default().statuses(vec![Ok(snapshot(
            "completed",
            Some("https://cdn.provider.test/video_1.mp4"),
        ))]);
        let h = harness(FakeLedger::default(), provider, FakeStorage::default());

        let failure = h.pipeline.run(request()).await.unwrap_err();

        assert!(matches!(
            failure.error,
            PipelineError::ArtifactNotReady { attempts, .. } if attempts > 1
        ));
        let content_calls = FakeProvider::calls(&h.provider.content_calls);
        assert!(content_calls > 1);
        assert_eq!(content_calls, FakeProvider::calls(&h.provider.download_calls));
        assert_eq!(h.storage.puts.load(Ordering::SeqCst), 0);

        let row = h.ledger.row(failed_job(&failure));
        assert_eq!(row.status, JobStatus::Failed);
        assert!(row.video_url.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_hard_error_is_not_retried() {
        let provider = FakeProvider::default()
            .statuses(vec![Ok(snapshot("completed", None))])
            .contents(vec![Err(ProviderError::api_error(403, "forbidden"))]);
        let h = harness(FakeLedger::default(), provider, FakeStorage::default());

        let failure = h.pipeline.run(request()).await.unwrap_err();

        assert_eq!(
            failure.error,
            PipelineError::Download {
                status: Some(403),
                detail: "forbidden".to_string()
            }
        );
        assert!(!failure.error.is_timeout());
        assert_eq!(FakeProvider::calls(&h.provider.content_calls), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_storage_failure_fails_job() {
        let provider = FakeProvider::default()
            .statuses(vec![Ok(snapshot("completed", None))])
            .contents(vec![Ok(vec![9])]);
        let storage = FakeStorage {
            fail: true,
            ..FakeStorage::default()
        };
        let h = harness(FakeLedger::default(), provider, storage);

        let failure = h.pipeline.run(request()).await.unwrap_err();

        assert!(matches!(failure.error, PipelineError::Storage(_)));
        let row = h.ledger.row(failed_job(&failure));
        assert_eq!(row.status, JobStatus::Failed);
        assert!(row.video_url.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_publish_is_idempotent_per_job() {
        let storage = FakeStorage::default();
        let job_id = Uuid::new_v4();

        for bytes in [vec![1], vec![2]] {
            publish::publish(&storage, job_id, "video_9", bytes, "video/mp4", "mp4")
                .await
                .unwrap();
        }

        let objects = storage.objects.lock().unwrap();
        assert_eq!(objects.len(), 1);
        assert_eq!(
            objects.get(&storage_path(job_id, "video_9", "mp4")),
            Some(&vec![2])
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_unsupported_render_params_fall_back() {
        let provider = FakeProvider::default().create_returns(Err(ProviderError::api_error(
            500,
            "stop after submission",
        )));
        let h = harness(FakeLedger::default(), provider, FakeStorage::default());
        let mut req = request();
        req.size = Some("640x480".to_string());
        req.seconds = Some(30);

        let _ = h.pipeline.run(req).await;

        let sent = h.provider.requests.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].size, "1280x720");
        assert_eq!(sent[0].seconds, "12");
        assert_eq!(sent[0].model, "sora-2");
        assert_eq!(
            sent[0].prompt,
            "A cozy kitchen, two friends plating pesto pasta"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_wrong_typed_render_params_fall_back() {
        let provider = FakeProvider::default().create_returns(Err(ProviderError::api_error(
            500,
            "stop after submission",
        )));
        let h = harness(FakeLedger::default(), provider, FakeStorage::default());
        let req: GenerateVideo = serde_json::from_value(serde_json::json!({
            "recipeText": "Boil pasta, toss with pesto.",
            "people": "two friends",
            "region": "Europe",
            "videoPrompt": "A cozy kitchen",
            "size": 1280,
            "seconds": "8"
        }))
        .unwrap();

        let _ = h.pipeline.run(req).await;

        let sent = h.provider.requests.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].size, "1280x720");
        assert_eq!(sent[0].seconds, "8");
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejected_completion_becomes_ledger_failure() {
        let provider = FakeProvider::default()
            .statuses(vec![Ok(snapshot("completed", None))])
            .contents(vec![Ok(vec![5])]);
        let h = harness(
            FakeLedger::rejecting(JobStatus::Completed),
            provider,
            FakeStorage::default(),
        );

        let failure = h.pipeline.run(request()).await.unwrap_err();

        assert!(matches!(failure.error, PipelineError::Ledger(_)));
        let row = h.ledger.row(failed_job(&failure));
        assert_eq!(row.status, JobStatus::Failed);
        assert_eq!(row.terminal_writes, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejected_progress_write_does_not_stop_job() {
        let provider = FakeProvider::default()
            .statuses(vec![Ok(snapshot("completed", None))])
            .contents(vec![Ok(vec![5])]);
        let h = harness(
            FakeLedger::rejecting(JobStatus::Uploading),
            provider,
            FakeStorage::default(),
        );

        let success = h.pipeline.run(request()).await.unwrap();

        assert_eq!(h.ledger.row(success.db_id).status, JobStatus::Completed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_jobs_do_not_interfere() {
        let provider = FakeProvider::default()
            .statuses(vec![
                Ok(snapshot("completed", None)),
                Ok(snapshot("completed", None)),
            ])
            .contents(vec![Ok(vec![1]), Ok(vec![2])]);
        let h = harness(FakeLedger::default(), provider, FakeStorage::default());

        let (a, b) = tokio::join!(h.pipeline.run(request()), h.pipeline.run(request()));
        let (a, b) = (a.unwrap(), b.unwrap());

        assert_ne!(a.db_id, b.db_id);
        assert_ne!(a.storage_path, b.storage_path);
        assert_eq!(h.ledger.len(), 2);
        assert_eq!(h.storage.objects.lock().unwrap().len(), 2);
    }
}
