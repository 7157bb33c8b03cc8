//! Conversion orchestration: staging → converter process → artifact.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument};

use fileforge_core::config::converter::ConverterConfig;
use fileforge_core::error::AppError;
use fileforge_entity::{ConversionOutcome, RequestId, ValidatedPayload};

use crate::artifact::ArtifactHandle;
use crate::error::ConvertError;
use crate::metrics::ConversionMetrics;
use crate::runner::ConverterRunner;
use crate::staging::StagingFile;

/// Orchestrates one conversion per call: stages the validated payload,
/// invokes the external converter, classifies the result, and guarantees
/// the staging file is deleted on every exit path.
///
/// Holds no per-request state; a single orchestrator serves any number of
/// concurrent requests, bounded only by the global process semaphore.
#[derive(Debug, Clone)]
pub struct ConversionOrchestrator {
    staging_dir: PathBuf,
    runner: ConverterRunner,
    limiter: Arc<Semaphore>,
    metrics: Arc<ConversionMetrics>,
}

impl ConversionOrchestrator {
    /// Create an orchestrator from the converter configuration.
    ///
    /// Resolves the converter executable and creates the staging
    /// directory; both are startup errors, not request errors.
    pub fn new(config: &ConverterConfig) -> Result<Self, AppError> {
        let converter_path = config.resolve_converter_path()?;
        let staging_dir = config.effective_staging_dir();
        std::fs::create_dir_all(&staging_dir)?;

        Ok(Self {
            staging_dir,
            runner: ConverterRunner::new(
                converter_path,
                Duration::from_secs(config.timeout_seconds),
                config.capture_output,
            ),
            limiter: Arc::new(Semaphore::new(config.max_concurrent_conversions)),
            metrics: Arc::new(ConversionMetrics::new()),
        })
    }

    /// Convert a validated payload to `target_format`.
    ///
    /// Cancelling `cancel` kills the in-flight converter process; the
    /// staging file is cleaned up before any error is returned.
    #[instrument(skip(self, validated, cancel), fields(request_id))]
    pub async fn convert(
        &self,
        validated: &ValidatedPayload,
        target_format: &str,
        cancel: CancellationToken,
    ) -> Result<ArtifactHandle, ConvertError> {
        let request_id = RequestId::new();
        tracing::Span::current().record("request_id", request_id.to_string());

        self.metrics.record_started(validated.payload.size_bytes());
        let start = Instant::now();
        let mut outcome = ConversionOutcome::Pending;

        let result = self
            .run_pipeline(validated, target_format, request_id, &mut outcome, cancel)
            .await;

        match &result {
            Ok(artifact) => {
                self.advance(&mut outcome, ConversionOutcome::Succeeded);
                self.metrics
                    .record_success(start.elapsed(), artifact.size_bytes());
            }
            Err(e) => {
                let kind = e.failure_kind();
                self.advance(&mut outcome, ConversionOutcome::Failed(kind));
                self.metrics.record_failure(kind);
            }
        }

        info!(
            outcome = %outcome,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Conversion finished"
        );
        result
    }

    /// Stage, spawn, verify. The staging guard lives for the rest of this
    /// scope; its drop is the unconditional cleanup site.
    async fn run_pipeline(
        &self,
        validated: &ValidatedPayload,
        target_format: &str,
        request_id: RequestId,
        outcome: &mut ConversionOutcome,
        cancel: CancellationToken,
    ) -> Result<ArtifactHandle, ConvertError> {
        if cancel.is_cancelled() {
            return Err(ConvertError::Cancelled);
        }

        let _permit = self
            .limiter
            .acquire()
            .await
            .map_err(|_| ConvertError::Crashed {
                detail: "conversion limiter closed".to_string(),
            })?;

        if cancel.is_cancelled() {
            return Err(ConvertError::Cancelled);
        }

        let staging = StagingFile::create(
            &self.staging_dir,
            request_id,
            validated.staging_extension(),
            &validated.payload.data,
        )
        .await?;

        self.advance(outcome, ConversionOutcome::Running);

        let reported = self
            .runner
            .run(staging.path(), target_format, &cancel)
            .await?;

        self.verify_artifact(&reported).await
    }

    /// Exit code 0 means the trimmed stdout names the artifact. Verify it
    /// before declaring success: a converter that exits 0 without output
    /// has lied.
    async fn verify_artifact(&self, reported: &str) -> Result<ArtifactHandle, ConvertError> {
        if reported.is_empty() {
            return Err(ConvertError::Crashed {
                detail: "converter exited 0 but reported no artifact path".to_string(),
            });
        }

        let path = PathBuf::from(reported);
        let metadata = tokio::fs::metadata(&path)
            .await
            .map_err(|_| ConvertError::Crashed {
                detail: "converter exited 0 but produced no artifact".to_string(),
            })?;

        Ok(ArtifactHandle::new(path, metadata.len()))
    }

    /// Step the outcome state machine.
    fn advance(&self, outcome: &mut ConversionOutcome, next: ConversionOutcome) {
        debug_assert!(
            outcome.can_transition_to(next),
            "illegal outcome transition {outcome} -> {next}"
        );
        *outcome = next;
    }

    /// Get a metrics snapshot.
    pub fn metrics_snapshot(&self) -> crate::metrics::MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Available converter process slots.
    pub fn available_slots(&self) -> usize {
        self.limiter.available_permits()
    }
}
