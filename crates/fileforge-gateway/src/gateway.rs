//! The conversion gateway: validator and orchestrator composed behind one
//! entry point.

use tokio_util::sync::CancellationToken;
use tracing::instrument;

use fileforge_convert::{ArtifactHandle, ConversionOrchestrator, MetricsSnapshot};
use fileforge_core::config::GatewayConfig;
use fileforge_core::error::AppError;
use fileforge_entity::UploadedPayload;
use fileforge_service::UploadValidator;

use crate::error::GatewayError;

/// The single external entry point of the conversion pipeline.
///
/// Stateless across requests; one gateway instance serves any number of
/// concurrent conversions.
#[derive(Debug, Clone)]
pub struct ConversionGateway {
    validator: UploadValidator,
    orchestrator: ConversionOrchestrator,
}

impl ConversionGateway {
    /// Build the gateway from configuration.
    ///
    /// Fails fast on invalid ranges, an unresolvable converter
    /// executable, or an uncreatable staging directory.
    pub fn new(config: &GatewayConfig) -> Result<Self, AppError> {
        config.validate_ranges()?;
        Ok(Self {
            validator: UploadValidator::new(config.upload.clone()),
            orchestrator: ConversionOrchestrator::new(&config.converter)?,
        })
    }

    /// Validate `payload` against `category`, convert it to
    /// `target_format`, and return the artifact.
    ///
    /// The caller must `release()` the returned handle exactly once after
    /// delivering the artifact. No uploaded or intermediate file survives
    /// the call, whatever the outcome.
    pub async fn convert(
        &self,
        payload: UploadedPayload,
        category: &str,
        target_format: &str,
    ) -> Result<ArtifactHandle, GatewayError> {
        self.convert_with_cancel(payload, category, target_format, CancellationToken::new())
            .await
    }

    /// [`convert`](Self::convert) with request cancellation: cancelling
    /// the token kills the in-flight converter process.
    #[instrument(skip(self, payload, cancel))]
    pub async fn convert_with_cancel(
        &self,
        payload: UploadedPayload,
        category: &str,
        target_format: &str,
        cancel: CancellationToken,
    ) -> Result<ArtifactHandle, GatewayError> {
        if category.trim().is_empty() {
            return Err(GatewayError::MissingParameter { name: "category" });
        }
        if target_format.trim().is_empty() {
            return Err(GatewayError::MissingParameter {
                name: "target_format",
            });
        }

        let validated = self.validator.validate(payload, category)?;
        let artifact = self
            .orchestrator
            .convert(&validated, target_format, cancel)
            .await?;
        Ok(artifact)
    }

    /// Snapshot of the conversion metrics.
    pub fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.orchestrator.metrics_snapshot()
    }
}
