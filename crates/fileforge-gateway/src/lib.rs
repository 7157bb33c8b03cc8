//! # fileforge-gateway
//!
//! The composition root of the FileForge pipeline. External callers (the
//! transport layer, the CLI) see exactly one operation:
//!
//! ```text
//! convert(payload, category, target_format) -> ArtifactHandle | GatewayError
//! ```
//!
//! Everything below the gateway — sniffer, policy, validator,
//! orchestrator — is an implementation detail.

pub mod error;
pub mod gateway;

pub use error::GatewayError;
pub use gateway::ConversionGateway;

// The types callers need to drive the gateway.
pub use fileforge_convert::ArtifactHandle;
pub use fileforge_core::config::GatewayConfig;
pub use fileforge_entity::UploadedPayload;
